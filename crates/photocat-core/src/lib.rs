//! Photo-request annotation engine.
//!
//! Reads the banner templates on a talk page, infers photographic subjects and
//! locations, and rewrites the page's `{{image requested}}` annotation so it
//! carries them. Also resolves articles to U.S. counties for the county
//! reclassification pass. Nothing in this crate performs I/O.

pub mod catalog;
pub mod county;
pub mod dedup;
mod error;
pub mod extract;
pub mod merge;
pub mod pipeline;
pub mod resolve;
pub mod wikitext;

pub use county::{CountyMap, CountyMatch, CountyStrategy, resolve_county};
pub use error::CoreError;
pub use pipeline::{
    PageOutcome, PipelineConfig, SkipReason, TalkPageUpdate, process_talk_page, retarget_county,
};
pub use resolve::{CanonicalResolver, ResolveError, TableResolver};
pub use wikitext::{ParseError, Template, TemplateRef, Wikicode};
