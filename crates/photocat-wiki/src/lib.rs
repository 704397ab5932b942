//! MediaWiki access for the photo-request bots: page text, edits, redirect
//! resolution and category walks over the Action API.

pub mod client;
pub mod title;

pub use client::{WikiClient, WikiError};
pub use title::{is_talk, subject_title, talk_title};
