use thiserror::Error;

use crate::resolve::ResolveError;
use crate::wikitext::ParseError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed wikitext: {0}")]
    Parse(#[from] ParseError),

    #[error("title resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("county pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("county map: {0}")]
    CountyMap(#[from] serde_json::Error),
}
