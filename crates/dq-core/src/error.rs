//! Errors raised at the host boundary.
//!
//! The scaling algorithms themselves never fail; degenerate input falls back
//! to defined values. Only decoding host arguments and talking to the browser
//! can go wrong.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid chart arguments: {0}")]
    InvalidArgs(#[from] serde_json::Error),

    #[error("browser API unavailable: {0}")]
    Unavailable(&'static str),

    #[error("failed to post message to host: {0}")]
    PostMessage(String),
}

pub type ChartResult<T> = Result<T, ChartError>;
