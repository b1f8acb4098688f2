// Error taxonomy for a lineup check.
//
// Everything here is fatal for the run it occurs in, apart from
// `FetchFailure` values returned by a `MessageSink`, which the dispatcher
// records per alert and moves past.

use std::path::PathBuf;

use thiserror::Error;

/// Why a single upstream call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    /// 404, or a `null` payload where a record was expected.
    #[error("not found")]
    NotFound,

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode response: {0}")]
    Decode(String),
}

/// An upstream fetch failed for a named resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not get {resource}{}: {failure}", id_suffix(.id))]
pub struct FetchError {
    pub resource: &'static str,
    pub id: Option<String>,
    pub failure: FetchFailure,
}

impl FetchError {
    pub fn new(resource: &'static str, failure: FetchFailure) -> Self {
        Self {
            resource,
            id: None,
            failure,
        }
    }

    pub fn for_id(resource: &'static str, id: impl Into<String>, failure: FetchFailure) -> Self {
        Self {
            resource,
            id: Some(id.into()),
            failure,
        }
    }
}

fn id_suffix(id: &Option<String>) -> String {
    match id {
        Some(id) => format!(" for '{id}'"),
        None => String::new(),
    }
}

/// A starter index the lineup layout has no position for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("starter slot {index} is outside the supported lineup (non-standard starter count?)")]
    UnknownSlot { index: usize },
}

/// Local player snapshot could not be read or written.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read player cache {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write player cache {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("player cache {path} is not a valid player catalog: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("upstream player catalog could not be parsed: {0}")]
    InvalidCatalog(serde_json::Error),
}

/// Any failure that aborts a check.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Slot(#[from] SlotError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}
