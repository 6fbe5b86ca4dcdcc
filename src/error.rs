//! Error types
//!
//! Nothing here is fatal to the page: callers log and skip the effect.

use thiserror::Error;

/// Failures while attaching an effect to the page
#[derive(Debug, Error)]
pub enum MountError {
    /// The browser window or document is not reachable
    #[error("no window/document available")]
    NoWindow,

    /// The drawing surface or its 2D context could not be obtained
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A required element is not present in the document
    #[error("missing element: {0}")]
    MissingElement(String),

    /// The effect is disabled by device capabilities or preferences
    #[error("effect disabled: {0}")]
    Disabled(&'static str),

    /// A browser API call failed
    #[error("browser API error: {0}")]
    Js(String),
}

/// Failures while loading injected site content
#[derive(Debug, Error)]
pub enum ContentError {
    /// The JSON document could not be parsed
    #[error("invalid content JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required list is empty
    #[error("content field `{0}` must not be empty")]
    Empty(&'static str),

    /// Two navigation items point at the same section
    #[error("duplicate navigation target `{0}`")]
    DuplicateTarget(String),
}

pub type Result<T, E = MountError> = std::result::Result<T, E>;
