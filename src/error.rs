use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced at the crate boundary. A missing subject is not an error
/// (it is `Option::None`), and a failed overlay is not an error (it is
/// `OverlayFrame::Unannotated`); only inputs the engine cannot reason about
/// land here.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// The frame has no area; there is nothing to analyze or annotate.
    #[error("degenerate frame: {width}x{height} has no area")]
    DegenerateFrame { width: u32, height: u32 },

    /// A configuration value failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A configuration file could not be read or written.
    #[error("config io failure for {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file held malformed TOML.
    #[error("failed to parse config: {0}")]
    ConfigParse(String),

    /// The stream session task is gone; the handle outlived its worker.
    #[error("stream session closed")]
    SessionClosed,

    /// A batched photo-check worker died before reporting back.
    #[error("photo check worker failed")]
    WorkerFailed,
}
