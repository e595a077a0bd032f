// One error type for the whole app; every variant says *where* things went wrong.
// The gesture core never returns these to the frame loop: only the camera,
// window, replay and file adapters do.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String),

    #[error("Window update error: {0}")]
    WindowUpdate(String),

    #[error("Camera init error: {0}")]
    CameraInit(String),

    #[error("Camera frame error: {0}")]
    CameraFrame(String),

    /// Two buffers that must line up pixel-for-pixel do not.
    #[error("{what}: {left_w}x{left_h} does not match {right_w}x{right_h}")]
    Dimension {
        what: &'static str,
        left_w: usize,
        left_h: usize,
        right_w: usize,
        right_h: usize,
    },

    /// A detector handed over fewer joints than a hand has.
    #[error("landmark sample has {found} points, need at least {needed}")]
    MalformedSample { found: usize, needed: usize },

    #[error("failed to write screenshot {path}: {source}")]
    Screenshot {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to create screenshot directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to open landmark replay {path}: {source}")]
    ReplayOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("bad landmark replay line {line}: {source}")]
    Replay {
        line: usize,
        source: serde_json::Error,
    },

    #[error("failed to read landmark replay: {0}")]
    ReplayRead(#[from] std::io::Error),
}
