// Saving composited whiteboard images to disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use image::{ImageBuffer, Rgb, RgbImage};
use tracing::info;

use crate::error::Error;
use crate::types::{FrameBuffer, unpack_rgb};

/// Something that can persist a finished composite.
pub trait ScreenshotSink {
    /// Store `image`, taken at `taken_at` (Unix time). Returns where it went.
    fn save(&mut self, image: &FrameBuffer, taken_at: Duration) -> Result<PathBuf, Error>;
}

/// Writes `whiteboard_<unix-seconds>.png` files into one directory.
pub struct PngSink {
    dir: PathBuf,
}

impl PngSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File name has one-second resolution: two shots in the same second share
    /// a path and the later one replaces the earlier.
    pub fn path_for(&self, taken_at: Duration) -> PathBuf {
        self.dir.join(format!("whiteboard_{}.png", taken_at.as_secs()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ScreenshotSink for PngSink {
    fn save(&mut self, image: &FrameBuffer, taken_at: Duration) -> Result<PathBuf, Error> {
        std::fs::create_dir_all(&self.dir).map_err(|source| Error::OutputDir {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(taken_at);
        to_rgb_image(image)
            .save(&path)
            .map_err(|source| Error::Screenshot { path: path.clone(), source })?;
        info!(path = %path.display(), "screenshot written");
        Ok(path)
    }
}

/// Unpack 0x00RRGGBB pixels into an `image` RGB buffer.
fn to_rgb_image(fb: &FrameBuffer) -> RgbImage {
    ImageBuffer::from_fn(fb.width as u32, fb.height as u32, |x, y| {
        let (r, g, b) = unpack_rgb(fb.pixels[y as usize * fb.width + x as usize]);
        Rgb([r, g, b])
    })
}
