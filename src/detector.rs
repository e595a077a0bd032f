//! Hand detectors: where landmark samples come from.
//!
//! The whiteboard only needs one [`LandmarkSample`] per frame (or nothing when
//! no hand is visible). Two sources ship with the app:
//!
//! * [`MouseHand`] fakes a hand from the mouse and keyboard, so the app is
//!   usable without a landmark model.
//! * [`ReplayDetector`] plays back landmarks recorded by an external model,
//!   one JSON value per line: `{"landmarks": [[x, y, z], ...]}` for a hand,
//!   `null` (or `{"landmarks": null}`) for a frame without one.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::Error;
use crate::hand::{Landmark, LandmarkSample};
use crate::types::FrameBuffer;

/// Mouse position (window pixels) and the finger pattern picked on the keyboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerInput {
    pub pos: Option<(usize, usize)>,
    /// Index/middle/ring/pinky extension, or `None` for "no hand".
    pub fingers: Option<[bool; 4]>,
}

/// Everything a detector may look at for one frame.
pub struct FrameInput<'a> {
    pub frame: &'a FrameBuffer,
    pub pointer: PointerInput,
    pub timestamp: Duration,
}

pub trait HandDetector {
    /// Landmarks of the hand in this frame, if any.
    fn detect(&mut self, input: &FrameInput<'_>) -> Result<Option<LandmarkSample>, Error>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Synthesizes a hand whose index fingertip follows the mouse.
#[derive(Debug, Default)]
pub struct MouseHand;

impl HandDetector for MouseHand {
    fn detect(&mut self, input: &FrameInput<'_>) -> Result<Option<LandmarkSample>, Error> {
        let (Some((x, y)), Some(fingers)) = (input.pointer.pos, input.pointer.fingers) else {
            return Ok(None);
        };
        let frame = input.frame;
        if frame.width == 0 || frame.height == 0 {
            return Ok(None);
        }
        let nx = x as f32 / frame.width as f32;
        let ny = y as f32 / frame.height as f32;
        Ok(Some(LandmarkSample::synthetic(nx, ny, fingers, input.timestamp)))
    }

    fn name(&self) -> &'static str {
        "mouse"
    }
}

#[derive(Debug, Deserialize)]
struct RecordedFrame {
    #[serde(default)]
    landmarks: Option<Vec<[f32; 3]>>,
}

/// Plays back a JSON-lines landmark recording, one line per camera frame.
pub struct ReplayDetector<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
    finished: bool,
}

impl ReplayDetector<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|source| Error::ReplayOpen {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "replaying landmarks");
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplayDetector<R> {
    pub fn from_reader(reader: R) -> Self {
        Self { lines: reader.lines(), line_no: 0, finished: false }
    }

    fn parse(&self, line: &str, timestamp: Duration) -> Result<Option<LandmarkSample>, Error> {
        let recorded: Option<RecordedFrame> =
            serde_json::from_str(line).map_err(|source| Error::Replay { line: self.line_no, source })?;
        let Some(points) = recorded.and_then(|r| r.landmarks) else {
            return Ok(None);
        };
        let landmarks = points.into_iter().map(|[x, y, z]| Landmark::new(x, y, z)).collect();
        LandmarkSample::new(landmarks, timestamp).map(Some)
    }
}

impl<R: BufRead> HandDetector for ReplayDetector<R> {
    fn detect(&mut self, input: &FrameInput<'_>) -> Result<Option<LandmarkSample>, Error> {
        if self.finished {
            return Ok(None);
        }
        loop {
            let Some(line) = self.lines.next() else {
                self.finished = true;
                info!(frames = self.line_no, "landmark replay finished");
                return Ok(None);
            };
            let line = line?;
            self.line_no += 1;
            if line.trim().is_empty() {
                debug!(line = self.line_no, "skipping blank replay line");
                continue;
            }
            return self.parse(&line, input.timestamp);
        }
    }

    fn name(&self) -> &'static str {
        "replay"
    }
}
