//! Gesture classification from hand landmarks.
//!
//! Looks only at which of the four long fingers are extended and maps that
//! pattern to one of a handful of gestures. Stateless: timing and debouncing
//! live in the stroke engine.

use crate::hand::{FINGER_TIPS, INDEX_TIP, LandmarkSample};
use crate::types::Point;

/// Recognized gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// Finger pattern with no meaning.
    None,
    /// All four fingers curled.
    Fist,
    /// Index finger only.
    Point,
    /// Index and middle.
    TwoFinger,
    /// Index, middle and ring.
    ThreeFinger,
    /// All four fingers up.
    FourFinger,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fist => "fist",
            Self::Point => "point",
            Self::TwoFinger => "two-finger",
            Self::ThreeFinger => "three-finger",
            Self::FourFinger => "four-finger",
        }
    }

    /// Map an index/middle/ring/pinky extension pattern to a gesture.
    pub fn from_fingers(fingers: [bool; 4]) -> Self {
        match fingers {
            [false, false, false, false] => Self::Fist,
            [true, true, false, false] => Self::TwoFinger,
            [true, false, false, false] => Self::Point,
            [true, true, true, true] => Self::FourFinger,
            [true, true, true, false] => Self::ThreeFinger,
            _ => Self::None,
        }
    }
}

/// What the classifier saw in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandPose {
    pub gesture: Gesture,
    /// Index fingertip in canvas pixels.
    pub point: Point,
}

/// Which of index/middle/ring/pinky are extended. A finger counts as extended
/// when its tip is higher in the frame (smaller y) than its middle (PIP) joint.
pub fn fingers_up(sample: &LandmarkSample) -> [bool; 4] {
    FINGER_TIPS.map(|tip| sample.landmark(tip).y < sample.landmark(tip - 2).y)
}

/// Classify one sample and locate the index fingertip on a `width`×`height`
/// canvas. Detector noise can put points slightly outside `[0, 1]`, so the
/// point is clamped to the canvas.
pub fn classify(sample: &LandmarkSample, width: usize, height: usize) -> HandPose {
    let tip = sample.landmark(INDEX_TIP);
    HandPose {
        gesture: Gesture::from_fingers(fingers_up(sample)),
        point: Point::new(scale(tip.x, width), scale(tip.y, height)),
    }
}

/// Normalized coordinate to a pixel index in `0..extent`.
fn scale(v: f32, extent: usize) -> i32 {
    let max = extent.saturating_sub(1) as i32;
    // `as` saturates and maps NaN to 0.
    ((v * extent as f32) as i32).clamp(0, max)
}
