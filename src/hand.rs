//! Hand landmark data as delivered by a detector.
//!
//! Uses the common 21-point hand layout: wrist, then four joints per finger
//! from the knuckle out to the tip. Coordinates are normalized to `[0, 1]` per
//! axis with y growing downwards (image convention).

use std::time::Duration;

use crate::error::Error;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Number of landmarks in one hand.
pub const LANDMARK_COUNT: usize = 21;

/// Tips of the four long fingers, index first. The thumb is ignored.
pub const FINGER_TIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Bones drawn for the skeleton overlay.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (WRIST, PINKY_MCP),
];

/// One normalized joint position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// All joints of one detected hand for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSample {
    landmarks: Vec<Landmark>,
    timestamp: Duration,
}

impl LandmarkSample {
    /// Rejects samples with fewer than [`LANDMARK_COUNT`] joints; extra joints
    /// are kept and ignored.
    pub fn new(landmarks: Vec<Landmark>, timestamp: Duration) -> Result<Self, Error> {
        if landmarks.len() < LANDMARK_COUNT {
            return Err(Error::MalformedSample {
                found: landmarks.len(),
                needed: LANDMARK_COUNT,
            });
        }
        Ok(Self { landmarks, timestamp })
    }

    /// Build a plausible hand whose index tip sits at `(tip_x, tip_y)` and whose
    /// index/middle/ring/pinky fingers are extended per `extended`.
    pub fn synthetic(tip_x: f32, tip_y: f32, extended: [bool; 4], timestamp: Duration) -> Self {
        const SPREAD: f32 = 0.03;   // gap between neighbouring fingers
        const SEGMENT: f32 = 0.035; // length of one finger bone

        let mut landmarks = vec![Landmark::default(); LANDMARK_COUNT];
        let knuckle_y = tip_y + 4.0 * SEGMENT;
        landmarks[WRIST] = Landmark::new(tip_x + SPREAD, knuckle_y + 3.0 * SEGMENT, 0.0);

        for (finger, &tip) in FINGER_TIPS.iter().enumerate() {
            let x = tip_x + finger as f32 * SPREAD;
            let mcp = tip - 3;
            landmarks[mcp] = Landmark::new(x, knuckle_y, 0.0);
            if extended[finger] {
                // Straight up from the knuckle; the index tip lands on (tip_x, tip_y).
                for (step, joint) in (mcp + 1..tip).enumerate() {
                    landmarks[joint] = Landmark::new(x, knuckle_y - (step + 1) as f32 * SEGMENT, 0.0);
                }
                landmarks[tip] = Landmark::new(x, tip_y, 0.0);
            } else {
                // Curled: PIP above the knuckle, DIP and tip folded back under it.
                landmarks[mcp + 1] = Landmark::new(x, knuckle_y - SEGMENT, -0.02);
                landmarks[mcp + 2] = Landmark::new(x, knuckle_y - 0.5 * SEGMENT, -0.04);
                landmarks[tip] = Landmark::new(x, knuckle_y + 0.2 * SEGMENT, -0.03);
            }
        }

        let thumb_x = tip_x - SPREAD;
        for (step, joint) in (THUMB_CMC..=THUMB_TIP).enumerate() {
            landmarks[joint] = Landmark::new(
                thumb_x - step as f32 * 0.5 * SEGMENT,
                knuckle_y + (2.0 - step as f32 * 0.5) * SEGMENT,
                0.0,
            );
        }

        Self { landmarks, timestamp }
    }

    pub fn landmark(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn timestamp(&self) -> Duration {
        self.timestamp
    }
}
