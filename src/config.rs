// Startup configuration: the fixed gesture/drawing constants plus the few
// options that can be picked on the command line. Nothing here changes while
// the whiteboard is running.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::palette::Palette;

pub const CAM_WIDTH: u32 = 1280;
pub const CAM_HEIGHT: u32 = 720;
pub const MAX_UNDO: usize = 10;
pub const DRAW_THICKNESS: i32 = 10;
pub const ERASE_HOLD: Duration = Duration::from_millis(600);
pub const DEBOUNCE: Duration = Duration::from_millis(450);
pub const SCREENSHOT_DIR: &str = "screenshots";

/// How long each status message stays on the HUD.
pub const CLEARED_MSG: Duration = Duration::from_millis(1000);
pub const COLOR_MSG: Duration = Duration::from_millis(1000);
pub const SCREENSHOT_MSG: Duration = Duration::from_millis(1200);
pub const UNDO_MSG: Duration = Duration::from_millis(800);

/// Everything the stroke engine needs to know up front.
#[derive(Debug, Clone)]
pub struct WhiteboardConfig {
    /// Canvas size in pixels (matches the camera frame).
    pub width: usize,
    pub height: usize,
    /// Maximum number of canvas snapshots kept for undo.
    pub max_undo: usize,
    /// Pen width in pixels.
    pub draw_thickness: i32,
    /// How long a fist has to be held before the canvas is wiped.
    pub erase_hold: Duration,
    /// Minimum gap between two firings of the same discrete action.
    pub debounce: Duration,
    pub palette: Palette,
}

impl WhiteboardConfig {
    /// Defaults, sized to the resolution the camera actually delivers.
    pub fn with_size(width: usize, height: usize) -> Self {
        Self { width, height, ..Self::default() }
    }
}

impl Default for WhiteboardConfig {
    fn default() -> Self {
        Self {
            width: CAM_WIDTH as usize,
            height: CAM_HEIGHT as usize,
            max_undo: MAX_UNDO,
            draw_thickness: DRAW_THICKNESS,
            erase_hold: ERASE_HOLD,
            debounce: DEBOUNCE,
            palette: Palette::default(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "gesture-whiteboard", about = "Draw on a virtual whiteboard with hand gestures")]
pub struct Cli {
    /// Camera device index.
    #[arg(long, default_value_t = 0)]
    pub camera: u32,

    /// Requested capture width (the camera may pick the closest it supports).
    #[arg(long, default_value_t = CAM_WIDTH)]
    pub width: u32,

    /// Requested capture height.
    #[arg(long, default_value_t = CAM_HEIGHT)]
    pub height: u32,

    /// Where screenshots are written.
    #[arg(long, default_value = SCREENSHOT_DIR)]
    pub output_dir: PathBuf,

    /// Replay recorded hand landmarks (JSON lines) instead of the mouse hand.
    #[arg(long)]
    pub landmarks: Option<PathBuf>,

    /// Show the camera as-is instead of mirrored.
    #[arg(long)]
    pub no_mirror: bool,

    /// Don't draw the detected hand skeleton.
    #[arg(long)]
    pub no_skeleton: bool,
}
