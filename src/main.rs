// What you SEE:
// • The live camera (mirrored) with your drawing blended on top at half strength.
// • Point with the index finger to draw; two fingers change color; three undo;
//   four save a screenshot; hold a fist to wipe the board.
// • Without a landmark recording the "hand" is the mouse: hold LMB (or 1) to
//   draw, 2/3/4 for the finger counts, F (or 0) for a fist. ESC quits.

mod camera;
mod clock;
mod config;
mod detector;
mod draw;
mod engine;
mod error;
mod gesture;
mod hand;
mod palette;
mod screenshot;
mod status;
mod types;
mod undo;
mod vision;

use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{debug, info, warn};

use camera::CameraCapture;
use clock::{Clock, SystemClock};
use config::{Cli, WhiteboardConfig};
use detector::{FrameInput, HandDetector, MouseHand, ReplayDetector};
use draw::{Drawer, draw_hand_skeleton, draw_text_5x7, fill_disc, text_width_5x7};
use engine::StrokeEngine;
use error::Error;
use gesture::{Gesture, classify};
use screenshot::PngSink;
use types::FrameBuffer;
use vision::blend_half_into;

const WHITE: u32 = 0x00_FF_FF_FF;
const BONE_COLOR: u32 = 0x00_E0_E0_E0;
const JOINT_COLOR: u32 = 0x00_FF_00_00;
const CURSOR_RADIUS: i32 = 10;
const HUD_SCALE: i32 = 3;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_whiteboard=info".into()),
        )
        .init();

    info!("gesture-whiteboard v{} starting", env!("CARGO_PKG_VERSION"));

    /* --- Camera + window setup --- */
    let mut cam = CameraCapture::new(cli.camera, cli.width, cli.height, !cli.no_mirror)?;
    let (w, h) = cam.resolution();
    let (w, h) = (w as usize, h as usize);
    let mut drawer = Drawer::new("Gesture Whiteboard", w, h)?;

    /* --- Where hands come from, where screenshots go --- */
    let mut detector: Box<dyn HandDetector> = match &cli.landmarks {
        Some(path) => Box::new(ReplayDetector::open(path)?),
        None => Box::new(MouseHand),
    };
    info!(detector = detector.name(), "hand detector ready");

    let mut sink = PngSink::new(&cli.output_dir);
    info!(dir = %sink.dir().display(), "screenshots will be saved here");

    /* --- The whiteboard itself --- */
    let clock = SystemClock;
    let mut engine = StrokeEngine::new(WhiteboardConfig::with_size(w, h), clock);

    // The image actually shown each frame.
    let mut screen = FrameBuffer::blank(w, h);

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0");

    let mut last_gesture: Option<Gesture> = None;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Grab a fresh live frame. A bad read skips the frame, the window keeps pumping. */
        let Some(mut live) = frame_step("camera read", cam.next_frame()) else {
            drawer.present(&screen)?;
            continue;
        };

        /* 2) Find the hand. A detector hiccup only costs this frame. */
        let input = FrameInput {
            frame: &live,
            pointer: drawer.pointer_input(),
            timestamp: clock.now(),
        };
        let sample = match detector.detect(&input) {
            Ok(sample) => sample,
            Err(e) => {
                warn!(error = %e, "detector failed; treating frame as no hand");
                None
            }
        };
        let pose = sample.as_ref().map(|s| classify(s, w, h));
        let gesture = pose.map(|p| p.gesture);
        if gesture != last_gesture {
            debug!(
                gesture = gesture.map_or("no hand", |g| g.as_str()),
                at = ?sample.as_ref().map(|s| s.timestamp()),
                "gesture changed"
            );
            last_gesture = gesture;
        }

        /* 3) Skeleton overlay goes onto the camera image, so it also ends up in screenshots. */
        if let Some(sample) = &sample {
            if !cli.no_skeleton {
                draw_hand_skeleton(&mut live, sample, BONE_COLOR, JOINT_COLOR);
            }
        }

        /* 4) Let the engine act on the gesture. */
        engine.step(pose, &live, &mut sink);

        /* 5) Canvas over camera, then fingertip cursor and HUD on top. */
        if frame_step("blend", blend_half_into(&mut screen, &live, engine.canvas())).is_none() {
            drawer.present(&screen)?;
            continue;
        }

        let pen = engine.color();
        if engine.is_drawing() {
            if let Some(pose) = pose {
                fill_disc(&mut screen, pose.point, CURSOR_RADIUS, pen.rgb);
            }
        }

        if let Some(status) = engine.active_status() {
            draw_text_5x7(&mut screen, 40, 40, status, WHITE, HUD_SCALE + 1);
        }
        let fps_x = w as i32 - text_width_5x7(&hud_fps_text, HUD_SCALE) - 20;
        draw_text_5x7(&mut screen, fps_x, 20, &hud_fps_text, WHITE, HUD_SCALE);
        let color_text = format!("Color: {}", pen.name);
        draw_text_5x7(&mut screen, 10, h as i32 - 7 * HUD_SCALE - 20, &color_text, pen.rgb, HUD_SCALE);

        /* 6) Present to the window. */
        drawer.present(&screen)?;

        /* 7) FPS counter (log + HUD once per second) */
        frames_this_second += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(last_fps_time);
        if elapsed >= Duration::from_secs(1) {
            let fps = frames_this_second as f32 / elapsed.as_secs_f32();
            debug!(fps = fps as f64, undo_depth = engine.undo_depth(), "frame rate");
            hud_fps_text = format!("FPS: {}", fps as u32);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    info!("window closed, exiting");
    Ok(())
}

/// Result of one per-frame step; a failure is logged and costs only that frame.
fn frame_step<T>(what: &'static str, result: Result<T, Error>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "{what} failed; skipping frame");
            None
        }
    }
}
