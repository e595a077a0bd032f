//! The stroke engine: turns per-frame gestures into whiteboard edits.
//!
//! Owns the canvas and every piece of state that spans frames: the fist hold,
//! per-action debounce stamps, the stroke cursor, the pen color and the undo
//! history. Each call to [`StrokeEngine::step`] handles exactly one frame and
//! fires at most one action.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use crate::clock::Clock;
use crate::config::{self, WhiteboardConfig};
use crate::draw::draw_thick_line;
use crate::gesture::{Gesture, HandPose};
use crate::palette::PenColor;
use crate::screenshot::ScreenshotSink;
use crate::status::StatusMessage;
use crate::types::{FrameBuffer, Point};
use crate::undo::UndoStack;
use crate::vision::blend_half;

/// Something the engine did this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A pen segment was drawn. `started` is true for the first sample of a stroke.
    Stroke { from: Point, to: Point, started: bool },
    /// A held fist wiped the canvas.
    Cleared,
    ColorChanged(PenColor),
    ScreenshotSaved(PathBuf),
    ScreenshotFailed,
    Undone,
    NothingToUndo,
}

/// Progress of the current continuous fist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FistHold {
    Idle,
    Holding { since: Duration },
    /// Already cleared during this hold; stays here until the fist opens.
    Fired,
}

/// Discrete actions that are rate limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Debounced {
    Color = 0,
    Screenshot = 1,
    Undo = 2,
}

/// Last firing time of each debounced action.
#[derive(Debug, Clone, Default)]
struct DebounceClock {
    last: [Option<Duration>; 3],
}

impl DebounceClock {
    /// An action that never fired is always ready.
    fn ready(&self, action: Debounced, now: Duration, window: Duration) -> bool {
        match self.last[action as usize] {
            None => true,
            Some(at) => now.saturating_sub(at) > window,
        }
    }

    fn mark(&mut self, action: Debounced, now: Duration) {
        self.last[action as usize] = Some(now);
    }
}

pub struct StrokeEngine<C: Clock> {
    config: WhiteboardConfig,
    clock: C,
    canvas: FrameBuffer,
    /// Canvas pixel buffers, taken before each stroke or wipe.
    undo: UndoStack<Vec<u32>>,
    /// Last pen position of the stroke in progress; `None` between strokes.
    cursor: Option<Point>,
    fist: FistHold,
    debounce: DebounceClock,
    color_index: usize,
    status: Option<StatusMessage>,
}

impl<C: Clock> StrokeEngine<C> {
    pub fn new(config: WhiteboardConfig, clock: C) -> Self {
        Self {
            canvas: FrameBuffer::blank(config.width, config.height),
            undo: UndoStack::new(config.max_undo),
            cursor: None,
            fist: FistHold::Idle,
            debounce: DebounceClock::default(),
            color_index: 0,
            status: None,
            config,
            clock,
        }
    }

    /// Handle one frame. `pose` is `None` when no hand was detected, which
    /// counts as [`Gesture::None`]. `camera` is only read, for screenshots.
    pub fn step(
        &mut self,
        pose: Option<HandPose>,
        camera: &FrameBuffer,
        sink: &mut dyn ScreenshotSink,
    ) -> Option<Action> {
        let now = self.clock.now();
        let (gesture, point) = match pose {
            Some(p) => (p.gesture, Some(p.point)),
            None => (Gesture::None, None),
        };

        if gesture != Gesture::Fist {
            self.fist = FistHold::Idle;
        }
        if gesture != Gesture::Point {
            self.cursor = None;
        }

        let action = match (gesture, point) {
            (Gesture::Fist, _) => self.hold_fist(now),
            (Gesture::TwoFinger, _) => self.change_color(now),
            (Gesture::Point, Some(p)) => Some(self.draw_to(self.clamp(p))),
            (Gesture::FourFinger, _) => self.screenshot(now, camera, sink),
            (Gesture::ThreeFinger, _) => self.undo(now),
            (Gesture::None, _) | (Gesture::Point, None) => None,
        };

        if let Some(action) = &action {
            debug!(gesture = gesture.as_str(), ?action, undo_depth = self.undo.len(), "gesture fired");
        }
        action
    }

    fn hold_fist(&mut self, now: Duration) -> Option<Action> {
        match self.fist {
            FistHold::Idle => {
                self.fist = FistHold::Holding { since: now };
                None
            }
            FistHold::Holding { since } if now.saturating_sub(since) >= self.config.erase_hold => {
                self.snapshot();
                self.canvas.clear();
                self.fist = FistHold::Fired;
                self.set_status("Canvas Cleared", now, config::CLEARED_MSG);
                Some(Action::Cleared)
            }
            FistHold::Holding { .. } | FistHold::Fired => None,
        }
    }

    fn change_color(&mut self, now: Duration) -> Option<Action> {
        if !self.debounce.ready(Debounced::Color, now, self.config.debounce) {
            return None;
        }
        self.color_index = self.config.palette.next_index(self.color_index);
        let color = self.color();
        self.set_status(format!("Color: {}", color.name), now, config::COLOR_MSG);
        self.debounce.mark(Debounced::Color, now);
        Some(Action::ColorChanged(color))
    }

    fn draw_to(&mut self, to: Point) -> Action {
        let started = self.cursor.is_none();
        if started {
            // One snapshot per stroke, taken before its first mark.
            self.snapshot();
        }
        let from = self.cursor.unwrap_or(to);
        let rgb = self.color().rgb;
        draw_thick_line(&mut self.canvas, from, to, rgb, self.config.draw_thickness);
        self.cursor = Some(to);
        Action::Stroke { from, to, started }
    }

    fn screenshot(
        &mut self,
        now: Duration,
        camera: &FrameBuffer,
        sink: &mut dyn ScreenshotSink,
    ) -> Option<Action> {
        if !self.debounce.ready(Debounced::Screenshot, now, self.config.debounce) {
            return None;
        }
        self.debounce.mark(Debounced::Screenshot, now);

        let saved = blend_half(camera, &self.canvas).and_then(|composite| sink.save(&composite, now));
        match saved {
            Ok(path) => {
                self.set_status("Screenshot Saved", now, config::SCREENSHOT_MSG);
                Some(Action::ScreenshotSaved(path))
            }
            Err(e) => {
                warn!(error = %e, "screenshot failed");
                self.set_status("Screenshot Failed", now, config::SCREENSHOT_MSG);
                Some(Action::ScreenshotFailed)
            }
        }
    }

    fn undo(&mut self, now: Duration) -> Option<Action> {
        if !self.debounce.ready(Debounced::Undo, now, self.config.debounce) {
            return None;
        }
        self.debounce.mark(Debounced::Undo, now);

        match self.undo.pop() {
            Some(pixels) => {
                self.canvas.pixels = pixels;
                self.set_status("Undo", now, config::UNDO_MSG);
                Some(Action::Undone)
            }
            None => {
                self.set_status("Nothing to Undo", now, config::UNDO_MSG);
                Some(Action::NothingToUndo)
            }
        }
    }

    fn snapshot(&mut self) {
        if self.undo.push(self.canvas.pixels.clone()).is_some() {
            debug!(capacity = self.undo.capacity(), "oldest undo snapshot dropped");
        }
    }

    fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(0, self.canvas.width.saturating_sub(1) as i32),
            p.y.clamp(0, self.canvas.height.saturating_sub(1) as i32),
        )
    }

    fn set_status(&mut self, text: impl Into<String>, now: Duration, ttl: Duration) {
        self.status = Some(StatusMessage::new(text, now, ttl));
    }

    pub fn canvas(&self) -> &FrameBuffer {
        &self.canvas
    }

    /// Active pen color.
    pub fn color(&self) -> PenColor {
        self.config.palette.get(self.color_index)
    }

    /// Status text, if the latest message has not expired yet.
    pub fn active_status(&self) -> Option<&str> {
        let now = self.clock.now();
        self.status
            .as_ref()
            .filter(|s| s.is_active(now))
            .map(|s| s.text.as_str())
    }

    /// True while a stroke is in progress.
    pub fn is_drawing(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::Error;

    const W: usize = 64;
    const H: usize = 48;

    /// Records every composite instead of writing files.
    #[derive(Default)]
    struct RecordingSink {
        saved: Vec<(FrameBuffer, Duration)>,
        fail: bool,
    }

    impl ScreenshotSink for RecordingSink {
        fn save(&mut self, image: &FrameBuffer, taken_at: Duration) -> Result<PathBuf, Error> {
            if self.fail {
                return Err(Error::OutputDir {
                    path: PathBuf::from("/nowhere"),
                    source: std::io::Error::other("read-only"),
                });
            }
            self.saved.push((image.clone(), taken_at));
            Ok(PathBuf::from(format!("whiteboard_{}.png", taken_at.as_secs())))
        }
    }

    struct Harness {
        engine: StrokeEngine<ManualClock>,
        clock: ManualClock,
        camera: FrameBuffer,
        sink: RecordingSink,
    }

    impl Harness {
        fn new() -> Self {
            let clock = ManualClock::default();
            Self {
                engine: StrokeEngine::new(WhiteboardConfig::with_size(W, H), clock.clone()),
                clock,
                camera: FrameBuffer::blank(W, H),
                sink: RecordingSink::default(),
            }
        }

        fn at(&mut self, millis: u64, gesture: Gesture, x: i32, y: i32) -> Option<Action> {
            self.clock.set_millis(millis);
            let pose = HandPose { gesture, point: Point::new(x, y) };
            self.engine.step(Some(pose), &self.camera, &mut self.sink)
        }

        fn gesture(&mut self, millis: u64, gesture: Gesture) -> Option<Action> {
            self.at(millis, gesture, 0, 0)
        }

        fn no_hand(&mut self, millis: u64) -> Option<Action> {
            self.clock.set_millis(millis);
            self.engine.step(None, &self.camera, &mut self.sink)
        }

        fn scribble(&mut self, millis: u64, x: i32, y: i32) {
            self.at(millis, Gesture::Point, x, y);
            self.no_hand(millis + 1);
        }
    }

    const RED: u32 = 0x00_FF_00_00;

    #[test]
    fn new_engine() {
        let h = Harness::new();
        assert!(h.engine.canvas().is_blank());
        assert_eq!(h.engine.color().name, "Red");
        assert_eq!(h.engine.undo_depth(), 0);
        assert!(h.engine.active_status().is_none());
        assert!(!h.engine.is_drawing());
    }

    #[test]
    fn fist_clears_after_hold() {
        let mut h = Harness::new();
        h.scribble(0, 10, 10);
        assert_eq!(h.gesture(1000, Gesture::Fist), None);
        assert_eq!(h.gesture(1300, Gesture::Fist), None);
        assert!(!h.engine.canvas().is_blank());
        assert_eq!(h.gesture(1600, Gesture::Fist), Some(Action::Cleared));
        assert!(h.engine.canvas().is_blank());
        assert_eq!(h.engine.active_status(), Some("Canvas Cleared"));
        assert_eq!(h.engine.undo_depth(), 2);
    }

    #[test]
    fn fist_clears_once_per_hold() {
        let mut h = Harness::new();
        let mut cleared = 0;
        for t in (0..10_000).step_by(33) {
            if h.gesture(t, Gesture::Fist) == Some(Action::Cleared) {
                cleared += 1;
            }
        }
        assert_eq!(cleared, 1);
        assert_eq!(h.engine.undo_depth(), 1);

        // Opening the hand re-arms the hold.
        h.no_hand(10_000);
        h.gesture(10_100, Gesture::Fist);
        assert_eq!(h.gesture(10_700, Gesture::Fist), Some(Action::Cleared));
    }

    #[test]
    fn short_fist_then_full_hold() {
        let mut h = Harness::new();
        let mut events = Vec::new();
        events.push(h.gesture(0, Gesture::Fist));
        events.push(h.gesture(300, Gesture::Fist));
        events.push(h.gesture(350, Gesture::None));
        events.push(h.gesture(400, Gesture::Fist));
        events.push(h.gesture(700, Gesture::Fist));
        events.push(h.gesture(1000, Gesture::Fist));
        let cleared: Vec<_> = events.iter().enumerate().filter(|(_, e)| **e == Some(Action::Cleared)).collect();
        assert_eq!(cleared.len(), 1);
        assert_eq!(cleared[0].0, 5);
    }

    #[test]
    fn no_hand_resets_fist_hold() {
        let mut h = Harness::new();
        h.gesture(0, Gesture::Fist);
        h.no_hand(500);
        h.gesture(550, Gesture::Fist);
        assert_eq!(h.gesture(700, Gesture::Fist), None);
        assert_eq!(h.gesture(1150, Gesture::Fist), Some(Action::Cleared));
    }

    #[test]
    fn color_debounce() {
        let mut h = Harness::new();
        let mut fired = 0;
        for t in (0..450).step_by(30) {
            if matches!(h.gesture(t, Gesture::TwoFinger), Some(Action::ColorChanged(_))) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert_eq!(h.engine.color().name, "Green");
        assert_eq!(h.engine.active_status(), Some("Color: Green"));

        // Exactly one window later is still too soon; just past it fires.
        assert_eq!(h.gesture(450, Gesture::TwoFinger), None);
        assert!(matches!(h.gesture(451, Gesture::TwoFinger), Some(Action::ColorChanged(c)) if c.name == "Blue"));
    }

    #[test]
    fn color_cycles_through_palette() {
        let mut h = Harness::new();
        let mut names = Vec::new();
        for i in 0..5 {
            if let Some(Action::ColorChanged(c)) = h.gesture(i * 500, Gesture::TwoFinger) {
                names.push(c.name);
            }
        }
        assert_eq!(names, ["Green", "Blue", "Yellow", "Cyan", "Red"]);
        assert_eq!(h.engine.color().name, "Red");
        assert_eq!(h.engine.undo_depth(), 0);
    }

    #[test]
    fn point_draws_in_active_color() {
        let mut h = Harness::new();
        let action = h.at(0, Gesture::Point, 10, 10);
        assert_eq!(
            action,
            Some(Action::Stroke { from: Point::new(10, 10), to: Point::new(10, 10), started: true })
        );
        assert_eq!(h.engine.canvas().get(10, 10), Some(RED));

        let action = h.at(16, Gesture::Point, 20, 20);
        assert_eq!(
            action,
            Some(Action::Stroke { from: Point::new(10, 10), to: Point::new(20, 20), started: false })
        );
        assert_eq!(h.engine.canvas().get(15, 15), Some(RED));
        assert!(h.engine.is_drawing());
    }

    #[test]
    fn one_snapshot_per_stroke() {
        let mut h = Harness::new();
        for (i, t) in (0..1000).step_by(20).enumerate() {
            h.at(t, Gesture::Point, 5 + i as i32 / 2, 20);
        }
        assert_eq!(h.engine.undo_depth(), 1);

        h.gesture(1000, Gesture::None);
        h.at(1020, Gesture::Point, 40, 40);
        assert_eq!(h.engine.undo_depth(), 2);
    }

    #[test]
    fn two_strokes_scenario() {
        let mut h = Harness::new();
        h.at(0, Gesture::Point, 10, 10);
        h.at(33, Gesture::Point, 20, 20);
        h.gesture(66, Gesture::None);
        let last = h.at(100, Gesture::Point, 30, 30);
        assert_eq!(
            last,
            Some(Action::Stroke { from: Point::new(30, 30), to: Point::new(30, 30), started: true })
        );
        assert_eq!(h.engine.undo_depth(), 2);

        // Nothing joins the end of the first stroke to the second dot.
        assert_eq!(h.engine.canvas().get(15, 15), Some(RED));
        assert_eq!(h.engine.canvas().get(30, 30), Some(RED));
        assert_eq!(h.engine.canvas().get(25, 25), Some(0));
    }

    #[test]
    fn other_gestures_end_the_stroke() {
        let mut h = Harness::new();
        h.at(0, Gesture::Point, 10, 10);
        h.gesture(10, Gesture::TwoFinger);
        assert!(!h.engine.is_drawing());
        let next = h.at(20, Gesture::Point, 40, 10);
        assert!(matches!(next, Some(Action::Stroke { started: true, .. })));
        // Drawn in the new color.
        assert_eq!(h.engine.canvas().get(40, 10), Some(0x00_00_FF_00));
    }

    #[test]
    fn undo_restores_in_reverse_order() {
        let mut h = Harness::new();
        let mut states = vec![h.engine.canvas().clone()];
        for i in 0..4 {
            h.scribble(i * 100, 8 + i as i32 * 12, 24);
            states.push(h.engine.canvas().clone());
        }
        assert_eq!(h.engine.undo_depth(), 4);

        for i in 0..4u64 {
            assert_eq!(h.gesture(1000 + i * 500, Gesture::ThreeFinger), Some(Action::Undone));
            assert_eq!(h.engine.canvas(), &states[3 - i as usize]);
        }
        assert!(h.engine.canvas().is_blank());
        assert_eq!(h.gesture(3000, Gesture::ThreeFinger), Some(Action::NothingToUndo));
    }

    #[test]
    fn undo_history_is_bounded() {
        let mut h = Harness::new();
        let mut states = Vec::new();
        for i in 0..15u64 {
            states.push(h.engine.canvas().clone());
            h.scribble(i * 10, (i as i32 * 4) % W as i32, (i as i32 * 3) % H as i32);
        }
        assert_eq!(h.engine.undo_depth(), 10);

        for i in 0..10u64 {
            h.gesture(1000 + i * 500, Gesture::ThreeFinger);
            assert_eq!(h.engine.canvas(), &states[14 - i as usize]);
        }
        // Snapshots from the first five strokes were evicted.
        assert_eq!(h.gesture(10_000, Gesture::ThreeFinger), Some(Action::NothingToUndo));
        assert_eq!(h.engine.canvas(), &states[5]);
    }

    #[test]
    fn undo_on_empty_stack() {
        let mut h = Harness::new();
        assert_eq!(h.gesture(0, Gesture::ThreeFinger), Some(Action::NothingToUndo));
        assert_eq!(h.engine.active_status(), Some("Nothing to Undo"));
        assert!(h.engine.canvas().is_blank());
    }

    #[test]
    fn undo_debounce_counts_empty_attempts() {
        let mut h = Harness::new();
        h.gesture(0, Gesture::ThreeFinger);
        h.scribble(100, 5, 5);
        assert_eq!(h.gesture(200, Gesture::ThreeFinger), None);
        assert_eq!(h.gesture(500, Gesture::ThreeFinger), Some(Action::Undone));
    }

    #[test]
    fn undo_after_clear_brings_drawing_back() {
        let mut h = Harness::new();
        h.scribble(0, 30, 30);
        let drawn = h.engine.canvas().clone();
        h.gesture(100, Gesture::Fist);
        h.gesture(800, Gesture::Fist);
        assert!(h.engine.canvas().is_blank());
        assert_eq!(h.gesture(900, Gesture::ThreeFinger), Some(Action::Undone));
        assert_eq!(h.engine.canvas(), &drawn);
    }

    #[test]
    fn screenshot_debounce() {
        let mut h = Harness::new();
        h.clock.set_secs(1_700_000_000.0);
        let base = 1_700_000_000_000u64;
        assert!(matches!(h.gesture(base, Gesture::FourFinger), Some(Action::ScreenshotSaved(_))));
        assert_eq!(h.gesture(base + 300, Gesture::FourFinger), None);
        assert_eq!(h.sink.saved.len(), 1);
        assert_eq!(h.sink.saved[0].1.as_secs(), 1_700_000_000);
        assert_eq!(h.engine.active_status(), Some("Screenshot Saved"));
        assert!(matches!(h.gesture(base + 500, Gesture::FourFinger), Some(Action::ScreenshotSaved(_))));
        assert_eq!(h.sink.saved.len(), 2);
    }

    #[test]
    fn screenshot_blends_canvas_over_camera() {
        let mut h = Harness::new();
        h.camera.pixels.fill(0x00_40_40_40);
        h.scribble(0, 32, 24);
        h.gesture(100, Gesture::FourFinger);
        let (shot, _) = &h.sink.saved[0];
        assert_eq!(shot.get(32, 24), Some(0x00_A0_20_20));
        assert_eq!(shot.get(0, 0), Some(0x00_20_20_20));
        // Non-destructive: no snapshot beyond the stroke's own.
        assert_eq!(h.engine.undo_depth(), 1);
    }

    #[test]
    fn screenshot_failure_is_reported() {
        let mut h = Harness::new();
        h.sink.fail = true;
        assert_eq!(h.gesture(0, Gesture::FourFinger), Some(Action::ScreenshotFailed));
        assert_eq!(h.engine.active_status(), Some("Screenshot Failed"));
        // Still debounced after a failure.
        assert_eq!(h.gesture(100, Gesture::FourFinger), None);
    }

    #[test]
    fn screenshot_with_mismatched_camera_fails_softly() {
        let mut h = Harness::new();
        h.camera = FrameBuffer::blank(W / 2, H);
        assert_eq!(h.gesture(0, Gesture::FourFinger), Some(Action::ScreenshotFailed));
        assert!(h.sink.saved.is_empty());
    }

    #[test]
    fn status_expires() {
        let mut h = Harness::new();
        h.gesture(0, Gesture::ThreeFinger);
        h.clock.set_millis(799);
        assert_eq!(h.engine.active_status(), Some("Nothing to Undo"));
        h.clock.set_millis(800);
        assert_eq!(h.engine.active_status(), None);
    }

    #[test]
    fn out_of_range_point_is_clamped() {
        let mut h = Harness::new();
        let action = h.at(0, Gesture::Point, 500, -20);
        assert_eq!(
            action,
            Some(Action::Stroke { from: Point::new(63, 0), to: Point::new(63, 0), started: true })
        );
        assert_eq!(h.engine.canvas().get(63, 0), Some(RED));
    }
}
