//! Easing and the timed animation phases.
//!
//! Every phase is an immutable value. Rendering a frame is a pure function
//! of a [`FrameTick`] (elapsed time since the phase started plus the frame
//! index) and the phase parameters, so phases can be tested without a clock
//! and replayed from any point.
//!
//! | Phase | Advances by | Ends |
//! |-------|-------------|------|
//! | Spinner | wall clock, one glyph per interval | budget elapsed |
//! | Radial fill | wall clock, 3-segment eased cycle | budget elapsed, or never |
//! | Scroll | frame index, 1px per tick | only when stopped |
//! | Sequence | wall clock, per-frame durations | budget elapsed |
//!
//! # Radial Fill Cycle
//!
//! ```text
//! 100% |                         ___
//!      |                      _/
//!  50% |      ___            /
//!      |    /     \_       /
//!  25% |  /          `---'
//!   0% |/
//!      +--------+--------+--------+
//!      0s       1s       2s       3s
//! ```
//!
//! Each segment uses cosine easing
//! `ease(a, b, t) = a + (b - a) * (1 - cos(pi * t)) / 2`, so the cycle is
//! continuous at every segment boundary.

use alloc::string::String;
use core::f32::consts::PI;
use core::time::Duration;

use embedded_graphics::pixelcolor::Rgb888;

use crate::canvas::Canvas;
use crate::colors::{AMBER, CYAN};
use crate::config::{RADIAL_FRAME_TIME, SCROLL_TICK, SPINNER_INTERVAL, SPINNER_X, SPINNER_Y};
use crate::fonts::Font;
use crate::image::{DecodedImage, draw_frame};
use crate::widgets::draw_rings;

// =============================================================================
// Easing
// =============================================================================

/// Cosine ease from `a` to `b`. `t` is clamped to `[0, 1]`.
#[inline]
pub fn ease(
    a: f32,
    b: f32,
    t: f32,
) -> f32 {
    let t = t.clamp(0.0, 1.0);
    a + (b - a) * (1.0 - libm::cosf(PI * t)) / 2.0
}

/// One eased segment of a piecewise animation curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub from: f32,
    pub to: f32,
    pub span: Duration,
}

impl Segment {
    pub const fn new(
        from: f32,
        to: f32,
        span: Duration,
    ) -> Self {
        Self { from, to, span }
    }

    /// Value `offset` into this segment.
    pub fn value_at(
        &self,
        offset: Duration,
    ) -> f32 {
        if self.span.is_zero() {
            return self.to;
        }
        ease(self.from, self.to, offset.as_secs_f32() / self.span.as_secs_f32())
    }
}

/// Default radial fill curve: 0 -> 50 -> 25 -> 100 percent, one second each.
pub const RADIAL_SEGMENTS: [Segment; 3] = [
    Segment::new(0.0, 50.0, Duration::from_secs(1)),
    Segment::new(50.0, 25.0, Duration::from_secs(1)),
    Segment::new(25.0, 100.0, Duration::from_secs(1)),
];

/// Remainder of `elapsed` divided by `period`. A zero period yields zero.
pub fn wrap_duration(
    elapsed: Duration,
    period: Duration,
) -> Duration {
    let period = period.as_nanos();
    if period == 0 {
        return Duration::ZERO;
    }
    Duration::from_nanos((elapsed.as_nanos() % period) as u64)
}

/// Evaluate a piecewise curve at `elapsed`, looping over the segments' total span.
pub fn piecewise_value(
    segments: &[Segment],
    elapsed: Duration,
) -> f32 {
    let period: Duration = segments.iter().map(|s| s.span).sum();
    let mut offset = wrap_duration(elapsed, period);

    for segment in segments {
        if offset < segment.span {
            return segment.value_at(offset);
        }
        offset -= segment.span;
    }
    segments.last().map_or(0.0, |s| s.to)
}

/// Fill percentage of the default radial cycle at `elapsed`.
pub fn radial_fill_percent(elapsed: Duration) -> f32 { piecewise_value(&RADIAL_SEGMENTS, elapsed) }

// =============================================================================
// Frame Tick
// =============================================================================

/// Time and frame position handed to a phase for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameTick {
    /// Time since the phase started.
    pub elapsed: Duration,
    /// Number of frames already presented in this phase.
    pub index: u64,
}

// =============================================================================
// Spinner
// =============================================================================

/// Rotation glyphs of the loading spinner.
pub const SPINNER_GLYPHS: [char; 4] = ['|', '/', '-', '\\'];

/// Single-glyph spinner cycling on a fixed interval.
#[derive(Clone, Debug)]
pub struct Spinner {
    pub font: Font,
    pub x: i32,
    pub y: i32,
    pub interval: Duration,
    pub color: Rgb888,
}

impl Spinner {
    /// Spinner at the default position and interval.
    pub fn new(font: Font) -> Self {
        Self { font, x: SPINNER_X, y: SPINNER_Y, interval: SPINNER_INTERVAL, color: CYAN }
    }

    /// Index into [`SPINNER_GLYPHS`] shown at `elapsed`.
    pub fn glyph_index(
        &self,
        elapsed: Duration,
    ) -> usize {
        let steps = elapsed.as_nanos() / self.interval.as_nanos().max(1);
        (steps % SPINNER_GLYPHS.len() as u128) as usize
    }

    fn render(
        &self,
        canvas: &mut Canvas,
        tick: FrameTick,
    ) {
        let mut buf = [0u8; 4];
        let glyph = SPINNER_GLYPHS[self.glyph_index(tick.elapsed)].encode_utf8(&mut buf);
        self.font.draw(canvas, self.x, self.y, glyph, self.color);
    }

    fn hold(
        &self,
        tick: FrameTick,
    ) -> Duration {
        self.interval - wrap_duration(tick.elapsed, self.interval)
    }
}

// =============================================================================
// Radial Fill
// =============================================================================

/// Concentric rings growing and shrinking along an eased curve.
#[derive(Clone, Debug)]
pub struct RadialFill {
    pub segments: [Segment; 3],
    pub frame_time: Duration,
    pub color: Rgb888,
}

impl Default for RadialFill {
    fn default() -> Self { Self { segments: RADIAL_SEGMENTS, frame_time: RADIAL_FRAME_TIME, color: AMBER } }
}

impl RadialFill {
    /// Fill percentage at `elapsed`.
    pub fn percent(
        &self,
        elapsed: Duration,
    ) -> f32 {
        piecewise_value(&self.segments, elapsed)
    }

    /// Ring radius for `percent` on a canvas whose largest radius is `max_radius`.
    pub fn radius_for(
        percent: f32,
        max_radius: u32,
    ) -> u32 {
        libm::roundf(percent.clamp(0.0, 100.0) / 100.0 * max_radius as f32) as u32
    }

    fn render(
        &self,
        canvas: &mut Canvas,
        tick: FrameTick,
    ) {
        let max_radius = canvas.width().min(canvas.height()) / 2;
        let radius = Self::radius_for(self.percent(tick.elapsed), max_radius);
        let cx = (canvas.width() / 2) as i32;
        let cy = (canvas.height() / 2) as i32;
        draw_rings(canvas, cx, cy, radius, self.color);
    }
}

// =============================================================================
// Scrolling Text
// =============================================================================

/// Text marquee moving one pixel left per tick.
///
/// The text enters at the right edge (x = canvas width) and restarts there
/// as soon as its last column has left the screen, so one full pass takes
/// `canvas_width + text_width` ticks.
#[derive(Clone, Debug)]
pub struct ScrollingText {
    pub text: String,
    pub font: Font,
    pub y: i32,
    pub tick: Duration,
    pub color: Rgb888,
}

impl ScrollingText {
    pub fn new(
        text: impl Into<String>,
        font: Font,
        y: i32,
    ) -> Self {
        Self { text: text.into(), font, y, tick: SCROLL_TICK, color: CYAN }
    }

    /// Rendered width of the text.
    pub fn text_width(&self) -> i32 { self.font.text_width(&self.text) }

    /// Left edge of the text after `tick` steps on a canvas `canvas_width` wide.
    pub fn position_at(
        &self,
        tick: u64,
        canvas_width: u32,
    ) -> i32 {
        let period = u64::from(canvas_width) + self.text_width() as u64;
        canvas_width as i32 - (tick % period.max(1)) as i32
    }

    fn render(
        &self,
        canvas: &mut Canvas,
        tick: FrameTick,
    ) {
        let x = self.position_at(tick.index, canvas.width());
        self.font.draw(canvas, x, self.y, &self.text, self.color);
    }
}

// =============================================================================
// Sequence Playback
// =============================================================================

/// Looped playback of a multi-frame image, each frame held for its own duration.
#[derive(Clone, Debug)]
pub struct SequencePlayback {
    pub image: DecodedImage,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl SequencePlayback {
    /// Play `image` scaled to fill a `width x height` canvas.
    pub fn fullscreen(
        image: DecodedImage,
        width: u32,
        height: u32,
    ) -> Self {
        Self { image, x: 0, y: 0, width, height }
    }

    /// Frame index on screen at `elapsed` and the time left until the next frame.
    pub fn frame_at(
        &self,
        elapsed: Duration,
    ) -> (usize, Duration) {
        let mut offset = wrap_duration(elapsed, self.image.total_duration());
        for (index, frame) in self.image.frames().iter().enumerate() {
            if offset < frame.duration() {
                return (index, frame.duration() - offset);
            }
            offset -= frame.duration();
        }
        (0, self.image.first_frame().duration())
    }

    fn render(
        &self,
        canvas: &mut Canvas,
        tick: FrameTick,
    ) {
        let (index, _) = self.frame_at(tick.elapsed);
        draw_frame(canvas, &self.image.frames()[index], self.width, self.height, self.x, self.y);
    }
}

// =============================================================================
// Animation Phase
// =============================================================================

/// What a phase draws.
#[derive(Clone, Debug)]
pub enum PhaseKind {
    Spinner(Spinner),
    RadialFill(RadialFill),
    Scroll(ScrollingText),
    Sequence(SequencePlayback),
}

/// Immutable timed segment run by the [`Scheduler`](crate::scheduler::Scheduler).
#[derive(Clone, Debug)]
pub struct AnimationPhase {
    kind: PhaseKind,
    budget: Option<Duration>,
}

impl AnimationPhase {
    /// Phase with an explicit budget; `None` runs until the caller stops it.
    pub fn new(
        kind: PhaseKind,
        budget: Option<Duration>,
    ) -> Self {
        Self { kind, budget }
    }

    /// Loading spinner for `duration`.
    pub fn spinner(
        font: Font,
        duration: Duration,
    ) -> Self {
        Self::new(PhaseKind::Spinner(Spinner::new(font)), Some(duration))
    }

    /// Radial fill, optionally bounded.
    pub fn radial_fill(budget: Option<Duration>) -> Self {
        Self::new(PhaseKind::RadialFill(RadialFill::default()), budget)
    }

    /// Endless marquee. Only the scheduler's stop predicate ends it.
    pub fn scroll(text: ScrollingText) -> Self { Self::new(PhaseKind::Scroll(text), None) }

    /// Looped playback for a total wall-clock `budget`.
    pub fn sequence(
        playback: SequencePlayback,
        budget: Duration,
    ) -> Self {
        Self::new(PhaseKind::Sequence(playback), Some(budget))
    }

    /// Short name for logs.
    pub const fn name(&self) -> &'static str {
        match self.kind {
            PhaseKind::Spinner(_) => "spinner",
            PhaseKind::RadialFill(_) => "radial-fill",
            PhaseKind::Scroll(_) => "scroll",
            PhaseKind::Sequence(_) => "sequence",
        }
    }

    /// Wall-clock budget, if the phase ends on its own.
    #[inline]
    pub const fn budget(&self) -> Option<Duration> { self.budget }

    /// Whether the budget has been used up at `elapsed`.
    pub fn is_finished(
        &self,
        elapsed: Duration,
    ) -> bool {
        self.budget.is_some_and(|budget| elapsed >= budget)
    }

    /// Draw the frame for `tick` onto a cleared canvas.
    pub fn render(
        &self,
        canvas: &mut Canvas,
        tick: FrameTick,
    ) {
        match &self.kind {
            PhaseKind::Spinner(spinner) => spinner.render(canvas, tick),
            PhaseKind::RadialFill(fill) => fill.render(canvas, tick),
            PhaseKind::Scroll(scroll) => scroll.render(canvas, tick),
            PhaseKind::Sequence(playback) => playback.render(canvas, tick),
        }
    }

    /// How long the frame for `tick` should stay on screen, never past the budget.
    pub fn hold(
        &self,
        tick: FrameTick,
    ) -> Duration {
        let hold = match &self.kind {
            PhaseKind::Spinner(spinner) => spinner.hold(tick),
            PhaseKind::RadialFill(fill) => fill.frame_time,
            PhaseKind::Scroll(scroll) => scroll.tick,
            PhaseKind::Sequence(playback) => playback.frame_at(tick.elapsed).1,
        };
        match self.budget {
            Some(budget) => hold.min(budget.saturating_sub(tick.elapsed)),
            None => hold,
        }
    }
}

// =============================================================================
// Unit Tests (run on host with: cargo test -p matrix-common)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, BLUE, GREEN, RED};

    fn ms(millis: u64) -> Duration { Duration::from_millis(millis) }

    fn lit(canvas: &Canvas) -> usize { canvas.pixels().iter().filter(|&&p| p != BLACK).count() }

    #[test]
    fn test_ease_endpoints() {
        for (a, b) in [(0.0, 50.0), (50.0, 25.0), (25.0, 100.0), (-10.0, 10.0), (7.0, 7.0)] {
            assert_eq!(ease(a, b, 0.0), a);
            assert_eq!(ease(a, b, 1.0), b);
        }
    }

    #[test]
    fn test_ease_midpoint_and_clamp() {
        assert!((ease(0.0, 100.0, 0.5) - 50.0).abs() < 1e-4);
        assert_eq!(ease(0.0, 100.0, -3.0), 0.0);
        assert_eq!(ease(0.0, 100.0, 7.0), 100.0);
    }

    #[test]
    fn test_ease_is_monotonic() {
        let mut prev = ease(25.0, 100.0, 0.0);
        for step in 1..=100 {
            let value = ease(25.0, 100.0, step as f32 / 100.0);
            assert!(value >= prev, "easing should never move backwards");
            prev = value;
        }
    }

    #[test]
    fn test_radial_cycle_period() {
        let period: Duration = RADIAL_SEGMENTS.iter().map(|s| s.span).sum();
        assert_eq!(period, crate::config::RADIAL_PERIOD);
    }

    #[test]
    fn test_radial_segment_boundaries() {
        assert_eq!(radial_fill_percent(Duration::ZERO), 0.0);
        assert_eq!(radial_fill_percent(ms(1000)), 50.0, "segment B starts where A ends");
        assert_eq!(radial_fill_percent(ms(2000)), 25.0, "segment C starts where B ends");
        assert_eq!(radial_fill_percent(ms(3000)), 0.0, "cycle restarts");
    }

    #[test]
    fn test_radial_continuous_at_boundaries() {
        let eps = Duration::from_micros(1);
        assert!((radial_fill_percent(ms(1000) - eps) - 50.0).abs() < 0.01);
        assert!((radial_fill_percent(ms(2000) - eps) - 25.0).abs() < 0.01);
        assert!((radial_fill_percent(ms(3000) - eps) - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_radial_segment_midpoints() {
        assert!((radial_fill_percent(ms(500)) - 25.0).abs() < 1e-3);
        assert!((radial_fill_percent(ms(1500)) - 37.5).abs() < 1e-3);
        assert!((radial_fill_percent(ms(2500)) - 62.5).abs() < 1e-3);
        assert!((radial_fill_percent(ms(6500)) - 25.0).abs() < 1e-3, "periodic");
    }

    #[test]
    fn test_radial_rings_follow_percent() {
        let phase = AnimationPhase::radial_fill(None);

        let mut canvas = Canvas::new(64, 64).unwrap();
        phase.render(&mut canvas, FrameTick { elapsed: Duration::ZERO, index: 0 });
        assert_eq!(lit(&canvas), 1, "0% is the centre pixel only");
        assert_ne!(canvas.get_pixel(32, 32), BLACK);

        let mut canvas = Canvas::new(64, 64).unwrap();
        phase.render(&mut canvas, FrameTick { elapsed: ms(1000), index: 0 });
        assert_ne!(canvas.get_pixel(32 + 16, 32), BLACK, "50% of a 32px max radius");
        assert_eq!(canvas.get_pixel(32 + 17, 32), BLACK);
    }

    #[test]
    fn test_radius_for_percent() {
        assert_eq!(RadialFill::radius_for(0.0, 32), 0);
        assert_eq!(RadialFill::radius_for(50.0, 32), 16);
        assert_eq!(RadialFill::radius_for(100.0, 32), 32);
        assert_eq!(RadialFill::radius_for(150.0, 32), 32);
    }

    #[test]
    fn test_spinner_glyph_cycle() {
        let spinner = Spinner::new(Font::load(10).unwrap());
        let glyphs: Vec<usize> = (0..9).map(|i| spinner.glyph_index(ms(i * 100))).collect();
        assert_eq!(glyphs, vec![0, 1, 2, 3, 0, 1, 2, 3, 0]);
        assert_eq!(spinner.glyph_index(ms(99)), 0);
    }

    #[test]
    fn test_spinner_hold_reaches_next_glyph() {
        let phase = AnimationPhase::spinner(Font::load(10).unwrap(), ms(3000));
        assert_eq!(phase.hold(FrameTick { elapsed: Duration::ZERO, index: 0 }), ms(100));
        assert_eq!(phase.hold(FrameTick { elapsed: ms(130), index: 1 }), ms(70));
        assert_eq!(phase.hold(FrameTick { elapsed: ms(2950), index: 30 }), ms(50));
    }

    #[test]
    fn test_scroll_wraps_once_per_period() {
        let scroll = ScrollingText::new("hello world", Font::load(7).unwrap(), 20);
        let width = 64u32;
        let text_width = scroll.text_width();
        assert_eq!(text_width, 11 * 5);

        let period = u64::from(width) + text_width as u64;
        assert_eq!(scroll.position_at(0, width), 64);

        let mut wraps = 0;
        for tick in 1..=period {
            let prev = scroll.position_at(tick - 1, width);
            let pos = scroll.position_at(tick, width);
            if pos > prev {
                wraps += 1;
                assert!(prev - 1 + text_width <= 0, "text fully off screen before wrapping");
            } else {
                assert_eq!(pos, prev - 1, "moves one pixel per tick");
            }
        }
        assert_eq!(wraps, 1);
        assert_eq!(scroll.position_at(period, width), 64);
    }

    #[test]
    fn test_scroll_matches_stepwise_marquee() {
        let scroll = ScrollingText::new("abc", Font::load(8).unwrap(), 0);
        let width = 16;
        let text_width = scroll.text_width();

        let mut x = width as i32;
        for tick in 0..200u64 {
            assert_eq!(scroll.position_at(tick, width), x, "tick {tick}");
            x -= 1;
            if x + text_width <= 0 {
                x = width as i32;
            }
        }
    }

    #[test]
    fn test_scroll_has_no_budget() {
        let phase = AnimationPhase::scroll(ScrollingText::new("x", Font::load(7).unwrap(), 0));
        assert_eq!(phase.budget(), None);
        assert!(!phase.is_finished(Duration::from_secs(1_000_000)));
        assert_eq!(phase.hold(FrameTick::default()), SCROLL_TICK);
    }

    fn three_frames() -> DecodedImage {
        DecodedImage::animated(1, 1, [(vec![RED], ms(100)), (vec![GREEN], ms(50)), (vec![BLUE], ms(250))]).unwrap()
    }

    #[test]
    fn test_sequence_frame_lookup() {
        let playback = SequencePlayback::fullscreen(three_frames(), 4, 4);
        assert_eq!(playback.frame_at(Duration::ZERO), (0, ms(100)));
        assert_eq!(playback.frame_at(ms(99)), (0, ms(1)));
        assert_eq!(playback.frame_at(ms(100)), (1, ms(50)));
        assert_eq!(playback.frame_at(ms(150)), (2, ms(250)));
        assert_eq!(playback.frame_at(ms(399)), (2, ms(1)));
        assert_eq!(playback.frame_at(ms(400)), (0, ms(100)), "loops back to frame 0");
        assert_eq!(playback.frame_at(ms(1250)), (0, ms(50)), "1250 mod 400 lands in frame 0");
        assert_eq!(playback.frame_at(ms(1300)), (1, ms(50)));
    }

    #[test]
    fn test_sequence_renders_current_frame() {
        let phase = AnimationPhase::sequence(SequencePlayback::fullscreen(three_frames(), 4, 4), ms(1200));
        let mut canvas = Canvas::new(4, 4).unwrap();
        phase.render(&mut canvas, FrameTick { elapsed: ms(120), index: 1 });
        assert!(canvas.pixels().iter().all(|&p| p == GREEN));
    }

    #[test]
    fn test_hold_never_passes_budget() {
        let phase = AnimationPhase::sequence(SequencePlayback::fullscreen(three_frames(), 4, 4), ms(430));
        assert_eq!(phase.hold(FrameTick { elapsed: ms(400), index: 3 }), ms(30));
        assert!(phase.is_finished(ms(430)));
        assert!(!phase.is_finished(ms(429)));
    }

    #[test]
    fn test_wrap_duration() {
        assert_eq!(wrap_duration(ms(3500), ms(3000)), ms(500));
        assert_eq!(wrap_duration(ms(3000), ms(3000)), Duration::ZERO);
        assert_eq!(wrap_duration(ms(10), Duration::ZERO), Duration::ZERO);
    }
}
