//! Phase loop: render, present, hold.
//!
//! The [`Scheduler`] drives one [`AnimationPhase`] at a time through the
//! [`FramePresenter`]. Every frame follows the same sequence:
//!
//! 1. Check the stop predicate and the phase budget
//! 2. Clear the back canvas and let the phase draw into it
//! 3. Swap and present (blocks on the panel)
//! 4. Sleep for the rest of the frame's hold time
//!
//! Time comes from a [`Clock`] so the loop runs unchanged against the wall
//! clock in production and a manually advanced clock in tests.

use core::time::Duration;

use log::{debug, info};

use crate::animations::{AnimationPhase, FrameTick};
use crate::canvas::Canvas;
use crate::present::{FramePresenter, Panel};

/// Monotonic time source.
pub trait Clock {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;

    /// Block for `duration`.
    fn sleep(
        &mut self,
        duration: Duration,
    );
}

/// How a phase run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseEnd {
    /// Budget used up.
    Completed,
    /// Stop predicate returned `false`.
    Stopped,
}

/// Result of [`Scheduler::run_phase`].
#[derive(Debug)]
pub struct PhaseRun {
    /// Back canvas to hand to the next phase.
    pub back: Canvas,
    /// Frames presented during the phase.
    pub frames: u64,
    pub end: PhaseEnd,
}

/// Runs animation phases against a presenter and a clock.
pub struct Scheduler<'a, P, C> {
    presenter: &'a mut FramePresenter<P>,
    clock: &'a mut C,
}

impl<'a, P: Panel, C: Clock> Scheduler<'a, P, C> {
    pub fn new(
        presenter: &'a mut FramePresenter<P>,
        clock: &'a mut C,
    ) -> Self {
        Self { presenter, clock }
    }

    /// Run `phase` until its budget is used up or `keep_running` returns `false`.
    ///
    /// `back` must be the canvas last returned by the presenter; the canvas
    /// to use next is handed back in the [`PhaseRun`].
    pub fn run_phase<F>(
        &mut self,
        mut back: Canvas,
        phase: &AnimationPhase,
        mut keep_running: F,
    ) -> PhaseRun
    where
        F: FnMut() -> bool,
    {
        info!("Phase '{}' started (budget: {:?})", phase.name(), phase.budget());

        let start = self.clock.now();
        let mut index = 0u64;

        let end = loop {
            if !keep_running() {
                break PhaseEnd::Stopped;
            }

            let elapsed = self.clock.now().saturating_sub(start);
            if phase.is_finished(elapsed) {
                break PhaseEnd::Completed;
            }

            let tick = FrameTick { elapsed, index };
            back.clear();
            phase.render(&mut back, tick);
            back = self.presenter.swap_and_present(back);
            index += 1;

            // Hold is measured from the frame's start, not from the end of present.
            let spent = self.clock.now().saturating_sub(start + elapsed);
            let remaining = phase.hold(tick).saturating_sub(spent);
            if !remaining.is_zero() {
                self.clock.sleep(remaining);
            }
        };

        match end {
            PhaseEnd::Completed => info!("Phase '{}' completed after {} frames", phase.name(), index),
            PhaseEnd::Stopped => debug!("Phase '{}' stopped after {} frames", phase.name(), index),
        }

        PhaseRun { back, frames: index, end }
    }

    /// Run `phases` back to back, stopping early if `keep_running` returns `false`.
    pub fn run_all<F>(
        &mut self,
        mut back: Canvas,
        phases: &[AnimationPhase],
        mut keep_running: F,
    ) -> PhaseRun
    where
        F: FnMut() -> bool,
    {
        let mut frames = 0;
        for phase in phases {
            let run = self.run_phase(back, phase, &mut keep_running);
            back = run.back;
            frames += run.frames;
            if run.end == PhaseEnd::Stopped {
                return PhaseRun { back, frames, end: PhaseEnd::Stopped };
            }
        }
        PhaseRun { back, frames, end: PhaseEnd::Completed }
    }
}

// =============================================================================
// Unit Tests (run on host with: cargo test -p matrix-common)
// =============================================================================
