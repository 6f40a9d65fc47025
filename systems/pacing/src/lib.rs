#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Step pacing for the Pathscape search engine.
//!
//! The engine itself never waits. This crate turns a user-facing speed into a
//! per-step delay and offers two ways of spending it: a blocking driver that
//! pauses between steps, and a frame-time accumulator for hosts that already
//! own a render loop and only want to know how many steps fit in a frame.

use std::{ops::ControlFlow, thread, time::Duration};

use pathscape_core::SearchStatus;
use pathscape_system_pathfinder::Pathfinder;
use thiserror::Error;
use tracing::debug;

/// Delay between steps at speed `1.0`.
pub const BASE_STEP_DELAY: Duration = Duration::from_millis(500);

/// Errors produced while deriving pacing from user input.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum PacingError {
    /// Speeds must be finite and strictly positive.
    #[error("speed must be finite and greater than zero (received {0})")]
    InvalidSpeed(f64),
}

/// Converts a speed factor into the pause between steps.
///
/// Higher speeds give shorter delays: `delay = BASE_STEP_DELAY / speed`.
pub fn speed_to_delay(speed: f64) -> Result<Duration, PacingError> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(PacingError::InvalidSpeed(speed));
    }

    Duration::try_from_secs_f64(BASE_STEP_DELAY.as_secs_f64() / speed)
        .map_err(|_| PacingError::InvalidSpeed(speed))
}

/// Suspension point inserted between two steps.
pub trait Pause {
    /// Waits for `delay` before the next step may run.
    fn pause(&mut self, delay: Duration);
}

/// Blocks the current thread for the requested delay.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&mut self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

/// Never waits; steps run back to back.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPause;

impl Pause for NoPause {
    fn pause(&mut self, _delay: Duration) {}
}

/// Steps the engine until it leaves [`SearchStatus::Running`].
///
/// After every step the observer gets a read-only view of the engine. Returning
/// [`ControlFlow::Break`] cancels the run, leaving its partial path in place.
/// The pause between steps is the engine's configured `step_delay`; no pause
/// follows the final step.
pub fn drive<P, O>(engine: &mut Pathfinder, pause: &mut P, mut observer: O) -> SearchStatus
where
    P: Pause + ?Sized,
    O: FnMut(&Pathfinder) -> ControlFlow<()>,
{
    let delay = engine.config().step_delay;

    while engine.status() == SearchStatus::Running {
        let status = engine.step();
        if observer(&*engine).is_break() && status == SearchStatus::Running {
            let _ = engine.cancel();
            debug!(steps = engine.steps(), "observer cancelled the search");
            break;
        }
        if status != SearchStatus::Running {
            break;
        }
        pause.pause(delay);
    }

    engine.status()
}

/// Number of steps a host may run this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepBudget {
    /// Run at most this many steps.
    Steps(u32),
    /// No delay is configured; run as many steps as the host likes.
    Unlimited,
}

/// Accumulates frame time into whole steps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepPacer {
    delay: Duration,
    accumulated: Duration,
}

impl StepPacer {
    /// Creates a pacer that releases one step per `delay`.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            accumulated: Duration::ZERO,
        }
    }

    /// Delay that buys one step.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Time carried over towards the next step.
    #[must_use]
    pub const fn accumulated(&self) -> Duration {
        self.accumulated
    }

    /// Adds `dt` of elapsed time and returns the steps it paid for.
    pub fn advance(&mut self, dt: Duration) -> StepBudget {
        if self.delay.is_zero() {
            return StepBudget::Unlimited;
        }

        self.accumulated = self.accumulated.saturating_add(dt);
        let whole = self.accumulated.as_nanos() / self.delay.as_nanos();
        let steps = u32::try_from(whole).unwrap_or(u32::MAX);
        let spent = self.delay.checked_mul(steps).unwrap_or(self.accumulated);
        self.accumulated = self.accumulated.saturating_sub(spent);
        StepBudget::Steps(steps)
    }

    /// Advances by `dt` and spends the resulting budget on `engine`.
    pub fn tick(&mut self, engine: &mut Pathfinder, dt: Duration) -> SearchStatus {
        match self.advance(dt) {
            StepBudget::Unlimited => engine.run_to_completion(),
            StepBudget::Steps(steps) => {
                for _ in 0..steps {
                    if engine.step() != SearchStatus::Running {
                        break;
                    }
                }
                engine.status()
            }
        }
    }

    /// Drops any carried-over time.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}
