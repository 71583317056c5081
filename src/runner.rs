//! Fixed-step, real-time paced driver around [`Engine`].
//!
//! Elapsed wall time is accumulated and consumed in whole `timestep` steps.
//! At most `max_steps_per_frame` steps run per frame; any larger backlog is
//! dropped so a slow frame cannot snowball into ever longer frames.

use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::api::SimulationApi;
use crate::config::RunnerConfig;
use crate::engine::Engine;
use crate::error::{ConfigError, StepWarning};

/// Source of frame pacing.
pub trait FrameClock {
    /// Block until the next frame and return the time since the previous one.
    /// `None` ends the run.
    fn next_frame(&mut self) -> Option<Duration>;
}

/// Sleeps on the current thread to hold a target frame rate.
pub struct SleepClock {
    period: Duration,
    last: Instant,
}

impl SleepClock {
    pub fn new(hz: f32) -> Result<Self, ConfigError> {
        if !(hz.is_finite() && hz > 0.0) {
            return Err(ConfigError::InvalidTimestep(hz));
        }
        Ok(Self { period: Duration::from_secs_f32(1.0 / hz), last: Instant::now() })
    }

    pub fn sixty_hz() -> Self {
        Self { period: Duration::from_micros(16_667), last: Instant::now() }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl FrameClock for SleepClock {
    fn next_frame(&mut self) -> Option<Duration> {
        let target = self.last + self.period;
        let now = Instant::now();
        if now < target {
            thread::sleep(target - now);
        }
        let now = Instant::now();
        let elapsed = now - self.last;
        self.last = now;
        Some(elapsed)
    }
}

/// Replays a fixed list of frame durations; ends when the list is exhausted.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    frames: VecDeque<Duration>,
}

impl ManualClock {
    pub fn new(frames: impl IntoIterator<Item = Duration>) -> Self {
        Self { frames: frames.into_iter().collect() }
    }

    /// `count` frames of `dt` seconds each.
    pub fn uniform(dt: f32, count: usize) -> Self {
        Self::new(std::iter::repeat_n(Duration::from_secs_f32(dt), count))
    }

    pub fn push(&mut self, frame: Duration) {
        self.frames.push_back(frame);
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameClock for ManualClock {
    fn next_frame(&mut self) -> Option<Duration> {
        self.frames.pop_front()
    }
}

/// Cross-thread stop flag; cloning shares the flag.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// What one frame of the runner did.
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    pub frame: u64,
    /// Fixed steps run this frame.
    pub steps: usize,
    /// Backlog discarded because the step cap was hit.
    pub dropped: Duration,
    /// Leftover fraction of a step, for render interpolation.
    pub alpha: f32,
    /// Contacts in the last step run this frame.
    pub contacts: usize,
    pub warnings: Vec<StepWarning>,
}

pub struct Runner {
    cfg: RunnerConfig,
    accumulator: f64,
    frames: u64,
    stop: StopHandle,
}

impl Runner {
    pub fn new(cfg: RunnerConfig) -> Result<Self, ConfigError> {
        if !(cfg.timestep.is_finite() && cfg.timestep > 0.0) {
            return Err(ConfigError::InvalidTimestep(cfg.timestep));
        }
        Ok(Self {
            cfg: RunnerConfig { max_steps_per_frame: cfg.max_steps_per_frame.max(1), ..cfg },
            accumulator: 0.0,
            frames: 0,
            stop: StopHandle::default(),
        })
    }

    pub fn config(&self) -> RunnerConfig {
        self.cfg
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Feed one frame's elapsed time and run the fixed steps it pays for.
    pub fn advance(&mut self, engine: &mut Engine, elapsed: Duration) -> TickReport {
        let dt = self.cfg.timestep;
        let step = dt as f64;
        // Absorbs Duration's nanosecond rounding of a one-step frame
        let eps = 1e-6;
        self.accumulator += elapsed.as_secs_f64();
        self.frames += 1;

        let mut report = TickReport { frame: self.frames, ..TickReport::default() };
        while self.accumulator + eps >= step && report.steps < self.cfg.max_steps_per_frame {
            let r = engine.step(dt);
            report.contacts = r.contacts;
            report.warnings.extend(r.warnings);
            self.accumulator -= step;
            report.steps += 1;
        }

        if self.accumulator + eps >= step {
            let whole = ((self.accumulator + eps) / step).floor();
            let keep = (self.accumulator - whole * step).max(0.0);
            report.dropped = Duration::from_secs_f64(self.accumulator - keep);
            self.accumulator = keep;
        }
        self.accumulator = self.accumulator.max(0.0);
        report.alpha = (self.accumulator / step) as f32;
        report
    }

    /// Drive `engine` until the callback breaks, the clock ends or the stop handle fires.
    /// Returns the number of frames run.
    pub fn run<C, F>(&mut self, engine: &mut Engine, clock: &mut C, mut on_frame: F) -> u64
    where
        C: FrameClock,
        F: FnMut(&mut Engine, &TickReport) -> ControlFlow<()>,
    {
        let start = self.frames;
        while !self.stop.is_stopped() {
            let Some(elapsed) = clock.next_frame() else { break };
            let report = self.advance(engine, elapsed);
            if on_frame(engine, &report).is_break() {
                break;
            }
        }
        self.frames - start
    }
}
