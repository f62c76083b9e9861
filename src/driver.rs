use std::time::{Duration, Instant};

use crate::error::ConfigError;
use crate::render::compositor::Frame;
use crate::render::Renderer;
use crate::rotation::{Rotation, DELTA_A, DELTA_B};

pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

// --- Timer ---

/// Fixed-interval timer polled by the host loop. Fires at most once per
/// poll; when the host falls behind, missed ticks are dropped and the
/// schedule restarts from the current instant.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl FrameTimer {
    pub fn new(interval: Duration) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(Self {
            interval,
            next_due: None,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arms the timer so the first tick is due immediately.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Time left before the next tick, `None` once cancelled.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        let next = due + self.interval;
        if next <= now {
            let dropped = ((now - due).as_nanos() / self.interval.as_nanos()) as u64;
            tracing::debug!(dropped, "frame timer fell behind, dropping ticks");
            self.next_due = Some(now + self.interval);
        } else {
            self.next_due = Some(next);
        }
        true
    }
}

// --- Animation driver ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running,
    Stopped,
}

/// Owns the rotation state and advances it once per timer tick, rendering
/// a complete frame each time.
#[derive(Debug)]
pub struct AnimationDriver {
    renderer: Renderer,
    rotation: Rotation,
    delta_a: f32,
    delta_b: f32,
    timer: FrameTimer,
    state: DriverState,
    frames_rendered: u64,
}

impl AnimationDriver {
    pub fn new(renderer: Renderer, timer: FrameTimer) -> Self {
        Self {
            renderer,
            rotation: Rotation::default(),
            delta_a: DELTA_A,
            delta_b: DELTA_B,
            timer,
            state: DriverState::Stopped,
            frames_rendered: 0,
        }
    }

    pub fn with_increments(mut self, delta_a: f32, delta_b: f32) -> Result<Self, ConfigError> {
        for (name, value) in [("delta_a", delta_a), ("delta_b", delta_b)] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteIncrement { name, value });
            }
        }
        self.delta_a = delta_a;
        self.delta_b = delta_b;
        Ok(self)
    }

    /// Starts the timer and renders the initial frame at the starting
    /// orientation.
    pub fn start(&mut self, now: Instant) -> Frame {
        self.state = DriverState::Running;
        self.timer.start(now);
        self.timer.poll(now);
        tracing::info!(
            width = self.renderer.canvas().width(),
            height = self.renderer.canvas().height(),
            samples = self.renderer.torus().sample_count(),
            interval_ms = self.timer.interval().as_millis() as u64,
            "animation started"
        );
        self.render_current()
    }

    /// Tears the driver down. The timer is cancelled, so neither `poll` nor
    /// `tick` will ever render again.
    pub fn stop(&mut self) {
        if self.state == DriverState::Stopped {
            return;
        }
        self.timer.cancel();
        self.state = DriverState::Stopped;
        tracing::info!(frames = self.frames_rendered, "animation stopped");
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    #[cfg(test)]
    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.timer.time_until_due(now)
    }

    /// Advances the rotation by one step and renders it.
    pub fn tick(&mut self) -> Option<Frame> {
        if !self.timer.is_armed() {
            return None;
        }
        self.rotation = self.rotation.advanced(self.delta_a, self.delta_b);
        Some(self.render_current())
    }

    /// Ticks if the timer is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<Frame> {
        if !self.timer.poll(now) {
            return None;
        }
        self.tick()
    }

    fn render_current(&mut self) -> Frame {
        self.frames_rendered += 1;
        self.renderer.render(self.rotation)
    }
}

impl Drop for AnimationDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
