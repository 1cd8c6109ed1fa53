//! Frame-driven time accumulation for the day cycle and wave motion.
use std::time::Duration;

use serde::Serialize;

use crate::error::ClockError;

pub const DEFAULT_MIN_HOURS: f32 = 7.0;
pub const DEFAULT_MAX_HOURS: f32 = 17.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockSettings {
    pub min_hours: f32,
    pub max_hours: f32,
    pub start_hours: f32,
    /// Real seconds per in-scene hour. Zero pauses the day cycle.
    pub seconds_per_hour: f32,
    /// Seconds per full wave-phase cycle. Zero freezes the phase.
    pub wave_phase_period: f32,
    pub animate_time_of_day: bool,
    pub animate_waves: bool,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            min_hours: DEFAULT_MIN_HOURS,
            max_hours: DEFAULT_MAX_HOURS,
            start_hours: DEFAULT_MIN_HOURS,
            seconds_per_hour: 2.0,
            wave_phase_period: 4.0,
            animate_time_of_day: false,
            animate_waves: true,
        }
    }
}

impl From<&sceneconfig::ClockConfig> for ClockSettings {
    fn from(config: &sceneconfig::ClockConfig) -> Self {
        Self {
            min_hours: config.min_hours,
            max_hours: config.max_hours,
            start_hours: config.start_hours.unwrap_or(config.min_hours),
            seconds_per_hour: config.seconds_per_hour.as_secs_f32(),
            wave_phase_period: config.wave_phase_period.as_secs_f32(),
            animate_time_of_day: config.animate_time_of_day,
            animate_waves: config.animate_waves,
        }
    }
}

/// Snapshot of the clock, as read by the draw step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimationState {
    pub time_of_day_hours: f32,
    pub wave_phase: f32,
    pub wave_time_seconds: f64,
    pub animating_time_of_day: bool,
    pub animating_waves: bool,
    pub seconds_per_hour: f32,
    pub wave_phase_period_seconds: f32,
}

#[derive(Debug, Clone)]
pub struct AnimationClock {
    min_hours: f32,
    max_hours: f32,
    time_of_day: f32,
    wave_phase: f32,
    /// f64 so per-frame steps still register after days of uptime.
    wave_time: f64,
    animate_time_of_day: bool,
    animate_waves: bool,
    seconds_per_hour: f32,
    wave_phase_period: f32,
}

impl AnimationClock {
    pub fn new(settings: ClockSettings) -> Result<Self, ClockError> {
        let ClockSettings {
            min_hours,
            max_hours,
            ..
        } = settings;
        if !min_hours.is_finite() || !max_hours.is_finite() || min_hours >= max_hours {
            return Err(ClockError::InvalidRange {
                min: min_hours,
                max: max_hours,
            });
        }

        let mut clock = Self {
            min_hours,
            max_hours,
            time_of_day: min_hours,
            wave_phase: 0.0,
            wave_time: 0.0,
            animate_time_of_day: settings.animate_time_of_day,
            animate_waves: settings.animate_waves,
            seconds_per_hour: 0.0,
            wave_phase_period: 0.0,
        };
        clock.set_time_of_day(settings.start_hours);
        clock.set_seconds_per_hour(settings.seconds_per_hour);
        clock.set_wave_phase_period(settings.wave_phase_period);
        Ok(clock)
    }

    /// Advances every active accumulator by `dt`.
    ///
    /// Negative or non-finite steps are ignored.
    pub fn tick(&mut self, dt: Duration) {
        self.advance(dt.as_secs_f32());
    }

    /// Same as [`tick`](Self::tick) for callers that measure frames in
    /// floating-point seconds.
    pub fn tick_seconds(&mut self, dt: f32) {
        if !dt.is_finite() || dt < 0.0 {
            tracing::debug!(dt, "ignoring invalid clock step");
            return;
        }
        self.advance(dt);
    }

    fn advance(&mut self, dt: f32) {
        if self.animate_time_of_day && self.seconds_per_hour > 0.0 {
            let advanced = self.time_of_day + dt / self.seconds_per_hour;
            self.time_of_day = wrap_into(advanced, self.min_hours, self.max_hours);
        }

        if self.animate_waves {
            self.wave_time += f64::from(dt);
            if !self.wave_time.is_finite() || self.wave_time < 0.0 {
                self.wave_time = 0.0;
            }
            if self.wave_phase_period > 0.0 {
                self.wave_phase = wrap_into(self.wave_phase + dt / self.wave_phase_period, 0.0, 1.0);
            }
        }
    }

    pub fn time_of_day(&self) -> f32 {
        self.time_of_day
    }

    pub fn wave_phase(&self) -> f32 {
        self.wave_phase
    }

    pub fn wave_time(&self) -> f64 {
        self.wave_time
    }

    pub fn time_range(&self) -> (f32, f32) {
        (self.min_hours, self.max_hours)
    }

    pub fn seconds_per_hour(&self) -> f32 {
        self.seconds_per_hour
    }

    pub fn wave_phase_period(&self) -> f32 {
        self.wave_phase_period
    }

    pub fn is_animating_time_of_day(&self) -> bool {
        self.animate_time_of_day
    }

    pub fn is_animating_waves(&self) -> bool {
        self.animate_waves
    }

    /// Clamps into `[min, max]`; non-finite input snaps to `min`.
    pub fn set_time_of_day(&mut self, hours: f32) {
        self.time_of_day = if hours.is_finite() {
            hours.clamp(self.min_hours, self.max_hours)
        } else {
            self.min_hours
        };
    }

    /// Wraps into `[0, 1)`.
    pub fn set_wave_phase(&mut self, phase: f32) {
        self.wave_phase = if phase.is_finite() {
            wrap_into(phase, 0.0, 1.0)
        } else {
            0.0
        };
    }

    pub fn set_seconds_per_hour(&mut self, seconds: f32) {
        self.seconds_per_hour = non_negative(seconds);
    }

    pub fn set_wave_phase_period(&mut self, seconds: f32) {
        self.wave_phase_period = non_negative(seconds);
    }

    pub fn set_animating_time_of_day(&mut self, enabled: bool) {
        self.animate_time_of_day = enabled;
    }

    pub fn set_animating_waves(&mut self, enabled: bool) {
        self.animate_waves = enabled;
    }

    pub fn toggle_time_of_day(&mut self) -> bool {
        self.animate_time_of_day = !self.animate_time_of_day;
        self.animate_time_of_day
    }

    pub fn toggle_waves(&mut self) -> bool {
        self.animate_waves = !self.animate_waves;
        self.animate_waves
    }

    pub fn state(&self) -> AnimationState {
        AnimationState {
            time_of_day_hours: self.time_of_day,
            wave_phase: self.wave_phase,
            wave_time_seconds: self.wave_time,
            animating_time_of_day: self.animate_time_of_day,
            animating_waves: self.animate_waves,
            seconds_per_hour: self.seconds_per_hour,
            wave_phase_period_seconds: self.wave_phase_period,
        }
    }
}

/// `min + (value - min) mod (max - min)`, landing in `[min, max)`.
fn wrap_into(value: f32, min: f32, max: f32) -> f32 {
    let span = max - min;
    let r = (value - min).rem_euclid(span);
    // rem_euclid can round up to exactly `span` for tiny negative inputs.
    if r >= span {
        min
    } else {
        min + r
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
