//! Pomodoro countdown and the running totals it feeds.
//!
//! The timer is a plain state machine advanced one second per [`Timer::tick`];
//! the caller owns the clock.

use crate::errors::{StoreError, StoreResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

const WORK_MINUTES: RangeInclusive<u32> = 1..=60;
const SHORT_BREAK_MINUTES: RangeInclusive<u32> = 1..=30;
const LONG_BREAK_MINUTES: RangeInclusive<u32> = 1..=60;
const SESSIONS_UNTIL_LONG_BREAK: RangeInclusive<u32> = 2..=10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    Work,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub fn is_break(self) -> bool {
        !matches!(self, Mode::Work)
    }
}

/// Interval lengths in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    pub work: u32,
    pub short_break: u32,
    pub long_break: u32,
    pub sessions_until_long_break: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work: 25,
            short_break: 5,
            long_break: 15,
            sessions_until_long_break: 4,
        }
    }
}

impl TimerSettings {
    /// Rejects values outside the ranges the settings form offers.
    pub fn validate(&self) -> StoreResult<()> {
        let checks = [
            ("work", self.work, WORK_MINUTES),
            ("shortBreak", self.short_break, SHORT_BREAK_MINUTES),
            ("longBreak", self.long_break, LONG_BREAK_MINUTES),
            (
                "sessionsUntilLongBreak",
                self.sessions_until_long_break,
                SESSIONS_UNTIL_LONG_BREAK,
            ),
        ];
        for (name, value, range) in checks {
            if !range.contains(&value) {
                return Err(StoreError::Invalid(format!(
                    "{name} must be between {} and {}, got {value}",
                    range.start(),
                    range.end()
                )));
            }
        }
        Ok(())
    }

    pub fn minutes(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Work => self.work,
            Mode::ShortBreak => self.short_break,
            Mode::LongBreak => self.long_break,
        }
    }

    pub fn seconds(&self, mode: Mode) -> u32 {
        self.minutes(mode) * 60
    }
}

/// A finished interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub mode: Mode,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    settings: TimerSettings,
    mode: Mode,
    remaining: u32,
    running: bool,
    sessions: u32,
}

impl Timer {
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            settings,
            mode: Mode::Work,
            remaining: settings.seconds(Mode::Work),
            running: false,
            sessions: 0,
        }
    }

    pub fn settings(&self) -> TimerSettings {
        self.settings
    }

    /// Replaces the interval lengths, then stops and rewinds the current
    /// interval.
    pub fn set_settings(&mut self, settings: TimerSettings) -> StoreResult<()> {
        settings.validate()?;
        self.settings = settings;
        self.reset();
        Ok(())
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Work intervals finished since the timer was created.
    pub fn sessions(&self) -> u32 {
        self.sessions
    }

    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    /// Stops and rewinds the current interval.
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining = self.settings.seconds(self.mode);
    }

    pub fn switch_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.reset();
    }

    /// Elapsed share of the current interval, 0.0 to 100.0.
    pub fn progress(&self) -> f64 {
        let total = self.settings.seconds(self.mode);
        if total == 0 {
            return 100.0;
        }
        f64::from(total - self.remaining.min(total)) * 100.0 / f64::from(total)
    }

    /// Advances one second. Returns the finished interval when the countdown
    /// reaches zero; the timer then stops on the next mode.
    pub fn tick(&mut self) -> Option<Completion> {
        if !self.running {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return None;
        }
        Some(self.complete())
    }

    fn complete(&mut self) -> Completion {
        let finished = Completion {
            mode: self.mode,
            minutes: self.settings.minutes(self.mode),
        };
        let next = match self.mode {
            Mode::Work => {
                self.sessions += 1;
                let every = self.settings.sessions_until_long_break.max(1);
                if self.sessions % every == 0 {
                    Mode::LongBreak
                } else {
                    Mode::ShortBreak
                }
            }
            Mode::ShortBreak | Mode::LongBreak => Mode::Work,
        };
        self.switch_mode(next);
        finished
    }
}

/// Lifetime totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PomodoroStats {
    pub total_sessions: u32,
    pub total_work_minutes: u32,
    pub total_break_minutes: u32,
    pub last_session_date: Option<NaiveDate>,
}

impl PomodoroStats {
    pub fn record(&mut self, completion: Completion, today: NaiveDate) {
        if completion.mode.is_break() {
            self.total_break_minutes = self.total_break_minutes.saturating_add(completion.minutes);
        } else {
            self.total_sessions = self.total_sessions.saturating_add(1);
            self.total_work_minutes = self.total_work_minutes.saturating_add(completion.minutes);
            self.last_session_date = Some(today);
        }
    }
}
