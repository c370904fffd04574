//! Opening hours and the wall clock.
//!
//! Whether the deli is open is a pure function of the local weekday and hour.
//! The clock is a trait so the sign can be checked against any moment.

use crate::utils::error::{SiteError, SiteResult};
use crate::utils::time::{format_hour, weekday_name};
use chrono::{Datelike, Local, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Open from `open` (inclusive) to `close` (exclusive), in whole hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub open: u32,
    pub close: u32,
}

impl DayHours {
    pub const fn new(open: u32, close: u32) -> Self {
        Self { open, close }
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        hour >= self.open && hour < self.close
    }
}

impl fmt::Display for DayHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.open >= self.close {
            return f.write_str("Closed");
        }
        write!(f, "{} - {}", format_hour(self.open), format_hour(self.close))
    }
}

/// Opening hours for each day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklySchedule {
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
    pub sunday: DayHours,
}

impl Default for WeeklySchedule {
    /// Mon-Sat 7am-7pm, Sunday 8am-5pm
    fn default() -> Self {
        let weekday = DayHours::new(7, 19);
        Self {
            monday: weekday,
            tuesday: weekday,
            wednesday: weekday,
            thursday: weekday,
            friday: weekday,
            saturday: weekday,
            sunday: DayHours::new(8, 17),
        }
    }
}

impl WeeklySchedule {
    pub fn hours_for(&self, day: Weekday) -> DayHours {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    /// Minutes are ignored: 06:59 counts as hour 6.
    pub fn is_open_at(&self, at: NaiveDateTime) -> bool {
        self.hours_for(at.weekday()).contains_hour(at.hour())
    }

    pub fn status_at(&self, at: NaiveDateTime) -> OpenState {
        if self.is_open_at(at) {
            OpenState::Open
        } else {
            OpenState::Closed
        }
    }

    /// Days in display order, Monday first
    pub fn days(&self) -> [(Weekday, DayHours); 7] {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .map(|day| (day, self.hours_for(day)))
    }

    /// A day may be closed (`open == close`) but never close before it opens.
    pub fn validate(&self) -> SiteResult<()> {
        for (day, hours) in self.days() {
            if hours.open > 24 || hours.close > 24 {
                return Err(SiteError::config(format!(
                    "{} hours must be within 0-24, got {}-{}",
                    weekday_name(day),
                    hours.open,
                    hours.close
                )));
            }
            if hours.close < hours.open {
                return Err(SiteError::config(format!(
                    "{} closes ({}) before it opens ({})",
                    weekday_name(day),
                    hours.close,
                    hours.open
                )));
            }
        }
        Ok(())
    }
}

/// What the sign in the window says
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OpenState {
    Open,
    Closed,
}

impl OpenState {
    pub fn label(&self) -> &'static str {
        match self {
            OpenState::Open => "OPEN",
            OpenState::Closed => "CLOSED",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, OpenState::Open)
    }
}

impl fmt::Display for OpenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Source of the current local wall-clock time
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The machine's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock stopped at one moment
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
