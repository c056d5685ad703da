//! UTC date and time values without timezone dependencies.
//!
//! Provides lightweight `Date`, `TimeOfDay` and `DateTimeUtc` types used by
//! front-matter literal conversion and query comparisons.
//!
//! # Accepted forms
//!
//! - Date: `YYYY-MM-DD`, month and day may be unpadded (`2013-2-1`)
//! - Time: `HH:MM`, `HH:MM:SS`, optionally followed by `AM`/`PM`
//! - DateTime: `YYYY-MM-DDTHH:MM:SS[Z]` or a date and a time separated by
//!   whitespace (`1023-12-12 11:33:43 am`)
//!
//! All types order chronologically through their derived `Ord`.

use anyhow::{Result, bail};

/// Calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// Wall-clock time (24h)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// UTC datetime without timezone complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTimeUtc {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Date {
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Parse `YYYY-MM-DD` (month and day may have one digit).
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().split('-');
        let year = parts.next()?;
        let month = parts.next()?;
        let day = parts.next()?;
        if parts.next().is_some() || year.len() != 4 {
            return None;
        }
        let date = Self::new(
            parse_digits(year)?,
            parse_digits(month).and_then(|m| u8::try_from(m).ok())?,
            parse_digits(day).and_then(|d| u8::try_from(d).ok())?,
        );
        date.validate().ok()?;
        Some(date)
    }

    pub fn validate(&self) -> Result<()> {
        let Self { year, month, day } = *self;
        if !(1..=12).contains(&month) {
            bail!("month is invalid: {month}");
        }
        let max_days = days_in_month(year, month);
        if day == 0 || day > max_days {
            bail!("day is invalid: {day}");
        }
        Ok(())
    }

    /// Midnight of this date.
    pub const fn at_midnight(self) -> DateTimeUtc {
        DateTimeUtc::new(self.year, self.month, self.day, 0, 0, 0)
    }
}

impl TimeOfDay {
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour,
            minute,
            second,
        }
    }

    /// Parse `HH:MM[:SS]` with an optional `AM`/`PM` suffix.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        let (clock, meridiem) = if let Some(rest) = lower.strip_suffix("am") {
            (rest.trim_end(), Some(false))
        } else if let Some(rest) = lower.strip_suffix("pm") {
            (rest.trim_end(), Some(true))
        } else {
            (lower.as_str(), None)
        };

        let mut parts = clock.split(':');
        let hour = parts.next()?;
        let minute = parts.next()?;
        let second = parts.next();
        if parts.next().is_some() || minute.len() != 2 {
            return None;
        }

        let mut hour = u8::try_from(parse_digits(hour)?).ok()?;
        let minute = u8::try_from(parse_digits(minute)?).ok()?;
        let second = match second {
            Some(sec) if sec.len() == 2 => u8::try_from(parse_digits(sec)?).ok()?,
            Some(_) => return None,
            None => 0,
        };

        if let Some(pm) = meridiem {
            if hour == 0 || hour > 12 {
                return None;
            }
            hour = match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            };
        }

        let time = Self::new(hour, minute, second);
        time.validate().ok()?;
        Some(time)
    }

    pub fn validate(&self) -> Result<()> {
        if self.hour > 23 {
            bail!("hour is invalid: {}", self.hour);
        }
        if self.minute > 59 {
            bail!("minute is invalid: {}", self.minute);
        }
        if self.second > 59 {
            bail!("second is invalid: {}", self.second);
        }
        Ok(())
    }
}

impl DateTimeUtc {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub const fn from_parts(date: Date, time: TimeOfDay) -> Self {
        Self::new(
            date.year,
            date.month,
            date.day,
            time.hour,
            time.minute,
            time.second,
        )
    }

    /// Parse `YYYY-MM-DDTHH:MM:SS[Z]` or `<date> <time>`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (date, time) = match s.split_once(['T', ' ', '\t']) {
            Some((date, time)) => (date, time.trim().trim_end_matches('Z')),
            None => return None,
        };
        let dt = Self::from_parts(Date::parse(date)?, TimeOfDay::parse(time)?);
        dt.validate().ok()?;
        Some(dt)
    }

    pub fn validate(&self) -> Result<()> {
        self.date().validate()?;
        self.time().validate()
    }

    pub const fn date(&self) -> Date {
        Date::new(self.year, self.month, self.day)
    }

    pub const fn time(&self) -> TimeOfDay {
        TimeOfDay::new(self.hour, self.minute, self.second)
    }

    /// Format as RFC 3339 (ISO 8601).
    ///
    /// Returns: `YYYY-MM-DDTHH:MM:SSZ`
    pub fn to_rfc3339(self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

impl std::fmt::Display for DateTimeUtc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

#[inline]
#[allow(clippy::manual_is_multiple_of)] // Manual impl for const fn
const fn is_leap_year(year: u16) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

#[inline]
const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Parse 1-4 ASCII digits
#[inline]
fn parse_digits(s: &str) -> Option<u16> {
    if s.is_empty() || s.len() > 4 {
        return None;
    }
    let mut result = 0u16;
    for b in s.bytes() {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + u16::from(d);
    }
    Some(result)
}
