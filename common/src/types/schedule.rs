use crate::constants::{MINUTES_PER_DAY, MINUTES_PER_HOUR};
use crate::error::AppError;
use chrono::{DateTime, Datelike, Local, TimeZone};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn tag(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Weekday {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" => Ok(Weekday::Monday),
            "tuesday" => Ok(Weekday::Tuesday),
            "wednesday" => Ok(Weekday::Wednesday),
            "thursday" => Ok(Weekday::Thursday),
            "friday" => Ok(Weekday::Friday),
            "saturday" => Ok(Weekday::Saturday),
            "sunday" => Ok(Weekday::Sunday),
            _ => Err(AppError::UnknownWeekday(s.to_string())),
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }
}

/// Wall-clock time as minutes since midnight. `24:00` is accepted as the end
/// of the day. Serialized as `"HH:MM"`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr,
)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    pub fn new(hours: u16, minutes: u16) -> Result<Self, AppError> {
        let invalid = || AppError::InvalidTimeOfDay(format!("{:02}:{:02}", hours, minutes));
        if hours > 24 || minutes >= MINUTES_PER_HOUR {
            return Err(invalid());
        }
        let total = hours * MINUTES_PER_HOUR + minutes;
        if total > MINUTES_PER_DAY {
            return Err(invalid());
        }
        Ok(Self { minutes: total })
    }

    pub fn minutes_since_midnight(&self) -> u16 {
        self.minutes
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}",
            self.minutes / MINUTES_PER_HOUR,
            self.minutes % MINUTES_PER_HOUR
        )
    }
}

impl FromStr for TimeOfDay {
    type Err = AppError;

    /// Parses `HH:MM`, and `HH:MM:SS` as returned by time columns (seconds are dropped).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AppError::InvalidTimeOfDay(s.to_string());
        let parts: Vec<&str> = s.trim().split(':').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(invalid());
        }
        let hours: u16 = parts[0].parse().map_err(|_| invalid())?;
        let minutes: u16 = parts[1].parse().map_err(|_| invalid())?;
        if let Some(seconds) = parts.get(2) {
            let seconds: u16 = seconds.parse().map_err(|_| invalid())?;
            if seconds >= 60 {
                return Err(invalid());
            }
        }
        TimeOfDay::new(hours, minutes).map_err(|_| invalid())
    }
}

impl From<chrono::NaiveTime> for TimeOfDay {
    fn from(time: chrono::NaiveTime) -> Self {
        use chrono::Timelike;
        Self {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        }
    }
}

/// A day of the week plus a time of day, the instant availability is evaluated at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moment {
    pub day: Weekday,
    pub time: TimeOfDay,
}

impl Moment {
    pub fn new(day: Weekday, time: TimeOfDay) -> Self {
        Self { day, time }
    }

    /// Read from the local wall clock. Never cache the result: it is only
    /// valid for the render it was taken for.
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    pub fn from_datetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        let local = instant.naive_local();
        Self {
            day: local.weekday().into(),
            time: local.time().into(),
        }
    }
}

/// Days and opening hours of a menu. `end < start` is an overnight window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub days: BTreeSet<Weekday>,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl ScheduleWindow {
    pub fn new(days: impl IntoIterator<Item = Weekday>, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            days: days.into_iter().collect(),
            start,
            end,
        }
    }

    pub fn is_overnight(&self) -> bool {
        self.end < self.start
    }

    /// Short label such as `monday, friday 22:00-02:00`.
    pub fn label(&self) -> String {
        let days: Vec<&str> = self.days.iter().map(Weekday::tag).collect();
        format!("{} {}-{}", days.join(", "), self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_of_day() {
        let time: TimeOfDay = "22:30".parse().unwrap();
        assert_eq!(time.minutes_since_midnight(), 22 * 60 + 30);
        assert_eq!(time.to_string(), "22:30");

        let time: TimeOfDay = "09:05:00".parse().unwrap();
        assert_eq!(time.to_string(), "09:05");

        let end_of_day: TimeOfDay = "24:00".parse().unwrap();
        assert_eq!(end_of_day.minutes_since_midnight(), MINUTES_PER_DAY);
    }

    #[test]
    fn test_reject_invalid_time_of_day() {
        for input in ["24:01", "12:60", "noon", "12", "1:2:3:4", "10:00:75", ""] {
            assert_eq!(
                input.parse::<TimeOfDay>(),
                Err(AppError::InvalidTimeOfDay(input.to_string())),
                "input: {}",
                input
            );
        }
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!("Monday".parse::<Weekday>(), Ok(Weekday::Monday));
        assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Sunday);
        assert!("lunes".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_moment_from_datetime() {
        use chrono::Utc;
        // 2024-03-17 was a Sunday.
        let instant = Utc.with_ymd_and_hms(2024, 3, 17, 23, 45, 10).unwrap();
        let moment = Moment::from_datetime(&instant);
        assert_eq!(moment.day, Weekday::Sunday);
        assert_eq!(moment.time.to_string(), "23:45");
    }

    #[test]
    fn test_schedule_serde() {
        let json = r#"{"days":["friday","monday"],"start":"22:00","end":"02:00"}"#;
        let schedule: ScheduleWindow = serde_json::from_str(json).unwrap();
        assert!(schedule.is_overnight());
        assert_eq!(schedule.label(), "monday, friday 22:00-02:00");

        let back = serde_json::to_string(&schedule).unwrap();
        assert_eq!(back, r#"{"days":["monday","friday"],"start":"22:00","end":"02:00"}"#);
    }
}
