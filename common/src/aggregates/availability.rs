use crate::types::schedule::{Moment, ScheduleWindow, TimeOfDay, Weekday};
use chrono::{DateTime, TimeZone};

/// Whether `schedule` is open on `day` at `time`.
///
/// Only the day the window starts on is checked: a Monday 22:00-02:00 window
/// is closed on Tuesday at 01:00 unless Tuesday is listed too.
pub fn is_open_at(schedule: &ScheduleWindow, day: Weekday, time: TimeOfDay) -> bool {
    if !schedule.days.contains(&day) {
        return false;
    }

    let current = time.minutes_since_midnight();
    let start = schedule.start.minutes_since_midnight();
    let end = schedule.end.minutes_since_midnight();

    if end < start {
        current >= start || current <= end
    } else {
        current >= start && current <= end
    }
}

/// String form used by callers holding raw `"monday"` / `"HH:MM"` values.
/// Anything unparseable counts as closed.
pub fn is_open_now(schedule: &ScheduleWindow, current_day: &str, current_time: &str) -> bool {
    match (
        current_day.parse::<Weekday>(),
        current_time.parse::<TimeOfDay>(),
    ) {
        (Ok(day), Ok(time)) => is_open_at(schedule, day, time),
        _ => false,
    }
}

/// Evaluates against a wall-clock instant in its own timezone.
pub fn is_open_at_datetime<Tz: TimeZone>(schedule: &ScheduleWindow, now: &DateTime<Tz>) -> bool {
    let moment = Moment::from_datetime(now);
    is_open_at(schedule, moment.day, moment.time)
}
