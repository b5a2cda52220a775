use chrono::{NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::America::Chicago;
use chrono_tz::Tz;

/// Experiment-log stamps are taken in this fixed civil timezone regardless
/// of the server locale.
pub const LOG_TIMEZONE: Tz = Chicago;

/// Current date and wall-clock time in the log timezone, whole seconds.
pub fn log_timestamp() -> (NaiveDate, NaiveTime) {
    let now = Utc::now().with_timezone(&LOG_TIMEZONE);
    let time = now.time();
    (now.date_naive(), time.with_nanosecond(0).unwrap_or(time))
}

/// Compact stamp used to name exported copies of the log.
pub fn export_stamp() -> String {
    Utc::now()
        .with_timezone(&LOG_TIMEZONE)
        .format("%Y%m%d_%H%M%S")
        .to_string()
}
