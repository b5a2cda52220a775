use crate::geometry::Solution;
use crate::logbook::clock;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Fixed column order of the persisted experiment table.
pub const COLUMNS: [&str; 8] = [
    "Date",
    "Time",
    "Updated X",
    "Updated Y",
    "M1 Z",
    "D",
    "Distance to Target",
    "Comment",
];

/// One persisted experiment row. Never mutated in place; deletion and
/// re-append are the only lifecycle operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    #[serde(rename = "Date", with = "date_format")]
    pub date: NaiveDate,
    #[serde(rename = "Time", with = "time_format")]
    pub time: NaiveTime,
    #[serde(rename = "Updated X", deserialize_with = "lenient_f64")]
    pub x: f64,
    #[serde(rename = "Updated Y", deserialize_with = "lenient_f64")]
    pub y: f64,
    #[serde(rename = "M1 Z", deserialize_with = "lenient_f64")]
    pub z: f64,
    #[serde(rename = "D", deserialize_with = "lenient_f64")]
    pub d: f64,
    #[serde(rename = "Distance to Target", deserialize_with = "lenient_f64")]
    pub l: f64,
    #[serde(rename = "Comment", default)]
    pub comment: String,
}

impl ExperimentRecord {
    pub fn new(date: NaiveDate, time: NaiveTime, solution: &Solution, comment: &str) -> Self {
        Self {
            date,
            time,
            x: solution.x,
            y: solution.y,
            z: solution.z,
            d: solution.d,
            l: solution.l,
            comment: comment.to_string(),
        }
    }

    /// Builds a record stamped with the current time in the log timezone.
    pub fn stamped(solution: &Solution, comment: &str) -> Self {
        let (date, time) = clock::log_timestamp();
        Self::new(date, time, solution, comment)
    }

    fn stamp(&self) -> (NaiveDate, NaiveTime) {
        (self.date, self.time)
    }
}

/// Reverse-chronological order by (date, time); duplicate stamps coexist.
pub fn sort_newest_first(records: &mut [ExperimentRecord]) {
    records.sort_by(|a, b| b.stamp().cmp(&a.stamp()));
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    // Blank or unparseable cells normalize to 0.0 so listing never
    // surfaces null-like sentinels.
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse().unwrap_or(0.0))
}

mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

mod time_format {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M:%S";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ymd: (i32, u32, u32), hms: (u32, u32, u32)) -> ExperimentRecord {
        ExperimentRecord {
            date: NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).unwrap(),
            time: NaiveTime::from_hms_opt(hms.0, hms.1, hms.2).unwrap(),
            x: 140.0,
            y: 140.0,
            z: 100.0,
            d: 44.6,
            l: 160.4,
            comment: String::new(),
        }
    }

    #[test]
    fn sort_is_reverse_chronological() {
        let mut records = vec![
            record((2026, 8, 25), (9, 0, 0)),
            record((2026, 8, 27), (8, 0, 0)),
            record((2026, 8, 25), (17, 30, 0)),
        ];

        sort_newest_first(&mut records);
        let stamps: Vec<_> = records.iter().map(|r| (r.date, r.time)).collect();
        let mut expected = stamps.clone();
        expected.sort();
        expected.reverse();
        assert_eq!(stamps, expected);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2026, 8, 27).unwrap());
    }

    #[test]
    fn duplicate_stamps_are_kept() {
        let mut records = vec![record((2026, 8, 25), (9, 0, 0)), record((2026, 8, 25), (9, 0, 0))];
        sort_newest_first(&mut records);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn stamped_record_carries_solution_fields() {
        let solution = Solution {
            x: 1.0,
            y: 2.0,
            z: 3.0,
            d: 4.0,
            l: 201.0,
        };
        let record = ExperimentRecord::stamped(&solution, "first pass");
        assert_eq!(record.x, 1.0);
        assert_eq!(record.l, 201.0);
        assert_eq!(record.comment, "first pass");
    }
}
