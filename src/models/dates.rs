//! Date fields as the library server sends them
//!
//! Dates come back either as ISO `YYYY-MM-DD` or as HTTP dates
//! (`Fri, 01 Sep 2023 00:00:00 GMT`), depending on how the server encodes
//! its JSON.

use chrono::{DateTime, NaiveDate};
use serde::{de, Deserialize, Deserializer};

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc2822(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {:?}", raw)))
}
