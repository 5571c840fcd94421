//! Serde helpers for values as the backend stores them.

use serde::{Deserialize, Deserializer};

/// Wall-clock times.
///
/// Postgres `time` columns come back as `HH:MM:SS`, while form input and
/// hand-written data use `HH:MM`. Both are accepted; `HH:MM` is written.
pub mod time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const WRITE_FORMAT: &str = "%H:%M";

    pub fn parse(s: &str) -> Option<NaiveTime> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .ok()
    }

    pub fn format(time: &NaiveTime) -> String {
        time.format(WRITE_FORMAT).to_string()
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid time '{}'", s)))
    }
}

/// Treat an explicit `null` like a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Empty or whitespace-only strings are stored as `null`.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;

    #[test]
    fn time_accepts_both_forms() {
        assert_eq!(time::parse("09:30"), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(time::parse("18:00:00"), NaiveTime::from_hms_opt(18, 0, 0));
        assert_eq!(time::parse("9h30"), None);
    }

    #[test]
    fn blank_strings_become_none() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some(" x ".into())), Some("x".into()));
        assert_eq!(non_empty(None), None);
    }
}
