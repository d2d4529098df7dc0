//! # Shared Utility Functions
//!
//! Helpers used by the DTOs and by clients displaying them.
//!
//! ## Timestamps
//!
//! [`timestamp`] is a `serde` adapter for the backend's `LocalDateTime`
//! values. Spring renders them as ISO-8601 strings without an offset
//! (`2024-05-01T10:00:00`), or as `[y, m, d, h, min, s, nanos]` arrays when
//! date serialization is left at Jackson's defaults.
//!
//! ## Text Formatting
//!
//! - [`truncate_text`] - Shorten text to a character limit with an ellipsis
//!
//! ```rust
//! use shared::utils::truncate_text;
//!
//! assert_eq!(truncate_text("Hello, world", 5), "Hello...");
//! assert_eq!(truncate_text("short", 10), "short");
//! ```

/// Shorten `text` to at most `max_chars` characters, appending `...` when cut.
///
/// Counts `char`s rather than bytes so multi-byte titles are never split.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// `serde` adapter for optional backend timestamps.
///
/// Unparsable values deserialize to `None` instead of failing the whole
/// payload.
pub mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    /// Parse a timestamp string in any of the formats the backend emits.
    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        NaiveDateTime::parse_from_str(raw, LOCAL_FORMAT)
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
            .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok())
    }

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.serialize_str(&ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(raw)) => parse(&raw),
            Some(Value::Array(parts)) => from_parts(&parts),
            _ => None,
        })
    }

    fn from_parts(parts: &[Value]) -> Option<NaiveDateTime> {
        let nums = parts
            .iter()
            .map(|part| part.as_u64().and_then(|n| u32::try_from(n).ok()))
            .collect::<Option<Vec<u32>>>()?;
        if nums.len() < 3 {
            return None;
        }
        let at = |idx: usize| nums.get(idx).copied().unwrap_or(0);
        NaiveDate::from_ymd_opt(i32::try_from(nums[0]).ok()?, nums[1], nums[2])?
            .and_hms_nano_opt(at(3), at(4), at(5), at(6))
    }
}
