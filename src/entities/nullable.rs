//! Conversions between nullable/signed storage columns and domain values.

pub fn from_nullable(value: Option<String>) -> String {
    value.unwrap_or_default()
}

/// Empty strings are stored as NULL.
pub fn to_nullable(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Negative ids cannot come from a BIGSERIAL column; they collapse to zero.
pub fn id_from_db(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

/// Ids past `i64::MAX` saturate, so lookups simply find nothing.
pub fn id_to_db(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub fn count_from_db(value: i32) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

pub fn mark_from_db(value: i16) -> u8 {
    u8::try_from(value).unwrap_or_default()
}
