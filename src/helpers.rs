use jiff::{civil::DateTime, tz::TimeZone, Timestamp};
use strsim::levenshtein;

/// Find the most similar ID from a list of candidates
pub fn find_similar_id<'a>(target: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&candidate| (candidate, levenshtein(target, candidate)))
        .filter(|(_, distance)| *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(id, _)| id)
}

/// Parses an RFC 3339 timestamp, or an ISO-8601 date-time without an offset
/// (as many backends emit), which is read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<Timestamp, String> {
    let raw = raw.trim();
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Ok(ts);
    }

    raw.parse::<DateTime>()
        .and_then(|dt| dt.to_zoned(TimeZone::UTC))
        .map(|zoned| zoned.timestamp())
        .map_err(|e| format!("`{raw}` is not an ISO-8601 timestamp ({e})"))
}
