use crate::error::{MindlogError, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Parse a point in time from RFC 3339, `YYYY-MM-DD`, or a relative
/// "<duration> ago" form such as "2 days ago" or "6h ago".
pub fn parse_when(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let input = input.trim();

    // RFC 3339
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    // YYYY-MM-DD
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&datetime));
        }
    }

    // Relative duration, e.g. "90 days ago", "2 weeks ago"
    if let Some(spec) = input.strip_suffix("ago") {
        let spec: String = spec.chars().filter(|c| !c.is_whitespace()).collect();
        let duration = humantime::parse_duration(&spec)
            .map_err(|e| MindlogError::InvalidDate(format!("Bad relative date '{input}': {e}")))?;
        let duration = chrono::Duration::from_std(duration)
            .map_err(|_| MindlogError::InvalidDate(format!("Duration overflow for '{input}'")))?;
        return Ok(now - duration);
    }

    Err(MindlogError::Parse(format!(
        "Unrecognized date '{input}' (expected RFC 3339, YYYY-MM-DD, or '<duration> ago')"
    )))
}

/// Resolve optional --since/--until strings into timestamps, rejecting
/// an inverted range.
pub fn resolve_range(
    since: Option<&str>,
    until: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    let since_dt = match since {
        Some(s) => Some(parse_when(s, now)?),
        None => None,
    };
    let until_dt = match until {
        Some(u) => Some(parse_when(u, now)?),
        None => None,
    };

    if let (Some(s), Some(u)) = (since_dt, until_dt) {
        if s > u {
            return Err(MindlogError::InvalidDate(format!(
                "Invalid range: since ({}) is after until ({})",
                s, u
            )));
        }
    }

    Ok((since_dt, until_dt))
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}
