//! Shared utility functions for the sharemount CLI.
//!
//! Formatting helpers used by the share listing and the interactive prompt.

use std::borrow::Cow;

/// Formats the elapsed time since a given timestamp into a human-readable string.
///
/// ```ignore
/// use chrono::Utc;
///
/// let start = Utc::now() - chrono::Duration::hours(2) - chrono::Duration::minutes(30);
/// assert_eq!(format_elapsed(start), "2h 30m");
/// ```
pub fn format_elapsed(since: chrono::DateTime<chrono::Utc>) -> String {
    let duration = chrono::Utc::now() - since;
    let hours = duration.num_hours();
    let minutes = duration.num_minutes() % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", duration.num_seconds().max(0))
    }
}

/// Truncates a string to a maximum number of characters, appending "..." if truncated.
///
/// Returns a `Cow<str>` to avoid allocation when no truncation is needed.
pub fn truncate(s: &str, max_len: usize) -> Cow<'_, str> {
    if s.chars().count() <= max_len {
        Cow::Borrowed(s)
    } else if max_len <= 3 {
        Cow::Owned(s.chars().take(max_len).collect())
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        Cow::Owned(format!("{}...", kept))
    }
}

/// Longest prefix shared by every candidate
pub fn common_prefix<S: AsRef<str>>(candidates: &[S]) -> String {
    let Some((first, rest)) = candidates.split_first() else {
        return String::new();
    };

    let mut prefix = first.as_ref();
    for candidate in rest {
        let candidate = candidate.as_ref();
        let shared = prefix
            .char_indices()
            .zip(candidate.chars())
            .find(|((_, a), b)| a != b)
            .map(|((i, _), _)| i)
            .unwrap_or_else(|| prefix.len().min(candidate.len()));
        prefix = &prefix[..shared];
    }

    prefix.to_string()
}
