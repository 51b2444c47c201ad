use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static YOUTUBE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:youtube\.com/(?:[^/\n\s]+/\S+/|(?:v|e(?:mbed)?|shorts)/|\S*?[?&]v=)|youtu\.be/)([\w-]{11})",
    )
    .expect("youtube pattern is valid")
});

/// Extracts the 11-character video id from the common YouTube URL shapes.
pub fn youtube_id(url: &str) -> Option<String> {
    YOUTUBE_RE
        .captures(url.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Formats an RFC 3339 timestamp or `YYYY-MM-DD` date as `May 21, 2023`.
/// Input that parses as neither is returned unchanged.
pub fn format_date(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    let date = DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"));
    match date {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_ids_from_common_shapes() {
        let id = Some("dQw4w9WgXcQ".to_string());
        assert_eq!(youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), id);
        assert_eq!(youtube_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"), id);
        assert_eq!(youtube_id("https://youtu.be/dQw4w9WgXcQ?t=42"), id);
        assert_eq!(youtube_id("https://www.youtube.com/embed/dQw4w9WgXcQ"), id);
        assert_eq!(youtube_id("https://youtube.com/shorts/dQw4w9WgXcQ"), id);
        assert_eq!(youtube_id("https://www.youtube.com/v/dQw4w9WgXcQ"), id);
    }

    #[test]
    fn non_youtube_urls_have_no_id() {
        assert_eq!(youtube_id(""), None);
        assert_eq!(youtube_id("https://vimeo.com/123456789"), None);
        assert_eq!(youtube_id("https://youtu.be/short"), None);
    }

    #[test]
    fn dates_format_long_form() {
        assert_eq!(format_date("2023-05-21"), "May 21, 2023");
        assert_eq!(format_date("2024-12-01T18:30:00Z"), "December 1, 2024");
        assert_eq!(format_date(""), "");
        assert_eq!(format_date("next week"), "next week");
    }
}
