//! Shared formatting utilities for size display and console output

use console::Emoji;

/// Checkmark emoji for success
pub const CHECKMARK: Emoji = Emoji("✅", "[OK]");

/// Crossmark emoji for failure
pub const CROSSMARK: Emoji = Emoji("❌", "[FAIL]");

/// Chart emoji for metrics/statistics
pub const CHART: Emoji = Emoji("📊", "~");

/// Up arrow for size increases
pub const GROWTH: Emoji = Emoji("📈", "+");

/// Down arrow for size decreases
pub const SHRINK: Emoji = Emoji("📉", "-");

/// Truck emoji for moved files
pub const MOVED: Emoji = Emoji("🚚", "->");

/// Clock emoji for timelines
pub const TIMELINE: Emoji = Emoji("🕒", "@");

/// Whether emoji output is wanted
///
/// `--no-emoji` sets `NO_EMOJI`; terminals without emoji support also get
/// the ASCII fallback.
pub fn emoji_enabled() -> bool {
    std::env::var_os("NO_EMOJI").is_none() && console::Term::stdout().features().wants_emoji()
}

/// The emoji, or its ASCII fallback when emoji are disabled
pub fn icon(emoji: Emoji<'static, 'static>) -> &'static str {
    if emoji_enabled() {
        emoji.0
    } else {
        emoji.1
    }
}

/// Format bytes as human-readable size string
///
/// # Examples
///
/// ```
/// use size_analyzer::fmt::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1_048_576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a signed byte delta with an explicit sign
///
/// ```
/// use size_analyzer::fmt::format_delta;
///
/// assert_eq!(format_delta(2048), "+2.00 KB");
/// assert_eq!(format_delta(-10), "-10 B");
/// assert_eq!(format_delta(0), "0 B");
/// ```
pub fn format_delta(delta: i64) -> String {
    let magnitude = format_bytes(delta.unsigned_abs());
    match delta.signum() {
        1 => format!("+{}", magnitude),
        -1 => format!("-{}", magnitude),
        _ => magnitude,
    }
}

/// Format a percentage with an explicit sign and one decimal
pub fn format_percent(percent: f64) -> String {
    if percent > 0.0 {
        format!("+{:.1}%", percent)
    } else {
        format!("{:.1}%", percent)
    }
}

/// Truncate to `max_len` characters, keeping the tail of long paths
pub fn truncate_path(path: &str, max_len: usize) -> String {
    let count = path.chars().count();
    if count <= max_len {
        return path.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let tail: String = path.chars().skip(count - keep).collect();
    format!("...{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_various_sizes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(2_621_440), "2.50 MB");
    }

    #[test]
    fn test_format_delta_handles_extremes() {
        assert_eq!(format_delta(i64::MIN).chars().next(), Some('-'));
        assert_eq!(format_delta(1_048_576), "+1.00 MB");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(12.345), "+12.3%");
        assert_eq!(format_percent(-50.0), "-50.0%");
        assert_eq!(format_percent(0.0), "0.0%");
    }

    #[test]
    fn test_truncate_path_keeps_tail() {
        assert_eq!(truncate_path("src/a.cpp", 20), "src/a.cpp");
        assert_eq!(truncate_path("very/long/path/to/file.cpp", 12), ".../file.cpp");
        assert_eq!(truncate_path("very/long/path/to/file.cpp", 12).chars().count(), 12);
    }
}
