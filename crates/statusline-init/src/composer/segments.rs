//! Host-side reference for the arithmetic embedded in generated scripts.
//!
//! The composer emits shell versions of these functions; the constants here
//! are interpolated into that shell text so both sides agree on glyphs and
//! thresholds.

/// Filled progress bar cell.
pub const FILL_GLYPH: char = '▓';
/// Empty progress bar cell.
pub const EMPTY_GLYPH: char = '░';
/// Width of the context and session progress bars.
pub const BAR_WIDTH: u32 = 10;

/// Remaining session percentage at or below which the critical color is used.
pub const SESSION_CRITICAL_PCT: i64 = 10;
/// Remaining session percentage at or below which the warning color is used.
pub const SESSION_WARNING_PCT: i64 = 25;

/// Render `pct` percent of `width` cells; `pct` is clamped to `0..=100`.
pub fn progress_bar(pct: i64, width: u32) -> String {
    let pct = pct.clamp(0, 100) as u64;
    let width = u64::from(width);
    let filled = pct * width / 100;
    let empty = width - filled;

    let mut bar = String::with_capacity((width as usize) * FILL_GLYPH.len_utf8());
    bar.extend(std::iter::repeat_n(FILL_GLYPH, filled as usize));
    bar.extend(std::iter::repeat_n(EMPTY_GLYPH, empty as usize));
    bar
}

/// Insert `,` every three digits for integers above 999.
///
/// Anything that is not a plain run of ASCII digits is returned unchanged.
pub fn format_thousands(value: &str) -> String {
    let is_number = !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit());
    if !is_number || value.parse::<u64>().map_or(true, |n| n <= 999) {
        return value.to_string();
    }

    let digits = value.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(char::from(*digit));
    }
    out
}

/// Color band for the time left in a usage block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBand {
    Critical,
    Warning,
    Good,
}

impl SessionBand {
    /// Band for a remaining percentage.
    pub fn from_remaining_pct(remaining_pct: i64) -> Self {
        if remaining_pct <= SESSION_CRITICAL_PCT {
            Self::Critical
        } else if remaining_pct <= SESSION_WARNING_PCT {
            Self::Warning
        } else {
            Self::Good
        }
    }

    /// 256-color SGR parameters for the band.
    pub fn ansi_code(&self) -> &'static str {
        match self {
            Self::Critical => "38;5;196", // bright red
            Self::Warning => "38;5;208",  // orange
            Self::Good => "38;5;120",     // bright green
        }
    }
}

/// A usage block, in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    pub start: i64,
    pub end: i64,
}

impl SessionWindow {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    fn total(&self) -> i64 {
        (self.end - self.start).max(1)
    }

    /// Percent of the window elapsed at `now`, in `0..=100`.
    pub fn elapsed_pct(&self, now: i64) -> i64 {
        let total = self.total();
        (now - self.start).clamp(0, total) * 100 / total
    }

    /// Seconds until the window ends, never negative.
    pub fn remaining_secs(&self, now: i64) -> i64 {
        (self.end - now).max(0)
    }

    /// Remaining time as whole hours and minutes.
    pub fn remaining_hm(&self, now: i64) -> (i64, i64) {
        let remaining = self.remaining_secs(now);
        (remaining / 3600, (remaining % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(bar: &str, glyph: char) -> usize {
        bar.chars().filter(|c| *c == glyph).count()
    }

    #[test]
    fn test_progress_bar_bounds() {
        let empty = progress_bar(0, 10);
        assert_eq!(count(&empty, EMPTY_GLYPH), 10);
        assert_eq!(count(&empty, FILL_GLYPH), 0);

        let full = progress_bar(100, 10);
        assert_eq!(count(&full, FILL_GLYPH), 10);
        assert_eq!(count(&full, EMPTY_GLYPH), 0);

        assert_eq!(progress_bar(50, 10), "▓▓▓▓▓░░░░░");
    }

    #[test]
    fn test_progress_bar_clamps_out_of_range() {
        assert_eq!(progress_bar(-20, 10), progress_bar(0, 10));
        assert_eq!(progress_bar(250, 10), progress_bar(100, 10));
    }

    #[test]
    fn test_progress_bar_floors() {
        // 19% of 10 cells is 1.9 cells
        assert_eq!(count(&progress_bar(19, 10), FILL_GLYPH), 1);
        assert_eq!(progress_bar(33, 3).chars().count(), 3);
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands("999"), "999");
        assert_eq!(format_thousands("1000"), "1,000");
        assert_eq!(format_thousands("1234567"), "1,234,567");
        assert_eq!(format_thousands("123456"), "123,456");
        assert_eq!(format_thousands("0"), "0");
    }

    #[test]
    fn test_format_thousands_leaves_non_numbers() {
        assert_eq!(format_thousands("abc"), "abc");
        assert_eq!(format_thousands("12.5"), "12.5");
        assert_eq!(format_thousands("-1500"), "-1500");
        assert_eq!(format_thousands(""), "");
    }

    #[test]
    fn test_session_band_boundaries() {
        assert_eq!(SessionBand::from_remaining_pct(0), SessionBand::Critical);
        assert_eq!(SessionBand::from_remaining_pct(10), SessionBand::Critical);
        assert_eq!(SessionBand::from_remaining_pct(11), SessionBand::Warning);
        assert_eq!(SessionBand::from_remaining_pct(25), SessionBand::Warning);
        assert_eq!(SessionBand::from_remaining_pct(26), SessionBand::Good);
        assert_eq!(SessionBand::from_remaining_pct(100), SessionBand::Good);
    }

    #[test]
    fn test_session_window_math() {
        let window = SessionWindow::new(1_000, 1_000 + 5 * 3600);

        assert_eq!(window.elapsed_pct(1_000), 0);
        assert_eq!(window.elapsed_pct(1_000 + 3600), 20);
        assert_eq!(window.remaining_hm(1_000 + 3600), (4, 0));

        // before the window and after it
        assert_eq!(window.elapsed_pct(0), 0);
        assert_eq!(window.elapsed_pct(1_000_000), 100);
        assert_eq!(window.remaining_secs(1_000_000), 0);
    }

    #[test]
    fn test_session_window_degenerate_total() {
        let window = SessionWindow::new(500, 400);
        assert_eq!(window.elapsed_pct(500), 0);
        assert_eq!(window.elapsed_pct(501), 100);
    }
}
