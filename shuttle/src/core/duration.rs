//! Human-readable duration parsing (`"2h30m"`, `"90s"`, `"600"`).

use std::sync::LazyLock;

use anyhow::{Result, bail};
use regex::Regex;

static WHOLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\s*\d+\s*[hms])+\s*$").expect("duration pattern compiles")
});
static PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*([hms])").expect("duration part pattern compiles"));

/// Parse a duration into whole seconds.
///
/// Accepts a bare integer (seconds) or any sequence of `<n>h`, `<n>m`, `<n>s`
/// terms in any order, case-insensitive. Totals of zero are rejected.
pub fn parse_duration_secs(value: &str) -> Result<u64> {
    let s = value.trim().to_ascii_lowercase();
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        let secs: u64 = s
            .parse()
            .map_err(|_| anyhow::anyhow!("duration out of range: '{value}'"))?;
        if secs == 0 {
            bail!("duration must be > 0: '{value}'");
        }
        return Ok(secs);
    }

    if !WHOLE.is_match(&s) {
        bail!("invalid duration '{value}' (use forms like '10m', '2h', '1h30m', '90s')");
    }

    let mut total: u64 = 0;
    for caps in PART.captures_iter(&s) {
        let n: u64 = caps[1]
            .parse()
            .map_err(|_| anyhow::anyhow!("duration out of range: '{value}'"))?;
        let unit = match &caps[2] {
            "h" => 3600,
            "m" => 60,
            _ => 1,
        };
        total = n
            .checked_mul(unit)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(|| anyhow::anyhow!("duration out of range: '{value}'"))?;
    }
    if total == 0 {
        bail!("duration must be > 0: '{value}'");
    }
    Ok(total)
}

/// Render seconds back into the compact `1h30m5s` form.
pub fn format_duration_secs(secs: u64) -> String {
    if secs == 0 {
        return "0s".to_string();
    }
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    let mut out = String::new();
    if h > 0 {
        out.push_str(&format!("{h}h"));
    }
    if m > 0 {
        out.push_str(&format!("{m}m"));
    }
    if s > 0 {
        out.push_str(&format!("{s}s"));
    }
    out
}
