//! Display value normalizer.
//!
//! The career page renders every stat as text: `"1,234"`, `"42%"`,
//! `"1:23:45"`, `"12 minutes"`. Everything becomes an `f64`; durations in
//! seconds. Anything unreadable is `0.0`.

/// Parse a displayed stat value. Never panics, unreadable input yields `0.0`.
pub fn parse_value(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    if text.contains(':') {
        return parse_clock(text).unwrap_or(0.0);
    }

    if let Some(seconds) = parse_word_duration(text) {
        return seconds;
    }

    let text = text.strip_suffix('%').unwrap_or(text).trim_end();
    parse_number(text).unwrap_or(0.0)
}

/// Plain decimal with optional thousands separators and leading sign.
fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    let digits = cleaned.strip_prefix('-').unwrap_or(&cleaned);

    let mut dots = 0;
    let mut has_digit = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => has_digit = true,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if !has_digit || dots > 1 {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `H:MM:SS` or `MM:SS` into seconds.
fn parse_clock(text: &str) -> Option<f64> {
    let parts: Vec<&str> = text.split(':').map(str::trim).collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }

    let mut total = 0.0;
    for part in parts {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        total = total * 60.0 + part.parse::<f64>().ok()?;
    }
    Some(total)
}

/// `"5 hours"`, `"1 minute"`, `"30 seconds"` into seconds.
fn parse_word_duration(text: &str) -> Option<f64> {
    let (amount, unit) = text.split_once(char::is_whitespace)?;
    let factor = match unit.trim().to_ascii_lowercase().as_str() {
        "hour" | "hours" => 3600.0,
        "minute" | "minutes" => 60.0,
        "second" | "seconds" => 1.0,
        _ => return None,
    };
    Some(parse_number(amount).unwrap_or(0.0) * factor)
}
