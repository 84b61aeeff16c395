use humansize::{format_size as human_format_size, BINARY};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Format a byte count for humans (KiB, MiB, GiB)
pub fn format_size(size: u64) -> String {
    human_format_size(size, BINARY)
}

/// Format a float as GB with two decimals
pub fn format_gb(gb: f64) -> String {
    format!("{:.2}", gb)
}

/// Format runtime minutes as "1h 05m" or "45m"
pub fn format_runtime(minutes: Option<f64>) -> String {
    let Some(minutes) = minutes else {
        return "N/A".to_string();
    };
    let total = minutes.round() as u64;
    if total >= 60 {
        format!("{}h {:02}m", total / 60, total % 60)
    } else {
        format!("{}m", total)
    }
}

pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(value) => format!("{:.1}", value),
        None => "N/A".to_string(),
    }
}

/// Truncate to a display width, ending with an ellipsis when cut
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}
