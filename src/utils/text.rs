use unicode_width::UnicodeWidthStr;

/// Terminal column width of `text`.
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Right-align `text` within `width` terminal columns.
pub fn pad_left(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(text));
    format!("{}{}", " ".repeat(pad), text)
}

/// Left-align `text` within `width` terminal columns.
pub fn pad_right(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(text));
    format!("{}{}", text, " ".repeat(pad))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_by_display_width() {
        assert_eq!(pad_left("1.5", 5), "  1.5");
        assert_eq!(pad_right("Date", 6), "Date  ");
        assert_eq!(pad_left("toolong", 3), "toolong");
    }
}
