use crate::fetch::{PriceBar, PriceHistory};
use crate::utils::{display_width, iso_timestamp, pad_left, pad_right};

const HEADERS: [&str; 8] = [
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Dividends",
    "Stock Splits",
];

/// Render the `=== SYMBOL ===` block followed by an aligned table of every bar.
pub fn render_preview(history: &PriceHistory) -> String {
    let rows: Vec<[String; 8]> = history.bars.iter().map(row_cells).collect();

    let mut widths = HEADERS.map(display_width);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(display_width(cell));
        }
    }

    let mut out = format!("\n=== {} ===\n", history.symbol);
    push_line(&mut out, &HEADERS.map(str::to_string), &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn row_cells(bar: &PriceBar) -> [String; 8] {
    [
        iso_timestamp(&bar.timestamp),
        price(bar.open),
        price(bar.high),
        price(bar.low),
        price(bar.close),
        bar.volume
            .map_or_else(|| "NaN".to_string(), |volume| volume.to_string()),
        format!("{:.2}", bar.dividends),
        format!("{:.1}", bar.stock_splits),
    ]
}

fn price(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.4}")
    } else {
        "NaN".to_string()
    }
}

fn push_line(out: &mut String, cells: &[String; 8], widths: &[usize; 8]) {
    let line = cells
        .iter()
        .zip(widths.iter())
        .enumerate()
        .map(|(i, (cell, &width))| {
            if i == 0 {
                pad_right(cell, width)
            } else {
                pad_left(cell, width)
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
