use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use conciliador_recon::CellValue;

/// Fit `s` into exactly `width` terminal columns: pad short text with spaces,
/// cut long text and mark the cut with `~`. Wide characters (CJK, emoji)
/// count as two columns.
pub(crate) fn fit_column(s: &str, width: usize) -> String {
    let used = s.width();
    if used <= width {
        return format!("{s}{}", " ".repeat(width - used));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut taken = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if taken + w > width - 1 {
            break;
        }
        out.push(ch);
        taken += w;
    }
    out.push('~');
    out.push_str(&" ".repeat(width - 1 - taken));
    out
}

/// Render a cell the way it appeared in the source file.
pub(crate) fn cell_text(cell: Option<&CellValue>) -> String {
    match cell {
        Some(CellValue::Text(s)) => s.clone(),
        Some(CellValue::Number(n)) => n.to_string(),
        Some(CellValue::Empty) | None => String::new(),
    }
}
