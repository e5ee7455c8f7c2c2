//! Shared DOM helpers for the extraction passes.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

pub(crate) static TD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("valid selector"));
pub(crate) static SPAN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span").expect("valid selector"));

static GRADE_TABLE_ROWS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table#xemDiem tr").expect("valid selector"));
static ANY_TABLE_ROWS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table tr").expect("valid selector"));

/// Decimal with a fractional part, comma or dot separated. Plain integers
/// (credit counts, row numbers) deliberately do not match.
pub(crate) static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+[,.]\d+").expect("valid regex"));

/// Collapse runs of whitespace into single spaces.
pub(crate) fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace-normalized text content of an element.
pub(crate) fn text_of(el: &ElementRef) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// Next `<td>` sibling of a cell, skipping text nodes between them.
pub(crate) fn next_td<'a>(cell: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    cell.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "td")
}

/// Parse a whole cell as a decimal, tolerating the comma separator the
/// portal uses. Empty or non-numeric cells are `None`, never zero.
pub(crate) fn parse_decimal(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.replace(',', ".").parse().ok()
}

/// First decimal embedded in a run of text.
pub(crate) fn first_decimal(s: &str) -> Option<f64> {
    DECIMAL.find(s).and_then(|m| parse_decimal(m.as_str()))
}

/// All decimals embedded in a run of text, in order.
pub(crate) fn decimals_in(s: &str) -> Vec<f64> {
    DECIMAL
        .find_iter(s)
        .filter_map(|m| parse_decimal(m.as_str()))
        .collect()
}

/// Rows of the grade table. The portal marks it `id="xemDiem"`; page
/// variants without the id fall back to every table row on the page.
pub(crate) fn grade_rows(doc: &Html) -> Vec<ElementRef<'_>> {
    let rows: Vec<_> = doc.select(&GRADE_TABLE_ROWS).collect();
    if !rows.is_empty() {
        return rows;
    }
    doc.select(&ANY_TABLE_ROWS).collect()
}

/// Cells of one row.
pub(crate) fn cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.select(&TD).collect()
}
