//! Cumulative GPA extraction.
//!
//! The portal renders the cumulative-GPA statistic inconsistently across
//! page variants, so extraction is one ordered fallback chain:
//!
//! 1. Find the label cell ("Trung bình chung tích lũy", diacritic and
//!    spelling variants tolerated).
//! 2. In the adjacent value cell, prefer the second marked `<span>`: the
//!    first span is the 10-point figure, the second the 4-point one, and
//!    the two are visually concatenated.
//! 3. Without usable spans, scan the decimals in the value cell and keep
//!    a candidate inside `[0, 4]`; out-of-range numbers are the 10-point
//!    figure and are discarded.
//! 4. As a last resort scan the whole document for decimals in `[0, 4]`
//!    and take the final occurrence. Lowest confidence, logged as such.
//! 5. Otherwise the GPA is absent. Never zero: a missing statistic must
//!    stay distinguishable from a failing one.

use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::dom::{decimals_in, first_decimal, next_td, text_of, SPAN, TD};
use crate::error::ExtractError;

/// Label match for the cumulative-GPA cell. The final syllable is spelled
/// "lũy" or "luỹ" depending on the page variant; both forms (and the
/// unaccented "luy") match.
static GPA_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)trung\s*bình\s*chung\s*tích\s*l[uũ][yỹ]").expect("valid regex")
});

pub(crate) fn in_scale4(value: f64) -> bool {
    (0.0..=4.0).contains(&value)
}

/// Run the fallback chain over a parsed score page.
pub fn extract_gpa(doc: &Html) -> Option<f64> {
    for cell in doc.select(&TD) {
        if !GPA_LABEL.is_match(&text_of(&cell)) {
            continue;
        }
        match gpa_near_label(&cell) {
            Ok(gpa) => {
                debug!("GPA {} found next to the statistics label", gpa);
                return Some(gpa);
            }
            Err(e) => debug!("GPA label candidate unusable: {}", e),
        }
    }
    document_scan(doc)
}

/// Stages 2 and 3: the value cell adjacent to a matched label.
fn gpa_near_label(label_cell: &ElementRef) -> Result<f64, ExtractError> {
    let value_cell = next_td(label_cell)
        .ok_or(ExtractError::ParseAmbiguity("no value cell after the GPA label"))?;

    // Second sub-span holds the 4-point figure when both spans exist.
    let spans: Vec<ElementRef> = value_cell.select(&SPAN).collect();
    if spans.len() >= 2 {
        if let Some(value) = first_decimal(&text_of(&spans[1])) {
            if in_scale4(value) {
                return Ok(value);
            }
            debug!("second sub-span value {} is on the 10-point scale, discarded", value);
        }
    }

    // Windowed scan over the value cell's text. The second decimal is the
    // expected position of the 4-point figure; any other in-range decimal
    // is accepted after the out-of-range ones are discarded.
    let decimals = decimals_in(&text_of(&value_cell));
    if decimals.len() >= 2 && in_scale4(decimals[1]) {
        return Ok(decimals[1]);
    }
    decimals
        .into_iter()
        .find(|v| in_scale4(*v))
        .ok_or(ExtractError::ParseAmbiguity("no 4-point value near the GPA label"))
}

/// Stage 4: whole-document scan, last in-range decimal wins.
fn document_scan(doc: &Html) -> Option<f64> {
    let text = doc.root_element().text().collect::<String>();
    let found = decimals_in(&text).into_iter().filter(|v| in_scale4(*v)).last();
    match found {
        Some(value) => {
            warn!("⚠️ GPA {} taken from a whole-document scan (low confidence)", value);
            Some(value)
        }
        None => None,
    }
}
