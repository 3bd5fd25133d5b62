//! # Text Normalization Module
//!
//! ## Purpose
//! Canonicalizes raw extracted text before any downstream analysis. Every
//! pipeline component consumes normalized text only.
//!
//! ## Input/Output Specification
//! - **Input**: Raw text from the extraction layer (may contain tabs, form
//!   feeds, non-breaking spaces, line/paragraph separators, control bytes)
//! - **Output**: Single-space-separated, trimmed text
//! - **Guarantees**: Never fails; idempotent (`normalize(normalize(x)) ==
//!   normalize(x)`)

/// Collapse all whitespace variants to single spaces, drop non-whitespace
/// control characters and trim both ends.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;

    for ch in raw.chars() {
        if ch.is_whitespace() {
            // Tabs, newlines, form feeds, NBSP, line/paragraph separators
            // all collapse into one pending space.
            pending_space = !out.is_empty();
        } else if ch.is_control() {
            // Stray control bytes carry no content.
            continue;
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(ch);
        }
    }

    out
}
