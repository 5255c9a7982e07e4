//! Placeholder substitution across paragraphs and runs.
//!
//! Word splits a paragraph's text into formatted runs wherever formatting
//! changes, and editing a template can split a `{{TOKEN}}` across run
//! boundaries (e.g. half of it bolded). Substitution therefore happens in
//! two passes per paragraph:
//!
//! 1. **Per-run pass**: a token wholly inside one run is replaced in place,
//!    keeping that run's formatting and leaving sibling runs untouched.
//! 2. **Split-token fallback**: the paragraph's run texts are concatenated
//!    and the mapping applied to the whole string; if anything changed, the
//!    result is collapsed into the first run and the remaining runs are
//!    blanked. Mixed formatting inside a split token is sacrificed, but no
//!    partial token ever survives.
//!
//! Tokens with no matching field are left verbatim; that is never an error.

use crate::docx::Document;
use crate::docx::paragraph;
use crate::docx::xml::XmlElement;
use crate::error::Result;
use crate::merge::fields::PlaceholderMap;
use smallvec::SmallVec;
use tracing::debug;

/// Replace every populated field's token throughout the document.
///
/// Visits body paragraphs and every table-cell paragraph at any nesting
/// depth. Mutates the in-memory document only.
pub fn replace_in_document(doc: &mut Document, map: &PlaceholderMap) -> Result<()> {
    if map.is_empty() {
        return Ok(());
    }
    let tokens = map.tokens();
    let mut paragraphs = 0usize;
    doc.for_each_paragraph_mut(|p| {
        replace_in_paragraph(p, &tokens);
        paragraphs += 1;
    })?;
    debug!(fields = tokens.len(), paragraphs, "placeholder substitution done");
    Ok(())
}

/// Apply the two substitution passes to one paragraph.
pub(crate) fn replace_in_paragraph(p: &mut XmlElement, tokens: &[(String, &str)]) {
    for run in paragraph::runs_mut(p) {
        let text = paragraph::run_text(run);
        if let Some(replaced) = apply_tokens(&text, tokens) {
            paragraph::set_run_text(run, &replaced);
        }
    }

    let full: String = paragraph::runs(p).map(|run| paragraph::run_text(run)).collect();
    if let Some(merged) = apply_tokens(&full, tokens) {
        let mut runs: SmallVec<[&mut XmlElement; 8]> = paragraph::runs_mut(p).collect();
        if let Some((first, rest)) = runs.split_first_mut() {
            paragraph::set_run_text(first, &merged);
            for run in rest {
                paragraph::set_run_text(run, "");
            }
        }
    }
}

/// Replace every known token in `text`, returning `None` when nothing matched.
fn apply_tokens(text: &str, tokens: &[(String, &str)]) -> Option<String> {
    // Fast path: no token opener, no work
    memchr::memmem::find(text.as_bytes(), b"{{")?;

    let mut out = text.to_string();
    let mut changed = false;
    for (token, value) in tokens {
        if out.contains(token.as_str()) {
            out = out.replace(token.as_str(), value);
            changed = true;
        }
    }
    changed.then_some(out)
}
