//! Paragraph and run views over `w:p` elements.
//!
//! Runs are the direct `w:r` children of a paragraph. Text lives in `w:t`
//! children of each run; `w:tab` and `w:br`/`w:cr` map to TAB and newline
//! when extracting, mirroring how word processors render them.

use crate::docx::xml::{XmlElement, XmlNode};

/// Iterate over a paragraph's runs.
pub fn runs<'a>(p: &'a XmlElement) -> impl Iterator<Item = &'a XmlElement> {
    p.children_named("r")
}

/// Iterate mutably over a paragraph's runs.
pub fn runs_mut<'a>(p: &'a mut XmlElement) -> impl Iterator<Item = &'a mut XmlElement> {
    p.children_named_mut("r")
}

/// Text content of a single run.
pub fn run_text(r: &XmlElement) -> String {
    let mut out = String::new();
    for el in r.child_elements() {
        match el.local_name() {
            "t" => out.push_str(&el.text()),
            "tab" => out.push('\t'),
            "br" | "cr" => out.push('\n'),
            _ => {},
        }
    }
    out
}

/// Concatenated text of all runs in a paragraph.
pub fn paragraph_text(p: &XmlElement) -> String {
    let mut out = String::new();
    for run in runs(p) {
        out.push_str(&run_text(run));
    }
    out
}

/// Replace the text content of a run.
///
/// Removes the run's text-bearing children (`w:t`, `w:tab`, `w:br`, `w:cr`)
/// while keeping `w:rPr` and any non-text content such as drawings. TAB and
/// newline characters in the new text become `w:tab` and `w:br` elements
/// again, so [`run_text`] and this setter round-trip. `xml:space="preserve"`
/// is always set so edge whitespace in replacement values survives.
pub fn set_run_text(r: &mut XmlElement, text: &str) {
    r.children.retain(|node| match node {
        XmlNode::Element(el) => !matches!(el.local_name(), "t" | "tab" | "br" | "cr"),
        XmlNode::Text(_) => false,
        XmlNode::Comment(_) => true,
    });

    let mut emitted = false;
    let mut segment = String::new();
    for ch in text.chars() {
        match ch {
            '\t' | '\n' => {
                if !segment.is_empty() {
                    push_text_element(r, &segment);
                    segment.clear();
                }
                r.push_element(XmlElement::new(if ch == '\t' { "w:tab" } else { "w:br" }));
                emitted = true;
            },
            _ => segment.push(ch),
        }
    }
    if !segment.is_empty() || !emitted {
        push_text_element(r, &segment);
    }
}

fn push_text_element(r: &mut XmlElement, text: &str) {
    let mut t = XmlElement::new("w:t");
    t.set_attr("xml:space", "preserve");
    if !text.is_empty() {
        t.children.push(XmlNode::Text(text.to_string()));
    }
    r.push_element(t);
}
