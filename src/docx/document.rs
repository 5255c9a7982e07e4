//! The main document part (`word/document.xml`).

use crate::docx::paragraph;
use crate::docx::xml::{XmlElement, XmlPart};
use crate::error::{Error, Result};

/// A parsed WordprocessingML main document.
///
/// Wraps the `word/document.xml` element tree and provides access to the
/// document body. All merge operations mutate this in-memory tree; the
/// template file itself is never touched.
///
/// # Examples
///
/// ```rust,no_run
/// use quotegen::docx::{Document, DocxPackage};
///
/// let pkg = DocxPackage::open("template.docx")?;
/// let doc = Document::parse(pkg.document_xml()?)?;
/// println!("Document text: {}", doc.text()?);
/// # Ok::<(), quotegen::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    /// The parsed document.xml tree
    part: XmlPart,
}

impl Document {
    /// Parse the main document part.
    ///
    /// The root element must be `w:document` with a `w:body` child.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let part = XmlPart::parse(bytes)?;
        if !part.root.is("document") {
            return Err(Error::InvalidFormat(format!(
                "expected w:document root, got {}",
                part.root.name
            )));
        }
        if part.root.first_child("body").is_none() {
            return Err(Error::InvalidFormat("document has no w:body".to_string()));
        }
        Ok(Self { part })
    }

    /// Serialize the document back to XML bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.part.to_bytes()
    }

    /// The `w:body` element.
    pub fn body(&self) -> Result<&XmlElement> {
        self.part
            .root
            .first_child("body")
            .ok_or_else(|| Error::InvalidFormat("document has no w:body".to_string()))
    }

    /// The `w:body` element, mutable.
    pub fn body_mut(&mut self) -> Result<&mut XmlElement> {
        self.part
            .root
            .first_child_mut("body")
            .ok_or_else(|| Error::InvalidFormat("document has no w:body".to_string()))
    }

    /// Visit every paragraph in the document body, mutably.
    ///
    /// Descends through table rows and cells at any nesting depth, and into
    /// text-box content, so each `w:p` anywhere under the body is visited
    /// exactly once, in document order.
    pub fn for_each_paragraph_mut<F: FnMut(&mut XmlElement)>(&mut self, mut f: F) -> Result<()> {
        fn walk<F: FnMut(&mut XmlElement)>(el: &mut XmlElement, f: &mut F) {
            for child in el.child_elements_mut() {
                if child.is("p") {
                    f(child);
                }
                walk(child, f);
            }
        }
        walk(self.body_mut()?, &mut f);
        Ok(())
    }

    /// Plain text of every paragraph, joined with newlines.
    ///
    /// Uses the same traversal as [`Self::for_each_paragraph_mut`], so table
    /// cell text is included.
    pub fn text(&self) -> Result<String> {
        fn walk(el: &XmlElement, out: &mut Vec<String>) {
            for child in el.child_elements() {
                if child.is("p") {
                    out.push(paragraph::paragraph_text(child));
                }
                walk(child, out);
            }
        }
        let mut paragraphs = Vec::new();
        walk(self.body()?, &mut paragraphs);
        Ok(paragraphs.join("\n"))
    }
}
