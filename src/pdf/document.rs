use anyhow::{Context, Result};
use lopdf::{Document, Object};
use std::collections::BTreeSet;
use std::path::Path;

pub struct PdfDocument {
    pub doc: Document,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to open PDF: {}", path.display()))?;
        Self::from_bytes(&bytes).with_context(|| format!("Cannot use PDF: {}", path.display()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes).context("Failed to parse PDF")?;
        Self::checked(doc)
    }

    fn checked(doc: Document) -> Result<Self> {
        if doc.is_encrypted() {
            anyhow::bail!("PDF is encrypted");
        }
        Ok(PdfDocument { doc })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get metadata from the document info dictionary
    pub fn get_info(&self) -> PdfInfo {
        let mut info = PdfInfo::default();

        if let Ok(Object::Reference(info_ref)) = self.doc.trailer.get(b"Info") {
            if let Ok(Object::Dictionary(dict)) = self.doc.get_object(*info_ref) {
                info.title = get_string_from_dict(dict, b"Title");
                info.author = get_string_from_dict(dict, b"Author");
                info.creator = get_string_from_dict(dict, b"Creator");
                info.producer = get_string_from_dict(dict, b"Producer");
                info.creation_date = get_string_from_dict(dict, b"CreationDate");
                info.mod_date = get_string_from_dict(dict, b"ModDate");
                info.subject = get_string_from_dict(dict, b"Subject");
                info.keywords = get_string_from_dict(dict, b"Keywords");
            }
        }

        info.page_count = self.page_count();
        info
    }

    /// Copy the pages at the given zero-based indices into a new document.
    ///
    /// Pages keep their original relative order; objects only the dropped
    /// pages referenced are pruned.
    pub fn extract_pages(&self, indices: &[u32]) -> Result<Document> {
        if indices.is_empty() {
            anyhow::bail!("No pages selected");
        }

        let total = self.page_count();
        if let Some(&bad) = indices.iter().find(|&&i| i >= total) {
            anyhow::bail!("Page {} is out of range (1-{})", bad + 1, total);
        }

        // lopdf numbers pages from 1
        let keep: BTreeSet<u32> = indices.iter().map(|&i| i + 1).collect();
        let pages_to_delete: Vec<u32> = (1..=total).filter(|n| !keep.contains(n)).collect();

        let mut new_doc = self.doc.clone();
        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
            new_doc.prune_objects();
        }

        Ok(new_doc)
    }

    /// Compress streams and serialize, packing non-stream objects into
    /// object streams with a cross-reference stream.
    pub fn to_bytes(doc: &mut Document) -> Result<Vec<u8>> {
        doc.compress();
        let mut buffer = Vec::new();
        doc.save_modern(&mut buffer).context("Failed to serialize PDF")?;
        Ok(buffer)
    }

    /// Save to a file, returning the number of bytes written
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<usize> {
        let path = path.as_ref();
        let bytes = Self::to_bytes(doc)?;
        std::fs::write(path, &bytes)
            .with_context(|| format!("Failed to save PDF: {}", path.display()))?;
        Ok(bytes.len())
    }
}

#[derive(Debug, Default, Clone)]
pub struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub mod_date: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub page_count: u32,
}

fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key).ok().and_then(|obj| match obj {
        Object::String(bytes, _) => decode_pdf_string(bytes),
        _ => None,
    })
}

fn decode_pdf_string(bytes: &[u8]) -> Option<String> {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).ok()
        }
        // PDFDocEncoding, treated as Latin-1
        _ => Some(bytes.iter().map(|&b| b as char).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::{page_markers, sample_pdf};
    use lopdf::Dictionary;

    #[test]
    fn test_open_counts_pages() {
        let doc = PdfDocument::from_bytes(&sample_pdf(4)).unwrap();
        assert_eq!(doc.page_count(), 4);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(PdfDocument::from_bytes(b"not a pdf").is_err());
    }

    #[test]
    fn test_encrypted_is_rejected() {
        let mut doc = Document::load_mem(&sample_pdf(2)).unwrap();
        let encrypt = doc.add_object(Dictionary::from_iter(vec![
            ("Filter", Object::Name(b"Standard".to_vec())),
            ("V", Object::Integer(2)),
            ("R", Object::Integer(3)),
        ]));
        doc.trailer.set("Encrypt", Object::Reference(encrypt));

        let err = PdfDocument::checked(doc).err().unwrap();
        assert!(err.to_string().contains("PDF is encrypted"));
    }

    #[test]
    fn test_open_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4 truncated").unwrap();

        let err = PdfDocument::open(&path).err().unwrap();
        assert!(err.to_string().starts_with("Cannot use PDF"));
        assert!(PdfDocument::open(dir.path().join("missing.pdf")).is_err());
    }

    #[test]
    fn test_to_bytes_writes_object_streams() {
        let mut doc = PdfDocument::from_bytes(&sample_pdf(3)).unwrap().doc;
        let bytes = PdfDocument::to_bytes(&mut doc).unwrap();

        assert!(bytes.windows(b"/ObjStm".len()).any(|w| w == b"/ObjStm"));
        let reloaded = PdfDocument::from_bytes(&bytes).unwrap();
        assert_eq!(reloaded.page_count(), 3);
        assert_eq!(page_markers(&reloaded.doc), vec![1, 2, 3]);
        assert_eq!(reloaded.get_info().title.as_deref(), Some("Sample"));
    }

    #[test]
    fn test_extract_selected_pages() {
        let doc = PdfDocument::from_bytes(&sample_pdf(5)).unwrap();
        let mut extracted = doc.extract_pages(&[0, 2, 4]).unwrap();

        let bytes = PdfDocument::to_bytes(&mut extracted).unwrap();
        let reloaded = PdfDocument::from_bytes(&bytes).unwrap();
        assert_eq!(reloaded.page_count(), 3);
        assert_eq!(page_markers(&reloaded.doc), vec![1, 3, 5]);
    }

    #[test]
    fn test_extract_all_pages_keeps_document() {
        let doc = PdfDocument::from_bytes(&sample_pdf(3)).unwrap();
        let extracted = doc.extract_pages(&[0, 1, 2]).unwrap();
        assert_eq!(extracted.get_pages().len(), 3);
    }

    #[test]
    fn test_extract_rejects_empty_and_out_of_range() {
        let doc = PdfDocument::from_bytes(&sample_pdf(3)).unwrap();
        assert!(doc.extract_pages(&[]).is_err());
        let err = doc.extract_pages(&[1, 3]).unwrap_err();
        assert!(err.to_string().contains("Page 4 is out of range"));
    }

    #[test]
    fn test_info_reads_title() {
        let doc = PdfDocument::from_bytes(&sample_pdf(2)).unwrap();
        let info = doc.get_info();
        assert_eq!(info.page_count, 2);
        assert_eq!(info.title.as_deref(), Some("Sample"));
        assert_eq!(info.author, None);
    }

    #[test]
    fn test_decode_utf16_string() {
        let bytes = [0xFE, 0xFF, 0x00, b'H', 0x00, b'i'];
        assert_eq!(decode_pdf_string(&bytes).as_deref(), Some("Hi"));
        assert_eq!(decode_pdf_string(b"caf\xe9").as_deref(), Some("café"));
    }
}
