use anyhow::{Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

/// Attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Page trees deeper than this are treated as cyclic
const MAX_TREE_DEPTH: usize = 64;

/// Append every page of every document, in order, into a new document.
pub fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    if documents.len() < 2 {
        anyhow::bail!("At least 2 PDFs are required to merge");
    }

    let mut merged = Document::with_version("1.5");
    let pages_id = merged.new_object_id();
    let mut kids: Vec<Object> = Vec::new();

    for (n, mut doc) in documents.into_iter().enumerate() {
        // Shift this document's ids past everything merged so far
        doc.renumber_objects_with(merged.max_id + 1);

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        debug!(document = n, pages = page_ids.len(), "merging document");

        for &page_id in &page_ids {
            let inherited = inherited_attributes(&doc, page_id);
            let page = doc.get_dictionary_mut(page_id).with_context(|| {
                format!("Page {:?} of document {} is not a dictionary", page_id, n + 1)
            })?;
            for (key, value) in inherited {
                page.set(key, value);
            }
            page.set("Parent", Object::Reference(pages_id));
            kids.push(Object::Reference(page_id));
        }

        let doc_max = doc.objects.keys().map(|(id, _)| *id).max().unwrap_or(0);
        merged.max_id = merged.max_id.max(doc_max);
        merged.objects.extend(doc.objects);
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(kids.len() as i64)),
        ("Kids", Object::Array(kids)),
    ]);
    merged.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = merged.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    merged.trailer.set("Root", Object::Reference(catalog_id));

    // Drops the old catalogs and page tree nodes
    merged.prune_objects();

    Ok(merged)
}

/// Inheritable attributes the page lacks but an ancestor defines, nearest
/// ancestor first.
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, Object)> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };

    let mut found: Vec<(Vec<u8>, Object)> = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(node_id) else {
            break;
        };

        for key in INHERITABLE {
            if page.has(key) || found.iter().any(|(k, _)| k.as_slice() == key) {
                continue;
            }
            if let Ok(value) = node.get(key) {
                found.push((key.to_vec(), value.clone()));
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    found
}
