use lopdf::Document;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressionStats {
    pub pruned_objects: usize,
    pub dropped_streams: usize,
}

/// Rewrite a document in place for a smaller resave: unreachable objects and
/// empty streams go, remaining streams are Flate-compressed and object ids
/// are made dense.
pub fn compress_document(doc: &mut Document) -> CompressionStats {
    let pruned_objects = doc.prune_objects().len();
    let dropped_streams = doc.delete_zero_length_streams().len();
    doc.compress();
    doc.renumber_objects();

    debug!(pruned_objects, dropped_streams, "compressed document");
    CompressionStats {
        pruned_objects,
        dropped_streams,
    }
}
