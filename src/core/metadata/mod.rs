// ─── Metadata Tree ───
// Generic decoded JSON documents (release index, release metadata, asset
// index) and shape-checked lookups over them.

mod tree;

pub use tree::{decode, decode_str, parse_document, MetadataExt, MetadataTree, NodeKind};
