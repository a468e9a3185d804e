//! Attribution layer: campaign parameters from the page address, and link decoration
//! over an observable document tree.

pub mod document;
pub mod params;
pub mod rewriter;

pub use document::{Document, DocumentError, InsertionObserver, NodeData, NodeId, Tree};
pub use params::{AttributionParams, UTM_KEYS};
pub use rewriter::{LinkRewriter, install};
