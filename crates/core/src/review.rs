//! Document review tracking for the approval screen.
//!
//! A reviewer must open every document attached to a request before an
//! approve decision is accepted. The session lives only as long as the
//! screen does.

use std::collections::HashSet;

use procura_shared::types::DocumentId;

use crate::request::Document;

/// Per-screen record of which documents were opened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSession {
    viewed: HashSet<DocumentId>,
    current_preview: Option<DocumentId>,
}

impl ReviewSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a document preview and marks it viewed.
    pub fn open_preview(&mut self, document: DocumentId) {
        self.viewed.insert(document);
        self.current_preview = Some(document);
    }

    /// Closes the preview. The document stays viewed.
    pub fn close_preview(&mut self) {
        self.current_preview = None;
    }

    /// Document currently shown, if any.
    #[must_use]
    pub const fn current_preview(&self) -> Option<DocumentId> {
        self.current_preview
    }

    /// Returns true if the document was opened in this session.
    #[must_use]
    pub fn has_viewed(&self, document: DocumentId) -> bool {
        self.viewed.contains(&document)
    }

    /// Number of distinct documents opened.
    #[must_use]
    pub fn viewed_count(&self) -> usize {
        self.viewed.len()
    }

    /// Documents of the request not yet opened, in the given order.
    #[must_use]
    pub fn unviewed<'a>(&self, documents: &'a [Document]) -> Vec<&'a Document> {
        documents
            .iter()
            .filter(|doc| !self.viewed.contains(&doc.id))
            .collect()
    }

    /// Returns true if every document was opened. A request without
    /// documents has nothing to review.
    #[must_use]
    pub fn all_viewed(&self, documents: &[Document]) -> bool {
        documents.iter().all(|doc| self.viewed.contains(&doc.id))
    }
}
