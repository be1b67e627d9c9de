use cryxtal_base::{DocumentId, ViewId};
use std::collections::HashMap;

use crate::viewport::Viewport;
use crate::{Error, Result};

#[derive(Clone, Debug)]
pub enum ViewKind {
    ThreeD(Viewport),
    Drawing,
    Spreadsheet,
}

#[derive(Clone, Debug)]
pub struct ViewWindow {
    id: ViewId,
    document: DocumentId,
    title: String,
    kind: ViewKind,
}

impl ViewWindow {
    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> &ViewKind {
        &self.kind
    }

    pub fn as_three_d(&self) -> Option<&Viewport> {
        match &self.kind {
            ViewKind::ThreeD(viewport) => Some(viewport),
            _ => None,
        }
    }

    pub fn as_three_d_mut(&mut self) -> Option<&mut Viewport> {
        match &mut self.kind {
            ViewKind::ThreeD(viewport) => Some(viewport),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Document {
    id: DocumentId,
    label: String,
    views: Vec<ViewId>,
}

impl Document {
    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn views(&self) -> &[ViewId] {
        &self.views
    }
}

/// Every open window, grouped by document, in opening order.
#[derive(Clone, Debug, Default)]
pub struct ViewRegistry {
    documents: Vec<Document>,
    windows: HashMap<ViewId, ViewWindow>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_document(&mut self, label: impl Into<String>) -> DocumentId {
        let id = DocumentId::new();
        self.documents.push(Document {
            id,
            label: label.into(),
            views: Vec::new(),
        });
        id
    }

    /// Forgets the document; its windows must already be closed.
    pub(crate) fn remove_document(&mut self, id: DocumentId) -> Option<Document> {
        let index = self.documents.iter().position(|doc| doc.id == id)?;
        Some(self.documents.remove(index))
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id == id)
    }

    pub fn document_by_label(&self, label: &str) -> Option<DocumentId> {
        self.documents
            .iter()
            .find(|doc| doc.label == label)
            .map(|doc| doc.id)
    }

    pub(crate) fn insert_window(
        &mut self,
        document: DocumentId,
        title: impl Into<String>,
        kind: ViewKind,
    ) -> Result<ViewId> {
        let doc = self
            .documents
            .iter_mut()
            .find(|doc| doc.id == document)
            .ok_or(Error::UnknownDocument(document))?;
        let id = ViewId::new();
        doc.views.push(id);
        self.windows.insert(
            id,
            ViewWindow {
                id,
                document,
                title: title.into(),
                kind,
            },
        );
        Ok(id)
    }

    pub(crate) fn remove_window(&mut self, id: ViewId) -> Option<ViewWindow> {
        let window = self.windows.remove(&id)?;
        if let Some(doc) = self.documents.iter_mut().find(|doc| doc.id == window.document) {
            doc.views.retain(|view| *view != id);
        }
        Some(window)
    }

    pub fn window(&self, id: ViewId) -> Option<&ViewWindow> {
        self.windows.get(&id)
    }

    pub fn title(&self, id: ViewId) -> Option<&str> {
        self.windows.get(&id).map(|window| window.title())
    }

    pub fn viewport(&self, id: ViewId) -> Option<&Viewport> {
        self.windows.get(&id).and_then(ViewWindow::as_three_d)
    }

    pub(crate) fn viewport_mut(&mut self, id: ViewId) -> Option<&mut Viewport> {
        self.windows.get_mut(&id).and_then(ViewWindow::as_three_d_mut)
    }

    /// All windows across all documents, in document then opening order.
    pub fn windows(&self) -> impl Iterator<Item = &ViewWindow> + '_ {
        self.documents
            .iter()
            .flat_map(|doc| doc.views.iter())
            .filter_map(|id| self.windows.get(id))
    }

    /// All 3D viewports across all documents.
    pub fn viewports(&self) -> impl Iterator<Item = (ViewId, &Viewport)> + '_ {
        self.windows()
            .filter_map(|window| window.as_three_d().map(|viewport| (window.id, viewport)))
    }

    pub fn view_ids(&self) -> Vec<ViewId> {
        self.viewports().map(|(id, _)| id).collect()
    }

    /// First 3D viewport titled `title`, skipping `exclude`.
    pub fn find_viewport(&self, title: &str, exclude: Option<ViewId>) -> Option<ViewId> {
        self.windows()
            .filter(|window| Some(window.id) != exclude && window.title == title)
            .find(|window| window.as_three_d().is_some())
            .map(|window| window.id)
    }

    pub fn window_by_title(&self, title: &str) -> Option<ViewId> {
        self.windows()
            .find(|window| window.title == title)
            .map(|window| window.id)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
