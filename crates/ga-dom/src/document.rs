//! Document - High-level document API

use crate::{DomError, DomTree, ElementRef, NodeId, Selector};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
}

impl Document {
    /// Create a document with `<html><head></head><body></body></html>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created nodes under the root cannot form a cycle.
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    pub fn head(&self) -> NodeId {
        self.head_element
    }

    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Create a detached element with the given attributes
    pub fn create_element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.tree.create_element(tag);
        if let Ok(elem) = self.tree.element_mut(id) {
            for (name, value) in attrs {
                elem.set_attr(name, value);
            }
        }
        id
    }

    /// Create an element and append it to `parent`
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> Result<NodeId, DomError> {
        let id = self.create_element(tag, attrs);
        self.tree.append_child(parent, id)?;
        Ok(id)
    }

    /// Remove a node (and its subtree) from the document
    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        tracing::debug!(?id, "removing node from document");
        self.tree.detach(id)
    }

    /// Read-only view of an element
    pub fn element(&self, id: NodeId) -> Result<ElementRef<'_>, DomError> {
        ElementRef::new(&self.tree, id)
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.tree.element(id).ok()?.get_attr(name)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.tree.element_mut(id)?.set_attr(name, value);
        Ok(())
    }

    pub fn is_connected(&self, id: NodeId) -> bool {
        self.tree.is_connected(id)
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&n| self.tree.element(n).is_ok_and(|e| e.id() == Some(id)))
    }

    /// All connected elements matching `selector`, in document order
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .filter(|&n| self.tree.element(n).is_ok_and(|e| selector.matches(e)))
            .collect()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
