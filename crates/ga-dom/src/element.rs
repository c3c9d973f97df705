//! Element view
//!
//! Borrowed handle pairing a tree with one element.

use crate::{DomError, DomTree, ElementData, NodeId, Selector};

/// Read-only view of one element in a tree
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
    data: &'a ElementData,
}

impl<'a> ElementRef<'a> {
    pub fn new(tree: &'a DomTree, id: NodeId) -> Result<Self, DomError> {
        let data = tree.element(id)?;
        Ok(Self { tree, id, data })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tag_name(&self) -> &'a str {
        &self.data.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.data.get_attr(name)
    }

    pub fn is_hyperlink(&self) -> bool {
        self.data.is_hyperlink()
    }

    pub fn matches(&self, selector: &Selector) -> bool {
        selector.matches(self.data)
    }

    /// Nearest inclusive ancestor matching `selector`
    pub fn closest(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.tree
            .ancestors(self.id)
            .filter_map(|n| ElementRef::new(self.tree, n).ok())
            .find(|e| e.matches(selector))
    }
}
