//! DOM Tree (arena-based allocation)

use crate::node::NodeData;
use crate::{DomError, ElementData, Node, NodeId};

/// Arena-based DOM tree. Index 0 is always the document node.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Element data, or an error if `id` is missing or not an element
    pub fn element(&self, id: NodeId) -> Result<&ElementData, DomError> {
        self.get(id)
            .ok_or(DomError::UnknownNode(id))?
            .as_element()
            .ok_or(DomError::NotAnElement(id))
    }

    pub fn element_mut(&mut self, id: NodeId) -> Result<&mut ElementData, DomError> {
        self.get_mut(id)
            .ok_or(DomError::UnknownNode(id))?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))
    }

    /// Number of nodes in the tree, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append `child` to `parent`, moving it out of its previous parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.get(parent).is_none() {
            return Err(DomError::UnknownNode(parent));
        }
        if self.get(child).is_none() {
            return Err(DomError::UnknownNode(child));
        }
        if child == NodeId::ROOT || self.ancestors(parent).any(|a| a == child) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child)?;
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        Ok(())
    }

    /// Remove `child` (and its subtree) from its parent; the nodes stay in the arena
    pub fn detach(&mut self, child: NodeId) -> Result<(), DomError> {
        let parent = self.get(child).ok_or(DomError::UnknownNode(child))?.parent;
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.retain(|&c| c != child);
            self.nodes[child.index()].parent = None;
        }
        Ok(())
    }

    /// `id` followed by each of its ancestors up to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.get(id).map(|_| id), move |&current| {
            self.get(current).and_then(|n| n.parent)
        })
    }

    /// Whether `id` is reachable from the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.ancestors(id).last() == Some(NodeId::ROOT)
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Subtree of `root` in document order, `root` included
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Concatenated text of the subtree
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|n| match &self.get(n)?.data {
                NodeData::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}
