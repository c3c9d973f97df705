//! GA DOM - Document Object Model
//!
//! Small arena-backed DOM used by the analytics plugin: elements with
//! attributes, simple selectors, and delegated event routing.

mod attributes;
mod dataset;
mod delegation;
mod document;
mod dom_events;
mod element;
mod node;
mod selector;
mod tree;

pub use attributes::{Attr, NamedNodeMap};
pub use dataset::data_attribute_name;
pub use delegation::{DelegatedHandler, DelegationTable, HandlerId, RouteEntry};
pub use document::Document;
pub use dom_events::{DomEvent, EventType};
pub use element::ElementRef;
pub use node::{ElementData, Node, NodeData};
pub use selector::{Selector, SimpleSelector};
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// DOM error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),

    #[error("node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("cannot append {child:?} to {parent:?}: would create a cycle")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("invalid selector: {0:?}")]
    InvalidSelector(String),
}
