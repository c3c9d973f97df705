//! Event Delegation
//!
//! Listener registrations keyed by container node. A delegated handler sits
//! on a container and fires for descendants matching its selector, the way
//! `$(container).on(type, selector, fn)` does. The callbacks themselves live
//! with the host; this table only stores and routes handler IDs.

use crate::{DomEvent, DomTree, EventType, NodeId, Selector};

/// Event handler identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub u64);

/// Registered handler
#[derive(Debug, Clone)]
pub struct DelegatedHandler {
    pub handler_id: HandlerId,
    /// Node the listener is attached to
    pub container: NodeId,
    pub event_type: EventType,
    /// `None` for a direct listener on `container`
    pub selector: Option<Selector>,
}

/// One handler invocation produced by routing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub handler_id: HandlerId,
    /// Element the handler runs for (`this` in the handler)
    pub current_target: NodeId,
    /// Node the listener is attached to
    pub container: NodeId,
}

/// Handler registrations in insertion order
#[derive(Debug, Default)]
pub struct DelegationTable {
    handlers: Vec<DelegatedHandler>,
    next_id: u64,
}

impl DelegationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler and return its ID
    pub fn add(
        &mut self,
        container: NodeId,
        event_type: EventType,
        selector: Option<Selector>,
    ) -> HandlerId {
        self.next_id += 1;
        let handler_id = HandlerId(self.next_id);
        tracing::debug!(
            ?handler_id,
            ?container,
            event = %event_type,
            selector = selector.as_ref().map(Selector::as_str),
            "handler registered"
        );
        self.handlers.push(DelegatedHandler {
            handler_id,
            container,
            event_type,
            selector,
        });
        handler_id
    }

    /// Remove a handler; returns whether it existed
    pub fn remove(&mut self, handler_id: HandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|h| h.handler_id != handler_id);
        self.handlers.len() < before
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn get(&self, handler_id: HandlerId) -> Option<&DelegatedHandler> {
        self.handlers.iter().find(|h| h.handler_id == handler_id)
    }

    /// Compute the handler invocations for `event`.
    ///
    /// Walks from the target towards the root. At each container, delegated
    /// handlers run first for matching descendants on the path (deepest
    /// first), then direct handlers run for the container itself.
    /// Non-bubbling events only reach direct handlers on the target.
    pub fn route(&self, tree: &DomTree, event: &DomEvent) -> Vec<RouteEntry> {
        let path: Vec<NodeId> = if event.bubbles {
            tree.ancestors(event.target).collect()
        } else {
            vec![event.target]
        };

        let mut route = Vec::new();
        for (depth, &container) in path.iter().enumerate() {
            let below = &path[..depth];
            let here = self
                .handlers
                .iter()
                .filter(|h| h.container == container && h.event_type == event.event_type);

            for handler in here.clone() {
                let Some(selector) = &handler.selector else { continue };
                for &node in below {
                    if tree.element(node).is_ok_and(|e| selector.matches(e)) {
                        route.push(RouteEntry {
                            handler_id: handler.handler_id,
                            current_target: node,
                            container,
                        });
                    }
                }
            }
            for handler in here.filter(|h| h.selector.is_none()) {
                route.push(RouteEntry {
                    handler_id: handler.handler_id,
                    current_target: container,
                    container,
                });
            }
        }
        route
    }
}
