//! DOM Events
//!
//! User-interaction, load and custom events.

use crate::NodeId;
use std::fmt;

/// DOM event types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    Submit,
    Load,
    /// Any other event name, lowercased
    Custom(String),
}

impl EventType {
    /// Parse an event name, ignoring ASCII case
    pub fn parse(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "click" => Self::Click,
            "submit" => Self::Submit,
            "load" => Self::Load,
            _ => Self::Custom(name),
        }
    }

    /// Parse a whitespace-separated list such as `"click submit"`
    pub fn parse_list(names: &str) -> Vec<Self> {
        let mut out: Vec<Self> = Vec::new();
        for name in names.split_ascii_whitespace() {
            let ty = Self::parse(name);
            if !out.contains(&ty) {
                out.push(ty);
            }
        }
        out
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::Submit => "submit",
            Self::Load => "load",
            Self::Custom(name) => name,
        }
    }

    /// Check if this event type bubbles
    pub fn bubbles(&self) -> bool {
        !matches!(self, Self::Load)
    }

    /// Check if the default action can be prevented
    pub fn cancelable(&self) -> bool {
        matches!(self, Self::Click | Self::Submit)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DOM event
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub event_type: EventType,
    pub target: NodeId,
    pub current_target: Option<NodeId>,
    /// Custom event payload
    pub detail: Option<String>,
    pub bubbles: bool,
    pub cancelable: bool,
    pub timestamp: f64,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl DomEvent {
    /// Create an event with the type's default flags
    pub fn new(event_type: EventType, target: NodeId) -> Self {
        Self {
            bubbles: event_type.bubbles(),
            cancelable: event_type.cancelable(),
            event_type,
            target,
            current_target: None,
            detail: None,
            timestamp: 0.0,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create click event
    pub fn click(target: NodeId) -> Self {
        Self::new(EventType::Click, target)
    }

    /// Create a bubbling, non-cancelable custom event
    pub fn custom(name: &str, target: NodeId, detail: Option<String>) -> Self {
        Self {
            detail,
            bubbles: true,
            cancelable: false,
            ..Self::new(EventType::parse(name), target)
        }
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}
