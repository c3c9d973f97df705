//! Analytics queue collaborator
//!
//! The tracker never talks to a global `_gaq`. It is handed a sink and
//! learns from the returned [`Completion`] when the push has been taken.

use crate::ArgumentList;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// How the sink reports that a push was processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Processed synchronously; continue on the next microtask
    Acknowledged,
    /// Processed after the given delay
    AfterDelay(Duration),
}

/// Destination for tracking calls
pub trait AnalyticsSink {
    fn push(&mut self, args: &ArgumentList) -> Completion;
}

/// Sink shared between the binder and its trackers
pub type SharedSink = Rc<RefCell<dyn AnalyticsSink>>;

/// In-memory queue that records every push, like the page's `_gaq` array
#[derive(Debug, Default)]
pub struct AnalyticsQueue {
    pushed: Vec<ArgumentList>,
    ack_delay: Option<Duration>,
}

impl AnalyticsQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acknowledge every push after `delay` instead of immediately
    pub fn with_ack_delay(delay: Duration) -> Self {
        Self {
            pushed: Vec::new(),
            ack_delay: Some(delay),
        }
    }

    /// Wrap the queue for sharing with a binder
    pub fn shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    pub fn pushed(&self) -> &[ArgumentList] {
        &self.pushed
    }

    pub fn len(&self) -> usize {
        self.pushed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pushed.is_empty()
    }

    pub fn clear(&mut self) {
        self.pushed.clear();
    }
}

impl AnalyticsSink for AnalyticsQueue {
    fn push(&mut self, args: &ArgumentList) -> Completion {
        tracing::info!(args = %args, "_gaq.push");
        self.pushed.push(args.clone());
        match self.ack_delay {
            Some(delay) => Completion::AfterDelay(delay),
            None => Completion::Acknowledged,
        }
    }
}
