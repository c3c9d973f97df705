//! GA Host
//!
//! Single-threaded browser window for the analytics plugin:
//! - Event loop with a microtask queue and a virtual-clock timer queue
//! - Event listeners (direct and delegated) and dispatch
//! - Location and navigation, including link default actions
//! - Console

mod console;
mod location;
mod timers;
mod window;

pub use console::{Console, ConsoleLevel, ConsoleLine};
pub use location::{Disposition, LocationManager, Navigation};
pub use timers::{Timer, TimerId, TimerManager};
pub use window::{Listener, Task, Window};

pub use ga_dom as dom;

/// Error raised by a listener or task
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Host error
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error(transparent)]
    Dom(#[from] ga_dom::DomError),

    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("listener for {event:?} failed: {source}")]
    Listener {
        event: String,
        #[source]
        source: BoxError,
    },

    #[error("scheduled task failed: {source}")]
    Task {
        #[source]
        source: BoxError,
    },
}

impl HostError {
    /// The error a listener or task failed with, if any
    pub fn callback_error(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Listener { source, .. } | Self::Task { source } => Some(&**source),
            _ => None,
        }
    }
}
