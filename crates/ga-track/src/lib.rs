//! GA Track - declarative analytics tracking
//!
//! Binds DOM elements to Google Analytics queue calls. Elements describe
//! the call with `data-ga-*` attributes:
//!
//! ```html
//! <a href="/next" data-ga-category="Nav" data-ga-action="click" data-ga-label="Home">
//! ```
//!
//! On the bound event the attributes are validated against the call's
//! schema, pushed to the queue as `["_trackEvent", "Nav", "click", "Home"]`,
//! and link navigation is held back until the push has completed.

mod binder;
mod config;
mod error;
mod overrides;
mod value;

pub mod builder;
pub mod schema;
pub mod sink;
pub mod tracker;
pub mod validate;

pub use binder::{Binding, GoogleAnalytics};
pub use builder::{ArgumentBuilder, AttributeSource};
pub use config::{TrackOptions, TrackerConfig};
pub use error::TrackError;
pub use overrides::Overrides;
pub use schema::{ApiSchema, CallName, FieldDescriptor, SchemaTable};
pub use sink::{AnalyticsQueue, AnalyticsSink, Completion, SharedSink};
pub use tracker::{BindingId, TrackedElement, Tracker, TrackerState};
pub use validate::{ReturnType, ValidatorKind};
pub use value::{ArgumentList, Value};

pub use ga_host as host;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
