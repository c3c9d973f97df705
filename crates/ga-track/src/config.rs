//! Tracker configuration

use crate::{Overrides, TrackError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Plugin-wide configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Data attribute prefix (`data-<prefix>-<field>`)
    pub attribute_prefix: String,

    /// Queue name reported when no sink is configured
    pub queue_name: String,

    /// Delay between push completion and link navigation (ms)
    pub navigation_delay_ms: u64,

    /// Custom event fired on the element after each push
    pub complete_event: String,

    /// Log pushes to the console instead of sending them
    pub debug: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            attribute_prefix: "ga".to_string(),
            queue_name: "_gaq".to_string(),
            navigation_delay_ms: 500,
            complete_event: "ga:tracked".to_string(),
            debug: false,
        }
    }
}

impl TrackerConfig {
    /// Parse from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TrackError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn navigation_delay(&self) -> Duration {
        Duration::from_millis(self.navigation_delay_ms)
    }
}

/// Options-object form of a binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackOptions {
    /// Whitespace-separated event types
    pub event: String,

    /// Tracking call (`trackEvent`, `addItem`, ...)
    pub handler: String,

    /// Per-binding debug switch; falls back to the plugin setting
    pub debug: Option<bool>,

    pub overrides: Overrides,
}

impl Default for TrackOptions {
    fn default() -> Self {
        Self {
            event: "click".to_string(),
            handler: "trackEvent".to_string(),
            debug: None,
            overrides: Overrides::default(),
        }
    }
}

impl TrackOptions {
    pub fn from_json(json: &str) -> Result<Self, TrackError> {
        Ok(serde_json::from_str(json)?)
    }
}
