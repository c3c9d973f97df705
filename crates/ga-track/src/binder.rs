//! Binder
//!
//! Attaches trackers to elements. Event bindings are delegated from the
//! document body, so elements added after `bind` are tracked too. Load
//! bindings run once, right away, for whatever matches at bind time.

use crate::schema::CallName;
use crate::sink::SharedSink;
use crate::tracker::{
    AfterCallback, BindingId, TrackedElement, Tracker, TrackerContext, TrackerHandle, TrackerState,
};
use crate::{Overrides, TrackError, TrackOptions, TrackerConfig};
use ga_dom::{EventType, HandlerId, NodeId, Selector};
use ga_host::{BoxError, HostError, Window};
use std::cell::RefCell;
use std::rc::Rc;

/// A live binding returned by [`GoogleAnalytics::bind`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    id: BindingId,
    call: CallName,
    selector: String,
    handlers: Vec<HandlerId>,
}

impl Binding {
    pub fn id(&self) -> BindingId {
        self.id
    }

    pub fn call(&self) -> CallName {
        self.call
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Listener registrations (empty for load-only bindings)
    pub fn handlers(&self) -> &[HandlerId] {
        &self.handlers
    }
}

/// The tracking plugin
pub struct GoogleAnalytics {
    ctx: Rc<TrackerContext>,
}

impl GoogleAnalytics {
    /// Plugin without a queue; only debug bindings can fire
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            ctx: Rc::new(TrackerContext::new(config, None)),
        }
    }

    pub fn with_sink(config: TrackerConfig, sink: SharedSink) -> Self {
        Self {
            ctx: Rc::new(TrackerContext::new(config, Some(sink))),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.ctx.config
    }

    /// Replace (or remove) the queue used by every binding
    pub fn set_sink(&self, sink: Option<SharedSink>) {
        *self.ctx.sink.borrow_mut() = sink;
    }

    /// Run `callback` with the element after each completed push
    pub fn after<F>(&self, callback: F)
    where
        F: Fn(&mut Window, NodeId) -> Result<(), BoxError> + 'static,
    {
        let callback: AfterCallback = Rc::new(callback);
        *self.ctx.after.borrow_mut() = Some(callback);
    }

    /// Bind `api_name` to elements matching `selector`.
    ///
    /// `event_types` is a whitespace-separated list such as `"click submit"`;
    /// an empty list binds `click`. `load` fires immediately.
    pub fn bind(
        &self,
        window: &mut Window,
        selector: &str,
        api_name: &str,
        event_types: &str,
        overrides: Overrides,
    ) -> Result<Binding, TrackError> {
        let debug_mode = self.ctx.config.debug;
        self.bind_inner(window, selector, api_name, event_types, overrides, debug_mode)
    }

    /// Options-object form of [`bind`](Self::bind)
    pub fn bind_options(
        &self,
        window: &mut Window,
        selector: &str,
        options: TrackOptions,
    ) -> Result<Binding, TrackError> {
        let debug_mode = options.debug.unwrap_or(self.ctx.config.debug);
        self.bind_inner(
            window,
            selector,
            &options.handler,
            &options.event,
            options.overrides,
            debug_mode,
        )
    }

    /// [`bind_options`](Self::bind_options) with the options given as JSON
    pub fn bind_json(
        &self,
        window: &mut Window,
        selector: &str,
        options: &str,
    ) -> Result<Binding, TrackError> {
        self.bind_options(window, selector, TrackOptions::from_json(options)?)
    }

    fn bind_inner(
        &self,
        window: &mut Window,
        selector: &str,
        api_name: &str,
        event_types: &str,
        overrides: Overrides,
        debug_mode: bool,
    ) -> Result<Binding, TrackError> {
        let call = self.ctx.schemas.lookup(api_name)?.call();
        let parsed = Selector::parse(selector).map_err(HostError::from)?;
        let mut events = EventType::parse_list(event_types);
        if events.is_empty() {
            events.push(EventType::Click);
        }
        // Tracking the completion event would push again on every completion.
        let complete = EventType::parse(&self.ctx.config.complete_event);
        if events.contains(&complete) {
            return Err(TrackError::InvalidEventType(complete.to_string()));
        }

        let mut binding = Binding {
            id: self.ctx.next_binding(),
            call,
            selector: selector.to_string(),
            handlers: Vec::new(),
        };
        tracing::debug!(
            binding = ?binding.id,
            selector,
            %call,
            events = event_types,
            debug_mode,
            "binding tracker"
        );

        // Load trackers run before any listener exists, so a failing load
        // leaves nothing attached.
        let (loads, delegated): (Vec<_>, Vec<_>) =
            events.into_iter().partition(|e| *e == EventType::Load);
        if !loads.is_empty() {
            for node in window.document().query_selector_all(&parsed) {
                let element = TrackedElement {
                    node,
                    call,
                    overrides: overrides.clone(),
                };
                self.start(window, element, binding.id, debug_mode)?;
            }
        }

        for event_type in delegated {
            let ctx = self.ctx.clone();
            let id = binding.id;
            let overrides = overrides.clone();
            let body = window.document().body();
            let added = window.add_delegated_listener(body, event_type, selector, move |w, event| {
                let Some(node) = event.current_target else {
                    return Ok(());
                };
                ctx.prune(w);
                let tracker = new_tracker(&ctx, node, call, overrides.clone(), id, debug_mode);
                Tracker::fire(&tracker, &ctx, w, Some(event))?;
                Ok(())
            });
            match added {
                Ok(handler) => binding.handlers.push(handler),
                Err(err) => {
                    self.unbind(window, &binding);
                    return Err(err.into());
                }
            }
        }

        Ok(binding)
    }

    /// Remove a binding's listeners and release its trackers
    pub fn unbind(&self, window: &mut Window, binding: &Binding) -> usize {
        let removed = binding
            .handlers
            .iter()
            .filter(|&&h| window.remove_event_listener(h))
            .count();
        self.ctx.release_binding(binding.id);
        tracing::debug!(binding = ?binding.id, removed, "unbound tracker");
        removed
    }

    /// Track one element now, without an event
    pub fn track(
        &self,
        window: &mut Window,
        node: NodeId,
        api_name: &str,
        overrides: Overrides,
    ) -> Result<TrackerHandle, TrackError> {
        let call = self.ctx.schemas.lookup(api_name)?.call();
        let element = TrackedElement {
            node,
            call,
            overrides,
        };
        let binding = self.ctx.next_binding();
        self.start(window, element, binding, self.ctx.config.debug)
    }

    fn start(
        &self,
        window: &mut Window,
        element: TrackedElement,
        binding: BindingId,
        debug: bool,
    ) -> Result<TrackerHandle, TrackError> {
        self.ctx.prune(window);
        let tracker = new_tracker(
            &self.ctx,
            element.node,
            element.call,
            element.overrides,
            binding,
            debug,
        );
        Tracker::fire(&tracker, &self.ctx, window, None)?;
        Ok(tracker)
    }

    /// State of the in-flight tracker for `node`, if any
    pub fn tracker_state(&self, node: NodeId) -> Option<TrackerState> {
        self.ctx.tracker(node).map(|t| t.borrow().state())
    }

    /// Trackers that have not finished yet
    pub fn active_trackers(&self) -> usize {
        self.ctx.active()
    }
}

fn new_tracker(
    ctx: &TrackerContext,
    node: NodeId,
    call: CallName,
    overrides: Overrides,
    binding: BindingId,
    debug: bool,
) -> TrackerHandle {
    let tracker = Rc::new(RefCell::new(Tracker::new(
        TrackedElement {
            node,
            call,
            overrides,
        },
        binding,
        debug,
    )));
    ctx.register(&tracker);
    tracker
}
