//! Tracker
//!
//! One tracker per triggered element. Firing a tracker validates the
//! element, pushes the call and then hands control back to the host event
//! loop; the rest of the work (after callback, completion event, link
//! navigation) runs as continuations once the sink reports completion.
//!
//! ```text
//! Idle -> Validating -> Pushed -> NavigationPending -> Complete
//!              |                \-----------------> Complete
//!              \-> Failed
//! ```

use crate::builder::ArgumentBuilder;
use crate::schema::{CallName, SchemaTable};
use crate::sink::{Completion, SharedSink};
use crate::{ArgumentList, Overrides, TrackError, TrackerConfig};
use ga_dom::{DomEvent, NodeId};
use ga_host::{BoxError, HostError, Window};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Tracker lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Validating,
    Pushed,
    NavigationPending,
    Complete,
    Failed,
}

impl TrackerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }
}

/// Identifies the binding a tracker was created by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u64);

/// The element a tracker reports on
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedElement {
    pub node: NodeId,
    pub call: CallName,
    pub overrides: Overrides,
}

/// Page callback run after each completed push
pub type AfterCallback = Rc<dyn Fn(&mut Window, NodeId) -> Result<(), BoxError>>;

pub type TrackerHandle = Rc<RefCell<Tracker>>;

#[derive(Debug)]
pub struct Tracker {
    element: TrackedElement,
    binding: BindingId,
    debug: bool,
    state: TrackerState,
    pushed: Option<ArgumentList>,
}

impl Tracker {
    pub fn new(element: TrackedElement, binding: BindingId, debug: bool) -> Self {
        Self {
            element,
            binding,
            debug,
            state: TrackerState::Idle,
            pushed: None,
        }
    }

    pub fn element(&self) -> &TrackedElement {
        &self.element
    }

    pub fn binding(&self) -> BindingId {
        self.binding
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Arguments sent by the last push
    pub fn pushed(&self) -> Option<&ArgumentList> {
        self.pushed.as_ref()
    }

    /// Run the tracker for `event` (`None` for load bindings).
    ///
    /// Returns once the push has been made; the continuation is left on
    /// the window's event loop.
    pub fn fire(
        this: &TrackerHandle,
        ctx: &Rc<TrackerContext>,
        window: &mut Window,
        event: Option<&mut DomEvent>,
    ) -> Result<(), TrackError> {
        let result = Self::try_fire(this, ctx, window, event);
        if let Err(err) = &result {
            let node = this.borrow().element.node;
            this.borrow_mut().state = TrackerState::Failed;
            ctx.release(node, this);
            tracing::warn!(?node, error = %err, "tracker failed");
        }
        result
    }

    fn try_fire(
        this: &TrackerHandle,
        ctx: &Rc<TrackerContext>,
        window: &mut Window,
        event: Option<&mut DomEvent>,
    ) -> Result<(), TrackError> {
        let (element, debug) = {
            let mut tracker = this.borrow_mut();
            tracker.state = TrackerState::Validating;
            (tracker.element.clone(), tracker.debug)
        };

        let link = navigation_link(window, &element);
        let navigation = match (link, event) {
            (Some(link), Some(event)) if event.cancelable => {
                event.prevent_default();
                Some(link)
            }
            _ => None,
        };

        let sink = ctx.sink.borrow().clone();
        if !debug && sink.is_none() {
            return Err(TrackError::MissingCollaborator(ctx.config.queue_name.clone()));
        }

        let args = {
            let view = window
                .document()
                .element(element.node)
                .map_err(HostError::from)?;
            let schema = ctx.schemas.get(element.call);
            ArgumentBuilder::build(schema, &view, &element.overrides, element.call.coerces())?
        };

        let completion = match sink {
            Some(sink) if !debug => {
                let mut sink = sink.borrow_mut();
                sink.push(&args)
            }
            _ => {
                window
                    .console_mut()
                    .log(format!("{}.push({})", ctx.config.queue_name, args.to_json()));
                Completion::Acknowledged
            }
        };
        tracing::debug!(node = ?element.node, call = %element.call, ?completion, "pushed");

        {
            let mut tracker = this.borrow_mut();
            tracker.state = TrackerState::Pushed;
            tracker.pushed = Some(args);
        }

        let (this, ctx) = (this.clone(), ctx.clone());
        let continuation = move |w: &mut Window| Self::on_pushed(&this, &ctx, w, navigation);
        match completion {
            Completion::Acknowledged => window.queue_microtask(continuation),
            Completion::AfterDelay(delay) => {
                let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                window.set_timeout(delay_ms, continuation);
            }
        }
        Ok(())
    }

    /// Continuation after the sink has taken the push
    fn on_pushed(
        this: &TrackerHandle,
        ctx: &Rc<TrackerContext>,
        window: &mut Window,
        navigation: Option<Link>,
    ) -> Result<(), BoxError> {
        let (node, detail) = {
            let tracker = this.borrow();
            (
                tracker.element.node,
                tracker.pushed.as_ref().map(ArgumentList::to_json),
            )
        };

        if let Err(err) = Self::notify(ctx, window, node, detail) {
            this.borrow_mut().state = TrackerState::Failed;
            ctx.release(node, this);
            tracing::warn!(?node, error = %err, "tracker continuation failed");
            return Err(err);
        }

        let Some(link) = navigation else {
            this.borrow_mut().state = TrackerState::Complete;
            ctx.release(node, this);
            return Ok(());
        };

        this.borrow_mut().state = TrackerState::NavigationPending;
        let (this, ctx) = (this.clone(), ctx.clone());
        window.set_timeout(ctx.config.navigation_delay_ms, move |w| {
            let result = w.navigate(&link.href, link.target.as_deref());
            this.borrow_mut().state = if result.is_ok() {
                TrackerState::Complete
            } else {
                TrackerState::Failed
            };
            ctx.release(node, &this);
            result?;
            Ok(())
        });
        Ok(())
    }

    /// Run the after callback, then fire the completion event
    fn notify(
        ctx: &TrackerContext,
        window: &mut Window,
        node: NodeId,
        detail: Option<String>,
    ) -> Result<(), BoxError> {
        let after = ctx.after.borrow().clone();
        if let Some(after) = after {
            after(window, node)?;
        }
        window.trigger(node, &ctx.config.complete_event, detail)?;
        Ok(())
    }
}

/// Deferred link navigation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Link {
    href: String,
    target: Option<String>,
}

/// The link to follow after the push, if the element is a followable link
/// and the call navigates
fn navigation_link(window: &Window, element: &TrackedElement) -> Option<Link> {
    if !element.call.navigates() {
        return None;
    }
    let view = window.document().element(element.node).ok()?;
    if !view.is_hyperlink() {
        return None;
    }
    let href = view.attribute("href")?.trim();
    if href.is_empty() || href == "#" {
        return None;
    }
    Some(Link {
        href: href.to_string(),
        target: view.attribute("target").map(str::to_string),
    })
}

/// State shared by the binder and every tracker it creates
pub struct TrackerContext {
    pub(crate) config: TrackerConfig,
    pub(crate) schemas: SchemaTable,
    pub(crate) sink: RefCell<Option<SharedSink>>,
    pub(crate) after: RefCell<Option<AfterCallback>>,
    registry: RefCell<HashMap<NodeId, TrackerHandle>>,
    next_binding: Cell<u64>,
}

impl TrackerContext {
    pub(crate) fn new(config: TrackerConfig, sink: Option<SharedSink>) -> Self {
        Self {
            schemas: SchemaTable::new(&config.attribute_prefix),
            config,
            sink: RefCell::new(sink),
            after: RefCell::new(None),
            registry: RefCell::new(HashMap::new()),
            next_binding: Cell::new(0),
        }
    }

    pub(crate) fn next_binding(&self) -> BindingId {
        let id = self.next_binding.get() + 1;
        self.next_binding.set(id);
        BindingId(id)
    }

    /// Register `tracker` under its element, replacing any earlier one
    pub(crate) fn register(&self, tracker: &TrackerHandle) {
        let node = tracker.borrow().element.node;
        self.registry.borrow_mut().insert(node, tracker.clone());
    }

    /// Drop the registry entry for `node` if it still belongs to `tracker`
    pub(crate) fn release(&self, node: NodeId, tracker: &TrackerHandle) {
        let mut registry = self.registry.borrow_mut();
        if registry.get(&node).is_some_and(|t| Rc::ptr_eq(t, tracker)) {
            registry.remove(&node);
        }
    }

    /// Drop every tracker created by `binding`
    pub(crate) fn release_binding(&self, binding: BindingId) {
        self.registry
            .borrow_mut()
            .retain(|_, t| t.borrow().binding != binding);
    }

    /// Drop trackers whose element left the document
    pub(crate) fn prune(&self, window: &Window) {
        let document = window.document();
        self.registry.borrow_mut().retain(|node, _| {
            let keep = document.is_connected(*node);
            if !keep {
                tracing::debug!(?node, "pruning tracker for removed element");
            }
            keep
        });
    }

    pub(crate) fn tracker(&self, node: NodeId) -> Option<TrackerHandle> {
        self.registry.borrow().get(&node).cloned()
    }

    pub(crate) fn active(&self) -> usize {
        self.registry.borrow().len()
    }
}
