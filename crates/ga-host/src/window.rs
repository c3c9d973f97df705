//! Window
//!
//! Owns the document and runs everything the page schedules. Nothing here
//! is thread-safe: listeners and tasks receive `&mut Window` and run to
//! completion one at a time.

use crate::{
    BoxError, Console, Disposition, HostError, LocationManager, Navigation, TimerId, TimerManager,
};
use ga_dom::{DelegationTable, Document, DomEvent, EventType, HandlerId, NodeId, Selector};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Event listener callback
pub type Listener = Rc<dyn Fn(&mut Window, &mut DomEvent) -> Result<(), BoxError>>;

/// Deferred unit of work (microtask or timer callback)
pub type Task = Box<dyn FnOnce(&mut Window) -> Result<(), BoxError>>;

/// Browser window with a deterministic event loop
pub struct Window {
    document: Document,
    location: LocationManager,
    console: Console,
    /// Virtual clock (ms)
    now: u64,
    microtasks: VecDeque<Task>,
    timers: TimerManager<Task>,
    handlers: DelegationTable,
    listeners: HashMap<HandlerId, Listener>,
    navigations: Vec<Navigation>,
}

impl Window {
    /// Open a window on `url` with an empty document
    pub fn new(url: &str) -> Result<Self, HostError> {
        let location = LocationManager::new(url).map_err(|source| HostError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        Ok(Self {
            document: Document::new(location.href()),
            location,
            console: Console::new(),
            now: 0,
            microtasks: VecDeque::new(),
            timers: TimerManager::new(),
            handlers: DelegationTable::new(),
            listeners: HashMap::new(),
            navigations: Vec::new(),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn location(&self) -> &LocationManager {
        &self.location
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }

    /// Navigations performed so far, oldest first
    pub fn navigations(&self) -> &[Navigation] {
        &self.navigations
    }

    /// Current virtual time (ms)
    pub fn now(&self) -> u64 {
        self.now
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Attach a listener directly to `target`
    pub fn add_event_listener<F>(&mut self, target: NodeId, event_type: EventType, listener: F) -> HandlerId
    where
        F: Fn(&mut Window, &mut DomEvent) -> Result<(), BoxError> + 'static,
    {
        let id = self.handlers.add(target, event_type, None);
        self.listeners.insert(id, Rc::new(listener));
        id
    }

    /// Attach a listener to `container` that fires for descendants matching `selector`
    pub fn add_delegated_listener<F>(
        &mut self,
        container: NodeId,
        event_type: EventType,
        selector: &str,
        listener: F,
    ) -> Result<HandlerId, HostError>
    where
        F: Fn(&mut Window, &mut DomEvent) -> Result<(), BoxError> + 'static,
    {
        let selector = Selector::parse(selector)?;
        let id = self.handlers.add(container, event_type, Some(selector));
        self.listeners.insert(id, Rc::new(listener));
        Ok(id)
    }

    /// Detach a listener; returns whether it was attached
    pub fn remove_event_listener(&mut self, id: HandlerId) -> bool {
        self.listeners.remove(&id);
        self.handlers.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.handlers.len()
    }

    /// Dispatch `event` through the listeners, then run the default action
    /// unless a listener prevented it. Returns the event as the listeners
    /// left it. A failing listener aborts the dispatch.
    pub fn dispatch(&mut self, mut event: DomEvent) -> Result<DomEvent, HostError> {
        event.timestamp = self.now as f64;
        let route = self.handlers.route(&self.document.tree, &event);
        tracing::debug!(
            event = %event.event_type,
            target = ?event.target,
            handlers = route.len(),
            "dispatching event"
        );

        let mut last_target = None;
        for entry in route {
            if event.is_propagation_stopped() && last_target != Some(entry.current_target) {
                break;
            }
            last_target = Some(entry.current_target);

            // A listener may have removed this one earlier in the dispatch.
            let Some(listener) = self.listeners.get(&entry.handler_id).cloned() else {
                continue;
            };
            event.current_target = Some(entry.current_target);
            listener(self, &mut event).map_err(|source| HostError::Listener {
                event: event.event_type.to_string(),
                source,
            })?;
        }
        event.current_target = None;

        if !event.is_default_prevented() {
            self.default_action(&event)?;
        }
        Ok(event)
    }

    /// Dispatch a click on `target`
    pub fn click(&mut self, target: NodeId) -> Result<DomEvent, HostError> {
        self.dispatch(DomEvent::click(target))
    }

    /// Dispatch a custom event on `target`
    pub fn trigger(&mut self, target: NodeId, name: &str, detail: Option<String>) -> Result<DomEvent, HostError> {
        self.dispatch(DomEvent::custom(name, target, detail))
    }

    /// Follow the link a click landed in
    fn default_action(&mut self, event: &DomEvent) -> Result<(), HostError> {
        if event.event_type != EventType::Click {
            return Ok(());
        }
        let links = Selector::parse("a[href], area[href]")?;
        let link = self
            .document
            .element(event.target)
            .ok()
            .and_then(|e| e.closest(&links))
            .map(|l| {
                (
                    l.attribute("href").unwrap_or_default().to_string(),
                    l.attribute("target").map(str::to_string),
                )
            });

        if let Some((href, target)) = link {
            tracing::debug!(%href, "following link (default action)");
            self.navigate(&href, target.as_deref())?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Navigate to `href` resolved against the current location. A `target`
    /// naming another browsing context opens a new window and leaves this
    /// one in place.
    pub fn navigate(&mut self, href: &str, target: Option<&str>) -> Result<Navigation, HostError> {
        let url = self.location.resolve(href).map_err(|source| HostError::InvalidUrl {
            url: href.to_string(),
            source,
        })?;
        let disposition = Disposition::from_target(target);

        if disposition == Disposition::SameWindow {
            self.document.set_url(url.as_str());
            self.location.assign(url.clone());
        }

        let navigation = Navigation {
            url: url.to_string(),
            disposition,
            at_ms: self.now,
        };
        tracing::info!(url = %navigation.url, disposition = ?navigation.disposition, "navigate");
        self.navigations.push(navigation.clone());
        Ok(navigation)
    }

    // ------------------------------------------------------------------
    // Event loop
    // ------------------------------------------------------------------

    pub fn queue_microtask<F>(&mut self, task: F)
    where
        F: FnOnce(&mut Window) -> Result<(), BoxError> + 'static,
    {
        self.microtasks.push_back(Box::new(task));
    }

    pub fn set_timeout<F>(&mut self, delay_ms: u64, task: F) -> TimerId
    where
        F: FnOnce(&mut Window) -> Result<(), BoxError> + 'static,
    {
        let id = self.timers.set_timeout(self.now, delay_ms, Box::new(task));
        tracing::debug!(?id, delay_ms, "timer armed");
        id
    }

    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.timers.clear(id)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn has_pending_work(&self) -> bool {
        !self.microtasks.is_empty() || self.timers.has_pending()
    }

    /// Drain the microtask queue, including tasks queued while draining
    pub fn run_microtasks(&mut self) -> Result<(), HostError> {
        while let Some(task) = self.microtasks.pop_front() {
            task(self).map_err(|source| HostError::Task { source })?;
        }
        Ok(())
    }

    /// Move the clock forward by `ms`, firing every timer that comes due
    pub fn advance(&mut self, ms: u64) -> Result<(), HostError> {
        let until = self.now.saturating_add(ms);
        self.run_microtasks()?;
        while let Some(timer) = self.timers.pop_due(until) {
            self.now = self.now.max(timer.due_at());
            tracing::debug!(id = ?timer.id, now = self.now, "timer fired");
            (timer.callback)(self).map_err(|source| HostError::Task { source })?;
            self.run_microtasks()?;
        }
        self.now = until;
        Ok(())
    }

    /// Run until no microtasks or timers remain
    pub fn run_until_idle(&mut self) -> Result<(), HostError> {
        self.run_microtasks()?;
        while let Some(wait) = self.timers.time_until_next(self.now) {
            self.advance(wait)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn window_with_link(attrs: &[(&str, &str)]) -> (Window, NodeId) {
        let mut window = Window::new("https://example.com/start").unwrap();
        let body = window.document().body();
        let a = window.document_mut().append_element(body, "a", attrs).unwrap();
        (window, a)
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(matches!(
            Window::new("not a url"),
            Err(HostError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_link_click_navigates_by_default() {
        let (mut window, a) = window_with_link(&[("href", "/next")]);
        window.click(a).unwrap();

        assert_eq!(window.location().href(), "https://example.com/next");
        assert_eq!(window.navigations().len(), 1);
        assert_eq!(window.document().url(), "https://example.com/next");
    }

    #[test]
    fn test_prevent_default_suppresses_navigation() {
        let (mut window, a) = window_with_link(&[("href", "/next")]);
        let body = window.document().body();
        window
            .add_delegated_listener(body, EventType::Click, "a", |_, event| {
                event.prevent_default();
                Ok(())
            })
            .unwrap();

        let event = window.click(a).unwrap();
        assert!(event.is_default_prevented());
        assert!(window.navigations().is_empty());
        assert_eq!(window.location().pathname(), "/start");
    }

    #[test]
    fn test_target_blank_opens_new_window() {
        let (mut window, a) = window_with_link(&[("href", "/next"), ("target", "_blank")]);
        window.click(a).unwrap();

        assert_eq!(
            window.navigations()[0].disposition,
            Disposition::NewWindow("_blank".into())
        );
        assert_eq!(window.location().pathname(), "/start");
    }

    #[test]
    fn test_listener_error_aborts_dispatch() {
        let (mut window, a) = window_with_link(&[("href", "/next")]);
        window.add_event_listener(a, EventType::Click, |_, _| Err("boom".into()));

        let err = window.click(a).unwrap_err();
        assert!(matches!(err, HostError::Listener { .. }));
        assert_eq!(err.callback_error().map(|e| e.to_string()), Some("boom".into()));
        assert!(window.navigations().is_empty());
    }

    #[test]
    fn test_event_loop_ordering() {
        let mut window = Window::new("https://example.com/").unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        window.set_timeout(100, move |w| {
            l.borrow_mut().push(format!("timer@{}", w.now()));
            let l2 = l.clone();
            w.queue_microtask(move |_| {
                l2.borrow_mut().push("micro-from-timer".to_string());
                Ok(())
            });
            Ok(())
        });
        let l = log.clone();
        window.queue_microtask(move |_| {
            l.borrow_mut().push("micro".to_string());
            Ok(())
        });

        window.advance(50).unwrap();
        assert_eq!(*log.borrow(), vec!["micro"]);
        assert_eq!(window.now(), 50);

        window.run_until_idle().unwrap();
        assert_eq!(*log.borrow(), vec!["micro", "timer@100", "micro-from-timer"]);
        assert!(!window.has_pending_work());
    }

    #[test]
    fn test_clear_timeout() {
        let mut window = Window::new("https://example.com/").unwrap();
        let id = window.set_timeout(10, |w| {
            w.console_mut().log("fired");
            Ok(())
        });
        assert_eq!(window.pending_timers(), 1);
        assert!(window.clear_timeout(id));

        window.run_until_idle().unwrap();
        assert!(window.console().lines().is_empty());
    }

    #[test]
    fn test_task_error_surfaces() {
        let mut window = Window::new("https://example.com/").unwrap();
        window.set_timeout(5, |_| Err("late failure".into()));

        assert!(matches!(window.run_until_idle(), Err(HostError::Task { .. })));
    }

    #[test]
    fn test_remove_listener() {
        let (mut window, a) = window_with_link(&[]);
        let id = window.add_event_listener(a, EventType::Click, |w, _| {
            w.console_mut().log("clicked");
            Ok(())
        });
        assert_eq!(window.listener_count(), 1);
        assert!(window.remove_event_listener(id));

        window.click(a).unwrap();
        assert!(window.console().lines().is_empty());
    }
}
