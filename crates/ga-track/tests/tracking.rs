//! End-to-end tracking tests for ga-track
//!
//! Drives the plugin through a host window: binding, dispatch, pushes,
//! deferred navigation and failure paths.

use ga_host::{Disposition, HostError, Window};
use ga_dom::{EventType, NodeId};
use ga_track::{
    AnalyticsQueue, GoogleAnalytics, Overrides, TrackError, TrackerConfig, TrackerState, Value,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

fn window() -> Window {
    Window::new("https://shop.example/start").unwrap()
}

fn append(window: &mut Window, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    window.document_mut().append_element(parent, tag, attrs).unwrap()
}

fn nav_link(window: &mut Window) -> NodeId {
    let body = window.document().body();
    append(
        window,
        body,
        "a",
        &[
            ("href", "/next"),
            ("data-ga-category", "Nav"),
            ("data-ga-action", "click"),
            ("data-ga-label", "Home"),
        ],
    )
}

// ============================================================================
// CLICK SCENARIO
// ============================================================================

#[test]
fn test_link_click_pushes_then_navigates() {
    let mut window = window();
    let a = nav_link(&mut window);
    let queue = AnalyticsQueue::new().shared();
    let ga = GoogleAnalytics::with_sink(TrackerConfig::default(), queue.clone());
    ga.bind(&mut window, "a", "trackEvent", "click", Overrides::new())
        .unwrap();

    window.click(a).unwrap();

    let pushed: Vec<_> = queue.borrow().pushed().iter().map(|a| a.to_json()).collect();
    assert_eq!(pushed, vec![r#"["_trackEvent","Nav","click","Home"]"#]);
    assert!(window.navigations().is_empty());

    window.advance(499).unwrap();
    assert!(window.navigations().is_empty());

    window.advance(1).unwrap();
    let nav = &window.navigations()[0];
    assert_eq!(nav.url, "https://shop.example/next");
    assert_eq!(nav.disposition, Disposition::SameWindow);
    assert_eq!(nav.at_ms, 500);
}

#[test]
fn test_click_on_child_of_link() {
    let mut window = window();
    let a = nav_link(&mut window);
    let span = append(&mut window, a, "span", &[]);
    let queue = AnalyticsQueue::new().shared();
    let ga = GoogleAnalytics::with_sink(TrackerConfig::default(), queue.clone());
    ga.bind(&mut window, "a", "trackEvent", "click", Overrides::new())
        .unwrap();

    let event = window.click(span).unwrap();
    assert!(event.is_default_prevented());
    assert_eq!(ga.tracker_state(a), Some(TrackerState::Pushed));

    window.run_until_idle().unwrap();
    assert_eq!(window.location().pathname(), "/next");
}

#[test]
fn test_target_blank_opens_new_window_after_push() {
    let mut window = window();
    let a = nav_link(&mut window);
    window.document_mut().set_attribute(a, "target", "_blank").unwrap();
    let ga = GoogleAnalytics::with_sink(TrackerConfig::default(), AnalyticsQueue::new().shared());
    ga.bind(&mut window, "a", "trackEvent", "click", Overrides::new())
        .unwrap();

    window.click(a).unwrap();
    window.run_until_idle().unwrap();

    assert_eq!(
        window.navigations()[0].disposition,
        Disposition::NewWindow("_blank".into())
    );
    assert_eq!(window.location().pathname(), "/start");
}

#[test]
fn test_completion_event_carries_arguments() {
    let mut window = window();
    let a = nav_link(&mut window);
    let ga = GoogleAnalytics::with_sink(TrackerConfig::default(), AnalyticsQueue::new().shared());
    ga.bind(&mut window, "a", "trackEvent", "click", Overrides::new())
        .unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    window.add_event_listener(a, EventType::parse("ga:tracked"), move |w, event| {
        sink.borrow_mut().push((event.detail.clone(), w.navigations().len()));
        Ok(())
    });

    window.click(a).unwrap();
    window.run_until_idle().unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![(Some(r#"["_trackEvent","Nav","click","Home"]"#.to_string()), 0)]
    );
}

#[test]
fn test_slow_sink_delays_navigation() {
    let mut window = window();
    let a = nav_link(&mut window);
    let queue = AnalyticsQueue::with_ack_delay(Duration::from_millis(200)).shared();
    let config = TrackerConfig {
        navigation_delay_ms: 100,
        ..TrackerConfig::default()
    };
    let ga = GoogleAnalytics::with_sink(config, queue);
    ga.bind(&mut window, "a", "trackEvent", "click", Overrides::new())
        .unwrap();

    window.click(a).unwrap();
    window.run_until_idle().unwrap();
    assert_eq!(window.navigations()[0].at_ms, 300);
}

// ============================================================================
// FAILURES
// ============================================================================

#[test]
fn test_missing_sink_is_reported_and_nothing_navigates() {
    let mut window = window();
    let a = nav_link(&mut window);
    let ga = GoogleAnalytics::new(TrackerConfig::default());
    ga.bind(&mut window, "a", "trackEvent", "click", Overrides::new())
        .unwrap();

    let err = window.click(a).unwrap_err();
    assert!(matches!(err, HostError::Listener { .. }));
    assert!(matches!(
        TrackError::from_host(&err),
        Some(TrackError::MissingCollaborator(q)) if q == "_gaq"
    ));

    window.run_until_idle().unwrap();
    assert!(window.navigations().is_empty());
    assert_eq!(ga.active_trackers(), 0);
}

#[test]
fn test_failing_after_callback_ends_tracker() {
    let mut window = window();
    let a = nav_link(&mut window);
    let ga = GoogleAnalytics::with_sink(TrackerConfig::default(), AnalyticsQueue::new().shared());
    ga.after(|_, _| Err("after failed".into()));
    ga.bind(&mut window, "a", "trackEvent", "click", Overrides::new())
        .unwrap();

    window.click(a).unwrap();
    let err = window.run_until_idle().unwrap_err();
    assert!(matches!(err, HostError::Task { .. }));

    assert_eq!(ga.tracker_state(a), None);
    assert_eq!(ga.active_trackers(), 0);
    window.run_until_idle().unwrap();
    assert!(window.navigations().is_empty());
}

#[test]
fn test_missing_required_attribute_names_field() {
    let mut window = window();
    let body = window.document().body();
    let a = append(
        &mut window,
        body,
        "a",
        &[("href", "/next"), ("data-ga-category", "Nav"), ("data-ga-label", "Home")],
    );
    let queue = AnalyticsQueue::new().shared();
    let ga = GoogleAnalytics::with_sink(TrackerConfig::default(), queue.clone());
    ga.bind(&mut window, "a", "trackEvent", "click", Overrides::new())
        .unwrap();

    let err = window.click(a).unwrap_err();
    let track_err = TrackError::from_host(&err).unwrap();
    assert_eq!(track_err.field(), Some("action"));

    window.run_until_idle().unwrap();
    assert!(queue.borrow().is_empty());
    assert!(window.navigations().is_empty());
}

#[test]
fn test_unknown_call_name() {
    let mut window = window();
    let ga = GoogleAnalytics::new(TrackerConfig::default());
    assert!(matches!(
        ga.bind(&mut window, "a", "doesNotExist", "click", Overrides::new()),
        Err(TrackError::UnknownSchema(name)) if name == "doesNotExist"
    ));
    assert!(matches!(
        ga.bind_json(&mut window, "a", r#"{"handler": 5}"#),
        Err(TrackError::InvalidOptions(_))
    ));
}

#[test]
fn test_invalid_selector() {
    let mut window = window();
    let ga = GoogleAnalytics::new(TrackerConfig::default());
    assert!(matches!(
        ga.bind(&mut window, "div > a", "trackEvent", "click", Overrides::new()),
        Err(TrackError::Host(HostError::Dom(_)))
    ));
}

// ============================================================================
// ECOMMERCE
// ============================================================================

#[test]
fn test_transaction_on_load() {
    let mut window = window();
    let body = window.document().body();
    let form = append(
        &mut window,
        body,
        "form",
        &[
            ("id", "receipt"),
            ("data-ga-orderid", "1001"),
            ("data-ga-storename", "Shop"),
            ("data-ga-total", "19.98"),
            ("data-ga-city", "Lyon"),
        ],
    );
    let item = append(
        &mut window,
        form,
        "li",
        &[
            ("class", "item"),
            ("data-ga-orderid", "1001"),
            ("data-ga-sku", "W-1"),
            ("data-ga-name", "Widget"),
            ("data-ga-price", "9.99"),
            ("data-ga-quantity", "2"),
        ],
    );
    let queue = AnalyticsQueue::new().shared();
    let ga = GoogleAnalytics::with_sink(TrackerConfig::default(), queue.clone());

    ga.bind(&mut window, "#receipt", "addTrans", "load", Overrides::new())
        .unwrap();
    ga.bind(&mut window, "li.item", "addItem", "load", Overrides::new())
        .unwrap();
    ga.bind(&mut window, "#receipt", "trackTrans", "load", Overrides::new())
        .unwrap();
    window.run_until_idle().unwrap();

    let pushed: Vec<_> = queue.borrow().pushed().iter().map(|a| a.to_json()).collect();
    assert_eq!(
        pushed,
        vec![
            r#"["_addTrans","1001","Shop","19.98","","","Lyon"]"#,
            r#"["_addItem","1001","W-1","Widget","","9.99","2"]"#,
            r#"["_trackTrans"]"#,
        ]
    );
    assert_eq!(ga.tracker_state(item), None);
    assert!(window.navigations().is_empty());
}

#[test]
fn test_submit_binding_on_form() {
    let mut window = window();
    let body = window.document().body();
    let form = append(
        &mut window,
        body,
        "form",
        &[("data-ga-category", "Signup"), ("data-ga-action", "submit"), ("data-ga-label", "Footer")],
    );
    let queue = AnalyticsQueue::new().shared();
    let ga = GoogleAnalytics::with_sink(TrackerConfig::default(), queue.clone());
    ga.bind(&mut window, "form", "trackEvent", "submit", Overrides::new())
        .unwrap();

    let event = window.dispatch(ga_dom::DomEvent::new(EventType::Submit, form)).unwrap();
    // Not a link: the submit is left alone.
    assert!(!event.is_default_prevented());
    assert_eq!(queue.borrow().len(), 1);
}

// ============================================================================
// DEBUG MODE AND OVERRIDES
// ============================================================================

#[test]
fn test_debug_mode_logs_and_still_navigates() {
    let mut window = window();
    let a = nav_link(&mut window);
    let config = TrackerConfig {
        debug: true,
        ..TrackerConfig::default()
    };
    let ga = GoogleAnalytics::new(config);
    ga.bind(&mut window, "a", "trackEvent", "click", Overrides::new())
        .unwrap();

    window.click(a).unwrap();
    window.run_until_idle().unwrap();

    assert_eq!(
        window.console().messages().collect::<Vec<_>>(),
        vec![r#"_gaq.push(["_trackEvent","Nav","click","Home"])"#]
    );
    assert_eq!(window.location().pathname(), "/next");
}

#[test]
fn test_overrides_fill_missing_attributes() {
    let mut window = window();
    let body = window.document().body();
    let button = append(&mut window, body, "button", &[("data-ga-label", "Hero")]);
    let queue = AnalyticsQueue::new().shared();
    let ga = GoogleAnalytics::with_sink(TrackerConfig::default(), queue.clone());
    ga.bind(
        &mut window,
        "button",
        "trackEvent",
        "click",
        Overrides::from_json(r#"{"category": "CTA", "action": "press", "value": 5}"#).unwrap(),
    )
    .unwrap();

    window.click(button).unwrap();
    assert_eq!(
        queue.borrow().pushed()[0].as_slice(),
        &[
            Value::from("_trackEvent"),
            Value::from("CTA"),
            Value::from("press"),
            Value::from("Hero"),
            Value::Int(5),
        ]
    );
}

#[test]
fn test_custom_attribute_prefix() {
    let mut window = window();
    let body = window.document().body();
    let a = append(
        &mut window,
        body,
        "a",
        &[("href", "#"), ("data-track-url", "/virtual/menu")],
    );
    let queue = AnalyticsQueue::new().shared();
    let config = TrackerConfig::from_json(r#"{"attribute_prefix": "track"}"#).unwrap();
    let ga = GoogleAnalytics::with_sink(config, queue.clone());
    ga.bind(&mut window, "a", "trackPageview", "click", Overrides::new())
        .unwrap();

    let event = window.click(a).unwrap();
    assert!(!event.is_default_prevented());
    assert_eq!(queue.borrow().pushed()[0].to_json(), r#"["_trackPageview","/virtual/menu"]"#);
}

// ============================================================================
// TRACKER LIFETIME
// ============================================================================

#[test]
fn test_removed_element_tracker_is_pruned() {
    let mut window = window();
    let a = nav_link(&mut window);
    let other = nav_link(&mut window);
    let ga = GoogleAnalytics::with_sink(TrackerConfig::default(), AnalyticsQueue::new().shared());
    ga.bind(&mut window, "a", "trackEvent", "click", Overrides::new())
        .unwrap();

    window.click(a).unwrap();
    assert_eq!(ga.active_trackers(), 1);

    window.document_mut().remove(a).unwrap();
    window.click(other).unwrap();
    assert_eq!(ga.tracker_state(a), None);
    assert_eq!(ga.tracker_state(other), Some(TrackerState::Pushed));
}

#[test]
fn test_unbind_releases_in_flight_trackers() {
    let mut window = window();
    let a = nav_link(&mut window);
    let ga = GoogleAnalytics::with_sink(TrackerConfig::default(), AnalyticsQueue::new().shared());
    let binding = ga
        .bind(&mut window, "a", "trackEvent", "click", Overrides::new())
        .unwrap();

    window.click(a).unwrap();
    assert_eq!(ga.active_trackers(), 1);
    ga.unbind(&mut window, &binding);
    assert_eq!(ga.active_trackers(), 0);
}
