//! Example: track a link click and follow it once the push is done
//!
//! Run with `RUST_LOG=debug` to watch binding, dispatch and timers.

use ga_track::host::Window;
use ga_track::{AnalyticsQueue, GoogleAnalytics, Overrides, TrackerConfig};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut window = Window::new("https://shop.example/")?;
    let body = window.document().body();
    let link = window.document_mut().append_element(
        body,
        "a",
        &[
            ("href", "/checkout"),
            ("data-ga-category", "Nav"),
            ("data-ga-action", "click"),
            ("data-ga-label", "Checkout"),
            ("data-ga-value", "3"),
        ],
    )?;

    let queue = AnalyticsQueue::new().shared();
    let ga = GoogleAnalytics::with_sink(TrackerConfig::default(), queue.clone());
    ga.after(|window, node| {
        window.console_mut().log(format!("tracked {node:?}"));
        Ok(())
    });
    ga.bind(&mut window, "a", "trackEvent", "click", Overrides::new())?;

    println!("GA Track v{}", ga_track::VERSION);
    window.click(link)?;
    println!("clicked, still at {}", window.location().href());

    window.run_until_idle()?;
    for args in queue.borrow().pushed() {
        println!("_gaq.push({args})");
    }
    println!("navigated to {} at t={}ms", window.location().href(), window.now());
    Ok(())
}
