//! Location API
//!
//! window.location plus a record of every navigation the page performed.

use url::Url;

/// Location state
#[derive(Debug, Clone)]
pub struct LocationManager {
    url: Url,
}

impl LocationManager {
    pub fn new(url_str: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            url: Url::parse(url_str)?,
        })
    }

    /// Full URL
    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    pub fn pathname(&self) -> &str {
        self.url.path()
    }

    /// Hash/fragment (including #)
    pub fn hash(&self) -> String {
        self.url
            .fragment()
            .map(|f| format!("#{f}"))
            .unwrap_or_default()
    }

    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// Resolve `href` against the current URL
    pub fn resolve(&self, href: &str) -> Result<Url, url::ParseError> {
        self.url.join(href)
    }

    /// Replace the current URL
    pub fn assign(&mut self, url: Url) {
        self.url = url;
    }
}

/// Where a navigation was directed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    SameWindow,
    /// Browsing context name from the `target` attribute
    NewWindow(String),
}

impl Disposition {
    /// Map a link `target` attribute to a disposition
    pub fn from_target(target: Option<&str>) -> Self {
        match target.map(str::trim) {
            None | Some("") => Self::SameWindow,
            Some(t) if ["_self", "_parent", "_top"].iter().any(|k| t.eq_ignore_ascii_case(k)) => {
                Self::SameWindow
            }
            Some(t) => Self::NewWindow(t.to_string()),
        }
    }
}

/// A completed navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub url: String,
    pub disposition: Disposition,
    /// Virtual clock time of the navigation (ms)
    pub at_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_parts() {
        let loc = LocationManager::new("https://example.com:8080/path/to/page?query=1#section").unwrap();

        assert_eq!(loc.pathname(), "/path/to/page");
        assert_eq!(loc.hash(), "#section");
        assert_eq!(loc.origin(), "https://example.com:8080");
    }

    #[test]
    fn test_resolve_relative() {
        let loc = LocationManager::new("https://example.com/shop/cart").unwrap();

        assert_eq!(loc.resolve("/next").unwrap().as_str(), "https://example.com/next");
        assert_eq!(
            loc.resolve("checkout").unwrap().as_str(),
            "https://example.com/shop/checkout"
        );
        assert_eq!(
            loc.resolve("https://other.com/page").unwrap().as_str(),
            "https://other.com/page"
        );
    }

    #[test]
    fn test_assign() {
        let mut loc = LocationManager::new("https://example.com/").unwrap();
        let next = loc.resolve("/page").unwrap();
        loc.assign(next);

        assert_eq!(loc.href(), "https://example.com/page");
    }

    #[test]
    fn test_disposition_from_target() {
        assert_eq!(Disposition::from_target(None), Disposition::SameWindow);
        assert_eq!(Disposition::from_target(Some("_self")), Disposition::SameWindow);
        assert_eq!(Disposition::from_target(Some("_TOP")), Disposition::SameWindow);
        assert_eq!(
            Disposition::from_target(Some("_blank")),
            Disposition::NewWindow("_blank".into())
        );
    }
}
