//! Selectors
//!
//! Compound selectors (`a.nav[data-ga-category]`) and comma-separated lists
//! of them. Combinators are not supported.

use crate::{DomError, ElementData};

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Tag(String),
    Class(String),
    Id(String),
    Attribute { name: String, value: Option<String> },
    Universal,
}

impl SimpleSelector {
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => element.tag.eq_ignore_ascii_case(tag),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Class(class) => element.has_class(class),
            Self::Attribute { name, value: None } => element.attrs.has_attribute(name),
            Self::Attribute {
                name,
                value: Some(expected),
            } => element.get_attr(name) == Some(expected.as_str()),
        }
    }
}

/// Parsed selector list; an element matches if any compound matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    compounds: Vec<Vec<SimpleSelector>>,
}

impl Selector {
    /// Parse a selector list such as `a.track, button[data-ga-category]`
    pub fn parse(source: &str) -> Result<Self, DomError> {
        let invalid = || DomError::InvalidSelector(source.to_string());
        let mut compounds = Vec::new();

        for part in source.split(',') {
            let part = part.trim();
            if part.is_empty() || (part.contains(char::is_whitespace) && !part.contains('[')) {
                return Err(invalid());
            }
            compounds.push(parse_compound(part).ok_or_else(invalid)?);
        }

        Ok(Self {
            source: source.trim().to_string(),
            compounds,
        })
    }

    /// Selector text as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, element: &ElementData) -> bool {
        self.compounds
            .iter()
            .any(|compound| compound.iter().all(|simple| simple.matches(element)))
    }
}

fn parse_compound(s: &str) -> Option<Vec<SimpleSelector>> {
    let mut out = Vec::new();
    let mut rest = s;

    let tag_len = rest
        .find(|c: char| matches!(c, '.' | '#' | '['))
        .unwrap_or(rest.len());
    let tag = &rest[..tag_len];
    match tag {
        "" => {}
        "*" => out.push(SimpleSelector::Universal),
        t if is_ident(t) => out.push(SimpleSelector::Tag(t.to_ascii_lowercase())),
        _ => return None,
    }
    rest = &rest[tag_len..];

    while let Some(c) = rest.chars().next() {
        match c {
            '.' | '#' => {
                let body = &rest[1..];
                let end = body
                    .find(|c: char| matches!(c, '.' | '#' | '['))
                    .unwrap_or(body.len());
                let ident = &body[..end];
                if !is_ident(ident) {
                    return None;
                }
                out.push(if c == '.' {
                    SimpleSelector::Class(ident.to_string())
                } else {
                    SimpleSelector::Id(ident.to_string())
                });
                rest = &body[end..];
            }
            '[' => {
                let close = rest.find(']')?;
                out.push(parse_attribute(&rest[1..close])?);
                rest = &rest[close + 1..];
            }
            _ => return None,
        }
    }

    if out.is_empty() { None } else { Some(out) }
}

fn parse_attribute(inner: &str) -> Option<SimpleSelector> {
    let (name, value) = match inner.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            (name.trim(), Some(unquoted.to_string()))
        }
        None => (inner.trim(), None),
    };
    if !is_ident(name) {
        return None;
    }
    Some(SimpleSelector::Attribute {
        name: name.to_ascii_lowercase(),
        value,
    })
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> ElementData {
        let mut e = ElementData::new("a");
        e.set_attr("id", "home");
        e.set_attr("class", "nav track");
        e.set_attr("href", "/next");
        e.set_attr("data-ga-category", "Nav");
        e
    }

    #[test]
    fn test_simple_selector_parse() {
        let sel = Selector::parse("div").unwrap();
        assert_eq!(sel.compounds, vec![vec![SimpleSelector::Tag("div".into())]]);
        assert!(Selector::parse(".class").is_ok());
        assert!(Selector::parse("#id").is_ok());
        assert!(Selector::parse("*").is_ok());
    }

    #[test]
    fn test_compound_matches() {
        let e = link();
        assert!(Selector::parse("a.nav").unwrap().matches(&e));
        assert!(Selector::parse("A#home.track").unwrap().matches(&e));
        assert!(Selector::parse("[data-ga-category]").unwrap().matches(&e));
        assert!(Selector::parse("a[data-ga-category=\"Nav\"]").unwrap().matches(&e));
        assert!(!Selector::parse("a[data-ga-category=Other]").unwrap().matches(&e));
        assert!(!Selector::parse("button.nav").unwrap().matches(&e));
    }

    #[test]
    fn test_selector_list() {
        let sel = Selector::parse("button, a.track").unwrap();
        assert!(sel.matches(&link()));
        assert_eq!(sel.as_str(), "button, a.track");
    }

    #[test]
    fn test_invalid_selectors() {
        for bad in ["", "a,", "div span", "a[", ".", "a..b", "#"] {
            assert!(
                matches!(Selector::parse(bad), Err(DomError::InvalidSelector(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }
}
