//! URL patterns, the handler/registry seam with the host, and a simple
//! line-based auto-embed host.

use std::sync::Arc;

use regex::{Captures, Regex};
use url::Url;

use crate::filters::Attributes;
use crate::types::{ContentType, EmbedRequest};

pub const SERMON_HANDLER: &str = "sf_sermon";
pub const PROFILE_HANDLER: &str = "sf_profile";

const SERMON_PATTERN: &str = r"(?i)soundfaith\.com/(sermons)/(\d+)";
// Path remainder only: stop at query, fragment, whitespace and quoting chars.
const PROFILE_PATTERN: &str = r#"(?i)soundfaith\.com/(profile)/([^?#\s"<>]+)"#;

/// Compiled sermon and profile URL patterns.
#[derive(Debug, Clone)]
pub struct EmbedPatterns {
    pub sermon: Regex,
    pub profile: Regex,
}

impl EmbedPatterns {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            sermon: Regex::new(SERMON_PATTERN)?,
            profile: Regex::new(PROFILE_PATTERN)?,
        })
    }

    /// `(handler name, pattern)` pairs in registration order.
    pub fn handlers(&self) -> [(&'static str, &Regex); 2] {
        [(SERMON_HANDLER, &self.sermon), (PROFILE_HANDLER, &self.profile)]
    }

    /// Match `url` against both patterns, sermon first.
    pub fn match_url(&self, url: &str) -> Option<(EmbedRequest, Vec<String>)> {
        self.handlers().into_iter().find_map(|(_, re)| {
            let groups = match_groups(&re.captures(url)?);
            let request = request_from_groups(&groups)?;
            Some((request, groups))
        })
    }
}

/// All capture groups as owned strings; groups that did not participate
/// become empty strings.
pub fn match_groups(caps: &Captures<'_>) -> Vec<String> {
    caps.iter()
        .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
        .collect()
}

/// Build a request from `[full match, type segment, id]`.
pub fn request_from_groups(groups: &[String]) -> Option<EmbedRequest> {
    let content_type = ContentType::from_segment(groups.get(1)?)?;
    let id = groups.get(2).filter(|id| !id.is_empty())?;
    Some(EmbedRequest::new(content_type, id.as_str()))
}

/// Callback the host invokes for a matched URL. `None` leaves the URL as is.
pub trait EmbedHandler {
    fn handle(
        &self,
        match_groups: &[String],
        attributes: &Attributes,
        url: &str,
        raw_attributes: &Attributes,
    ) -> Option<String>;
}

/// Host-side pattern → handler table.
pub trait EmbedRegistry {
    fn register(&mut self, name: &str, pattern: Regex, handler: Arc<dyn EmbedHandler>);
}

struct Registered {
    name: String,
    pattern: Regex,
    handler: Arc<dyn EmbedHandler>,
}

/// Replaces bare URLs sitting alone on a line with embed HTML.
#[derive(Default)]
pub struct AutoEmbed {
    handlers: Vec<Registered>,
}

impl AutoEmbed {
    pub fn new() -> Self { Self::default() }

    pub fn handler_names(&self) -> Vec<String> {
        self.handlers.iter().map(|h| h.name.clone()).collect()
    }

    /// Embed a single URL with the first handler whose pattern matches and
    /// that produces output. `attributes` are the merged values the host
    /// resolved; `raw_attributes` are the ones given at the call site.
    pub fn embed_url(
        &self,
        url: &str,
        attributes: &Attributes,
        raw_attributes: &Attributes,
    ) -> Option<String> {
        self.handlers.iter().find_map(|h| {
            let caps = h.pattern.captures(url)?;
            let groups = match_groups(&caps);
            let html = h.handler.handle(&groups, attributes, url, raw_attributes);
            if html.is_some() {
                tracing::debug!(handler = %h.name, url, "embedded url");
            }
            html
        })
    }

    /// Run over `content` line by line.
    pub fn render(&self, content: &str) -> String {
        let empty = Attributes::new();
        content
            .split('\n')
            .map(|line| {
                let trimmed = line.trim();
                if !is_bare_url(trimmed) {
                    return line.to_string();
                }
                self.embed_url(trimmed, &empty, &empty)
                    .unwrap_or_else(|| line.to_string())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl EmbedRegistry for AutoEmbed {
    /// Re-registering a name replaces the earlier handler in place.
    fn register(&mut self, name: &str, pattern: Regex, handler: Arc<dyn EmbedHandler>) {
        let entry = Registered { name: name.to_string(), pattern, handler };
        match self.handlers.iter_mut().find(|h| h.name == name) {
            Some(existing) => *existing = entry,
            None => self.handlers.push(entry),
        }
    }
}

fn is_bare_url(s: &str) -> bool {
    if s.is_empty() || s.contains(char::is_whitespace) {
        return false;
    }
    match Url::parse(s) {
        Ok(u) => matches!(u.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
