use std::collections::BTreeMap;

/// Name of the filter point hosts hook into to rewrite embed HTML.
pub const EMBED_FILTER: &str = "embed_sf";

/// Attribute map handed over by the host (e.g. `width`/`height` from an
/// `[embed]` shortcode).
pub type Attributes = BTreeMap<String, String>;

/// What the host matched, passed to every filter alongside the HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedContext {
    /// `[full match, type segment, id]`
    pub match_groups: Vec<String>,
    pub attributes: Attributes,
    pub url: String,
    pub raw_attributes: Attributes,
}

/// Post-processor for rendered embed HTML.
pub trait EmbedFilter {
    fn filter(&self, html: String, ctx: &EmbedContext) -> String;
}

impl<F> EmbedFilter for F
where
    F: Fn(String, &EmbedContext) -> String,
{
    fn filter(&self, html: String, ctx: &EmbedContext) -> String {
        self(html, ctx)
    }
}

/// Ordered filters for one named filter point.
pub struct FilterChain {
    name: &'static str,
    filters: Vec<Box<dyn EmbedFilter>>,
}

impl FilterChain {
    pub fn new(name: &'static str) -> Self {
        Self { name, filters: Vec::new() }
    }

    pub fn name(&self) -> &'static str { self.name }
    pub fn len(&self) -> usize { self.filters.len() }
    pub fn is_empty(&self) -> bool { self.filters.is_empty() }

    pub fn add<F: EmbedFilter + 'static>(&mut self, filter: F) -> &mut Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Run every filter in registration order, each getting the previous
    /// output. Identity when no filter is registered.
    pub fn apply(&self, html: String, ctx: &EmbedContext) -> String {
        if !self.filters.is_empty() {
            tracing::debug!(filter = self.name, count = self.filters.len(), "applying embed filters");
        }
        self.filters.iter().fold(html, |acc, f| f.filter(acc, ctx))
    }
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::new(EMBED_FILTER)
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("name", &self.name)
            .field("filters", &self.filters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chain_is_identity() {
        let chain = FilterChain::default();
        assert_eq!(chain.name(), "embed_sf");
        assert_eq!(chain.apply("<p>x</p>".into(), &EmbedContext::default()), "<p>x</p>");
    }

    #[test]
    fn filters_run_in_registration_order() {
        let mut chain = FilterChain::default();
        chain
            .add(|html: String, _: &EmbedContext| format!("[{html}]"))
            .add(|html: String, _: &EmbedContext| format!("{html}!"));
        assert_eq!(chain.apply("a".into(), &EmbedContext::default()), "[a]!");
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn filters_see_match_context() {
        let mut chain = FilterChain::default();
        chain.add(|html: String, ctx: &EmbedContext| {
            format!("<div data-src=\"{}\" data-id=\"{}\">{html}</div>", ctx.url, ctx.match_groups[2])
        });
        let ctx = EmbedContext {
            match_groups: vec!["soundfaith.com/sermons/9".into(), "sermons".into(), "9".into()],
            url: "https://soundfaith.com/sermons/9".into(),
            ..Default::default()
        };
        assert_eq!(
            chain.apply("x".into(), &ctx),
            "<div data-src=\"https://soundfaith.com/sermons/9\" data-id=\"9\">x</div>"
        );
    }

    struct Wrap(&'static str);

    impl EmbedFilter for Wrap {
        fn filter(&self, html: String, _ctx: &EmbedContext) -> String {
            format!("<{0}>{html}</{0}>", self.0)
        }
    }

    #[test]
    fn trait_objects_and_closures_mix() {
        let mut chain = FilterChain::default();
        chain.add(Wrap("figure")).add(|h: String, _: &EmbedContext| h.to_uppercase());
        assert_eq!(chain.apply("a".into(), &EmbedContext::default()), "<FIGURE>A</FIGURE>");
    }
}
