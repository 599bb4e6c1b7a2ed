use std::fmt::{self, Display, Formatter};

use crate::filters::{EmbedContext, FilterChain};
use crate::resolver::{resolve_dimensions, resolve_embed_url_with_root, DEFAULT_EMBED_ROOT};
use crate::types::{ContentType, Dimensions, DisplayOptions};

/// The iframe markup handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iframe {
    pub src: String,
    pub dimensions: Dimensions,
}

impl Display for Iframe {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "<iframe frameborder=\"0\" scrolling=\"no\" allowfullscreen src=\"{}\" width=\"{}\" height=\"{}\"></iframe>",
            self.src, self.dimensions.width, self.dimensions.height
        )
    }
}

/// Resolution inputs that come from host configuration rather than the URL.
#[derive(Debug, Clone, Copy)]
pub struct RenderSettings<'a> {
    pub embed_root: &'a str,
    pub content_width: Option<u32>,
}

impl Default for RenderSettings<'_> {
    fn default() -> Self {
        Self { embed_root: DEFAULT_EMBED_ROOT, content_width: None }
    }
}

/// Resolve the URL and size without running any filters.
pub fn build_iframe(
    content_type: ContentType,
    id: &str,
    options: &DisplayOptions,
    settings: RenderSettings<'_>,
) -> Iframe {
    Iframe {
        src: resolve_embed_url_with_root(settings.embed_root, content_type, id, options),
        dimensions: resolve_dimensions(content_type, options, settings.content_width),
    }
}

/// Render the iframe and pass it through `filters`.
pub fn format_embed(
    content_type: ContentType,
    id: &str,
    options: &DisplayOptions,
    settings: RenderSettings<'_>,
    filters: &FilterChain,
    ctx: &EmbedContext,
) -> String {
    let html = build_iframe(content_type, id, options, settings).to_string();
    filters.apply(html, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DisplayOption;

    #[test]
    fn raw_sermon_iframe() {
        let opts = DisplayOptions::new().with(DisplayOption::IncludeSermonDetails, true);
        let html = format_embed(
            ContentType::Sermon,
            "482",
            &opts,
            RenderSettings::default(),
            &FilterChain::default(),
            &EmbedContext::default(),
        );
        assert_eq!(
            html,
            "<iframe frameborder=\"0\" scrolling=\"no\" allowfullscreen src=\"https://soundfaith.com/embed/sermons/482?includeSermonDetails=true\" width=\"600\" height=\"505\"></iframe>"
        );
    }

    #[test]
    fn profile_iframe_keeps_plain_ampersands() {
        let html = build_iframe(
            ContentType::Profile,
            "jdoe",
            &ContentType::Profile.default_options(),
            RenderSettings { content_width: Some(1200), ..Default::default() },
        )
        .to_string();
        assert!(html.contains("/profile/jdoe/recent?includeSermonDetails=false&includePlaylist=true"));
        assert!(html.ends_with("width=\"1200\" height=\"1526\"></iframe>"), "{html}");
    }

    #[test]
    fn same_inputs_same_output() {
        let opts = ContentType::Profile.default_options();
        let chain = FilterChain::default();
        let ctx = EmbedContext::default();
        let a = format_embed(ContentType::Profile, "x", &opts, RenderSettings::default(), &chain, &ctx);
        let b = format_embed(ContentType::Profile, "x", &opts, RenderSettings::default(), &chain, &ctx);
        assert_eq!(a, b);
    }

    #[test]
    fn filter_output_is_returned() {
        let mut chain = FilterChain::default();
        chain.add(|html: String, _: &EmbedContext| format!("<div class=\"sf-embed\">{html}</div>"));
        let html = format_embed(
            ContentType::Sermon,
            "1",
            &DisplayOptions::new(),
            RenderSettings::default(),
            &chain,
            &EmbedContext::default(),
        );
        assert!(html.starts_with("<div class=\"sf-embed\"><iframe "));
        assert!(html.ends_with("</iframe></div>"));
    }
}
