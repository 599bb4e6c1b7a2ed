pub mod config;
pub mod dispatcher;
pub mod file_store;
pub mod filters;
pub mod formatter;
pub mod options;
pub mod resolver;
pub mod storage;
pub mod types;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::config::EmbedConfig;
    pub use crate::dispatcher::{AutoEmbed, EmbedHandler, EmbedRegistry};
    pub use crate::file_store::FileStore;
    pub use crate::filters::{Attributes, EmbedContext, EmbedFilter, FilterChain};
    pub use crate::options::{Defaults, OptionsProvider, StoredOptions};
    pub use crate::storage::{MemoryStore, SettingsStore};
    pub use crate::types::{ContentType, Dimensions, DisplayOption, DisplayOptions, EmbedRequest};
    pub use crate::SoundFaithEmbed;
}

use anyhow::Result;
use std::sync::Arc;

use crate::config::EmbedConfig;
use crate::dispatcher::{EmbedHandler, EmbedPatterns, EmbedRegistry, request_from_groups};
use crate::filters::{Attributes, EmbedContext, EmbedFilter, FilterChain};
use crate::formatter::{format_embed, RenderSettings};
use crate::options::{Defaults, OptionsProvider};
use crate::resolver::{resolve_dimensions, resolve_embed_url_with_root};
use crate::types::{ContentType, Dimensions, EmbedRequest};

/// Embed provider for soundfaith.com sermon and profile links.
///
/// Display options are read from the injected [`OptionsProvider`] once per
/// embed; output is passed through the `embed_sf` [`FilterChain`].
pub struct SoundFaithEmbed<P = Defaults> {
    provider: P,
    config: EmbedConfig,
    patterns: EmbedPatterns,
    filters: FilterChain,
}

impl SoundFaithEmbed<Defaults> {
    /// Provider with built-in display options and default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(Defaults, EmbedConfig::default())
    }
}

impl<P: OptionsProvider> SoundFaithEmbed<P> {
    pub fn new(provider: P, config: EmbedConfig) -> Result<Self> {
        let patterns = EmbedPatterns::new()?;
        Ok(Self { provider, config, patterns, filters: FilterChain::default() })
    }

    pub fn provider(&self) -> &P { &self.provider }
    pub fn provider_mut(&mut self) -> &mut P { &mut self.provider }
    pub fn config(&self) -> &EmbedConfig { &self.config }
    pub fn patterns(&self) -> &EmbedPatterns { &self.patterns }
    pub fn filters(&self) -> &FilterChain { &self.filters }

    /// Append a filter to the `embed_sf` chain.
    pub fn add_filter<F: EmbedFilter + 'static>(&mut self, filter: F) -> &mut Self {
        self.filters.add(filter);
        self
    }

    fn render_settings(&self) -> RenderSettings<'_> {
        RenderSettings {
            embed_root: self.config.embed_root(),
            content_width: self.config.content_width,
        }
    }

    /// Embed URL for `request` under the current display options.
    pub fn embed_url(&self, request: &EmbedRequest) -> String {
        let options = self.provider.display_options(request.content_type);
        resolve_embed_url_with_root(self.config.embed_root(), request.content_type, &request.id, &options)
    }

    /// Iframe size for `content_type` under the current display options.
    pub fn dimensions(&self, content_type: ContentType) -> Dimensions {
        let options = self.provider.display_options(content_type);
        resolve_dimensions(content_type, &options, self.config.content_width)
    }

    /// Render `request` and run the filter chain with `ctx`.
    pub fn format(&self, request: &EmbedRequest, ctx: &EmbedContext) -> String {
        let options = self.provider.display_options(request.content_type);
        format_embed(
            request.content_type,
            &request.id,
            &options,
            self.render_settings(),
            &self.filters,
            ctx,
        )
    }

    /// Match a bare URL and render it, or `None` for non-SoundFaith URLs.
    pub fn embed(&self, url: &str) -> Option<String> {
        let (request, match_groups) = self.patterns.match_url(url)?;
        let ctx = EmbedContext { match_groups, url: url.to_string(), ..Default::default() };
        Some(self.format(&request, &ctx))
    }

    /// Register the sermon and profile handlers with a host registry.
    pub fn register<R: EmbedRegistry + ?Sized>(self: &Arc<Self>, registry: &mut R)
    where
        P: 'static,
    {
        for (name, pattern) in self.patterns.handlers() {
            registry.register(name, pattern.clone(), self.clone());
        }
    }
}

impl<P: OptionsProvider> EmbedHandler for SoundFaithEmbed<P> {
    fn handle(
        &self,
        match_groups: &[String],
        attributes: &Attributes,
        url: &str,
        raw_attributes: &Attributes,
    ) -> Option<String> {
        let Some(request) = request_from_groups(match_groups) else {
            tracing::debug!(url, ?match_groups, "match groups do not describe a soundfaith embed");
            return None;
        };
        let ctx = EmbedContext {
            match_groups: match_groups.to_vec(),
            attributes: attributes.clone(),
            url: url.to_string(),
            raw_attributes: raw_attributes.clone(),
        };
        Some(self.format(&request, &ctx))
    }
}
