//! Embed URL and iframe size resolution.
//!
//! Both resolvers are pure: they never touch settings storage and never fail.

use url::form_urlencoded;

use crate::types::{ContentType, Dimensions, DisplayOptions};

pub const DEFAULT_EMBED_ROOT: &str = "https://soundfaith.com/embed/";

/// Width used when the host has not configured a content width.
pub const DEFAULT_CONTENT_WIDTH: u32 = 600;

/// Aspect ratios are expressed against this reference width.
const BASE_WIDTH: u64 = 600;

/// Build the embed URL under the default root.
pub fn resolve_embed_url(content_type: ContentType, id: &str, options: &DisplayOptions) -> String {
    resolve_embed_url_with_root(DEFAULT_EMBED_ROOT, content_type, id, options)
}

/// Build the embed URL under `root`.
///
/// Profiles always render the "recent" playlist view. Every option applicable
/// to `content_type` is emitted as `key=true|false`, missing ones taking the
/// content type's default.
pub fn resolve_embed_url_with_root(
    root: &str,
    content_type: ContentType,
    id: &str,
    options: &DisplayOptions,
) -> String {
    let mut url = trailing_slash(root);
    url.push_str(content_type.segment());
    url.push('/');
    url.push_str(id);

    if content_type == ContentType::Profile {
        url = trailing_slash(&url);
        url.push_str("recent");
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(content_type.applicable_options().iter().map(|o| {
            let v = if options.flag(content_type, *o) { "true" } else { "false" };
            (o.key(), v)
        }))
        .finish();

    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }
    url
}

/// Size the iframe for `content_type`.
///
/// `content_width` of `None` or `0` falls back to [`DEFAULT_CONTENT_WIDTH`].
/// Height is rounded half-up to whole pixels.
pub fn resolve_dimensions(
    content_type: ContentType,
    options: &DisplayOptions,
    content_width: Option<u32>,
) -> Dimensions {
    let width = content_width.filter(|w| *w > 0).unwrap_or(DEFAULT_CONTENT_WIDTH);
    let ratio = height_at_base(content_type, options.details_enabled(content_type));
    let height = (u64::from(width) * ratio + BASE_WIDTH / 2) / BASE_WIDTH;
    Dimensions {
        width,
        height: u32::try_from(height).unwrap_or(u32::MAX),
    }
}

// Player height at BASE_WIDTH.
fn height_at_base(content_type: ContentType, details: bool) -> u64 {
    match (content_type, details) {
        (ContentType::Sermon, true) => 505,
        (ContentType::Sermon, false) => 450,
        (ContentType::Profile, true) => 818,
        (ContentType::Profile, false) => 763,
    }
}

fn trailing_slash(s: &str) -> String {
    let mut out = s.trim_end_matches('/').to_string();
    out.push('/');
    out
}
