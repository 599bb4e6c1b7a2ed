use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of SoundFaith page being embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Sermon,
    Profile,
}

impl ContentType {
    pub const ALL: [ContentType; 2] = [ContentType::Sermon, ContentType::Profile];

    /// Path segment used both in soundfaith.com page URLs and in embed URLs.
    pub fn segment(&self) -> &'static str {
        match self {
            ContentType::Sermon => "sermons",
            ContentType::Profile => "profile",
        }
    }

    /// Parse a matched path segment (`sermons`, `profile`), ignoring case.
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.segment().eq_ignore_ascii_case(segment))
    }

    /// Options that affect this content type's embed, in query-string order.
    pub fn applicable_options(&self) -> &'static [DisplayOption] {
        match self {
            ContentType::Sermon => &[DisplayOption::IncludeSermonDetails],
            ContentType::Profile => &DisplayOption::ALL,
        }
    }

    /// Built-in default for an applicable option.
    pub fn default_for(&self, option: DisplayOption) -> bool {
        match (self, option) {
            (ContentType::Sermon, DisplayOption::IncludeSermonDetails) => true,
            (ContentType::Profile, DisplayOption::IncludeSermonDetails) => false,
            (ContentType::Profile, _) => true,
            // Not applicable to sermons; never rendered.
            (ContentType::Sermon, _) => false,
        }
    }

    pub fn default_options(&self) -> DisplayOptions {
        self.applicable_options()
            .iter()
            .map(|o| (*o, self.default_for(*o)))
            .collect()
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Sermon => f.write_str("sermon"),
            ContentType::Profile => f.write_str("profile"),
        }
    }
}

impl FromStr for ContentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sermon" | "sermons" => Ok(ContentType::Sermon),
            "profile" | "profiles" => Ok(ContentType::Profile),
            other => Err(anyhow::anyhow!("unknown content type: {other}")),
        }
    }
}

/// Display toggle understood by the SoundFaith embed player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayOption {
    IncludeSermonDetails,
    IncludePlaylist,
    IncludeThumbnail,
    IncludeSpeaker,
    IncludeSeries,
    IncludeDatePresented,
}

impl DisplayOption {
    pub const ALL: [DisplayOption; 6] = [
        DisplayOption::IncludeSermonDetails,
        DisplayOption::IncludePlaylist,
        DisplayOption::IncludeThumbnail,
        DisplayOption::IncludeSpeaker,
        DisplayOption::IncludeSeries,
        DisplayOption::IncludeDatePresented,
    ];

    /// Wire name, used as the query parameter and the stored settings key.
    pub fn key(&self) -> &'static str {
        match self {
            DisplayOption::IncludeSermonDetails => "includeSermonDetails",
            DisplayOption::IncludePlaylist => "includePlaylist",
            DisplayOption::IncludeThumbnail => "includeThumbnail",
            DisplayOption::IncludeSpeaker => "includeSpeaker",
            DisplayOption::IncludeSeries => "includeSeries",
            DisplayOption::IncludeDatePresented => "includeDatePresented",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.key() == key)
    }
}

impl fmt::Display for DisplayOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// Older settings stored the flags as the strings "true"/"false".
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredFlag {
    Bool(bool),
    Text(String),
}

impl StoredFlag {
    fn as_bool(&self) -> Option<bool> {
        match self {
            StoredFlag::Bool(b) => Some(*b),
            StoredFlag::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            StoredFlag::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            StoredFlag::Text(_) => None,
        }
    }
}

/// Boolean display toggles keyed by [`DisplayOption`].
///
/// Only known keys can be represented; unknown keys in stored data are
/// dropped on parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DisplayOptions(BTreeMap<DisplayOption, bool>);

impl DisplayOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, option: DisplayOption, enabled: bool) -> Self {
        self.set(option, enabled);
        self
    }

    pub fn set(&mut self, option: DisplayOption, enabled: bool) {
        self.0.insert(option, enabled);
    }

    pub fn get(&self, option: DisplayOption) -> Option<bool> {
        self.0.get(&option).copied()
    }

    /// Effective value for `content_type`, falling back to its default.
    pub fn flag(&self, content_type: ContentType, option: DisplayOption) -> bool {
        self.get(option)
            .unwrap_or_else(|| content_type.default_for(option))
    }

    pub fn details_enabled(&self, content_type: ContentType) -> bool {
        self.flag(content_type, DisplayOption::IncludeSermonDetails)
    }

    /// Copy restricted to the options applicable to `content_type`, with
    /// missing entries filled in from the defaults.
    pub fn effective_for(&self, content_type: ContentType) -> DisplayOptions {
        content_type
            .applicable_options()
            .iter()
            .map(|o| (*o, self.flag(content_type, *o)))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DisplayOption, bool)> + '_ {
        self.0.iter().map(|(o, v)| (*o, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_value(&self) -> serde_json::Value {
        let map = self
            .iter()
            .map(|(o, v)| (o.key().to_string(), serde_json::Value::Bool(v)))
            .collect();
        serde_json::Value::Object(map)
    }

    /// Parse a stored mapping. Returns `None` when `value` is not an object.
    /// Unknown keys and values that are not booleans are skipped.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let raw: BTreeMap<String, serde_json::Value> =
            serde_json::from_value(value.clone()).ok()?;
        let mut out = DisplayOptions::new();
        for (key, v) in raw {
            let Some(option) = DisplayOption::from_key(&key) else {
                tracing::debug!(%key, "ignoring unknown display option");
                continue;
            };
            match serde_json::from_value::<StoredFlag>(v).ok().and_then(|f| f.as_bool()) {
                Some(b) => out.set(option, b),
                None => tracing::debug!(%key, "ignoring non-boolean display option"),
            }
        }
        Some(out)
    }
}

impl FromIterator<(DisplayOption, bool)> for DisplayOptions {
    fn from_iter<I: IntoIterator<Item = (DisplayOption, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for DisplayOptions {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        DisplayOptions::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom("display options must be a map"))
    }
}

/// A single sermon or profile to embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedRequest {
    pub content_type: ContentType,
    pub id: String,
}

impl EmbedRequest {
    pub fn new(content_type: ContentType, id: impl Into<String>) -> Self {
        Self { content_type, id: id.into() }
    }
}

/// Iframe size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sermon_defaults_only_carry_details() {
        let opts = ContentType::Sermon.default_options();
        assert_eq!(opts.iter().collect::<Vec<_>>(), vec![(DisplayOption::IncludeSermonDetails, true)]);
    }

    #[test]
    fn profile_defaults_hide_details_show_everything_else() {
        let opts = ContentType::Profile.default_options();
        assert_eq!(opts.get(DisplayOption::IncludeSermonDetails), Some(false));
        for o in &DisplayOption::ALL[1..] {
            assert_eq!(opts.get(*o), Some(true), "{o}");
        }
    }

    #[test]
    fn segment_parsing_ignores_case() {
        assert_eq!(ContentType::from_segment("Sermons"), Some(ContentType::Sermon));
        assert_eq!(ContentType::from_segment("PROFILE"), Some(ContentType::Profile));
        assert_eq!(ContentType::from_segment("series"), None);
    }

    #[test]
    fn from_value_drops_unknown_keys_and_accepts_string_flags() {
        let v = json!({
            "includeSermonDetails": "false",
            "includePlaylist": true,
            "autoplay": true,
            "includeSeries": "maybe"
        });
        let opts = DisplayOptions::from_value(&v).unwrap();
        assert_eq!(
            opts.iter().collect::<Vec<_>>(),
            vec![
                (DisplayOption::IncludeSermonDetails, false),
                (DisplayOption::IncludePlaylist, true),
            ]
        );
    }

    #[test]
    fn from_value_rejects_non_objects() {
        assert!(DisplayOptions::from_value(&json!("true")).is_none());
        assert!(DisplayOptions::from_value(&json!([1, 2])).is_none());
    }

    #[test]
    fn effective_for_restricts_and_fills() {
        let opts = DisplayOptions::new().with(DisplayOption::IncludePlaylist, false);
        let sermon = opts.effective_for(ContentType::Sermon);
        assert_eq!(sermon, ContentType::Sermon.default_options());

        let profile = opts.effective_for(ContentType::Profile);
        assert_eq!(profile.get(DisplayOption::IncludePlaylist), Some(false));
        assert_eq!(profile.get(DisplayOption::IncludeThumbnail), Some(true));
        assert_eq!(profile.iter().count(), 6);
    }

    #[test]
    fn value_round_trip_uses_wire_keys() {
        let opts = ContentType::Sermon.default_options();
        assert_eq!(opts.to_value(), json!({ "includeSermonDetails": true }));
        let back: DisplayOptions = serde_json::from_value(opts.to_value()).unwrap();
        assert_eq!(back, opts);
    }
}
