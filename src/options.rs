//! Where display options come from, and how stored options are managed over
//! the plugin's lifetime.

use anyhow::{Context, Result};

use crate::storage::{SettingsStore, PROFILE_OPTIONS_KEY, SERMON_OPTIONS_KEY};
use crate::types::{ContentType, DisplayOptions};

/// Read side of the display settings, consulted once per embed.
pub trait OptionsProvider {
    fn display_options(&self, content_type: ContentType) -> DisplayOptions;
}

/// Always the built-in defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct Defaults;

impl OptionsProvider for Defaults {
    fn display_options(&self, content_type: ContentType) -> DisplayOptions {
        content_type.default_options()
    }
}

/// Fixed per-type options, e.g. from a config file.
impl OptionsProvider for std::collections::HashMap<ContentType, DisplayOptions> {
    fn display_options(&self, content_type: ContentType) -> DisplayOptions {
        self.get(&content_type)
            .map(|o| o.effective_for(content_type))
            .unwrap_or_else(|| content_type.default_options())
    }
}

pub fn options_key(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Sermon => SERMON_OPTIONS_KEY,
        ContentType::Profile => PROFILE_OPTIONS_KEY,
    }
}

/// Options read from a [`SettingsStore`].
///
/// A missing, unreadable or malformed entry yields the defaults; the latter
/// two are logged.
#[derive(Debug, Clone, Default)]
pub struct StoredOptions<S> {
    store: S,
}

impl<S: SettingsStore> StoredOptions<S> {
    pub fn new(store: S) -> Self { Self { store } }
    pub fn store(&self) -> &S { &self.store }
    pub fn store_mut(&mut self) -> &mut S { &mut self.store }
    pub fn into_inner(self) -> S { self.store }
}

impl<S: SettingsStore> OptionsProvider for StoredOptions<S> {
    fn display_options(&self, content_type: ContentType) -> DisplayOptions {
        let key = options_key(content_type);
        let stored = match self.store.get(key) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read display options; using defaults");
                None
            }
        };
        match stored {
            None => content_type.default_options(),
            Some(value) => match DisplayOptions::from_value(&value) {
                Some(opts) => opts.effective_for(content_type),
                None => {
                    tracing::warn!(key, "stored display options are not a map; using defaults");
                    content_type.default_options()
                }
            },
        }
    }
}

/// Seed both option keys with the built-in defaults.
pub fn activate<S: SettingsStore + ?Sized>(store: &mut S) -> Result<()> {
    for t in ContentType::ALL {
        store
            .set(options_key(t), t.default_options().to_value())
            .with_context(|| format!("initializing {t} options"))?;
    }
    tracing::info!("display options initialized to defaults");
    Ok(())
}

/// Remove both option keys.
pub fn deactivate<S: SettingsStore + ?Sized>(store: &mut S) -> Result<()> {
    for t in ContentType::ALL {
        store
            .delete(options_key(t))
            .with_context(|| format!("clearing {t} options"))?;
    }
    tracing::info!("display options cleared");
    Ok(())
}

/// Overwrite the stored options for `content_type`. Options that do not
/// apply to the type are dropped; missing ones take their defaults.
pub fn update_options<S: SettingsStore + ?Sized>(
    store: &mut S,
    content_type: ContentType,
    options: &DisplayOptions,
) -> Result<DisplayOptions> {
    let effective = options.effective_for(content_type);
    store
        .set(options_key(content_type), effective.to_value())
        .with_context(|| format!("saving {content_type} options"))?;
    tracing::info!(%content_type, "display options updated");
    Ok(effective)
}
