//! Builder pattern for session configuration.
//!
//! # Example
//!
//! ```ignore
//! use kebab::Configuration;
//!
//! let config = Configuration::builder()
//!     .base_url("http://localhost:8080/app/")
//!     .default_wait(10.0, 0.5)
//!     .wait_preset("quick", 1.0, 0.1)
//!     .build()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use rustc_hash::FxHashMap;
use url::Url;

use crate::error::{Error, Result};
use crate::navigator::{InnerNavigatorFactory, NavigatorFactory};
use crate::waiting::WaitPreset;

use super::{
    ConfigValue, Configuration, INNER_NAVIGATOR_FACTORY_KEY, NAVIGATOR_FACTORY_KEY,
};

// ============================================================================
// ConfigurationBuilder
// ============================================================================

/// Builder for a [`Configuration`].
///
/// Use [`Configuration::builder()`] to create one. Nothing is validated
/// until [`build`](Self::build).
#[derive(Debug, Default, Clone)]
pub struct ConfigurationBuilder {
    /// Unparsed base URL.
    base_url: Option<String>,
    /// Default `(timeout, interval)` in seconds.
    default_wait: Option<(f64, f64)>,
    /// Named `(timeout, interval)` budgets in seconds.
    wait_presets: Vec<(String, f64, f64)>,
    /// Raw key/value entries.
    raw: FxHashMap<String, ConfigValue>,
}

// ============================================================================
// ConfigurationBuilder Implementation
// ============================================================================

impl ConfigurationBuilder {
    /// Creates an empty builder.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL relative paths are resolved against.
    ///
    /// A path without a trailing slash is treated as a directory.
    #[inline]
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the default wait budget in seconds.
    #[inline]
    #[must_use]
    pub fn default_wait(mut self, timeout: f64, interval: f64) -> Self {
        self.default_wait = Some((timeout, interval));
        self
    }

    /// Adds a named wait budget in seconds. A later preset with the same
    /// name replaces an earlier one.
    #[inline]
    #[must_use]
    pub fn wait_preset(mut self, name: impl Into<String>, timeout: f64, interval: f64) -> Self {
        self.wait_presets.push((name.into(), timeout, interval));
        self
    }

    /// Overrides the navigator factory.
    #[inline]
    #[must_use]
    pub fn navigator_factory(self, factory: Arc<dyn NavigatorFactory>) -> Self {
        self.value(NAVIGATOR_FACTORY_KEY, ConfigValue::NavigatorFactory(factory))
    }

    /// Overrides the inner navigator factory.
    #[inline]
    #[must_use]
    pub fn inner_navigator_factory(self, factory: Arc<dyn InnerNavigatorFactory>) -> Self {
        self.value(
            INNER_NAVIGATOR_FACTORY_KEY,
            ConfigValue::InnerNavigatorFactory(factory),
        )
    }

    /// Sets a raw entry.
    #[inline]
    #[must_use]
    pub fn value(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.raw.insert(key.into(), value.into());
        self
    }

    /// Builds the configuration with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfiguration`] if the base URL does not parse
    /// - [`Error::InvalidArgument`] if a wait budget has a non-positive
    ///   interval or a negative timeout
    pub fn build(self) -> Result<Configuration> {
        let base_url = self.validate_base_url()?;
        let default_wait = match self.default_wait {
            Some((timeout, interval)) => WaitPreset::from_secs(timeout, interval)?,
            None => WaitPreset::default(),
        };

        let mut wait_presets = FxHashMap::default();
        for (name, timeout, interval) in self.wait_presets {
            let preset = WaitPreset::from_secs(timeout, interval).map_err(|e| {
                Error::invalid_argument(format!("wait preset '{name}': {e}"))
            })?;
            wait_presets.insert(name, preset);
        }

        Ok(Configuration {
            base_url,
            default_wait,
            wait_presets,
            raw: self.raw,
        })
    }
}

// ============================================================================
// Validation
// ============================================================================

impl ConfigurationBuilder {
    /// Parses the base URL, adding a trailing slash to its path.
    fn validate_base_url(&self) -> Result<Option<Url>> {
        let Some(raw) = &self.base_url else {
            return Ok(None);
        };

        let mut url = Url::parse(raw).map_err(|e| {
            Error::invalid_configuration(format!("baseUrl is '{raw}', it is not a valid URL: {e}"))
        })?;

        if url.cannot_be_a_base() {
            return Err(Error::invalid_configuration(format!(
                "baseUrl is '{raw}', it cannot be used as a base URL"
            )));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Some(url))
    }
}

// ============================================================================
// Tests
// ============================================================================
