//! Session configuration.
//!
//! The values the content engine reads: base URL, wait budgets and the
//! navigator factory overrides.
//!
//! # Example
//!
//! ```ignore
//! use kebab::Configuration;
//!
//! let config = Configuration::builder()
//!     .base_url("http://localhost:8080/")
//!     .wait_preset("slow", 30.0, 1.0)
//!     .build()?;
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod builder;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::navigator::{
    BrowserBackedNavigatorFactory, DefaultInnerNavigatorFactory, InnerNavigatorFactory,
    NavigatorFactory,
};
use crate::waiting::{WaitEngine, WaitPreset, WaitSpec};

pub use builder::ConfigurationBuilder;

// ============================================================================
// Constants
// ============================================================================

/// Raw key overriding the navigator factory.
pub const NAVIGATOR_FACTORY_KEY: &str = "navigatorFactory";

/// Raw key overriding the inner navigator factory.
pub const INNER_NAVIGATOR_FACTORY_KEY: &str = "innerNavigatorFactory";

// ============================================================================
// ConfigValue
// ============================================================================

/// A raw configuration entry.
#[derive(Debug, Clone)]
pub enum ConfigValue {
    /// A navigator factory implementation.
    NavigatorFactory(Arc<dyn NavigatorFactory>),
    /// An inner navigator factory implementation.
    InnerNavigatorFactory(Arc<dyn InnerNavigatorFactory>),
    /// Any other value.
    Value(Value),
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NavigatorFactory(factory) => write!(f, "{factory:?}"),
            Self::InnerNavigatorFactory(factory) => write!(f, "{factory:?}"),
            Self::Value(value) => write!(f, "{value}"),
        }
    }
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration shared by a browser session and its pages.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    base_url: Option<Url>,
    default_wait: WaitPreset,
    wait_presets: FxHashMap<String, WaitPreset>,
    raw: FxHashMap<String, ConfigValue>,
}

impl Configuration {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Base URL relative paths are resolved against.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Budget used by [`WaitSpec::Default`].
    #[inline]
    #[must_use]
    pub fn default_wait(&self) -> WaitPreset {
        self.default_wait
    }

    /// Looks up a named wait preset.
    #[inline]
    #[must_use]
    pub fn wait_preset(&self, name: &str) -> Option<WaitPreset> {
        self.wait_presets.get(name).copied()
    }

    /// Looks up a raw value.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.raw.get(key)
    }

    /// Resolves how a template asked to wait into an engine.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfiguration`] for an unknown preset name
    /// - [`Error::InvalidArgument`] for a non-positive interval or negative timeout
    pub fn wait_for(&self, spec: &WaitSpec) -> Result<WaitEngine> {
        let preset = match spec {
            WaitSpec::Default => self.default_wait,
            WaitSpec::Preset(name) => self.wait_preset(name).ok_or_else(|| {
                Error::invalid_configuration(format!("Unknown wait preset '{name}'"))
            })?,
            WaitSpec::Timeout(timeout) => {
                WaitPreset::from_secs(*timeout, self.default_wait.interval().as_secs_f64())?
            }
            WaitSpec::Custom { timeout, interval } => WaitPreset::from_secs(*timeout, *interval)?,
        };
        Ok(preset.engine())
    }

    /// The navigator factory a browser session should use.
    ///
    /// Defaults to a [`BrowserBackedNavigatorFactory`] over
    /// [`inner_navigator_factory`](Self::inner_navigator_factory).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the override is not a
    /// navigator factory.
    pub fn create_navigator_factory(&self) -> Result<Arc<dyn NavigatorFactory>> {
        match self.raw.get(NAVIGATOR_FACTORY_KEY) {
            None => {
                let inner = self.inner_navigator_factory()?;
                Ok(Arc::new(BrowserBackedNavigatorFactory::new(inner)))
            }
            Some(ConfigValue::NavigatorFactory(factory)) => {
                debug!(key = NAVIGATOR_FACTORY_KEY, "Using configured navigator factory");
                Ok(Arc::clone(factory))
            }
            Some(other) => Err(Error::invalid_configuration(format!(
                "{NAVIGATOR_FACTORY_KEY} is '{other}', it should be a NavigatorFactory implementation"
            ))),
        }
    }

    /// The factory turning driver elements into navigators.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the override is not an
    /// inner navigator factory.
    pub fn inner_navigator_factory(&self) -> Result<Arc<dyn InnerNavigatorFactory>> {
        match self.raw.get(INNER_NAVIGATOR_FACTORY_KEY) {
            None => Ok(Arc::new(DefaultInnerNavigatorFactory)),
            Some(ConfigValue::InnerNavigatorFactory(factory)) => Ok(Arc::clone(factory)),
            Some(other) => Err(Error::invalid_configuration(format!(
                "{INNER_NAVIGATOR_FACTORY_KEY} is '{other}', it should be an InnerNavigatorFactory implementation"
            ))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
