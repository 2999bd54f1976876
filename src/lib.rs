//! Kebab - page objects with named, lazily resolved content.
//!
//! Page classes declare named content accessors; a bound page resolves them
//! into sets of live element handles through a driver collaborator, with
//! optional caching, required-content checks and retry-until-ready waiting.
//!
//! # Architecture
//!
//! Resolution flows leaf-first:
//!
//! - **Locator**: turns attribute predicates plus a selector into one driver
//!   query, folding what CSS can express and post-filtering the rest
//! - **Navigator**: the ordered, possibly empty result of every find
//! - **Wait engine**: bounded polling with named presets
//! - **Content template**: a named accessor bound to one page, with its own
//!   argument-keyed cache
//! - **Template registry**: built once per page by walking its class
//!   hierarchy, subclass declarations shadowing superclass ones
//!
//! The driver itself (DOM access, transport, browser process) is behind the
//! [`Driver`] and [`ElementHandle`] traits.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use kebab::driver::memory::{MemoryDriver, MemoryNode};
//! use kebab::{
//!     Browser, Configuration, ContentDsl, Locator, PageClass, Result, TemplateParams,
//! };
//!
//! fn declare(dsl: &mut ContentDsl) {
//!     dsl.content("heading", TemplateParams::new(), |ctx| async move {
//!         Ok(ctx.find("h1").await?.into())
//!     });
//! }
//!
//! static HOME: PageClass = PageClass::new("HomePage").url("home").content(declare);
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let driver = Arc::new(MemoryDriver::with_document([
//!         MemoryNode::new("h1").with_text("Welcome"),
//!     ]));
//!     let config = Configuration::builder()
//!         .base_url("http://localhost:8080/")
//!         .build()?;
//!
//!     let browser = Browser::new(driver, config)?;
//!     let home = browser.to(&HOME, [("lang", "en")]).await?;
//!
//!     let heading = home.content("heading", ()).await?;
//!     println!("{:?}", heading.navigator());
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`browser`] | [`Browser`] session, navigation and forwarding |
//! | [`config`] | [`Configuration`] and its builder |
//! | [`content`] | Content declarations, templates and their resolution |
//! | [`driver`] | Driver collaborator traits and the in-memory driver |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`locator`] | Queries, attribute predicates and selector folding |
//! | [`navigator`] | [`NavigatorHandle`] and navigator factories |
//! | [`page`] | [`PageClass`] metadata and bound [`Page`]s |
//! | [`waiting`] | [`WaitEngine`] and wait presets |

// ============================================================================
// Modules
// ============================================================================

/// Browser session.
pub mod browser;

/// Session configuration.
pub mod config;

/// Content templates.
pub mod content;

/// Driver collaborator interface.
///
/// Implement [`Driver`] and [`ElementHandle`] to back a [`Browser`] with a
/// real remote end.
pub mod driver;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// Element location.
pub mod locator;

/// Ordered element result sets.
pub mod navigator;

/// Page objects.
pub mod page;

/// Bounded polling.
pub mod waiting;

// ============================================================================
// Re-exports
// ============================================================================

// Browser types
pub use browser::Browser;

// Configuration types
pub use config::{ConfigValue, Configuration, ConfigurationBuilder};

// Content types
pub use content::{
    Content, ContentContext, ContentDsl, ContentTemplate, FactoryOutput, TemplateArgs,
    TemplateDerivedContent, TemplateParams, TemplateRegistry,
};

// Driver types
pub use driver::{Driver, Element, ElementHandle};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::ElementId;

// Locator types
pub use locator::{AttributePredicates, AttributeValue, Locator, LocatorResolver, SelectorQuery};

// Navigator types
pub use navigator::{
    BrowserBackedNavigatorFactory, DefaultInnerNavigatorFactory, InnerNavigatorFactory,
    NavigatorFactory, NavigatorHandle,
};

// Page types
pub use page::{ContentContainer, PAGE, Page, PageClass};

// Waiting types
pub use waiting::{Truthy, WaitEngine, WaitFailure, WaitPreset, WaitSpec, WaitTimeout};
