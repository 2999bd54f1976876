//! Content templates.
//!
//! Page classes declare named content through a [`ContentDsl`]. Binding a
//! page builds a [`TemplateRegistry`] of [`ContentTemplate`]s, which resolve
//! to [`Content`] on demand.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TemplateParams`] | `required`, `cache` and `wait` options |
//! | [`ContentContext`] | Page and arguments handed to a factory |
//! | [`FactoryOutput`] | What a factory returns |
//! | [`TemplateArgs`] | Call arguments, also the cache key |
//! | [`Content`] | Resolved content |
//!
//! # Example
//!
//! ```ignore
//! use kebab::{ContentDsl, Locator, TemplateParams};
//!
//! fn declare(dsl: &mut ContentDsl) {
//!     dsl.content("results", TemplateParams::new().wait("slow"), |ctx| async move {
//!         Ok(ctx.find("li.result").await?.into())
//!     })
//!     .content("result", TemplateParams::new().cache(true), |ctx| async move {
//!         let index = ctx.arg_index(0)?;
//!         Ok(ctx.find_at("li.result", index).await?.into())
//!     });
//! }
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod args;
mod context;
mod registry;
mod template;
mod value;

// ============================================================================
// Re-exports
// ============================================================================

pub use args::TemplateArgs;
pub use context::ContentContext;
pub use registry::{ContentDefinition, ContentDsl, TemplateRegistry};
pub use template::{ContentFactory, ContentTemplate, TemplateParams};
pub use value::{Content, FactoryOutput, TemplateDerivedContent};
