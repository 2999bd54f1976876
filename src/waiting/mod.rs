//! Waiting support.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`WaitEngine`] | Bounded polling executor |
//! | [`WaitPreset`] | Validated `{timeout, interval}` budget |
//! | [`WaitSpec`] | How a template names its budget |
//! | [`Truthy`] | Default success predicate |
//!
//! # Example
//!
//! ```ignore
//! use kebab::WaitEngine;
//!
//! let engine = WaitEngine::from_secs(10.0, 0.5)?;
//! let banner = engine.wait_for(|| page.find("#banner")).await?;
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod engine;
mod preset;

// ============================================================================
// Re-exports
// ============================================================================

pub use engine::{Truthy, WaitEngine, WaitFailure, WaitTimeout};
pub use preset::{DEFAULT_WAIT_INTERVAL, DEFAULT_WAIT_TIMEOUT, WaitPreset, WaitSpec};
