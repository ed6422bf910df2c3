//! Utility helpers shared across UI code.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from page and component
//! logic to improve reuse and testability.

pub mod auth;
#[cfg(feature = "hydrate")]
pub mod browser_scroll;
pub mod scroll;
pub mod virtual_page;
