//! Networking modules for the auth REST contract.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` defines the `AuthApi` seam and its reqwest implementation, and
//! `types` defines the shared wire schema.

pub mod api;
pub mod types;
