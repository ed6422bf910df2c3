//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State types are plain data plus pure transition functions; owners such as
//! `AuthSession` decide how they are shared with UI code.

pub mod auth;
