//! # reusables
//!
//! Reusable front-end building blocks:
//!
//! - an authentication session container ([`session::AuthSession`]) that wraps
//!   login/logout/register/token-refresh calls against a REST backend and
//!   exposes reactive state to UI code, and
//! - a scroll-to-element helper ([`util::scroll::scroll_to_component`]) with
//!   viewport-visibility short-circuiting and completion callbacks.
//!
//! Browser adapters (`localStorage`, DOM scrolling, `IntersectionObserver`)
//! live behind the `hydrate` feature. Everything else runs natively, which is
//! how the tests drive it.

pub mod config;
pub mod error;
pub mod net;
pub mod session;
pub mod state;
pub mod storage;
pub mod util;

pub use config::ClientConfig;
pub use error::AuthError;
pub use net::api::{AuthApi, HttpAuthApi};
pub use net::types::{ProfileUpdate, SessionGrant, User};
pub use session::AuthSession;
pub use state::auth::{AuthAction, AuthState};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};
