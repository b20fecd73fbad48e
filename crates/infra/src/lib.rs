//! Infrastructure layer: storage backends, sessions, configuration and the
//! application services the HTTP layer calls into.

pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod store;

pub use config::AppConfig;
pub use error::{ServiceError, ServiceResult};
pub use session::{InMemorySessionStore, SessionData, SessionError, SessionId, SessionStore};
pub use store::{ProductStore, StoreError, Stores, UserStore, VendorStore};
