//! Client side of the hosted backend service: connection settings, the auth
//! and object-storage HTTP APIs, and the process-wide session store.

pub mod client;
pub mod config;
pub mod session;
pub mod storage;

pub use client::{AuthError, AuthUser, ServiceClient, Session, SignUp};
pub use config::ServiceConfig;
pub use session::{AuthEvent, SessionStore, SubscriptionId};
