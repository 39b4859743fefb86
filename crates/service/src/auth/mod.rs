//! Session authenticator: domain, repository, service.
//!
//! Passwords become a bearer token pair on login; every request's access
//! token is checked against a live session record; role gates sit on top.

pub mod domain;
pub mod errors;
pub mod password;
pub mod policy;
pub mod repo;
pub mod repository;
pub mod service;
pub mod token;

pub use policy::authorize;
pub use service::{AuthConfig, AuthService};
