//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login, JWT issuing/verification and the role each token carries.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::{AuthConfig, AuthService};
