//! Products referenced by deliveries and transactions.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::ProductService;
