//! Deliveries: scheduled shipments of a product by a carrier company.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::DeliveryService;
