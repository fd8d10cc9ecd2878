//! Transactions: a user's order over a list of products, plus its comments.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::TransactionService;
