//! Service layer providing business-oriented CRUD operations on top of models.
//! - Separates business logic from data access through repository traits.
//! - Reuses validation and entity definitions in `models` crate.
//! - Each resource ships a SeaORM repository and an in-memory `mock` one.

pub mod errors;
pub mod ids;
pub mod populate;
pub mod notify;
pub mod auth;
pub mod delivery;
pub mod transaction;
pub mod product;
#[cfg(test)]
pub mod test_support;
