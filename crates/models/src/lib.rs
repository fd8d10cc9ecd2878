//! SeaORM entities for users, products, deliveries, transactions and
//! comments, plus the field-level validation each table enforces on write.

pub mod errors;
pub mod db;
pub mod enums;
pub mod user;
pub mod product;
pub mod delivery;
pub mod transaction;
pub mod comment;

#[cfg(test)]
mod tests;
