//! Shared types and result types for the database layer

pub mod codec;
pub mod errors;

pub use errors::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;
