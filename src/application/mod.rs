//! Catalog read path: query building, retries, codecs and entity services.

pub mod catalog;
pub mod codec;
pub mod collections;
pub mod error;
pub mod query;
pub mod repos;
pub mod retry;
