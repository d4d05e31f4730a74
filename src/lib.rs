//! Read-through cached catalog reads over a document-search backend.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
