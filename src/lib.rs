//! Folio: article CRUD with cache-aside reads and explicit invalidation on
//! writes.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
