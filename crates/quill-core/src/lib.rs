//! # Quill Core
//!
//! The domain layer of the Quill blog backend: entities, validation,
//! authorization rules, repository ports and the services that keep
//! category counts consistent with their posts.
//! This crate has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;
pub mod services;

pub use error::DomainError;
