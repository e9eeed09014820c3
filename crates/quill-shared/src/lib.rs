//! # Quill Shared
//!
//! Wire types shared by the API server and its clients. Nothing here knows
//! about the domain crate; handlers convert at the boundary.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, FieldErrorBody, MessageResponse};
