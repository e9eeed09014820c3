//! SeaORM entities mirroring the migration schema.

pub mod category;
pub mod post;
pub mod user;

use std::fmt::Display;

use quill_core::error::RepoError;
use sea_orm::{ActiveModelTrait, EntityTrait};

/// A stored row that does not map onto its domain type, or a domain value
/// that does not fit its column.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("column '{column}' holds an unreadable value: {reason}")]
    Decode { column: &'static str, reason: String },

    #[error("column '{column}' cannot store the value: {reason}")]
    Encode { column: &'static str, reason: String },
}

impl RowError {
    pub(crate) fn decode(column: &'static str, reason: impl Display) -> Self {
        Self::Decode {
            column,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn encode(column: &'static str, reason: impl Display) -> Self {
        Self::Encode {
            column,
            reason: reason.to_string(),
        }
    }
}

impl From<RowError> for RepoError {
    fn from(err: RowError) -> Self {
        RepoError::Query(err.to_string())
    }
}

/// Columns that a whole-row update leaves untouched because another write
/// path owns them.
pub trait OwnedColumns: ActiveModelTrait {
    fn owned_columns() -> Vec<<Self::Entity as EntityTrait>::Column> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_maps_to_query_error() {
        let err: RepoError = RowError::decode("status", "unknown post status 'gone'").into();
        match err {
            RepoError::Query(msg) => {
                assert!(msg.contains("status"));
                assert!(msg.contains("gone"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
