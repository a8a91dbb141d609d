//! Conversions between host ids and `BIGINT` columns.

use crate::domain::foundation::{DomainError, ErrorCode};

pub(super) fn id_to_db(id: u64, column: &str) -> Result<i64, DomainError> {
    i64::try_from(id).map_err(|_| {
        DomainError::new(
            ErrorCode::ValidationFailed,
            format!("{} {} exceeds storage range", column, id),
        )
    })
}

pub(super) fn id_from_db(value: i64, column: &str) -> Result<u64, DomainError> {
    u64::try_from(value).map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid {} value: {}", column, value),
        )
    })
}
