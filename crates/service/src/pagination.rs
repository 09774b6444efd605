//! Pagination utilities for service layer
//!
//! `limit`/`offset` as accepted from query strings, resolved against the
//! configured default page size.

use serde::Deserialize;

use crate::errors::ServiceError;

/// Fallback page size when neither the caller nor the config supplies one.
pub const DEFAULT_LIMIT: u64 = 10;

/// Largest value the SQL drivers can bind for `LIMIT`/`OFFSET`.
pub const MAX_BOUND: u64 = i64::MAX as u64;

/// Pagination parameters
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// maximum number of items to return
    pub limit: Option<u64>,
    /// number of items to skip
    pub offset: Option<u64>,
}

impl Pagination {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit: Some(limit), offset: Some(offset) }
    }

    /// Fill defaults, reject a zero limit and values past [`MAX_BOUND`].
    /// Returns `(limit, offset)`.
    pub fn resolve(self, default_limit: u64) -> Result<(u64, u64), ServiceError> {
        let limit = self.limit.unwrap_or(default_limit);
        if limit == 0 {
            return Err(ServiceError::BadRequest("limit must not be less than 1".into()));
        }
        if limit > MAX_BOUND {
            return Err(ServiceError::BadRequest(format!("limit must not be greater than {MAX_BOUND}")));
        }
        let offset = self.offset.unwrap_or(0);
        if offset > MAX_BOUND {
            return Err(ServiceError::BadRequest(format!("offset must not be greater than {MAX_BOUND}")));
        }
        Ok((limit, offset))
    }
}
