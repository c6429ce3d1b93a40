// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Input rejected before any record is created.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::Domain;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("A description is required for {0} records")]
    MissingDescription(Domain),
    #[error("Invalid date '{0}', expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),
    #[error("Category name must not be empty")]
    EmptyCategoryName,
}
