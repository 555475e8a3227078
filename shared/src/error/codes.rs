//! Numeric error codes
//!
//! Serialized as plain numbers in every error body. Ranges:
//! - 0xxx: general
//! - 7xxx: zones (71xx) and distributors (72xx)
//! - 9xxx: system

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    ValidationFailed = 2,
    NotFound = 3,
    AlreadyExists = 4,

    // ==================== 7xxx: Zones & distributors ====================
    ZoneNotFound = 7101,
    /// Zone still has distributors and cannot be deleted
    ZoneHasDistributors = 7102,
    DistributorNotFound = 7201,
    /// `zone_id` of a distributor payload names no zone
    DistributorZoneMissing = 7202,
    /// Delivery value negative, not finite or above the maximum
    InvalidDeliveryValue = 7203,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    DatabaseError = 9002,
}

impl ErrorCode {
    const ALL: [ErrorCode; 10] = [
        Self::ValidationFailed,
        Self::NotFound,
        Self::AlreadyExists,
        Self::ZoneNotFound,
        Self::ZoneHasDistributors,
        Self::DistributorNotFound,
        Self::DistributorZoneMissing,
        Self::InvalidDeliveryValue,
        Self::InternalError,
        Self::DatabaseError,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default message, used when no specific one is given
    pub const fn message(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::ZoneNotFound => "Zone not found",
            Self::ZoneHasDistributors => "Zone has associated distributors",
            Self::DistributorNotFound => "Distributor not found",
            Self::DistributorZoneMissing => "Distributor zone does not exist",
            Self::InvalidDeliveryValue => "Delivery value must be a non-negative number",
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A number that is not a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|c| c.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
