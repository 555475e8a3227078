//! HTTP status for each error code

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::NotFound | Self::ZoneNotFound | Self::DistributorNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::AlreadyExists | Self::ZoneHasDistributors => StatusCode::CONFLICT,
            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationFailed | Self::DistributorZoneMissing | Self::InvalidDeliveryValue => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}
