use actix_web::body::BoxBody;
use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("An unspecified internal error ocurred: {0}")]
    InternalError(#[from] anyhow::Error),
    #[error("An unspecified internal error ocurred")]
    DatabaseError(#[from] BlockingError),
    #[error("{0}")]
    Validation(String),
    #[error("The Email is not available")]
    EmailNotAvailable,
    #[error("{0} name is not available")]
    NameNotAvailable(&'static str),
    #[error("Favorite already exists")]
    FavoriteAlreadyExists,
    #[error("{0}")]
    NotFound(&'static str),
}

impl ApiError {
    pub fn missing_field(field: &str) -> Self {
        ApiError::Validation(format!("Missing required field: {}", field))
    }

    fn get_error_code(&self) -> String {
        match self {
            ApiError::InternalError(_) => "IE-00500".to_string(),
            ApiError::DatabaseError(_) => "DE-00500".to_string(),
            ApiError::Validation(_) => "VE-00400".to_string(),
            ApiError::EmailNotAvailable => "ENA-00400".to_string(),
            ApiError::NameNotAvailable(_) => "NNA-00400".to_string(),
            ApiError::FavoriteAlreadyExists => "FAE-00400".to_string(),
            ApiError::NotFound(_) => "NF-00404".to_string(),
        }
    }
}

/// Fallback for store errors the caller did not translate itself.
impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateKey(key) => {
                ApiError::Validation(format!("Duplicate value for {}", key))
            }
            StoreError::MissingReference => ApiError::NotFound("Referenced entity does not exist"),
            StoreError::Internal(e) => ApiError::InternalError(e),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    pub message: String,
    pub status: u16,
    pub timestamp: NaiveDateTime,
    pub internal_code: String,
}

impl From<&ApiError> for ApiErrorResponse {
    fn from(value: &ApiError) -> Self {
        Self {
            message: value.to_string(),
            status: value.status_code().as_u16(),
            timestamp: chrono::Utc::now().naive_utc(),
            internal_code: value.get_error_code(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::EmailNotAvailable => StatusCode::BAD_REQUEST,
            ApiError::NameNotAvailable(_) => StatusCode::BAD_REQUEST,
            ApiError::FavoriteAlreadyExists => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        } else {
            log::info!("Rejected request: {}", self);
        }
        HttpResponse::build(self.status_code()).json(ApiErrorResponse::from(self))
    }
}
