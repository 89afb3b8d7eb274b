use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgribaseError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

pub type AgribaseResult<T> = Result<T, AgribaseError>;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Collects per-field validation messages before a write is attempted.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> AgribaseResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AgribaseError::Validation(self.0))
        }
    }
}

impl AgribaseError {
    pub fn validation(field: &str, message: &str) -> Self {
        AgribaseError::Validation(vec![FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }])
    }
}

// Longest names first so prefix matching never stops at a shorter table name.
const TABLES: [&str; 15] = [
    "maintenance_records",
    "planting_cycles",
    "fuel_records",
    "plot_workers",
    "plot_images",
    "transactions",
    "inventory",
    "employees",
    "livestock",
    "vehicles",
    "vendors",
    "users",
    "plots",
    "crops",
    "farms",
];

/// Maps a Postgres constraint name (`<table>_<column>_key` / `_fkey`) back to
/// the offending column so constraint violations report per field.
pub fn constraint_field(constraint: &str) -> &str {
    let trimmed = constraint
        .strip_suffix("_key")
        .or_else(|| constraint.strip_suffix("_fkey"))
        .unwrap_or(constraint);
    for table in TABLES {
        if let Some(rest) = trimmed.strip_prefix(table) {
            if let Some(field) = rest.strip_prefix('_') {
                return field;
            }
        }
    }
    trimmed
}

fn validation_body(errors: &[FieldError]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for e in errors {
        map.insert(e.field.clone(), json!(e.message));
    }
    json!({ "errors": map })
}

impl IntoResponse for AgribaseError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AgribaseError::Database(sqlx::Error::RowNotFound) | AgribaseError::NotFound => {
                (StatusCode::NOT_FOUND, json!({ "error": "not found" }))
            }
            AgribaseError::Database(sqlx::Error::Database(ref db))
                if db.code().as_deref() == Some("23505") =>
            {
                let field = db.constraint().map(constraint_field).unwrap_or("id");
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "errors": { field: "already exists" } }),
                )
            }
            AgribaseError::Database(sqlx::Error::Database(ref db))
                if db.code().as_deref() == Some("23503") =>
            {
                let field = db.constraint().map(constraint_field).unwrap_or("id");
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "errors": { field: "invalid reference" } }),
                )
            }
            AgribaseError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
            AgribaseError::Auth(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AgribaseError::Jwt(_) => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "invalid token" }),
            ),
            AgribaseError::Validation(ref errors) => {
                (StatusCode::BAD_REQUEST, validation_body(errors))
            }
            ref other => {
                tracing::error!("Unhandled error: {:?}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
