use crate::db::{self, Transaction};
use crate::error::{AgribaseError, AgribaseResult, FieldErrors};
use crate::middleware::auth::Claims;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

pub const TRANSACTION_TYPES: [&str; 2] = ["income", "expense"];

#[derive(Deserialize)]
pub struct TransactionInput {
    pub farm_id: i32,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub status: String,
    pub reference_number: Option<String>,
}

impl TransactionInput {
    pub fn validate(&self) -> AgribaseResult<()> {
        let mut errors = FieldErrors::default();
        if self.description.trim().is_empty() {
            errors.push("description", "must not be blank");
        }
        if self.amount.is_sign_negative() {
            errors.push("amount", "must not be negative");
        }
        if !TRANSACTION_TYPES.contains(&self.kind.as_str()) {
            errors.push("type", "must be one of: income, expense");
        }
        if self.status.trim().is_empty() {
            errors.push("status", "must not be blank");
        }
        errors.into_result()
    }
}

#[derive(Deserialize)]
pub struct TransactionListQuery {
    pub farm_id: Option<i32>,
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<TransactionListQuery>,
) -> AgribaseResult<Json<Vec<Transaction>>> {
    let rows: Vec<Transaction> = sqlx::query_as(
        "SELECT t.* FROM transactions t JOIN farms f ON f.id = t.farm_id
         WHERE f.owner_id = $1 AND ($2::INT IS NULL OR t.farm_id = $2)
         ORDER BY t.date DESC, t.id DESC",
    )
    .bind(claims.user_id)
    .bind(params.farm_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<Transaction>> {
    let row: Transaction = sqlx::query_as(
        "SELECT t.* FROM transactions t JOIN farms f ON f.id = t.farm_id
         WHERE t.id = $1 AND f.owner_id = $2",
    )
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<TransactionInput>,
) -> AgribaseResult<Json<Transaction>> {
    input.validate()?;
    db::assert_farm_owned(&state.pool, input.farm_id, claims.user_id).await?;

    let row: Transaction = sqlx::query_as(
        "INSERT INTO transactions (farm_id, date, description, amount, type, category, status, reference_number)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING *",
    )
    .bind(input.farm_id)
    .bind(input.date)
    .bind(input.description.trim())
    .bind(input.amount)
    .bind(&input.kind)
    .bind(&input.category)
    .bind(&input.status)
    .bind(input.reference_number.unwrap_or_default())
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(row))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(input): Json<TransactionInput>,
) -> AgribaseResult<Json<Transaction>> {
    input.validate()?;
    db::assert_farm_owned(&state.pool, input.farm_id, claims.user_id).await?;

    let row: Transaction = sqlx::query_as(
        "UPDATE transactions SET farm_id = $1, date = $2, description = $3, amount = $4,
                type = $5, category = $6, status = $7, reference_number = $8
         WHERE id = $9 AND farm_id IN (SELECT id FROM farms WHERE owner_id = $10)
         RETURNING *",
    )
    .bind(input.farm_id)
    .bind(input.date)
    .bind(input.description.trim())
    .bind(input.amount)
    .bind(&input.kind)
    .bind(&input.category)
    .bind(&input.status)
    .bind(input.reference_number.unwrap_or_default())
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<()>> {
    let result = sqlx::query(
        "DELETE FROM transactions WHERE id = $1 AND farm_id IN (SELECT id FROM farms WHERE owner_id = $2)",
    )
    .bind(id)
    .bind(claims.user_id)
    .execute(&state.pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AgribaseError::NotFound);
    }
    Ok(Json(()))
}
