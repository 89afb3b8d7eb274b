use crate::db::{self, Crop};
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

#[derive(Deserialize)]
pub struct CropInput {
    pub farm_id: i32,
    pub name: String,
    pub field_number: String,
    pub area: Decimal,
    pub planting_date: NaiveDate,
    pub expected_harvest_date: NaiveDate,
    pub status: String,
    pub notes: Option<String>,
}

impl CropInput {
    pub fn validate(&self) -> AgribaseResult<()> {
        let mut errors = FieldErrors::default();
        if self.name.trim().is_empty() {
            errors.push("name", "must not be blank");
        }
        if self.field_number.trim().is_empty() {
            errors.push("field_number", "must not be blank");
        }
        if self.area.is_sign_negative() {
            errors.push("area", "must not be negative");
        }
        if self.status.trim().is_empty() {
            errors.push("status", "must not be blank");
        }
        errors.into_result()
    }
}

#[derive(Deserialize)]
pub struct CropListQuery {
    pub farm_id: Option<i32>,
}

pub async fn list_crops(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<CropListQuery>,
) -> AgribaseResult<Json<Vec<Crop>>> {
    let rows: Vec<Crop> = sqlx::query_as(
        "SELECT c.* FROM crops c JOIN farms f ON f.id = c.farm_id
         WHERE f.owner_id = $1 AND ($2::INT IS NULL OR c.farm_id = $2)
         ORDER BY c.id",
    )
    .bind(claims.user_id)
    .bind(params.farm_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows))
}

pub async fn get_crop(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<Crop>> {
    let row: Crop = sqlx::query_as(
        "SELECT c.* FROM crops c JOIN farms f ON f.id = c.farm_id
         WHERE c.id = $1 AND f.owner_id = $2",
    )
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn create_crop(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<CropInput>,
) -> AgribaseResult<Json<Crop>> {
    input.validate()?;
    db::assert_farm_owned(&state.pool, input.farm_id, claims.user_id).await?;

    let row: Crop = sqlx::query_as(
        "INSERT INTO crops (farm_id, name, field_number, area, planting_date, expected_harvest_date, status, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING *",
    )
    .bind(input.farm_id)
    .bind(input.name.trim())
    .bind(input.field_number.trim())
    .bind(input.area)
    .bind(input.planting_date)
    .bind(input.expected_harvest_date)
    .bind(&input.status)
    .bind(input.notes.unwrap_or_default())
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(row))
}

pub async fn update_crop(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(input): Json<CropInput>,
) -> AgribaseResult<Json<Crop>> {
    input.validate()?;
    db::assert_farm_owned(&state.pool, input.farm_id, claims.user_id).await?;

    let row: Crop = sqlx::query_as(
        "UPDATE crops SET farm_id = $1, name = $2, field_number = $3, area = $4,
                planting_date = $5, expected_harvest_date = $6, status = $7, notes = $8
         WHERE id = $9 AND farm_id IN (SELECT id FROM farms WHERE owner_id = $10)
         RETURNING *",
    )
    .bind(input.farm_id)
    .bind(input.name.trim())
    .bind(input.field_number.trim())
    .bind(input.area)
    .bind(input.planting_date)
    .bind(input.expected_harvest_date)
    .bind(&input.status)
    .bind(input.notes.unwrap_or_default())
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn delete_crop(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<()>> {
    let result = sqlx::query(
        "DELETE FROM crops WHERE id = $1 AND farm_id IN (SELECT id FROM farms WHERE owner_id = $2)",
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
