use crate::db::{self, Livestock};
use crate::error::{AgribaseError, AgribaseResult, FieldErrors};
use crate::middleware::auth::Claims;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LivestockInput {
    pub farm_id: i32,
    pub tag_number: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub breed: String,
    pub birth_date: NaiveDate,
    pub health_status: String,
    pub last_checkup: NaiveDate,
    pub notes: Option<String>,
}

impl LivestockInput {
    pub fn validate(&self) -> AgribaseResult<()> {
        let mut errors = FieldErrors::default();
        if self.tag_number.trim().is_empty() {
            errors.push("tag_number", "must not be blank");
        }
        if self.kind.trim().is_empty() {
            errors.push("type", "must not be blank");
        }
        if self.health_status.trim().is_empty() {
            errors.push("health_status", "must not be blank");
        }
        errors.into_result()
    }
}

#[derive(Deserialize)]
pub struct LivestockListQuery {
    pub farm_id: Option<i32>,
}

pub async fn list_livestock(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<LivestockListQuery>,
) -> AgribaseResult<Json<Vec<Livestock>>> {
    let rows: Vec<Livestock> = sqlx::query_as(
        "SELECT l.* FROM livestock l JOIN farms f ON f.id = l.farm_id
         WHERE f.owner_id = $1 AND ($2::INT IS NULL OR l.farm_id = $2)
         ORDER BY l.id",
    )
    .bind(claims.user_id)
    .bind(params.farm_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows))
}

pub async fn get_livestock(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<Livestock>> {
    let row: Livestock = sqlx::query_as(
        "SELECT l.* FROM livestock l JOIN farms f ON f.id = l.farm_id
         WHERE l.id = $1 AND f.owner_id = $2",
    )
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn create_livestock(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<LivestockInput>,
) -> AgribaseResult<Json<Livestock>> {
    input.validate()?;
    db::assert_farm_owned(&state.pool, input.farm_id, claims.user_id).await?;

    // tag_number is unique across the whole store; a duplicate comes back as
    // a 23505 and is reported as a validation error on that field.
    let row: Livestock = sqlx::query_as(
        "INSERT INTO livestock (farm_id, tag_number, type, breed, birth_date, health_status, last_checkup, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING *",
    )
    .bind(input.farm_id)
    .bind(input.tag_number.trim())
    .bind(&input.kind)
    .bind(&input.breed)
    .bind(input.birth_date)
    .bind(&input.health_status)
    .bind(input.last_checkup)
    .bind(input.notes.unwrap_or_default())
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(row))
}

pub async fn update_livestock(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(input): Json<LivestockInput>,
) -> AgribaseResult<Json<Livestock>> {
    input.validate()?;
    db::assert_farm_owned(&state.pool, input.farm_id, claims.user_id).await?;

    let row: Livestock = sqlx::query_as(
        "UPDATE livestock SET farm_id = $1, tag_number = $2, type = $3, breed = $4,
                birth_date = $5, health_status = $6, last_checkup = $7, notes = $8
         WHERE id = $9 AND farm_id IN (SELECT id FROM farms WHERE owner_id = $10)
         RETURNING *",
    )
    .bind(input.farm_id)
    .bind(input.tag_number.trim())
    .bind(&input.kind)
    .bind(&input.breed)
    .bind(input.birth_date)
    .bind(&input.health_status)
    .bind(input.last_checkup)
    .bind(input.notes.unwrap_or_default())
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn delete_livestock(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<()>> {
    let result = sqlx::query(
        "DELETE FROM livestock WHERE id = $1 AND farm_id IN (SELECT id FROM farms WHERE owner_id = $2)",
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
