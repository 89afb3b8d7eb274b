use crate::db::{self, Vendor};
use crate::error::{AgribaseError, AgribaseResult, FieldErrors};
use crate::middleware::auth::Claims;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct VendorInput {
    pub farm_id: i32,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub category: String,
    pub status: String,
}

impl VendorInput {
    pub fn validate(&self) -> AgribaseResult<()> {
        let mut errors = FieldErrors::default();
        if self.name.trim().is_empty() {
            errors.push("name", "must not be blank");
        }
        if !self.email.is_empty() && !self.email.contains('@') {
            errors.push("email", "must be a valid email address");
        }
        if self.status.trim().is_empty() {
            errors.push("status", "must not be blank");
        }
        errors.into_result()
    }
}

#[derive(Deserialize)]
pub struct VendorListQuery {
    pub farm_id: Option<i32>,
}

pub async fn list_vendors(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<VendorListQuery>,
) -> AgribaseResult<Json<Vec<Vendor>>> {
    let rows: Vec<Vendor> = sqlx::query_as(
        "SELECT v.* FROM vendors v JOIN farms f ON f.id = v.farm_id
         WHERE f.owner_id = $1 AND ($2::INT IS NULL OR v.farm_id = $2)
         ORDER BY v.id",
    )
    .bind(claims.user_id)
    .bind(params.farm_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows))
}

pub async fn get_vendor(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<Vendor>> {
    let row: Vendor = sqlx::query_as(
        "SELECT v.* FROM vendors v JOIN farms f ON f.id = v.farm_id
         WHERE v.id = $1 AND f.owner_id = $2",
    )
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn create_vendor(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<VendorInput>,
) -> AgribaseResult<Json<Vendor>> {
    input.validate()?;
    db::assert_farm_owned(&state.pool, input.farm_id, claims.user_id).await?;

    let row: Vendor = sqlx::query_as(
        "INSERT INTO vendors (farm_id, name, contact_person, email, phone, address, category, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING *",
    )
    .bind(input.farm_id)
    .bind(input.name.trim())
    .bind(&input.contact_person)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(input.address.unwrap_or_default())
    .bind(&input.category)
    .bind(&input.status)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(row))
}

pub async fn update_vendor(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(input): Json<VendorInput>,
) -> AgribaseResult<Json<Vendor>> {
    input.validate()?;
    db::assert_farm_owned(&state.pool, input.farm_id, claims.user_id).await?;

    let row: Vendor = sqlx::query_as(
        "UPDATE vendors SET farm_id = $1, name = $2, contact_person = $3, email = $4,
                phone = $5, address = $6, category = $7, status = $8
         WHERE id = $9 AND farm_id IN (SELECT id FROM farms WHERE owner_id = $10)
         RETURNING *",
    )
    .bind(input.farm_id)
    .bind(input.name.trim())
    .bind(&input.contact_person)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(input.address.unwrap_or_default())
    .bind(&input.category)
    .bind(&input.status)
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn delete_vendor(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<()>> {
    let result = sqlx::query(
        "DELETE FROM vendors WHERE id = $1 AND farm_id IN (SELECT id FROM farms WHERE owner_id = $2)",
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
