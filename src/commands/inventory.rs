use crate::db::{self, InventoryItem};
use crate::error::{AgribaseError, AgribaseResult, FieldErrors};
use crate::middleware::auth::Claims;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct InventoryInput {
    pub farm_id: i32,
    pub name: String,
    pub category: String,
    pub quantity: Decimal,
    pub unit: String,
    pub reorder_level: Decimal,
}

impl InventoryInput {
    pub fn validate(&self) -> AgribaseResult<()> {
        let mut errors = FieldErrors::default();
        if self.name.trim().is_empty() {
            errors.push("name", "must not be blank");
        }
        if self.unit.trim().is_empty() {
            errors.push("unit", "must not be blank");
        }
        if self.quantity.is_sign_negative() {
            errors.push("quantity", "must not be negative");
        }
        if self.reorder_level.is_sign_negative() {
            errors.push("reorder_level", "must not be negative");
        }
        errors.into_result()
    }
}

#[derive(Deserialize)]
pub struct InventoryListQuery {
    pub farm_id: Option<i32>,
}

pub async fn list_inventory(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<InventoryListQuery>,
) -> AgribaseResult<Json<Vec<InventoryItem>>> {
    let rows: Vec<InventoryItem> = sqlx::query_as(
        "SELECT i.* FROM inventory i JOIN farms f ON f.id = i.farm_id
         WHERE f.owner_id = $1 AND ($2::INT IS NULL OR i.farm_id = $2)
         ORDER BY i.id",
    )
    .bind(claims.user_id)
    .bind(params.farm_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows))
}

pub async fn get_inventory_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<InventoryItem>> {
    let row: InventoryItem = sqlx::query_as(
        "SELECT i.* FROM inventory i JOIN farms f ON f.id = i.farm_id
         WHERE i.id = $1 AND f.owner_id = $2",
    )
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn create_inventory_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<InventoryInput>,
) -> AgribaseResult<Json<InventoryItem>> {
    input.validate()?;
    db::assert_farm_owned(&state.pool, input.farm_id, claims.user_id).await?;

    let row: InventoryItem = sqlx::query_as(
        "INSERT INTO inventory (farm_id, name, category, quantity, unit, reorder_level)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING *",
    )
    .bind(input.farm_id)
    .bind(input.name.trim())
    .bind(&input.category)
    .bind(input.quantity)
    .bind(input.unit.trim())
    .bind(input.reorder_level)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(row))
}

pub async fn update_inventory_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(input): Json<InventoryInput>,
) -> AgribaseResult<Json<InventoryItem>> {
    input.validate()?;
    db::assert_farm_owned(&state.pool, input.farm_id, claims.user_id).await?;

    let row: InventoryItem = sqlx::query_as(
        "UPDATE inventory SET farm_id = $1, name = $2, category = $3, quantity = $4,
                unit = $5, reorder_level = $6, last_updated = NOW()
         WHERE id = $7 AND farm_id IN (SELECT id FROM farms WHERE owner_id = $8)
         RETURNING *",
    )
    .bind(input.farm_id)
    .bind(input.name.trim())
    .bind(&input.category)
    .bind(input.quantity)
    .bind(input.unit.trim())
    .bind(input.reorder_level)
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn delete_inventory_item(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<()>> {
    let result = sqlx::query(
        "DELETE FROM inventory WHERE id = $1 AND farm_id IN (SELECT id FROM farms WHERE owner_id = $2)",
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
