use crate::db::{self, Farm, UserDetails};
use crate::error::{AgribaseError, AgribaseResult, FieldErrors};
use crate::middleware::auth::Claims;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct FarmInput {
    pub name: String,
    pub address: String,
    pub total_area: Decimal,
}

impl FarmInput {
    pub fn validate(&self) -> AgribaseResult<()> {
        let mut errors = FieldErrors::default();
        if self.name.trim().is_empty() {
            errors.push("name", "must not be blank");
        }
        if self.address.trim().is_empty() {
            errors.push("address", "must not be blank");
        }
        if self.total_area.is_sign_negative() {
            errors.push("total_area", "must not be negative");
        }
        errors.into_result()
    }
}

#[derive(Serialize)]
pub struct FarmResponse {
    #[serde(flatten)]
    pub farm: Farm,
    pub owner_details: UserDetails,
}

#[derive(Debug, sqlx::FromRow)]
pub struct DashboardRow {
    pub total_employees: i64,
    pub active_employees: i64,
    pub total_livestock: i64,
    pub total_crops: i64,
    pub total_vehicles: i64,
    pub inventory_items: i64,
    pub total_vendors: i64,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
}

#[derive(Debug, Serialize)]
pub struct FarmDashboard {
    pub total_employees: i64,
    pub active_employees: i64,
    pub total_livestock: i64,
    pub total_crops: i64,
    pub total_vehicles: i64,
    pub inventory_items: i64,
    pub total_vendors: i64,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
}

pub fn net_profit(income: Decimal, expenses: Decimal) -> Decimal {
    income - expenses
}

impl From<DashboardRow> for FarmDashboard {
    fn from(row: DashboardRow) -> Self {
        let profit = net_profit(row.total_income, row.total_expenses);
        FarmDashboard {
            total_employees: row.total_employees,
            active_employees: row.active_employees,
            total_livestock: row.total_livestock,
            total_crops: row.total_crops,
            total_vehicles: row.total_vehicles,
            inventory_items: row.inventory_items,
            total_vendors: row.total_vendors,
            total_income: row.total_income,
            total_expenses: row.total_expenses,
            net_profit: profit,
        }
    }
}

async fn owner_details(state: &AppState, user_id: i32) -> AgribaseResult<UserDetails> {
    Ok(sqlx::query_as::<_, UserDetails>(
        "SELECT id, username, email, first_name, last_name FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_one(&state.pool)
    .await?)
}

pub async fn list_farms(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AgribaseResult<Json<Vec<FarmResponse>>> {
    let farms: Vec<Farm> = sqlx::query_as("SELECT * FROM farms WHERE owner_id = $1 ORDER BY id")
        .bind(claims.user_id)
        .fetch_all(&state.pool)
        .await?;

    // Listed farms are by definition the caller's, so the owner block is the
    // caller's own details.
    let owner = owner_details(&state, claims.user_id).await?;
    Ok(Json(
        farms
            .into_iter()
            .map(|farm| FarmResponse {
                farm,
                owner_details: owner.clone(),
            })
            .collect(),
    ))
}

pub async fn create_farm(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<FarmInput>,
) -> AgribaseResult<Json<FarmResponse>> {
    input.validate()?;

    // The owner is always the caller; the request body carries no owner field
    // and any supplied one would be ignored by deserialization.
    let farm: Farm = sqlx::query_as(
        "INSERT INTO farms (name, owner_id, address, total_area)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(input.name.trim())
    .bind(claims.user_id)
    .bind(input.address.trim())
    .bind(input.total_area)
    .fetch_one(&state.pool)
    .await?;

    let owner = owner_details(&state, claims.user_id).await?;
    Ok(Json(FarmResponse {
        farm,
        owner_details: owner,
    }))
}

pub async fn get_farm(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<FarmResponse>> {
    let farm: Farm = sqlx::query_as("SELECT * FROM farms WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(claims.user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AgribaseError::NotFound)?;

    let owner = owner_details(&state, claims.user_id).await?;
    Ok(Json(FarmResponse {
        farm,
        owner_details: owner,
    }))
}

pub async fn update_farm(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(input): Json<FarmInput>,
) -> AgribaseResult<Json<FarmResponse>> {
    input.validate()?;

    let farm: Farm = sqlx::query_as(
        "UPDATE farms SET name = $1, address = $2, total_area = $3, updated_at = NOW()
         WHERE id = $4 AND owner_id = $5
         RETURNING *",
    )
    .bind(input.name.trim())
    .bind(input.address.trim())
    .bind(input.total_area)
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    let owner = owner_details(&state, claims.user_id).await?;
    Ok(Json(FarmResponse {
        farm,
        owner_details: owner,
    }))
}

pub async fn delete_farm(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<()>> {
    let result = sqlx::query("DELETE FROM farms WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(claims.user_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AgribaseError::NotFound);
    }
    Ok(Json(()))
}

/// Per-farm summary recomputed from current rows on every call; sums over an
/// empty transaction set coalesce to zero.
pub async fn farm_dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<FarmDashboard>> {
    db::assert_farm_owned(&state.pool, id, claims.user_id).await?;

    let sql = r#"
        SELECT
            (SELECT COUNT(*) FROM employees WHERE farm_id = $1) AS total_employees,
            (SELECT COUNT(*) FROM employees WHERE farm_id = $1 AND status = 'active') AS active_employees,
            (SELECT COUNT(*) FROM livestock WHERE farm_id = $1) AS total_livestock,
            (SELECT COUNT(*) FROM crops WHERE farm_id = $1) AS total_crops,
            (SELECT COUNT(*) FROM vehicles WHERE farm_id = $1) AS total_vehicles,
            (SELECT COUNT(*) FROM inventory WHERE farm_id = $1) AS inventory_items,
            (SELECT COUNT(*) FROM vendors WHERE farm_id = $1) AS total_vendors,
            (SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE farm_id = $1 AND type = 'income') AS total_income,
            (SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE farm_id = $1 AND type = 'expense') AS total_expenses
    "#;

    let row: DashboardRow = sqlx::query_as(sql)
        .bind(id)
        .fetch_one(&state.pool)
        .await?;

    Ok(Json(FarmDashboard::from(row)))
}
