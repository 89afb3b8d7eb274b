use crate::db::{self, PlantingCycle, Plot, PlotImage};
use crate::error::{AgribaseError, AgribaseResult, FieldErrors};
use crate::middleware::auth::Claims;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const SOIL_TYPES: [&str; 4] = ["clay", "sandy", "loamy", "silt"];
pub const WORKER_ROLES: [&str; 3] = ["supervisor", "worker", "specialist"];
pub const CYCLE_STATUSES: [&str; 4] = ["planned", "ongoing", "completed", "failed"];

pub fn cycle_profit(revenue: Decimal, expenses: Decimal) -> Decimal {
    revenue - expenses
}

const OWNED_PLOTS: &str =
    "SELECT p.id FROM plots p JOIN farms f ON f.id = p.farm_id WHERE f.owner_id = ";

// --- Plots ---

#[derive(Deserialize)]
pub struct PlotInput {
    pub farm_id: i32,
    pub name: String,
    pub size: Decimal,
    pub location: String,
    pub soil_type: String,
    pub irrigation_type: String,
    pub coordinates: Option<serde_json::Value>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl PlotInput {
    pub fn validate(&self) -> AgribaseResult<()> {
        let mut errors = FieldErrors::default();
        if self.name.trim().is_empty() {
            errors.push("name", "must not be blank");
        }
        if self.location.trim().is_empty() {
            errors.push("location", "must not be blank");
        }
        if self.size.is_sign_negative() {
            errors.push("size", "must not be negative");
        }
        if !SOIL_TYPES.contains(&self.soil_type.as_str()) {
            errors.push("soil_type", "must be one of: clay, sandy, loamy, silt");
        }
        if self.irrigation_type.trim().is_empty() {
            errors.push("irrigation_type", "must not be blank");
        }
        errors.into_result()
    }
}

#[derive(Deserialize)]
pub struct PlotListQuery {
    pub farm_id: Option<i32>,
}

/// Plot worker row joined with the employee's user for display naming, the
/// shape the original plot screens expect.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PlotWorkerNamed {
    pub id: i32,
    pub plot_id: i32,
    pub employee_id: i32,
    pub role: String,
    pub assigned_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub employee_name: String,
}

#[derive(Serialize)]
pub struct PlantingCycleResponse {
    #[serde(flatten)]
    pub cycle: PlantingCycle,
    pub profit: Decimal,
}

impl From<PlantingCycle> for PlantingCycleResponse {
    fn from(cycle: PlantingCycle) -> Self {
        let profit = cycle_profit(cycle.revenue, cycle.expenses);
        PlantingCycleResponse { cycle, profit }
    }
}

#[derive(Serialize)]
pub struct PlotDetail {
    #[serde(flatten)]
    pub plot: Plot,
    pub images: Vec<PlotImage>,
    pub workers: Vec<PlotWorkerNamed>,
    pub current_cycle: Option<PlantingCycleResponse>,
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
}

pub async fn list_plots(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<PlotListQuery>,
) -> AgribaseResult<Json<Vec<Plot>>> {
    let rows: Vec<Plot> = sqlx::query_as(
        "SELECT p.* FROM plots p JOIN farms f ON f.id = p.farm_id
         WHERE f.owner_id = $1 AND ($2::INT IS NULL OR p.farm_id = $2)
         ORDER BY p.id",
    )
    .bind(claims.user_id)
    .bind(params.farm_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows))
}

pub async fn get_plot(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<PlotDetail>> {
    let plot: Plot = sqlx::query_as(
        "SELECT p.* FROM plots p JOIN farms f ON f.id = p.farm_id
         WHERE p.id = $1 AND f.owner_id = $2",
    )
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    let images: Vec<PlotImage> =
        sqlx::query_as("SELECT * FROM plot_images WHERE plot_id = $1 ORDER BY id")
            .bind(id)
            .fetch_all(&state.pool)
            .await?;

    let workers: Vec<PlotWorkerNamed> = sqlx::query_as(
        "SELECT pw.id, pw.plot_id, pw.employee_id, pw.role, pw.assigned_date,
                pw.end_date, pw.is_active,
                TRIM(u.first_name || ' ' || u.last_name) AS employee_name
         FROM plot_workers pw
         JOIN employees e ON e.id = pw.employee_id
         JOIN users u ON u.id = e.user_id
         WHERE pw.plot_id = $1
         ORDER BY pw.id",
    )
    .bind(id)
    .fetch_all(&state.pool)
    .await?;

    let current_cycle: Option<PlantingCycle> = sqlx::query_as(
        "SELECT * FROM planting_cycles WHERE plot_id = $1 AND status = 'ongoing'
         ORDER BY start_date DESC LIMIT 1",
    )
    .bind(id)
    .fetch_optional(&state.pool)
    .await?;

    let (total_revenue, total_expenses): (Decimal, Decimal) = sqlx::query_as(
        "SELECT COALESCE(SUM(revenue), 0), COALESCE(SUM(expenses), 0)
         FROM planting_cycles WHERE plot_id = $1",
    )
    .bind(id)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(PlotDetail {
        plot,
        images,
        workers,
        current_cycle: current_cycle.map(PlantingCycleResponse::from),
        total_revenue,
        total_expenses,
    }))
}

pub async fn create_plot(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<PlotInput>,
) -> AgribaseResult<Json<Plot>> {
    input.validate()?;
    db::assert_farm_owned(&state.pool, input.farm_id, claims.user_id).await?;

    let plot: Plot = sqlx::query_as(
        "INSERT INTO plots (farm_id, name, size, location, soil_type, irrigation_type, coordinates, description, is_active)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING *",
    )
    .bind(input.farm_id)
    .bind(input.name.trim())
    .bind(input.size)
    .bind(input.location.trim())
    .bind(&input.soil_type)
    .bind(&input.irrigation_type)
    .bind(input.coordinates)
    .bind(input.description.unwrap_or_default())
    .bind(input.is_active.unwrap_or(true))
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(plot))
}

pub async fn update_plot(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(input): Json<PlotInput>,
) -> AgribaseResult<Json<Plot>> {
    input.validate()?;
    db::assert_farm_owned(&state.pool, input.farm_id, claims.user_id).await?;

    let plot: Plot = sqlx::query_as(
        "UPDATE plots SET farm_id = $1, name = $2, size = $3, location = $4, soil_type = $5,
                irrigation_type = $6, coordinates = $7, description = $8, is_active = $9,
                updated_at = NOW()
         WHERE id = $10 AND farm_id IN (SELECT id FROM farms WHERE owner_id = $11)
         RETURNING *",
    )
    .bind(input.farm_id)
    .bind(input.name.trim())
    .bind(input.size)
    .bind(input.location.trim())
    .bind(&input.soil_type)
    .bind(&input.irrigation_type)
    .bind(input.coordinates)
    .bind(input.description.unwrap_or_default())
    .bind(input.is_active.unwrap_or(true))
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    Ok(Json(plot))
}

pub async fn delete_plot(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<()>> {
    let result = sqlx::query(
        "DELETE FROM plots WHERE id = $1 AND farm_id IN (SELECT id FROM farms WHERE owner_id = $2)",
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

// --- Plot images ---

#[derive(Deserialize)]
pub struct PlotImageInput {
    pub plot_id: i32,
    pub image_path: String,
    pub caption: Option<String>,
}

impl PlotImageInput {
    pub fn validate(&self) -> AgribaseResult<()> {
        let mut errors = FieldErrors::default();
        if self.image_path.trim().is_empty() {
            errors.push("image_path", "must not be blank");
        }
        errors.into_result()
    }
}

#[derive(Deserialize)]
pub struct PlotImageListQuery {
    pub plot_id: Option<i32>,
}

pub async fn list_plot_images(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<PlotImageListQuery>,
) -> AgribaseResult<Json<Vec<PlotImage>>> {
    let rows: Vec<PlotImage> = sqlx::query_as(
        "SELECT pi.* FROM plot_images pi
         JOIN plots p ON p.id = pi.plot_id
         JOIN farms f ON f.id = p.farm_id
         WHERE f.owner_id = $1 AND ($2::INT IS NULL OR pi.plot_id = $2)
         ORDER BY pi.id",
    )
    .bind(claims.user_id)
    .bind(params.plot_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows))
}

pub async fn get_plot_image(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<PlotImage>> {
    let row: PlotImage = sqlx::query_as(
        "SELECT pi.* FROM plot_images pi
         JOIN plots p ON p.id = pi.plot_id
         JOIN farms f ON f.id = p.farm_id
         WHERE pi.id = $1 AND f.owner_id = $2",
    )
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn create_plot_image(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<PlotImageInput>,
) -> AgribaseResult<Json<PlotImage>> {
    input.validate()?;
    db::assert_plot_owned(&state.pool, input.plot_id, claims.user_id).await?;

    let row: PlotImage = sqlx::query_as(
        "INSERT INTO plot_images (plot_id, image_path, caption)
         VALUES ($1, $2, $3)
         RETURNING *",
    )
    .bind(input.plot_id)
    .bind(input.image_path.trim())
    .bind(input.caption.unwrap_or_default())
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(row))
}

pub async fn update_plot_image(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(input): Json<PlotImageInput>,
) -> AgribaseResult<Json<PlotImage>> {
    input.validate()?;
    db::assert_plot_owned(&state.pool, input.plot_id, claims.user_id).await?;

    let sql = format!(
        "UPDATE plot_images SET plot_id = $1, image_path = $2, caption = $3
         WHERE id = $4 AND plot_id IN ({OWNED_PLOTS}$5)
         RETURNING *"
    );
    let row: PlotImage = sqlx::query_as(&sql)
        .bind(input.plot_id)
        .bind(input.image_path.trim())
        .bind(input.caption.unwrap_or_default())
        .bind(id)
        .bind(claims.user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn delete_plot_image(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<()>> {
    let sql = format!("DELETE FROM plot_images WHERE id = $1 AND plot_id IN ({OWNED_PLOTS}$2)");
    let result = sqlx::query(&sql)
        .bind(id)
        .bind(claims.user_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AgribaseError::NotFound);
    }
    Ok(Json(()))
}

// --- Plot workers ---

#[derive(Deserialize)]
pub struct PlotWorkerInput {
    pub plot_id: i32,
    pub employee_id: i32,
    pub role: String,
    pub assigned_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

impl PlotWorkerInput {
    pub fn validate(&self) -> AgribaseResult<()> {
        let mut errors = FieldErrors::default();
        if !WORKER_ROLES.contains(&self.role.as_str()) {
            errors.push("role", "must be one of: supervisor, worker, specialist");
        }
        errors.into_result()
    }
}

#[derive(Deserialize)]
pub struct PlotWorkerListQuery {
    pub plot_id: Option<i32>,
}

pub async fn list_plot_workers(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<PlotWorkerListQuery>,
) -> AgribaseResult<Json<Vec<PlotWorkerNamed>>> {
    let rows: Vec<PlotWorkerNamed> = sqlx::query_as(
        "SELECT pw.id, pw.plot_id, pw.employee_id, pw.role, pw.assigned_date,
                pw.end_date, pw.is_active,
                TRIM(u.first_name || ' ' || u.last_name) AS employee_name
         FROM plot_workers pw
         JOIN employees e ON e.id = pw.employee_id
         JOIN users u ON u.id = e.user_id
         JOIN plots p ON p.id = pw.plot_id
         JOIN farms f ON f.id = p.farm_id
         WHERE f.owner_id = $1 AND ($2::INT IS NULL OR pw.plot_id = $2)
         ORDER BY pw.id",
    )
    .bind(claims.user_id)
    .bind(params.plot_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows))
}

pub async fn get_plot_worker(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<PlotWorkerNamed>> {
    let row: PlotWorkerNamed = sqlx::query_as(
        "SELECT pw.id, pw.plot_id, pw.employee_id, pw.role, pw.assigned_date,
                pw.end_date, pw.is_active,
                TRIM(u.first_name || ' ' || u.last_name) AS employee_name
         FROM plot_workers pw
         JOIN employees e ON e.id = pw.employee_id
         JOIN users u ON u.id = e.user_id
         JOIN plots p ON p.id = pw.plot_id
         JOIN farms f ON f.id = p.farm_id
         WHERE pw.id = $1 AND f.owner_id = $2",
    )
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn create_plot_worker(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<PlotWorkerInput>,
) -> AgribaseResult<Json<crate::db::PlotWorker>> {
    input.validate()?;
    db::assert_plot_owned(&state.pool, input.plot_id, claims.user_id).await?;
    db::assert_employee_owned(&state.pool, input.employee_id, claims.user_id).await?;

    let row: crate::db::PlotWorker = sqlx::query_as(
        "INSERT INTO plot_workers (plot_id, employee_id, role, assigned_date, end_date, is_active)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING *",
    )
    .bind(input.plot_id)
    .bind(input.employee_id)
    .bind(&input.role)
    .bind(input.assigned_date)
    .bind(input.end_date)
    .bind(input.is_active.unwrap_or(true))
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(row))
}

pub async fn update_plot_worker(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(input): Json<PlotWorkerInput>,
) -> AgribaseResult<Json<crate::db::PlotWorker>> {
    input.validate()?;
    db::assert_plot_owned(&state.pool, input.plot_id, claims.user_id).await?;
    db::assert_employee_owned(&state.pool, input.employee_id, claims.user_id).await?;

    let sql = format!(
        "UPDATE plot_workers SET plot_id = $1, employee_id = $2, role = $3,
                assigned_date = $4, end_date = $5, is_active = $6
         WHERE id = $7 AND plot_id IN ({OWNED_PLOTS}$8)
         RETURNING *"
    );
    let row: crate::db::PlotWorker = sqlx::query_as(&sql)
        .bind(input.plot_id)
        .bind(input.employee_id)
        .bind(&input.role)
        .bind(input.assigned_date)
        .bind(input.end_date)
        .bind(input.is_active.unwrap_or(true))
        .bind(id)
        .bind(claims.user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn delete_plot_worker(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<()>> {
    let sql = format!("DELETE FROM plot_workers WHERE id = $1 AND plot_id IN ({OWNED_PLOTS}$2)");
    let result = sqlx::query(&sql)
        .bind(id)
        .bind(claims.user_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AgribaseError::NotFound);
    }
    Ok(Json(()))
}

// --- Planting cycles ---

#[derive(Deserialize)]
pub struct PlantingCycleInput {
    pub plot_id: i32,
    pub crop_id: i32,
    pub start_date: NaiveDate,
    pub expected_end_date: NaiveDate,
    pub actual_end_date: Option<NaiveDate>,
    pub status: String,
    pub yield_amount: Option<Decimal>,
    pub expenses: Option<Decimal>,
    pub revenue: Option<Decimal>,
    pub notes: Option<String>,
}

impl PlantingCycleInput {
    pub fn validate(&self) -> AgribaseResult<()> {
        let mut errors = FieldErrors::default();
        if !CYCLE_STATUSES.contains(&self.status.as_str()) {
            errors.push(
                "status",
                "must be one of: planned, ongoing, completed, failed",
            );
        }
        if self.expenses.map_or(false, |v| v.is_sign_negative()) {
            errors.push("expenses", "must not be negative");
        }
        if self.revenue.map_or(false, |v| v.is_sign_negative()) {
            errors.push("revenue", "must not be negative");
        }
        errors.into_result()
    }
}

#[derive(Deserialize)]
pub struct PlantingCycleListQuery {
    pub plot_id: Option<i32>,
}

pub async fn list_planting_cycles(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<PlantingCycleListQuery>,
) -> AgribaseResult<Json<Vec<PlantingCycleResponse>>> {
    let rows: Vec<PlantingCycle> = sqlx::query_as(
        "SELECT pc.* FROM planting_cycles pc
         JOIN plots p ON p.id = pc.plot_id
         JOIN farms f ON f.id = p.farm_id
         WHERE f.owner_id = $1 AND ($2::INT IS NULL OR pc.plot_id = $2)
         ORDER BY pc.start_date DESC, pc.id DESC",
    )
    .bind(claims.user_id)
    .bind(params.plot_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(
        rows.into_iter().map(PlantingCycleResponse::from).collect(),
    ))
}

pub async fn get_planting_cycle(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<PlantingCycleResponse>> {
    let row: PlantingCycle = sqlx::query_as(
        "SELECT pc.* FROM planting_cycles pc
         JOIN plots p ON p.id = pc.plot_id
         JOIN farms f ON f.id = p.farm_id
         WHERE pc.id = $1 AND f.owner_id = $2",
    )
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    Ok(Json(PlantingCycleResponse::from(row)))
}

pub async fn create_planting_cycle(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<PlantingCycleInput>,
) -> AgribaseResult<Json<PlantingCycleResponse>> {
    input.validate()?;
    db::assert_plot_owned(&state.pool, input.plot_id, claims.user_id).await?;
    db::assert_crop_owned(&state.pool, input.crop_id, claims.user_id).await?;

    let row: PlantingCycle = sqlx::query_as(
        "INSERT INTO planting_cycles (plot_id, crop_id, start_date, expected_end_date,
                actual_end_date, status, yield_amount, expenses, revenue, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING *",
    )
    .bind(input.plot_id)
    .bind(input.crop_id)
    .bind(input.start_date)
    .bind(input.expected_end_date)
    .bind(input.actual_end_date)
    .bind(&input.status)
    .bind(input.yield_amount)
    .bind(input.expenses.unwrap_or(Decimal::ZERO))
    .bind(input.revenue.unwrap_or(Decimal::ZERO))
    .bind(input.notes.unwrap_or_default())
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(PlantingCycleResponse::from(row)))
}

pub async fn update_planting_cycle(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(input): Json<PlantingCycleInput>,
) -> AgribaseResult<Json<PlantingCycleResponse>> {
    input.validate()?;
    db::assert_plot_owned(&state.pool, input.plot_id, claims.user_id).await?;
    db::assert_crop_owned(&state.pool, input.crop_id, claims.user_id).await?;

    let sql = format!(
        "UPDATE planting_cycles SET plot_id = $1, crop_id = $2, start_date = $3,
                expected_end_date = $4, actual_end_date = $5, status = $6,
                yield_amount = $7, expenses = $8, revenue = $9, notes = $10
         WHERE id = $11 AND plot_id IN ({OWNED_PLOTS}$12)
         RETURNING *"
    );
    let row: PlantingCycle = sqlx::query_as(&sql)
        .bind(input.plot_id)
        .bind(input.crop_id)
        .bind(input.start_date)
        .bind(input.expected_end_date)
        .bind(input.actual_end_date)
        .bind(&input.status)
        .bind(input.yield_amount)
        .bind(input.expenses.unwrap_or(Decimal::ZERO))
        .bind(input.revenue.unwrap_or(Decimal::ZERO))
        .bind(input.notes.unwrap_or_default())
        .bind(id)
        .bind(claims.user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AgribaseError::NotFound)?;

    Ok(Json(PlantingCycleResponse::from(row)))
}

pub async fn delete_planting_cycle(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<()>> {
    let sql = format!("DELETE FROM planting_cycles WHERE id = $1 AND plot_id IN ({OWNED_PLOTS}$2)");
    let result = sqlx::query(&sql)
        .bind(id)
        .bind(claims.user_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AgribaseError::NotFound);
    }
    Ok(Json(()))
}
