use crate::db::{self, Employee, FuelRecord, MaintenanceRecord, Vehicle};
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

// --- Vehicles ---

#[derive(Deserialize)]
pub struct VehicleInput {
    pub farm_id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub registration_number: String,
    pub purchase_date: NaiveDate,
    pub last_maintenance: NaiveDate,
    pub status: String,
    pub assigned_to: Option<i32>,
}

impl VehicleInput {
    pub fn validate(&self) -> AgribaseResult<()> {
        let mut errors = FieldErrors::default();
        if self.name.trim().is_empty() {
            errors.push("name", "must not be blank");
        }
        if self.kind.trim().is_empty() {
            errors.push("type", "must not be blank");
        }
        if self.registration_number.trim().is_empty() {
            errors.push("registration_number", "must not be blank");
        }
        errors.into_result()
    }
}

#[derive(Serialize)]
pub struct VehicleResponse {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub assigned_to_details: Option<Employee>,
}

#[derive(Deserialize)]
pub struct VehicleListQuery {
    pub farm_id: Option<i32>,
}

async fn attach_employee(state: &AppState, vehicle: Vehicle) -> AgribaseResult<VehicleResponse> {
    let assigned_to_details = match vehicle.assigned_to {
        Some(employee_id) => {
            sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
                .bind(employee_id)
                .fetch_optional(&state.pool)
                .await?
        }
        None => None,
    };
    Ok(VehicleResponse {
        vehicle,
        assigned_to_details,
    })
}

pub async fn list_vehicles(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<VehicleListQuery>,
) -> AgribaseResult<Json<Vec<VehicleResponse>>> {
    let rows: Vec<Vehicle> = sqlx::query_as(
        "SELECT v.* FROM vehicles v JOIN farms f ON f.id = v.farm_id
         WHERE f.owner_id = $1 AND ($2::INT IS NULL OR v.farm_id = $2)
         ORDER BY v.id",
    )
    .bind(claims.user_id)
    .bind(params.farm_id)
    .fetch_all(&state.pool)
    .await?;

    let mut out = Vec::with_capacity(rows.len());
    for vehicle in rows {
        out.push(attach_employee(&state, vehicle).await?);
    }
    Ok(Json(out))
}

pub async fn get_vehicle(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<VehicleResponse>> {
    let vehicle: Vehicle = sqlx::query_as(
        "SELECT v.* FROM vehicles v JOIN farms f ON f.id = v.farm_id
         WHERE v.id = $1 AND f.owner_id = $2",
    )
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    attach_employee(&state, vehicle).await.map(Json)
}

pub async fn create_vehicle(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<VehicleInput>,
) -> AgribaseResult<Json<VehicleResponse>> {
    input.validate()?;
    db::assert_farm_owned(&state.pool, input.farm_id, claims.user_id).await?;
    if let Some(employee_id) = input.assigned_to {
        db::assert_employee_owned(&state.pool, employee_id, claims.user_id).await?;
    }

    let vehicle: Vehicle = sqlx::query_as(
        "INSERT INTO vehicles (farm_id, name, type, registration_number, purchase_date, last_maintenance, status, assigned_to)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING *",
    )
    .bind(input.farm_id)
    .bind(input.name.trim())
    .bind(&input.kind)
    .bind(input.registration_number.trim())
    .bind(input.purchase_date)
    .bind(input.last_maintenance)
    .bind(&input.status)
    .bind(input.assigned_to)
    .fetch_one(&state.pool)
    .await?;

    attach_employee(&state, vehicle).await.map(Json)
}

pub async fn update_vehicle(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(input): Json<VehicleInput>,
) -> AgribaseResult<Json<VehicleResponse>> {
    input.validate()?;
    db::assert_farm_owned(&state.pool, input.farm_id, claims.user_id).await?;
    if let Some(employee_id) = input.assigned_to {
        db::assert_employee_owned(&state.pool, employee_id, claims.user_id).await?;
    }

    let vehicle: Vehicle = sqlx::query_as(
        "UPDATE vehicles SET farm_id = $1, name = $2, type = $3, registration_number = $4,
                purchase_date = $5, last_maintenance = $6, status = $7, assigned_to = $8
         WHERE id = $9 AND farm_id IN (SELECT id FROM farms WHERE owner_id = $10)
         RETURNING *",
    )
    .bind(input.farm_id)
    .bind(input.name.trim())
    .bind(&input.kind)
    .bind(input.registration_number.trim())
    .bind(input.purchase_date)
    .bind(input.last_maintenance)
    .bind(&input.status)
    .bind(input.assigned_to)
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    attach_employee(&state, vehicle).await.map(Json)
}

pub async fn delete_vehicle(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<()>> {
    let result = sqlx::query(
        "DELETE FROM vehicles WHERE id = $1 AND farm_id IN (SELECT id FROM farms WHERE owner_id = $2)",
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

// --- Fuel records (chained through vehicle -> farm -> owner) ---

#[derive(Deserialize)]
pub struct FuelRecordInput {
    pub vehicle_id: i32,
    pub date: NaiveDate,
    pub quantity: Decimal,
    pub cost: Decimal,
    pub filled_by: Option<i32>,
    pub odometer_reading: i32,
    pub notes: Option<String>,
}

impl FuelRecordInput {
    pub fn validate(&self) -> AgribaseResult<()> {
        let mut errors = FieldErrors::default();
        if self.quantity.is_sign_negative() {
            errors.push("quantity", "must not be negative");
        }
        if self.cost.is_sign_negative() {
            errors.push("cost", "must not be negative");
        }
        if self.odometer_reading < 0 {
            errors.push("odometer_reading", "must not be negative");
        }
        errors.into_result()
    }
}

#[derive(Deserialize)]
pub struct FuelRecordListQuery {
    pub vehicle_id: Option<i32>,
}

const OWNED_VEHICLES: &str =
    "SELECT v.id FROM vehicles v JOIN farms f ON f.id = v.farm_id WHERE f.owner_id = ";

pub async fn list_fuel_records(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<FuelRecordListQuery>,
) -> AgribaseResult<Json<Vec<FuelRecord>>> {
    let rows: Vec<FuelRecord> = sqlx::query_as(
        "SELECT fr.* FROM fuel_records fr
         JOIN vehicles v ON v.id = fr.vehicle_id
         JOIN farms f ON f.id = v.farm_id
         WHERE f.owner_id = $1 AND ($2::INT IS NULL OR fr.vehicle_id = $2)
         ORDER BY fr.date DESC, fr.id DESC",
    )
    .bind(claims.user_id)
    .bind(params.vehicle_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows))
}

pub async fn get_fuel_record(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<FuelRecord>> {
    let row: FuelRecord = sqlx::query_as(
        "SELECT fr.* FROM fuel_records fr
         JOIN vehicles v ON v.id = fr.vehicle_id
         JOIN farms f ON f.id = v.farm_id
         WHERE fr.id = $1 AND f.owner_id = $2",
    )
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn create_fuel_record(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<FuelRecordInput>,
) -> AgribaseResult<Json<FuelRecord>> {
    input.validate()?;
    db::assert_vehicle_owned(&state.pool, input.vehicle_id, claims.user_id).await?;
    if let Some(employee_id) = input.filled_by {
        db::assert_employee_owned(&state.pool, employee_id, claims.user_id).await?;
    }

    let row: FuelRecord = sqlx::query_as(
        "INSERT INTO fuel_records (vehicle_id, date, quantity, cost, filled_by, odometer_reading, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *",
    )
    .bind(input.vehicle_id)
    .bind(input.date)
    .bind(input.quantity)
    .bind(input.cost)
    .bind(input.filled_by)
    .bind(input.odometer_reading)
    .bind(input.notes.unwrap_or_default())
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(row))
}

pub async fn update_fuel_record(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(input): Json<FuelRecordInput>,
) -> AgribaseResult<Json<FuelRecord>> {
    input.validate()?;
    db::assert_vehicle_owned(&state.pool, input.vehicle_id, claims.user_id).await?;
    if let Some(employee_id) = input.filled_by {
        db::assert_employee_owned(&state.pool, employee_id, claims.user_id).await?;
    }

    let sql = format!(
        "UPDATE fuel_records SET vehicle_id = $1, date = $2, quantity = $3, cost = $4,
                filled_by = $5, odometer_reading = $6, notes = $7
         WHERE id = $8 AND vehicle_id IN ({OWNED_VEHICLES}$9)
         RETURNING *"
    );
    let row: FuelRecord = sqlx::query_as(&sql)
        .bind(input.vehicle_id)
        .bind(input.date)
        .bind(input.quantity)
        .bind(input.cost)
        .bind(input.filled_by)
        .bind(input.odometer_reading)
        .bind(input.notes.unwrap_or_default())
        .bind(id)
        .bind(claims.user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn delete_fuel_record(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<()>> {
    let sql = format!("DELETE FROM fuel_records WHERE id = $1 AND vehicle_id IN ({OWNED_VEHICLES}$2)");
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

// --- Maintenance records ---

#[derive(Deserialize)]
pub struct MaintenanceRecordInput {
    pub vehicle_id: i32,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub cost: Decimal,
    pub performed_by: String,
    pub next_maintenance_date: NaiveDate,
}

impl MaintenanceRecordInput {
    pub fn validate(&self) -> AgribaseResult<()> {
        let mut errors = FieldErrors::default();
        if self.kind.trim().is_empty() {
            errors.push("type", "must not be blank");
        }
        if self.cost.is_sign_negative() {
            errors.push("cost", "must not be negative");
        }
        errors.into_result()
    }
}

#[derive(Deserialize)]
pub struct MaintenanceRecordListQuery {
    pub vehicle_id: Option<i32>,
}

pub async fn list_maintenance_records(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<MaintenanceRecordListQuery>,
) -> AgribaseResult<Json<Vec<MaintenanceRecord>>> {
    let rows: Vec<MaintenanceRecord> = sqlx::query_as(
        "SELECT mr.* FROM maintenance_records mr
         JOIN vehicles v ON v.id = mr.vehicle_id
         JOIN farms f ON f.id = v.farm_id
         WHERE f.owner_id = $1 AND ($2::INT IS NULL OR mr.vehicle_id = $2)
         ORDER BY mr.date DESC, mr.id DESC",
    )
    .bind(claims.user_id)
    .bind(params.vehicle_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(rows))
}

pub async fn get_maintenance_record(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<MaintenanceRecord>> {
    let row: MaintenanceRecord = sqlx::query_as(
        "SELECT mr.* FROM maintenance_records mr
         JOIN vehicles v ON v.id = mr.vehicle_id
         JOIN farms f ON f.id = v.farm_id
         WHERE mr.id = $1 AND f.owner_id = $2",
    )
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn create_maintenance_record(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<MaintenanceRecordInput>,
) -> AgribaseResult<Json<MaintenanceRecord>> {
    input.validate()?;
    db::assert_vehicle_owned(&state.pool, input.vehicle_id, claims.user_id).await?;

    let row: MaintenanceRecord = sqlx::query_as(
        "INSERT INTO maintenance_records (vehicle_id, date, type, description, cost, performed_by, next_maintenance_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *",
    )
    .bind(input.vehicle_id)
    .bind(input.date)
    .bind(&input.kind)
    .bind(&input.description)
    .bind(input.cost)
    .bind(&input.performed_by)
    .bind(input.next_maintenance_date)
    .fetch_one(&state.pool)
    .await?;

    Ok(Json(row))
}

pub async fn update_maintenance_record(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(input): Json<MaintenanceRecordInput>,
) -> AgribaseResult<Json<MaintenanceRecord>> {
    input.validate()?;
    db::assert_vehicle_owned(&state.pool, input.vehicle_id, claims.user_id).await?;

    let sql = format!(
        "UPDATE maintenance_records SET vehicle_id = $1, date = $2, type = $3, description = $4,
                cost = $5, performed_by = $6, next_maintenance_date = $7
         WHERE id = $8 AND vehicle_id IN ({OWNED_VEHICLES}$9)
         RETURNING *"
    );
    let row: MaintenanceRecord = sqlx::query_as(&sql)
        .bind(input.vehicle_id)
        .bind(input.date)
        .bind(&input.kind)
        .bind(&input.description)
        .bind(input.cost)
        .bind(&input.performed_by)
        .bind(input.next_maintenance_date)
        .bind(id)
        .bind(claims.user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AgribaseError::NotFound)?;

    Ok(Json(row))
}

pub async fn delete_maintenance_record(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<()>> {
    let sql = format!(
        "DELETE FROM maintenance_records WHERE id = $1 AND vehicle_id IN ({OWNED_VEHICLES}$2)"
    );
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
