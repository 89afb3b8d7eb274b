use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{FromRow, Pool, Postgres};
use std::str::FromStr;

use crate::error::{AgribaseError, AgribaseResult};

pub type DbPool = Pool<Postgres>;

pub async fn init_pool_with_options(opts: PgConnectOptions) -> AgribaseResult<DbPool> {
    // connect_lazy_with returns the pool immediately without validating the
    // connection; the first query does.
    Ok(PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .idle_timeout(std::time::Duration::from_secs(120))
        .max_lifetime(std::time::Duration::from_secs(300))
        .connect_lazy_with(opts))
}

pub async fn init_pool(database_url: &str) -> AgribaseResult<DbPool> {
    let opts = PgConnectOptions::from_str(database_url)
        .map_err(|e| AgribaseError::Internal(format!("Invalid DB URL: {}", e)))?
        .ssl_mode(PgSslMode::Disable);

    init_pool_with_options(opts).await
}

pub async fn init_database(pool: &DbPool) -> AgribaseResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

// --- Row models ---
//
// One struct per table. Money and quantity columns are NUMERIC end to end;
// nothing here is ever a float.

#[derive(Debug, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// The public projection of a user row; never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserDetails {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Farm {
    pub id: i32,
    pub name: String,
    pub owner_id: i32,
    pub address: String,
    pub total_area: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Plot {
    pub id: i32,
    pub farm_id: i32,
    pub name: String,
    pub size: Decimal,
    pub location: String,
    pub soil_type: String,
    pub irrigation_type: String,
    pub coordinates: Option<serde_json::Value>,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct PlotImage {
    pub id: i32,
    pub plot_id: i32,
    pub image_path: String,
    pub caption: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct PlotWorker {
    pub id: i32,
    pub plot_id: i32,
    pub employee_id: i32,
    pub role: String,
    pub assigned_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct PlantingCycle {
    pub id: i32,
    pub plot_id: i32,
    pub crop_id: i32,
    pub start_date: NaiveDate,
    pub expected_end_date: NaiveDate,
    pub actual_end_date: Option<NaiveDate>,
    pub status: String,
    pub yield_amount: Option<Decimal>,
    pub expenses: Decimal,
    pub revenue: Decimal,
    pub notes: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: i32,
    pub farm_id: i32,
    pub user_id: i32,
    pub role: String,
    pub phone: String,
    pub address: String,
    pub salary: Decimal,
    pub join_date: NaiveDate,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Livestock {
    pub id: i32,
    pub farm_id: i32,
    pub tag_number: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub breed: String,
    pub birth_date: NaiveDate,
    pub health_status: String,
    pub last_checkup: NaiveDate,
    pub notes: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Crop {
    pub id: i32,
    pub farm_id: i32,
    pub name: String,
    pub field_number: String,
    pub area: Decimal,
    pub planting_date: NaiveDate,
    pub expected_harvest_date: NaiveDate,
    pub status: String,
    pub notes: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i32,
    pub farm_id: i32,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub registration_number: String,
    pub purchase_date: NaiveDate,
    pub last_maintenance: NaiveDate,
    pub status: String,
    pub assigned_to: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct InventoryItem {
    pub id: i32,
    pub farm_id: i32,
    pub name: String,
    pub category: String,
    pub quantity: Decimal,
    pub unit: String,
    pub reorder_level: Decimal,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: i32,
    pub farm_id: i32,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub category: String,
    pub status: String,
    pub reference_number: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Vendor {
    pub id: i32,
    pub farm_id: i32,
    pub name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub category: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct FuelRecord {
    pub id: i32,
    pub vehicle_id: i32,
    pub date: NaiveDate,
    pub quantity: Decimal,
    pub cost: Decimal,
    pub filled_by: Option<i32>,
    pub odometer_reading: i32,
    pub notes: String,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct MaintenanceRecord {
    pub id: i32,
    pub vehicle_id: i32,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub description: String,
    pub cost: Decimal,
    pub performed_by: String,
    pub next_maintenance_date: NaiveDate,
}

// --- Ownership checks ---
//
// Every mutate path verifies the referenced parent resolves to the caller
// before touching anything. A parent outside the caller's chain reads as
// absent, so these surface NotFound rather than a permission error.

pub async fn assert_farm_owned(pool: &DbPool, farm_id: i32, user_id: i32) -> AgribaseResult<()> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT id FROM farms WHERE id = $1 AND owner_id = $2")
        .bind(farm_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    row.map(|_| ()).ok_or(AgribaseError::NotFound)
}

pub async fn assert_plot_owned(pool: &DbPool, plot_id: i32, user_id: i32) -> AgribaseResult<()> {
    let row: Option<(i32,)> = sqlx::query_as(
        "SELECT p.id FROM plots p JOIN farms f ON f.id = p.farm_id WHERE p.id = $1 AND f.owner_id = $2",
    )
    .bind(plot_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    row.map(|_| ()).ok_or(AgribaseError::NotFound)
}

pub async fn assert_employee_owned(
    pool: &DbPool,
    employee_id: i32,
    user_id: i32,
) -> AgribaseResult<()> {
    let row: Option<(i32,)> = sqlx::query_as(
        "SELECT e.id FROM employees e JOIN farms f ON f.id = e.farm_id WHERE e.id = $1 AND f.owner_id = $2",
    )
    .bind(employee_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    row.map(|_| ()).ok_or(AgribaseError::NotFound)
}

pub async fn assert_crop_owned(pool: &DbPool, crop_id: i32, user_id: i32) -> AgribaseResult<()> {
    let row: Option<(i32,)> = sqlx::query_as(
        "SELECT c.id FROM crops c JOIN farms f ON f.id = c.farm_id WHERE c.id = $1 AND f.owner_id = $2",
    )
    .bind(crop_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    row.map(|_| ()).ok_or(AgribaseError::NotFound)
}

pub async fn assert_vehicle_owned(
    pool: &DbPool,
    vehicle_id: i32,
    user_id: i32,
) -> AgribaseResult<()> {
    let row: Option<(i32,)> = sqlx::query_as(
        "SELECT v.id FROM vehicles v JOIN farms f ON f.id = v.farm_id WHERE v.id = $1 AND f.owner_id = $2",
    )
    .bind(vehicle_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    row.map(|_| ()).ok_or(AgribaseError::NotFound)
}
