use crate::db::{self, Employee, UserDetails};
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

pub const EMPLOYEE_ROLES: [&str; 3] = ["manager", "supervisor", "worker"];

#[derive(Deserialize)]
pub struct EmployeeInput {
    pub farm_id: i32,
    pub user_id: i32,
    pub role: String,
    pub phone: String,
    pub address: Option<String>,
    pub salary: Decimal,
    pub join_date: NaiveDate,
    pub status: Option<String>,
}

impl EmployeeInput {
    pub fn validate(&self) -> AgribaseResult<()> {
        let mut errors = FieldErrors::default();
        if !EMPLOYEE_ROLES.contains(&self.role.as_str()) {
            errors.push("role", "must be one of: manager, supervisor, worker");
        }
        if self.phone.trim().is_empty() {
            errors.push("phone", "must not be blank");
        }
        if self.salary.is_sign_negative() {
            errors.push("salary", "must not be negative");
        }
        errors.into_result()
    }
}

#[derive(Deserialize)]
pub struct EmployeeListQuery {
    pub farm_id: Option<i32>,
}

#[derive(Serialize)]
pub struct EmployeeResponse {
    #[serde(flatten)]
    pub employee: Employee,
    pub user_details: UserDetails,
}

#[derive(Debug, sqlx::FromRow)]
struct EmployeeUserRow {
    id: i32,
    farm_id: i32,
    user_id: i32,
    role: String,
    phone: String,
    address: String,
    salary: Decimal,
    join_date: NaiveDate,
    status: String,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
}

impl From<EmployeeUserRow> for EmployeeResponse {
    fn from(row: EmployeeUserRow) -> Self {
        EmployeeResponse {
            employee: Employee {
                id: row.id,
                farm_id: row.farm_id,
                user_id: row.user_id,
                role: row.role,
                phone: row.phone,
                address: row.address,
                salary: row.salary,
                join_date: row.join_date,
                status: row.status,
            },
            user_details: UserDetails {
                id: row.user_id,
                username: row.username,
                email: row.email,
                first_name: row.first_name,
                last_name: row.last_name,
            },
        }
    }
}

const SELECT_WITH_USER: &str = r#"
    SELECT e.id, e.farm_id, e.user_id, e.role, e.phone, e.address, e.salary,
           e.join_date, e.status, u.username, u.email, u.first_name, u.last_name
    FROM employees e
    JOIN users u ON u.id = e.user_id
    JOIN farms f ON f.id = e.farm_id
"#;

pub async fn list_employees(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<EmployeeListQuery>,
) -> AgribaseResult<Json<Vec<EmployeeResponse>>> {
    let sql = format!(
        "{SELECT_WITH_USER} WHERE f.owner_id = $1 AND ($2::INT IS NULL OR e.farm_id = $2) ORDER BY e.id"
    );
    let rows: Vec<EmployeeUserRow> = sqlx::query_as(&sql)
        .bind(claims.user_id)
        .bind(params.farm_id)
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(rows.into_iter().map(EmployeeResponse::from).collect()))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<EmployeeResponse>> {
    let sql = format!("{SELECT_WITH_USER} WHERE e.id = $1 AND f.owner_id = $2");
    let row: EmployeeUserRow = sqlx::query_as(&sql)
        .bind(id)
        .bind(claims.user_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AgribaseError::NotFound)?;

    Ok(Json(EmployeeResponse::from(row)))
}

async fn fetch_response(state: &AppState, employee: Employee) -> AgribaseResult<EmployeeResponse> {
    let user_details: UserDetails = sqlx::query_as(
        "SELECT id, username, email, first_name, last_name FROM users WHERE id = $1",
    )
    .bind(employee.user_id)
    .fetch_one(&state.pool)
    .await?;

    Ok(EmployeeResponse {
        employee,
        user_details,
    })
}

pub async fn create_employee(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<EmployeeInput>,
) -> AgribaseResult<Json<EmployeeResponse>> {
    input.validate()?;
    db::assert_farm_owned(&state.pool, input.farm_id, claims.user_id).await?;

    let employee: Employee = sqlx::query_as(
        "INSERT INTO employees (farm_id, user_id, role, phone, address, salary, join_date, status)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING *",
    )
    .bind(input.farm_id)
    .bind(input.user_id)
    .bind(&input.role)
    .bind(input.phone.trim())
    .bind(input.address.unwrap_or_default())
    .bind(input.salary)
    .bind(input.join_date)
    .bind(input.status.unwrap_or_else(|| "active".to_string()))
    .fetch_one(&state.pool)
    .await?;

    fetch_response(&state, employee).await.map(Json)
}

pub async fn update_employee(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(input): Json<EmployeeInput>,
) -> AgribaseResult<Json<EmployeeResponse>> {
    input.validate()?;
    // A farm move must target a farm the caller also owns.
    db::assert_farm_owned(&state.pool, input.farm_id, claims.user_id).await?;

    let employee: Employee = sqlx::query_as(
        "UPDATE employees SET farm_id = $1, user_id = $2, role = $3, phone = $4,
                address = $5, salary = $6, join_date = $7, status = $8
         WHERE id = $9 AND farm_id IN (SELECT id FROM farms WHERE owner_id = $10)
         RETURNING *",
    )
    .bind(input.farm_id)
    .bind(input.user_id)
    .bind(&input.role)
    .bind(input.phone.trim())
    .bind(input.address.unwrap_or_default())
    .bind(input.salary)
    .bind(input.join_date)
    .bind(input.status.unwrap_or_else(|| "active".to_string()))
    .bind(id)
    .bind(claims.user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(AgribaseError::NotFound)?;

    fetch_response(&state, employee).await.map(Json)
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AgribaseResult<Json<()>> {
    // Vehicles assigned to this employee are unassigned by the FK, not
    // deleted.
    let result = sqlx::query(
        "DELETE FROM employees WHERE id = $1 AND farm_id IN (SELECT id FROM farms WHERE owner_id = $2)",
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
