use crate::db::{User, UserDetails};
use crate::error::{AgribaseError, AgribaseResult, FieldErrors};
use crate::middleware::auth::issue_token;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDetails,
}

impl RegisterInput {
    pub fn validate(&self) -> AgribaseResult<()> {
        let mut errors = FieldErrors::default();
        if self.username.trim().is_empty() {
            errors.push("username", "must not be blank");
        }
        if self.password.len() < 8 {
            errors.push("password", "must be at least 8 characters");
        }
        if let Some(email) = &self.email {
            if !email.is_empty() && !email.contains('@') {
                errors.push("email", "must be a valid email address");
            }
        }
        errors.into_result()
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AgribaseResult<Json<AuthResponse>> {
    input.validate()?;

    let hash = bcrypt::hash(&input.password, bcrypt::DEFAULT_COST)?;

    // Duplicate usernames surface as a 23505 on users_username_key and come
    // back to the caller as a per-field validation error.
    let user: UserDetails = sqlx::query_as(
        "INSERT INTO users (username, email, first_name, last_name, password_hash)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, username, email, first_name, last_name",
    )
    .bind(input.username.trim())
    .bind(input.email.unwrap_or_default())
    .bind(input.first_name.unwrap_or_default())
    .bind(input.last_name.unwrap_or_default())
    .bind(hash)
    .fetch_one(&state.pool)
    .await?;

    let token = issue_token(user.id, &user.username)?;
    Ok(Json(AuthResponse { token, user }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AgribaseResult<Json<AuthResponse>> {
    if input.username.trim().is_empty() || input.password.is_empty() {
        return Err(AgribaseError::Auth(
            "username and password are required".into(),
        ));
    }

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(input.username.trim())
        .fetch_optional(&state.pool)
        .await?;

    // Same message whether the user is missing or the password is wrong.
    let user = user.ok_or_else(|| AgribaseError::Auth("invalid username or password".into()))?;

    if !bcrypt::verify(&input.password, &user.password_hash)? {
        return Err(AgribaseError::Auth("invalid username or password".into()));
    }

    let token = issue_token(user.id, &user.username)?;
    Ok(Json(AuthResponse {
        token,
        user: UserDetails {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        },
    }))
}
