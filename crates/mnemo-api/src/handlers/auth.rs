//! Identity handlers: signup, login, federated login.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use mnemo_core::UserProfile;

use crate::error::ApiError;
use crate::state::AppState;

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct SignupBody {
    pub email: String,
    pub password: String,
    pub name: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupBody>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, token) = state
        .identity
        .signup(&body.email, &body.password, &body.name)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            token,
            user: user.profile(),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    /// The account email.
    #[serde(alias = "email")]
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, token) = state.identity.login(&body.username, &body.password).await?;
    Ok(Json(SessionResponse {
        token,
        user: user.profile(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct GoogleLoginBody {
    /// Token issued by the external identity provider.
    pub token: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

pub async fn google_login(
    State(state): State<AppState>,
    Json(body): Json<GoogleLoginBody>,
) -> Result<impl IntoResponse, ApiError> {
    let (user, token) = state
        .identity
        .federated_login(&body.token, &body.email, &body.name, body.picture)
        .await?;
    Ok(Json(SessionResponse {
        token,
        user: user.profile(),
    }))
}
