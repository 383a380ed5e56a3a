use crate::errors::AppError;
use crate::models::SignInRequest;
use crate::session::Session;
use crate::state::AppState;
use axum::{Json, extract::State};
use tracing::info;

pub async fn get(State(state): State<AppState>) -> Json<Session> {
    Json(state.session.lock().await.clone())
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<Session>, AppError> {
    let mut session = state.session.lock().await;
    session.sign_in(&payload.display_name)?;
    info!("signed in as {}", payload.display_name.trim());
    Ok(Json(session.clone()))
}

pub async fn sign_out(State(state): State<AppState>) -> Json<Session> {
    let mut session = state.session.lock().await;
    session.sign_out();
    info!("signed out");
    Json(session.clone())
}
