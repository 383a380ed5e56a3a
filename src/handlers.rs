pub mod events;
pub mod goals;
pub mod habits;
pub mod notes;
pub mod pomodoro;
pub mod session;
pub mod todos;

use crate::errors::AppError;
use crate::models::TokenResponse;
use crate::repository::{DeleteToken, Record, Repository};
use axum::{Json, http::StatusCode};
use chrono::{DateTime, Local, NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// The server's local calendar date.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

async fn request_delete<T: Record>(
    repo: &Mutex<Repository<T>>,
    id: Uuid,
) -> Result<Json<TokenResponse>, AppError> {
    let token = repo.lock().await.request_delete(id)?;
    info!("delete of {} record {id} awaiting confirmation", T::KEY);
    Ok(Json(TokenResponse { token }))
}

async fn confirm_delete<T: Record>(
    repo: &Mutex<Repository<T>>,
    token: Uuid,
) -> Result<Json<T>, AppError> {
    let removed = repo.lock().await.confirm_delete(DeleteToken(token)).await?;
    Ok(Json(removed))
}

async fn cancel_delete<T: Record>(
    repo: &Mutex<Repository<T>>,
    token: Uuid,
) -> Result<StatusCode, AppError> {
    if repo.lock().await.cancel_delete(DeleteToken(token)) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("unknown confirmation token: {token}")))
    }
}
