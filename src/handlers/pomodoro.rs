use super::today;
use crate::errors::AppError;
use crate::models::{ModeRequest, PomodoroResponse};
use crate::pomodoro::{Completion, TimerSettings};
use crate::state::{AppState, Pomodoro};
use axum::{Json, extract::State};

fn snapshot(pomodoro: &Pomodoro) -> PomodoroResponse {
    PomodoroResponse {
        timer: pomodoro.timer.clone(),
        progress: pomodoro.timer.progress(),
        stats: pomodoro.stats.clone(),
    }
}

pub async fn get(State(state): State<AppState>) -> Json<PomodoroResponse> {
    Json(snapshot(&*state.pomodoro.lock().await))
}

pub async fn toggle(State(state): State<AppState>) -> Result<Json<PomodoroResponse>, AppError> {
    state.ensure_signed_in().await?;
    let mut pomodoro = state.pomodoro.lock().await;
    pomodoro.timer.toggle();
    Ok(Json(snapshot(&pomodoro)))
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<PomodoroResponse>, AppError> {
    state.ensure_signed_in().await?;
    let mut pomodoro = state.pomodoro.lock().await;
    pomodoro.timer.reset();
    Ok(Json(snapshot(&pomodoro)))
}

pub async fn switch_mode(
    State(state): State<AppState>,
    Json(payload): Json<ModeRequest>,
) -> Result<Json<PomodoroResponse>, AppError> {
    state.ensure_signed_in().await?;
    let mut pomodoro = state.pomodoro.lock().await;
    pomodoro.timer.switch_mode(payload.mode);
    Ok(Json(snapshot(&pomodoro)))
}

/// Records an interval finished by a client-side timer.
pub async fn complete(
    State(state): State<AppState>,
    Json(completion): Json<Completion>,
) -> Result<Json<PomodoroResponse>, AppError> {
    state.ensure_signed_in().await?;
    let mut pomodoro = state.pomodoro.lock().await;
    pomodoro.record(completion, today()).await?;
    Ok(Json(snapshot(&pomodoro)))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<TimerSettings>,
) -> Result<Json<PomodoroResponse>, AppError> {
    state.ensure_signed_in().await?;
    let mut pomodoro = state.pomodoro.lock().await;
    pomodoro.update_settings(settings).await?;
    Ok(Json(snapshot(&pomodoro)))
}
