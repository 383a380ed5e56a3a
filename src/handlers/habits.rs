use super::{cancel_delete, confirm_delete, now, request_delete, today};
use crate::errors::AppError;
use crate::habits::{HabitDraft, HabitRecord};
use crate::models::TokenResponse;
use crate::state::AppState;
use crate::stats::{HabitCard, HabitSummary, build_summary_at, habit_card};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

pub async fn list(State(state): State<AppState>) -> Json<Vec<HabitCard>> {
    let date = today();
    let mut habits = state.habits.lock().await;
    habits.refresh(date);
    Json(habits.list().iter().map(|habit| habit_card(date, habit)).collect())
}

pub async fn stats(State(state): State<AppState>) -> Json<HabitSummary> {
    let date = today();
    let mut habits = state.habits.lock().await;
    habits.refresh(date);
    Json(build_summary_at(date, habits.list()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<HabitDraft>,
) -> Result<(StatusCode, Json<HabitCard>), AppError> {
    state.ensure_signed_in().await?;
    let habit = HabitRecord::create(draft, now())?;
    let habit = state.habits.lock().await.insert(habit).await?;
    Ok((StatusCode::CREATED, Json(habit_card(today(), &habit))))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<HabitDraft>,
) -> Result<Json<HabitCard>, AppError> {
    state.ensure_signed_in().await?;
    let stamp = now();
    let habit = state
        .habits
        .lock()
        .await
        .update(id, |habit| {
            habit.apply(draft, stamp)?;
            Ok(habit.clone())
        })
        .await?;
    Ok(Json(habit_card(today(), &habit)))
}

pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HabitCard>, AppError> {
    state.ensure_signed_in().await?;
    let date = today();
    let habit = state.habits.lock().await.toggle_today(id, date, now()).await?;
    Ok(Json(habit_card(date, &habit)))
}

pub async fn reset_today(State(state): State<AppState>) -> Result<Json<Vec<HabitCard>>, AppError> {
    state.ensure_signed_in().await?;
    let date = today();
    let mut habits = state.habits.lock().await;
    habits.reset_day(date, now()).await?;
    Ok(Json(habits.list().iter().map(|habit| habit_card(date, habit)).collect()))
}

pub async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TokenResponse>, AppError> {
    state.ensure_signed_in().await?;
    request_delete(&state.habits, id).await
}

pub async fn delete_confirm(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<Json<HabitRecord>, AppError> {
    state.ensure_signed_in().await?;
    confirm_delete(&state.habits, token).await
}

pub async fn delete_cancel(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    cancel_delete(&state.habits, token).await
}
