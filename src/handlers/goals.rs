use super::{cancel_delete, confirm_delete, now, request_delete, today};
use crate::errors::AppError;
use crate::goals::{Goal, GoalDraft};
use crate::models::{GoalView, TokenResponse};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

pub async fn list(State(state): State<AppState>) -> Json<Vec<GoalView>> {
    let date = today();
    let mut goals = state.goals.lock().await;
    goals.refresh(date);
    Json(
        goals
            .list()
            .iter()
            .cloned()
            .map(|goal| GoalView::new(goal, date))
            .collect(),
    )
}

pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<GoalDraft>,
) -> Result<(StatusCode, Json<GoalView>), AppError> {
    state.ensure_signed_in().await?;
    let date = today();
    let goal = Goal::create(draft, date, now())?;
    let goal = state.goals.lock().await.insert(goal).await?;
    Ok((StatusCode::CREATED, Json(GoalView::new(goal, date))))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<GoalDraft>,
) -> Result<Json<GoalView>, AppError> {
    state.ensure_signed_in().await?;
    let (date, stamp) = (today(), now());
    let goal = state
        .goals
        .lock()
        .await
        .update(id, |goal| {
            goal.apply(draft, date, stamp)?;
            Ok(goal.clone())
        })
        .await?;
    Ok(Json(GoalView::new(goal, date)))
}

pub async fn toggle_milestone(
    State(state): State<AppState>,
    Path((id, milestone_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<GoalView>, AppError> {
    state.ensure_signed_in().await?;
    let date = today();
    let goal = state
        .goals
        .lock()
        .await
        .toggle_milestone(id, milestone_id, date, now())
        .await?;
    Ok(Json(GoalView::new(goal, date)))
}

pub async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TokenResponse>, AppError> {
    state.ensure_signed_in().await?;
    request_delete(&state.goals, id).await
}

pub async fn delete_confirm(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<Json<Goal>, AppError> {
    state.ensure_signed_in().await?;
    confirm_delete(&state.goals, token).await
}

pub async fn delete_cancel(
    State(state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    cancel_delete(&state.goals, token).await
}
