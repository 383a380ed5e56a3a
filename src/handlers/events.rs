use super::today;
use crate::errors::AppError;
use crate::events::{Agenda, CalendarOverview, Event, EventDraft, agenda, events_on, overview};
use crate::models::EventQuery;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use uuid::Uuid;

pub async fn list(State(state): State<AppState>, Query(query): Query<EventQuery>) -> Json<Vec<Event>> {
    let events = state.events.lock().await;
    let listed = match query.date {
        Some(date) => events_on(events.list(), date),
        None => events.list().to_vec(),
    };
    Json(listed)
}

pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<EventDraft>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    state.ensure_signed_in().await?;
    let event = Event::create(draft)?;
    let event = state.events.lock().await.insert(event).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<EventDraft>,
) -> Result<Json<Event>, AppError> {
    state.ensure_signed_in().await?;
    let event = state
        .events
        .lock()
        .await
        .update(id, |event| {
            event.apply(draft)?;
            Ok(event.clone())
        })
        .await?;
    Ok(Json(event))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, AppError> {
    state.ensure_signed_in().await?;
    let removed = state.events.lock().await.remove(id).await?;
    Ok(Json(removed))
}

pub async fn day_agenda(State(state): State<AppState>, Path(date): Path<NaiveDate>) -> Json<Agenda> {
    let events = state.events.lock().await;
    let todos = state.todos.lock().await;
    Json(agenda(date, events.list(), todos.list()))
}

pub async fn calendar_overview(State(state): State<AppState>) -> Json<CalendarOverview> {
    let events = state.events.lock().await;
    Json(overview(today(), events.list()))
}
