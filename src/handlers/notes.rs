use super::now;
use crate::errors::AppError;
use crate::notes::{Note, NoteDraft, NoteQuery};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

pub async fn list(State(state): State<AppState>, Query(query): Query<NoteQuery>) -> Json<Vec<Note>> {
    let notes = state.notes.lock().await;
    Json(query.apply(notes.list()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<NoteDraft>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    state.ensure_signed_in().await?;
    let note = Note::create(draft, now())?;
    let note = state.notes.lock().await.insert_first(note).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<NoteDraft>,
) -> Result<Json<Note>, AppError> {
    state.ensure_signed_in().await?;
    let stamp = now();
    let note = state
        .notes
        .lock()
        .await
        .update(id, |note| {
            note.apply(draft, stamp)?;
            Ok(note.clone())
        })
        .await?;
    Ok(Json(note))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Note>, AppError> {
    state.ensure_signed_in().await?;
    let removed = state.notes.lock().await.remove(id).await?;
    Ok(Json(removed))
}
