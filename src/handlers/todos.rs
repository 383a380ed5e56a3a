use super::today;
use crate::errors::AppError;
use crate::models::{RenameTodo, TodoListResponse, TodoQuery};
use crate::state::AppState;
use crate::todos::{Todo, TodoDraft, count_todos, filter_todos};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

/// Todos matching the filter, with counts over the whole list.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TodoQuery>,
) -> Json<TodoListResponse> {
    let todos = state.todos.lock().await;
    Json(TodoListResponse {
        todos: filter_todos(todos.list(), query.filter, today()),
        counts: count_todos(todos.list()),
    })
}

pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<TodoDraft>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    state.ensure_signed_in().await?;
    let todo = Todo::create(draft)?;
    let todo = state.todos.lock().await.insert_first(todo).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn rename(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RenameTodo>,
) -> Result<Json<Todo>, AppError> {
    state.ensure_signed_in().await?;
    let todo = state
        .todos
        .lock()
        .await
        .update(id, |todo| {
            todo.rename(&payload.text)?;
            Ok(todo.clone())
        })
        .await?;
    Ok(Json(todo))
}

pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Todo>, AppError> {
    state.ensure_signed_in().await?;
    let todo = state
        .todos
        .lock()
        .await
        .update(id, |todo| {
            todo.toggle();
            Ok(todo.clone())
        })
        .await?;
    Ok(Json(todo))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Todo>, AppError> {
    state.ensure_signed_in().await?;
    let removed = state.todos.lock().await.remove(id).await?;
    Ok(Json(removed))
}
