use crate::handlers::{events, goals, habits, notes, pomodoro, session, todos};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/session",
            get(session::get).post(session::sign_in).delete(session::sign_out),
        )
        .route("/api/habits", get(habits::list).post(habits::create))
        .route("/api/habits/stats", get(habits::stats))
        .route("/api/habits/reset-today", post(habits::reset_today))
        .route("/api/habits/:id", put(habits::update))
        .route("/api/habits/:id/toggle", post(habits::toggle))
        .route("/api/habits/:id/delete-request", post(habits::delete_request))
        .route(
            "/api/habits/deletions/:token",
            post(habits::delete_confirm).delete(habits::delete_cancel),
        )
        .route("/api/goals", get(goals::list).post(goals::create))
        .route("/api/goals/:id", put(goals::update))
        .route(
            "/api/goals/:id/milestones/:milestone_id/toggle",
            post(goals::toggle_milestone),
        )
        .route("/api/goals/:id/delete-request", post(goals::delete_request))
        .route(
            "/api/goals/deletions/:token",
            post(goals::delete_confirm).delete(goals::delete_cancel),
        )
        .route("/api/todos", get(todos::list).post(todos::create))
        .route("/api/todos/:id", put(todos::rename).delete(todos::delete))
        .route("/api/todos/:id/toggle", post(todos::toggle))
        .route("/api/notes", get(notes::list).post(notes::create))
        .route("/api/notes/:id", put(notes::update).delete(notes::delete))
        .route("/api/events", get(events::list).post(events::create))
        .route("/api/events/overview", get(events::calendar_overview))
        .route("/api/events/:id", put(events::update).delete(events::delete))
        .route("/api/agenda/:date", get(events::day_agenda))
        .route("/api/pomodoro", get(pomodoro::get))
        .route("/api/pomodoro/toggle", post(pomodoro::toggle))
        .route("/api/pomodoro/reset", post(pomodoro::reset))
        .route("/api/pomodoro/mode", post(pomodoro::switch_mode))
        .route("/api/pomodoro/complete", post(pomodoro::complete))
        .route("/api/pomodoro/settings", put(pomodoro::update_settings))
        .with_state(state)
}
