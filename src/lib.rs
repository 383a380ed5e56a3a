pub mod app;
pub mod config;
pub mod errors;
pub mod events;
pub mod goals;
pub mod habits;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod notes;
pub mod pomodoro;
pub mod repository;
pub mod session;
pub mod state;
pub mod stats;
pub mod storage;
pub mod todos;

pub use app::router;
pub use config::Config;
pub use errors::{AppError, StoreError, StoreResult};
pub use repository::{DeleteToken, Record, Repository};
pub use state::AppState;
pub use storage::{Backend, FileBackend, MemoryBackend};
