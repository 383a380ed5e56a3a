use crate::config::Config;
use crate::errors::{AppError, StoreResult};
use crate::events::Event;
use crate::goals::Goal;
use crate::habits::HabitRecord;
use crate::notes::Note;
use crate::pomodoro::{Completion, PomodoroStats, Timer, TimerSettings};
use crate::repository::Repository;
use crate::session::Session;
use crate::storage::{
    Backend, POMODORO_KEY, POMODORO_SETTINGS_KEY, load_document, save_document,
};
use crate::todos::Todo;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Countdown plus the lifetime totals it feeds.
pub struct Pomodoro {
    backend: Arc<dyn Backend>,
    pub timer: Timer,
    pub stats: PomodoroStats,
}

impl Pomodoro {
    pub async fn load(backend: Arc<dyn Backend>) -> Self {
        let stats: PomodoroStats = load_document(backend.as_ref(), POMODORO_KEY)
            .await
            .unwrap_or_default();
        let settings = match load_document::<TimerSettings>(backend.as_ref(), POMODORO_SETTINGS_KEY).await {
            Some(settings) if settings.validate().is_ok() => settings,
            Some(settings) => {
                warn!("ignoring out-of-range pomodoro settings {settings:?}");
                TimerSettings::default()
            }
            None => TimerSettings::default(),
        };
        Self {
            backend,
            timer: Timer::new(settings),
            stats,
        }
    }

    /// Applies new interval lengths to the timer and saves them.
    pub async fn update_settings(&mut self, settings: TimerSettings) -> StoreResult<()> {
        self.timer.set_settings(settings)?;
        info!("pomodoro settings now {settings:?}");
        if let Err(err) = save_document(self.backend.as_ref(), POMODORO_SETTINGS_KEY, &settings).await {
            warn!("failed to persist {POMODORO_SETTINGS_KEY}: {err}");
            return Err(err);
        }
        Ok(())
    }

    /// Adds a finished interval to the totals and saves them.
    pub async fn record(&mut self, completion: Completion, today: NaiveDate) -> StoreResult<()> {
        self.stats.record(completion, today);
        info!("pomodoro {:?} finished ({} min)", completion.mode, completion.minutes);
        if let Err(err) = save_document(self.backend.as_ref(), POMODORO_KEY, &self.stats).await {
            warn!("failed to persist {POMODORO_KEY}: {err}");
            return Err(err);
        }
        Ok(())
    }

    /// Advances the running timer by one second, recording a finished interval.
    pub async fn tick(&mut self, today: NaiveDate) -> StoreResult<()> {
        match self.timer.tick() {
            Some(completion) => self.record(completion, today).await,
            None => Ok(()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub habits: Arc<Mutex<Repository<HabitRecord>>>,
    pub goals: Arc<Mutex<Repository<Goal>>>,
    pub todos: Arc<Mutex<Repository<Todo>>>,
    pub notes: Arc<Mutex<Repository<Note>>>,
    pub events: Arc<Mutex<Repository<Event>>>,
    pub pomodoro: Arc<Mutex<Pomodoro>>,
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    /// Loads every collection from `backend`, seeding the ones that are absent.
    pub async fn load(config: Config, backend: Arc<dyn Backend>, today: NaiveDate) -> Self {
        let habits = Repository::load(Arc::clone(&backend), today).await;
        let goals = Repository::load(Arc::clone(&backend), today).await;
        let todos = Repository::load(Arc::clone(&backend), today).await;
        let notes = Repository::load(Arc::clone(&backend), today).await;
        let events = Repository::load(Arc::clone(&backend), today).await;
        let pomodoro = Pomodoro::load(backend).await;

        Self {
            config: Arc::new(config),
            habits: Arc::new(Mutex::new(habits)),
            goals: Arc::new(Mutex::new(goals)),
            todos: Arc::new(Mutex::new(todos)),
            notes: Arc::new(Mutex::new(notes)),
            events: Arc::new(Mutex::new(events)),
            pomodoro: Arc::new(Mutex::new(pomodoro)),
            session: Arc::new(Mutex::new(Session::default())),
        }
    }

    /// Gate for mutating requests when sign-in is required.
    pub async fn ensure_signed_in(&self) -> Result<(), AppError> {
        if self.config.require_sign_in && !self.session.lock().await.signed_in {
            return Err(AppError::unauthorized("sign in required"));
        }
        Ok(())
    }
}
