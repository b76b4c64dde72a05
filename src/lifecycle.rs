//! Fetch/submit lifecycle state.
//!
//! `AppState` is an immutable record: every transition consumes the current
//! state and returns the next one. Presentation layers only read it through
//! [`AppState::view`].

use crate::model::{AppEvent, Movie};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Pending { title: String },
    Accepted { title: String },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    movies: Vec<Movie>,
    loading: bool,
    error: Option<String>,
    submit: SubmitStatus,
}

/// What the content area shows, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View<'a> {
    Loading,
    Error(&'a str),
    Movies(&'a [Movie]),
    Empty,
}

pub const LOADING_TEXT: &str = "Loading...";
pub const EMPTY_TEXT: &str = "Found no movies.";

impl AppState {
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn submit_status(&self) -> &SubmitStatus {
        &self.submit
    }

    pub fn view(&self) -> View<'_> {
        if self.loading {
            View::Loading
        } else if let Some(err) = self.error.as_deref() {
            View::Error(err)
        } else if !self.movies.is_empty() {
            View::Movies(&self.movies)
        } else {
            View::Empty
        }
    }

    pub fn loading_started(self) -> Self {
        Self {
            loading: true,
            error: None,
            ..self
        }
    }

    /// Replaces the list wholesale.
    pub fn loading_succeeded(self, movies: Vec<Movie>) -> Self {
        Self {
            movies,
            loading: false,
            error: None,
            ..self
        }
    }

    /// Keeps the previously loaded list; the error view takes priority over it.
    pub fn loading_failed(self, message: impl Into<String>) -> Self {
        Self {
            loading: false,
            error: Some(message.into()),
            ..self
        }
    }

    pub fn submit_started(self, title: impl Into<String>) -> Self {
        Self {
            submit: SubmitStatus::Pending {
                title: title.into(),
            },
            ..self
        }
    }

    pub fn submit_succeeded(self, title: impl Into<String>) -> Self {
        Self {
            submit: SubmitStatus::Accepted {
                title: title.into(),
            },
            ..self
        }
    }

    pub fn submit_failed(self, message: impl Into<String>) -> Self {
        Self {
            submit: SubmitStatus::Failed {
                message: message.into(),
            },
            ..self
        }
    }

    /// Fold a controller event into the next state. `Info` events do not touch it.
    pub fn apply(self, ev: &AppEvent) -> Self {
        match ev {
            AppEvent::LoadStarted => self.loading_started(),
            AppEvent::LoadSucceeded { movies } => self.loading_succeeded(movies.clone()),
            AppEvent::LoadFailed { message } => self.loading_failed(message.clone()),
            AppEvent::SubmitStarted { title } => self.submit_started(title.clone()),
            AppEvent::SubmitSucceeded { title } => self.submit_succeeded(title.clone()),
            AppEvent::SubmitFailed { message, .. } => self.submit_failed(message.clone()),
            AppEvent::Info(_) => self,
        }
    }
}

impl SubmitStatus {
    pub fn to_message(&self) -> Option<String> {
        match self {
            SubmitStatus::Idle => None,
            SubmitStatus::Pending { title } => Some(format!("Adding \"{title}\"…")),
            SubmitStatus::Accepted { title } => {
                Some(format!("Added \"{title}\". Fetch movies to see it."))
            }
            SubmitStatus::Failed { message } => Some(message.clone()),
        }
    }
}
