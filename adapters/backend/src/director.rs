//! Orchestration between the session state machine and a scoring backend.
//!
//! The director owns the authoritative [`Session`] and drives every remote
//! interaction around it: session start with fallback to the built-in
//! bank, remote-first answer verification with local fallback, and the
//! fire-and-forget end-of-run report. A backend failure is never allowed
//! to interrupt play; it is logged and the local path takes over.

use std::time::Duration;

use quiz_trail_core::{Command, Event, GameConfig, GameId, OptionId, Question, QuestionId, SessionId};
use quiz_trail_session::{apply, query, Session};
use thiserror::Error;

use crate::api::{BackendError, GameBackend};
use crate::mock::fallback_question_bank;

/// Fatal problems preventing a run from starting at all.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The backend yielded no questions and the fallback bank is empty.
    #[error("no questions available: the backend returned none and the fallback bank is empty")]
    NoQuestions,
    /// The configured rules declare a progress cap of zero.
    #[error("game rules declare a zero progress cap")]
    ZeroProgressCap,
}

/// Drives one game mode: session state plus its backend collaborator.
#[derive(Debug)]
pub struct GameDirector<B: GameBackend> {
    backend: B,
    config: GameConfig,
    session: Session,
    fallback: Vec<Question>,
    session_id: Option<SessionId>,
    game_id: Option<GameId>,
    report_sent: bool,
}

impl<B: GameBackend> GameDirector<B> {
    /// Creates a director with the built-in fallback question bank.
    #[must_use]
    pub fn new(backend: B, config: GameConfig) -> Self {
        Self::with_fallback_bank(backend, config, fallback_question_bank())
    }

    /// Creates a director with a caller-supplied fallback bank.
    #[must_use]
    pub fn with_fallback_bank(backend: B, config: GameConfig, fallback: Vec<Question>) -> Self {
        Self {
            backend,
            config,
            session: Session::new(),
            fallback,
            session_id: None,
            game_id: None,
            report_sent: false,
        }
    }

    /// Read-only access to the authoritative session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Configuration the director was constructed with.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only access to the backend collaborator.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Starts a run, preferring backend data and falling back locally.
    ///
    /// Any backend failure is logged and replaced by the fallback bank with
    /// no remote session identity; gameplay proceeds either way.
    pub fn start_run(&mut self) -> Result<Vec<Event>, ConfigurationError> {
        if self.config.rules().progress_cap() == 0 {
            return Err(ConfigurationError::ZeroProgressCap);
        }

        let start = match self.backend.start_session(self.config.code()) {
            Ok(start) => Some(start),
            Err(error) => {
                log::warn!(
                    "session start failed for {}; playing offline: {error}",
                    self.config.code()
                );
                None
            }
        };

        let mut time_limit = self.config.time_limit();
        let mut questions = Vec::new();

        if let Some(start) = start {
            self.session_id = start.session_id().cloned();
            self.game_id = start.game_id().cloned();
            if let Some(limit) = start.time_limit() {
                time_limit = limit;
            }
            questions = start.into_questions();
        } else {
            self.session_id = None;
            self.game_id = None;
        }

        if questions.is_empty() {
            questions = self.fallback.clone();
        }

        if questions.is_empty() {
            return Err(ConfigurationError::NoQuestions);
        }

        report_unmarked_questions(&questions);

        self.report_sent = false;
        let mut events = Vec::new();
        apply(
            &mut self.session,
            Command::Start {
                questions,
                rules: self.config.rules(),
                time_limit,
            },
            &mut events,
        );
        Ok(events)
    }

    /// Submits an answer, consulting the backend before local evaluation.
    ///
    /// The remote check only happens when the session and the current
    /// question carry backend identifiers; any failure falls back to the
    /// local verdict without interrupting play.
    pub fn submit_answer(&mut self, selected: usize) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            &mut self.session,
            Command::SubmitAnswer { selected },
            &mut events,
        );

        let Some(token) = events.iter().find_map(|event| match event {
            Event::AnswerPending { token, .. } => Some(*token),
            _ => None,
        }) else {
            return events;
        };

        let remote = self.remote_verdict(selected);
        apply(
            &mut self.session,
            Command::ResolveAnswer { token, remote },
            &mut events,
        );

        self.report_terminal(&events);
        events
    }

    /// Advances the run clock.
    pub fn tick(&mut self, dt: Duration) -> Vec<Event> {
        let mut events = Vec::new();
        apply(&mut self.session, Command::Tick { dt }, &mut events);
        self.report_terminal(&events);
        events
    }

    fn remote_verdict(&mut self, selected: usize) -> Option<bool> {
        let session_id = self.session_id.clone()?;
        let (question_id, option_id) = self.remote_identifiers(selected)?;

        match self
            .backend
            .submit_answer(&session_id, &question_id, &option_id)
        {
            Ok(receipt) => Some(receipt.is_correct()),
            Err(error) => {
                log_remote_failure(&error);
                None
            }
        }
    }

    fn remote_identifiers(&self, selected: usize) -> Option<(QuestionId, OptionId)> {
        let question = query::current_question(&self.session)?;
        let question_id = question.id()?.clone();
        let option_id = question.options().get(selected)?.id()?.clone();
        Some((question_id, option_id))
    }

    fn report_terminal(&mut self, events: &[Event]) {
        if self.report_sent {
            return;
        }

        let report = events.iter().find_map(|event| match event {
            Event::RunCompleted { report } | Event::RunTimedOut { report } => Some(*report),
            _ => None,
        });

        let Some(report) = report else {
            return;
        };

        self.report_sent = true;
        let Some(game_id) = self.game_id.clone() else {
            return;
        };

        if let Err(error) = self.backend.end_session(&game_id, report.score()) {
            log::warn!("end-of-run report failed and was dropped: {error}");
        }
    }
}

fn report_unmarked_questions(questions: &[Question]) {
    for (index, question) in questions.iter().enumerate() {
        if question.correct_option_index().is_none() {
            log::warn!(
                "question {index} has no option marked correct; option 0 will be treated as correct"
            );
        }
    }
}

fn log_remote_failure(error: &BackendError) {
    log::warn!("remote answer check failed, evaluating locally: {error}");
}
