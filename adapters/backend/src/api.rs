//! Wire contracts spoken by the remote scoring service.
//!
//! Payload shapes mirror the service's JSON: every response arrives inside
//! an envelope carrying a `success` flag, and field names use snake_case
//! (`is_correct`, `time_limit`). Only the load-bearing subset of each
//! payload is modeled; unknown fields are ignored.

use std::time::Duration;

use quiz_trail_core::{
    AnswerOption, GameId, OptionId, Question, QuestionId, SessionId,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

/// Failures a backend transport can surface.
///
/// Every variant is recoverable from the player's point of view: callers
/// log the failure and fall back to local behavior.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never produced a response.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The service answered with a non-success HTTP status.
    #[error("unexpected HTTP status {status}")]
    Status {
        /// Status code carried by the response.
        status: u16,
    },
    /// The response body could not be parsed.
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The service answered but flagged the request as failed.
    #[error("backend rejected the request: {message}")]
    Rejected {
        /// Message supplied by the service, when one was present.
        message: String,
    },
}

/// Response envelope wrapping every payload the service returns.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ApiEnvelope<T> {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

/// Parses a raw response body, unwrapping the success envelope.
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, BackendError> {
    let envelope: ApiEnvelope<T> = serde_json::from_str(body)?;
    if !envelope.success {
        return Err(BackendError::Rejected {
            message: envelope
                .message
                .unwrap_or_else(|| "no message supplied".to_owned()),
        });
    }

    envelope.data.ok_or_else(|| BackendError::Rejected {
        message: "success response carried no data".to_owned(),
    })
}

/// Answer option as it appears on the wire.
#[derive(Debug, Deserialize)]
pub struct WireOption {
    /// Backend identifier of the option.
    #[serde(default)]
    pub id: Option<String>,
    /// Display text of the option.
    pub text: String,
    /// Whether the option is marked correct in the authored data.
    pub is_correct: bool,
}

/// Question body as it appears on the wire.
#[derive(Debug, Deserialize)]
pub struct WireQuestionBody {
    /// Prompt text of the question.
    pub content: String,
    /// Answer options in presentation order.
    pub options: Vec<WireOption>,
}

/// Session question as it appears on the wire.
#[derive(Debug, Deserialize)]
pub struct WireQuestion {
    /// Identifier tying the question to the running session.
    #[serde(default)]
    pub session_question_id: Option<String>,
    /// The question payload itself.
    pub question: WireQuestionBody,
}

impl WireQuestion {
    /// Converts the wire shape into the core question type.
    #[must_use]
    pub fn into_question(self) -> Question {
        let options = self
            .question
            .options
            .into_iter()
            .map(|option| AnswerOption::new(option.id.map(OptionId::new), option.text, option.is_correct))
            .collect();
        Question::new(
            self.session_question_id.map(QuestionId::new),
            self.question.content,
            options,
        )
    }
}

/// Game metadata attached to a session start response.
#[derive(Debug, Deserialize)]
pub struct WireGameMeta {
    /// Time limit of the game in seconds.
    pub time_limit: u64,
}

/// Session start payload as it appears on the wire.
#[derive(Debug, Deserialize)]
pub struct WireSessionStart {
    /// Identifier of the created session.
    pub id: String,
    /// Identifier of the game definition the session runs.
    pub game_id: String,
    /// Questions resolved for the session.
    #[serde(default)]
    pub questions: Vec<WireQuestion>,
    /// Game metadata, including the time limit.
    pub game: WireGameMeta,
}

impl WireSessionStart {
    /// Converts the wire shape into the domain start description.
    #[must_use]
    pub fn into_session_start(self) -> SessionStart {
        let time_limit = Duration::from_secs(self.game.time_limit);
        SessionStart::new(
            Some(SessionId::new(self.id)),
            Some(GameId::new(self.game_id)),
            self.questions
                .into_iter()
                .map(WireQuestion::into_question)
                .collect(),
            Some(time_limit),
        )
    }
}

/// Answer verdict payload as it appears on the wire.
#[derive(Debug, Deserialize)]
pub struct WireAnswerReceipt {
    /// Whether the submitted option was correct.
    pub is_correct: bool,
    /// Whether the service considers the session finished.
    #[serde(default)]
    pub is_end_game: bool,
}

/// Everything a backend returns when a session starts.
#[derive(Clone, Debug)]
pub struct SessionStart {
    session_id: Option<SessionId>,
    game_id: Option<GameId>,
    questions: Vec<Question>,
    time_limit: Option<Duration>,
}

impl SessionStart {
    /// Creates a new session start description.
    #[must_use]
    pub fn new(
        session_id: Option<SessionId>,
        game_id: Option<GameId>,
        questions: Vec<Question>,
        time_limit: Option<Duration>,
    ) -> Self {
        Self {
            session_id,
            game_id,
            questions,
            time_limit,
        }
    }

    /// Identifier of the remote session, when one was created.
    #[must_use]
    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// Identifier of the remote game definition, when one was reported.
    #[must_use]
    pub fn game_id(&self) -> Option<&GameId> {
        self.game_id.as_ref()
    }

    /// Questions resolved for the session.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Consumes the description, yielding its question list.
    #[must_use]
    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }

    /// Time limit granted by the backend, when one was reported.
    #[must_use]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }
}

/// Verdict returned for one submitted answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerReceipt {
    is_correct: bool,
}

impl AnswerReceipt {
    /// Creates a new receipt.
    #[must_use]
    pub const fn new(is_correct: bool) -> Self {
        Self { is_correct }
    }

    /// Whether the submitted option was correct.
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        self.is_correct
    }
}

/// Transport-agnostic contract every scoring backend implements.
pub trait GameBackend {
    /// Creates a session for the provided game code.
    fn start_session(&mut self, game_code: &str) -> Result<SessionStart, BackendError>;

    /// Submits an answer for remote verification.
    fn submit_answer(
        &mut self,
        session: &SessionId,
        question: &QuestionId,
        option: &OptionId,
    ) -> Result<AnswerReceipt, BackendError>;

    /// Reports the final score of a finished run. Fire-and-forget.
    fn end_session(&mut self, game: &GameId, score: i64) -> Result<(), BackendError>;
}
