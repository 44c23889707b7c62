//! In-tree mock backend and the built-in fallback question bank.
//!
//! The hub ships with the mock permanently available so gameplay never
//! depends on a reachable service: session starts succeed from fixture
//! data, and answer verification evaluates against the same fixtures.

use std::time::Duration;

use quiz_trail_core::{AnswerOption, GameId, OptionId, Question, QuestionId, SessionId};

use crate::api::{AnswerReceipt, BackendError, GameBackend, SessionStart};

const MOCK_SESSION_ID: &str = "session-local-001";
const MOCK_GAME_ID: &str = "game-local-001";
const MOCK_TIME_LIMIT_SECS: u64 = 180;

/// Backend implementation serving fixture data without any transport.
#[derive(Debug, Default)]
pub struct MockBackend {
    questions: Vec<Question>,
    ended: Vec<(GameId, i64)>,
}

impl MockBackend {
    /// Creates a mock backend with the standard fixture questions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            questions: mock_questions(),
            ended: Vec::new(),
        }
    }

    /// Reported session endings, oldest first.
    #[must_use]
    pub fn ended_sessions(&self) -> &[(GameId, i64)] {
        &self.ended
    }
}

impl GameBackend for MockBackend {
    fn start_session(&mut self, _game_code: &str) -> Result<SessionStart, BackendError> {
        Ok(SessionStart::new(
            Some(SessionId::new(MOCK_SESSION_ID)),
            Some(GameId::new(MOCK_GAME_ID)),
            self.questions.clone(),
            Some(Duration::from_secs(MOCK_TIME_LIMIT_SECS)),
        ))
    }

    fn submit_answer(
        &mut self,
        _session: &SessionId,
        question: &QuestionId,
        option: &OptionId,
    ) -> Result<AnswerReceipt, BackendError> {
        let question = self
            .questions
            .iter()
            .find(|candidate| candidate.id() == Some(question))
            .ok_or_else(|| BackendError::Rejected {
                message: format!("unknown question {}", question.get()),
            })?;

        let option = question
            .options()
            .iter()
            .find(|candidate| candidate.id() == Some(option))
            .ok_or_else(|| BackendError::Rejected {
                message: format!("unknown option {}", option.get()),
            })?;

        Ok(AnswerReceipt::new(option.is_correct()))
    }

    fn end_session(&mut self, game: &GameId, score: i64) -> Result<(), BackendError> {
        self.ended.push((game.clone(), score));
        Ok(())
    }
}

fn mock_question(
    id: &str,
    content: &str,
    options: [(&str, bool); 4],
) -> Question {
    let options = options
        .iter()
        .enumerate()
        .map(|(index, (text, is_correct))| {
            AnswerOption::new(
                Some(OptionId::new(format!("{id}-o{}", index + 1))),
                *text,
                *is_correct,
            )
        })
        .collect();
    Question::new(Some(QuestionId::new(id)), content, options)
}

fn mock_questions() -> Vec<Question> {
    vec![
        mock_question(
            "q-1",
            "Which word means the opposite of \"fast\"?",
            [("slow", true), ("far", false), ("high", false), ("small", false)],
        ),
        mock_question(
            "q-2",
            "Choose the correct sentence.",
            [
                ("She goes to school every day.", true),
                ("She go to school every day.", false),
                ("She going to school every day.", false),
                ("She gone to school every day.", false),
            ],
        ),
        mock_question(
            "q-3",
            "Which word is a noun?",
            [("river", true), ("run", false), ("quickly", false), ("blue", false)],
        ),
    ]
}

/// Built-in question bank used when no session data is available at all.
///
/// Exists so an empty question set can never reach the state machine: the
/// director injects this bank whenever the backend yields nothing.
#[must_use]
pub fn fallback_question_bank() -> Vec<Question> {
    fn plain(content: &str, options: [(&str, bool); 4]) -> Question {
        let options = options
            .iter()
            .map(|(text, is_correct)| AnswerOption::new(None, *text, *is_correct))
            .collect();
        Question::new(None, content, options)
    }

    vec![
        plain(
            "Which word means \"to jump\"?",
            [("leap", true), ("swim", false), ("crawl", false), ("sleep", false)],
        ),
        plain(
            "Choose the opposite of \"fast\".",
            [("slow", true), ("far", false), ("high", false), ("small", false)],
        ),
        plain(
            "Which word is a noun?",
            [("river", true), ("run", false), ("quickly", false), ("blue", false)],
        ),
        plain(
            "Complete the sentence: She ___ to school every day.",
            [("goes", true), ("go", false), ("going", false), ("gone", false)],
        ),
        plain(
            "Which word is an adjective?",
            [
                ("beautiful", true),
                ("beauty", false),
                ("beautify", false),
                ("beautifully", false),
            ],
        ),
        plain(
            "Which sentence is grammatically correct?",
            [
                ("He is playing football.", true),
                ("He are playing football.", false),
                ("He playing football.", false),
                ("He play football.", false),
            ],
        ),
        plain(
            "Which word is an adverb?",
            [
                ("quickly", true),
                ("quick", false),
                ("quicker", false),
                ("quickness", false),
            ],
        ),
        plain(
            "Complete the sentence: I ___ a book now.",
            [("am reading", true), ("read", false), ("reads", false), ("reading", false)],
        ),
        plain(
            "Which word names a color?",
            [("green", true), ("grow", false), ("grass", false), ("ground", false)],
        ),
        plain(
            "Choose the opposite of \"above\".",
            [("below", true), ("beside", false), ("between", false), ("beyond", false)],
        ),
    ]
}
