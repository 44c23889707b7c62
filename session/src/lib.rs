#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative quiz-run state management for Quiz Trail.
//!
//! The session is mutated exclusively through [`apply`], which executes one
//! [`Command`] and broadcasts the resulting [`Event`] values. Read access
//! goes through the [`query`] module. Terminal states reject every further
//! effect, and answer submissions are serialized by an explicit in-flight
//! lock instead of ad hoc boolean flags.

use std::collections::HashSet;
use std::time::Duration;

use quiz_trail_core::{
    AnswerRejection, AnswerToken, Command, Event, GameRules, Question, QuestionId, RunReport,
    SessionStatus, StartRejection, VerdictSource, WrongAnswerPolicy,
};

/// Represents the authoritative state of one quiz run.
#[derive(Debug)]
pub struct Session {
    status: SessionStatus,
    questions: Vec<Question>,
    rules: GameRules,
    progress: u32,
    score: i64,
    total_time: Duration,
    remaining_time: Duration,
    next_token: u64,
    pending: Option<PendingAnswer>,
    answered: HashSet<QuestionId>,
}

#[derive(Clone, Debug)]
struct PendingAnswer {
    token: AnswerToken,
    question_index: usize,
    selected: usize,
}

impl Session {
    /// Creates a new idle session awaiting a `Start` command.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Idle,
            questions: Vec::new(),
            rules: GameRules::new(0, 0, WrongAnswerPolicy::DeductPoints { points: 0 }),
            progress: 0,
            score: 0,
            total_time: Duration::ZERO,
            remaining_time: Duration::ZERO,
            next_token: 0,
            pending: None,
            answered: HashSet::new(),
        }
    }

    fn start(
        &mut self,
        questions: Vec<Question>,
        rules: GameRules,
        time_limit: Duration,
        out_events: &mut Vec<Event>,
    ) {
        if questions.is_empty() {
            out_events.push(Event::StartRejected {
                reason: StartRejection::EmptyQuestionBank,
            });
            return;
        }

        if rules.progress_cap() == 0 {
            out_events.push(Event::StartRejected {
                reason: StartRejection::ZeroProgressCap,
            });
            return;
        }

        self.status = SessionStatus::Playing;
        self.questions = questions;
        self.rules = rules;
        self.progress = 0;
        self.score = 0;
        self.total_time = time_limit;
        self.remaining_time = time_limit;
        self.pending = None;
        self.answered.clear();

        out_events.push(Event::RunStarted {
            question_count: self.questions.len(),
            time_limit,
        });
    }

    fn submit_answer(&mut self, selected: usize, out_events: &mut Vec<Event>) {
        if self.status != SessionStatus::Playing {
            out_events.push(Event::AnswerRejected {
                reason: AnswerRejection::NotPlaying,
            });
            return;
        }

        if self.pending.is_some() {
            out_events.push(Event::AnswerRejected {
                reason: AnswerRejection::SubmissionInFlight,
            });
            return;
        }

        let token = AnswerToken::new(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        let question_index = self.current_question_index();

        self.pending = Some(PendingAnswer {
            token,
            question_index,
            selected,
        });

        out_events.push(Event::AnswerPending {
            token,
            question_index,
            selected,
        });
    }

    fn resolve_answer(
        &mut self,
        token: AnswerToken,
        remote: Option<bool>,
        out_events: &mut Vec<Event>,
    ) {
        if self.status != SessionStatus::Playing {
            out_events.push(Event::StaleVerdictDiscarded { token });
            return;
        }

        let Some(pending) = self.pending.clone() else {
            out_events.push(Event::StaleVerdictDiscarded { token });
            return;
        };

        if pending.token != token {
            out_events.push(Event::StaleVerdictDiscarded { token });
            return;
        }

        self.pending = None;

        let question = &self.questions[pending.question_index];
        let (correct, source) = match remote {
            Some(verdict) => (verdict, VerdictSource::Remote),
            None => (
                pending.selected == question.effective_correct_index(),
                VerdictSource::Local,
            ),
        };

        if let Some(id) = question.id() {
            let _ = self.answered.insert(id.clone());
        }

        out_events.push(Event::AnswerJudged {
            token,
            question_index: pending.question_index,
            selected: pending.selected,
            correct,
            source,
        });

        if correct {
            self.apply_correct(out_events);
        } else {
            self.apply_wrong(out_events);
        }
    }

    fn apply_correct(&mut self, out_events: &mut Vec<Event>) {
        self.progress = self.progress.saturating_add(1).min(self.rules.progress_cap());
        self.score = self.score.saturating_add(self.rules.correct_points());

        out_events.push(Event::ProgressAdvanced {
            progress: self.progress,
        });
        out_events.push(Event::ScoreChanged { score: self.score });

        if self.progress >= self.rules.progress_cap() {
            self.status = SessionStatus::Completed;
            out_events.push(Event::RunCompleted {
                report: self.report(),
            });
        }
    }

    fn apply_wrong(&mut self, out_events: &mut Vec<Event>) {
        match self.rules.wrong_answer() {
            WrongAnswerPolicy::DeductPoints { points } => {
                self.score = self.score.saturating_sub(points);
                out_events.push(Event::ScoreChanged { score: self.score });
            }
            WrongAnswerPolicy::ResetProgress { time_penalty } => {
                self.progress = 0;
                self.score = 0;
                self.remaining_time = self.remaining_time.saturating_sub(time_penalty);

                out_events.push(Event::ProgressReset { time_penalty });
                out_events.push(Event::ScoreChanged { score: self.score });

                if self.remaining_time.is_zero() {
                    self.time_out(out_events);
                }
            }
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.status != SessionStatus::Playing {
            return;
        }

        self.remaining_time = self.remaining_time.saturating_sub(dt);
        out_events.push(Event::TimeAdvanced {
            remaining: self.remaining_time,
        });

        if self.remaining_time.is_zero() {
            self.time_out(out_events);
        }
    }

    fn time_out(&mut self, out_events: &mut Vec<Event>) {
        self.status = SessionStatus::TimedOut;
        self.pending = None;
        out_events.push(Event::RunTimedOut {
            report: self.report(),
        });
    }

    fn report(&self) -> RunReport {
        RunReport::new(self.score, self.total_time.saturating_sub(self.remaining_time))
    }

    fn current_question_index(&self) -> usize {
        if self.questions.is_empty() {
            return 0;
        }
        self.progress as usize % self.questions.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the session, mutating state deterministically.
pub fn apply(session: &mut Session, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Start {
            questions,
            rules,
            time_limit,
        } => session.start(questions, rules, time_limit, out_events),
        Command::SubmitAnswer { selected } => session.submit_answer(selected, out_events),
        Command::ResolveAnswer { token, remote } => {
            session.resolve_answer(token, remote, out_events);
        }
        Command::Tick { dt } => session.tick(dt, out_events),
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use std::collections::HashSet;
    use std::time::Duration;

    use quiz_trail_core::{AnswerPhase, Question, QuestionId, RunReport, SessionStatus};

    use super::Session;

    /// Current lifecycle status of the run.
    #[must_use]
    pub fn status(session: &Session) -> SessionStatus {
        session.status
    }

    /// Score accumulated so far.
    #[must_use]
    pub fn score(session: &Session) -> i64 {
        session.score
    }

    /// Logical progress counter driving the physical course.
    #[must_use]
    pub fn progress(session: &Session) -> u32 {
        session.progress
    }

    /// Time remaining before the run times out.
    #[must_use]
    pub fn remaining_time(session: &Session) -> Duration {
        session.remaining_time
    }

    /// Total time budget granted at start.
    #[must_use]
    pub fn total_time(session: &Session) -> Duration {
        session.total_time
    }

    /// Number of questions in the pool.
    #[must_use]
    pub fn question_count(session: &Session) -> usize {
        session.questions.len()
    }

    /// Question the player must answer next.
    ///
    /// The pool wraps, so progression can exceed the pool size; the same
    /// questions then repeat. Returns `None` before the first start.
    #[must_use]
    pub fn current_question(session: &Session) -> Option<&Question> {
        if session.questions.is_empty() {
            return None;
        }
        session.questions.get(session.current_question_index())
    }

    /// Submission lock state of the session.
    #[must_use]
    pub fn answer_phase(session: &Session) -> AnswerPhase {
        match &session.pending {
            Some(pending) => AnswerPhase::Submitting {
                token: pending.token,
            },
            None => AnswerPhase::Ready,
        }
    }

    /// Identifiers of questions that received a verdict during this run.
    #[must_use]
    pub fn answered_questions(session: &Session) -> &HashSet<QuestionId> {
        &session.answered
    }

    /// Snapshot of the run accounting at this moment.
    #[must_use]
    pub fn run_report(session: &Session) -> RunReport {
        session.report()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_trail_core::{AnswerOption, AnswerPhase};

    fn bank() -> Vec<Question> {
        vec![Question::new(
            None,
            "pick b",
            vec![
                AnswerOption::new(None, "a", false),
                AnswerOption::new(None, "b", true),
            ],
        )]
    }

    fn rules() -> GameRules {
        GameRules::new(3, 1, WrongAnswerPolicy::DeductPoints { points: 1 })
    }

    #[test]
    fn start_rejects_empty_bank() {
        let mut session = Session::new();
        let mut events = Vec::new();
        apply(
            &mut session,
            Command::Start {
                questions: Vec::new(),
                rules: rules(),
                time_limit: Duration::from_secs(60),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::StartRejected {
                reason: StartRejection::EmptyQuestionBank,
            }]
        );
        assert_eq!(query::status(&session), SessionStatus::Idle);
    }

    #[test]
    fn start_rejects_zero_progress_cap() {
        let mut session = Session::new();
        let mut events = Vec::new();
        apply(
            &mut session,
            Command::Start {
                questions: bank(),
                rules: GameRules::new(0, 1, WrongAnswerPolicy::DeductPoints { points: 1 }),
                time_limit: Duration::from_secs(60),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::StartRejected {
                reason: StartRejection::ZeroProgressCap,
            }]
        );
    }

    #[test]
    fn submission_lock_rejects_reentrant_submit() {
        let mut session = Session::new();
        let mut events = Vec::new();
        apply(
            &mut session,
            Command::Start {
                questions: bank(),
                rules: rules(),
                time_limit: Duration::from_secs(60),
            },
            &mut events,
        );

        events.clear();
        apply(&mut session, Command::SubmitAnswer { selected: 1 }, &mut events);
        apply(&mut session, Command::SubmitAnswer { selected: 0 }, &mut events);

        assert!(matches!(events[0], Event::AnswerPending { .. }));
        assert_eq!(
            events[1],
            Event::AnswerRejected {
                reason: AnswerRejection::SubmissionInFlight,
            }
        );
    }

    #[test]
    fn stale_token_is_discarded() {
        let mut session = Session::new();
        let mut events = Vec::new();
        apply(
            &mut session,
            Command::Start {
                questions: bank(),
                rules: rules(),
                time_limit: Duration::from_secs(60),
            },
            &mut events,
        );
        apply(&mut session, Command::SubmitAnswer { selected: 1 }, &mut events);

        events.clear();
        let wrong_token = AnswerToken::new(99);
        apply(
            &mut session,
            Command::ResolveAnswer {
                token: wrong_token,
                remote: None,
            },
            &mut events,
        );

        assert_eq!(events, vec![Event::StaleVerdictDiscarded { token: wrong_token }]);
        assert_eq!(
            query::answer_phase(&session),
            AnswerPhase::Submitting {
                token: AnswerToken::new(0),
            }
        );
    }
}
