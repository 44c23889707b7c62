#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Quiz Trail hub.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the session executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values for the
//! driving adapter to react to deterministically. Everything else in here is
//! shared vocabulary: question data, path geometry, and the per-game rule
//! configuration threaded through constructors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Quiz Trail.";

/// Identifies which of the two game modes a session is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    /// Vertical course of leaf stepping stones unlocked one jump at a time.
    LeafHop,
    /// Train track where each correct answer couples the next car.
    TrainLink,
}

/// Opaque identifier assigned to a play-through by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new session identifier from its backend representation.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Retrieves the backend representation of the identifier.
    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

/// Opaque identifier naming a game definition on the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(String);

impl GameId {
    /// Creates a new game identifier from its backend representation.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Retrieves the backend representation of the identifier.
    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

/// Opaque identifier naming one question within a session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuestionId(String);

impl QuestionId {
    /// Creates a new question identifier from its backend representation.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Retrieves the backend representation of the identifier.
    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

/// Opaque identifier naming one answer option of a question.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionId(String);

impl OptionId {
    /// Creates a new option identifier from its backend representation.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Retrieves the backend representation of the identifier.
    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

/// One selectable answer belonging to a [`Question`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    id: Option<OptionId>,
    text: String,
    is_correct: bool,
}

impl AnswerOption {
    /// Creates a new answer option.
    #[must_use]
    pub fn new(id: Option<OptionId>, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id,
            text: text.into(),
            is_correct,
        }
    }

    /// Backend identifier of the option, when one was provided.
    #[must_use]
    pub fn id(&self) -> Option<&OptionId> {
        self.id.as_ref()
    }

    /// Display text shown to the player.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the authored data marks this option as the correct one.
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        self.is_correct
    }
}

/// A multiple-choice question presented by either game mode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: Option<QuestionId>,
    content: String,
    options: Vec<AnswerOption>,
}

impl Question {
    /// Creates a new question from its content and answer options.
    #[must_use]
    pub fn new(
        id: Option<QuestionId>,
        content: impl Into<String>,
        options: Vec<AnswerOption>,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            options,
        }
    }

    /// Backend identifier of the question, when one was provided.
    #[must_use]
    pub fn id(&self) -> Option<&QuestionId> {
        self.id.as_ref()
    }

    /// Prompt text shown to the player.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Answer options in presentation order.
    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    /// Index of the first option marked correct, if any option is marked.
    #[must_use]
    pub fn correct_option_index(&self) -> Option<usize> {
        self.options.iter().position(AnswerOption::is_correct)
    }

    /// Index treated as correct during local evaluation.
    ///
    /// Question data that marks no option falls back to index 0 so the run
    /// keeps playing; the backend adapter reports such questions at start.
    #[must_use]
    pub fn effective_correct_index(&self) -> usize {
        self.correct_option_index().unwrap_or(0)
    }
}

/// Consequence applied when the player answers incorrectly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrongAnswerPolicy {
    /// Deduct a fixed number of points and keep the current progress.
    DeductPoints {
        /// Points removed from the score; stored as a positive amount.
        points: i64,
    },
    /// Reset progress and score to zero and shorten the remaining time.
    ResetProgress {
        /// Time removed from the clock immediately after the wrong answer.
        time_penalty: Duration,
    },
}

/// Scoring and progression rules for one game mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    progress_cap: u32,
    correct_points: i64,
    wrong_answer: WrongAnswerPolicy,
}

impl GameRules {
    /// Creates a new rule set.
    #[must_use]
    pub const fn new(
        progress_cap: u32,
        correct_points: i64,
        wrong_answer: WrongAnswerPolicy,
    ) -> Self {
        Self {
            progress_cap,
            correct_points,
            wrong_answer,
        }
    }

    /// Progress value at which the run completes.
    #[must_use]
    pub const fn progress_cap(&self) -> u32 {
        self.progress_cap
    }

    /// Points awarded for each correct answer.
    #[must_use]
    pub const fn correct_points(&self) -> i64 {
        self.correct_points
    }

    /// Consequence applied to incorrect answers.
    #[must_use]
    pub const fn wrong_answer(&self) -> WrongAnswerPolicy {
        self.wrong_answer
    }
}

/// Complete configuration for one game mode, threaded through constructors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    kind: GameKind,
    code: String,
    label: String,
    rules: GameRules,
    time_limit: Duration,
}

impl GameConfig {
    /// Creates a new game configuration.
    #[must_use]
    pub fn new(
        kind: GameKind,
        code: impl Into<String>,
        label: impl Into<String>,
        rules: GameRules,
        time_limit: Duration,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            label: label.into(),
            rules,
            time_limit,
        }
    }

    /// Game mode selected by this configuration.
    #[must_use]
    pub const fn kind(&self) -> GameKind {
        self.kind
    }

    /// Stable code used when talking to the backend.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable name of the game mode.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Scoring and progression rules of the game mode.
    #[must_use]
    pub const fn rules(&self) -> GameRules {
        self.rules
    }

    /// Default time limit applied when the backend supplies none.
    #[must_use]
    pub const fn time_limit(&self) -> Duration {
        self.time_limit
    }
}

/// Point in image-space or viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from its coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// Position plus facing angle, as placed along a course.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    position: Position,
    angle: f32,
}

impl Pose {
    /// Creates a new pose.
    #[must_use]
    pub const fn new(position: Position, angle: f32) -> Self {
        Self { position, angle }
    }

    /// Location of the pose.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Facing angle in radians, measured from the positive X axis.
    #[must_use]
    pub const fn angle(&self) -> f32 {
        self.angle
    }
}

/// Physical course that translates a logical progress index into a pose.
///
/// Both game modes implement this: the leaf course answers with stepping
/// stone centers and the train track answers with car slots along its rails.
pub trait ProgressTrack {
    /// Pose assigned to the provided progress index.
    ///
    /// Indices beyond the course's extent are defined behavior: bounded
    /// courses clamp to their final slot, unbounded ones keep generating.
    fn pose_at(&self, index: u32) -> Pose;

    /// Number of discrete slots, or `None` for an unbounded course.
    fn slot_count(&self) -> Option<u32>;
}

/// Connected region of marker-classified pixels found in a raster map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Blob {
    centroid_x: f32,
    centroid_y: f32,
    pixel_count: u32,
    min_x: u32,
    max_x: u32,
    min_y: u32,
    max_y: u32,
}

impl Blob {
    /// Creates a new blob description.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        centroid_x: f32,
        centroid_y: f32,
        pixel_count: u32,
        min_x: u32,
        max_x: u32,
        min_y: u32,
        max_y: u32,
    ) -> Self {
        Self {
            centroid_x,
            centroid_y,
            pixel_count,
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Horizontal centroid of the region in image space.
    #[must_use]
    pub const fn centroid_x(&self) -> f32 {
        self.centroid_x
    }

    /// Vertical centroid of the region in image space.
    #[must_use]
    pub const fn centroid_y(&self) -> f32 {
        self.centroid_y
    }

    /// Number of pixels composing the region.
    #[must_use]
    pub const fn pixel_count(&self) -> u32 {
        self.pixel_count
    }

    /// Smallest X coordinate touched by the region.
    #[must_use]
    pub const fn min_x(&self) -> u32 {
        self.min_x
    }

    /// Largest X coordinate touched by the region.
    #[must_use]
    pub const fn max_x(&self) -> u32 {
        self.max_x
    }

    /// Smallest Y coordinate touched by the region.
    #[must_use]
    pub const fn min_y(&self) -> u32 {
        self.min_y
    }

    /// Largest Y coordinate touched by the region.
    #[must_use]
    pub const fn max_y(&self) -> u32 {
        self.max_y
    }

    /// Horizontal span of the bounding box measured between extremes.
    #[must_use]
    pub const fn bounding_width(&self) -> u32 {
        self.max_x - self.min_x
    }

    /// Vertical span of the bounding box measured between extremes.
    #[must_use]
    pub const fn bounding_height(&self) -> u32 {
        self.max_y - self.min_y
    }

    /// Width-to-height ratio of the bounding box.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.bounding_width() as f32 / self.bounding_height().max(1) as f32
    }
}

/// Token tying an in-flight answer submission to its eventual verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnswerToken(u64);

impl AnswerToken {
    /// Creates a new token with the provided sequence value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the token.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Authority that decided an answer's correctness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerdictSource {
    /// The backend's verdict was applied.
    Remote,
    /// The question data was evaluated locally.
    Local,
}

/// Lifecycle of one quiz run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// No run has started yet.
    Idle,
    /// The run is accepting answers and consuming time.
    Playing,
    /// The player reached the progress cap.
    Completed,
    /// The clock ran out before the progress cap was reached.
    TimedOut,
}

impl SessionStatus {
    /// Whether the status is terminal and must reject further effects.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::TimedOut)
    }
}

/// Submission lock making re-entrant answers structurally impossible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerPhase {
    /// The session accepts a new answer submission.
    Ready,
    /// A submission is awaiting its verdict; further submissions are rejected.
    Submitting {
        /// Token identifying the in-flight submission.
        token: AnswerToken,
    },
}

/// Final accounting of one run, reported once at the terminal transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    score: i64,
    elapsed: Duration,
}

impl RunReport {
    /// Creates a new run report.
    #[must_use]
    pub const fn new(score: i64, elapsed: Duration) -> Self {
        Self { score, elapsed }
    }

    /// Final score of the run.
    #[must_use]
    pub const fn score(&self) -> i64 {
        self.score
    }

    /// Time consumed between start and the terminal transition.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Reasons a `Start` command can be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartRejection {
    /// The provided question list was empty and no fallback was injected.
    EmptyQuestionBank,
    /// The rules declared a zero progress cap, which can never be reached.
    ZeroProgressCap,
}

/// Reasons a `SubmitAnswer` command can be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerRejection {
    /// The session is idle or already terminal.
    NotPlaying,
    /// A previous submission is still awaiting its verdict.
    SubmissionInFlight,
}

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Begins a new run with the provided question pool and rules.
    Start {
        /// Question pool; the pool wraps when progression exceeds its size.
        questions: Vec<Question>,
        /// Scoring and progression rules for the run.
        rules: GameRules,
        /// Total time budget of the run.
        time_limit: Duration,
    },
    /// Submits the player's selected option for the current question.
    SubmitAnswer {
        /// Zero-based index of the chosen option.
        selected: usize,
    },
    /// Resolves an in-flight submission with an optional remote verdict.
    ResolveAnswer {
        /// Token issued by the matching `AnswerPending` event.
        token: AnswerToken,
        /// Backend verdict, or `None` to evaluate the question locally.
        remote: Option<bool>,
    },
    /// Advances the run clock by the provided delta time.
    Tick {
        /// Duration of wall-clock time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a new run began.
    RunStarted {
        /// Number of questions available in the pool.
        question_count: usize,
        /// Total time budget of the run.
        time_limit: Duration,
    },
    /// Reports that a `Start` command was rejected.
    StartRejected {
        /// Specific reason the start failed.
        reason: StartRejection,
    },
    /// Announces an answer submission now awaiting its verdict.
    AnswerPending {
        /// Token the resolving command must echo.
        token: AnswerToken,
        /// Index of the question being answered within the pool.
        question_index: usize,
        /// Option index chosen by the player.
        selected: usize,
    },
    /// Reports that an answer submission was rejected.
    AnswerRejected {
        /// Specific reason the submission failed.
        reason: AnswerRejection,
    },
    /// Reports that a verdict arrived for a submission no longer in flight.
    StaleVerdictDiscarded {
        /// Token carried by the discarded verdict.
        token: AnswerToken,
    },
    /// Announces the verdict applied to an answer submission.
    AnswerJudged {
        /// Token of the resolved submission.
        token: AnswerToken,
        /// Index of the judged question within the pool.
        question_index: usize,
        /// Option index chosen by the player.
        selected: usize,
        /// Whether the answer counted as correct.
        correct: bool,
        /// Authority that produced the verdict.
        source: VerdictSource,
    },
    /// Confirms that the progress counter advanced.
    ProgressAdvanced {
        /// Progress value after the advance.
        progress: u32,
    },
    /// Confirms that the progress counter was reset by a wrong answer.
    ProgressReset {
        /// Time removed from the clock by the reset policy.
        time_penalty: Duration,
    },
    /// Announces the score after a change.
    ScoreChanged {
        /// Score value after the change.
        score: i64,
    },
    /// Indicates that the run clock advanced.
    TimeAdvanced {
        /// Time remaining after the tick.
        remaining: Duration,
    },
    /// Announces that the run ended with the progress cap reached.
    RunCompleted {
        /// Final accounting of the run.
        report: RunReport,
    },
    /// Announces that the run ended because the clock ran out.
    RunTimedOut {
        /// Final accounting of the run.
        report: RunReport,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_with_correct_at(index: usize) -> Question {
        let options = (0..4)
            .map(|i| AnswerOption::new(None, format!("option {i}"), i == index))
            .collect();
        Question::new(None, "which one?", options)
    }

    #[test]
    fn correct_option_index_finds_marked_option() {
        let question = question_with_correct_at(2);
        assert_eq!(question.correct_option_index(), Some(2));
        assert_eq!(question.effective_correct_index(), 2);
    }

    #[test]
    fn unmarked_question_defaults_to_first_option() {
        let options = vec![
            AnswerOption::new(None, "a", false),
            AnswerOption::new(None, "b", false),
        ];
        let question = Question::new(None, "nothing marked", options);
        assert_eq!(question.correct_option_index(), None);
        assert_eq!(question.effective_correct_index(), 0);
    }

    #[test]
    fn blob_span_and_aspect() {
        let blob = Blob::new(50.0, 60.0, 400, 10, 110, 20, 70);
        assert_eq!(blob.bounding_width(), 100);
        assert_eq!(blob.bounding_height(), 50);
        assert!((blob.aspect_ratio() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn terminal_statuses_are_terminal() {
        assert!(!SessionStatus::Idle.is_terminal());
        assert!(!SessionStatus::Playing.is_terminal());
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::TimedOut.is_terminal());
    }

    #[test]
    fn question_survives_bincode_round_trip() {
        let question = Question::new(
            Some(QuestionId::new("q-7")),
            "pick the noun",
            vec![
                AnswerOption::new(Some(OptionId::new("q-7-a")), "river", true),
                AnswerOption::new(Some(OptionId::new("q-7-b")), "quickly", false),
            ],
        );
        let bytes = bincode::serialize(&question).expect("question serializes");
        let decoded: Question = bincode::deserialize(&bytes).expect("question deserializes");
        assert_eq!(question, decoded);
    }

    #[test]
    fn report_survives_bincode_round_trip() {
        let report = RunReport::new(11, Duration::from_millis(84_500));
        let bytes = bincode::serialize(&report).expect("report serializes");
        let decoded: RunReport = bincode::deserialize(&bytes).expect("report deserializes");
        assert_eq!(report, decoded);
    }
}
