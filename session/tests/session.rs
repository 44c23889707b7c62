//! End-to-end coverage of the quiz-run state machine.

use std::time::Duration;

use quiz_trail_core::{
    AnswerOption, AnswerRejection, Command, Event, GameRules, Question, QuestionId, SessionStatus,
    VerdictSource, WrongAnswerPolicy,
};
use quiz_trail_session::{apply, query, Session};

fn question(content: &str, correct_index: usize) -> Question {
    let options = (0..4)
        .map(|i| AnswerOption::new(None, format!("option {i}"), i == correct_index))
        .collect();
    Question::new(None, content, options)
}

fn leaf_rules(cap: u32) -> GameRules {
    GameRules::new(cap, 1, WrongAnswerPolicy::DeductPoints { points: 1 })
}

fn train_rules(cap: u32) -> GameRules {
    GameRules::new(
        cap,
        1,
        WrongAnswerPolicy::ResetProgress {
            time_penalty: Duration::from_secs(15),
        },
    )
}

fn start(session: &mut Session, questions: Vec<Question>, rules: GameRules, limit: Duration) {
    let mut events = Vec::new();
    apply(
        session,
        Command::Start {
            questions,
            rules,
            time_limit: limit,
        },
        &mut events,
    );
    assert!(
        matches!(events.as_slice(), [Event::RunStarted { .. }]),
        "expected RunStarted, got {events:?}"
    );
}

fn answer(session: &mut Session, selected: usize) -> Vec<Event> {
    let mut events = Vec::new();
    apply(session, Command::SubmitAnswer { selected }, &mut events);
    let token = match events.as_slice() {
        [Event::AnswerPending { token, .. }] => *token,
        other => panic!("expected AnswerPending, got {other:?}"),
    };
    apply(
        session,
        Command::ResolveAnswer {
            token,
            remote: None,
        },
        &mut events,
    );
    events
}

#[test]
fn marked_option_judges_correct_and_scores() {
    let mut session = Session::new();
    start(
        &mut session,
        vec![question("marked at two", 2)],
        leaf_rules(5),
        Duration::from_secs(60),
    );

    let events = answer(&mut session, 2);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::AnswerJudged {
            correct: true,
            source: VerdictSource::Local,
            ..
        }
    )));
    assert_eq!(query::score(&session), 1);
    assert_eq!(query::progress(&session), 1);
}

#[test]
fn unmarked_option_judges_incorrect_and_deducts() {
    let mut session = Session::new();
    start(
        &mut session,
        vec![question("marked at two", 2)],
        leaf_rules(5),
        Duration::from_secs(60),
    );

    let events = answer(&mut session, 0);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::AnswerJudged { correct: false, .. })));
    assert_eq!(query::score(&session), -1);
    assert_eq!(query::progress(&session), 0);
}

#[test]
fn remote_verdict_overrides_local_evaluation() {
    let mut session = Session::new();
    start(
        &mut session,
        vec![question("marked at two", 2)],
        leaf_rules(5),
        Duration::from_secs(60),
    );

    let mut events = Vec::new();
    apply(&mut session, Command::SubmitAnswer { selected: 0 }, &mut events);
    let token = match events.as_slice() {
        [Event::AnswerPending { token, .. }] => *token,
        other => panic!("expected AnswerPending, got {other:?}"),
    };

    events.clear();
    apply(
        &mut session,
        Command::ResolveAnswer {
            token,
            remote: Some(true),
        },
        &mut events,
    );

    assert!(events.iter().any(|event| matches!(
        event,
        Event::AnswerJudged {
            correct: true,
            source: VerdictSource::Remote,
            ..
        }
    )));
    assert_eq!(query::progress(&session), 1);
}

#[test]
fn question_pool_wraps_after_exhaustion() {
    let mut session = Session::new();
    start(
        &mut session,
        vec![question("first", 0), question("second", 0)],
        leaf_rules(10),
        Duration::from_secs(60),
    );

    assert_eq!(query::current_question(&session).map(Question::content), Some("first"));
    let _ = answer(&mut session, 0);
    assert_eq!(query::current_question(&session).map(Question::content), Some("second"));
    let _ = answer(&mut session, 0);
    assert_eq!(query::current_question(&session).map(Question::content), Some("first"));
}

#[test]
fn reaching_progress_cap_completes_exactly_once() {
    let mut session = Session::new();
    start(
        &mut session,
        vec![question("always zero", 0)],
        leaf_rules(3),
        Duration::from_secs(60),
    );

    let mut completions = 0;
    for _ in 0..3 {
        let events = answer(&mut session, 0);
        completions += events
            .iter()
            .filter(|event| matches!(event, Event::RunCompleted { .. }))
            .count();
    }

    assert_eq!(completions, 1);
    assert_eq!(query::status(&session), SessionStatus::Completed);

    let mut events = Vec::new();
    apply(&mut session, Command::SubmitAnswer { selected: 0 }, &mut events);
    assert_eq!(
        events,
        vec![Event::AnswerRejected {
            reason: AnswerRejection::NotPlaying,
        }]
    );
}

#[test]
fn ticks_summing_to_limit_time_out_exactly_once() {
    let mut session = Session::new();
    start(
        &mut session,
        vec![question("any", 0)],
        leaf_rules(5),
        Duration::from_secs(10),
    );

    let mut events = Vec::new();
    for _ in 0..10 {
        apply(
            &mut session,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
            &mut events,
        );
    }

    let timeouts = events
        .iter()
        .filter(|event| matches!(event, Event::RunTimedOut { .. }))
        .count();
    assert_eq!(timeouts, 1);
    assert_eq!(query::status(&session), SessionStatus::TimedOut);

    events.clear();
    apply(
        &mut session,
        Command::Tick {
            dt: Duration::from_secs(1),
        },
        &mut events,
    );
    assert!(events.is_empty(), "terminal tick must be a no-op");

    apply(&mut session, Command::SubmitAnswer { selected: 0 }, &mut events);
    assert_eq!(
        events,
        vec![Event::AnswerRejected {
            reason: AnswerRejection::NotPlaying,
        }]
    );
}

#[test]
fn train_reset_policy_zeroes_progress_and_applies_penalty() {
    let mut session = Session::new();
    start(
        &mut session,
        vec![question("always zero", 0)],
        train_rules(11),
        Duration::from_secs(300),
    );

    let _ = answer(&mut session, 0);
    let _ = answer(&mut session, 0);
    assert_eq!(query::progress(&session), 2);
    assert_eq!(query::score(&session), 2);

    let events = answer(&mut session, 3);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::ProgressReset { time_penalty } if *time_penalty == Duration::from_secs(15)
    )));
    assert_eq!(query::progress(&session), 0);
    assert_eq!(query::score(&session), 0);
    assert_eq!(query::remaining_time(&session), Duration::from_secs(285));
}

#[test]
fn time_penalty_can_end_the_run_immediately() {
    let mut session = Session::new();
    start(
        &mut session,
        vec![question("always zero", 0)],
        train_rules(11),
        Duration::from_secs(10),
    );

    let events = answer(&mut session, 3);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::RunTimedOut { .. })));
    assert_eq!(query::status(&session), SessionStatus::TimedOut);
}

#[test]
fn verdict_after_timeout_is_discarded() {
    let mut session = Session::new();
    start(
        &mut session,
        vec![question("any", 0)],
        leaf_rules(5),
        Duration::from_secs(5),
    );

    let mut events = Vec::new();
    apply(&mut session, Command::SubmitAnswer { selected: 0 }, &mut events);
    let token = match events.as_slice() {
        [Event::AnswerPending { token, .. }] => *token,
        other => panic!("expected AnswerPending, got {other:?}"),
    };

    apply(
        &mut session,
        Command::Tick {
            dt: Duration::from_secs(5),
        },
        &mut events,
    );

    events.clear();
    apply(
        &mut session,
        Command::ResolveAnswer {
            token,
            remote: Some(true),
        },
        &mut events,
    );

    assert_eq!(events, vec![Event::StaleVerdictDiscarded { token }]);
    assert_eq!(query::score(&session), 0);
}

#[test]
fn report_tracks_elapsed_time_and_score() {
    let mut session = Session::new();
    start(
        &mut session,
        vec![question("marked at one", 1)],
        leaf_rules(5),
        Duration::from_secs(60),
    );

    let mut events = Vec::new();
    apply(
        &mut session,
        Command::Tick {
            dt: Duration::from_millis(12_500),
        },
        &mut events,
    );
    let _ = answer(&mut session, 1);

    let report = query::run_report(&session);
    assert_eq!(report.score(), 1);
    assert_eq!(report.elapsed(), Duration::from_millis(12_500));
}

#[test]
fn answered_ids_are_recorded_once() {
    let mut session = Session::new();
    let tagged = Question::new(
        Some(QuestionId::new("q-1")),
        "tagged",
        vec![
            AnswerOption::new(None, "a", true),
            AnswerOption::new(None, "b", false),
        ],
    );
    start(
        &mut session,
        vec![tagged],
        leaf_rules(5),
        Duration::from_secs(60),
    );

    let _ = answer(&mut session, 1);
    let _ = answer(&mut session, 0);

    assert_eq!(query::answered_questions(&session).len(), 1);
    assert!(query::answered_questions(&session).contains(&QuestionId::new("q-1")));
}
