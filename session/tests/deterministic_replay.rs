//! Replaying the same command script must reproduce the same event log.

use std::time::Duration;

use quiz_trail_core::{
    AnswerOption, AnswerToken, Command, Event, GameRules, Question, WrongAnswerPolicy,
};
use quiz_trail_session::{apply, Session};

fn bank() -> Vec<Question> {
    vec![
        Question::new(
            None,
            "first",
            vec![
                AnswerOption::new(None, "right", true),
                AnswerOption::new(None, "wrong", false),
            ],
        ),
        Question::new(
            None,
            "second",
            vec![
                AnswerOption::new(None, "wrong", false),
                AnswerOption::new(None, "right", true),
            ],
        ),
    ]
}

fn script() -> Vec<Command> {
    vec![
        Command::Start {
            questions: bank(),
            rules: GameRules::new(4, 1, WrongAnswerPolicy::DeductPoints { points: 1 }),
            time_limit: Duration::from_secs(120),
        },
        Command::Tick {
            dt: Duration::from_millis(400),
        },
        Command::SubmitAnswer { selected: 0 },
        Command::ResolveAnswer {
            token: AnswerToken::new(0),
            remote: None,
        },
        Command::SubmitAnswer { selected: 0 },
        Command::ResolveAnswer {
            token: AnswerToken::new(1),
            remote: Some(false),
        },
        Command::Tick {
            dt: Duration::from_secs(3),
        },
        Command::SubmitAnswer { selected: 1 },
        Command::ResolveAnswer {
            token: AnswerToken::new(2),
            remote: None,
        },
    ]
}

fn run(commands: Vec<Command>) -> Vec<Event> {
    let mut session = Session::new();
    let mut events = Vec::new();
    for command in commands {
        apply(&mut session, command, &mut events);
    }
    events
}

#[test]
fn identical_scripts_produce_identical_event_logs() {
    let first = run(script());
    let second = run(script());
    assert_eq!(first, second);
    assert!(!first.is_empty());
}
