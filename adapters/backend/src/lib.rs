#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Backend boundary for Quiz Trail sessions.
//!
//! The scoring service is an external collaborator: this crate defines the
//! wire shapes it speaks, the [`GameBackend`] trait any transport must
//! implement, the in-tree mock used when no service is reachable, and the
//! [`GameDirector`] that wires a backend to the session state machine with
//! remote-first, local-fallback semantics. Remote failures are logged and
//! absorbed here; they never reach gameplay.

pub mod api;
pub mod director;
pub mod mock;

pub use api::{AnswerReceipt, BackendError, GameBackend, SessionStart};
pub use director::{ConfigurationError, GameDirector};
pub use mock::{fallback_question_bank, MockBackend};
