#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use quiz_trail_core::RunReport;
use serde::{Deserialize, Serialize};

const SUMMARY_DOMAIN: &str = "quiz";
const SUMMARY_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded summary payload.
pub(crate) const SUMMARY_HEADER: &str = "quiz:v1";
/// Delimiter used to separate the prefix, game code and payload.
const FIELD_DELIMITER: char = ':';

/// Shareable summary of one finished run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct RunSummary {
    /// Code of the game mode that was played.
    pub game_code: String,
    /// Final score of the run.
    pub score: i64,
    /// Time consumed by the run in milliseconds.
    pub elapsed_ms: u64,
}

impl RunSummary {
    /// Builds a summary from a finished run's report.
    pub(crate) fn from_report(game_code: &str, report: &RunReport) -> Self {
        Self {
            game_code: game_code.to_owned(),
            score: report.score(),
            elapsed_ms: report.elapsed().as_millis() as u64,
        }
    }

    /// Encodes the summary into a single-line string suitable for sharing.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableSummary {
            score: self.score,
            elapsed_ms: self.elapsed_ms,
        };
        let json = serde_json::to_vec(&payload).expect("run summary serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{SUMMARY_HEADER}:{}:{encoded}", self.game_code)
    }

    /// Decodes a summary from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, RunTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(RunTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(RunTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(RunTransferError::MissingVersion)?;
        let game_code = parts.next().ok_or(RunTransferError::MissingGameCode)?;
        let payload = parts.next().ok_or(RunTransferError::MissingPayload)?;

        if domain != SUMMARY_DOMAIN {
            return Err(RunTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SUMMARY_VERSION {
            return Err(RunTransferError::UnsupportedVersion(version.to_owned()));
        }
        if game_code.is_empty() {
            return Err(RunTransferError::MissingGameCode);
        }

        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(RunTransferError::InvalidEncoding)?;
        let decoded: SerializableSummary =
            serde_json::from_slice(&bytes).map_err(RunTransferError::InvalidPayload)?;

        Ok(Self {
            game_code: game_code.to_owned(),
            score: decoded.score,
            elapsed_ms: decoded.elapsed_ms,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableSummary {
    score: i64,
    elapsed_ms: u64,
}

/// Errors that can occur while decoding run summary strings.
#[derive(Debug)]
pub(crate) enum RunTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded summary.
    MissingPrefix,
    /// The encoded summary did not contain a version segment.
    MissingVersion,
    /// The encoded summary did not include the game code.
    MissingGameCode,
    /// The encoded summary did not include the payload segment.
    MissingPayload,
    /// The encoded summary used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded summary used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for RunTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "summary payload was empty"),
            Self::MissingPrefix => write!(f, "summary string is missing the prefix"),
            Self::MissingVersion => write!(f, "summary string is missing the version"),
            Self::MissingGameCode => write!(f, "summary string is missing the game code"),
            Self::MissingPayload => write!(f, "summary string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "summary prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "summary version '{version}' is not supported")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode summary payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse summary payload: {error}")
            }
        }
    }
}

impl Error for RunTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}
