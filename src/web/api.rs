//! Wire types of the HTTP API and their validation.
//!
//! Dots travel as array indices (0-5). Requests are checked here so the
//! engine only ever sees well-formed events.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::{EngineSnapshot, EventOutcome, InputEvent};
use crate::models::Dot;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Error message.
    pub error: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub(crate) fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub(crate) fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Handler error: status plus JSON body.
pub type ApiFailure = (StatusCode, Json<ApiError>);

pub(crate) fn bad_request(error: ApiError) -> ApiFailure {
    (StatusCode::BAD_REQUEST, Json(error))
}

/// Largest cursor move, in either direction and on either axis, accepted
/// over the wire.
pub const MAX_MOVE_DELTA: isize = 10_000;

/// One event as sent by clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum EventRequest {
    /// Dot key down
    DotPress {
        /// Dot index, 0-5
        dot: i64,
    },
    /// Dot key up
    DotRelease {
        /// Dot index, 0-5
        dot: i64,
    },
    /// Relative cursor move
    MoveCursor {
        /// Row delta
        d_row: isize,
        /// Column delta
        d_col: isize,
    },
    /// Blank cell
    Space,
    /// Next line
    Newline,
    /// Step back and clear
    Erase,
    /// Reset everything
    ClearAll,
}

impl EventRequest {
    /// Converts to an engine event, rejecting out-of-range dot indices and
    /// cursor moves beyond [`MAX_MOVE_DELTA`].
    pub fn into_event(self) -> Result<InputEvent, ApiError> {
        Ok(match self {
            Self::DotPress { dot } => InputEvent::press(parse_dot(dot)?),
            Self::DotRelease { dot } => InputEvent::release(parse_dot(dot)?),
            Self::MoveCursor { d_row, d_col } => {
                InputEvent::move_by(parse_delta(d_row)?, parse_delta(d_col)?)
            }
            Self::Space => InputEvent::Space,
            Self::Newline => InputEvent::Newline,
            Self::Erase => InputEvent::Erase,
            Self::ClearAll => InputEvent::ClearAll,
        })
    }
}

fn parse_dot(index: i64) -> Result<Dot, ApiError> {
    usize::try_from(index)
        .ok()
        .and_then(Dot::from_index)
        .ok_or_else(|| {
            ApiError::with_details(
                "Invalid dot index",
                format!("expected 0 to 5, got {index}"),
            )
        })
}

fn parse_delta(delta: isize) -> Result<isize, ApiError> {
    if (-MAX_MOVE_DELTA..=MAX_MOVE_DELTA).contains(&delta) {
        Ok(delta)
    } else {
        Err(ApiError::with_details(
            "Invalid cursor move",
            format!("expected deltas within +/-{MAX_MOVE_DELTA}, got {delta}"),
        ))
    }
}

/// Parses a request body holding one event object or an array of them.
///
/// The whole body is rejected if any element is invalid, so a batch is
/// either applied completely or not at all.
pub fn parse_events(body: Value) -> Result<Vec<InputEvent>, ApiError> {
    let items = match body {
        Value::Array(items) => items,
        single @ Value::Object(_) => vec![single],
        _ => {
            return Err(ApiError::new(
                "Expected an event object or an array of events",
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let request: EventRequest = serde_json::from_value(item).map_err(|e| {
                ApiError::with_details(format!("Invalid event at position {i}"), e.to_string())
            })?;
            request.into_event().map_err(|mut error| {
                error.error = format!("{} at position {i}", error.error);
                error
            })
        })
        .collect()
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Crate version
    pub version: String,
}

/// Result of `POST /api/events`.
#[derive(Debug, Serialize)]
pub struct EventsResponse {
    /// Outcome per event, in request order
    pub outcomes: Vec<EventOutcome>,
    /// Engine state after the last event
    pub state: EngineSnapshot,
}

/// Body of `PUT /api/policy`.
#[derive(Debug, Deserialize)]
pub struct PolicyRequest {
    /// Policy name (`clamp`, `wrap`, `wrap_scroll`)
    pub policy: String,
}
