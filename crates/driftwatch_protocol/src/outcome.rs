//! Uniform result envelope for automated callers.
//!
//! Every operation in the surrounding system wraps its result in this
//! four-field envelope so an automated caller can route on `success`
//! without understanding the payload. Library code keeps typed `Result`s
//! internally and translates at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generic outcome envelope: `success` + payload on success, message on
/// failure, and an optional hint telling the caller what to do next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome<T> {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Suggestion for an automated caller, e.g. "register this schema as
    /// the new baseline". Set by the caller layer, not by the core.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_action_hint: Option<String>,
}

impl<T> ToolOutcome<T> {
    /// Successful outcome carrying a payload.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            next_action_hint: None,
        }
    }

    /// Failed outcome carrying a message.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            next_action_hint: None,
        }
    }

    /// Attach a next-action hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.next_action_hint = Some(hint.into());
        self
    }

    /// Translate a typed result into the envelope, stringifying the error.
    pub fn from_result<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

impl<T, E: fmt::Display> From<Result<T, E>> for ToolOutcome<T> {
    fn from(result: Result<T, E>) -> Self {
        Self::from_result(result)
    }
}
