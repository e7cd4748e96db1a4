//! Inbound job-status notifications (SNS-to-function event shape).
//!
//! [`parse_event`] is the single validation step between the loosely shaped
//! event JSON and the rest of the system. It separates two outcomes that must
//! never be confused:
//!
//! - a malformed envelope (`Records`, `Sns` or `Message` missing) is a wiring
//!   defect and comes back as a [`NotificationError`];
//! - a well-formed envelope without an `inferenceId` (e.g. a topic test
//!   message) is routine and comes back as [`Notification::Untracked`].
//!
//! ```text
//! {
//!   "Records": [
//!     { "Sns": { "MessageId": "...", "TopicArn": "...", "Message": "<json>" } }
//!   ]
//! }
//! ```

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::NotificationError;
use crate::storage_uri::{S3Uri, S3UriError};

/// Canonical status value for a successful asynchronous invocation.
pub const STATUS_COMPLETED: &str = "Completed";

/// Canonical status value for a failed asynchronous invocation.
pub const STATUS_FAILED: &str = "Failed";

// ---------------------------------------------------------------------------
// Wire shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "Records")]
    records: Option<Vec<RawRecord>>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Sns")]
    sns: Option<RawSns>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawSns {
    message_id: Option<String>,
    topic_arn: Option<String>,
    timestamp: Option<String>,
    message: Option<String>,
}

// Field names inside `Records[0].Sns.Message`.
const FIELD_INFERENCE_ID: &str = "inferenceId";
const FIELD_INVOCATION_STATUS: &str = "invocationStatus";
const FIELD_FAILURE_REASON: &str = "failureReason";
const FIELD_REQUEST_PARAMETERS: &str = "requestParameters";
const FIELD_RESPONSE_PARAMETERS: &str = "responseParameters";

// ---------------------------------------------------------------------------
// Validated types
// ---------------------------------------------------------------------------

/// Delivery metadata of the SNS record, kept for log correlation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    pub message_id: Option<String>,
    pub topic_arn: Option<String>,
    pub timestamp: Option<String>,
}

/// Status reported by the inference endpoint, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationStatus {
    Completed,
    Failed,
    Other(String),
}

impl InvocationStatus {
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case(STATUS_COMPLETED) {
            Self::Completed
        } else if raw.eq_ignore_ascii_case(STATUS_FAILED) {
            Self::Failed
        } else {
            Self::Other(raw.to_string())
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for InvocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str(STATUS_COMPLETED),
            Self::Failed => f.write_str(STATUS_FAILED),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// A notification correlated with one inference job.
///
/// Only `inferenceId` is required. Every other body field is read leniently:
/// a value of the wrong JSON type is treated as absent, so a quirky message
/// can still be archived and routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceNotification {
    pub inference_id: String,
    pub status: InvocationStatus,
    /// `responseParameters.outputLocation` as delivered, any JSON type.
    pub output_location: Option<Value>,
    pub output_content_type: Option<String>,
    /// Strings verbatim; structured reasons as compact JSON.
    pub failure_reason: Option<String>,
    pub endpoint_name: Option<String>,
    pub input_location: Option<String>,
    pub aws_region: Option<String>,
    pub event_time: Option<String>,
    pub received_time: Option<String>,
    pub event_source: Option<String>,
    pub event_name: Option<String>,
    pub delivery: Delivery,
    /// The `Message` string exactly as delivered.
    pub raw_body: String,
}

/// Result of validating one inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Structurally valid, but not about any inference job.
    Untracked { delivery: Delivery, raw_body: String },
    Inference(InferenceNotification),
}

/// Where a job-correlated notification should go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Completed job whose output document lives at the given location.
    Extract(S3Uri),
    NotCompleted,
    MissingOutputLocation,
    InvalidOutputLocation(S3UriError),
}

impl InferenceNotification {
    /// Decide whether this notification carries a result worth extracting.
    pub fn route(&self) -> Route {
        if !self.status.is_completed() {
            return Route::NotCompleted;
        }
        match &self.output_location {
            None => Route::MissingOutputLocation,
            Some(Value::String(location)) if location.is_empty() => Route::MissingOutputLocation,
            Some(Value::String(location)) => match S3Uri::parse(location) {
                Ok(uri) => Route::Extract(uri),
                Err(e) => Route::InvalidOutputLocation(e),
            },
            Some(other) => Route::InvalidOutputLocation(S3UriError::NotAString(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Validate raw event bytes into a [`Notification`].
pub fn parse_event(bytes: &[u8]) -> Result<Notification, NotificationError> {
    let raw: RawEvent = serde_json::from_slice(bytes).map_err(NotificationError::InvalidEvent)?;
    from_raw(raw)
}

/// Validate an already-decoded event value into a [`Notification`].
pub fn parse_event_value(value: serde_json::Value) -> Result<Notification, NotificationError> {
    let raw: RawEvent = serde_json::from_value(value).map_err(NotificationError::InvalidEvent)?;
    from_raw(raw)
}

fn from_raw(raw: RawEvent) -> Result<Notification, NotificationError> {
    let mut records = raw
        .records
        .ok_or(NotificationError::MissingField("Records"))?;
    if records.len() != 1 {
        return Err(NotificationError::RecordCount(records.len()));
    }

    let sns = records
        .remove(0)
        .sns
        .ok_or(NotificationError::MissingField("Records[0].Sns"))?;
    let raw_body = sns
        .message
        .ok_or(NotificationError::MissingField("Records[0].Sns.Message"))?;

    let delivery = Delivery {
        message_id: sns.message_id,
        topic_arn: sns.topic_arn,
        timestamp: sns.timestamp,
    };

    // Only the shape of the body is structural: it must be a JSON object.
    let message: Map<String, Value> =
        serde_json::from_str(&raw_body).map_err(NotificationError::InvalidMessage)?;

    let inference_id = match message.get(FIELD_INFERENCE_ID) {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => return Ok(Notification::Untracked { delivery, raw_body }),
    };

    let request = object_field(&message, FIELD_REQUEST_PARAMETERS);
    let response = object_field(&message, FIELD_RESPONSE_PARAMETERS);
    let status = string_field(Some(&message), FIELD_INVOCATION_STATUS).unwrap_or_default();

    Ok(Notification::Inference(InferenceNotification {
        inference_id,
        status: InvocationStatus::parse(&status),
        output_location: response
            .and_then(|r| r.get("outputLocation"))
            .filter(|v| !v.is_null())
            .cloned(),
        output_content_type: string_field(response, "contentType"),
        failure_reason: text_field(&message, FIELD_FAILURE_REASON),
        endpoint_name: string_field(request, "endpointName"),
        input_location: string_field(request, "inputLocation"),
        aws_region: string_field(Some(&message), "awsRegion"),
        event_time: string_field(Some(&message), "eventTime"),
        received_time: string_field(Some(&message), "receivedTime"),
        event_source: string_field(Some(&message), "eventSource"),
        event_name: string_field(Some(&message), "eventName"),
        delivery,
        raw_body,
    }))
}

/// Nested object at `key`; any other type counts as absent.
fn object_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    object.get(key).and_then(Value::as_object)
}

/// String at `key`; any other type counts as absent.
fn string_field(object: Option<&Map<String, Value>>, key: &str) -> Option<String> {
    object?.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Free text at `key`: strings verbatim, other non-null values as compact JSON.
fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
