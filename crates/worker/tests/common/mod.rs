//! Shared fixtures for the handler integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use serde_json::json;

pub const BUCKET: &str = "genai-results";
pub const MODEL_BUCKET: &str = "model-io";
pub const OUTPUT_KEY: &str = "output/37a32ca5.out";

/// Wrap a `Message` string in an SNS-to-function event.
pub fn envelope(message: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "Records": [{
            "EventSource": "aws:sns",
            "EventVersion": "1.0",
            "Sns": {
                "Type": "Notification",
                "MessageId": "e81b8b22-05f2-5a14-b9d5-d772adef4afa",
                "TopicArn": "arn:aws:sns:eu-central-1:000000000000:Endpoint-SuccessTopic",
                "Subject": null,
                "Message": message,
                "Timestamp": "2023-01-29T16:59:09.210Z",
                "MessageAttributes": {}
            }
        }]
    }))
    .unwrap()
}

/// Message body of a completed inference.
pub fn completed_message(inference_id: &str) -> String {
    completed_message_with_location(
        inference_id,
        &format!("s3://{MODEL_BUCKET}/{OUTPUT_KEY}"),
    )
}

pub fn completed_message_with_location(inference_id: &str, output_location: &str) -> String {
    json!({
        "awsRegion": "eu-central-1",
        "eventTime": "2023-01-29T16:59:09.174Z",
        "receivedTime": "2023-01-29T16:49:47.144Z",
        "invocationStatus": "Completed",
        "requestParameters": {
            "endpointName": "ep-sd",
            "inputLocation": format!("s3://{MODEL_BUCKET}/input/request.json")
        },
        "responseParameters": {
            "contentType": "application/json",
            "outputLocation": output_location
        },
        "inferenceId": inference_id,
        "eventVersion": "1.0",
        "eventSource": "aws:sagemaker",
        "eventName": "InferenceResult"
    })
    .to_string()
}

/// Message body of a failed inference.
pub fn failed_message(inference_id: &str) -> String {
    json!({
        "awsRegion": "eu-central-1",
        "eventTime": "2023-01-29T15:52:28.711Z",
        "invocationStatus": "Failed",
        "failureReason": "ClientError: Received client error (400) from model.",
        "requestParameters": {
            "endpointName": "ep-sd",
            "inputLocation": format!("s3://{MODEL_BUCKET}/input/broken.json")
        },
        "inferenceId": inference_id,
        "eventSource": "aws:sagemaker",
        "eventName": "InferenceResult"
    })
    .to_string()
}

/// Message body of a topic test publication (no inference id).
pub fn test_ping_message() -> String {
    json!({ "hello": "world" }).to_string()
}

/// A `width`x`height` grid where every pixel is distinct from its neighbours.
pub fn gradient_grid(width: usize, height: usize, seed: u8) -> Vec<Vec<[u8; 3]>> {
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| [x as u8, y as u8, seed])
                .collect()
        })
        .collect()
}

/// Serialized output document.
pub fn output_document(grids: &[Vec<Vec<[u8; 3]>>], prompt: Option<&str>) -> Vec<u8> {
    let mut doc = json!({ "generated_images": grids });
    if let Some(prompt) = prompt {
        doc["prompt"] = json!(prompt);
    }
    serde_json::to_vec(&doc).unwrap()
}

// ---------------------------------------------------------------------------
// Log capture
// ---------------------------------------------------------------------------

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Route this thread's logs into a buffer until the guard is dropped.
///
/// `#[tokio::test]` runs on a current-thread runtime, so the thread-local
/// default subscriber sees everything the handler logs.
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
