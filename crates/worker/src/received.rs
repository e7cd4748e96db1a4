//! Entry log lines shared by both handlers.

use genai_core::notification::{Delivery, InferenceNotification};

/// Log a job-correlated notification with every field it carries.
pub(crate) fn log_inference(handler: &'static str, job: &InferenceNotification) {
    tracing::info!(
        handler,
        inference_id = %job.inference_id,
        status = %job.status,
        failure_reason = job.failure_reason.as_deref(),
        endpoint_name = job.endpoint_name.as_deref(),
        input_location = job.input_location.as_deref(),
        output_content_type = job.output_content_type.as_deref(),
        aws_region = job.aws_region.as_deref(),
        event_source = job.event_source.as_deref(),
        event_name = job.event_name.as_deref(),
        event_time = job.event_time.as_deref(),
        received_time = job.received_time.as_deref(),
        sns_message_id = job.delivery.message_id.as_deref(),
        topic_arn = job.delivery.topic_arn.as_deref(),
        sns_timestamp = job.delivery.timestamp.as_deref(),
        "Received inference notification",
    );
}

/// Log a notification that carries no `inferenceId`.
pub(crate) fn log_untracked(handler: &'static str, delivery: &Delivery, raw_body: &str) {
    tracing::info!(
        handler,
        sns_message_id = delivery.message_id.as_deref(),
        topic_arn = delivery.topic_arn.as_deref(),
        body = %raw_body,
        "No inferenceId found in message, ignoring",
    );
}
