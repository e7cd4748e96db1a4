/// Structural problems with an inbound notification event.
///
/// These indicate a misconfigured trigger rather than bad job data, so the
/// handlers surface them as invocation failures.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Invalid event: expected '{0}' to be present")]
    MissingField(&'static str),

    #[error("Invalid event: expected exactly one entry in 'Records', got {0}")]
    RecordCount(usize),

    #[error("Invalid event: {0}")]
    InvalidEvent(#[source] serde_json::Error),

    #[error("Invalid event: 'Records[0].Sns.Message' is not a JSON object: {0}")]
    InvalidMessage(#[source] serde_json::Error),
}

/// Failures turning a pixel grid into a PNG.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Image grid has no rows")]
    EmptyGrid,

    #[error("Image grid row 0 has no pixels")]
    EmptyRow,

    #[error("Image grid is not rectangular: row {row} has {found} pixels, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Image grid of {width}x{height} pixels exceeds the supported dimensions")]
    TooLarge { width: usize, height: usize },

    #[error("Image entry is not a grid of [r, g, b] triples: {0}")]
    InvalidEntry(#[source] serde_json::Error),

    #[error("PNG codec error: {0}")]
    Encode(#[from] image::ImageError),
}
