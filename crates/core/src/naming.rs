//! Object key naming for generated images, manifests and archived messages.
//!
//! Every key is derived only from the inference id, the prompt and the image
//! index, so a re-delivered notification overwrites exactly the objects the
//! first delivery wrote.

/// Prefix for decoded images and their manifest.
pub const IMAGE_KEY_PREFIX: &str = "images/";

/// Prefix for archived raw notification bodies.
pub const MESSAGE_KEY_PREFIX: &str = "messages/";

/// Name used when the prompt is absent or blank.
pub const FALLBACK_IMAGE_NAME: &str = "image";

/// Number of prompt words kept in an image filename.
pub const PROMPT_WORD_LIMIT: usize = 5;

/// Filename stem derived from the prompt.
///
/// Convention: the first five whitespace-separated words joined with `_`.
///
/// # Examples
///
/// ```
/// use genai_core::naming::image_name_base;
///
/// assert_eq!(image_name_base(Some("astronaut on a horse")), "astronaut_on_a_horse");
/// assert_eq!(image_name_base(Some("a b c d e f g")), "a_b_c_d_e");
/// assert_eq!(image_name_base(Some("   ")), "image");
/// assert_eq!(image_name_base(None), "image");
/// ```
pub fn image_name_base(prompt: Option<&str>) -> String {
    let words: Vec<&str> = prompt
        .unwrap_or_default()
        .split_whitespace()
        .take(PROMPT_WORD_LIMIT)
        .collect();

    if words.is_empty() {
        FALLBACK_IMAGE_NAME.to_string()
    } else {
        words.join("_")
    }
}

/// Key of the `index`-th (zero-based) image of a job.
///
/// Convention: `images/{inference_id}/{name}_{index}.png`
pub fn image_key(inference_id: &str, prompt: Option<&str>, index: usize) -> String {
    format!(
        "{IMAGE_KEY_PREFIX}{inference_id}/{}_{index}.png",
        image_name_base(prompt)
    )
}

/// Keys of all `count` images of a job, in index order.
pub fn image_keys(inference_id: &str, prompt: Option<&str>, count: usize) -> Vec<String> {
    (0..count)
        .map(|index| image_key(inference_id, prompt, index))
        .collect()
}

/// Key of a job's manifest: `images/{inference_id}/manifest.json`.
pub fn manifest_key(inference_id: &str) -> String {
    format!("{IMAGE_KEY_PREFIX}{inference_id}/manifest.json")
}

/// Key of an archived notification body: `messages/{inference_id}.json`.
pub fn message_key(inference_id: &str) -> String {
    format!("{MESSAGE_KEY_PREFIX}{inference_id}.json")
}
