//! Pixel-grid to PNG conversion.
//!
//! The inference endpoint emits every image as a row-major grid of `[r, g, b]`
//! triples. PNG is lossless, so decoding the file again yields exactly the
//! same triples.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use serde::Deserialize;

use crate::error::DecodeError;

/// Content type of stored images.
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// One pixel as emitted by the endpoint.
pub type RgbTriple = [u8; 3];

/// Row-major pixel grid: `grid[y][x]`.
pub type PixelGrid = Vec<Vec<RgbTriple>>;

/// Deserialize one `generated_images` entry.
pub fn grid_from_value(value: &serde_json::Value) -> Result<PixelGrid, DecodeError> {
    PixelGrid::deserialize(value).map_err(DecodeError::InvalidEntry)
}

/// Validate that `grid` is a non-empty rectangle and return `(width, height)`.
pub fn grid_dimensions(grid: &[Vec<RgbTriple>]) -> Result<(u32, u32), DecodeError> {
    let first = grid.first().ok_or(DecodeError::EmptyGrid)?;
    let width = first.len();
    if width == 0 {
        return Err(DecodeError::EmptyRow);
    }

    if let Some((row, found)) = grid
        .iter()
        .enumerate()
        .find_map(|(i, r)| (r.len() != width).then_some((i, r.len())))
    {
        return Err(DecodeError::RaggedRow {
            row,
            expected: width,
            found,
        });
    }

    let too_large = || DecodeError::TooLarge {
        width,
        height: grid.len(),
    };
    let w = u32::try_from(width).map_err(|_| too_large())?;
    let h = u32::try_from(grid.len()).map_err(|_| too_large())?;
    Ok((w, h))
}

/// Encode a pixel grid as PNG bytes.
///
/// Ragged grids are rejected before any pixel is written.
pub fn encode_png(grid: &[Vec<RgbTriple>]) -> Result<Vec<u8>, DecodeError> {
    let (width, height) = grid_dimensions(grid)?;

    let mut canvas = RgbImage::new(width, height);
    for (y, row) in (0u32..).zip(grid) {
        for (x, pixel) in (0u32..).zip(row) {
            canvas.put_pixel(x, y, Rgb(*pixel));
        }
    }

    let mut png = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// Read PNG bytes back into a pixel grid.
pub fn decode_png(bytes: &[u8]) -> Result<PixelGrid, DecodeError> {
    let rgb = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgb8();
    Ok(rgb
        .rows()
        .map(|row| row.map(|pixel| pixel.0).collect())
        .collect())
}
