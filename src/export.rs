//! Export pipeline: canvas raster → downscaled, compressed image bytes.
//!
//! DESIGN
//! ======
//! 1. `rasterize` copies the surface so drawing can continue while the
//!    export runs.
//! 2. `compress` fits the image inside `max_dimension` (never upscaling),
//!    encodes it, then walks the quality down and, once at the floor,
//!    shrinks the image until the output fits `max_bytes` or the iteration
//!    limit is hit. The smallest encoding seen is returned.
//! 3. `export` runs `compress` on the blocking pool when `offload` is set.

use std::path::{Path, PathBuf};

use canvas::{CanvasGeometry, Surface};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use tracing::{debug, warn};

/// 0.1 MiB, in bytes.
pub const DEFAULT_MAX_BYTES: usize = 104_857;
pub const DEFAULT_INITIAL_QUALITY: u8 = 90;
pub const DEFAULT_MIN_QUALITY: u8 = 10;
pub const DEFAULT_QUALITY_STEP: u8 = 10;
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;
pub const DEFAULT_SHRINK_RATIO: f64 = 0.8;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The raster has no pixels, so there is nothing to send.
    #[error("canvas has no pixels to export")]
    EmptyCanvas,
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("export task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Lossy; quality is lowered to meet the byte budget.
    #[default]
    Jpeg,
    /// Lossless; only downscaling reduces size.
    WebP,
}

impl ExportFormat {
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Whether the encoder has a quality knob.
    #[must_use]
    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg)
    }
}

/// Size and encoding limits applied to every submitted drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPolicy {
    /// Upper bound on encoded size, in bytes.
    pub max_bytes: usize,
    /// Upper bound on the longer side of the output, in pixels.
    pub max_dimension: u32,
    pub format: ExportFormat,
    /// Encode on the blocking thread pool instead of the calling task.
    pub offload: bool,
    /// JPEG quality of the first attempt (1–100).
    pub initial_quality: u8,
    /// Quality floor before the image starts shrinking.
    pub min_quality: u8,
    pub quality_step: u8,
    /// Re-encode attempts after the first.
    pub max_iterations: u32,
    /// Per-side scale applied on each shrink step.
    pub shrink_ratio: f64,
}

impl Default for ExportPolicy {
    fn default() -> Self {
        Self::for_geometry(&CanvasGeometry::default())
    }
}

impl ExportPolicy {
    /// Default policy for a canvas: output no wider or taller than half its width.
    #[must_use]
    pub fn for_geometry(geometry: &CanvasGeometry) -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            max_dimension: (geometry.logical_width / 2).max(1),
            format: ExportFormat::default(),
            offload: true,
            initial_quality: DEFAULT_INITIAL_QUALITY,
            min_quality: DEFAULT_MIN_QUALITY,
            quality_step: DEFAULT_QUALITY_STEP,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            shrink_ratio: DEFAULT_SHRINK_RATIO,
        }
    }
}

/// An encoded drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub format: ExportFormat,
    pub width: u32,
    pub height: u32,
    /// JPEG quality used, `None` for lossless output.
    pub quality: Option<u8>,
}

impl EncodedImage {
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `path` with this image's file extension added when it has none.
    #[must_use]
    pub fn save_path(&self, path: &Path) -> PathBuf {
        if path.extension().is_some() {
            path.to_path_buf()
        } else {
            path.with_extension(self.format.extension())
        }
    }
}

/// Copy the surface raster for export.
///
/// # Errors
///
/// Returns [`ExportError::EmptyCanvas`] when the raster has a zero dimension.
pub fn rasterize(surface: &Surface) -> Result<RgbaImage, ExportError> {
    if surface.geometry().is_empty() {
        return Err(ExportError::EmptyCanvas);
    }
    Ok(surface.snapshot())
}

/// Resize and encode `image` under `policy`.
///
/// # Errors
///
/// Returns [`ExportError::EmptyCanvas`] for a zero-sized image and
/// [`ExportError::Encode`] if the encoder fails.
pub fn compress(image: RgbaImage, policy: &ExportPolicy) -> Result<EncodedImage, ExportError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(ExportError::EmptyCanvas);
    }

    // Flatten first; neither output carries alpha and the raster is opaque.
    let mut rgb = fit_within(DynamicImage::ImageRgba8(image).into_rgb8(), policy.max_dimension);
    let mut quality = policy.initial_quality.clamp(1, 100);
    let mut best = encode(&rgb, policy.format, quality)?;
    let mut last_len = best.len();

    let mut iteration = 0;
    while last_len > policy.max_bytes && iteration < policy.max_iterations {
        iteration += 1;
        if policy.format.is_lossy() && quality > policy.min_quality {
            quality = quality.saturating_sub(policy.quality_step.max(1)).max(policy.min_quality.max(1));
        } else {
            let Some(smaller) = shrink(&rgb, policy.shrink_ratio) else {
                break;
            };
            rgb = smaller;
        }

        let next = encode(&rgb, policy.format, quality)?;
        debug!(iteration, len = next.len(), quality, width = next.width, height = next.height, "export: re-encoded");
        last_len = next.len();
        if next.len() < best.len() {
            best = next;
        }
    }

    if best.len() > policy.max_bytes {
        warn!(len = best.len(), max = policy.max_bytes, "export: output still over budget");
    }
    Ok(best)
}

/// [`compress`], on the blocking pool when `policy.offload` is set.
///
/// # Errors
///
/// Same as [`compress`], plus [`ExportError::Join`] if the blocking task panics.
pub async fn export(image: RgbaImage, policy: &ExportPolicy) -> Result<EncodedImage, ExportError> {
    if !policy.offload {
        return compress(image, policy);
    }
    let policy = policy.clone();
    tokio::task::spawn_blocking(move || compress(image, &policy)).await?
}

/// Downscale so the longer side is at most `max_dimension`. Never upscales.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fit_within(image: RgbImage, max_dimension: u32) -> RgbImage {
    let (w, h) = image.dimensions();
    let longest = w.max(h);
    if max_dimension == 0 || longest <= max_dimension {
        return image;
    }
    let scale = f64::from(max_dimension) / f64::from(longest);
    let nw = ((f64::from(w) * scale).round() as u32).clamp(1, max_dimension);
    let nh = ((f64::from(h) * scale).round() as u32).clamp(1, max_dimension);
    imageops::resize(&image, nw, nh, FilterType::Triangle)
}

/// Scale both sides by `ratio`. `None` once the image cannot get smaller.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn shrink(image: &RgbImage, ratio: f64) -> Option<RgbImage> {
    let (w, h) = image.dimensions();
    let ratio = if ratio > 0.0 && ratio < 1.0 { ratio } else { DEFAULT_SHRINK_RATIO };
    let nw = ((f64::from(w) * ratio).floor() as u32).max(1);
    let nh = ((f64::from(h) * ratio).floor() as u32).max(1);
    if (nw, nh) == (w, h) {
        return None;
    }
    Some(imageops::resize(image, nw, nh, FilterType::Triangle))
}

fn encode(image: &RgbImage, format: ExportFormat, quality: u8) -> Result<EncodedImage, ExportError> {
    let (width, height) = image.dimensions();
    let mut bytes = Vec::new();
    match format {
        ExportFormat::Jpeg => {
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, quality).write_image(
                image.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
        ExportFormat::WebP => {
            image::codecs::webp::WebPEncoder::new_lossless(&mut bytes).write_image(
                image.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
    }
    Ok(EncodedImage { bytes, format, width, height, quality: format.is_lossy().then_some(quality) })
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
