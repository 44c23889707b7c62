#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure vision system that finds stepping-stone regions in a raster map.
//!
//! The map artwork paints each stepping stone in a saturated green band; the
//! extractor classifies pixels by hue, grows 4-connected components with an
//! explicit stack, and keeps only components that look like stones. Callers
//! own the pixel data; the extractor borrows it for a single pass.

use quiz_trail_core::Blob;
use thiserror::Error;

const MARKER_HUE_MIN: f32 = 70.0;
const MARKER_HUE_MAX: f32 = 150.0;
const MARKER_SATURATION_MIN: f32 = 0.35;

/// Errors raised when a raster view cannot be constructed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    /// The raster described an empty area.
    #[error("raster dimensions {width}x{height} describe an empty image")]
    EmptyDimensions {
        /// Width supplied by the caller.
        width: u32,
        /// Height supplied by the caller.
        height: u32,
    },
    /// The pixel buffer does not match the declared dimensions.
    #[error("raster byte length {actual} does not match {width}x{height} RGBA ({expected})")]
    LengthMismatch {
        /// Width supplied by the caller.
        width: u32,
        /// Height supplied by the caller.
        height: u32,
        /// Byte length the dimensions require.
        expected: usize,
        /// Byte length actually supplied.
        actual: usize,
    },
}

/// Borrowed view over a decoded RGBA8 image.
#[derive(Clone, Copy, Debug)]
pub struct RasterImage<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> RasterImage<'a> {
    /// Creates a raster view, validating dimensions against the buffer.
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyDimensions { width, height });
        }

        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(RasterError::LengthMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width of the raster in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the raster in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    fn rgb_at(&self, pixel_index: usize) -> (u8, u8, u8) {
        let offset = pixel_index * 4;
        (
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        )
    }
}

/// Classifies a pixel as a path marker by hue and saturation.
///
/// True iff the hue falls in the green band [70°, 150°] and the saturation
/// is at least 0.35. Grayscale pixels never classify as markers.
#[must_use]
pub fn is_marker_pixel(r: u8, g: u8, b: u8) -> bool {
    let r = f32::from(r) / 255.0;
    let g = f32::from(g) / 255.0;
    let b = f32::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    if delta == 0.0 {
        return false;
    }

    let hue = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    } * 60.0;

    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    (MARKER_HUE_MIN..=MARKER_HUE_MAX).contains(&hue) && saturation >= MARKER_SATURATION_MIN
}

/// Acceptance thresholds applied to each connected component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlobFilter {
    min_pixel_count: u32,
    min_width: u32,
    min_height: u32,
    aspect_min: f32,
    aspect_max: f32,
}

impl BlobFilter {
    /// Creates a new filter with explicit thresholds.
    ///
    /// The aspect bounds are exclusive; width and height are measured as
    /// the coordinate span between bounding-box extremes.
    #[must_use]
    pub const fn new(
        min_pixel_count: u32,
        min_width: u32,
        min_height: u32,
        aspect_min: f32,
        aspect_max: f32,
    ) -> Self {
        Self {
            min_pixel_count,
            min_width,
            min_height,
            aspect_min,
            aspect_max,
        }
    }

    /// Thresholds tuned for the leaf map artwork.
    #[must_use]
    pub const fn leaf_stones() -> Self {
        Self::new(4_500, 90, 90, 0.6, 1.7)
    }

    fn accepts(&self, blob: &Blob) -> bool {
        if blob.pixel_count() < self.min_pixel_count {
            return false;
        }

        let width = blob.bounding_width();
        let height = blob.bounding_height();
        if width < self.min_width || height < self.min_height {
            return false;
        }

        let aspect = blob.aspect_ratio();
        aspect > self.aspect_min && aspect < self.aspect_max
    }
}

impl Default for BlobFilter {
    fn default() -> Self {
        Self::leaf_stones()
    }
}

/// Finds every marker component in the raster that passes the filter.
///
/// Single pass over the image: each pixel is visited exactly once, with an
/// explicit stack instead of recursion so large maps cannot exhaust the call
/// stack. Components that fail the filter are discarded; a raster with no
/// marker pixels yields an empty list.
#[must_use]
pub fn extract_blobs(image: &RasterImage<'_>, filter: &BlobFilter) -> Vec<Blob> {
    let width = image.width() as usize;
    let height = image.height() as usize;

    let mut visited = vec![false; width * height];
    let mut stack: Vec<usize> = Vec::new();
    let mut blobs = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let index = y * width + x;
            if visited[index] {
                continue;
            }

            let (r, g, b) = image.rgb_at(index);
            if !is_marker_pixel(r, g, b) {
                visited[index] = true;
                continue;
            }

            let blob = grow_component(image, &mut visited, &mut stack, index, width);
            if filter.accepts(&blob) {
                blobs.push(blob);
            }
        }
    }

    blobs
}

fn grow_component(
    image: &RasterImage<'_>,
    visited: &mut [bool],
    stack: &mut Vec<usize>,
    seed: usize,
    width: usize,
) -> Blob {
    let mut sum_x: u64 = 0;
    let mut sum_y: u64 = 0;
    let mut count: u32 = 0;
    let mut min_x = u32::MAX;
    let mut max_x = 0u32;
    let mut min_y = u32::MAX;
    let mut max_y = 0u32;

    visited[seed] = true;
    stack.push(seed);

    while let Some(current) = stack.pop() {
        let cy = (current / width) as u32;
        let cx = (current % width) as u32;

        sum_x += u64::from(cx);
        sum_y += u64::from(cy);
        count += 1;
        min_x = min_x.min(cx);
        max_x = max_x.max(cx);
        min_y = min_y.min(cy);
        max_y = max_y.max(cy);

        for neighbor in neighbors(current, width, visited.len()) {
            if visited[neighbor] {
                continue;
            }

            visited[neighbor] = true;
            let (r, g, b) = image.rgb_at(neighbor);
            if is_marker_pixel(r, g, b) {
                stack.push(neighbor);
            }
        }
    }

    let centroid_x = sum_x as f32 / count as f32;
    let centroid_y = sum_y as f32 / count as f32;
    Blob::new(centroid_x, centroid_y, count, min_x, max_x, min_y, max_y)
}

fn neighbors(index: usize, width: usize, len: usize) -> impl Iterator<Item = usize> {
    let column = index % width;
    let mut candidates = [None; 4];
    let mut count = 0;

    if column > 0 {
        candidates[count] = Some(index - 1);
        count += 1;
    }

    if column + 1 < width {
        candidates[count] = Some(index + 1);
        count += 1;
    }

    if index >= width {
        candidates[count] = Some(index - width);
        count += 1;
    }

    if index + width < len {
        candidates[count] = Some(index + width);
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}
