//! Blob extraction over synthetic raster maps.

use quiz_trail_system_vision::{extract_blobs, BlobFilter, RasterImage};

const STONE_GREEN: [u8; 4] = [40, 190, 60, 255];
const SKY_BLUE: [u8; 4] = [120, 170, 230, 255];

fn paint(width: u32, height: u32, mut pixel: impl FnMut(u32, u32) -> [u8; 4]) -> Vec<u8> {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&pixel(x, y));
        }
    }
    data
}

fn square(x: u32, y: u32, left: u32, top: u32, side: u32) -> bool {
    x >= left && x < left + side && y >= top && y < top + side
}

#[test]
fn image_without_markers_yields_no_blobs() {
    let data = paint(64, 64, |_, _| SKY_BLUE);
    let image = RasterImage::new(64, 64, &data).expect("raster builds");

    let blobs = extract_blobs(&image, &BlobFilter::new(1, 0, 0, 0.0, 10.0));
    assert!(blobs.is_empty());
}

#[test]
fn solid_square_produces_one_centered_blob() {
    let data = paint(300, 300, |x, y| {
        if square(x, y, 100, 120, 100) {
            STONE_GREEN
        } else {
            SKY_BLUE
        }
    });
    let image = RasterImage::new(300, 300, &data).expect("raster builds");

    let blobs = extract_blobs(&image, &BlobFilter::leaf_stones());
    assert_eq!(blobs.len(), 1);

    let blob = blobs[0];
    assert_eq!(blob.pixel_count(), 10_000);
    assert!((blob.centroid_x() - 149.5).abs() < 0.01);
    assert!((blob.centroid_y() - 169.5).abs() < 0.01);
    assert!((blob.aspect_ratio() - 1.0).abs() < 0.01);
    assert_eq!(blob.min_x(), 100);
    assert_eq!(blob.max_x(), 199);
    assert_eq!(blob.min_y(), 120);
    assert_eq!(blob.max_y(), 219);
}

#[test]
fn separate_squares_produce_separate_blobs() {
    let data = paint(400, 400, |x, y| {
        if square(x, y, 20, 260, 100) || square(x, y, 250, 40, 100) {
            STONE_GREEN
        } else {
            SKY_BLUE
        }
    });
    let image = RasterImage::new(400, 400, &data).expect("raster builds");

    let blobs = extract_blobs(&image, &BlobFilter::leaf_stones());
    assert_eq!(blobs.len(), 2);
}

#[test]
fn undersized_components_are_filtered_out() {
    let data = paint(200, 200, |x, y| {
        if square(x, y, 50, 50, 20) {
            STONE_GREEN
        } else {
            SKY_BLUE
        }
    });
    let image = RasterImage::new(200, 200, &data).expect("raster builds");

    let blobs = extract_blobs(&image, &BlobFilter::leaf_stones());
    assert!(blobs.is_empty());
}

#[test]
fn wide_stripe_fails_the_aspect_gate() {
    let data = paint(500, 200, |_, y| {
        if (40..140).contains(&y) {
            STONE_GREEN
        } else {
            SKY_BLUE
        }
    });
    let image = RasterImage::new(500, 200, &data).expect("raster builds");

    let blobs = extract_blobs(&image, &BlobFilter::leaf_stones());
    assert!(blobs.is_empty(), "a full-width stripe is not a stepping stone");
}

#[test]
fn diagonal_touch_does_not_connect_components() {
    let filter = BlobFilter::new(1, 0, 0, 0.0, 100.0);
    let data = paint(4, 4, |x, y| {
        if (x, y) == (1, 1) || (x, y) == (2, 2) {
            STONE_GREEN
        } else {
            SKY_BLUE
        }
    });
    let image = RasterImage::new(4, 4, &data).expect("raster builds");

    let blobs = extract_blobs(&image, &filter);
    assert_eq!(blobs.len(), 2, "4-connectivity must not bridge diagonals");
}
