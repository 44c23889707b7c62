#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Orders detected stepping stones into a traversable jump path.
//!
//! The course reads bottom-to-top: stones lower in the image come first, and
//! stones sharing a row (within a small tolerance) read left-to-right. When
//! the map yields no stones at all, a deterministic synthetic zig-zag keeps
//! the game playable.

use std::cmp::Ordering;

use quiz_trail_core::{Blob, Pose, Position, ProgressTrack};

/// Vertical distance within which two stones count as the same row.
const ROW_TOLERANCE_PX: f32 = 2.0;

const FALLBACK_START_Y: f32 = 940.0;
const FALLBACK_STEP_Y: f32 = 140.0;
const FALLBACK_SIDE_OFFSET: f32 = 180.0;

/// Ordered sequence of stepping-stone waypoints, never empty.
#[derive(Clone, Debug, PartialEq)]
pub struct WaypointPath {
    points: Vec<Position>,
}

impl WaypointPath {
    /// Creates a path from pre-ordered points; `None` when no points exist.
    #[must_use]
    pub fn from_points(points: Vec<Position>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self { points })
    }

    /// Number of waypoints along the path.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.points.len() as u32
    }

    /// Whether the path holds no waypoints; always false by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Waypoint at the provided index, clamped to the final waypoint.
    ///
    /// The path never extrapolates: every index past the end answers with
    /// the last stone.
    #[must_use]
    pub fn at(&self, index: u32) -> Position {
        let clamped = (index as usize).min(self.points.len() - 1);
        self.points[clamped]
    }
}

/// Orders blob centroids into a jump path; `None` when no blobs exist.
///
/// Primary key is descending centroid Y (lower stones first), with ties
/// inside the row tolerance broken by ascending X.
#[must_use]
pub fn build_path(blobs: &[Blob]) -> Option<WaypointPath> {
    let mut points: Vec<Position> = blobs
        .iter()
        .map(|blob| Position::new(blob.centroid_x(), blob.centroid_y()))
        .collect();

    points.sort_by(compare_waypoints);
    WaypointPath::from_points(points)
}

fn compare_waypoints(a: &Position, b: &Position) -> Ordering {
    if (a.y() - b.y()).abs() > ROW_TOLERANCE_PX {
        b.y().total_cmp(&a.y())
    } else {
        a.x().total_cmp(&b.x())
    }
}

/// Deterministic zig-zag generator used when no stones were detected.
///
/// Pure function of the index and unbounded: even indices sit left of the
/// center line, odd indices right, each step climbing by a fixed amount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyntheticPath {
    center_x: f32,
    start_y: f32,
    step_y: f32,
    side_offset: f32,
}

impl SyntheticPath {
    /// Creates a generator with explicit geometry.
    #[must_use]
    pub const fn new(center_x: f32, start_y: f32, step_y: f32, side_offset: f32) -> Self {
        Self {
            center_x,
            start_y,
            step_y,
            side_offset,
        }
    }

    /// Generator matching the leaf map's proportions for a viewport width.
    #[must_use]
    pub const fn for_viewport(viewport_width: f32) -> Self {
        Self::new(
            viewport_width / 2.0,
            FALLBACK_START_Y,
            FALLBACK_STEP_Y,
            FALLBACK_SIDE_OFFSET,
        )
    }

    /// Waypoint generated for the provided index.
    #[must_use]
    pub fn waypoint(&self, index: u32) -> Position {
        let y = self.start_y - index as f32 * self.step_y;
        let x = if index % 2 == 0 {
            self.center_x - self.side_offset
        } else {
            self.center_x + self.side_offset
        };
        Position::new(x, y)
    }
}

/// Physical course of the leaf-jump game.
///
/// Wraps either a path detected from the map artwork or the synthetic
/// fallback, and translates logical progress indices into jump targets.
#[derive(Clone, Debug)]
pub struct LeafCourse {
    kind: CourseKind,
}

#[derive(Clone, Debug)]
enum CourseKind {
    Detected(WaypointPath),
    Synthetic(SyntheticPath),
}

impl LeafCourse {
    /// Builds the course from extracted blobs, falling back when none exist.
    #[must_use]
    pub fn from_blobs(blobs: &[Blob], fallback: SyntheticPath) -> Self {
        match build_path(blobs) {
            Some(path) => Self {
                kind: CourseKind::Detected(path),
            },
            None => Self {
                kind: CourseKind::Synthetic(fallback),
            },
        }
    }

    /// Builds the course directly from an already-ordered waypoint path.
    #[must_use]
    pub fn from_path(path: WaypointPath) -> Self {
        Self {
            kind: CourseKind::Detected(path),
        }
    }

    /// Whether the course came from detected map stones.
    #[must_use]
    pub fn is_detected(&self) -> bool {
        matches!(self.kind, CourseKind::Detected(_))
    }

    /// Detected waypoints, when the map produced any.
    #[must_use]
    pub fn waypoints(&self) -> Option<&WaypointPath> {
        match &self.kind {
            CourseKind::Detected(path) => Some(path),
            CourseKind::Synthetic(_) => None,
        }
    }
}

impl ProgressTrack for LeafCourse {
    fn pose_at(&self, index: u32) -> Pose {
        let position = match &self.kind {
            CourseKind::Detected(path) => path.at(index),
            CourseKind::Synthetic(synthetic) => synthetic.waypoint(index),
        };
        Pose::new(position, 0.0)
    }

    fn slot_count(&self) -> Option<u32> {
        match &self.kind {
            CourseKind::Detected(path) => Some(path.len()),
            CourseKind::Synthetic(_) => None,
        }
    }
}
