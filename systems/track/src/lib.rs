#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Train-track geometry: spline evaluation and arc-length sampling.
//!
//! The track is a fixed Catmull-Rom spline authored in design-space
//! coordinates and scaled to the viewport once at boot. Car placement works
//! in arc-length space: a [`RailSample`] table converts a walked distance
//! into a position and facing angle, wrapping around the loop or
//! extrapolating past the visible ends as the caller requires.

use glam::Vec2;
use quiz_trail_core::{Pose, Position, ProgressTrack};

/// Width of the design space the track points were authored in.
pub const TRACK_DESIGN_WIDTH: f32 = 750.0;
/// Height of the design space the track points were authored in.
pub const TRACK_DESIGN_HEIGHT: f32 = 1334.0;

/// Authored control points of the train track, top of the map downward.
const TRACK_DESIGN_POINTS: [(f32, f32); 10] = [
    (405.0, 10.0),
    (455.0, 85.0),
    (515.0, 200.0),
    (485.0, 360.0),
    (375.0, 540.0),
    (250.0, 740.0),
    (220.0, 920.0),
    (270.0, 1100.0),
    (325.0, 1185.0),
    (505.0, 1325.0),
];

/// Distance between arc-length table samples, in design pixels.
const RAIL_SAMPLE_EVERY_PX: f32 = 20.0;
/// Minimum number of arc-length table segments regardless of track size.
const RAIL_SAMPLE_FLOOR: usize = 60;
/// Subdivisions used when integrating the spline's arc length.
const ARC_LENGTH_STEPS: usize = 200;

/// Smooth curve through a fixed list of control points.
///
/// Catmull-Rom interpolation with clamped ends: the curve passes through
/// every control point, starts exactly at the first and ends exactly at the
/// last, and is C¹ continuous in between.
#[derive(Clone, Debug)]
pub struct Spline {
    points: Vec<Vec2>,
}

impl Spline {
    /// Creates a spline through the provided points; `None` below 2 points.
    #[must_use]
    pub fn through(points: Vec<Vec2>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        Some(Self { points })
    }

    /// Control points the spline interpolates.
    #[must_use]
    pub fn control_points(&self) -> &[Vec2] {
        &self.points
    }

    /// Point on the curve for `t` in `[0, 1]`; inputs outside clamp.
    #[must_use]
    pub fn point_at(&self, t: f32) -> Vec2 {
        let (segment, u) = self.locate(t);
        let [p0, p1, p2, p3] = self.segment_controls(segment);

        0.5 * ((2.0 * p1)
            + (p2 - p0) * u
            + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * (u * u)
            + (3.0 * p1 - p0 - 3.0 * p2 + p3) * (u * u * u))
    }

    /// Unit tangent of the curve for `t` in `[0, 1]`; inputs outside clamp.
    #[must_use]
    pub fn tangent_at(&self, t: f32) -> Vec2 {
        let (segment, u) = self.locate(t);
        let [p0, p1, p2, p3] = self.segment_controls(segment);

        let derivative = 0.5
            * ((p2 - p0)
                + 2.0 * (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * u
                + 3.0 * (3.0 * p1 - p0 - 3.0 * p2 + p3) * (u * u));

        let unit = derivative.normalize_or_zero();
        if unit == Vec2::ZERO {
            // Coincident control points; fall back to the chord direction.
            (self.points[segment + 1] - self.points[segment]).normalize_or_zero()
        } else {
            unit
        }
    }

    /// Approximate curve length by fine sampling.
    #[must_use]
    pub fn arc_length(&self) -> f32 {
        let mut length = 0.0;
        let mut previous = self.point_at(0.0);
        for step in 1..=ARC_LENGTH_STEPS {
            let t = step as f32 / ARC_LENGTH_STEPS as f32;
            let current = self.point_at(t);
            length += previous.distance(current);
            previous = current;
        }
        length
    }

    fn locate(&self, t: f32) -> (usize, f32) {
        let segments = self.points.len() - 1;
        let scaled = t.clamp(0.0, 1.0) * segments as f32;
        let segment = (scaled.floor() as usize).min(segments - 1);
        (segment, scaled - segment as f32)
    }

    fn segment_controls(&self, segment: usize) -> [Vec2; 4] {
        let last = self.points.len() - 1;
        [
            self.points[segment.saturating_sub(1)],
            self.points[segment],
            self.points[segment + 1],
            self.points[(segment + 2).min(last)],
        ]
    }
}

/// Builds the authored train track scaled to the provided viewport.
#[must_use]
pub fn track_for_viewport(viewport_width: f32, viewport_height: f32) -> Spline {
    let scale_x = viewport_width / TRACK_DESIGN_WIDTH;
    let scale_y = viewport_height / TRACK_DESIGN_HEIGHT;
    let points = TRACK_DESIGN_POINTS
        .iter()
        .map(|&(x, y)| Vec2::new(x * scale_x, y * scale_y))
        .collect();

    // The authored table always holds at least two points.
    Spline::through(points).unwrap_or_else(|| Spline {
        points: vec![Vec2::ZERO, Vec2::ONE],
    })
}

/// Precomputed arc-length table over a spline.
#[derive(Clone, Debug)]
pub struct RailSample {
    points: Vec<Vec2>,
    cumulative: Vec<f32>,
}

impl RailSample {
    /// Samples the spline into an arc-length table.
    ///
    /// The sample count scales with curve length at roughly one sample per
    /// 20 design pixels, never below 60 segments.
    #[must_use]
    pub fn from_spline(spline: &Spline) -> Self {
        let length = spline.arc_length();
        let segments = ((length / RAIL_SAMPLE_EVERY_PX).round() as usize).max(RAIL_SAMPLE_FLOOR);

        let mut points = Vec::with_capacity(segments + 1);
        for step in 0..=segments {
            let t = step as f32 / segments as f32;
            points.push(spline.point_at(t));
        }

        let mut cumulative = Vec::with_capacity(points.len());
        cumulative.push(0.0);
        let mut total = 0.0;
        for pair in points.windows(2) {
            total += pair[0].distance(pair[1]);
            cumulative.push(total);
        }

        Self { points, cumulative }
    }

    /// Total arc length covered by the table.
    #[must_use]
    pub fn total_length(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Cumulative lengths at each table point, starting at zero.
    #[must_use]
    pub fn cumulative_lengths(&self) -> &[f32] {
        &self.cumulative
    }

    /// Converts a walked distance into a position and facing angle.
    ///
    /// With `wrap` the distance is reduced modulo the total length, always
    /// positive, producing a cyclic course. Without it, distances outside
    /// `[0, total]` extrapolate linearly along the tangent at the nearest
    /// endpoint so a train can roll smoothly past the visible track.
    #[must_use]
    pub fn sample_by_distance(&self, distance: f32, wrap: bool) -> Pose {
        let total = self.total_length();
        if self.points.len() < 2 || total <= 0.0 {
            return Pose::new(Position::new(0.0, 0.0), 0.0);
        }

        let distance = if wrap {
            distance.rem_euclid(total)
        } else if distance < 0.0 {
            return self.extrapolate_before(distance);
        } else if distance > total {
            return self.extrapolate_after(distance - total);
        } else {
            distance
        };

        let mut remaining = distance;
        let mut segment = 0;
        while segment < self.segment_count() - 1 && remaining > self.segment_length(segment) {
            remaining -= self.segment_length(segment);
            segment += 1;
        }

        let start = self.points[segment];
        let end = self.points[segment + 1];
        let segment_length = self.segment_length(segment);
        let ratio = if segment_length > 0.0 {
            (remaining / segment_length).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let position = start.lerp(end, ratio);
        let direction = end - start;
        Pose::new(
            Position::new(position.x, position.y),
            direction.y.atan2(direction.x),
        )
    }

    fn extrapolate_before(&self, distance: f32) -> Pose {
        let direction = (self.points[1] - self.points[0]).normalize_or_zero();
        let position = self.points[0] + direction * distance;
        Pose::new(
            Position::new(position.x, position.y),
            direction.y.atan2(direction.x),
        )
    }

    fn extrapolate_after(&self, overshoot: f32) -> Pose {
        let last = self.points.len() - 1;
        let direction = (self.points[last] - self.points[last - 1]).normalize_or_zero();
        let position = self.points[last] + direction * overshoot;
        Pose::new(
            Position::new(position.x, position.y),
            direction.y.atan2(direction.x),
        )
    }

    fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    fn segment_length(&self, segment: usize) -> f32 {
        self.cumulative[segment + 1] - self.cumulative[segment]
    }
}

/// Rigid chain of cars following a lead distance along the rails.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainFormation {
    car_count: u32,
    gap: f32,
}

impl TrainFormation {
    /// Creates a formation with the provided car count and spacing.
    #[must_use]
    pub const fn new(car_count: u32, gap: f32) -> Self {
        Self { car_count, gap }
    }

    /// Number of cars in the formation.
    #[must_use]
    pub const fn car_count(&self) -> u32 {
        self.car_count
    }

    /// Distance held between consecutive cars.
    #[must_use]
    pub const fn gap(&self) -> f32 {
        self.gap
    }

    /// Poses of every car for the provided lead distance.
    ///
    /// Each car samples independently at `lead − i·gap`; no clamping is
    /// applied between cars, so spacing tuning is the caller's concern.
    #[must_use]
    pub fn positions(&self, rail: &RailSample, lead_distance: f32, wrap: bool) -> Vec<Pose> {
        (0..self.car_count)
            .map(|car| rail.sample_by_distance(lead_distance - car as f32 * self.gap, wrap))
            .collect()
    }
}

/// Discrete car slots along the track, one per unlockable car.
///
/// Slots sit at uniform parameter steps along the spline, facing the next
/// slot, which is how the train reads while parked between questions.
#[derive(Clone, Debug)]
pub struct TrackLayout {
    slots: Vec<Pose>,
}

impl TrackLayout {
    /// Lays out `car_count` slots along the spline.
    #[must_use]
    pub fn new(spline: &Spline, car_count: u32) -> Self {
        let count = car_count.max(1) as usize;
        let denominator = (count - 1).max(1) as f32;

        let points: Vec<Vec2> = (0..count)
            .map(|slot| spline.point_at(slot as f32 / denominator))
            .collect();

        let slots = (0..count)
            .map(|slot| {
                let current = points[slot];
                let toward = if slot + 1 < count {
                    points[slot + 1] - current
                } else if slot > 0 {
                    current - points[slot - 1]
                } else {
                    Vec2::X
                };
                Pose::new(
                    Position::new(current.x, current.y),
                    toward.y.atan2(toward.x),
                )
            })
            .collect();

        Self { slots }
    }
}

impl ProgressTrack for TrackLayout {
    fn pose_at(&self, index: u32) -> Pose {
        let clamped = (index as usize).min(self.slots.len() - 1);
        self.slots[clamped]
    }

    fn slot_count(&self) -> Option<u32> {
        Some(self.slots.len() as u32)
    }
}
