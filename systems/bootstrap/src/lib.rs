#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that assembles a playable course for a game mode.
//!
//! Boot happens once per run: the leaf map (when one was decoded) is mined
//! for stepping stones, or the authored train track is scaled to the
//! viewport, and the progression rules are derived from whatever course
//! came out of that.

use std::time::Duration;

use quiz_trail_core::{GameKind, GameRules, ProgressTrack, WrongAnswerPolicy};
use quiz_trail_system_pathing::{LeafCourse, SyntheticPath};
use quiz_trail_system_track::{track_for_viewport, RailSample, TrackLayout};
use quiz_trail_system_vision::{extract_blobs, BlobFilter, RasterImage};

/// Progress cap used when the synthetic leaf course has no natural end.
pub const DEFAULT_LEAF_PROGRESS_CAP: u32 = 12;
/// Number of cars the train must couple to win.
pub const TRAIN_CAR_COUNT: u32 = 11;
/// Points awarded per correct answer in either mode.
const CORRECT_POINTS: i64 = 1;
/// Points deducted per wrong answer in the leaf mode.
const LEAF_WRONG_POINTS: i64 = 1;
/// Clock penalty applied when a wrong answer resets the train.
const TRAIN_TIME_PENALTY: Duration = Duration::from_secs(15);

/// Dimensions of the viewport the course is laid out in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// Creates a new viewport description.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width of the viewport in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the viewport in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

/// Course and rules assembled for one game mode.
pub struct GameSetup {
    course: Box<dyn ProgressTrack>,
    rules: GameRules,
}

impl GameSetup {
    /// Physical course translating progress indices into poses.
    #[must_use]
    pub fn course(&self) -> &dyn ProgressTrack {
        self.course.as_ref()
    }

    /// Progression rules matched to the assembled course.
    #[must_use]
    pub const fn rules(&self) -> GameRules {
        self.rules
    }
}

/// Assembles the course and rules for the requested game mode.
///
/// The raster map only participates in the leaf mode; the train track is
/// fixed geometry and ignores it.
#[must_use]
pub fn assemble(kind: GameKind, map: Option<&RasterImage<'_>>, viewport: Viewport) -> GameSetup {
    match kind {
        GameKind::LeafHop => {
            let course = leaf_course(map, &BlobFilter::leaf_stones(), viewport);
            let rules = leaf_rules(&course);
            GameSetup {
                course: Box::new(course),
                rules,
            }
        }
        GameKind::TrainLink => {
            let course = train_course(viewport, TRAIN_CAR_COUNT);
            let rules = train_rules(TRAIN_CAR_COUNT);
            GameSetup {
                course: Box::new(course),
                rules,
            }
        }
    }
}

/// Builds the leaf course from an optional raster map.
#[must_use]
pub fn leaf_course(
    map: Option<&RasterImage<'_>>,
    filter: &BlobFilter,
    viewport: Viewport,
) -> LeafCourse {
    let fallback = SyntheticPath::for_viewport(viewport.width());
    match map {
        Some(image) => LeafCourse::from_blobs(&extract_blobs(image, filter), fallback),
        None => LeafCourse::from_blobs(&[], fallback),
    }
}

/// Builds the train course scaled to the viewport.
#[must_use]
pub fn train_course(viewport: Viewport, car_count: u32) -> TrackLayout {
    let spline = track_for_viewport(viewport.width(), viewport.height());
    TrackLayout::new(&spline, car_count)
}

/// Builds the arc-length table for animating a train along the viewport track.
#[must_use]
pub fn train_rail(viewport: Viewport) -> RailSample {
    RailSample::from_spline(&track_for_viewport(viewport.width(), viewport.height()))
}

fn leaf_rules(course: &LeafCourse) -> GameRules {
    let cap = match course.slot_count() {
        Some(slots) => slots.saturating_sub(1).max(1),
        None => DEFAULT_LEAF_PROGRESS_CAP,
    };
    GameRules::new(
        cap,
        CORRECT_POINTS,
        WrongAnswerPolicy::DeductPoints {
            points: LEAF_WRONG_POINTS,
        },
    )
}

fn train_rules(car_count: u32) -> GameRules {
    GameRules::new(
        car_count,
        CORRECT_POINTS,
        WrongAnswerPolicy::ResetProgress {
            time_penalty: TRAIN_TIME_PENALTY,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport::new(750.0, 1334.0);

    #[test]
    fn leaf_mode_without_a_map_uses_the_synthetic_course() {
        let setup = assemble(GameKind::LeafHop, None, VIEWPORT);

        assert_eq!(setup.course().slot_count(), None);
        assert_eq!(setup.rules().progress_cap(), DEFAULT_LEAF_PROGRESS_CAP);
        assert_eq!(
            setup.rules().wrong_answer(),
            WrongAnswerPolicy::DeductPoints { points: 1 }
        );
    }

    #[test]
    fn train_mode_lays_out_the_full_formation() {
        let setup = assemble(GameKind::TrainLink, None, VIEWPORT);

        assert_eq!(setup.course().slot_count(), Some(TRAIN_CAR_COUNT));
        assert_eq!(setup.rules().progress_cap(), TRAIN_CAR_COUNT);
        assert_eq!(
            setup.rules().wrong_answer(),
            WrongAnswerPolicy::ResetProgress {
                time_penalty: Duration::from_secs(15),
            }
        );
    }

    #[test]
    fn detected_stones_bound_the_leaf_progress_cap() {
        let data = stone_map(3);
        let image = RasterImage::new(300, 900, &data).expect("raster builds");
        let setup = assemble(GameKind::LeafHop, Some(&image), VIEWPORT);

        assert_eq!(setup.course().slot_count(), Some(3));
        assert_eq!(setup.rules().progress_cap(), 2);
    }

    fn stone_map(stones: u32) -> Vec<u8> {
        let width = 300u32;
        let height = 900u32;
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let stone_row = y / 300;
                let in_stone = stone_row < stones
                    && (100..200).contains(&x)
                    && (y % 300) >= 100
                    && (y % 300) < 200;
                if in_stone {
                    data.extend_from_slice(&[40, 190, 60, 255]);
                } else {
                    data.extend_from_slice(&[120, 170, 230, 255]);
                }
            }
        }
        data
    }
}
