/*!
FAST corner detection for 8 bit grayscale images.

Corners are found with the segment test of Rosten and Drummond, "Machine Learning for High Speed
Corner Detection" (ECCV 2006): a pixel is a corner if a contiguous arc of at least `n` of the
16 pixels on a ring around it is entirely brighter or entirely darker than the center by more
than a barrier. Arc lengths 7 through 12 are supported.

The entry points per arc length (`detect_9`, `score_9`, `detect_and_suppress_9`, ...) mirror
the classic C interface; they are thin wrappers over `fast::detect`, `score::score_all` and
`nonmax::nonmax`, which take the arc length as an `ArcLength` value.

All corner lists are in row-major order (increasing y, then increasing x), so a consumer can
build a per-row lookup table over the result directly.
*/

pub mod error;
pub mod fast;
pub mod nonmax;
pub mod ring;
pub mod score;
pub mod util;

pub use error::FastError;
pub use fast::{detect, is_corner, ArcLength, RingState};
pub use nonmax::{nonmax, nonmax_by, nonmax_with_scores, NonMaximalSuppression};
pub use score::score;

use serde::{Deserialize, Serialize};

/// Integer pixel coordinate of a corner.
#[derive(Copy, Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FastPoint {
    pub x: u32,
    pub y: u32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FastConfig {
    /// Value to be exceeded.
    pub threshold: i32,

    /// Count of consecutive pixels
    pub count: ArcLength,

    /// Which non maximal suppression to apply.
    pub non_maximal_suppression: NonMaximalSuppression,
}

impl Default for FastConfig {
    fn default() -> Self {
        FastConfig {
            threshold: 20,
            count: ArcLength::N9,
            non_maximal_suppression: NonMaximalSuppression::MaxThreshold,
        }
    }
}

impl FastConfig {
    /// Parse a configuration from JSON, missing fields take their default.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Detect corners and apply the configured suppression.
pub fn detector(img: &image::GrayImage, config: &FastConfig) -> Result<Vec<FastPoint>, FastError> {
    let r = fast::detect(img, config.threshold, config.count)?;

    match config.non_maximal_suppression {
        NonMaximalSuppression::Off => Ok(r),
        measure => Ok(nonmax_by(img, &r, config.threshold, measure)?
            .into_iter()
            .map(|(p, _)| p)
            .collect()),
    }
}

/// Detect with `arc`, then keep the locally maximal corners.
pub fn detect_and_suppress(
    img: &image::GrayImage,
    barrier: i32,
    arc: ArcLength,
) -> Result<Vec<FastPoint>, FastError> {
    let r = fast::detect(img, barrier, arc)?;
    nonmax(img, &r, barrier)
}

macro_rules! arc_entry_points {
    ($(($n:literal, $arc:ident, $detect:ident, $score:ident, $detect_and_suppress:ident)),* $(,)?) => {
        $(
            #[doc = concat!("Corners with at least ", $n, " contiguous ring samples of one polarity.")]
            pub fn $detect(img: &image::GrayImage, barrier: i32) -> Result<Vec<FastPoint>, FastError> {
                fast::detect(img, barrier, ArcLength::$arc)
            }

            #[doc = concat!("Exact ", $n, "-arc score of each point, in input order.")]
            pub fn $score(
                img: &image::GrayImage,
                points: &[FastPoint],
                barrier: i32,
            ) -> Result<Vec<i32>, FastError> {
                score::score_all(img, points, ArcLength::$arc, barrier)
            }

            #[doc = concat!("`", stringify!($detect), "` followed by `nonmax`.")]
            pub fn $detect_and_suppress(
                img: &image::GrayImage,
                barrier: i32,
            ) -> Result<Vec<FastPoint>, FastError> {
                detect_and_suppress(img, barrier, ArcLength::$arc)
            }
        )*
    };
}

arc_entry_points!(
    (7, N7, detect_7, score_7, detect_and_suppress_7),
    (8, N8, detect_8, score_8, detect_and_suppress_8),
    (9, N9, detect_9, score_9, detect_and_suppress_9),
    (10, N10, detect_10, score_10, detect_and_suppress_10),
    (11, N11, detect_11, score_11, detect_and_suppress_11),
    (12, N12, detect_12, score_12, detect_and_suppress_12),
);
