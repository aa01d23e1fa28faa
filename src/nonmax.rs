/*!
Non maximal suppression over the 8-connected neighbourhood.

A corner survives if it dominates every other corner of the input set that sits directly next to
it. Domination is a strict order: higher score wins, and on equal scores the smaller `(y, x)`
wins. Because the order is strict, two adjacent corners can never both survive, and running
the suppression on its own output returns it unchanged.
*/
use crate::error::{check_barrier, FastError};
use crate::fast::ArcLength;
use crate::score;
use crate::FastPoint;
use image::{GenericImageView, Luma};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Strength measure used to rank adjacent corners.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonMaximalSuppression {
    /// Keep every corner.
    Off,
    /// Highest barrier at which the point is still a 9-arc corner.
    #[default]
    MaxThreshold,
    /// Sum of absolute differences beyond the barrier.
    SumAbsolute,
}

#[inline]
fn dominates(a: (FastPoint, i32), b: (FastPoint, i32)) -> bool {
    a.1 > b.1 || (a.1 == b.1 && (a.0.y, a.0.x) < (b.0.y, b.0.x))
}

/// Suppress corners that already carry a score.
///
/// Survivors keep their input order.
pub fn suppress(scored: &[(FastPoint, i32)]) -> Vec<(FastPoint, i32)> {
    let index: HashMap<FastPoint, i32> = scored.iter().copied().collect();

    let mut res = vec![];
    'kpiter: for (kp, s) in scored.iter() {
        for dy in [-1i32, 0, 1] {
            for dx in [-1i32, 0, 1] {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (Some(zx), Some(zy)) = (kp.x.checked_add_signed(dx), kp.y.checked_add_signed(dy))
                else {
                    continue;
                };
                let z = FastPoint { x: zx, y: zy };
                // check if this keypoint exists.
                let Some(&other_score) = index.get(&z) else {
                    continue;
                };
                if !dominates((*kp, *s), (z, other_score)) {
                    continue 'kpiter;
                }
            }
        }
        res.push((*kp, *s));
    }
    res
}

/// Suppress adjacent corners ranked by `measure`, returning survivors with their scores.
///
/// With `NonMaximalSuppression::Off` every corner is returned, scored as for `MaxThreshold`.
pub fn nonmax_by(
    image: &dyn GenericImageView<Pixel = Luma<u8>>,
    corners: &[FastPoint],
    barrier: i32,
    measure: NonMaximalSuppression,
) -> Result<Vec<(FastPoint, i32)>, FastError> {
    check_barrier(barrier)?;
    let scores = match measure {
        NonMaximalSuppression::Off | NonMaximalSuppression::MaxThreshold => {
            score::score_all(image, corners, ArcLength::N9, barrier)?
        }
        NonMaximalSuppression::SumAbsolute => corners
            .iter()
            .map(|p| score::sum_absolute(image, *p, barrier))
            .collect::<Result<Vec<_>, _>>()?,
    };

    let scored: Vec<(FastPoint, i32)> = corners.iter().copied().zip(scores).collect();
    if measure == NonMaximalSuppression::Off {
        return Ok(scored);
    }

    let res = suppress(&scored);
    log::debug!(
        "non maximal suppression ({measure:?}) kept {} of {} corners",
        res.len(),
        corners.len()
    );
    Ok(res)
}

/// Locally maximal corners, in input order.
pub fn nonmax(
    image: &dyn GenericImageView<Pixel = Luma<u8>>,
    corners: &[FastPoint],
    barrier: i32,
) -> Result<Vec<FastPoint>, FastError> {
    Ok(nonmax_with_scores(image, corners, barrier)?
        .into_iter()
        .map(|(p, _)| p)
        .collect())
}

/// Locally maximal corners paired with their 9-arc score.
pub fn nonmax_with_scores(
    image: &dyn GenericImageView<Pixel = Luma<u8>>,
    corners: &[FastPoint],
    barrier: i32,
) -> Result<Vec<(FastPoint, i32)>, FastError> {
    nonmax_by(image, corners, barrier, NonMaximalSuppression::MaxThreshold)
}
