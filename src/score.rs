/*!
Corner strength.

The score of a corner is the highest barrier for which the segment test still accepts it. For a
single arc of ring samples the test holds while the barrier is below the smallest deviation from
the center along that arc, so the score is the best such minimum over all arcs of both
polarities, minus one. That gives the exact value directly, without the bisection over the
barrier that a decision tree detector needs.
*/
use crate::error::{check_barrier, FastError};
use crate::fast::{ArcLength, RingState};
use crate::ring::{self, COUNT};
use crate::FastPoint;
use image::{GenericImageView, Luma};

/// Signed difference between every ring sample and the center.
fn deviations(image: &dyn GenericImageView<Pixel = Luma<u8>>, p: FastPoint) -> [i32; COUNT] {
    let center = image.get_pixel(p.x, p.y)[0] as i32;
    let mut d = [0i32; COUNT];
    for (i, v) in d.iter_mut().enumerate() {
        let (dx, dy) = ring::point(i);
        *v = image.get_pixel((p.x as i32 + dx) as u32, (p.y as i32 + dy) as u32)[0] as i32 - center;
    }
    d
}

/// Highest barrier at which some arc of length `arc` is entirely brighter or darker.
///
/// Negative if no barrier works, that is if the point is not a corner even at zero.
pub(crate) fn supremum(d: &[i32; COUNT], arc: ArcLength) -> i32 {
    let n = arc.get() as usize;
    let mut best = i32::MIN;
    for start in 0..COUNT {
        let mut brighter = i32::MAX;
        let mut darker = i32::MAX;
        for k in start..(start + n) {
            let v = d[k % COUNT];
            brighter = brighter.min(v);
            darker = darker.min(-v);
        }
        best = best.max(brighter).max(darker);
    }
    best - 1
}

/// Score of a single point.
///
/// `initial_barrier` is a lower bound: a point that passes the segment test at that barrier
/// scores at least that much, and a point that does not pass gets exactly `initial_barrier`
/// back. Passing zero is always correct.
pub fn score(
    image: &dyn GenericImageView<Pixel = Luma<u8>>,
    p: FastPoint,
    arc: ArcLength,
    initial_barrier: i32,
) -> Result<i32, FastError> {
    check_barrier(initial_barrier)?;
    let (width, height) = image.dimensions();
    ring::check_point(width, height, p)?;
    let s = supremum(&deviations(image, p), arc);
    log::trace!("score of {p:?} for arc {arc}: {s}");
    Ok(s.max(initial_barrier))
}

/// Score every point, in input order.
pub fn score_all(
    image: &dyn GenericImageView<Pixel = Luma<u8>>,
    points: &[FastPoint],
    arc: ArcLength,
    barrier: i32,
) -> Result<Vec<i32>, FastError> {
    points
        .iter()
        .map(|p| score(image, *p, arc, barrier))
        .collect()
}

/// Sum of absolute differences beyond the barrier, eq. 8 of rosten2006 (LNCS 3951).
///
/// Takes the larger of the brighter and the darker sums. Unlike `score`, many neighbouring
/// pixels rarely share the same value.
pub fn sum_absolute(
    image: &dyn GenericImageView<Pixel = Luma<u8>>,
    p: FastPoint,
    barrier: i32,
) -> Result<i32, FastError> {
    check_barrier(barrier)?;
    let (width, height) = image.dimensions();
    ring::check_point(width, height, p)?;

    let mut sum_bright = 0;
    let mut sum_dark = 0;
    for d in deviations(image, p) {
        match RingState::classify_deviation(d, barrier) {
            RingState::Brighter => sum_bright += d - barrier,
            RingState::Darker => sum_dark += -d - barrier,
            RingState::Similar => {}
        }
    }
    Ok(sum_bright.max(sum_dark))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fast::{is_corner, test::create_sample_image};

    const HAND: [u8; 16] = [
        37, 37, 39, 39, 37, 42, 43, 16, 14, 13, 15, 16, 15, 38, 37, 38,
    ];

    #[test]
    fn test_score_is_exact() {
        let img = create_sample_image(17, &HAND);
        let p = FastPoint { x: 64, y: 64 };
        for arc in [ArcLength::N9, ArcLength::N10] {
            let s = score(&img, p, arc, 0).unwrap();
            assert_eq!(s, 19);
            assert_eq!(is_corner(&img, p, s, arc), Ok(true));
            assert_eq!(is_corner(&img, p, s + 1, arc), Ok(false));
            // Starting from the detection barrier changes nothing.
            assert_eq!(score(&img, p, arc, 16), Ok(19));
        }
    }

    #[test]
    fn test_score_of_non_corner() {
        let img = create_sample_image(17, &HAND);
        let p = FastPoint { x: 64, y: 64 };
        assert_eq!(is_corner(&img, p, 0, ArcLength::N11), Ok(false));
        assert_eq!(score(&img, p, ArcLength::N11, 0), Ok(0));
        assert_eq!(score(&img, p, ArcLength::N11, 7), Ok(7));
    }

    #[test]
    fn test_score_picks_stronger_polarity() {
        // Eight dark samples at deviation -50, eight bright ones at +30.
        let mut ring_values = [0u8; 16];
        for (i, v) in ring_values.iter_mut().enumerate() {
            *v = if i < 8 { 50 } else { 130 };
        }
        let img = create_sample_image(100, &ring_values);
        let p = FastPoint { x: 64, y: 64 };
        assert_eq!(score(&img, p, ArcLength::N8, 0), Ok(49));
        assert_eq!(score(&img, p, ArcLength::N7, 0), Ok(49));
        assert_eq!(score(&img, p, ArcLength::N9, 0), Ok(0));
    }

    #[test]
    fn test_score_all_keeps_order() {
        let img = create_sample_image(17, &HAND);
        let points = [
            FastPoint { x: 64, y: 64 },
            FastPoint { x: 10, y: 10 },
            FastPoint { x: 64, y: 64 },
        ];
        assert_eq!(
            score_all(&img, &points, ArcLength::N9, 0),
            Ok(vec![19, 0, 19])
        );
        assert_eq!(score_all(&img, &[], ArcLength::N9, 0), Ok(vec![]));
    }

    #[test]
    fn test_score_rejects_bad_arguments() {
        let img = create_sample_image(17, &HAND);
        assert_eq!(
            score(&img, FastPoint { x: 125, y: 64 }, ArcLength::N9, 0),
            Err(FastError::PointOutOfRange {
                x: 125,
                y: 64,
                width: 128,
                height: 128
            })
        );
        assert_eq!(
            score(&img, FastPoint { x: 64, y: 64 }, ArcLength::N9, -3),
            Err(FastError::NegativeBarrier(-3))
        );
        assert!(score_all(
            &img,
            &[FastPoint { x: 64, y: 64 }, FastPoint { x: 0, y: 0 }],
            ArcLength::N9,
            0
        )
        .is_err());
    }

    #[test]
    fn test_sum_absolute() {
        let img = create_sample_image(17, &HAND);
        let p = FastPoint { x: 64, y: 64 };
        // Bright samples exceed 33: 37,37,39,39,37,42,43,38,37,38.
        let expected: i32 = [37, 37, 39, 39, 37, 42, 43, 38, 37, 38]
            .iter()
            .map(|v| v - 17 - 16)
            .sum();
        assert_eq!(sum_absolute(&img, p, 16), Ok(expected));
    }
}
