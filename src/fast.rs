/*!
Segment test corner classification and the full image scan.

A pixel with intensity `c` is a corner for barrier `b` and arc length `n` if the 16 pixel ring
around it holds `n` contiguous samples that are all brighter than `c + b`, or all darker than
`c - b`. Contiguity wraps around the ring, index 15 is adjacent to index 0.

Two implementations live here:
- The reference path classifies all 16 samples into `RingState` and walks the ring as a
  circular buffer. It reads through `GenericImageView` and is the oracle for the tests.
- The fast path works on the raw buffer, rejects on the four cardinal samples first, and
  checks contiguity with AND-shifts on a doubled 16 bit mask.

Both produce identical output, in row-major order.
*/
use crate::error::{check_barrier, FastError};
use crate::ring::{self, CircleOffsets, COUNT, EAST, NORTH, SOUTH, WEST};
use crate::FastPoint;
use image::{GenericImageView, Luma};
use serde::{Deserialize, Serialize};

/// Minimum number of contiguous ring samples of one polarity, in `7..=12`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ArcLength(u8);

impl ArcLength {
    pub const N7: ArcLength = ArcLength(7);
    pub const N8: ArcLength = ArcLength(8);
    pub const N9: ArcLength = ArcLength(9);
    pub const N10: ArcLength = ArcLength(10);
    pub const N11: ArcLength = ArcLength(11);
    pub const N12: ArcLength = ArcLength(12);

    pub const ALL: [ArcLength; 6] = [
        Self::N7,
        Self::N8,
        Self::N9,
        Self::N10,
        Self::N11,
        Self::N12,
    ];

    pub fn new(n: u8) -> Result<Self, FastError> {
        if (7..=12).contains(&n) {
            Ok(ArcLength(n))
        } else {
            Err(FastError::InvalidArcLength(n))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Cardinal samples (0, 4, 8, 12) any arc of this length must cover.
    ///
    /// Cardinals are spaced 4 apart, so `n` contiguous samples always contain at least `n / 4`
    /// of them. Rejecting pixels with fewer cardinal hits of either polarity never drops a corner.
    pub const fn min_cardinals(self) -> u8 {
        self.0 / 4
    }
}

impl TryFrom<u8> for ArcLength {
    type Error = FastError;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        ArcLength::new(n)
    }
}

impl From<ArcLength> for u8 {
    fn from(arc: ArcLength) -> u8 {
        arc.0
    }
}

impl Default for ArcLength {
    fn default() -> Self {
        ArcLength::N9
    }
}

impl std::fmt::Display for ArcLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of one ring sample against the center.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RingState {
    Brighter,
    Darker,
    Similar,
}

impl RingState {
    /// Intensity must differ by more than `barrier` to count.
    #[inline]
    pub fn classify(value: u8, center: u8, barrier: i32) -> RingState {
        RingState::classify_deviation(value as i32 - center as i32, barrier)
    }

    /// Same, for a signed `sample - center` difference.
    #[inline]
    pub fn classify_deviation(deviation: i32, barrier: i32) -> RingState {
        if deviation > barrier {
            RingState::Brighter
        } else if deviation < -barrier {
            RingState::Darker
        } else {
            RingState::Similar
        }
    }
}

/// Classify the 16 ring samples around `p`, the ring must fit in the image.
pub(crate) fn ring_states(
    image: &dyn GenericImageView<Pixel = Luma<u8>>,
    p: FastPoint,
    barrier: i32,
) -> [RingState; COUNT] {
    let center = image.get_pixel(p.x, p.y)[0];
    let mut states = [RingState::Similar; COUNT];
    for (i, state) in states.iter_mut().enumerate() {
        let (dx, dy) = ring::point(i);
        let v = image.get_pixel((p.x as i32 + dx) as u32, (p.y as i32 + dy) as u32)[0];
        *state = RingState::classify(v, center, barrier);
    }
    states
}

/// Walk the ring as a circular buffer looking for a long enough run of one polarity.
pub(crate) fn has_arc(states: &[RingState; COUNT], arc: ArcLength) -> bool {
    let n = arc.get() as usize;
    for polarity in [RingState::Brighter, RingState::Darker] {
        let mut run = 0;
        // Going n - 1 past the end covers every run that wraps from 15 to 0.
        for k in 0..(COUNT + n - 1) {
            if states[k % COUNT] == polarity {
                run += 1;
                if run >= n {
                    return true;
                }
            } else {
                run = 0;
            }
        }
    }
    false
}

/// Reference segment test for a single pixel.
pub fn is_corner(
    image: &dyn GenericImageView<Pixel = Luma<u8>>,
    p: FastPoint,
    barrier: i32,
    arc: ArcLength,
) -> Result<bool, FastError> {
    check_barrier(barrier)?;
    let (width, height) = image.dimensions();
    ring::check_point(width, height, p)?;
    Ok(has_arc(&ring_states(image, p, barrier), arc))
}

/// True if the circular 16 bit `mask` holds `n` contiguous set bits.
#[inline]
pub(crate) fn has_run(mask: u16, n: u8) -> bool {
    // Doubling the mask unrolls the wrap-around, each shift-and shortens every run by one.
    let mut acc = mask as u32 | ((mask as u32) << 16);
    for _ in 1..n {
        acc &= acc >> 1;
    }
    acc != 0
}

/// Fast segment test on the raw buffer; `base` is the row-major index of the center.
#[inline]
pub(crate) fn test_pixel(
    data: &[u8],
    offsets: &CircleOffsets,
    base: usize,
    barrier: i32,
    arc: ArcLength,
) -> bool {
    let c = data[base] as i32;
    // Deviation from the center, never overflows for any non-negative barrier.
    let deviation = |i: usize| data[(base as isize + offsets[i]) as usize] as i32 - c;
    let neg_barrier = -barrier;

    let mut above = 0u8;
    let mut below = 0u8;
    for i in [NORTH, EAST, SOUTH, WEST] {
        let d = deviation(i);
        above += (d > barrier) as u8;
        below += (d < neg_barrier) as u8;
    }
    let min = arc.min_cardinals();
    if above < min && below < min {
        return false;
    }

    let mut above_bits = 0u16;
    let mut below_bits = 0u16;
    for i in 0..COUNT {
        let d = deviation(i);
        above_bits |= ((d > barrier) as u16) << i;
        below_bits |= ((d < neg_barrier) as u16) << i;
    }

    let n = arc.get();
    (above_bits.count_ones() >= n as u32 && has_run(above_bits, n))
        || (below_bits.count_ones() >= n as u32 && has_run(below_bits, n))
}

fn scan_row(
    data: &[u8],
    offsets: &CircleOffsets,
    width: u32,
    y: u32,
    barrier: i32,
    arc: ArcLength,
) -> Vec<FastPoint> {
    let row = y as usize * width as usize;
    ring::interior(width)
        .filter(|&x| test_pixel(data, offsets, row + x as usize, barrier, arc))
        .map(|x| FastPoint { x, y })
        .collect()
}

/// Detect all corners in the image, in row-major order.
///
/// The border band of `ring::MARGIN` pixels is never tested. Images too small to hold a single
/// ring produce an empty result.
pub fn detect(
    image: &image::GrayImage,
    barrier: i32,
    arc: ArcLength,
) -> Result<Vec<FastPoint>, FastError> {
    check_barrier(barrier)?;
    let (width, height) = image.dimensions();
    let data = image.as_raw();
    let offsets = ring::offsets(width);

    #[cfg(feature = "rayon")]
    let r: Vec<FastPoint> = {
        use rayon::prelude::*;
        ring::interior(height)
            .into_par_iter()
            .flat_map_iter(|y| scan_row(data, &offsets, width, y, barrier, arc))
            .collect()
    };
    #[cfg(not(feature = "rayon"))]
    let r: Vec<FastPoint> = ring::interior(height)
        .flat_map(|y| scan_row(data, &offsets, width, y, barrier, arc))
        .collect();

    log::debug!(
        "detected {} corners in {width}x{height} (barrier {barrier}, arc {arc})",
        r.len()
    );
    Ok(r)
}

/// Straightforward scan through the reference segment test, same output as `detect`.
pub fn detect_reference(
    image: &dyn GenericImageView<Pixel = Luma<u8>>,
    barrier: i32,
    arc: ArcLength,
) -> Result<Vec<FastPoint>, FastError> {
    check_barrier(barrier)?;
    let (width, height) = image.dimensions();

    let mut r = vec![];
    for y in ring::interior(height) {
        for x in ring::interior(width) {
            let p = FastPoint { x, y };
            if has_arc(&ring_states(image, p, barrier), arc) {
                log::trace!("corner at {x}, {y}");
                r.push(p);
            }
        }
    }
    Ok(r)
}
