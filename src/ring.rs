//! The 16 pixel Bresenham ring sampled around every candidate.
/*
     15 0 1
   14       2
 13           3
 12    +      4
 11           5
   10       6
     9  8  7
*/
use crate::error::FastError;
use crate::FastPoint;

pub const COUNT: usize = 16;

pub const NORTH: usize = 0;
pub const EAST: usize = 4;
pub const SOUTH: usize = 8;
pub const WEST: usize = 12;

/// The circle with 16 pixels, clockwise from 12 o'clock.
pub const fn circle() -> [(i32, i32); COUNT] {
    [
        (0, -3),
        (1, -3),
        (2, -2),
        (3, -1),
        (3, 0),
        (3, 1),
        (2, 2),
        (1, 3),
        (0, 3),
        (-1, 3),
        (-2, 2),
        (-3, 1),
        (-3, 0),
        (-3, -1),
        (-2, -2),
        (-1, -3),
    ]
}

/// Offset of ring sample `index`, wrapping around the ring.
pub const fn point(index: usize) -> (i32, i32) {
    circle()[index % COUNT]
}

const fn bounding_radius() -> u32 {
    let c = circle();
    let mut r = 0;
    let mut i = 0;
    while i < COUNT {
        let dx = c[i].0.unsigned_abs();
        let dy = c[i].1.unsigned_abs();
        if dx > r {
            r = dx;
        }
        if dy > r {
            r = dy;
        }
        i += 1;
    }
    r
}

/// Border band that is never tested, every ring offset fits inside it.
pub const MARGIN: u32 = bounding_radius();

/// True if the whole ring around `p` lies inside a `width` x `height` image.
pub fn fits(width: u32, height: u32, p: FastPoint) -> bool {
    let m = MARGIN as u64;
    p.x as u64 >= m
        && p.y as u64 >= m
        && p.x as u64 + m < width as u64
        && p.y as u64 + m < height as u64
}

pub(crate) fn check_point(width: u32, height: u32, p: FastPoint) -> Result<(), FastError> {
    if fits(width, height, p) {
        Ok(())
    } else {
        Err(FastError::PointOutOfRange {
            x: p.x,
            y: p.y,
            width,
            height,
        })
    }
}

/// Half-open range of coordinates along an axis of length `len` whose ring fits.
pub fn interior(len: u32) -> std::ops::Range<u32> {
    MARGIN..len.saturating_sub(MARGIN).max(MARGIN)
}

pub type CircleOffsets = [isize; COUNT];

/// Ring offsets into a row-major buffer with the given row stride.
pub fn offsets(width: u32) -> CircleOffsets {
    let mut circle_offset = [0isize; COUNT];
    for (i, (x, y)) in circle().iter().enumerate() {
        circle_offset[i] = *y as isize * width as isize + *x as isize;
    }
    circle_offset
}

/// Raster of the ring for debugging, every sample drawn as a `scale` sized square.
///
/// The center is grey, cardinal samples red and the remaining samples blue.
pub fn ring_image(scale: u32) -> image::RgbImage {
    let scale = scale.max(1);
    let side = (2 * MARGIN + 1) * scale;
    let mut img = image::RgbImage::new(side, side);
    let mut fill = |dx: i32, dy: i32, color: image::Rgb<u8>| {
        let x0 = (MARGIN as i32 + dx) as u32 * scale;
        let y0 = (MARGIN as i32 + dy) as u32 * scale;
        for y in y0..y0 + scale {
            for x in x0..x0 + scale {
                img.put_pixel(x, y, color);
            }
        }
    };
    fill(0, 0, image::Rgb([128, 128, 128]));
    for (i, (dx, dy)) in circle().iter().enumerate() {
        let color = if [NORTH, EAST, SOUTH, WEST].contains(&i) {
            image::Rgb([255, 0, 0])
        } else {
            image::Rgb([0, 0, 255])
        };
        fill(*dx, *dy, color);
    }
    img
}
