//! Helpers to visualise detections.
use crate::FastPoint;
use image::{GrayImage, Rgb, RgbImage};

pub const RED: Rgb<u8> = Rgb([255u8, 0u8, 0u8]);
pub const GREEN: Rgb<u8> = Rgb([0u8, 255u8, 0u8]);

/// Draw a plus with arms of `size` pixels, clipped to the image.
pub fn draw_plus_sized(image: &mut RgbImage, pos: (u32, u32), color: Rgb<u8>, size: u32) {
    let (width, height) = image.dimensions();
    if pos.0 >= width || pos.1 >= height {
        return;
    }
    image.put_pixel(pos.0, pos.1, color);
    for d in 1..=size {
        if let Some(x) = pos.0.checked_sub(d) {
            image.put_pixel(x, pos.1, color);
        }
        if pos.0 + d < width {
            image.put_pixel(pos.0 + d, pos.1, color);
        }
        if let Some(y) = pos.1.checked_sub(d) {
            image.put_pixel(pos.0, y, color);
        }
        if pos.1 + d < height {
            image.put_pixel(pos.0, pos.1 + d, color);
        }
    }
}

/// Draw a small plus on every corner.
pub fn draw_points(image: &mut RgbImage, corners: &[FastPoint], color: Rgb<u8>) {
    for kp in corners.iter() {
        draw_plus_sized(image, (kp.x, kp.y), color, 1);
    }
}

/// Grey image converted to rgb, with a plus on every corner.
pub fn draw_corners(img: &GrayImage, corners: &[FastPoint], color: Rgb<u8>) -> RgbImage {
    let mut rgb_owned = image::DynamicImage::ImageLuma8(img.clone()).to_rgb8();
    draw_points(&mut rgb_owned, corners, color);
    rgb_owned
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_draw_plus_clips() {
        let mut img = RgbImage::new(4, 4);
        draw_plus_sized(&mut img, (0, 0), RED, 2);
        let red = img.pixels().filter(|p| **p == RED).count();
        assert_eq!(red, 5);
        // Outside the image draws nothing.
        let mut img = RgbImage::new(4, 4);
        draw_plus_sized(&mut img, (4, 1), RED, 1);
        assert!(img.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[test]
    fn test_draw_corners() {
        let grey = GrayImage::new(10, 10);
        let out = draw_corners(&grey, &[FastPoint { x: 5, y: 5 }], GREEN);
        assert_eq!(*out.get_pixel(5, 5), GREEN);
        assert_eq!(*out.get_pixel(4, 5), GREEN);
        assert_eq!(*out.get_pixel(5, 7), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_draw_points_layers() {
        // Raw detections first, survivors drawn over them.
        let grey = GrayImage::from_pixel(12, 12, image::Luma([50u8]));
        let raw = [FastPoint { x: 4, y: 4 }, FastPoint { x: 5, y: 4 }];
        let mut out = draw_corners(&grey, &raw, GREEN);
        draw_points(&mut out, &[FastPoint { x: 5, y: 4 }], RED);
        assert_eq!(*out.get_pixel(4, 4), RED);
        assert_eq!(*out.get_pixel(3, 4), GREEN);
        assert_eq!(*out.get_pixel(4, 3), GREEN);
        assert_eq!(*out.get_pixel(5, 5), RED);
        assert_eq!(*out.get_pixel(9, 9), Rgb([50, 50, 50]));
    }
}
