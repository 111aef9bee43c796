//! Image decoding into the pipeline's [`Image`] and debug overlays.

use std::path::Path;

use image::{DynamicImage, ImageReader, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};
use orbfind_core::{Image, InputError, Keypoint};

use crate::Correspondences;

pub const KEYPOINT_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// Decode an image file. Color images stay RGBA, gray ones stay single
/// channel.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Image, Box<dyn std::error::Error>> {
    let decoded = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(from_dynamic(decoded)?)
}

pub fn from_dynamic(img: DynamicImage) -> Result<Image, InputError> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    if img.color().has_color() {
        Image::new(w, h, 4, img.into_rgba8().into_raw())
    } else {
        Image::from_gray(w, h, img.into_luma8().into_raw())
    }
}

/// Gray copy of `img` as an RGBA canvas.
pub fn to_canvas(img: &Image) -> RgbaImage {
    let gray = img.to_gray();
    RgbaImage::from_fn(gray.width() as u32, gray.height() as u32, |x, y| {
        let v = gray.get(x as usize, y as usize);
        Rgba([v, v, v, 255])
    })
}

/// Circle of the keypoint's described size plus a tick along its angle.
pub fn draw_keypoint(canvas: &mut RgbaImage, kp: &Keypoint, offset_x: f32, color: Rgba<u8>) {
    let (x, y) = (kp.x + offset_x, kp.y);
    let radius = (kp.size / 2.0).max(1.0);
    draw_hollow_circle_mut(canvas, (x.round() as i32, y.round() as i32), radius.round() as i32, color);
    if let Some(angle) = kp.angle {
        let (s, c) = angle.sin_cos();
        draw_line_segment_mut(canvas, (x, y), (x + radius * c, y + radius * s), color);
    }
}

pub fn draw_keypoints(img: &Image, keypoints: &[Keypoint]) -> RgbaImage {
    let mut canvas = to_canvas(img);
    for kp in keypoints {
        draw_keypoint(&mut canvas, kp, 0.0, KEYPOINT_COLOR);
    }
    canvas
}

/// Query on the left, scene on the right, one line per selected match.
///
/// Unmatched keypoints are not drawn.
pub fn draw_matches(query: &Image, scene: &Image, found: &Correspondences) -> RgbaImage {
    let left = to_canvas(query);
    let right = to_canvas(scene);
    let mut canvas = RgbaImage::from_pixel(
        left.width() + right.width(),
        left.height().max(right.height()),
        Rgba([0, 0, 0, 255]),
    );
    image::imageops::replace(&mut canvas, &left, 0, 0);
    image::imageops::replace(&mut canvas, &right, left.width() as i64, 0);

    let offset = left.width() as f32;
    for (i, (q, s, _)) in found.pairs().enumerate() {
        let color = match_color(i);
        draw_keypoint(&mut canvas, q, 0.0, color);
        draw_keypoint(&mut canvas, s, offset, color);
        draw_line_segment_mut(&mut canvas, (q.x, q.y), (s.x + offset, s.y), color);
    }
    canvas
}

// Cycles through a small fixed palette
fn match_color(i: usize) -> Rgba<u8> {
    const PALETTE: [[u8; 3]; 6] = [
        [0, 255, 0],
        [255, 64, 64],
        [64, 160, 255],
        [255, 200, 0],
        [255, 0, 255],
        [0, 255, 255],
    ];
    let [r, g, b] = PALETTE[i % PALETTE.len()];
    Rgba([r, g, b, 255])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Features;
    use orbfind_core::{Descriptor, Match};

    fn keypoint(x: f32, y: f32) -> Keypoint {
        Keypoint {
            x,
            y,
            octave: 0,
            size: 8.0,
            angle: Some(0.0),
            response: 1.0,
        }
    }

    #[test]
    fn test_from_dynamic_channels() {
        let gray = DynamicImage::new_luma8(4, 3);
        let img = from_dynamic(gray).unwrap();
        assert_eq!((img.width(), img.height(), img.channels()), (4, 3, 1));

        let color = DynamicImage::new_rgb8(5, 2);
        assert_eq!(from_dynamic(color).unwrap().channels(), 4);
    }

    #[test]
    fn test_keypoint_overlay() {
        let img = Image::filled(32, 32, 0).unwrap();
        let canvas = draw_keypoints(&img, &[keypoint(16.0, 16.0)]);
        // The orientation tick runs right from the centre
        assert_eq!(*canvas.get_pixel(18, 16), KEYPOINT_COLOR);
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_match_canvas_layout() {
        let query = Image::filled(20, 10, 100).unwrap();
        let scene = Image::filled(30, 40, 200).unwrap();
        let one = |x, y| Features::new(vec![keypoint(x, y)], vec![Descriptor::zeros(8)]).unwrap();
        let found = Correspondences {
            query: one(5.0, 5.0),
            scene: one(10.0, 20.0),
            matches: vec![Match {
                query_idx: 0,
                train_idx: 0,
                distance: 0,
            }],
            total_matches: 1,
        };
        let canvas = draw_matches(&query, &scene, &found);
        assert_eq!(canvas.dimensions(), (50, 40));
        assert_eq!(*canvas.get_pixel(0, 39), Rgba([0, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(49, 39), Rgba([200, 200, 200, 255]));
    }
}
