use orbfind_core::Image;
use rayon::prelude::*;

/// Smoothing and resampling used to build pyramid levels
pub struct ImagePreprocessing;

impl ImagePreprocessing {
    /// Normalised 1D Gaussian kernel with `2 * radius + 1` taps
    pub fn gaussian_kernel(sigma: f32, radius: usize) -> Vec<f32> {
        let r = radius as i32;
        let denom = 2.0 * sigma * sigma;
        let raw: Vec<f32> = (-r..=r).map(|i| (-((i * i) as f32) / denom).exp()).collect();
        let sum: f32 = raw.iter().sum();
        raw.into_iter().map(|w| w / sum).collect()
    }

    /// Separable Gaussian blur of a gray image, border pixels replicated.
    pub fn gaussian_blur(img: &Image, sigma: f32, radius: usize) -> Image {
        let (width, height) = img.dimensions();
        let kernel = Self::gaussian_kernel(sigma, radius);
        let r = radius as isize;

        let mut horizontal = vec![0.0f32; width * height];
        horizontal
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.iter_mut().enumerate() {
                    let mut acc = 0.0f32;
                    for (k, &w) in kernel.iter().enumerate() {
                        let sx = x as isize + k as isize - r;
                        acc += w * img.get_clamped(sx, y as isize) as f32;
                    }
                    *out = acc;
                }
            });

        let mut blurred = vec![0u8; width * height];
        blurred
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.iter_mut().enumerate() {
                    let mut acc = 0.0f32;
                    for (k, &w) in kernel.iter().enumerate() {
                        let sy = (y as isize + k as isize - r).clamp(0, height as isize - 1) as usize;
                        acc += w * horizontal[sy * width + x];
                    }
                    *out = acc.round().clamp(0.0, 255.0) as u8;
                }
            });

        Self::wrap(width, height, blurred)
    }

    /// Resample to `target_width x target_height` using pixel-centre aligned
    /// bilinear interpolation
    pub fn resize_bilinear(img: &Image, target_width: usize, target_height: usize) -> Image {
        let (src_width, src_height) = img.dimensions();
        let x_ratio = src_width as f32 / target_width as f32;
        let y_ratio = src_height as f32 / target_height as f32;

        let mut resized = vec![0u8; target_width * target_height];
        resized
            .par_chunks_mut(target_width)
            .enumerate()
            .for_each(|(y, row)| {
                let src_y = ((y as f32 + 0.5) * y_ratio - 0.5).max(0.0);
                for (x, out) in row.iter_mut().enumerate() {
                    let src_x = ((x as f32 + 0.5) * x_ratio - 0.5).max(0.0);
                    let value = Self::bilinear_sample(img, src_x, src_y);
                    *out = value.round().clamp(0.0, 255.0) as u8;
                }
            });

        Self::wrap(target_width, target_height, resized)
    }

    /// Sample image at fractional coordinates using bilinear interpolation
    fn bilinear_sample(img: &Image, x: f32, y: f32) -> f32 {
        let (width, height) = img.dimensions();
        let x1 = (x.floor() as usize).min(width - 1);
        let y1 = (y.floor() as usize).min(height - 1);
        let x2 = (x1 + 1).min(width - 1);
        let y2 = (y1 + 1).min(height - 1);

        let fx = (x - x1 as f32).clamp(0.0, 1.0);
        let fy = (y - y1 as f32).clamp(0.0, 1.0);

        let p11 = img.get(x1, y1) as f32;
        let p12 = img.get(x2, y1) as f32;
        let p21 = img.get(x1, y2) as f32;
        let p22 = img.get(x2, y2) as f32;

        let interpolated_top = p11 * (1.0 - fx) + p12 * fx;
        let interpolated_bottom = p21 * (1.0 - fx) + p22 * fx;

        interpolated_top * (1.0 - fy) + interpolated_bottom * fy
    }

    fn wrap(width: usize, height: usize, data: Vec<u8>) -> Image {
        // Dimensions come from an existing image, so the buffer always fits
        match Image::from_gray(width, height, data) {
            Ok(img) => img,
            Err(e) => unreachable!("preprocessing produced an invalid buffer: {e}"),
        }
    }
}
