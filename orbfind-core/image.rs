use crate::error::InputError;

/// Immutable row-major 8-bit image with interleaved channels.
///
/// Supported layouts are gray (1), gray + alpha (2), RGB (3) and RGBA (4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl Image {
    /// Wraps a pixel buffer, validating dimensions and length.
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<Self, InputError> {
        if width == 0 || height == 0 {
            return Err(InputError::EmptyImage { width, height });
        }
        if !(1..=4).contains(&channels) {
            return Err(InputError::UnsupportedChannels(channels));
        }
        let expected_len = width * height * channels;
        if data.len() != expected_len {
            return Err(InputError::InvalidImageData {
                expected_len,
                actual_len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Single-channel image.
    pub fn from_gray(width: usize, height: usize, data: Vec<u8>) -> Result<Self, InputError> {
        Self::new(width, height, 1, data)
    }

    /// Uniform single-channel image.
    pub fn filled(width: usize, height: usize, value: u8) -> Result<Self, InputError> {
        Self::from_gray(width, height, vec![value; width * height])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Gray value at `(x, y)`. Only meaningful on single-channel images.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// Gray value with coordinates clamped to the nearest border pixel.
    #[inline]
    pub fn get_clamped(&self, x: isize, y: isize) -> u8 {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        self.data[cy * self.width + cx]
    }

    /// Converts to a single-channel image using integer Rec.601 luma.
    ///
    /// Alpha is ignored. A gray image is cloned as is.
    pub fn to_gray(&self) -> Image {
        let data = match self.channels {
            1 => self.data.clone(),
            2 => self.data.chunks_exact(2).map(|px| px[0]).collect(),
            _ => self
                .data
                .chunks_exact(self.channels)
                .map(|px| {
                    let luma = 299 * px[0] as u32 + 587 * px[1] as u32 + 114 * px[2] as u32;
                    ((luma + 500) / 1000) as u8
                })
                .collect(),
        };
        Image {
            width: self.width,
            height: self.height,
            channels: 1,
            data,
        }
    }
}
