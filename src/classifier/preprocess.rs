//! Image decoding and model input preparation.

use image::imageops::FilterType;

use crate::error::Error;

/// Width and height the model expects
pub const INPUT_SIZE: u32 = 220;

/// RGB
pub const CHANNELS: usize = 3;

/// Row-major `INPUT_SIZE x INPUT_SIZE x CHANNELS` pixel values in `[0, 1]`
#[derive(Debug, Clone)]
pub struct ImageTensor {
    data: Vec<f32>,
}

impl ImageTensor {
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Nested `[row][column][channel]` form used by JSON model APIs
    pub fn to_nested(&self) -> Vec<Vec<[f32; CHANNELS]>> {
        self.data
            .chunks_exact(INPUT_SIZE as usize * CHANNELS)
            .map(|row| {
                row.chunks_exact(CHANNELS)
                    .map(|px| [px[0], px[1], px[2]])
                    .collect()
            })
            .collect()
    }
}

/// Decode a JPEG/PNG upload, drop any alpha channel, resize and scale
pub fn preprocess(bytes: &[u8]) -> Result<ImageTensor, Error> {
    let img = image::load_from_memory(bytes).map_err(|e| Error::InvalidImage(e.to_string()))?;

    let rgb = img
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::CatmullRom)
        .to_rgb8();

    let data = rgb.as_raw().iter().map(|&v| f32::from(v) / 255.0).collect();
    Ok(ImageTensor { data })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    /// PNG of a single colour with an opaque alpha channel
    pub(crate) fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([rgb[0], rgb[1], rgb[2], 255]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_resizes_and_scales() {
        let tensor = preprocess(&solid_png(64, 48, [255, 0, 51])).unwrap();
        assert_eq!(tensor.data().len(), 220 * 220 * 3);

        // Resampling may shift a uniform colour by one level
        let first = &tensor.data()[..3];
        assert!((first[0] - 1.0).abs() < 0.01);
        assert!(first[1].abs() < 0.01);
        assert!((first[2] - 0.2).abs() < 0.01);
        assert!(tensor.data().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_nested_shape() {
        let nested = preprocess(&solid_png(10, 10, [0, 0, 0])).unwrap().to_nested();
        assert_eq!(nested.len(), 220);
        assert!(nested.iter().all(|row| row.len() == 220));
    }

    #[test]
    fn test_rejects_non_image() {
        assert!(matches!(preprocess(b"GIF89a?"), Err(Error::InvalidImage(_))));
    }
}
