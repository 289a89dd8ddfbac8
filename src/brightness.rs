use image::{DynamicImage, GenericImageView};

/// Images are downscaled to fit this box before sampling.
const SAMPLE_SIZE: u32 = 128;

/// Average brightness above this (out of 255) counts as a light image.
pub const LIGHT_THRESHOLD: f64 = 127.5;

/// Mean of `(r + g + b) / 3` over every sampled pixel, in `0.0..=255.0`.
pub fn average_brightness(image: &DynamicImage) -> f64 {
    let sample = if image.width() > SAMPLE_SIZE || image.height() > SAMPLE_SIZE {
        image.thumbnail(SAMPLE_SIZE, SAMPLE_SIZE)
    } else {
        image.clone()
    };

    let (width, height) = sample.dimensions();
    let pixel_count = (width as u64) * (height as u64);
    if pixel_count == 0 {
        return 0.0;
    }

    let total: f64 = sample
        .to_rgb8()
        .pixels()
        .map(|p| (p[0] as f64 + p[1] as f64 + p[2] as f64) / 3.0)
        .sum();

    total / pixel_count as f64
}

pub fn is_image_light(image: &DynamicImage) -> bool {
    average_brightness(image) > LIGHT_THRESHOLD
}

/// Decodes an encoded image (JPEG, PNG, ...) and classifies it.
pub fn classify_bytes(bytes: &[u8]) -> Result<bool, image::ImageError> {
    let image = image::load_from_memory(bytes)?;
    Ok(is_image_light(&image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb(color)))
    }

    fn encode_png(image: &DynamicImage) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_solid_colors() {
        assert!(is_image_light(&solid(10, 10, [255, 255, 255])));
        assert!(!is_image_light(&solid(10, 10, [0, 0, 0])));
        assert!(is_image_light(&solid(10, 10, [200, 180, 160])));
        assert!(!is_image_light(&solid(10, 10, [20, 40, 90])));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // (127 + 128 + 128) / 3 = 127.67, (127 + 127 + 128) / 3 = 127.33
        assert!(is_image_light(&solid(4, 4, [127, 128, 128])));
        assert!(!is_image_light(&solid(4, 4, [127, 127, 128])));
    }

    #[test]
    fn test_half_and_half_image() {
        let image = ImageBuffer::from_fn(400, 300, |x, _| {
            if x < 100 { Rgb([0u8, 0, 0]) } else { Rgb([255u8, 255, 255]) }
        });
        let image = DynamicImage::ImageRgb8(image);

        let brightness = average_brightness(&image);
        assert!(brightness > 170.0 && brightness < 210.0);
        assert!(is_image_light(&image));
    }

    #[test]
    fn test_classify_encoded_bytes() {
        let light = encode_png(&solid(64, 48, [240, 240, 230]));
        let dark = encode_png(&solid(64, 48, [10, 10, 30]));

        assert!(classify_bytes(&light).unwrap());
        assert!(!classify_bytes(&dark).unwrap());
    }

    #[test]
    fn test_classify_rejects_garbage() {
        assert!(classify_bytes(b"definitely not an image").is_err());
    }
}
