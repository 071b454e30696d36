use image::{GrayImage, ImageBuffer, RgbaImage};

use crate::regions::Rect;

/// Converts the captured frame to grayscale.
pub fn to_grayscale(img: &RgbaImage) -> GrayImage {
    image::imageops::grayscale(img)
}

/// Binarizes a grayscale image against a locally computed threshold.
///
/// Each pixel is compared to the mean of its `block_size` x `block_size`
/// neighborhood, offset by `bias`: pixels brighter than `mean - bias`
/// become white (text), everything else black. A negative bias raises the
/// local threshold, which separates the name font from the glow and
/// particle effects behind it better than any global threshold does.
///
/// `block_size` 51 and bias -10 work well for the reward screen's font.
pub fn adaptive_threshold(img: &GrayImage, block_size: u32, bias: i32) -> GrayImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return img.clone();
    }

    // Summed-area table so each neighborhood mean is O(1).
    let w = width as usize;
    let h = height as usize;
    let mut integral = vec![0u64; (w + 1) * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += img.get_pixel(x as u32, y as u32)[0] as u64;
            integral[(y + 1) * (w + 1) + (x + 1)] = integral[y * (w + 1) + (x + 1)] + row_sum;
        }
    }

    let radius = (block_size.max(3) / 2) as i64;
    ImageBuffer::from_fn(width, height, |x, y| {
        let x0 = (x as i64 - radius).max(0) as usize;
        let y0 = (y as i64 - radius).max(0) as usize;
        let x1 = ((x as i64 + radius + 1).min(w as i64)) as usize;
        let y1 = ((y as i64 + radius + 1).min(h as i64)) as usize;

        let sum = integral[y1 * (w + 1) + x1] + integral[y0 * (w + 1) + x0]
            - integral[y0 * (w + 1) + x1]
            - integral[y1 * (w + 1) + x0];
        let count = ((x1 - x0) * (y1 - y0)) as u64;
        let mean = (sum / count) as i32;

        let pixel = img.get_pixel(x, y)[0] as i32;
        if pixel > mean - bias {
            image::Luma([255u8])
        } else {
            image::Luma([0u8])
        }
    })
}

/// Crops a rectangle out of the preprocessed frame, clamped to the frame
/// bounds.
pub fn crop_rect(img: &GrayImage, rect: &Rect) -> GrayImage {
    let (w, h) = img.dimensions();

    let x0 = rect.x.min(w);
    let y0 = rect.y.min(h);
    let rw = rect.width.min(w - x0);
    let rh = rect.height.min(h - y0);

    image::imageops::crop_imm(img, x0, y0, rw, rh).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_adaptive_threshold_is_binary() {
        let img = GrayImage::from_fn(64, 32, |x, y| Luma([((x * 7 + y * 13) % 256) as u8]));
        let binary = adaptive_threshold(&img, 51, -10);
        for pixel in binary.pixels() {
            assert!(pixel[0] == 0 || pixel[0] == 255);
        }
    }

    #[test]
    fn test_uniform_image_goes_black() {
        // Every pixel equals its neighborhood mean, so nothing clears the
        // raised threshold.
        let img = GrayImage::from_pixel(60, 40, Luma([128]));
        let binary = adaptive_threshold(&img, 51, -10);
        assert!(binary.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_bright_text_on_dark_background_survives() {
        // Dark field with a bright block in the middle, like a name over the
        // reward card.
        let img = GrayImage::from_fn(100, 60, |x, y| {
            if (40..60).contains(&x) && (25..35).contains(&y) {
                Luma([230])
            } else {
                Luma([30])
            }
        });
        let binary = adaptive_threshold(&img, 51, -10);
        assert_eq!(binary.get_pixel(50, 30)[0], 255, "text pixel kept");
        assert_eq!(binary.get_pixel(5, 5)[0], 0, "background dropped");
    }

    #[test]
    fn test_crop_rect() {
        let img = GrayImage::from_fn(100, 200, |x, y| Luma([(x + y) as u8]));
        let rect = Rect { x: 10, y: 50, width: 50, height: 20 };
        let cropped = crop_rect(&img, &rect);

        assert_eq!(cropped.dimensions(), (50, 20));
        assert_eq!(cropped.get_pixel(0, 0)[0], 60); // (10, 50) in the original
    }

    #[test]
    fn test_crop_rect_clamps_to_bounds() {
        let img = GrayImage::new(100, 100);
        let rect = Rect { x: 90, y: 90, width: 50, height: 50 };
        let cropped = crop_rect(&img, &rect);
        assert_eq!(cropped.dimensions(), (10, 10));
    }
}
