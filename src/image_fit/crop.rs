//! # 居中正方形裁剪
//!
//! 头像、聊天缩略图等场景需要正方形图片。裁剪窗口的计算与像素操作分开，
//! 便于在不构造图片的情况下单独测试窗口坐标。

use image::{DynamicImage, GenericImageView};

use super::FitError;

/// 计算居中正方形裁剪窗口，返回 `(x, y, side)`。
///
/// 横图水平居中，竖图与方图垂直居中；偏移按整数除法截断。
pub fn square_crop_window(width: u32, height: u32) -> (u32, u32, u32) {
    let side = width.min(height);
    if height < width {
        ((width - side) / 2, 0, side)
    } else {
        (0, (height - side) / 2, side)
    }
}

/// 裁剪为居中正方形，返回新图片，不修改输入。
pub fn crop_to_square(image: &DynamicImage) -> Result<DynamicImage, FitError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(FitError::InvalidInput(format!(
            "无法裁剪空图片：{}x{}",
            width, height
        )));
    }

    let (x, y, side) = square_crop_window(width, height);
    log::debug!(
        "✂️ 居中裁剪：{}x{} -> {}x{}（offset={},{}）",
        width,
        height,
        side,
        side,
        x,
        y
    );

    Ok(image.crop_imm(x, y, side, side))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use proptest::prelude::*;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 0])
        }))
    }

    #[test]
    fn landscape_window_is_horizontally_centered() {
        assert_eq!(square_crop_window(1000, 500), (250, 0, 500));
        assert_eq!(square_crop_window(7, 4), (1, 0, 4));
    }

    #[test]
    fn portrait_window_is_vertically_centered() {
        assert_eq!(square_crop_window(500, 1000), (0, 250, 500));
        assert_eq!(square_crop_window(4, 7), (0, 1, 4));
    }

    #[test]
    fn square_window_is_identity() {
        assert_eq!(square_crop_window(64, 64), (0, 0, 64));
    }

    #[test]
    fn crop_keeps_center_pixels() {
        let image = gradient(300, 100);
        let cropped = crop_to_square(&image).expect("crop failed");

        assert_eq!(cropped.dimensions(), (100, 100));
        // 左上角像素应来自原图 x = 100 列
        assert_eq!(cropped.to_rgb8().get_pixel(0, 0), &Rgb([100, 0, 0]));
    }

    #[test]
    fn crop_rejects_empty_image() {
        let image = DynamicImage::new_rgb8(0, 10);
        assert!(matches!(
            crop_to_square(&image),
            Err(FitError::InvalidInput(_))
        ));
    }

    proptest! {
        #[test]
        fn window_stays_inside_image(width in 1u32..4000, height in 1u32..4000) {
            let (x, y, side) = square_crop_window(width, height);
            prop_assert_eq!(side, width.min(height));
            prop_assert!(x + side <= width);
            prop_assert!(y + side <= height);
        }
    }
}
