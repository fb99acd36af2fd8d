//! # 编解码能力抽象
//!
//! ## 设计思路
//!
//! 适配算法只依赖三项能力：JPEG 编码、解码、缩放。把它们收敛到 `ImageCodec`
//! trait 后，`ImageFitter` 与具体图片库解耦，测试可注入返回确定体积的假实现。
//!
//! ## 实现思路
//!
//! - `JpegCodec` 基于 `image` 编解码，缩放优先走 `fast_image_resize` 卷积路径。
//! - fast_image_resize 失败时回退 `image::resize_exact`，并记录告警。
//! - JPEG 不支持透明通道，编码前统一转换为 RGB8。

use fast_image_resize as fr;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageBuffer, Rgb};

use super::{FitError, ResampleFilter};

/// 具有像素尺寸的位图。
pub trait Raster {
    /// 返回 `(width, height)`。
    fn size(&self) -> (u32, u32);
}

impl Raster for DynamicImage {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }
}

/// 图片编解码能力。
pub trait ImageCodec {
    type Image: Raster;

    /// 以指定质量编码为 JPEG 字节。
    fn encode_jpeg(&self, image: &Self::Image, quality: u8) -> Result<Vec<u8>, FitError>;

    /// 从内存字节解码图片。
    fn decode(&self, bytes: &[u8]) -> Result<Self::Image, FitError>;

    /// 平滑缩放到精确尺寸，返回新图片。
    fn rescale(&self, image: &Self::Image, width: u32, height: u32)
    -> Result<Self::Image, FitError>;
}

/// 基于 `image` + `fast_image_resize` 的生产实现。
#[derive(Debug, Clone, Copy)]
pub struct JpegCodec {
    filter: ResampleFilter,
}

impl JpegCodec {
    pub fn new(filter: ResampleFilter) -> Self {
        Self { filter }
    }

    fn resize_with_fast_image_resize(
        image: &DynamicImage,
        target_width: u32,
        target_height: u32,
        filter: ResampleFilter,
    ) -> Result<DynamicImage, FitError> {
        let src = image.to_rgb8();
        let (src_width, src_height) = src.dimensions();

        let src_image =
            fr::images::Image::from_vec_u8(src_width, src_height, src.into_raw(), fr::PixelType::U8x3)
                .map_err(|e| FitError::Encode(format!("构建源图像缓冲失败：{}", e)))?;

        let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x3);

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new()
            .resize_alg(fr::ResizeAlg::Convolution(filter.to_fast_filter()));

        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| FitError::Encode(format!("fast_image_resize 执行失败：{}", e)))?;

        let rgb = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(
            target_width,
            target_height,
            dst_image.into_vec(),
        )
        .ok_or_else(|| FitError::Encode("fast_image_resize 输出缓冲长度异常".to_string()))?;

        Ok(DynamicImage::ImageRgb8(rgb))
    }
}

impl Default for JpegCodec {
    fn default() -> Self {
        Self::new(ResampleFilter::Bilinear)
    }
}

impl ImageCodec for JpegCodec {
    type Image = DynamicImage;

    fn encode_jpeg(&self, image: &DynamicImage, quality: u8) -> Result<Vec<u8>, FitError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(FitError::InvalidInput(format!(
                "无法编码空图片：{}x{}",
                width, height
            )));
        }

        let rgb = image.to_rgb8();
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, quality)
            .encode_image(&rgb)
            .map_err(|e| FitError::Encode(format!("JPEG 编码失败：{}", e)))?;

        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, FitError> {
        image::load_from_memory(bytes)
            .map_err(|e| FitError::Decode(format!("图片解码失败：{}", e)))
    }

    fn rescale(
        &self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, FitError> {
        if width == 0 || height == 0 {
            return Err(FitError::InvalidInput(format!(
                "缩放目标尺寸无效：{}x{}",
                width, height
            )));
        }

        match Self::resize_with_fast_image_resize(image, width, height, self.filter) {
            Ok(resized) => Ok(resized),
            Err(err) => {
                log::warn!(
                    "⚠️ fast_image_resize 降采样失败，回退 image::resize_exact：{}",
                    err
                );
                Ok(image.resize_exact(width, height, self.filter.to_image_filter()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn noisy_rgba(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(ImageBuffer::from_fn(width, height, |x, y| {
            let v = x.wrapping_mul(31) ^ y.wrapping_mul(17);
            Rgba([(v % 251) as u8, (x % 255) as u8, (y % 255) as u8, 128])
        }))
    }

    #[test]
    fn encode_jpeg_accepts_alpha_images() {
        let codec = JpegCodec::default();
        let bytes = codec
            .encode_jpeg(&noisy_rgba(64, 32), 85)
            .expect("jpeg encode failed");

        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = codec.decode(&bytes).expect("jpeg decode failed");
        assert_eq!(decoded.size(), (64, 32));
    }

    #[test]
    fn encode_jpeg_rejects_empty_image() {
        let codec = JpegCodec::default();
        let result = codec.encode_jpeg(&DynamicImage::new_rgb8(0, 0), 85);
        assert!(matches!(result, Err(FitError::InvalidInput(_))));
    }

    #[test]
    fn rescale_produces_exact_dimensions() {
        for filter in [
            ResampleFilter::Bilinear,
            ResampleFilter::CatmullRom,
            ResampleFilter::Mitchell,
            ResampleFilter::Lanczos3,
        ] {
            let codec = JpegCodec::new(filter);
            let resized = codec
                .rescale(&noisy_rgba(400, 200), 123, 61)
                .expect("rescale failed");
            assert_eq!(resized.size(), (123, 61));
        }
    }

    #[test]
    fn rescale_rejects_zero_target() {
        let codec = JpegCodec::default();
        let result = codec.rescale(&noisy_rgba(10, 10), 0, 5);
        assert!(matches!(result, Err(FitError::InvalidInput(_))));
    }

    #[test]
    fn decode_rejects_garbage() {
        let codec = JpegCodec::default();
        assert!(matches!(
            codec.decode(b"not an image"),
            Err(FitError::Decode(_))
        ));
    }
}
