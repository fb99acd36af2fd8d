//! # 体积预算适配
//!
//! ## 设计思路
//!
//! 聊天附件以 Data URL 文本嵌入消息，传输层对长度有上限。适配器反复执行
//! “按比例缩小 → JPEG 重新编码”，直到载荷长度不超过预算。
//!
//! 固定质量下 JPEG 体积大致与像素数成正比，即与线性缩放系数的平方成正比，
//! 因此每轮线性缩放 `sqrt(当前长度 / 预算)`，并把单轮缩放上限钳制为 2 倍，
//! 避免超出过多时一步压成极小图片。
//!
//! ## 实现思路
//!
//! - `scale_ratio` / `next_dimensions` 为纯函数，可脱离编解码器单独测试。
//! - 每轮只基于上一轮结果缩放，原图不会被修改。
//! - 尺寸无法继续缩小或超过迭代上限时返回 `SizeUnattainable`，不会无限循环。
//! - 任一轮编解码失败立即中止，不返回部分结果。

use std::time::Instant;

use super::codec::{ImageCodec, Raster};
use super::source::FittedImage;
use super::{FitConfig, FitError, data_url};

/// JPEG 压缩质量，固定值。
pub const JPEG_QUALITY: u8 = 85;

/// 单轮最大线性缩小倍数。
pub const MAX_STEP_RATIO: f64 = 2.0;

/// 默认迭代上限。
pub const DEFAULT_MAX_ITERATIONS: u32 = 20;

/// 计算本轮线性缩小倍数：`min(sqrt(len / max), 2.0)`。
pub fn scale_ratio(payload_len: usize, max_data_size: usize) -> f64 {
    (payload_len as f64 / max_data_size as f64)
        .sqrt()
        .min(MAX_STEP_RATIO)
}

/// 按缩小倍数计算下一轮尺寸。
///
/// 宽度向下取整，高度按当前宽高比做整数换算，最低保留 1 像素，
/// 细长条图片仍可继续缩窄。宽度为 0 或没有严格缩小时返回 `None`，表示无法继续缩小。
pub fn next_dimensions((width, height): (u32, u32), ratio: f64) -> Option<(u32, u32)> {
    if width == 0 || height == 0 {
        return None;
    }

    let new_width = (width as f64 / ratio).floor() as u32;
    if new_width == 0 || new_width >= width {
        return None;
    }

    let new_height = ((height as u64 * new_width as u64 / width as u64) as u32).max(1);

    Some((new_width, new_height))
}

/// 体积预算适配器。
pub struct ImageFitter<C> {
    codec: C,
    max_iterations: u32,
}

impl<C: ImageCodec> ImageFitter<C> {
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// 按配置创建，目前只读取迭代上限。
    pub fn from_config(codec: C, config: &FitConfig) -> Self {
        Self::new(codec).with_max_iterations(config.max_iterations)
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// 以固定质量编码一次并包装为 Data URL。
    pub fn compress_once(&self, image: &C::Image) -> Result<String, FitError> {
        let bytes = self.codec.encode_jpeg(image, JPEG_QUALITY)?;
        Ok(data_url::encode(&bytes))
    }

    /// 压缩到预算以内，仅返回载荷。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use chat_image_fit::image_fit::{ImageFitter, JpegCodec};
    ///
    /// let image = image::open("photo.jpg").expect("open photo");
    /// let fitter = ImageFitter::new(JpegCodec::default());
    /// let payload = fitter.fit_to_size(&image, 12_500)?;
    /// assert!(payload.len() <= 12_500);
    /// # Ok::<(), chat_image_fit::image_fit::FitError>(())
    /// ```
    pub fn fit_to_size(&self, image: &C::Image, max_data_size: usize) -> Result<String, FitError> {
        Ok(self.fit(image, max_data_size)?.payload)
    }

    /// 压缩到预算以内，并返回最终尺寸与迭代次数。
    pub fn fit(&self, image: &C::Image, max_data_size: usize) -> Result<FittedImage, FitError> {
        self.fit_with_cancel(image, max_data_size, || false)
    }

    /// 同 `fit`，每轮缩放前检查 `is_cancelled`。
    pub fn fit_with_cancel<F>(
        &self,
        image: &C::Image,
        max_data_size: usize,
        is_cancelled: F,
    ) -> Result<FittedImage, FitError>
    where
        F: Fn() -> bool,
    {
        if max_data_size == 0 {
            return Err(FitError::InvalidInput("体积预算必须大于 0".to_string()));
        }

        let start = Instant::now();
        let (source_width, source_height) = image.size();

        let mut scaled: Option<C::Image> = None;
        let mut iterations = 0u32;
        let mut encoded = self.compress_once(image)?;

        while encoded.len() > max_data_size {
            let current = scaled.as_ref().unwrap_or(image);
            let (width, height) = current.size();

            let unattainable = || FitError::SizeUnattainable {
                max_data_size,
                width,
                height,
                iterations,
            };

            if iterations >= self.max_iterations {
                return Err(unattainable());
            }
            if is_cancelled() {
                log::info!("⏹️ 图片适配已取消（已迭代 {} 次）", iterations);
                return Err(FitError::Cancelled);
            }

            let ratio = scale_ratio(encoded.len(), max_data_size);
            let (new_width, new_height) =
                next_dimensions((width, height), ratio).ok_or_else(unattainable)?;

            log::debug!(
                "🔁 第 {} 轮：{} 字符 > {}，ratio={:.3}，{}x{} -> {}x{}",
                iterations + 1,
                encoded.len(),
                max_data_size,
                ratio,
                width,
                height,
                new_width,
                new_height
            );

            let next = self.codec.rescale(current, new_width, new_height)?;
            encoded = self.compress_once(&next)?;
            scaled = Some(next);
            iterations += 1;
        }

        let (width, height) = scaled.as_ref().unwrap_or(image).size();
        log::info!(
            "✅ 图片适配完成 - {}x{} -> {}x{} 载荷={} 字符（预算 {}） 迭代={} 耗时={}ms",
            source_width,
            source_height,
            width,
            height,
            encoded.len(),
            max_data_size,
            iterations,
            start.elapsed().as_millis()
        );

        Ok(FittedImage {
            payload: encoded,
            width,
            height,
            iterations,
        })
    }
}
