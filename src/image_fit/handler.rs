//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `AttachmentPreparer` 只负责流程编排与配置管理，不关心图片从相机还是相册而来。
//! 处理链路固定为：
//! 1. 读取配置快照
//! 2. 按来源加载原始字节
//! 3. 解码（含像素 / 内存限制）
//! 4. 可选的居中正方形裁剪
//! 5. 压缩适配到体积预算
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<FitConfig>>` 支持运行时替换。
//! - 单次请求内使用“同一配置快照”，避免处理中途配置漂移。
//! - 记录 `load/decode/crop/fit/total` 阶段耗时，便于性能诊断。
//! - `crop` 复用同一加载与解码路径，只裁剪不压缩。

use std::sync::{Arc, RwLock};
use std::time::Instant;

use image::DynamicImage;

use super::codec::ImageCodec;
use super::source::FittedImage;
use super::{
    FitConfig, FitError, ImageFitter, ImageSource, JpegCodec, crop, data_url, loader, pipeline,
};

/// 聊天图片附件准备器。
pub struct AttachmentPreparer {
    config: Arc<RwLock<FitConfig>>,
}

impl AttachmentPreparer {
    /// 根据初始配置创建，配置不合法时直接返回错误。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use chat_image_fit::image_fit::{AttachmentPreparer, FitConfig, ImageSource};
    ///
    /// let preparer = AttachmentPreparer::new(FitConfig::default())?;
    /// let fitted = preparer.prepare(ImageSource::FilePath("photo.jpg".into()), Some(12_500), true)?;
    /// println!("{}x{}", fitted.width, fitted.height);
    /// # Ok::<(), chat_image_fit::image_fit::FitError>(())
    /// ```
    pub fn new(config: FitConfig) -> Result<Self, FitError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// 获取配置快照。
    pub fn config(&self) -> Result<FitConfig, FitError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| FitError::ResourceLimit("配置读取锁已中毒".to_string()))
    }

    /// 整体替换配置，校验失败时保持原配置不变。
    pub fn set_config(&self, config: FitConfig) -> Result<(), FitError> {
        config.validate()?;

        let mut current = self
            .config
            .write()
            .map_err(|_| FitError::ResourceLimit("配置写入锁已中毒".to_string()))?;

        log::info!(
            "⚙️ 已更新配置（max_iterations={}, filter={:?}, default_max_data_size={}）",
            config.max_iterations,
            config.resize_filter,
            config.default_max_data_size
        );
        *current = config;
        Ok(())
    }

    /// 处理主入口：加载、解码、可选裁剪，并压缩到预算以内。
    ///
    /// `max_data_size` 为 `None` 时使用配置中的默认预算。
    pub fn prepare(
        &self,
        source: ImageSource,
        max_data_size: Option<usize>,
        crop_square: bool,
    ) -> Result<FittedImage, FitError> {
        let config = self.config()?;
        let max_data_size = max_data_size.unwrap_or(config.default_max_data_size);
        let total_start = Instant::now();

        let load_start = Instant::now();
        let raw = loader::load(source, &config)?;
        let load_elapsed = load_start.elapsed();

        let decode_start = Instant::now();
        let mut image = pipeline::decode_raw(raw, &config)?;
        let decode_elapsed = decode_start.elapsed();

        let crop_start = Instant::now();
        if crop_square {
            image = crop::crop_to_square(&image)?;
        }
        let crop_elapsed = crop_start.elapsed();

        let fit_start = Instant::now();
        let fitter = ImageFitter::from_config(JpegCodec::new(config.resize_filter), &config);
        let fitted = fitter.fit(&image, max_data_size)?;
        let fit_elapsed = fit_start.elapsed();

        log::info!(
            "✅ 附件准备完成 - load={}ms decode={}ms crop={}ms fit={}ms total={}ms",
            load_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            crop_elapsed.as_millis(),
            fit_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(fitted)
    }

    /// 加载、解码并居中裁剪为正方形，不做压缩。
    pub fn crop(&self, source: ImageSource) -> Result<DynamicImage, FitError> {
        let config = self.config()?;
        let raw = loader::load(source, &config)?;
        let image = pipeline::decode_raw(raw, &config)?;
        let cropped = crop::crop_to_square(&image)?;

        log::debug!(
            "✂️ 裁剪完成 - {}x{} -> {}x{}",
            image.width(),
            image.height(),
            cropped.width(),
            cropped.height()
        );
        Ok(cropped)
    }

    /// 将消息中的 Data URL 还原为可显示的图片。
    pub fn payload_to_image(&self, payload: &str) -> Result<DynamicImage, FitError> {
        let config = self.config()?;
        let bytes = data_url::decode_with_limit(payload.trim(), config.max_input_bytes)?;
        JpegCodec::new(config.resize_filter).decode(&bytes)
    }
}
