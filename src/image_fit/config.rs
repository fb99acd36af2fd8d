//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `FitConfig`，保证运行时行为可观测、可调整、可测试。
//! JPEG 质量固定为 85，不属于可调项，见 `fitter::JPEG_QUALITY`。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的配置。
//! - `#[serde(default)]` 允许配置文件只写部分字段。
//! - `validate` 在加载后统一做范围校验。

use std::fs;
use std::path::Path;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use super::FitError;
use super::fitter::DEFAULT_MAX_ITERATIONS;

/// 降采样滤镜。
///
/// 仅提供平滑插值类滤镜，缩放结果不会出现最近邻的锯齿。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    Bilinear,
    CatmullRom,
    Mitchell,
    Lanczos3,
}

impl ResampleFilter {
    /// 映射到 `fast_image_resize` 的卷积滤镜。
    pub(crate) fn to_fast_filter(self) -> fast_image_resize::FilterType {
        match self {
            Self::Bilinear => fast_image_resize::FilterType::Bilinear,
            Self::CatmullRom => fast_image_resize::FilterType::CatmullRom,
            Self::Mitchell => fast_image_resize::FilterType::Mitchell,
            Self::Lanczos3 => fast_image_resize::FilterType::Lanczos3,
        }
    }

    /// 映射到 `image` 的滤镜，用于 fast_image_resize 失败时的回退路径。
    ///
    /// `image` 没有 Mitchell 滤镜，回退时改用同为三次卷积的 CatmullRom。
    pub(crate) fn to_image_filter(self) -> FilterType {
        match self {
            Self::Bilinear => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Mitchell => FilterType::CatmullRom,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// 图片适配配置。
///
/// 字段覆盖了输入读取、解码限制、降采样与迭代上限四个方面。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// 单次适配允许的最大降采样迭代次数，超过即判定为无法满足预算。
    pub max_iterations: u32,
    /// 降采样滤镜策略。
    pub resize_filter: ResampleFilter,
    /// 读取原始字节时允许的最大体积（字节）。
    pub max_input_bytes: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 调用方未指定时使用的体积预算（字符数）。
    pub default_max_data_size: usize,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            resize_filter: ResampleFilter::Bilinear,
            max_input_bytes: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            default_max_data_size: 12_500,
        }
    }
}

impl FitConfig {
    /// 校验配置取值范围。
    pub fn validate(&self) -> Result<(), FitError> {
        if !(1..=100).contains(&self.max_iterations) {
            return Err(FitError::InvalidInput(
                "max_iterations 必须在 1~100 之间".to_string(),
            ));
        }
        if self.default_max_data_size == 0 {
            return Err(FitError::InvalidInput(
                "default_max_data_size 不能为 0".to_string(),
            ));
        }
        if self.max_decoded_bytes < 8 * 1024 * 1024 {
            return Err(FitError::InvalidInput(
                "max_decoded_bytes 不能小于 8MB".to_string(),
            ));
        }
        Ok(())
    }

    /// 从 JSON 文件加载配置，缺省字段使用默认值。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use chat_image_fit::image_fit::FitConfig;
    ///
    /// let config = FitConfig::load_from_file("fit.json")?;
    /// # Ok::<(), chat_image_fit::image_fit::FitError>(())
    /// ```
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, FitError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            FitError::FileSystem(format!("读取配置文件失败：{}（{}）", path.display(), e))
        })?;

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| FitError::InvalidFormat(format!("解析配置文件失败：{}", e)))?;
        config.validate()?;

        log::info!("⚙️ 已加载配置：{}", path.display());
        Ok(config)
    }

    /// 以格式化 JSON 写入配置文件。
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), FitError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| FitError::Encode(format!("序列化配置失败：{}", e)))?;

        fs::write(path, content).map_err(|e| {
            FitError::FileSystem(format!("写入配置文件失败：{}（{}）", path.display(), e))
        })
    }
}
