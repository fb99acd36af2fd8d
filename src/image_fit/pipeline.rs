//! # 解码流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → 图像”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先读取头信息做尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 猜测格式并读取 header 尺寸
//! 2. 按像素 / 内存上限快速拒绝
//! 3. 完整解码
//! 4. 以实际尺寸再次校验

use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageReader};

use super::source::RawImageData;
use super::{FitConfig, FitError};

/// 将原始字节解码为图片，解码前后均做资源限制校验。
pub(crate) fn decode_raw(raw: RawImageData, config: &FitConfig) -> Result<DynamicImage, FitError> {
    let (header_width, header_height) = inspect_dimensions_from_memory(&raw.bytes)?;
    validate_limits(config, header_width, header_height)?;

    let decoded = image::load_from_memory(&raw.bytes)
        .map_err(|e| FitError::Decode(format!("图片解码失败：{}", e)))?;

    let (width, height) = decoded.dimensions();
    validate_limits(config, width, height)?;

    if width == 0 || height == 0 {
        return Err(FitError::Decode(format!("解码结果为空图片：{}x{}", width, height)));
    }

    log::info!(
        "✅ 图片解码成功 - 来源: {} 尺寸: {}x{} 输入: {}KB",
        raw.source_hint,
        width,
        height,
        raw.bytes.len() / 1024
    );

    Ok(decoded)
}

/// 仅通过内存中的图片头信息读取宽高。
fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), FitError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| FitError::InvalidFormat(format!("无法识别图片格式：{}", e)))?
        .into_dimensions()
        .map_err(|e| FitError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
}

fn validate_limits(config: &FitConfig, width: u32, height: u32) -> Result<(), FitError> {
    let pixels = (width as u64)
        .checked_mul(height as u64)
        .ok_or_else(|| FitError::ResourceLimit("图片像素数溢出".to_string()))?;

    if pixels > config.max_decoded_pixels {
        return Err(FitError::ResourceLimit(format!(
            "图片像素过大：{} 像素（限制：{} 像素）",
            pixels, config.max_decoded_pixels
        )));
    }

    let estimated = pixels
        .checked_mul(4)
        .ok_or_else(|| FitError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

    if estimated > config.max_decoded_bytes {
        return Err(FitError::ResourceLimit(format!(
            "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
            estimated as f64 / 1024.0 / 1024.0,
            config.max_decoded_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    Ok(())
}
