//! # 来源加载模块
//!
//! ## 设计思路
//!
//! 统一处理“文件 / 内存字节 / Data URL”三类输入，输出 `RawImageData`。
//! 读取前先做体积限制，读取后通过文件签名（magic bytes）确认是图片，
//! 避免把非图片内容交给解码器。

use std::fs;
use std::path::Path;

use super::source::RawImageData;
use super::{FitConfig, FitError, ImageSource, data_url};

/// 按来源加载原始字节。
pub(crate) fn load(source: ImageSource, config: &FitConfig) -> Result<RawImageData, FitError> {
    match source {
        ImageSource::FilePath(path) => load_from_file(&path, config),
        ImageSource::Bytes(bytes) => load_from_bytes(bytes, config),
        ImageSource::DataUrl(data) => load_from_data_url(&data, config),
    }
}

fn load_from_file(path: &Path, config: &FitConfig) -> Result<RawImageData, FitError> {
    log::info!("📁 开始读取本地图片 - 路径: {}", path.display());

    let metadata = fs::metadata(path)
        .map_err(|e| FitError::FileSystem(format!("文件不存在或不可访问：{}（{}）", path.display(), e)))?;

    if !metadata.is_file() {
        return Err(FitError::FileSystem(format!("不是文件：{}", path.display())));
    }

    check_input_size(metadata.len(), config)?;

    let bytes = fs::read(path)
        .map_err(|e| FitError::FileSystem(format!("读取文件失败：{}", e)))?;
    check_input_size(bytes.len() as u64, config)?;
    validate_image_signature(&bytes)?;

    Ok(RawImageData {
        bytes,
        source_hint: "file",
    })
}

fn load_from_bytes(bytes: Vec<u8>, config: &FitConfig) -> Result<RawImageData, FitError> {
    check_input_size(bytes.len() as u64, config)?;
    validate_image_signature(&bytes)?;

    Ok(RawImageData {
        bytes,
        source_hint: "bytes",
    })
}

fn load_from_data_url(data: &str, config: &FitConfig) -> Result<RawImageData, FitError> {
    log::info!("📝 开始处理 Data URL 图片 - {} 字符", data.len());

    let bytes = data_url::decode_with_limit(data.trim(), config.max_input_bytes)?;
    validate_image_signature(&bytes)?;

    Ok(RawImageData {
        bytes,
        source_hint: "data-url",
    })
}

fn check_input_size(len: u64, config: &FitConfig) -> Result<(), FitError> {
    if len > config.max_input_bytes {
        return Err(FitError::ResourceLimit(format!(
            "文件过大：{:.2} MB（限制：{:.2} MB）",
            len as f64 / 1024.0 / 1024.0,
            config.max_input_bytes as f64 / 1024.0 / 1024.0
        )));
    }
    Ok(())
}

/// 通过文件签名校验输入是否为图片。
fn validate_image_signature(bytes: &[u8]) -> Result<(), FitError> {
    if bytes.is_empty() {
        return Err(FitError::InvalidFormat("图片内容为空".to_string()));
    }

    let kind = infer::get(bytes)
        .ok_or_else(|| FitError::InvalidFormat("无法识别图片类型".to_string()))?;

    if kind.matcher_type() != infer::MatcherType::Image {
        return Err(FitError::InvalidFormat(format!(
            "文件签名不是图片类型：{}",
            kind.mime_type()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::new_rgb8(width, height)
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");
        cursor.into_inner()
    }

    #[test]
    fn bytes_source_accepts_png() {
        let raw = load(ImageSource::Bytes(png_bytes(8, 8)), &FitConfig::default())
            .expect("png bytes should load");
        assert_eq!(raw.source_hint, "bytes");
    }

    #[test]
    fn data_url_source_rejects_non_image_payload() {
        // "Hello" 的 Base64
        let result = load(
            ImageSource::DataUrl("data:image/png;base64,SGVsbG8=".to_string()),
            &FitConfig::default(),
        );
        assert!(matches!(result, Err(FitError::InvalidFormat(_))));
    }

    #[test]
    fn data_url_source_decodes_png() {
        let payload = format!(
            "  {}{}\n",
            data_url::PNG_DATA_URL_PREFIX,
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, png_bytes(4, 4))
        );

        let raw = load(ImageSource::DataUrl(payload), &FitConfig::default())
            .expect("data url should load");
        assert_eq!(raw.source_hint, "data-url");
    }

    #[test]
    fn oversized_bytes_are_rejected() {
        let mut config = FitConfig::default();
        config.max_input_bytes = 16;

        let result = load(ImageSource::Bytes(png_bytes(32, 32)), &config);
        assert!(matches!(result, Err(FitError::ResourceLimit(_))));
    }

    #[test]
    fn missing_file_is_reported() {
        let result = load(
            ImageSource::FilePath("/definitely/not/here.png".into()),
            &FitConfig::default(),
        );
        assert!(matches!(result, Err(FitError::FileSystem(_))));
    }

    #[test]
    fn file_source_reads_png() {
        let path = std::env::temp_dir().join(format!("chat-image-fit-loader-{}.png", std::process::id()));
        fs::write(&path, png_bytes(6, 3)).expect("write temp png failed");

        let raw = load(ImageSource::FilePath(path.clone()), &FitConfig::default());
        let _ = fs::remove_file(&path);

        let raw = raw.expect("file should load");
        assert_eq!(raw.source_hint, "file");
        assert!(!raw.bytes.is_empty());
    }
}
