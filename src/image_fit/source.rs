//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `ImageSource` 表示外部来源语义
//! - `RawImageData` 表示已加载但未解码的字节
//! - `FittedImage` 表示已适配预算的最终载荷

use std::path::PathBuf;

/// 图片输入来源。
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// 本地文件路径来源（相机拍摄或相册选图落盘后的文件）。
    FilePath(PathBuf),
    /// 已在内存中的原始图片字节。
    Bytes(Vec<u8>),
    /// Data URL（`data:image/...;base64,`）或纯 Base64 字符串。
    DataUrl(String),
}

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}

/// 适配阶段输出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FittedImage {
    /// `data:image/jpg;base64,...` 载荷。
    pub payload: String,
    /// 最终图片宽度（像素）。
    pub width: u32,
    /// 最终图片高度（像素）。
    pub height: u32,
    /// 执行的降采样次数，0 表示首次压缩即满足预算。
    pub iterations: u32,
}
