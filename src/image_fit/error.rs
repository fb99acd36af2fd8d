//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载“加载 → 解码 → 裁剪 → 压缩适配”链路中的所有错误来源，
//! 避免字符串拼接式错误处理。通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。

/// 图片适配统一错误类型。
///
/// 该类型会在命令行/配置层被上转为 `AppError`。
#[derive(Debug, thiserror::Error)]
pub enum FitError {
    #[error("解码错误：{0}")]
    Decode(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("参数错误：{0}")]
    InvalidInput(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    /// 无法在预算内完成压缩（尺寸已无法继续缩小或超过迭代上限）。
    #[error(
        "无法满足体积预算：{max_data_size} 字符（停止于 {width}x{height}，已迭代 {iterations} 次）"
    )]
    SizeUnattainable {
        max_data_size: usize,
        width: u32,
        height: u32,
        iterations: u32,
    },

    #[error("操作已取消")]
    Cancelled,
}
