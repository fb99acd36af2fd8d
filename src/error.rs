//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义应用级 `AppError`，命令行入口与配置读取统一返回 `Result<T, AppError>`，
//! 避免各处分散的 `.map_err(|e| e.to_string())`。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `FitError` 与 `std::io::Error` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，便于前端或 JSON 输出直接透传。

use serde::Serialize;

use crate::image_fit::FitError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 图片适配链路错误（加载 / 解码 / 压缩）
    #[error("{0}")]
    Image(#[from] FitError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 配置或命令行参数不合法
    #[error("配置错误: {0}")]
    Config(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_message() {
        let err = AppError::from(FitError::Cancelled);
        let json = serde_json::to_string(&err).expect("serialize failed");
        assert_eq!(json, "\"操作已取消\"");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }
}
