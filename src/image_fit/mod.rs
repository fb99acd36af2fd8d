//! # 图片适配模块（image_fit）
//!
//! ## 设计思路
//!
//! 该模块将“来源加载 → 解码校验 → 居中裁剪 → 体积预算适配 → Data URL 编码”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `handler`：编排整条处理流水线
//! - `loader`：负责文件 / 字节 / Data URL 加载与签名校验
//! - `pipeline`：负责解码与像素 / 内存限制
//! - `crop`：居中正方形裁剪
//! - `fitter`：核心适配循环（缩放 + JPEG 重编码）
//! - `codec`：编解码能力抽象与基于 `image` 的实现
//! - `data_url`：Data URL 编解码
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! ```text
//! 调用方（CLI / 聊天客户端）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ loader.rs（来源加载 + 体积 / 签名校验）
//!    ├─ pipeline.rs（解码 + 像素限制）
//!    ├─ crop.rs（可选正方形裁剪）
//!    └─ fitter.rs（循环缩放直到载荷不超过预算）
//!         ├─ codec.rs（JPEG 编码 / 缩放）
//!         └─ data_url.rs（Base64 包装）
//!    ↓
//! 返回 FittedImage / FitError
//! ```
//!
//! 只需要核心算法时可以直接使用 `ImageFitter`，并通过 `ImageCodec` 注入自己的编解码实现。

mod codec;
mod config;
pub mod crop;
pub mod data_url;
mod error;
mod fitter;
mod handler;
mod loader;
mod pipeline;
mod source;

pub use codec::{ImageCodec, JpegCodec, Raster};
pub use config::{FitConfig, ResampleFilter};
pub use error::FitError;
pub use fitter::{
    DEFAULT_MAX_ITERATIONS, ImageFitter, JPEG_QUALITY, MAX_STEP_RATIO, next_dimensions,
    scale_ratio,
};
pub use handler::AttachmentPreparer;
pub use source::{FittedImage, ImageSource};
