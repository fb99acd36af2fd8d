//! # 聊天图片附件工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │        调用方（聊天客户端 / chat-image-fit 命令行）       │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ Result<T, AppError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            库 (Rust)                             │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  └─ image_fit ── 图片加载·裁剪·体积预算适配              │
//! │      ├─ fitter         缩放 + JPEG 重编码循环             │
//! │      ├─ crop           居中正方形裁剪                     │
//! │      └─ data_url       data:image/jpg;base64 编解码        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，命令行与配置层的返回类型 |
//! | [`image_fit`] | 将任意尺寸图片压缩为不超过体积预算的 JPEG Data URL |

pub mod error;
pub mod image_fit;
