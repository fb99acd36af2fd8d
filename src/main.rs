//! # 聊天图片附件工具 — 命令行入口
//!
//! 本文件仅负责日志初始化、参数解析与结果输出。
//! 业务逻辑分布在 `image_fit` 子模块中，详见 `lib.rs` 架构文档。

use std::fs;
use std::path::PathBuf;

use chat_image_fit::error::AppError;
use chat_image_fit::image_fit::{AttachmentPreparer, FitConfig, FitError, ImageSource};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "chat-image-fit", version, about = "将图片压缩为不超过体积预算的 JPEG Data URL")]
struct Cli {
    /// JSON 配置文件路径，缺省字段使用默认值
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 压缩图片并输出 Data URL
    Fit {
        input: PathBuf,
        /// 载荷最大字符数，缺省使用配置中的 default_max_data_size
        #[arg(long)]
        max_size: Option<usize>,
        /// 压缩前先居中裁剪为正方形
        #[arg(long)]
        crop_square: bool,
        /// 输出文件，缺省打印到标准输出
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// 居中裁剪为正方形并保存（格式由扩展名决定）
    Crop {
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// 将 Data URL 文件还原为图片
    Decode {
        payload_file: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Cli::parse()) {
        log::error!("❌ {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = match &cli.config {
        Some(path) => FitConfig::load_from_file(path)?,
        None => FitConfig::default(),
    };
    let preparer = AttachmentPreparer::new(config)?;

    match cli.command {
        Command::Fit {
            input,
            max_size,
            crop_square,
            output,
        } => {
            if max_size == Some(0) {
                return Err(AppError::Config("--max-size 必须大于 0".to_string()));
            }

            let fitted = preparer.prepare(ImageSource::FilePath(input), max_size, crop_square)?;
            log::info!(
                "📦 输出 {}x{}，载荷 {} 字符，迭代 {} 次",
                fitted.width,
                fitted.height,
                fitted.payload.len(),
                fitted.iterations
            );

            match output {
                Some(path) => fs::write(path, fitted.payload)?,
                None => println!("{}", fitted.payload),
            }
        }
        Command::Crop { input, output } => {
            let cropped = preparer.crop(ImageSource::FilePath(input))?;
            cropped
                .save(&output)
                .map_err(|e| FitError::FileSystem(format!("保存失败 {}：{}", output.display(), e)))?;
            log::info!("✂️ 已保存 {}x{} -> {}", cropped.width(), cropped.height(), output.display());
        }
        Command::Decode {
            payload_file,
            output,
        } => {
            let payload = fs::read_to_string(&payload_file)?;
            let image = preparer.payload_to_image(&payload)?;
            image
                .save(&output)
                .map_err(|e| FitError::FileSystem(format!("保存失败 {}：{}", output.display(), e)))?;
            log::info!("🖼️ 已还原 {}x{} -> {}", image.width(), image.height(), output.display());
        }
    }

    Ok(())
}
