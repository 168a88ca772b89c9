//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在未压缩的 BMP 图像中隐藏或恢复小文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在未压缩的 BMP 图像中隐藏或恢复小文件 (.txt, .c, .sh)。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：encode (隐藏)、decode (恢复) 和 capacity (容量查询)。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 将秘密文件隐藏进 BMP 图像。
    Encode(EncodeArgs),

    /// 从经过隐写的 BMP 图像中恢复秘密文件。
    Decode(DecodeArgs),

    /// 查询 BMP 图像能够容纳的数据量。
    Capacity(CapacityArgs),
}

/// 'encode' 命令所需的参数。
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// 用作载体的 BMP 图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的秘密文件路径 (.txt, .c 或 .sh)。
    #[arg(short, long)]
    pub secret: PathBuf,

    /// 结果图像的保存路径 (必须是 .bmp)。默认为载体所在目录下的 `stego.bmp`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 不输出逐步的进度信息。
    #[arg(short, long)]
    pub quiet: bool,
}

/// 'decode' 命令所需的参数。
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// 已隐藏数据的 BMP 图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文件的保存路径，不含扩展名 (扩展名取自图像中隐藏的信息)。
    /// 默认为图像所在目录下的 `decode_sec`。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,

    /// 不输出逐步的进度信息。
    #[arg(short, long)]
    pub quiet: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// 要查询的 BMP 图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 可选：检查该秘密文件能否放入图像。
    #[arg(short, long)]
    pub secret: Option<PathBuf>,
}
