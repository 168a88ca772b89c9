//! # 命令处理逻辑模块
//!
//! 包含处理 `encode`、`decode` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责校验路径与扩展名、生成默认文件名、防止意外覆盖、
//! 调用核心编解码器以及向用户报告进度和结果。

use crate::capacity::{max_payload_len, plan};
use crate::carrier::Carrier;
use crate::cli::{CapacityArgs, DecodeArgs, EncodeArgs};
use crate::codec::{Codec, Stage};
use crate::constants::{
    BMP_HEADER_SIZE, CARRIER_EXTENSION, DEFAULT_SECRET_STEM, DEFAULT_STEGO_NAME,
    SUPPORTED_SECRET_EXTENSIONS,
};
use crate::error::StegoError;
use crate::framing::Frame;
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

fn info(quiet: bool, message: impl std::fmt::Display) {
    if !quiet {
        println!("{} : {}", "INFO".cyan().bold(), message);
    }
}

fn progress(quiet: bool) -> impl FnMut(Stage) {
    move |stage| info(quiet, stage.describe())
}

/// 返回秘密文件的扩展名 (含前导点)，只接受 `.txt`、`.c` 和 `.sh`。
pub fn secret_extension(path: &Path) -> Result<&'static str, StegoError> {
    let extension = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    accepted_extension(&extension)
}

fn accepted_extension(extension: &str) -> Result<&'static str, StegoError> {
    SUPPORTED_SECRET_EXTENSIONS
        .into_iter()
        .find(|&accepted| accepted == extension)
        .ok_or_else(|| StegoError::UnsupportedSecretExtension {
            extension: extension.to_string(),
        })
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn open_carrier(path: &Path) -> Result<Carrier<std::io::BufReader<fs::File>>> {
    Carrier::open(path).with_context(|| {
        format!(
            "Unable to use image file as a carrier: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

fn sibling(path: &Path, name: &str) -> PathBuf {
    path.parent().unwrap_or_else(|| Path::new("")).join(name)
}

/// 处理 'Encode' 命令的执行逻辑。
///
/// 负责校验载体和秘密文件、检查隐写空间是否足够、调用编码器嵌入整个帧，
/// 最后将结果写入目标图像文件。目标文件只在编码完全成功后才会被写入。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 载体不是 BMP 文件，或秘密文件扩展名不受支持。
/// * 无法读取载体或秘密文件。
/// * 目标文件已存在且未指定 `--force`。
/// * 图像没有足够的空间来隐藏秘密文件。
/// * 无法写入目标图像文件。
pub fn handle_encode(args: EncodeArgs) -> Result<()> {
    let extension = secret_extension(&args.secret).with_context(|| {
        format!(
            "Secret file must be .txt, .c or .sh: {}",
            args.secret.to_string_lossy().red().bold()
        )
    })?;
    info(args.quiet, format!("Secret file {} validated", args.secret.to_string_lossy()));

    let dest = match args.dest {
        Some(dest) => {
            let is_bmp = dest
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(CARRIER_EXTENSION));
            anyhow::ensure!(
                is_bmp,
                "Encoded file must be a .bmp file: {}",
                dest.to_string_lossy().red().bold()
            );
            dest
        }
        None => {
            let dest = sibling(&args.image, DEFAULT_STEGO_NAME);
            info(
                args.quiet,
                format!(
                    "Output file not specified. Creating {} as default",
                    dest.to_string_lossy()
                ),
            );
            dest
        }
    };
    ensure_writable(&dest, args.force)?;

    let payload = fs::read(&args.secret)
        .map_err(|source| StegoError::SecretIo {
            path: args.secret.clone(),
            source,
        })
        .with_context(|| {
            format!(
                "Unable to read secret file: {}",
                args.secret.to_string_lossy().red().bold()
            )
        })?;

    let mut carrier = open_carrier(&args.image)?;
    info(args.quiet, format!("Source image {} validated", args.image.to_string_lossy()));

    let frame = Frame::new(extension, payload);
    let codec = Codec::default();
    let report = codec.plan(&frame, &carrier);
    anyhow::ensure!(
        report.feasible,
        StegoError::InsufficientCapacity {
            required_bits: report.required_bits,
            available_bits: report.available_bits,
        }
    );
    info(
        args.quiet,
        format!(
            "Capacity OK: {} of {} bits required",
            report.required_bits, report.available_bits
        ),
    );

    let usable = usize::try_from(carrier.usable_byte_count()).unwrap_or(0);
    let mut stego = Vec::with_capacity(BMP_HEADER_SIZE.saturating_add(usable));
    codec
        .encode(&frame, &mut carrier, &mut stego, progress(args.quiet))
        .with_context(|| {
            format!(
                "Failed to hide {} in {}. \nThe image may be truncated or corrupted.",
                args.secret.to_string_lossy().red().bold(),
                args.image.to_string_lossy().red().bold()
            )
        })?;

    fs::write(&dest, stego).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The secret file has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Decode' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像、校验魔数并解出扩展名和载荷，
/// 最后将载荷写入 `<输出路径><扩展名>`。只有完整解出帧之后才会创建输出文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 图像不是 BMP 文件或无法读取。
/// * 输出路径带有扩展名。
/// * 图像中没有可识别的隐藏数据，或数据被截断。
/// * 输出文件已存在且未指定 `--force`，或无法写入。
pub fn handle_decode(args: DecodeArgs) -> Result<()> {
    let defaulted = args.output.is_none();
    let stem = match args.output {
        Some(output) => {
            anyhow::ensure!(
                output.extension().is_none(),
                "Output file must be given without an extension: {}",
                output.to_string_lossy().red().bold()
            );
            output
        }
        None => sibling(&args.image, DEFAULT_SECRET_STEM),
    };

    let mut carrier = open_carrier(&args.image)?;
    info(args.quiet, format!("Stego image {} validated", args.image.to_string_lossy()));

    let frame = Codec::default()
        .decode(&mut carrier, progress(args.quiet))
        .with_context(|| {
            format!(
                "Failed to recover hidden data from {}. \nThe image may not contain a hidden file or is corrupted.",
                args.image.to_string_lossy().red().bold()
            )
        })?;

    let extension = accepted_extension(&frame.extension).with_context(|| {
        format!(
            "Recovered an unexpected extension from {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let mut name = stem.into_os_string();
    name.push(extension);
    let target = PathBuf::from(name);
    if defaulted {
        info(
            args.quiet,
            format!("Output file not specified. Creating {} as default", target.to_string_lossy()),
        );
    }
    ensure_writable(&target, args.force)?;

    fs::write(&target, &frame.payload)
        .map_err(|source| StegoError::SecretIo {
            path: target.clone(),
            source,
        })
        .with_context(|| {
            format!(
                "Unable to write to target file: {}",
                target.to_string_lossy().red().bold()
            )
        })?;

    println!(
        "The hidden file ({} bytes) has been successfully recovered and saved: {}",
        frame.payload.len(),
        target.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑。
///
/// 报告图像中可用于隐写的字节数和可隐藏的最大文件大小；
/// 若给出秘密文件，还会报告该文件所需的容量以及能否放入。
///
/// # Errors
///
/// 图像不是 BMP 文件或无法读取，或秘密文件扩展名不受支持、无法读取时返回错误。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let carrier = open_carrier(&args.image)?;
    let usable = carrier.usable_byte_count();
    let magic_len = Codec::default().magic().len() as u64;
    let longest_ext = SUPPORTED_SECRET_EXTENSIONS
        .iter()
        .map(|ext| ext.len())
        .max()
        .unwrap_or_default() as u64;

    println!(
        "Usable carrier bytes: {}",
        usable.to_string().green().bold()
    );
    println!(
        "Largest file that fits: {} bytes",
        max_payload_len(usable, magic_len, longest_ext)
            .to_string()
            .green()
            .bold()
    );

    if let Some(secret) = args.secret {
        let extension = secret_extension(&secret)?;
        let payload_len = fs::metadata(&secret)
            .map_err(|source| StegoError::SecretIo {
                path: secret.clone(),
                source,
            })?
            .len();
        let report = plan(
            usable,
            magic_len,
            extension.len() as u64,
            payload_len,
        );

        let verdict = if report.feasible {
            "fits".green().bold()
        } else {
            "does not fit".red().bold()
        };
        println!(
            "{}: required {} bits, available {} bits, {} ({} bits to spare)",
            secret.to_string_lossy(),
            report.required_bits,
            report.available_bits,
            verdict,
            report.spare_bits()
        );
    }

    Ok(())
}
