//! # 错误类型模块
//!
//! 核心隐写逻辑返回结构化的 [`StegoError`]，命令处理层再用 `anyhow` 为其附加上下文。
//! 所有错误都不可重试，也不会在内部恢复。

use crate::framing::Field;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 编码/解码过程中可能出现的全部错误。
#[derive(Debug, Error)]
pub enum StegoError {
    /// 载体不是受支持的 BMP 文件 (扩展名或头部不符)。
    #[error("unsupported carrier format: {reason}")]
    UnsupportedCarrierFormat { reason: String },

    /// 秘密文件的扩展名不在允许列表中。
    #[error("unsupported secret file extension: {extension:?} (expected one of .txt, .c, .sh)")]
    UnsupportedSecretExtension { extension: String },

    /// 载体容量不足以容纳整个帧，编码在写入任何数据前中止。
    #[error("insufficient carrier capacity: required {required_bits} bits, available {available_bits} bits")]
    InsufficientCapacity {
        required_bits: u64,
        available_bits: u64,
    },

    /// 解码得到的魔数与预期不符，载体中没有可识别的帧。
    #[error("magic marker mismatch: expected {expected:?}, found {found:?}")]
    MagicMismatch { expected: Vec<u8>, found: Vec<u8> },

    /// 在读取某个字段的过程中载体数据提前耗尽。
    #[error("carrier exhausted while reading {field}: needed {needed} bytes, {available} available")]
    ShortRead {
        field: Field,
        needed: u64,
        available: u64,
    },

    /// 字段长度超出 32 位长度字段的表示范围。
    #[error("{field} is {len} bytes long, which does not fit in a 32-bit length field")]
    LengthOverflow { field: Field, len: usize },

    /// 解码得到的扩展名不是合法的 UTF-8 文本。
    #[error("decoded extension is not valid UTF-8: {0:?}")]
    InvalidExtension(Vec<u8>),

    /// 无法打开、读取或写入秘密文件。
    #[error("cannot access secret file {}: {source}", path.display())]
    SecretIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 读写载体流时发生的底层 I/O 错误。
    #[error("carrier I/O error: {0}")]
    CarrierIo(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, StegoError>;
