//! # 帧协议模块
//!
//! 帧由以下字段按固定顺序组成，没有任何标签或重排：
//!
//! ```text
//! 魔数 | 扩展名长度 (u32) | 扩展名 | 载荷长度 (u32) | 载荷
//! ```
//!
//! 每个数据字节占用 8 个载体字节，每个长度字段占用 32 个载体字节。

use crate::carrier::Carrier;
use crate::constants::BITS_PER_BYTE;
use crate::error::{Result, StegoError};
use crate::steganography::{pack_byte, pack_u32, unpack_byte, unpack_u32};
use std::fmt;
use std::io::{Read, Write};

/// 帧中的字段，用于错误报告。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Magic,
    ExtensionLength,
    Extension,
    PayloadLength,
    Payload,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Magic => "magic marker",
            Field::ExtensionLength => "extension length",
            Field::Extension => "extension",
            Field::PayloadLength => "payload length",
            Field::Payload => "payload",
        };
        f.write_str(name)
    }
}

/// 一次编码或解码中流转的完整帧。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// 秘密文件的扩展名，包含前导点，例如 `.txt`。
    pub extension: String,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(extension: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            extension: extension.into(),
            payload: payload.into(),
        }
    }
}

/// 将 `len` 转换为 32 位长度字段的值。
pub fn length_field(len: usize, field: Field) -> Result<u32> {
    u32::try_from(len).map_err(|_| StegoError::LengthOverflow { field, len })
}

/// 逐字节地把 `data` 打包进载体，并把结果写入 `out`。
pub fn write_bytes<R: Read, W: Write>(
    data: &[u8],
    carrier: &mut Carrier<R>,
    out: &mut W,
    field: Field,
) -> Result<()> {
    for &value in data {
        let mut run = carrier.read_run(field)?;
        pack_byte(value, &mut run);
        out.write_all(&run)?;
    }
    Ok(())
}

/// 把一个 32 位长度字段打包进载体。
pub fn write_length<R: Read, W: Write>(
    value: u32,
    carrier: &mut Carrier<R>,
    out: &mut W,
    field: Field,
) -> Result<()> {
    let mut run = carrier.read_run(field)?;
    pack_u32(value, &mut run);
    out.write_all(&run)?;
    Ok(())
}

/// 从载体中解出 `len` 个数据字节。
///
/// 在分配缓冲区之前先确认载体剩余字节足够，损坏的长度字段不会导致巨大的内存分配。
pub fn read_bytes<R: Read>(len: u32, carrier: &mut Carrier<R>, field: Field) -> Result<Vec<u8>> {
    carrier.ensure_available(u64::from(len) * BITS_PER_BYTE as u64, field)?;

    (0..len)
        .map(|_| carrier.read_run(field).map(|run| unpack_byte(&run)))
        .collect()
}

/// 从载体中解出一个 32 位长度字段。
pub fn read_length<R: Read>(carrier: &mut Carrier<R>, field: Field) -> Result<u32> {
    let run = carrier.read_run(field)?;
    Ok(unpack_u32(&run))
}

/// 解出与 `expected` 等长的魔数并逐字节比较，任何不一致都视为没有帧。
pub fn read_magic<R: Read>(expected: &[u8], carrier: &mut Carrier<R>) -> Result<()> {
    let len = length_field(expected.len(), Field::Magic)?;
    let found = read_bytes(len, carrier, Field::Magic)?;
    if found != expected {
        return Err(StegoError::MagicMismatch {
            expected: expected.to_vec(),
            found,
        });
    }
    Ok(())
}

/// 把解出的扩展名字节转换为文本。
pub fn decode_extension(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| StegoError::InvalidExtension(e.into_bytes()))
}
