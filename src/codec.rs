//! # 编解码驱动模块
//!
//! 按 容量规划 → 帧协议 → 位打包 的顺序驱动一次完整的编码或解码。
//! 状态严格线性推进，任何一步失败都会中止整个调用，不做部分恢复。
//!
//! 驱动本身不持有跨调用的状态：载体和输出流都由调用方在每次调用时传入。

use crate::capacity::{CapacityReport, plan};
use crate::carrier::Carrier;
use crate::constants::MAGIC;
use crate::error::{Result, StegoError};
use crate::framing::{
    Field, Frame, decode_extension, length_field, read_bytes, read_length, read_magic,
    write_bytes, write_length,
};
use std::io::{Read, Write};

/// 编码/解码过程中依次经过的阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    HeaderCopied,
    MagicWritten,
    MagicVerified,
    ExtLenDone,
    ExtDone,
    PayloadLenDone,
    PayloadDone,
    Complete,
}

impl Stage {
    /// 面向用户的阶段描述。
    pub fn describe(self) -> &'static str {
        match self {
            Stage::Idle => "Starting",
            Stage::HeaderCopied => "BMP header handled",
            Stage::MagicWritten => "Magic marker embedded",
            Stage::MagicVerified => "Magic marker verified",
            Stage::ExtLenDone => "Extension length processed",
            Stage::ExtDone => "Extension processed",
            Stage::PayloadLenDone => "Payload size processed",
            Stage::PayloadDone => "Payload processed",
            Stage::Complete => "Done",
        }
    }
}

/// LSB 隐写编解码器。
#[derive(Debug, Clone, Copy)]
pub struct Codec<'m> {
    magic: &'m [u8],
}

impl Default for Codec<'static> {
    fn default() -> Self {
        Self { magic: MAGIC }
    }
}

impl<'m> Codec<'m> {
    /// 使用自定义魔数创建编解码器。
    pub fn with_magic(magic: &'m [u8]) -> Self {
        Self { magic }
    }

    pub fn magic(&self) -> &[u8] {
        self.magic
    }

    /// 评估 `frame` 能否放入 `carrier`。
    pub fn plan<R: Read>(&self, frame: &Frame, carrier: &Carrier<R>) -> CapacityReport {
        plan(
            carrier.usable_byte_count(),
            self.magic.len() as u64,
            frame.extension.len() as u64,
            frame.payload.len() as u64,
        )
    }

    /// 将 `frame` 隐藏进 `carrier`，把完整的结果图像写入 `out`。
    ///
    /// 容量评估在读取任何载体字节之前完成；容量不足时不会向 `out` 写入任何内容。
    ///
    /// # Errors
    ///
    /// * 容量不足时返回 [`StegoError::InsufficientCapacity`]。
    /// * 扩展名或载荷超出 32 位长度时返回 [`StegoError::LengthOverflow`]。
    /// * 载体在写入途中耗尽时返回 [`StegoError::ShortRead`]，此时 `out` 中的内容无效。
    pub fn encode<R, W, F>(
        &self,
        frame: &Frame,
        carrier: &mut Carrier<R>,
        out: &mut W,
        mut progress: F,
    ) -> Result<CapacityReport>
    where
        R: Read,
        W: Write,
        F: FnMut(Stage),
    {
        progress(Stage::Idle);

        let ext_len = length_field(frame.extension.len(), Field::Extension)?;
        let payload_len = length_field(frame.payload.len(), Field::Payload)?;

        let report = self.plan(frame, carrier);
        if !report.feasible {
            return Err(StegoError::InsufficientCapacity {
                required_bits: report.required_bits,
                available_bits: report.available_bits,
            });
        }

        carrier.copy_header(out)?;
        progress(Stage::HeaderCopied);

        write_bytes(self.magic, carrier, out, Field::Magic)?;
        progress(Stage::MagicWritten);

        write_length(ext_len, carrier, out, Field::ExtensionLength)?;
        progress(Stage::ExtLenDone);

        write_bytes(frame.extension.as_bytes(), carrier, out, Field::Extension)?;
        progress(Stage::ExtDone);

        write_length(payload_len, carrier, out, Field::PayloadLength)?;
        progress(Stage::PayloadLenDone);

        write_bytes(&frame.payload, carrier, out, Field::Payload)?;
        progress(Stage::PayloadDone);

        carrier.copy_remaining(out)?;
        out.flush()?;
        progress(Stage::Complete);

        Ok(report)
    }

    /// 从 `carrier` 中解出完整的帧。
    ///
    /// # Errors
    ///
    /// * 魔数不符时返回 [`StegoError::MagicMismatch`]。
    /// * 任一字段读取途中载体耗尽时返回 [`StegoError::ShortRead`]。
    /// * 扩展名不是 UTF-8 时返回 [`StegoError::InvalidExtension`]。
    pub fn decode<R, F>(&self, carrier: &mut Carrier<R>, mut progress: F) -> Result<Frame>
    where
        R: Read,
        F: FnMut(Stage),
    {
        progress(Stage::Idle);
        // 头部已在打开载体时读取，解码时直接跳过
        progress(Stage::HeaderCopied);

        read_magic(self.magic, carrier)?;
        progress(Stage::MagicVerified);

        let ext_len = read_length(carrier, Field::ExtensionLength)?;
        progress(Stage::ExtLenDone);

        let extension = decode_extension(read_bytes(ext_len, carrier, Field::Extension)?)?;
        progress(Stage::ExtDone);

        let payload_len = read_length(carrier, Field::PayloadLength)?;
        progress(Stage::PayloadLenDone);

        let payload = read_bytes(payload_len, carrier, Field::Payload)?;
        progress(Stage::PayloadDone);

        progress(Stage::Complete);
        Ok(Frame { extension, payload })
    }
}
