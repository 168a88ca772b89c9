//! # 载体容器模块
//!
//! 把 BMP 文件视为三段：固定长度的头部 (原样复制)、可用于隐写的字节流、
//! 以及帧之后剩余的字节 (同样原样复制)。载体字节只能按顺序读取一次。

use crate::constants::{BMP_HEADER_SIZE, BMP_SIGNATURE, CARRIER_EXTENSION};
use crate::error::{Result, StegoError};
use crate::framing::Field;
use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read, Write};
use std::path::Path;

/// 一个只读一次的载体字节源。
#[derive(Debug)]
pub struct Carrier<R: Read> {
    reader: R,
    header: [u8; BMP_HEADER_SIZE],
    usable: u64,
    consumed: u64,
}

impl Carrier<BufReader<File>> {
    /// 打开磁盘上的 BMP 载体文件。
    ///
    /// # Errors
    ///
    /// * 路径不以 `.bmp` 结尾，或文件头部不是 BMP 头部时返回 [`StegoError::UnsupportedCarrierFormat`]。
    /// * 无法打开或读取文件时返回 [`StegoError::CarrierIo`]。
    pub fn open(path: &Path) -> Result<Self> {
        let is_bmp = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(CARRIER_EXTENSION));
        if !is_bmp {
            return Err(StegoError::UnsupportedCarrierFormat {
                reason: format!("{} is not a .bmp file", path.display()),
            });
        }

        let file = File::open(path)?;
        let total_len = file.metadata()?.len();
        Self::new(BufReader::new(file), total_len)
    }
}

impl<'a> Carrier<&'a [u8]> {
    /// 以内存中的完整 BMP 字节作为载体。
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self> {
        Self::new(bytes, bytes.len() as u64)
    }
}

impl<R: Read> Carrier<R> {
    /// 读取并校验头部，`total_len` 为整个载体 (含头部) 的字节数。
    pub fn new(mut reader: R, total_len: u64) -> Result<Self> {
        let mut header = [0u8; BMP_HEADER_SIZE];
        reader.read_exact(&mut header).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => StegoError::UnsupportedCarrierFormat {
                reason: format!("carrier is shorter than the {BMP_HEADER_SIZE}-byte BMP header"),
            },
            _ => StegoError::CarrierIo(e),
        })?;

        if !header.starts_with(BMP_SIGNATURE) {
            return Err(StegoError::UnsupportedCarrierFormat {
                reason: "missing BM signature".to_string(),
            });
        }

        Ok(Self {
            reader,
            header,
            usable: total_len.saturating_sub(BMP_HEADER_SIZE as u64),
            consumed: 0,
        })
    }

    /// 头部之后、文件末尾之前的字节数。
    pub fn usable_byte_count(&self) -> u64 {
        self.usable
    }

    /// 尚未读取的可用字节数。
    pub fn remaining(&self) -> u64 {
        self.usable - self.consumed
    }

    /// 将头部原样写入目标流。
    pub fn copy_header<W: Write>(&self, out: &mut W) -> Result<()> {
        out.write_all(&self.header)?;
        Ok(())
    }

    /// 确认还剩至少 `needed` 个载体字节，否则按短读处理。
    pub fn ensure_available(&self, needed: u64, field: Field) -> Result<()> {
        if needed > self.remaining() {
            return Err(StegoError::ShortRead {
                field,
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// 读取恰好 `N` 个载体字节，组成一个 bit run。
    pub fn read_run<const N: usize>(&mut self, field: Field) -> Result<[u8; N]> {
        let mut run = [0u8; N];
        self.read_into(&mut run, field)?;
        Ok(run)
    }

    /// 读取恰好 `n` 个载体字节。
    pub fn read_bytes(&mut self, n: usize, field: Field) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.read_into(&mut buf, field)?;
        Ok(buf)
    }

    fn read_into(&mut self, buf: &mut [u8], field: Field) -> Result<()> {
        let needed = buf.len() as u64;
        self.ensure_available(needed, field)?;

        // 文件在打开后被截断时，元数据给出的长度可能偏大
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(StegoError::ShortRead {
                        field,
                        needed,
                        available: filled as u64,
                    });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(StegoError::CarrierIo(e)),
            }
        }
        self.consumed += needed;
        Ok(())
    }

    /// 将剩余的全部载体字节原样写入目标流，返回复制的字节数。
    pub fn copy_remaining<W: Write>(&mut self, out: &mut W) -> Result<u64> {
        let copied = io::copy(&mut self.reader, out)?;
        self.consumed = self.usable.min(self.consumed + copied);
        Ok(copied)
    }
}
