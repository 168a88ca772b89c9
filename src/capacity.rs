//! # 容量规划模块
//!
//! 在任何破坏性写入之前判断载体能否容纳整个帧。

use crate::constants::{BITS_PER_BYTE, LENGTH_FIELD_BYTES};

/// 一次编码前的容量评估结果，计算后不再修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityReport {
    pub required_bits: u64,
    pub available_bits: u64,
    pub feasible: bool,
}

impl CapacityReport {
    /// 容量足够时剩余的可用 bit 数，不足时为 0。
    pub fn spare_bits(&self) -> u64 {
        self.available_bits.saturating_sub(self.required_bits)
    }
}

/// 计算嵌入魔数、扩展名和载荷所需的 bit 数，并与载体可用字节数比较。
///
/// 两个长度字段各按 4 字节计入；每个可用载体字节恰好承载 1 bit。
pub fn plan(
    carrier_usable_bytes: u64,
    magic_len: u64,
    ext_len: u64,
    payload_len: u64,
) -> CapacityReport {
    let frame_bytes = magic_len
        .saturating_add(LENGTH_FIELD_BYTES)
        .saturating_add(ext_len)
        .saturating_add(LENGTH_FIELD_BYTES)
        .saturating_add(payload_len);
    let required_bits = frame_bytes.saturating_mul(BITS_PER_BYTE as u64);
    let available_bits = carrier_usable_bytes;

    CapacityReport {
        required_bits,
        available_bits,
        feasible: required_bits <= available_bits,
    }
}

/// 给定载体可用字节数和扩展名长度时，能够隐藏的最大载荷字节数。
pub fn max_payload_len(carrier_usable_bytes: u64, magic_len: u64, ext_len: u64) -> u64 {
    let overhead = plan(0, magic_len, ext_len, 0).required_bits;
    carrier_usable_bytes.saturating_sub(overhead) / BITS_PER_BYTE as u64
}
