//! # 位打包模块
//!
//! 在一段载体字节 (bit run) 的最低有效位中写入或读出数值。
//! 每个载体字节只承载 1 bit，高位在前；载体字节的第 1–7 位保持不变。

use crate::constants::{BITS_PER_BYTE, BITS_PER_LENGTH};

/// 隐藏一个数据字节所用的载体字节段。
pub type ByteRun = [u8; BITS_PER_BYTE];

/// 隐藏一个 32 位长度所用的载体字节段。
pub type LengthRun = [u8; BITS_PER_LENGTH];

fn pack<const N: usize>(value: u32, run: &mut [u8; N]) {
    for (i, byte) in run.iter_mut().enumerate() {
        let bit = ((value >> (N - 1 - i)) & 1) as u8;
        *byte = (*byte & !1) | bit;
    }
}

fn unpack<const N: usize>(run: &[u8; N]) -> u32 {
    run.iter()
        .enumerate()
        .fold(0, |acc, (i, &byte)| acc | (u32::from(byte & 1) << (N - 1 - i)))
}

/// 将 `value` 的 8 个 bit (高位在前) 依次写入 `run` 中每个字节的最低位。
pub fn pack_byte(value: u8, run: &mut ByteRun) {
    pack(u32::from(value), run);
}

/// [`pack_byte`] 的逆操作。
pub fn unpack_byte(run: &ByteRun) -> u8 {
    // 8 个 bit 的累加结果不会超过 u8 范围
    unpack(run) as u8
}

/// 将 `value` 的 32 个 bit 按大端位序写入 `run` 中每个字节的最低位。
pub fn pack_u32(value: u32, run: &mut LengthRun) {
    pack(value, run);
}

/// [`pack_u32`] 的逆操作。
pub fn unpack_u32(run: &LengthRun) -> u32 {
    unpack(run)
}
