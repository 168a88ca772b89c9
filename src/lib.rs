//! # bmp_stego 库
//!
//! 本库包含 BMP 图像 LSB 隐写工具的核心逻辑：位打包、帧协议、容量规划和编解码驱动。

// 声明库包含的所有模块。

pub mod capacity;
pub mod carrier;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod error;
pub mod framing;
pub mod handler;
pub mod steganography;

pub use capacity::{CapacityReport, plan};
pub use carrier::Carrier;
pub use codec::{Codec, Stage};
pub use error::StegoError;
pub use framing::{Field, Frame};
