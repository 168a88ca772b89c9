/// BMP 文件的标准头部大小 (字节)。
/// 头部原样复制，隐写从其后的像素数据开始。
pub const BMP_HEADER_SIZE: usize = 54;

/// BMP 文件头部的签名。
pub const BMP_SIGNATURE: &[u8; 2] = b"BM";

/// 载体文件必须使用的扩展名。
pub const CARRIER_EXTENSION: &str = "bmp";

/// 帧开头嵌入的魔数标记，解码时用于确认载体中确实存在隐藏数据。
pub const MAGIC: &[u8] = b"#*";

/// 隐藏一个数据字节所需的载体字节数 (每个载体字节只承载 1 bit)。
pub const BITS_PER_BYTE: usize = 8;

/// 隐藏一个 `u32` 长度字段所需的载体字节数。
pub const BITS_PER_LENGTH: usize = 32;

/// 长度字段按字节计的宽度，用于容量计算。
pub const LENGTH_FIELD_BYTES: u64 = 4;

/// 允许隐藏的秘密文件扩展名 (含前导点)。
pub const SUPPORTED_SECRET_EXTENSIONS: [&str; 3] = [".txt", ".c", ".sh"];

/// 未指定输出路径时，编码结果的默认文件名。
pub const DEFAULT_STEGO_NAME: &str = "stego.bmp";

/// 未指定输出路径时，解码结果的默认文件名前缀，后接解码得到的扩展名。
pub const DEFAULT_SECRET_STEM: &str = "decode_sec";
