use bmp_stego::{
    cli::{CapacityArgs, DecodeArgs, EncodeArgs},
    handler::{handle_capacity, handle_decode, handle_encode},
    StegoError,
};
use image::{ImageBuffer, Rgb};
use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的 BMP 测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut raw_pixels = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);
    let img_buf: ImageBuffer<Rgb<u8>, _> =
        ImageBuffer::from_raw(width, height, raw_pixels).expect("Pixel buffer has the wrong size.");
    img_buf.save(path).expect("Failed to create test image.");
}

/// 创建一个所有像素最低位都为 0 的图像，其中必然不含隐藏数据
fn create_clean_image(path: &Path, width: u32, height: u32) {
    let mut raw_pixels = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);
    raw_pixels.iter_mut().for_each(|b| *b &= 0xFE);
    let img_buf: ImageBuffer<Rgb<u8>, _> =
        ImageBuffer::from_raw(width, height, raw_pixels).expect("Pixel buffer has the wrong size.");
    img_buf.save(path).expect("Failed to create test image.");
}

fn encode_args(image: &Path, secret: &Path, dest: Option<PathBuf>, force: bool) -> EncodeArgs {
    EncodeArgs {
        image: image.to_path_buf(),
        secret: secret.to_path_buf(),
        dest,
        force,
        quiet: true,
    }
}

fn decode_args(image: &Path, output: Option<PathBuf>, force: bool) -> DecodeArgs {
    DecodeArgs {
        image: image.to_path_buf(),
        output,
        force,
        quiet: true,
    }
}

/// 验证从隐藏到恢复的完整流程
#[test]
fn test_handle_encode_and_decode_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.bmp");
    let hidden_image_path = dir.path().join("hidden.bmp");
    let source_text_path = dir.path().join("source.txt");
    let recovered_stem = dir.path().join("recovered");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "This is a test message for the handler! 这是一个给处理器的测试信息！";
    fs::write(&source_text_path, original_text)?;

    // 2. 测试 handle_encode
    handle_encode(encode_args(
        &original_image_path,
        &source_text_path,
        Some(hidden_image_path.clone()),
        false,
    ))?;
    assert!(hidden_image_path.exists(), "Hidden image should be created.");

    let original = fs::read(&original_image_path)?;
    let hidden = fs::read(&hidden_image_path)?;
    assert_eq!(original.len(), hidden.len());
    assert_eq!(original[..54], hidden[..54], "Header must be copied verbatim.");

    // 3. 测试 handle_decode
    handle_decode(decode_args(&hidden_image_path, Some(recovered_stem), false))?;
    let recovered_text_path = dir.path().join("recovered.txt");
    assert!(
        recovered_text_path.exists(),
        "Recovered text file should carry the hidden extension."
    );

    // 4. 验证结果
    let recovered_text = fs::read_to_string(&recovered_text_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text must match the original."
    );

    Ok(())
}

/// 验证当用户不提供输出路径时，是否能正确生成默认路径并完成操作
#[test]
fn test_handle_encode_and_decode_with_defaults() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.bmp");
    let source_path = dir.path().join("script.sh");

    create_test_image(&original_image_path, 64, 64);
    let original_script = b"#!/bin/sh\necho \"hidden\"\n";
    fs::write(&source_path, original_script)?;

    handle_encode(encode_args(&original_image_path, &source_path, None, false))?;

    let expected_hidden_path = dir.path().join("stego.bmp");
    assert!(
        expected_hidden_path.exists(),
        "Default hidden image should be created at: {:?}",
        expected_hidden_path
    );

    handle_decode(decode_args(&expected_hidden_path, None, false))?;

    let expected_recovered_path = dir.path().join("decode_sec.sh");
    assert!(
        expected_recovered_path.exists(),
        "Default recovered file should be created at: {:?}",
        expected_recovered_path
    );
    assert_eq!(fs::read(&expected_recovered_path)?, original_script);

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.bmp");
    let text_path = dir.path().join("text.c");
    let dest_path = dir.path().join("dest.bmp");

    create_test_image(&image_path, 50, 50);
    fs::write(&text_path, "int main(void) { return 0; }")?;

    // 场景一：目标文件已存在，不使用 --force
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;

    let args = encode_args(&image_path, &text_path, Some(dest_path.clone()), false);
    let result = handle_encode(args);
    assert!(result.is_err(), "Execution should fail without --force when file exists.");
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 场景二：使用 --force 强制覆盖
    let result = handle_encode(encode_args(&image_path, &text_path, Some(dest_path.clone()), true));
    assert!(result.is_ok(), "Execution should succeed with --force when file exists.");

    let dummy_content = fs::read(&dest_path)?;
    assert_ne!(dummy_content, b"this is a dummy file to be overwritten");

    // 解码同样受覆盖保护
    let recovered_path = dir.path().join("decode_sec.c");
    fs::write(&recovered_path, "old")?;
    assert!(handle_decode(decode_args(&dest_path, None, false)).is_err());
    handle_decode(decode_args(&dest_path, None, true))?;
    assert_eq!(fs::read_to_string(&recovered_path)?, "int main(void) { return 0; }");

    Ok(())
}

/// 验证空间不足时的错误处理，且不会生成目标文件
#[test]
fn test_handle_encode_not_enough_space() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("small.bmp");
    let text_path = dir.path().join("large.txt");
    let dest_path = dir.path().join("dest.bmp");

    create_test_image(&image_path, 10, 10);
    fs::write(&text_path, "a".repeat(5000))?;

    let args = encode_args(&image_path, &text_path, Some(dest_path.clone()), false);
    let result = handle_encode(args);

    let err = result.expect_err("Encoding should fail for a tiny carrier.");
    assert!(matches!(
        err.downcast_ref::<StegoError>(),
        Some(StegoError::InsufficientCapacity { .. })
    ));
    assert!(!dest_path.exists(), "No output should be written.");

    Ok(())
}

/// 验证对不含隐藏数据的图像解码时报告魔数不符，且不创建输出文件
#[test]
fn test_handle_decode_without_hidden_data() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("clean.bmp");
    create_clean_image(&image_path, 40, 40);

    let err = handle_decode(decode_args(&image_path, None, false))
        .expect_err("A clean image holds no frame.");
    assert!(matches!(
        err.downcast_ref::<StegoError>(),
        Some(StegoError::MagicMismatch { .. })
    ));

    let created: Vec<_> = fs::read_dir(dir.path())?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("decode_sec"))
        .collect();
    assert!(created.is_empty(), "No payload file should be created.");

    Ok(())
}

/// 验证输入格式校验：载体必须是 BMP，秘密文件扩展名必须受支持
#[test]
fn test_rejects_unsupported_inputs() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.bmp");
    let text_path = dir.path().join("text.txt");
    let notes_path = dir.path().join("notes.md");
    let png_path = dir.path().join("image.png");

    create_test_image(&image_path, 20, 20);
    fs::write(&text_path, "hi")?;
    fs::write(&notes_path, "hi")?;
    fs::write(&png_path, fs::read(&image_path)?)?;

    let err = handle_encode(encode_args(&png_path, &text_path, None, false)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StegoError>(),
        Some(StegoError::UnsupportedCarrierFormat { .. })
    ));

    let err = handle_encode(encode_args(&image_path, &notes_path, None, false)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StegoError>(),
        Some(StegoError::UnsupportedSecretExtension { .. })
    ));

    let bad_dest = Some(dir.path().join("out.png"));
    assert!(handle_encode(encode_args(&image_path, &text_path, bad_dest, false)).is_err());

    // 解码输出路径不能带扩展名
    let bad_output = Some(dir.path().join("out.txt"));
    assert!(handle_decode(decode_args(&image_path, bad_output, false)).is_err());

    Ok(())
}

/// 验证容量查询命令
#[test]
fn test_handle_capacity() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.bmp");
    let text_path = dir.path().join("text.txt");

    create_test_image(&image_path, 30, 30);
    fs::write(&text_path, "hello")?;

    handle_capacity(CapacityArgs {
        image: image_path.clone(),
        secret: Some(text_path),
    })?;

    let err = handle_capacity(CapacityArgs {
        image: image_path,
        secret: Some(dir.path().join("missing.txt")),
    })
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StegoError>(),
        Some(StegoError::SecretIo { .. })
    ));

    Ok(())
}
