use std::path::Path;
use std::process::Command;

use image::{Rgba, RgbaImage};
use tempfile::TempDir;

fn export(wallpaper: &Path, target: &Path, extra: &[&str]) -> std::process::ExitStatus {
    Command::new(env!("CARGO_BIN_EXE_libredesktop"))
        .env_remove("LIBREDESKTOP_WALLPAPER")
        .env("USER", "tester")
        .arg("--wallpaper")
        .arg(wallpaper)
        .arg("--export")
        .arg(target)
        .args(extra)
        .status()
        .expect("failed to run libredesktop --export")
}

#[test]
fn export_without_wallpaper_renders_text_only() {
    let root = TempDir::new().unwrap();
    let target = root.path().join("frame.png");

    let status = export(
        &root.path().join("missing.png"),
        &target,
        &["--size", "160x90"],
    );

    assert!(status.success());
    let frame = image::open(&target).unwrap().to_rgba8();
    assert_eq!(frame.dimensions(), (160, 90));
    assert_eq!(frame.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
}

#[test]
fn export_covers_frame_with_wallpaper() {
    let root = TempDir::new().unwrap();
    let wallpaper = root.path().join("wallpaper.png");
    RgbaImage::from_pixel(40, 10, Rgba([20, 40, 200, 255]))
        .save(&wallpaper)
        .unwrap();
    let target = root.path().join("clock.png");

    let status = export(
        &wallpaper,
        &target,
        &["--size", "120x120", "--export-mode", "clock"],
    );

    assert!(status.success());
    let frame = image::open(&target).unwrap().to_rgba8();
    assert_eq!(frame.dimensions(), (120, 120));
    for (x, y) in [(0, 0), (119, 0), (0, 119), (119, 119)] {
        let pixel = frame.get_pixel(x, y);
        assert!(pixel[2] >= 195 && pixel[0] <= 25, "pixel {x},{y}: {pixel:?}");
    }
}

#[test]
fn corrupt_wallpaper_is_not_fatal() {
    let root = TempDir::new().unwrap();
    let wallpaper = root.path().join("wallpaper.png");
    std::fs::write(&wallpaper, b"definitely not a png").unwrap();
    let target = root.path().join("frame.png");

    let status = export(&wallpaper, &target, &["--size", "64x64"]);

    assert!(status.success());
    assert!(target.exists());
}

#[test]
fn invalid_size_is_a_usage_error() {
    let root = TempDir::new().unwrap();
    let status = export(
        &root.path().join("missing.png"),
        &root.path().join("frame.png"),
        &["--size", "0x10"],
    );
    assert_eq!(status.code(), Some(2));
}
