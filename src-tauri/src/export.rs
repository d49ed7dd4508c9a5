//! Writing exported schedule snapshots to disk.
//!
//! The page sends a `data:image/png;base64,...` URL. It is decoded, checked
//! to be a real PNG, and written atomically next to any earlier exports
//! without overwriting them.

use anyhow::{anyhow, bail, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Local};
use image::ImageFormat;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Decode a PNG data URL and verify the payload is a decodable, non-empty PNG.
pub fn decode_png_data_url(data_url: &str) -> Result<Vec<u8>> {
    let payload = data_url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or_else(|| anyhow!("Expected a PNG data URL"))?;

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| anyhow!("Invalid base64 image data: {}", e))?;

    let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .map_err(|e| anyhow!("Failed to decode PNG: {}", e))?;
    if img.width() == 0 || img.height() == 0 {
        bail!("Snapshot is empty");
    }
    info!("Decoded snapshot: {}x{}", img.width(), img.height());
    Ok(bytes)
}

/// Reduce a requested file name to a bare `*.png` name.
pub fn sanitize_file_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        bail!("Invalid export file name: {:?}", name);
    }
    if name.to_ascii_lowercase().ends_with(".png") {
        Ok(name.to_string())
    } else {
        Ok(format!("{}.png", name))
    }
}

/// First free path for `file_name` in `dir`. A taken name gets a timestamp
/// suffix, and a counter after that if needed.
pub fn unique_target(dir: &Path, file_name: &str, now: DateTime<Local>) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = file_name
        .strip_suffix(".png")
        .or_else(|| file_name.strip_suffix(".PNG"))
        .unwrap_or(file_name);
    let stamp = now.format("%Y%m%d-%H%M%S");
    let stamped = dir.join(format!("{}-{}.png", stem, stamp));
    if !stamped.exists() {
        return stamped;
    }

    (2u32..)
        .map(|n| dir.join(format!("{}-{}-{}.png", stem, stamp, n)))
        .find(|p| !p.exists())
        .unwrap_or(stamped)
}

/// Write bytes through a temp file in the same directory, then rename.
pub fn write_png_atomic(bytes: &[u8], target_path: &Path) -> Result<()> {
    let parent = target_path
        .parent()
        .ok_or_else(|| anyhow!("Target path has no parent directory: {:?}", target_path))?;

    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.persist(target_path)?;

    info!("Wrote snapshot to {:?}", target_path);
    Ok(())
}

/// Decode `data_url` and save it in `dir` under (a free variant of) `file_name`.
pub fn save_snapshot(dir: &Path, data_url: &str, file_name: &str) -> Result<PathBuf> {
    let bytes = decode_png_data_url(data_url)?;
    let file_name = sanitize_file_name(file_name)?;
    let target = unique_target(dir, &file_name, Local::now());
    write_png_atomic(&bytes, &target)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use image::DynamicImage;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn png_data_url(width: u32, height: u32) -> String {
        let img = DynamicImage::new_rgb8(width, height);
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(buffer.into_inner()))
    }

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_decode_valid_png() {
        let bytes = decode_png_data_url(&png_data_url(40, 20)).unwrap();
        // PNG signature
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_decode_rejects_other_mime() {
        let result = decode_png_data_url("data:image/jpeg;base64,AAAA");
        assert!(result.unwrap_err().to_string().contains("PNG data URL"));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let result = decode_png_data_url("data:image/png;base64,***");
        assert!(result.unwrap_err().to_string().contains("base64"));
    }

    #[test]
    fn test_decode_rejects_non_png_payload() {
        let url = format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(b"not an image"));
        let result = decode_png_data_url(&url);
        assert!(result.unwrap_err().to_string().contains("Failed to decode PNG"));
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("my-class-schedule.png").unwrap(), "my-class-schedule.png");
        assert_eq!(sanitize_file_name("week 3").unwrap(), "week 3.png");
        assert!(sanitize_file_name("../evil.png").is_err());
        assert!(sanitize_file_name("a\\b.png").is_err());
        assert!(sanitize_file_name("  ").is_err());
    }

    #[test]
    fn test_unique_target_free_name() {
        let dir = TempDir::new().unwrap();
        let target = unique_target(dir.path(), "schedule.png", fixed_now());
        assert_eq!(target, dir.path().join("schedule.png"));
    }

    #[test]
    fn test_unique_target_taken_name_gets_timestamp() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("schedule.png"), b"old").unwrap();
        let target = unique_target(dir.path(), "schedule.png", fixed_now());
        assert_eq!(target, dir.path().join("schedule-20261018-093000.png"));

        std::fs::write(&target, b"old").unwrap();
        let next = unique_target(dir.path(), "schedule.png", fixed_now());
        assert_eq!(next, dir.path().join("schedule-20261018-093000-2.png"));
    }

    #[test]
    fn test_save_snapshot_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let first = save_snapshot(dir.path(), &png_data_url(10, 10), "my-class-schedule.png").unwrap();
        let second = save_snapshot(dir.path(), &png_data_url(12, 12), "my-class-schedule.png").unwrap();

        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
        let reread = image::open(&first).unwrap();
        assert_eq!(reread.width(), 10);
    }

    #[test]
    fn test_save_snapshot_invalid_data_writes_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(save_snapshot(dir.path(), "data:text/plain,hi", "x.png").is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
