//! Country flag images.
//!
//! Flags live in `gfx/flags/<TAG>.tga` at full size, with scaled-down copies
//! in `gfx/flags/medium` and `gfx/flags/small`.

use crate::error::Result;
use crate::files::sorted_files;
use image::ImageFormat;
use image::imageops::FilterType;
use std::fs;
use std::path::Path;

/// The scaled flag variants the game looks up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagSize {
    /// 10x7, used in lists.
    Small,
    /// 41x26, used in the country view and idea icons.
    Medium,
}

impl FlagSize {
    pub const ALL: [FlagSize; 2] = [FlagSize::Small, FlagSize::Medium];

    pub fn dimensions(self) -> (u32, u32) {
        match self {
            FlagSize::Small => (10, 7),
            FlagSize::Medium => (41, 26),
        }
    }

    /// Subdirectory of `gfx/flags` holding this size.
    pub fn dir_name(self) -> &'static str {
        match self {
            FlagSize::Small => "small",
            FlagSize::Medium => "medium",
        }
    }
}

fn is_tga(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tga"))
}

/// Scales the TGA at `src` to exactly `width` x `height` and writes it to `dst` as TGA.
pub fn resize_flag(src: &Path, dst: &Path, width: u32, height: u32) -> Result<()> {
    let img = image::open(src)?;
    let resized = img.resize_exact(width, height, FilterType::CatmullRom).to_rgba8();
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    resized.save_with_format(dst, ImageFormat::Tga)?;
    Ok(())
}

/// Rebuilds `<flags_dir>/<size>` from the full-size flags in `flags_dir`.
///
/// The target directory is removed first so flags deleted upstream do not
/// linger. Returns the number of flags written.
pub fn regenerate_flag_size(flags_dir: &Path, size: FlagSize) -> Result<usize> {
    let sources = sorted_files(flags_dir)?;
    let target = flags_dir.join(size.dir_name());
    if target.exists() {
        fs::remove_dir_all(&target)?;
    }
    fs::create_dir_all(&target)?;

    let (width, height) = size.dimensions();
    let mut count = 0;
    for entry in sources {
        let path = entry.path();
        if !is_tga(&path) {
            log::debug!("skipping non-flag file {}", path.display());
            continue;
        }
        resize_flag(&path, &target.join(entry.file_name()), width, height)?;
        count += 1;
    }
    log::info!("wrote {count} {} flags", size.dir_name());
    Ok(count)
}

/// Copies a flag, creating the destination directory if needed.
pub fn copy_flag(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)?;
    Ok(())
}
