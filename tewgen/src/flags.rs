use anyhow::{Context, Result};
use hoi4data::flags::{FlagSize, regenerate_flag_size};
use std::path::{Path, PathBuf};

pub fn flags_dir(mod_root: &Path) -> PathBuf {
    mod_root.join("gfx").join("flags")
}

fn regenerate(flags_dir: &Path, size: FlagSize) -> Result<usize> {
    regenerate_flag_size(flags_dir, size)
        .with_context(|| format!("regenerating {} flags", size.dir_name()))
}

/// Rebuilds the small and medium flags of the mod side by side.
pub fn regenerate_all(mod_root: &Path) -> Result<()> {
    let dir = flags_dir(mod_root);
    let (small, medium) = rayon::join(
        || regenerate(&dir, FlagSize::Small),
        || regenerate(&dir, FlagSize::Medium),
    );
    small?;
    medium?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_regenerate_all() {
        let dir = tempfile::tempdir().unwrap();
        let flags = flags_dir(dir.path());
        std::fs::create_dir_all(&flags).unwrap();
        RgbaImage::from_pixel(82, 52, Rgba([1, 2, 3, 255]))
            .save_with_format(flags.join("TEW.tga"), image::ImageFormat::Tga)
            .unwrap();

        regenerate_all(dir.path()).unwrap();
        let small = image::open(flags.join("small/TEW.tga")).unwrap();
        assert_eq!((small.width(), small.height()), (10, 7));
        let medium = image::open(flags.join("medium/TEW.tga")).unwrap();
        assert_eq!((medium.width(), medium.height()), (41, 26));
    }

    #[test]
    fn test_missing_flags_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = regenerate_all(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("flags"));
    }
}
