use std::path::{Path, PathBuf};

/// Folder name of the game inside a Steam library.
const STEAM_FOLDER: &str = "Hearts of Iron IV";

/// Game executables by platform. macOS ships an app bundle.
const EXECUTABLES: [&str; 3] = ["hoi4.exe", "hoi4", "hoi4.app"];

/// Whether `path` looks like a Hearts of Iron IV installation: a game
/// executable next to the `common/country_tags` database.
pub fn is_game_dir(path: &Path) -> bool {
    path.join("common").join("country_tags").is_dir()
        && EXECUTABLES.iter().any(|exe| path.join(exe).exists())
}

/// Steam library locations the game is usually installed under.
fn steam_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![
        PathBuf::from(r"C:\Program Files (x86)\Steam\steamapps\common").join(STEAM_FOLDER),
        PathBuf::from(r"C:\Program Files\Steam\steamapps\common").join(STEAM_FOLDER),
    ];
    if let Some(home) = dirs::home_dir() {
        for library in [
            ".local/share/Steam/steamapps/common",
            ".steam/steam/steamapps/common",
            ".var/app/com.valvesoftware.Steam/.local/share/Steam/steamapps/common",
            "Library/Application Support/Steam/steamapps/common",
        ] {
            candidates.push(home.join(library).join(STEAM_FOLDER));
        }
    }
    candidates
}

/// The first of `candidates` that holds a game installation.
fn find_game_dir(candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    candidates.into_iter().find(|path| is_game_dir(path))
}

/// Detects the Hearts of Iron IV installation path.
///
/// Checks the default Steam libraries on Windows, Linux (native and
/// Flatpak) and macOS. A directory only counts when [`is_game_dir`] accepts
/// it, so an empty leftover folder is not picked up.
pub fn detect_game_path() -> Option<PathBuf> {
    let found = find_game_dir(steam_candidates());
    match &found {
        Some(path) => log::debug!("found Hearts of Iron IV at {}", path.display()),
        None => log::debug!("no Hearts of Iron IV installation found"),
    }
    found
}

/// Default location of the user's mod folder, where the launcher keeps
/// `<name>.mod` descriptors and local mods.
pub fn default_mod_dir() -> Option<PathBuf> {
    dirs::document_dir().map(|docs| {
        docs.join("Paradox Interactive")
            .join("Hearts of Iron IV")
            .join("mod")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_game_path_does_not_panic() {
        // The machine running the tests usually has no installation.
        let _ = detect_game_path();
    }

    fn fake_install(root: &Path, exe: &str) {
        std::fs::create_dir_all(root.join("common/country_tags")).unwrap();
        std::fs::write(root.join(exe), "").unwrap();
    }

    #[test]
    fn test_is_game_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_game_dir(dir.path()));
        std::fs::create_dir_all(dir.path().join("common/country_tags")).unwrap();
        assert!(!is_game_dir(dir.path()));
        std::fs::write(dir.path().join("hoi4"), "").unwrap();
        assert!(is_game_dir(dir.path()));
    }

    #[test]
    fn test_find_game_dir_skips_empty_folders() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("a").join(STEAM_FOLDER);
        std::fs::create_dir_all(&empty).unwrap();
        let real = dir.path().join("b").join(STEAM_FOLDER);
        fake_install(&real, "hoi4.exe");

        let found = find_game_dir([dir.path().join("missing"), empty, real.clone()]);
        assert_eq!(found, Some(real));
    }

    #[test]
    fn test_steam_candidates_end_in_game_folder() {
        assert!(steam_candidates().iter().all(|p| p.ends_with(STEAM_FOLDER)));
    }

    #[test]
    fn test_default_mod_dir_layout() {
        if let Some(dir) = default_mod_dir() {
            assert!(dir.ends_with("Paradox Interactive/Hearts of Iron IV/mod"));
        }
    }
}
