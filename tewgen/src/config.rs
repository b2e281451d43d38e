//! The country table and where to find the mod and the game.

use anyhow::{Context, Result, bail};
use hoi4data::Rgb;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Ownership threshold, in percent, used when a country sets none.
pub const DEFAULT_UPGRADE_RATIO: u32 = 70;

/// Folder name of the mod inside the launcher's mod directory.
pub const MOD_DIR_NAME: &str = "TheEmptyWorld";

const EMBEDDED_COUNTRIES: &str = include_str!("../assets/countries.json");

/// A country the mod defines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// Three-letter tag.
    pub id: String,
    /// Chinese display name.
    pub name: String,
    /// Stem of the definition file, `common/countries/<region>.txt`.
    pub region: String,
    /// Map color; a distinct one is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    /// Tags this country can be formed from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sons: Vec<String>,
    /// Share of the sons' core states, in percent, needed to form this country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade_ratio: Option<u32>,
}

impl Country {
    pub fn is_upgradeable(&self) -> bool {
        !self.sons.is_empty()
    }

    pub fn upgrade_ratio(&self) -> u32 {
        self.upgrade_ratio.unwrap_or(DEFAULT_UPGRADE_RATIO)
    }
}

/// Countries in file order, with a tag index.
#[derive(Debug, Clone, Default)]
pub struct CountryTable {
    countries: Vec<Country>,
    index: HashMap<String, usize>,
}

impl CountryTable {
    pub fn new(countries: Vec<Country>) -> Result<Self> {
        let mut index = HashMap::with_capacity(countries.len());
        for (i, country) in countries.iter().enumerate() {
            if index.insert(country.id.clone(), i).is_some() {
                bail!("country `{}` is defined more than once", country.id);
            }
        }
        for country in &countries {
            for son in &country.sons {
                if !index.contains_key(son) {
                    log::warn!("{} lists unknown son `{}`", country.id, son);
                }
            }
        }
        Ok(Self { countries, index })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let countries: Vec<Country> =
            serde_json::from_str(text).context("parsing country table")?;
        Self::new(countries)
    }

    /// The table shipped inside the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_COUNTRIES)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("loading {}", path.display()))
    }

    /// Loads `path` when given, otherwise the embedded table.
    pub fn load_or_embedded(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::embedded(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Country> {
        self.index.get(id).map(|&i| &self.countries[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Country> {
        self.countries.iter()
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

/// Resolved locations of the mod being generated and the game installation.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    mod_root: Option<PathBuf>,
    game_root: Option<PathBuf>,
}

impl Settings {
    /// Falls back to `<launcher mod dir>/TheEmptyWorld` when it exists, and
    /// to the detected Steam installation for the game.
    pub fn resolve(mod_path: Option<PathBuf>, game_path: Option<PathBuf>) -> Self {
        let mod_root = mod_path.or_else(|| {
            hoi4data::path::default_mod_dir()
                .map(|dir| dir.join(MOD_DIR_NAME))
                .filter(|dir| dir.is_dir())
        });
        let game_root = game_path.or_else(hoi4data::detect_game_path);
        Self {
            mod_root,
            game_root,
        }
    }

    pub fn mod_root(&self) -> Result<&Path> {
        self.mod_root
            .as_deref()
            .context("mod directory not found; pass --mod-path or set TEW_MOD_PATH")
    }

    pub fn game_root(&self) -> Result<&Path> {
        self.game_root.as_deref().context(
            "Hearts of Iron IV installation not found; pass --game-path or set HOI4_PATH",
        )
    }
}
