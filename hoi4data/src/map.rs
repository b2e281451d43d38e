use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// What kind of tile a province is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvinceKind {
    Land,
    Sea,
    Lake,
}

impl fmt::Display for ProvinceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProvinceKind::Land => "land",
            ProvinceKind::Sea => "sea",
            ProvinceKind::Lake => "lake",
        })
    }
}

/// One row of `map/definition.csv`: `id;r;g;b;kind;coastal;terrain;continent`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProvinceDefinition {
    pub id: u32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub kind: ProvinceKind,
    pub coastal: bool,
    pub terrain: String,
    pub continent: u32,
}

impl ProvinceDefinition {
    pub fn encode(&self) -> String {
        format!(
            "{};{};{};{};{};{};{};{}",
            self.id, self.r, self.g, self.b, self.kind, self.coastal, self.terrain, self.continent
        )
    }
}

/// Loads province definitions from a `;` separated CSV file.
///
/// Rows that do not deserialize are skipped with a warning; the file has no
/// header but mods sometimes leave stray lines in it.
pub fn load_definitions(path: &Path) -> Result<BTreeMap<u32, ProvinceDefinition>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut definitions = BTreeMap::new();
    for (row, result) in reader.deserialize::<ProvinceDefinition>().enumerate() {
        match result {
            Ok(def) => {
                definitions.insert(def.id, def);
            }
            Err(e) => {
                log::warn!("{} row {}: {}", path.display(), row + 1, e);
            }
        }
    }
    Ok(definitions)
}
