use crate::color::{COLOR_BLOCK, Rgb};
use crate::error::{DataError, Result};
use crate::files::{read_text, sorted_files};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

static TAG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b([A-Za-z0-9_]{3})\s*=\s*"(.+?)""#).unwrap());
static DYNAMIC_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^D\d{2}$").unwrap());
static GRAPHICAL_CULTURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*graphical_culture\s*=\s*([^#\r\n]+)").unwrap());
static GRAPHICAL_CULTURE_2D: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*graphical_culture_2d\s*=\s*([^#\r\n]+)").unwrap());
static DEFINITION_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?m)^\s*color\s*{COLOR_BLOCK}")).unwrap());
static COLOR_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(\w+)\s*=\s*\{{\s*color\s*{COLOR_BLOCK}(?:\s*color_ui\s*{COLOR_BLOCK})?"
    ))
    .unwrap()
});

/// Files in `common/countries` that hold color tables rather than a country.
pub const COLOR_TABLE_FILES: [&str; 2] = ["colors.txt", "cosmetic.txt"];

/// One `TAG = "countries/File.txt"` line of `common/country_tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryTag {
    pub id: String,
    /// Path of the definition file, relative to `common/`.
    #[serde(rename = "path")]
    pub define_path: String,
}

impl CountryTag {
    pub fn new(id: impl Into<String>, define_path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            define_path: define_path.into(),
        }
    }

    /// Dynamic tags (`D01`..`D99`) are reserved for countries created at runtime.
    pub fn is_dynamic(&self) -> bool {
        DYNAMIC_TAG.is_match(&self.id)
    }

    pub fn encode(&self) -> String {
        format!("{} = \"{}\"", self.id, self.define_path)
    }
}

/// Extracts every tag assignment from a country_tags file.
pub fn parse_country_tags(content: &str) -> Vec<CountryTag> {
    let stripped: String = content
        .lines()
        .map(|line| line.split_once('#').map_or(line, |(code, _)| code))
        .collect::<Vec<_>>()
        .join(" ");

    TAG_LINE
        .captures_iter(&stripped)
        .map(|caps| CountryTag::new(&caps[1], &caps[2]))
        .collect()
}

/// Loads country tags from every file in `common/country_tags`.
pub fn load_country_tags(mod_root: &Path) -> Result<Vec<CountryTag>> {
    let tags_dir = mod_root.join("common").join("country_tags");
    let mut tags = Vec::new();
    for entry in sorted_files(&tags_dir)? {
        let path = entry.path();
        let content = read_text(&path).map_err(|e| DataError::parse(&path, e))?;
        let found = parse_country_tags(&content);
        log::debug!("{} tags in {}", found.len(), path.display());
        tags.extend(found);
    }
    Ok(tags)
}

/// Same as [`load_country_tags`] without the dynamic `Dnn` tags.
pub fn load_static_country_tags(mod_root: &Path) -> Result<Vec<CountryTag>> {
    let mut tags = load_country_tags(mod_root)?;
    tags.retain(|tag| !tag.is_dynamic());
    Ok(tags)
}

/// The parts of a `common/countries/<Name>.txt` file we read back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphical_culture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphical_culture_2d: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
}

impl CountryDefinition {
    pub fn encode(&self) -> String {
        let mut out = String::new();
        if let Some(culture) = &self.graphical_culture {
            out.push_str(&format!("graphical_culture = {culture}\n"));
        }
        if let Some(culture) = &self.graphical_culture_2d {
            out.push_str(&format!("graphical_culture_2d = {culture}\n\n"));
        }
        if let Some(color) = &self.color {
            out.push_str(&format!("color = {color}"));
        }
        out
    }
}

pub fn parse_country_definition(content: &str) -> Result<CountryDefinition> {
    let capture = |re: &Regex| {
        re.captures(content)
            .map(|caps| caps[1].trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let color = match DEFINITION_COLOR.captures(content) {
        Some(caps) => Some(Rgb::from_captures(&caps[1], [&caps[2], &caps[3], &caps[4]])?),
        None => None,
    };

    Ok(CountryDefinition {
        graphical_culture: capture(&GRAPHICAL_CULTURE),
        graphical_culture_2d: capture(&GRAPHICAL_CULTURE_2D),
        color,
    })
}

/// A `TAG = { color = ... color_ui = ... }` entry of `colors.txt` / `cosmetic.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryColor {
    pub country: String,
    pub color: Rgb,
    pub color_ui: Rgb,
}

impl CountryColor {
    /// An entry whose map color and UI color are the same.
    pub fn uniform(country: impl Into<String>, color: Rgb) -> Self {
        Self {
            country: country.into(),
            color,
            color_ui: color,
        }
    }

    pub fn encode(&self) -> String {
        format!(
            "{} = {{\n\tcolor = {}\n\tcolor_ui = {}\n}}",
            self.country, self.color, self.color_ui
        )
    }
}

/// Parses a color table. An entry without `color_ui` uses its map color.
pub fn parse_country_colors(content: &str) -> Result<Vec<CountryColor>> {
    let flat = content.replace(['\n', '\r'], " ");
    COLOR_ENTRY
        .captures_iter(&flat)
        .map(|caps| -> Result<CountryColor> {
            let color = Rgb::from_captures(&caps[2], [&caps[3], &caps[4], &caps[5]])?;
            let color_ui = match (caps.get(6), caps.get(7), caps.get(8), caps.get(9)) {
                (Some(mode), Some(a), Some(b), Some(c)) => {
                    Rgb::from_captures(mode.as_str(), [a.as_str(), b.as_str(), c.as_str()])?
                }
                _ => color,
            };
            Ok(CountryColor {
                country: caps[1].to_string(),
                color,
                color_ui,
            })
        })
        .collect()
}

/// Everything found in `common/countries`.
#[derive(Debug, Default, Serialize)]
pub struct CountriesDir {
    /// Country definitions keyed by file stem (`Germany.txt` -> `Germany`).
    pub definitions: BTreeMap<String, CountryDefinition>,
    /// Color table entries keyed by tag, `cosmetic.txt` overriding `colors.txt`.
    pub colors: BTreeMap<String, CountryColor>,
}

/// Loads every country definition and color table of `common/countries`.
pub fn load_countries_dir(mod_root: &Path) -> Result<CountriesDir> {
    let dir = mod_root.join("common").join("countries");
    let mut result = CountriesDir::default();

    for entry in sorted_files(&dir)? {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if COLOR_TABLE_FILES.contains(&name.as_str()) {
            let content = read_text(&path).map_err(|e| DataError::parse(&path, e))?;
            let colors = parse_country_colors(&content).map_err(|e| DataError::parse(&path, e))?;
            for color in colors {
                result.colors.insert(color.country.clone(), color);
            }
        } else if let Some(stem) = name.strip_suffix(".txt") {
            let content = read_text(&path).map_err(|e| DataError::parse(&path, e))?;
            let definition =
                parse_country_definition(&content).map_err(|e| DataError::parse(&path, e))?;
            result.definitions.insert(stem.to_string(), definition);
        }
    }
    Ok(result)
}
