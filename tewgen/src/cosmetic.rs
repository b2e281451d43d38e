//! Per-ideology cosmetic tags for the vanilla countries.
//!
//! Reads countries, ideologies and starting governments from the game
//! installation and writes a cosmetic tag for every country and ideology,
//! the effect switching between them, their names and their flags.

use crate::render;
use anyhow::{Context, Result};
use hoi4data::Rgb;
use hoi4data::color::hsv_to_rgb;
use hoi4data::countries::{CountryColor, load_countries_dir, load_static_country_tags};
use hoi4data::files::write_file;
use hoi4data::flags::{FlagSize, copy_flag, resize_flag};
use hoi4data::history::load_country_histories;
use hoi4data::ideologies::{Ideology, load_ideologies};
use hoi4data::localisation::{CountryNames, Localisation, LocalisationWriter, country_names};
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const DEFAULT_PREFIX: &str = "DCC";

/// What the generator knows about one vanilla country.
#[derive(Debug, Clone)]
pub struct CountryInfo {
    pub tag: String,
    pub color: CountryColor,
    /// Names per ideology, `""` being the neutral name.
    pub names: BTreeMap<String, CountryNames>,
    pub ruling_party: Option<String>,
}

impl CountryInfo {
    /// Names for `ideology`, falling back to the neutral names and then to
    /// whatever ideology has names at all.
    pub fn names_for(&self, ideology: &str) -> CountryNames {
        self.names
            .get(ideology)
            .or_else(|| self.names.get(""))
            .or_else(|| self.names.values().next())
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct CosmeticOptions {
    pub prefix: String,
    pub language: String,
}

impl Default for CosmeticOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            language: "simp_chinese".to_string(),
        }
    }
}

/// A random color in the usual palette of `ideology`, or `None` for
/// ideologies without one.
pub fn ideology_color<R: Rng + ?Sized>(ideology: &str, rng: &mut R) -> Option<Rgb> {
    let (h, s, v) = match ideology {
        "communism" => (
            rng.random_range(-20..=20i32).rem_euclid(360),
            rng.random_range(80..=100),
            rng.random_range(80..=100),
        ),
        "fascism" => (
            rng.random_range(25..=50),
            rng.random_range(60..=100),
            rng.random_range(70..=90),
        ),
        "neutrality" => (
            rng.random_range(0..=360),
            rng.random_range(40..=50),
            rng.random_range(50..=70),
        ),
        "democratic" => (
            rng.random_range(200..=250),
            rng.random_range(70..=90),
            rng.random_range(80..=90),
        ),
        _ => return None,
    };
    Some(hsv_to_rgb(h as f64, s as f64 / 100.0, v as f64 / 100.0))
}

/// Joins tags, colors, histories and names read from `game_root`.
///
/// Countries with neither a color table entry nor a colored definition are
/// skipped.
pub fn load_country_infos(game_root: &Path, ideologies: &[Ideology], language: &str) -> Result<Vec<CountryInfo>> {
    let ((tags, countries), (histories, loc)) = rayon::join(
        || {
            rayon::join(
                || load_static_country_tags(game_root),
                || load_countries_dir(game_root),
            )
        },
        || {
            rayon::join(
                || load_country_histories(game_root),
                || Localisation::load_language(game_root, language),
            )
        },
    );
    let tags = tags.context("loading country tags")?;
    let countries = countries.context("loading country definitions")?;
    let mut histories = histories.context("loading country histories")?;
    let loc = loc.context("loading localisation")?;

    let ideology_ids: Vec<String> = ideologies.iter().map(|i| i.id.clone()).collect();
    let mut names = country_names(&loc, &ideology_ids);

    let mut infos = Vec::with_capacity(tags.len());
    for tag in tags {
        let stem = Path::new(&tag.define_path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let color = match countries.colors.get(&tag.id) {
            Some(color) => color.clone(),
            None => match countries.definitions.get(&stem).and_then(|d| d.color) {
                Some(color) => CountryColor::uniform(&tag.id, color),
                None => {
                    log::warn!("{} has no color, skipping", tag.id);
                    continue;
                }
            },
        };
        infos.push(CountryInfo {
            names: names.remove(&tag.id).unwrap_or_default(),
            ruling_party: histories.remove(&tag.id).map(|h| h.ruling_party),
            tag: tag.id,
            color,
        });
    }
    Ok(infos)
}

fn cosmetic_tag(prefix: &str, tag: &str, ideology: &str) -> String {
    format!("{prefix}_{tag}_{ideology}")
}

/// Color entries: the country's own colors for its ruling ideology, a
/// palette color for the others.
pub fn cosmetic_colors<R: Rng + ?Sized>(
    prefix: &str,
    countries: &[CountryInfo],
    ideologies: &[Ideology],
    rng: &mut R,
) -> String {
    let blocks: Vec<String> = countries
        .iter()
        .map(|country| {
            ideologies
                .iter()
                .map(|ideology| {
                    let id = cosmetic_tag(prefix, &country.tag, &ideology.id);
                    let own = country.ruling_party.as_deref() == Some(ideology.id.as_str());
                    let entry = match ideology_color(&ideology.id, rng) {
                        Some(color) if !own => CountryColor::uniform(id, color),
                        _ => CountryColor {
                            country: id,
                            ..country.color.clone()
                        },
                    };
                    entry.encode()
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect();
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

/// `<prefix>_change_country_color_by_ideology`: picks the cosmetic tag from
/// the original tag and the current government.
pub fn cosmetic_effect(prefix: &str, countries: &[CountryInfo], ideologies: &[Ideology]) -> String {
    render(|out| {
        writeln!(out, "{prefix}_change_country_color_by_ideology = {{")?;
        for (i, country) in countries.iter().enumerate() {
            let keyword = if i == 0 { "if" } else { "else_if" };
            write!(
                out,
                "\t{keyword} = {{\n\t\tlimit = {{ original_tag = {} }}\n",
                country.tag
            )?;
            for (j, ideology) in ideologies.iter().enumerate() {
                let keyword = if j == 0 { "if" } else { "else_if" };
                writeln!(
                    out,
                    "\t\t{keyword} = {{\n\t\t\tlimit = {{\n\t\t\t\tOR = {{\n\t\t\t\t\thas_government = {id}\n\t\t\t\t}}\n\t\t\t}}\n\t\t\tset_cosmetic_tag = {tag}\n\t\t}}",
                    id = ideology.id,
                    tag = cosmetic_tag(prefix, &country.tag, &ideology.id),
                )?;
            }
            out.push_str("\t}\n");
        }
        out.push_str("}\n");
        Ok(())
    })
}

pub fn cosmetic_names(
    prefix: &str,
    language: &str,
    countries: &[CountryInfo],
    ideologies: &[Ideology],
) -> LocalisationWriter {
    let mut loc = LocalisationWriter::new(language);
    for country in countries {
        for ideology in ideologies {
            let key = cosmetic_tag(prefix, &country.tag, &ideology.id);
            let names = country.names_for(&ideology.id);
            loc.line(&key, names.name)
                .line(format!("{key}_DEF"), names.def)
                .line(format!("{key}_ADJ"), names.adj);
        }
    }
    loc
}

fn first_existing(dir: &Path, names: impl IntoIterator<Item = String>) -> Option<PathBuf> {
    names
        .into_iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Copies `src` into `flags_dir` as `name` at full size plus every scaled size.
fn install_flag(src: &Path, flags_dir: &Path, name: &str) -> Result<()> {
    copy_flag(src, &flags_dir.join(name))
        .with_context(|| format!("copying {}", src.display()))?;
    for size in FlagSize::ALL {
        let (width, height) = size.dimensions();
        resize_flag(src, &flags_dir.join(size.dir_name()).join(name), width, height)
            .with_context(|| format!("resizing {}", src.display()))?;
    }
    Ok(())
}

/// Flags for the base tags and every cosmetic tag. Returns how many were written.
pub fn cosmetic_flags(
    prefix: &str,
    game_root: &Path,
    out_root: &Path,
    countries: &[CountryInfo],
    ideologies: &[Ideology],
) -> Result<usize> {
    let source_dir = game_root.join("gfx").join("flags");
    let flags_dir = out_root.join("gfx").join("flags");
    let mut written = 0;

    for country in countries {
        let tag = &country.tag;
        let base = std::iter::once(format!("{tag}.tga"))
            .chain(ideologies.iter().map(|i| format!("{tag}_{}.tga", i.id)));
        if let Some(src) = first_existing(&source_dir, base) {
            install_flag(&src, &flags_dir, &format!("{tag}.tga"))?;
            written += 1;
        }

        for ideology in ideologies {
            let candidates = [format!("{tag}_{}.tga", ideology.id), format!("{tag}.tga")];
            if let Some(src) = first_existing(&source_dir, candidates) {
                let name = format!("{}.tga", cosmetic_tag(prefix, tag, &ideology.id));
                install_flag(&src, &flags_dir, &name)?;
                written += 1;
            }
        }
    }
    Ok(written)
}

/// Runs the whole generator from `game_root` into `out_root`.
pub fn generate<R: Rng + ?Sized>(
    game_root: &Path,
    out_root: &Path,
    options: &CosmeticOptions,
    rng: &mut R,
) -> Result<()> {
    let prefix = &options.prefix;
    let ideologies = load_ideologies(game_root).context("loading ideologies")?;
    let countries = load_country_infos(game_root, &ideologies, &options.language)?;
    log::info!(
        "{} countries, {} ideologies",
        countries.len(),
        ideologies.len()
    );

    let path = out_root.join("common").join("countries").join("cosmetic.txt");
    write_file(&path, cosmetic_colors(prefix, &countries, &ideologies, rng).as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;

    let path = out_root
        .join("common")
        .join("scripted_effects")
        .join(format!("00_{prefix}_scripted_effects.txt"));
    write_file(&path, cosmetic_effect(prefix, &countries, &ideologies).as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;

    let language = &options.language;
    let path = out_root
        .join("localisation")
        .join(language)
        .join(format!("{prefix}_countries_cosmetic_l_{language}.yml"));
    cosmetic_names(prefix, language, &countries, &ideologies)
        .write(&path)
        .with_context(|| format!("writing {}", path.display()))?;

    let flags = cosmetic_flags(prefix, game_root, out_root, &countries, &ideologies)?;
    log::info!("wrote {flags} flags");
    Ok(())
}
