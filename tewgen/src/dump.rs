//! Prints parsed game data as JSON, for checking what the readers see.

use anyhow::{Context, Result};
use clap::ValueEnum;
use hoi4data::countries::{load_countries_dir, load_country_tags};
use hoi4data::history::{load_country_histories, load_states_dir};
use hoi4data::ideologies::load_ideologies;
use hoi4data::localisation::load_all_languages;
use hoi4data::map::load_definitions;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpKind {
    /// `common/country_tags`
    Tags,
    /// Country definitions of `common/countries`
    Countries,
    /// Color tables of `common/countries`
    Colors,
    /// Every language under `localisation`
    Localisation,
    /// `history/states`
    States,
    /// `history/countries`
    Histories,
    /// `map/definition.csv`
    Definitions,
    /// `common/ideologies`
    Ideologies,
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Loads `kind` from `root` and writes it to `out` as pretty JSON.
pub fn dump<W: Write>(root: &Path, kind: DumpKind, out: &mut W) -> Result<()> {
    let context = || format!("loading {kind:?} from {}", root.display());
    match kind {
        DumpKind::Tags => write_json(out, &load_country_tags(root).with_context(context)?),
        DumpKind::Countries => write_json(
            out,
            &load_countries_dir(root).with_context(context)?.definitions,
        ),
        DumpKind::Colors => {
            write_json(out, &load_countries_dir(root).with_context(context)?.colors)
        }
        DumpKind::Localisation => {
            let languages = load_all_languages(root).with_context(context)?;
            // Sorted keys keep the output stable between runs.
            let sorted: BTreeMap<_, BTreeMap<_, _>> = languages
                .iter()
                .map(|(language, loc)| {
                    let entries = loc.iter().map(|e| (e.key.as_str(), e)).collect();
                    (language.as_str(), entries)
                })
                .collect();
            write_json(out, &sorted)
        }
        DumpKind::States => {
            let states: BTreeMap<String, _> = load_states_dir(root)
                .with_context(context)?
                .into_iter()
                .map(|(path, state)| {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    (name, state)
                })
                .collect();
            write_json(out, &states)
        }
        DumpKind::Histories => {
            write_json(out, &load_country_histories(root).with_context(context)?)
        }
        DumpKind::Definitions => {
            let path = root.join("map").join("definition.csv");
            write_json(out, &load_definitions(&path).with_context(context)?)
        }
        DumpKind::Ideologies => write_json(out, &load_ideologies(root).with_context(context)?),
    }
}
