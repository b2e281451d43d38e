use crate::error::{DataError, Result};
use crate::files::{read_text, sorted_files};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

static RULING_PARTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ruling_party\s*=\s*(\S+)").unwrap());

/// The starting setup of a country, as far as the generators need it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryHistory {
    /// Ideology of the party in power at game start.
    pub ruling_party: String,
}

pub fn parse_country_history(content: &str) -> Option<CountryHistory> {
    RULING_PARTY.captures(content).map(|caps| CountryHistory {
        ruling_party: caps[1].to_string(),
    })
}

/// Tag of a `history/countries` file: the part of the name before the first `-`.
fn tag_of(file_name: &str) -> Option<&str> {
    let stem = file_name.strip_suffix(".txt")?;
    let tag = stem.split('-').next()?.trim();
    (!tag.is_empty()).then_some(tag)
}

/// Loads `history/countries/<TAG> - <Name>.txt` files keyed by tag.
///
/// Files that set no ruling party are left out.
pub fn load_country_histories(root: &Path) -> Result<BTreeMap<String, CountryHistory>> {
    let dir = root.join("history").join("countries");
    let mut histories = BTreeMap::new();
    for entry in sorted_files(&dir)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(tag) = tag_of(&name) else {
            continue;
        };
        let path = entry.path();
        let content = read_text(&path).map_err(|e| DataError::parse(&path, e))?;
        match parse_country_history(&content) {
            Some(history) => {
                histories.insert(tag.to_string(), history);
            }
            None => log::debug!("no ruling party in {}", path.display()),
        }
    }
    Ok(histories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_tag_of() {
        assert_eq!(tag_of("GER - Germany.txt"), Some("GER"));
        assert_eq!(tag_of("SOV-Soviet Union.txt"), Some("SOV"));
        assert_eq!(tag_of("readme.md"), None);
        assert_eq!(tag_of(" - x.txt"), None);
    }

    #[test]
    fn test_load_country_histories() {
        let dir = tempfile::tempdir().unwrap();
        let histories = dir.path().join("history/countries");
        fs::create_dir_all(&histories).unwrap();
        fs::write(
            histories.join("GER - Germany.txt"),
            "capital = 64\nset_politics = {\n\truling_party = fascism\n\tlast_election = \"1933.3.5\"\n}\n",
        )
        .unwrap();
        fs::write(histories.join("XXX - Nobody.txt"), "capital = 1\n").unwrap();

        let loaded = load_country_histories(dir.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["GER"].ruling_party, "fascism");
    }
}
