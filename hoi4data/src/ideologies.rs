use crate::color::{COLOR_BLOCK, Rgb};
use crate::error::{DataError, Result};
use crate::files::{read_text, sorted_files};
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::LazyLock;

static IDEOLOGY_HEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+?)\s*=\s*\{\s*types\b").unwrap());
static IDEOLOGY_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\bcolor\s*{COLOR_BLOCK}")).unwrap());

/// A top-level ideology of `common/ideologies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ideology {
    pub id: String,
    pub color: Rgb,
}

/// Pairs the ideology heads of a file with its `color` entries, in order.
///
/// Only the ideology blocks carry a `color`, so the n-th color belongs to the
/// n-th ideology.
pub fn parse_ideologies(content: &str) -> Result<Vec<Ideology>> {
    let flat = content.replace(['\n', '\r'], " ");
    let ids: Vec<&str> = IDEOLOGY_HEAD
        .captures_iter(&flat)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();
    let colors = IDEOLOGY_COLOR
        .captures_iter(&flat)
        .map(|caps| Rgb::from_captures(&caps[1], [&caps[2], &caps[3], &caps[4]]))
        .collect::<Result<Vec<_>>>()?;

    if ids.len() != colors.len() {
        return Err(DataError::IdeologyFormat {
            ids: ids.len(),
            colors: colors.len(),
        });
    }
    Ok(ids
        .into_iter()
        .zip(colors)
        .map(|(id, color)| Ideology {
            id: id.to_string(),
            color,
        })
        .collect())
}

/// Loads the ideologies of every file in `common/ideologies`, in file order.
pub fn load_ideologies(root: &Path) -> Result<Vec<Ideology>> {
    let dir = root.join("common").join("ideologies");
    let mut ideologies = Vec::new();
    for entry in sorted_files(&dir)? {
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "txt") {
            continue;
        }
        let content = read_text(&path).map_err(|e| DataError::parse(&path, e))?;
        ideologies.extend(parse_ideologies(&content).map_err(|e| DataError::parse(&path, e))?);
    }
    log::debug!("loaded {} ideologies", ideologies.len());
    Ok(ideologies)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDEOLOGIES: &str = r#"
ideologies = {
	democratic = {
		types = {
			conservatism = { }
			liberalism = { }
		}
		dynamic_faction_names = { "FACTION_NAME_DEMOCRATIC_1" }
		color = { 0 0 255 }
		rules = { can_force_government = no }
	}
	communism = {
		types = {
			marxism = { }
		}
		color = rgb { 255 0 0 }
	}
}
"#;

    #[test]
    fn test_parse_ideologies() {
        let ideologies = parse_ideologies(IDEOLOGIES).unwrap();
        assert_eq!(
            ideologies,
            vec![
                Ideology {
                    id: "democratic".into(),
                    color: Rgb::new(0, 0, 255)
                },
                Ideology {
                    id: "communism".into(),
                    color: Rgb::new(255, 0, 0)
                },
            ]
        );
    }

    #[test]
    fn test_count_mismatch() {
        let content = "fascism = { types = { nazism = { } } }";
        match parse_ideologies(content) {
            Err(DataError::IdeologyFormat { ids, colors }) => {
                assert_eq!((ids, colors), (1, 0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_load_ideologies() {
        let dir = tempfile::tempdir().unwrap();
        let ideologies = dir.path().join("common/ideologies");
        std::fs::create_dir_all(&ideologies).unwrap();
        std::fs::write(ideologies.join("00_ideologies.txt"), IDEOLOGIES).unwrap();
        std::fs::write(ideologies.join("notes.md"), "color = { 1 2 3 }").unwrap();

        let loaded = load_ideologies(dir.path()).unwrap();
        let ids: Vec<_> = loaded.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["democratic", "communism"]);
    }
}
