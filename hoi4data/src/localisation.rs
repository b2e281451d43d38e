use crate::error::{DataError, Result};
use crate::files::{read_text, sorted_files, write_with_bom};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// One `KEY:0 "Value"` line of a localisation file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalisationEntry {
    pub key: String,
    /// The version number after the colon, if the line carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    pub value: String,
}

impl LocalisationEntry {
    /// An entry with index `0`, the form every generated file uses.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            index: Some(0),
            value: value.into(),
        }
    }

    pub fn encode(&self) -> String {
        match self.index {
            Some(index) => format!("{}:{} \"{}\"", self.key, index, self.value),
            None => format!("{}: \"{}\"", self.key, self.value),
        }
    }

    /// Parses one line. Returns `None` for headers, comments and anything
    /// without a quoted value.
    pub fn parse_line(line: &str) -> Option<LocalisationEntry> {
        let line = line.trim_start_matches('\u{feff}').trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let (key_part, val_part) = line.split_once(':')?;
        let key = key_part.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            return None;
        }

        // val_part is like `0 "Value"` or ` "Value" # comment`
        let start_quote = val_part.find('"')?;
        let end_quote = val_part[start_quote + 1..].rfind('"')?;
        let index_part = val_part[..start_quote].trim();
        let index = if index_part.is_empty() {
            None
        } else {
            Some(index_part.parse::<u32>().ok()?)
        };
        let value = &val_part[start_quote + 1..start_quote + 1 + end_quote];

        Some(LocalisationEntry {
            key: key.to_string(),
            index,
            value: value.to_string(),
        })
    }
}

/// Parses the whole text of a `.yml` localisation file.
pub fn parse_localisation(content: &str) -> Vec<LocalisationEntry> {
    content
        .lines()
        .filter_map(LocalisationEntry::parse_line)
        .collect()
}

/// Localisation entries of one language, keyed by localisation key.
///
/// Content of a localisation file is typically:
/// ```text
/// l_simp_chinese:
///  KEY:0 "Value"
///  KEY2: "Value" # Optional comment
/// ```
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Localisation {
    map: HashMap<String, LocalisationEntry>,
}

impl Localisation {
    /// Creates a new empty localisation store.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn insert(&mut self, entry: LocalisationEntry) {
        self.map.insert(entry.key.clone(), entry);
    }

    pub fn get(&self, key: &str) -> Option<&LocalisationEntry> {
        self.map.get(key)
    }

    /// Retrieves just the text for `key`.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|e| e.value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalisationEntry> {
        self.map.values()
    }

    /// Loads one `.yml` file. Returns the number of entries read.
    pub fn load_file(&mut self, path: &Path) -> std::io::Result<usize> {
        let content = read_text(path)?;
        let entries = parse_localisation(&content);
        let count = entries.len();
        for entry in entries {
            self.insert(entry);
        }
        Ok(count)
    }

    /// Loads every `.yml` file of `localisation/<language>` under `mod_root`.
    ///
    /// Files are read in name order, so later files override earlier keys.
    /// A missing language directory yields an empty store.
    pub fn load_language(mod_root: &Path, language: &str) -> Result<Localisation> {
        let dir = mod_root.join("localisation").join(language);
        let mut loc = Localisation::new();
        if !dir.is_dir() {
            log::warn!("No localisation directory at {}", dir.display());
            return Ok(loc);
        }

        for entry in sorted_files(&dir)? {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "yml") {
                let count = loc
                    .load_file(&path)
                    .map_err(|e| DataError::parse(&path, e))?;
                log::debug!("{} keys from {}", count, path.display());
            }
        }
        Ok(loc)
    }
}

/// Loads every language directory under `localisation/`.
pub fn load_all_languages(mod_root: &Path) -> Result<BTreeMap<String, Localisation>> {
    let dir = mod_root.join("localisation");
    let mut languages = BTreeMap::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let language = entry.file_name().to_string_lossy().into_owned();
        let loc = Localisation::load_language(mod_root, &language)?;
        languages.insert(language, loc);
    }
    Ok(languages)
}

/// Builds a localisation file: `l_<language>:` header, one entry per line
/// indented by a single space.
#[derive(Debug)]
pub struct LocalisationWriter {
    buf: String,
}

impl LocalisationWriter {
    pub fn new(language: &str) -> Self {
        Self {
            buf: format!("l_{language}:\n"),
        }
    }

    pub fn entry(&mut self, entry: &LocalisationEntry) -> &mut Self {
        self.buf.push(' ');
        self.buf.push_str(&entry.encode());
        self.buf.push('\n');
        self
    }

    /// Shorthand for an index-0 entry.
    pub fn line(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entry(&LocalisationEntry::new(key, value))
    }

    /// Ends a group of related keys with an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        write_with_bom(path, self.buf.as_bytes())
    }
}

/// The three names a country carries for one ideology.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountryNames {
    pub name: String,
    pub def: String,
    pub adj: String,
}

/// Country names per ideology: tag -> ideology -> names. The ideology is
/// `""` for the neutral `TAG` / `TAG_DEF` / `TAG_ADJ` keys.
pub type CountryNameTable = BTreeMap<String, BTreeMap<String, CountryNames>>;

/// Splits `GER_fascism_DEF` style keys into tag, ideology and name kind.
fn split_country_key<'a>(key: &'a str, ideologies: &[String]) -> Option<(&'a str, &'a str, &'a str)> {
    if key.len() < 3 || !key.is_char_boundary(3) {
        return None;
    }
    let (tag, rest) = key.split_at(3);
    if !tag.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return None;
    }

    let (rest, suffix) = if let Some(r) = rest.strip_suffix("_DEF") {
        (r, "DEF")
    } else if let Some(r) = rest.strip_suffix("_ADJ") {
        (r, "ADJ")
    } else {
        (rest, "")
    };

    let ideology = match rest.strip_prefix('_') {
        None if rest.is_empty() => "",
        Some(id) if ideologies.iter().any(|i| i == id) => id,
        _ => return None,
    };
    Some((tag, ideology, suffix))
}

/// Collects per-ideology country names from a loaded localisation.
pub fn country_names(loc: &Localisation, ideologies: &[String]) -> CountryNameTable {
    let mut table = CountryNameTable::new();
    for entry in loc.iter() {
        let Some((tag, ideology, suffix)) = split_country_key(&entry.key, ideologies) else {
            continue;
        };
        let names = table
            .entry(tag.to_string())
            .or_default()
            .entry(ideology.to_string())
            .or_default();
        match suffix {
            "DEF" => names.def = entry.value.clone(),
            "ADJ" => names.adj = entry.value.clone(),
            _ => names.name = entry.value.clone(),
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_simple() {
        let content = r#"
l_english:
 KEY:0 "Value"
 KEY_TWO: "Value Two"
 QUOTED:1 "Say "hi"" # greeting
 BROKEN "No colon"
 # COMMENTED:0 "x"
        "#;

        let mut file = tempfile::NamedTempFile::new().expect("create temp");
        write!(file, "\u{feff}{}", content).expect("write temp");

        let mut loc = Localisation::new();
        assert_eq!(loc.load_file(file.path()).expect("load"), 3);

        assert_eq!(loc.value("KEY"), Some("Value"));
        assert_eq!(loc.get("KEY").unwrap().index, Some(0));
        assert_eq!(loc.value("KEY_TWO"), Some("Value Two"));
        assert_eq!(loc.get("KEY_TWO").unwrap().index, None);
        assert_eq!(loc.value("QUOTED"), Some("Say \"hi\""));
        assert_eq!(loc.value("BROKEN"), None);
        assert!(!loc.contains_key("COMMENTED"));
        assert!(!loc.contains_key("l_english"));
    }

    #[test]
    fn test_encode() {
        assert_eq!(LocalisationEntry::new("GER", "德国").encode(), "GER:0 \"德国\"");
        let plain = LocalisationEntry {
            key: "GER".into(),
            index: None,
            value: "x".into(),
        };
        assert_eq!(plain.encode(), "GER: \"x\"");
    }

    #[test]
    fn test_load_language_later_files_win() {
        let dir = tempfile::tempdir().unwrap();
        let lang = dir.path().join("localisation/simp_chinese");
        std::fs::create_dir_all(&lang).unwrap();
        std::fs::write(lang.join("a_l_simp_chinese.yml"), "l_simp_chinese:\n A:0 \"1\"\n B:0 \"1\"\n").unwrap();
        std::fs::write(lang.join("b_l_simp_chinese.yml"), "l_simp_chinese:\n B:0 \"2\"\n").unwrap();
        std::fs::write(lang.join("notes.txt"), " C:0 \"3\"\n").unwrap();

        let loc = Localisation::load_language(dir.path(), "simp_chinese").unwrap();
        assert_eq!(loc.len(), 2);
        assert_eq!(loc.value("A"), Some("1"));
        assert_eq!(loc.value("B"), Some("2"));

        let all = load_all_languages(dir.path()).unwrap();
        assert_eq!(all.keys().collect::<Vec<_>>(), vec!["simp_chinese"]);

        let missing = Localisation::load_language(dir.path(), "english").unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn test_writer() {
        let mut w = LocalisationWriter::new("simp_chinese");
        w.line("GER", "德国").line("GER_DEF", "德国").blank();
        assert_eq!(w.as_str(), "l_simp_chinese:\n GER:0 \"德国\"\n GER_DEF:0 \"德国\"\n\n");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.yml");
        w.write(&path).unwrap();
        let mut loc = Localisation::new();
        assert_eq!(loc.load_file(&path).unwrap(), 2);
    }

    #[test]
    fn test_country_names() {
        let content = "l_english:\n GER:0 \"Germany\"\n GER_DEF:0 \"the German Reich\"\n GER_ADJ:0 \"German\"\n GER_fascism:0 \"Greater German Reich\"\n GER_unknown:0 \"x\"\n focus_GER:0 \"y\"\n";
        let mut loc = Localisation::new();
        for entry in parse_localisation(content) {
            loc.insert(entry);
        }
        let table = country_names(&loc, &["fascism".to_string(), "communism".to_string()]);

        let ger = &table["GER"];
        assert_eq!(ger.len(), 2);
        assert_eq!(
            ger[""],
            CountryNames {
                name: "Germany".into(),
                def: "the German Reich".into(),
                adj: "German".into(),
            }
        );
        assert_eq!(ger["fascism"].name, "Greater German Reich");
        assert!(!table.contains_key("foc"));
    }
}
