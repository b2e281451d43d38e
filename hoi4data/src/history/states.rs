//! State history files (`history/states/<id>-<name>.txt`).
//!
//! The block syntax is rewritten into JSON with a fixed series of text
//! substitutions and then deserialized. Keys that repeat inside one block
//! (`add_core_of`, `add_claim_of`, `victory_points`) and the numeric
//! province-building keys cannot survive as JSON object members, so they are
//! pulled out of the text first, in order of appearance.
//!
//! Date-keyed history blocks (`1939.1.1 = { ... }`) are not supported and
//! make the file fail to parse.

use crate::error::{DataError, Result};
use crate::files::{read_text, sorted_files, write_file};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#[^\n]*").unwrap());
static OUTER_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{.*\}").unwrap());
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9A-Za-z_]+").unwrap());
static QUOTED_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""(\d+)""#).unwrap());
static COMMA_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",+").unwrap());
static ASSIGN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",?=,?").unwrap());
static CORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#",?"add_core_of":"([^"]+)""#).unwrap());
static CLAIM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#",?"add_claim_of":"([^"]+)""#).unwrap());
static VICTORY_POINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#",?"victory_points":\{(\d+),(-?[\d.]+)\}"#).unwrap());
static EMPTY_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#",?"[0-9A-Za-z_]+":\{\}"#).unwrap());
static NUMBER_LIST: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([\d,]+)\}").unwrap());
static NUMERIC_KEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+):").unwrap());
static PROVINCE_BUILDINGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#",?"(\d+)":(\{[^{}]*\})"#).unwrap());

/// A victory point: `victory_points = { <province> <value> }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VictoryPoint {
    pub province: u32,
    pub value: f64,
}

/// The `history = { ... }` block of a state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub cores: Vec<String>,
    pub claims: Vec<String>,
    pub victory_points: Vec<VictoryPoint>,
    /// State-wide buildings (`infrastructure = 3`).
    pub buildings: BTreeMap<String, i64>,
    /// Buildings placed on a single province (`1234 = { naval_base = 1 }`).
    pub province_buildings: BTreeMap<u32, BTreeMap<String, i64>>,
}

impl StateHistory {
    fn is_empty(&self) -> bool {
        self.owner.is_none()
            && self.cores.is_empty()
            && self.claims.is_empty()
            && self.victory_points.is_empty()
            && self.buildings.is_empty()
            && self.province_buildings.is_empty()
    }

    /// Adds `tag` to the cores unless it is already there.
    pub fn add_core(&mut self, tag: &str) -> bool {
        if self.cores.iter().any(|c| c == tag) {
            return false;
        }
        self.cores.push(tag.to_string());
        true
    }

    /// Removes `tag` from cores and claims. Returns whether anything changed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.cores.len() + self.claims.len();
        self.cores.retain(|c| c != tag);
        self.claims.retain(|c| c != tag);
        before != self.cores.len() + self.claims.len()
    }
}

/// A parsed state history file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub id: u32,
    pub name: String,
    pub manpower: i64,
    #[serde(rename = "state_category")]
    pub category: String,
    pub impassable: bool,
    pub local_supplies: f64,
    pub resources: BTreeMap<String, f64>,
    pub provinces: Vec<u32>,
    pub history: StateHistory,
}

/// What is left of the state once the repeated keys are extracted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawState {
    id: u32,
    name: String,
    manpower: i64,
    state_category: String,
    impassable: bool,
    local_supplies: f64,
    resources: BTreeMap<String, f64>,
    provinces: Vec<u32>,
    history: RawHistory,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHistory {
    owner: Option<String>,
    buildings: BTreeMap<String, i64>,
}

/// Keys pulled out of the text before it is handed to the JSON parser.
#[derive(Debug, Default)]
struct Extracted {
    cores: Vec<String>,
    claims: Vec<String>,
    victory_points: Vec<VictoryPoint>,
    province_buildings: BTreeMap<u32, BTreeMap<String, i64>>,
}

/// Removes every match of `re` from `text`, handing each capture set to `f` first.
fn extract<F>(re: &Regex, text: &str, mut f: F) -> Result<String>
where
    F: FnMut(&regex::Captures) -> Result<()>,
{
    for caps in re.captures_iter(text) {
        f(&caps)?;
    }
    Ok(re.replace_all(text, "").into_owned())
}

fn tidy_commas(text: &str) -> String {
    text.replace("{,", "{").replace(",}", "}")
}

fn invalid(field: &'static str, value: &str) -> DataError {
    DataError::InvalidValue {
        field,
        value: value.to_string(),
    }
}

/// Rewrites the state block into JSON and collects the repeated keys.
fn rewrite(content: &str) -> Result<(String, Extracted)> {
    // Flatten to a single line.
    let text = COMMENT.replace_all(content, "");
    let text = text.replace('\n', ",").replace('\r', "");
    let text = OUTER_BLOCK
        .find(&text)
        .ok_or(DataError::MissingBlock)?
        .as_str()
        .replace('"', " ");

    // Quote every word, then unquote the plain integers again.
    let text = WORD.replace_all(&text, "\"${0}\"");
    let text = QUOTED_NUMBER.replace_all(&text, "${1}");

    // Whitespace becomes the separator.
    let text = text.replace([' ', '\t'], ",");
    let text = COMMA_RUN.replace_all(&text, ",");
    let text = tidy_commas(&text)
        .replace("\"yes\"", "true")
        .replace("\"no\"", "false");
    let text = ASSIGN.replace_all(&text, ":").into_owned();

    let mut extracted = Extracted::default();
    let text = extract(&CORE, &text, |caps| {
        extracted.cores.push(caps[1].to_string());
        Ok(())
    })?;
    let text = extract(&CLAIM, &text, |caps| {
        extracted.claims.push(caps[1].to_string());
        Ok(())
    })?;
    let text = extract(&VICTORY_POINT, &text, |caps| {
        let province = caps[1]
            .parse()
            .map_err(|_| invalid("victory point province", &caps[1]))?;
        let value = caps[2]
            .parse()
            .map_err(|_| invalid("victory point value", &caps[2]))?;
        extracted.victory_points.push(VictoryPoint { province, value });
        Ok(())
    })?;

    // Empty blocks fall back to defaults. Brace lists of integers are
    // arrays; numeric keys become strings.
    let text = EMPTY_BLOCK.replace_all(&text, "");
    let text = NUMBER_LIST.replace_all(&text, "[${1}]");
    let text = NUMERIC_KEY.replace_all(&text, "\"${1}\":");

    let text = extract(&PROVINCE_BUILDINGS, &text, |caps| {
        let province = caps[1]
            .parse()
            .map_err(|_| invalid("building province", &caps[1]))?;
        let buildings: BTreeMap<String, i64> = serde_json::from_str(&caps[2])?;
        extracted.province_buildings.insert(province, buildings);
        Ok(())
    })?;

    Ok((tidy_commas(&text), extracted))
}

/// Parses the text of a state history file.
pub fn parse_state(content: &str) -> Result<State> {
    let (json, extracted) = rewrite(content)?;
    log::trace!("state as json: {json}");
    let raw: RawState = serde_json::from_str(&json)?;

    Ok(State {
        id: raw.id,
        name: raw.name,
        manpower: raw.manpower,
        category: raw.state_category,
        impassable: raw.impassable,
        local_supplies: raw.local_supplies,
        resources: raw.resources,
        provinces: raw.provinces,
        history: StateHistory {
            owner: raw.history.owner.filter(|o| !o.is_empty()),
            cores: extracted.cores,
            claims: extracted.claims,
            victory_points: extracted.victory_points,
            buildings: raw.history.buildings,
            province_buildings: extracted.province_buildings,
        },
    })
}

/// Reads and parses one state file; errors name the file.
pub fn parse_state_file(path: &Path) -> Result<State> {
    let content = read_text(path).map_err(|e| DataError::parse(path, e))?;
    parse_state(&content).map_err(|e| DataError::parse(path, e))
}

impl State {
    /// Renders the state back into the block syntax.
    ///
    /// Output is fully determined by the record: map entries come out in key
    /// order and province buildings sit inside `buildings` after the
    /// state-wide ones.
    pub fn encode(&self) -> String {
        let mut out = String::from("state = {\n");
        self.write_body(&mut out)
            .expect("formatting into a String cannot fail");
        out.push_str("}\n");
        out
    }

    fn write_body(&self, out: &mut String) -> std::fmt::Result {
        if self.id != 0 {
            writeln!(out, "\tid = {}", self.id)?;
        }
        if !self.name.is_empty() {
            writeln!(out, "\tname = \"{}\"", self.name)?;
        }
        if self.manpower != 0 {
            writeln!(out, "\tmanpower = {}", self.manpower)?;
        }
        if !self.category.is_empty() {
            writeln!(out, "\tstate_category = {}", self.category)?;
        }
        if self.impassable {
            writeln!(out, "\timpassable = yes")?;
        }
        writeln!(out, "\tlocal_supplies = {}", self.local_supplies)?;

        if !self.resources.is_empty() {
            writeln!(out, "\tresources = {{")?;
            for (resource, amount) in &self.resources {
                writeln!(out, "\t\t{resource} = {amount}")?;
            }
            writeln!(out, "\t}}")?;
        }

        if !self.provinces.is_empty() {
            let provinces: Vec<String> = self.provinces.iter().map(u32::to_string).collect();
            writeln!(out, "\tprovinces = {{\n\t\t{}\n\t}}", provinces.join(" "))?;
        }

        let history = &self.history;
        if history.is_empty() {
            return Ok(());
        }
        writeln!(out, "\thistory = {{")?;
        if let Some(owner) = &history.owner {
            writeln!(out, "\t\towner = {owner}")?;
        }
        for core in &history.cores {
            writeln!(out, "\t\tadd_core_of = {core}")?;
        }
        for claim in &history.claims {
            writeln!(out, "\t\tadd_claim_of = {claim}")?;
        }
        for vp in &history.victory_points {
            writeln!(
                out,
                "\t\tvictory_points = {{\n\t\t\t{} {}\n\t\t}}",
                vp.province, vp.value
            )?;
        }
        if !history.buildings.is_empty() || !history.province_buildings.is_empty() {
            writeln!(out, "\t\tbuildings = {{")?;
            for (building, level) in &history.buildings {
                writeln!(out, "\t\t\t{building} = {level}")?;
            }
            for (province, buildings) in &history.province_buildings {
                writeln!(out, "\t\t\t{province} = {{")?;
                for (building, level) in buildings {
                    writeln!(out, "\t\t\t\t{building} = {level}")?;
                }
                writeln!(out, "\t\t\t}}")?;
            }
            writeln!(out, "\t\t}}")?;
        }
        writeln!(out, "\t}}")
    }
}

/// Loads every file of `history/states`, in file name order.
pub fn load_states_dir(mod_root: &Path) -> Result<Vec<(PathBuf, State)>> {
    let dir = mod_root.join("history").join("states");
    let mut states = Vec::new();
    for entry in sorted_files(&dir)? {
        let path = entry.path();
        let state = parse_state_file(&path)?;
        states.push((path, state));
    }
    log::debug!("loaded {} states from {}", states.len(), dir.display());
    Ok(states)
}

/// Writes `state` to `path` in the block syntax.
pub fn write_state(path: &Path, state: &State) -> Result<()> {
    write_file(path, state.encode().as_bytes())?;
    Ok(())
}
