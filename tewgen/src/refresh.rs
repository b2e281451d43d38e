//! Regenerates every country-derived file of the mod from the country table.

use crate::config::CountryTable;
use crate::render;
use crate::upgrade::UpgradeGraph;
use anyhow::{Context, Result};
use hoi4data::Rgb;
use hoi4data::color::random_distinct;
use hoi4data::countries::{CountryColor, CountryTag};
use hoi4data::files::write_file;
use hoi4data::localisation::{Localisation, LocalisationWriter};
use rand::Rng;
use std::collections::HashSet;
use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};

pub const LANGUAGE: &str = "simp_chinese";

/// A government category a country can be shown as.
#[derive(Debug, Clone, Copy)]
pub struct CountryType {
    pub id: &'static str,
    /// Color the country's own color is blended toward.
    pub color: Rgb,
    name_prefix: &'static str,
    name_suffix: &'static str,
    /// Government ideas that put a country in this category.
    governments: &'static [&'static str],
}

impl CountryType {
    /// Display name of `country` under this government, e.g. `大罗马帝国`.
    pub fn name(&self, country: &str) -> String {
        format!("{}{}{}", self.name_prefix, country, self.name_suffix)
    }
}

pub const COUNTRY_TYPES: [CountryType; 7] = [
    CountryType {
        id: "anarchism",
        color: Rgb::new(255, 107, 0),
        name_prefix: "",
        name_suffix: "公社",
        governments: &["gov_anarchist_commune"],
    },
    CountryType {
        id: "communism",
        color: Rgb::new(255, 0, 0),
        name_prefix: "",
        name_suffix: "社会主义共和国",
        governments: &["gov_communist_dictatorship", "gov_communist_republic"],
    },
    CountryType {
        id: "democratic",
        color: Rgb::new(0, 0, 255),
        name_prefix: "",
        name_suffix: "共和国",
        governments: &[
            "gov_presidential_republic",
            "gov_parliamentary_republic",
            "gov_committee_republic",
        ],
    },
    CountryType {
        id: "conservatism",
        color: Rgb::new(0, 255, 255),
        name_prefix: "",
        name_suffix: "王国",
        governments: &["gov_parliamentary_constitutional_monarchy"],
    },
    CountryType {
        id: "feudalism",
        color: Rgb::new(192, 192, 192),
        name_prefix: "",
        name_suffix: "王国",
        governments: &[
            "gov_dualist_constitutional_monarchy",
            "gov_absolute_monarchy",
        ],
    },
    CountryType {
        id: "dictatorship",
        color: Rgb::new(255, 255, 0),
        name_prefix: "",
        name_suffix: "国",
        governments: &[
            "gov_presidential_dictatorship",
            "gov_parliamentary_dictatorship",
            "gov_military_dictatorship",
        ],
    },
    CountryType {
        id: "fascism",
        color: Rgb::new(102, 51, 0),
        name_prefix: "大",
        name_suffix: "帝国",
        governments: &["gov_fascist_republic", "gov_fascist_dictatorship"],
    },
];

/// Subject kinds and their name templates. The game substitutes the
/// `$...$` variables.
pub const AUTONOMY_NAMES: [(&str, &str); 5] = [
    ("dominion", "$OVERLORDADJ$属$NONIDEOLOGYADJ$自治领"),
    ("colony", "$OVERLORDADJ$属$NONIDEOLOGYADJ$殖民政府"),
    ("puppet", "$OVERLORDADJ$属$NONIDEOLOGYADJ$"),
    ("union", "$OVERLORDADJ$-$NONIDEOLOGYADJ$邦"),
    ("division", "$OVERLORDADJ$-$NONIDEOLOGYADJ$军阀"),
];

/// Blend strengths toward the type color, drawn per cosmetic tag.
const TYPE_ALPHAS: [f32; 4] = [0.4, 0.5, 0.6, 0.7];

fn type_tag(country: &str, country_type: &str) -> String {
    format!("{country}_type_{country_type}")
}

fn localisation_path(mod_root: &Path, file: &str) -> PathBuf {
    mod_root.join("localisation").join(LANGUAGE).join(file)
}

pub fn country_tags_file(table: &CountryTable) -> String {
    let mut out = String::new();
    for country in table.iter() {
        let tag = CountryTag::new(&country.id, format!("countries/{}.txt", country.region));
        out.push_str(&tag.encode());
        out.push('\n');
    }
    out
}

pub fn country_names_file(table: &CountryTable) -> LocalisationWriter {
    let mut loc = LocalisationWriter::new(LANGUAGE);
    for country in table.iter() {
        loc.line(&country.id, &country.name)
            .line(format!("{}_DEF", country.id), &country.name)
            .line(format!("{}_ADJ", country.id), &country.name)
            .blank();
    }
    loc
}

/// Picks a color for every country, generating distinct ones for countries
/// without a configured color.
pub fn resolve_colors<R: Rng + ?Sized>(
    table: &CountryTable,
    rng: &mut R,
) -> Result<Vec<CountryColor>> {
    let mut used: HashSet<Rgb> = table.iter().filter_map(|c| c.color).collect();
    table
        .iter()
        .map(|country| -> Result<CountryColor> {
            let color = match country.color {
                Some(color) => color,
                None => random_distinct(rng, &mut used)
                    .with_context(|| format!("picking a color for {}", country.id))?,
            };
            Ok(CountryColor::uniform(&country.id, color))
        })
        .collect()
}

pub fn colors_file(colors: &[CountryColor]) -> String {
    let mut out = String::new();
    for color in colors {
        out.push_str(&color.encode());
        out.push('\n');
    }
    out
}

/// One cosmetic color per country and type, blended toward the type color.
pub fn type_colors<R: Rng + ?Sized>(colors: &[CountryColor], rng: &mut R) -> Vec<CountryColor> {
    let mut out = Vec::with_capacity(colors.len() * COUNTRY_TYPES.len());
    for color in colors {
        for country_type in &COUNTRY_TYPES {
            let alpha = TYPE_ALPHAS[rng.random_range(0..TYPE_ALPHAS.len())];
            out.push(CountryColor::uniform(
                type_tag(&color.country, country_type.id),
                color.color.blend(country_type.color, alpha),
            ));
        }
    }
    out
}

/// Type names, keeping any value the mod already has for a key.
pub fn country_type_names_file(table: &CountryTable, existing: &Localisation) -> LocalisationWriter {
    let mut loc = LocalisationWriter::new(LANGUAGE);
    for country in table.iter() {
        for country_type in &COUNTRY_TYPES {
            let key = type_tag(&country.id, country_type.id);
            let name = existing
                .value(&key)
                .map(str::to_string)
                .unwrap_or_else(|| country_type.name(&country.name));
            loc.line(&key, &name).line(format!("{key}_DEF"), &name);
        }
        loc.blank();
    }
    loc
}

pub fn autonomy_names_file(table: &CountryTable) -> LocalisationWriter {
    let mut loc = LocalisationWriter::new(LANGUAGE);
    for country in table.iter() {
        for (kind, template) in AUTONOMY_NAMES {
            let key = format!("{}_tew_autonomy_{kind}", country.id);
            loc.line(&key, template).line(format!("{key}_DEF"), template);
        }
        loc.blank();
    }
    loc
}

/// The `country_tag` idea group: one idea per country that can be formed.
pub fn ideas_file(graph: &UpgradeGraph) -> String {
    render(|out| write_ideas(out, graph))
}

fn write_ideas(out: &mut String, graph: &UpgradeGraph) -> fmt::Result {
    out.push_str(
        "ideas = {\n\tcountry_tag = {\n\t\tlaw = yes\n\n\t\tcountry_tag_default = {\n\t\t\ton_add = {\n\t\t\t\ttew_update_country_type = yes\n\t\t\t}\n\n\t\t\tai_will_do = { factor = 0 }\n\n\t\t\tcancel_if_invalid = yes\n\t\t\tdefault = yes\n\t\t}",
    );
    for (country, descendants) in graph.upgradeable() {
        let id = &country.id;
        let allowed = descendants
            .iter()
            .map(|tag| format!("original_tag = {tag}"))
            .collect::<Vec<_>>()
            .join("\n\t\t\t\t\t");
        write!(
            out,
            "\n\n\t\tcountry_tag_{id} = {{\n\t\t\tallowed = {{\n\t\t\t\tOR = {{\n\t\t\t\t\t{allowed}\n\t\t\t\t}}\n\t\t\t}}\n\n\t\t\tavailable = {{\n\t\t\t\ttew_can_ndependent_diplomacy = yes\n\t\t\t\tNOT = {{\n\t\t\t\t\tcountry_exists = {id}\n\t\t\t\t\tany_other_country = {{\n\t\t\t\t\t\tlimit = {{ exists = yes }}\n\t\t\t\t\t\thas_idea = country_tag_{id}\n\t\t\t\t\t}}\n\t\t\t\t}}\n\t\t\t\t{id} = {{\n\t\t\t\t\tset_temp_variable = {{ tew_than_number = {ratio} }}\n\t\t\t\t\ttew_self_or_puppet_owns_gte = yes\n\t\t\t\t}}\n\t\t\t}}\n\n\t\t\ton_add = {{\n\t\t\t\ttew_update_country_type = yes\n\t\t\t}}\n\n\t\t\tai_will_do = {{\n\t\t\t\tfactor = 100",
            ratio = country.upgrade_ratio(),
        )?;
        for conflict in graph.conflicts(id, descendants) {
            write!(
                out,
                "\n\t\t\t\tmodifier = {{\n\t\t\t\t\tfactor = 0\n\t\t\t\t\thas_idea = country_tag_{conflict}\n\t\t\t\t}}"
            )?;
        }
        out.push_str("\n\t\t\t}\n\n\t\t\tcancel_if_invalid = yes\n\t\t}");
    }
    out.push_str("\n\t}\n}\n");
    Ok(())
}

/// `if`/`else_if` chain over the country types, setting `<tag>_type_<type>`.
fn write_type_chain(out: &mut String, tag: &str) -> fmt::Result {
    for (i, country_type) in COUNTRY_TYPES.iter().enumerate() {
        let keyword = if i == 0 { "if" } else { "else_if" };
        write!(
            out,
            "\t\t\t{keyword} = {{\n\t\t\t\tlimit = {{ has_country_flag = country_type_{id} }}\n\t\t\t\tset_cosmetic_tag = {cosmetic}\n\t\t\t}}\n",
            id = country_type.id,
            cosmetic = type_tag(tag, country_type.id),
        )?;
    }
    Ok(())
}

/// `tew_update_country_type`: sets the country type flag from the current
/// government, then the matching cosmetic tag.
pub fn scripted_effects_file(table: &CountryTable, graph: &UpgradeGraph) -> String {
    render(|out| write_scripted_effects(out, table, graph))
}

fn write_scripted_effects(
    out: &mut String,
    table: &CountryTable,
    graph: &UpgradeGraph,
) -> fmt::Result {
    out.push_str("# 更新国家类型\n#param: THIS\ntew_update_country_type = {\n\t# clear flag\n\tclr_country_flag = country_type_none\n");
    for country_type in &COUNTRY_TYPES {
        writeln!(out, "\tclr_country_flag = country_type_{}", country_type.id)?;
    }

    out.push_str("\n\t# set flag\n\tif = {\n\t\tlimit = { tew_can_ndependent_diplomacy = no }\n\t\tset_country_flag = country_type_none\n\t}\n");
    for country_type in &COUNTRY_TYPES {
        out.push_str("\telse_if = {\n\t\tlimit = {\n");
        if let [government] = country_type.governments {
            writeln!(out, "\t\t\thas_idea = {government}")?;
        } else {
            out.push_str("\t\t\tOR = {\n");
            for government in country_type.governments {
                writeln!(out, "\t\t\t\thas_idea = {government}")?;
            }
            out.push_str("\t\t\t}\n");
        }
        write!(
            out,
            "\t\t}}\n\t\tset_country_flag = country_type_{}\n\t}}\n",
            country_type.id
        )?;
    }

    out.push_str("\n\t# set cosmetic tag\n\tif = {\n\t\tlimit = { has_country_flag = country_type_none }\n\t\tdrop_cosmetic_tag = yes\n\t}\n\telse_if = {\n\t\tlimit = { NOT = { has_idea = country_tag_default } }\n");
    for (i, (country, _)) in graph.upgradeable().enumerate() {
        let keyword = if i == 0 { "if" } else { "else_if" };
        write!(
            out,
            "\t\t{keyword} = {{\n\t\t\tlimit = {{ has_idea = country_tag_{} }}\n",
            country.id
        )?;
        write_type_chain(out, &country.id)?;
        out.push_str("\t\t}\n");
    }
    out.push_str("\t}\n\telse = {\n");
    for (i, country) in table.iter().enumerate() {
        let keyword = if i == 0 { "if" } else { "else_if" };
        write!(
            out,
            "\t\t{keyword} = {{\n\t\t\tlimit = {{ original_tag = {} }}\n",
            country.id
        )?;
        write_type_chain(out, &country.id)?;
        out.push_str("\t\t}\n");
    }
    out.push_str("\t}\n}\n");
    Ok(())
}

pub fn idea_names_file(graph: &UpgradeGraph) -> LocalisationWriter {
    let mut loc = LocalisationWriter::new(LANGUAGE);
    loc.line("country_tag", "国家")
        .line("idea_group_country_tag", "国家")
        .line("idea_group_country_tag_desc", "国家")
        .line("country_tag_default", "默认");
    for (country, _) in graph.upgradeable() {
        loc.line(format!("country_tag_{}", country.id), &country.name);
    }
    loc
}

/// Idea icons: the medium flag of each country that can be formed.
pub fn flag_sprites_file(graph: &UpgradeGraph) -> String {
    render(|out| {
        out.push_str("spriteTypes = {");
        for (country, _) in graph.upgradeable() {
            writeln!(
                out,
                "\n\tspriteType = {{\n\t\tname = \"GFX_idea_country_tag_{id}\"\n\t\ttexturefile = \"gfx\\\\flags\\\\medium\\\\{id}.tga\"\n\t}}",
                id = country.id
            )?;
        }
        out.push('}');
        Ok(())
    })
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    write_file(path, text.as_bytes()).with_context(|| format!("writing {}", path.display()))
}

fn write_loc(path: &Path, loc: &LocalisationWriter) -> Result<()> {
    loc.write(path)
        .with_context(|| format!("writing {}", path.display()))
}

/// Runs every generation step against `mod_root`.
pub fn refresh_countries<R: Rng + ?Sized>(
    mod_root: &Path,
    table: &CountryTable,
    rng: &mut R,
) -> Result<()> {
    let common = mod_root.join("common");

    log::info!("generating country tags");
    write_text(
        &common.join("country_tags").join("tew_auto_generate.txt"),
        &country_tags_file(table),
    )?;
    log::info!("country tags done");

    log::info!("generating country names");
    write_loc(
        &localisation_path(mod_root, "tew_countries_auto_generate_l_simp_chinese.yml"),
        &country_names_file(table),
    )?;
    log::info!("country names done");

    log::info!("generating country colors");
    let colors = resolve_colors(table, rng)?;
    write_text(&common.join("countries").join("colors.txt"), &colors_file(&colors))?;
    log::info!("country colors done");

    log::info!("generating country type colors");
    write_text(
        &common.join("countries").join("cosmetic.txt"),
        &colors_file(&type_colors(&colors, rng)),
    )?;
    log::info!("country type colors done");

    let existing = Localisation::load_language(mod_root, LANGUAGE)
        .context("reading the mod's localisation")?;

    log::info!("generating country type names");
    write_loc(
        &localisation_path(mod_root, "tew_country_types_auto_generate_l_simp_chinese.yml"),
        &country_type_names_file(table, &existing),
    )?;
    log::info!("country type names done");

    log::info!("generating subject names");
    write_loc(
        &localisation_path(mod_root, "tew_autonomy_name_l_simp_chinese.yml"),
        &autonomy_names_file(table),
    )?;
    log::info!("subject names done");

    let graph = UpgradeGraph::new(table);
    log::debug!("{} countries can be formed", graph.upgradeable().count());

    log::info!("generating country formation ideas");
    write_text(
        &common.join("ideas").join("tew_attr_country_tag_auto_generate.txt"),
        &ideas_file(&graph),
    )?;
    log::info!("country formation ideas done");

    log::info!("generating country type effects");
    write_text(
        &common
            .join("scripted_effects")
            .join("tew_tag_scripted_effects_auto_generate.txt"),
        &scripted_effects_file(table, &graph),
    )?;
    log::info!("country type effects done");

    log::info!("generating formable country names");
    write_loc(
        &localisation_path(mod_root, "tew_country_tag_auto_generate_l_simp_chinese.yml"),
        &idea_names_file(&graph),
    )?;
    log::info!("formable country names done");

    log::info!("generating formable country icons");
    write_text(
        &mod_root.join("interface").join("tew_country_tga_auto_generate.gfx"),
        &flag_sprites_file(&graph),
    )?;
    log::info!("formable country icons done");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoi4data::localisation::LocalisationEntry;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn small_table() -> CountryTable {
        CountryTable::from_json(
            r#"[
            {"id":"ROM","name":"罗马","region":"Rome","color":[128,0,64],"sons":["ITA","GRE"]},
            {"id":"BYZ","name":"拜占庭","region":"Byzantium","sons":["GRE"],"upgrade_ratio":75},
            {"id":"ITA","name":"意大利","region":"Italy"},
            {"id":"GRE","name":"希腊","region":"Greece","color":[0,0,200]}
        ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_country_tags_file() {
        assert_eq!(
            country_tags_file(&small_table()),
            "ROM = \"countries/Rome.txt\"\nBYZ = \"countries/Byzantium.txt\"\nITA = \"countries/Italy.txt\"\nGRE = \"countries/Greece.txt\"\n"
        );
    }

    #[test]
    fn test_country_names_file() {
        let loc = country_names_file(&small_table());
        assert!(loc.as_str().starts_with(
            "l_simp_chinese:\n ROM:0 \"罗马\"\n ROM_DEF:0 \"罗马\"\n ROM_ADJ:0 \"罗马\"\n\n BYZ:0"
        ));
    }

    #[test]
    fn test_resolve_colors_keeps_configured_and_fills_distinct() {
        let table = small_table();
        let mut rng = StdRng::seed_from_u64(7);
        let colors = resolve_colors(&table, &mut rng).unwrap();
        assert_eq!(colors.len(), 4);
        assert_eq!(colors[0].color, Rgb::new(128, 0, 64));
        assert_eq!(colors[3].color, Rgb::new(0, 0, 200));
        let unique: HashSet<_> = colors.iter().map(|c| c.color).collect();
        assert_eq!(unique.len(), 4);
        assert!(colors.iter().all(|c| c.color == c.color_ui));
    }

    #[test]
    fn test_type_colors_blend_toward_type() {
        let colors = vec![CountryColor::uniform("ABC", Rgb::new(0, 0, 0))];
        let mut rng = StdRng::seed_from_u64(1);
        let types = type_colors(&colors, &mut rng);
        assert_eq!(types.len(), COUNTRY_TYPES.len());
        assert_eq!(types[1].country, "ABC_type_communism");
        // Black blended toward pure red keeps green and blue at zero.
        let red = types[1].color;
        assert!((102..=179).contains(&red.r), "{red:?}");
        assert_eq!((red.g, red.b), (0, 0));
    }

    #[test]
    fn test_country_type_names_keep_existing() {
        let table = small_table();
        let mut existing = Localisation::new();
        existing.insert(LocalisationEntry::new("ROM_type_fascism", "神圣罗马帝国"));
        let text = country_type_names_file(&table, &existing);
        let text = text.as_str();
        assert!(text.contains(" ROM_type_fascism:0 \"神圣罗马帝国\"\n"));
        assert!(text.contains(" ROM_type_fascism_DEF:0 \"神圣罗马帝国\"\n"));
        assert!(text.contains(" ROM_type_communism:0 \"罗马社会主义共和国\"\n"));
        assert!(text.contains(" ITA_type_anarchism:0 \"意大利公社\"\n"));
        assert!(text.contains(" GRE_type_dictatorship_DEF:0 \"希腊国\"\n"));
    }

    #[test]
    fn test_autonomy_names_file() {
        let loc = autonomy_names_file(&small_table());
        assert!(loc.as_str().contains(
            " ROM_tew_autonomy_dominion:0 \"$OVERLORDADJ$属$NONIDEOLOGYADJ$自治领\"\n ROM_tew_autonomy_dominion_DEF:0 \"$OVERLORDADJ$属$NONIDEOLOGYADJ$自治领\"\n"
        ));
        assert!(loc.as_str().contains(" GRE_tew_autonomy_division:0 \"$OVERLORDADJ$-$NONIDEOLOGYADJ$军阀\"\n"));
    }

    #[test]
    fn test_ideas_file() {
        let table = small_table();
        let graph = UpgradeGraph::new(&table);
        let ideas = ideas_file(&graph);
        assert!(ideas.starts_with("ideas = {\n\tcountry_tag = {\n\t\tlaw = yes\n"));
        assert!(ideas.contains(
            "\t\tcountry_tag_ROM = {\n\t\t\tallowed = {\n\t\t\t\tOR = {\n\t\t\t\t\toriginal_tag = ITA\n\t\t\t\t\toriginal_tag = GRE\n\t\t\t\t}\n\t\t\t}\n"
        ));
        assert!(ideas.contains("set_temp_variable = { tew_than_number = 70 }"));
        assert!(ideas.contains("set_temp_variable = { tew_than_number = 75 }"));
        assert!(ideas.contains(
            "factor = 100\n\t\t\t\tmodifier = {\n\t\t\t\t\tfactor = 0\n\t\t\t\t\thas_idea = country_tag_BYZ\n\t\t\t\t}"
        ));
        assert!(!ideas.contains("country_tag_ITA = {"));
        assert!(ideas.ends_with("cancel_if_invalid = yes\n\t\t}\n\t}\n}\n"));
        assert_eq!(ideas.matches('{').count(), ideas.matches('}').count());
    }

    #[test]
    fn test_scripted_effects_file() {
        let table = small_table();
        let graph = UpgradeGraph::new(&table);
        let effects = scripted_effects_file(&table, &graph);
        assert!(effects.starts_with(
            "# 更新国家类型\n#param: THIS\ntew_update_country_type = {\n\t# clear flag\n\tclr_country_flag = country_type_none\n\tclr_country_flag = country_type_anarchism\n"
        ));
        assert!(effects.contains(
            "\telse_if = {\n\t\tlimit = {\n\t\t\thas_idea = gov_anarchist_commune\n\t\t}\n\t\tset_country_flag = country_type_anarchism\n\t}\n"
        ));
        assert!(effects.contains(
            "\telse_if = {\n\t\tlimit = {\n\t\t\tOR = {\n\t\t\t\thas_idea = gov_fascist_republic\n\t\t\t\thas_idea = gov_fascist_dictatorship\n\t\t\t}\n\t\t}\n\t\tset_country_flag = country_type_fascism\n\t}\n"
        ));
        assert!(effects.contains(
            "\t\tif = {\n\t\t\tlimit = { has_idea = country_tag_ROM }\n\t\t\tif = {\n\t\t\t\tlimit = { has_country_flag = country_type_anarchism }\n\t\t\t\tset_cosmetic_tag = ROM_type_anarchism\n\t\t\t}\n"
        ));
        assert!(effects.contains("\t\telse_if = {\n\t\t\tlimit = { has_idea = country_tag_BYZ }\n"));
        assert!(effects.contains("\telse = {\n\t\tif = {\n\t\t\tlimit = { original_tag = ROM }\n"));
        assert!(effects.contains("\t\telse_if = {\n\t\t\tlimit = { original_tag = GRE }\n"));
        assert!(effects.ends_with("\t\t}\n\t}\n}\n"));
        assert_eq!(effects.matches('{').count(), effects.matches('}').count());
    }

    #[test]
    fn test_idea_names_file() {
        let table = small_table();
        let graph = UpgradeGraph::new(&table);
        assert_eq!(
            idea_names_file(&graph).as_str(),
            "l_simp_chinese:\n country_tag:0 \"国家\"\n idea_group_country_tag:0 \"国家\"\n idea_group_country_tag_desc:0 \"国家\"\n country_tag_default:0 \"默认\"\n country_tag_ROM:0 \"罗马\"\n country_tag_BYZ:0 \"拜占庭\"\n"
        );
    }

    #[test]
    fn test_flag_sprites_file() {
        let table = small_table();
        let graph = UpgradeGraph::new(&table);
        let gfx = flag_sprites_file(&graph);
        assert_eq!(
            gfx,
            "spriteTypes = {\n\tspriteType = {\n\t\tname = \"GFX_idea_country_tag_ROM\"\n\t\ttexturefile = \"gfx\\\\flags\\\\medium\\\\ROM.tga\"\n\t}\n\n\tspriteType = {\n\t\tname = \"GFX_idea_country_tag_BYZ\"\n\t\ttexturefile = \"gfx\\\\flags\\\\medium\\\\BYZ.tga\"\n\t}\n}"
        );
    }

    #[test]
    fn test_refresh_countries_writes_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let table = small_table();
        let mut rng = StdRng::seed_from_u64(3);
        refresh_countries(dir.path(), &table, &mut rng).unwrap();

        let root = dir.path();
        for file in [
            "common/country_tags/tew_auto_generate.txt",
            "common/countries/colors.txt",
            "common/countries/cosmetic.txt",
            "common/ideas/tew_attr_country_tag_auto_generate.txt",
            "common/scripted_effects/tew_tag_scripted_effects_auto_generate.txt",
            "interface/tew_country_tga_auto_generate.gfx",
        ] {
            assert!(root.join(file).is_file(), "{file}");
        }
        let loc_dir = root.join("localisation/simp_chinese");
        for file in [
            "tew_countries_auto_generate_l_simp_chinese.yml",
            "tew_country_types_auto_generate_l_simp_chinese.yml",
            "tew_autonomy_name_l_simp_chinese.yml",
            "tew_country_tag_auto_generate_l_simp_chinese.yml",
        ] {
            let bytes = std::fs::read(loc_dir.join(file)).unwrap();
            assert_eq!(&bytes[..3], &hoi4data::files::UTF8_BOM, "{file}");
        }

        let cosmetic = std::fs::read_to_string(root.join("common/countries/cosmetic.txt")).unwrap();
        let parsed = hoi4data::countries::parse_country_colors(&cosmetic).unwrap();
        assert_eq!(parsed.len(), table.len() * COUNTRY_TYPES.len());
    }

    #[test]
    fn test_refresh_is_reproducible_for_a_seed() {
        let table = small_table();
        let run = |seed| {
            let dir = tempfile::tempdir().unwrap();
            refresh_countries(dir.path(), &table, &mut StdRng::seed_from_u64(seed)).unwrap();
            std::fs::read_to_string(dir.path().join("common/countries/cosmetic.txt")).unwrap()
        };
        assert_eq!(run(9), run(9));
    }
}
