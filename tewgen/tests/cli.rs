//! CLI integration tests using the pre-built binary.

use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn tewgen() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tewgen"));
    cmd.env_remove("TEW_MOD_PATH").env_remove("HOI4_PATH");
    cmd
}

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

#[test]
fn test_cli_help() {
    tewgen()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("countries"))
        .stdout(contains("cosmetic"));
}

#[test]
fn test_cli_version() {
    tewgen().arg("--version").assert().success();
}

#[test]
fn test_cli_countries() {
    let dir = tempdir().unwrap();
    let mod_root = dir.path().to_str().unwrap();

    tewgen()
        .args(["--mod-path", mod_root, "--seed", "42", "countries"])
        .assert()
        .success();

    let tags =
        fs::read_to_string(dir.path().join("common/country_tags/tew_auto_generate.txt")).unwrap();
    assert!(tags.starts_with("CHI = \"countries/China.txt\"\n"));
    let gfx =
        fs::read_to_string(dir.path().join("interface/tew_country_tga_auto_generate.gfx")).unwrap();
    assert!(gfx.contains("GFX_idea_country_tag_CHI"));
    assert!(!gfx.contains("GFX_idea_country_tag_QIN"));
}

#[test]
fn test_cli_default_runs_countries_and_flags() {
    let dir = tempdir().unwrap();
    let flags = dir.path().join("gfx/flags");
    fs::create_dir_all(&flags).unwrap();
    for tag in ["ROM", "BYZ"] {
        image::RgbaImage::from_pixel(82, 52, image::Rgba([120, 0, 60, 255]))
            .save_with_format(flags.join(format!("{tag}.tga")), image::ImageFormat::Tga)
            .unwrap();
    }

    tewgen()
        .args(["--mod-path", dir.path().to_str().unwrap(), "--seed", "3"])
        .assert()
        .success();

    let tags =
        fs::read_to_string(dir.path().join("common/country_tags/tew_auto_generate.txt")).unwrap();
    assert!(tags.contains("ROM = \"countries/Rome.txt\"\n"));
    for size in ["small", "medium"] {
        assert!(flags.join(size).join("ROM.tga").is_file(), "{size}");
        assert!(flags.join(size).join("BYZ.tga").is_file(), "{size}");
    }
    let medium = image::open(flags.join("medium/ROM.tga")).unwrap();
    assert_eq!((medium.width(), medium.height()), (41, 26));
}

#[test]
fn test_cli_countries_from_file_env_path() {
    let dir = tempdir().unwrap();
    let table = dir.path().join("countries.json");
    fs::write(
        &table,
        r#"[{"id":"TST","name":"测试","region":"Test","color":[1,2,3]}]"#,
    )
    .unwrap();
    let mod_root = dir.path().join("mod");

    tewgen()
        .env("TEW_MOD_PATH", &mod_root)
        .args(["countries", "--countries", table.to_str().unwrap()])
        .assert()
        .success();

    let colors = fs::read_to_string(mod_root.join("common/countries/colors.txt")).unwrap();
    assert_eq!(
        colors,
        "TST = {\n\tcolor = rgb { 1 2 3 }\n\tcolor_ui = rgb { 1 2 3 }\n}\n"
    );
}

#[test]
fn test_cli_duplicate_country_fails() {
    let dir = tempdir().unwrap();
    let table = dir.path().join("countries.json");
    fs::write(
        &table,
        r#"[{"id":"TST","name":"a","region":"A"},{"id":"TST","name":"b","region":"B"}]"#,
    )
    .unwrap();

    tewgen()
        .args(["--mod-path", dir.path().to_str().unwrap()])
        .args(["--countries", table.to_str().unwrap(), "countries"])
        .assert()
        .failure()
        .stderr(contains("TST"));
}

#[test]
fn test_cli_flags() {
    let dir = tempdir().unwrap();
    let flags = dir.path().join("gfx/flags");
    fs::create_dir_all(&flags).unwrap();
    image::RgbaImage::from_pixel(82, 52, image::Rgba([9, 9, 9, 255]))
        .save_with_format(flags.join("TST.tga"), image::ImageFormat::Tga)
        .unwrap();

    tewgen()
        .args(["--mod-path", dir.path().to_str().unwrap(), "flags"])
        .assert()
        .success();

    assert!(flags.join("small/TST.tga").is_file());
    assert!(flags.join("medium/TST.tga").is_file());
}

#[test]
fn test_cli_cores_dry_run() {
    let dir = tempdir().unwrap();
    let state = "state = { id = 1 name = \"STATE_1\" history = { owner = WLS add_core_of = WLS } provinces = { 1 } }";
    write(dir.path(), "history/states/1-Wales.txt", state);

    tewgen()
        .args(["--mod-path", dir.path().to_str().unwrap()])
        .args(["cores", "--if-core", "WLS", "--add", "WRM,RME", "--dry-run"])
        .assert()
        .success()
        .stdout(contains("1-Wales.txt"));

    let after = fs::read_to_string(dir.path().join("history/states/1-Wales.txt")).unwrap();
    assert_eq!(after, state);
}

#[test]
fn test_cli_dump_ideologies() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "common/ideologies/00_ideologies.txt",
        "ideologies = { neutrality = { types = { despotism = { } } color = { 128 128 128 } } }",
    );

    tewgen()
        .args(["--mod-path", dir.path().to_str().unwrap(), "dump", "ideologies"])
        .assert()
        .success()
        .stdout(contains("\"neutrality\""))
        .stdout(contains("128"));
}

#[test]
fn test_cli_cosmetic_needs_game_path() {
    let dir = tempdir().unwrap();
    // Only fails when no installation can be detected on this machine.
    if hoi4data::detect_game_path().is_some() {
        return;
    }
    tewgen()
        .args(["--mod-path", dir.path().to_str().unwrap(), "cosmetic"])
        .assert()
        .failure()
        .stderr(contains("--game-path"));
}
