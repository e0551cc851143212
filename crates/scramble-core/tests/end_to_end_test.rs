use anyhow::Result;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

use scramble_core::{obfuscate_project, NameGenerator, RunOptions};

fn is_class_token(name: &str) -> bool {
    let mut chars = name.chars();
    name.len() == 8
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

fn write_sample_project(root: &Path) -> Result<()> {
    fs::create_dir_all(root.join("img"))?;
    fs::write(root.join("style.css"), ".btn{color:red}\n.banner { background: url(img/logo.png) }\n")?;
    fs::write(
        root.join("index.html"),
        "<div class=\"btn\"><img src=\"img/logo.png\"></div>\n",
    )?;
    fs::write(root.join("img/logo.png"), b"\x89PNG")?;
    Ok(())
}

#[test]
fn test_full_run_renames_classes_and_images() -> Result<()> {
    let dir = tempdir()?;
    let root = dir.path();
    write_sample_project(root)?;

    let mut generator = NameGenerator::seeded(2024);
    let report = obfuscate_project(root, &mut generator, &RunOptions::default())?;

    let btn = report.class_names.get("btn").expect("btn should be mapped");
    let banner = report.class_names.get("banner").expect("banner should be mapped");
    assert!(is_class_token(btn), "unexpected class token {btn}");
    assert!(is_class_token(banner), "unexpected class token {banner}");

    let logo = report.image_names.get("logo.png").expect("logo.png should be mapped");
    let (base, ext) = logo.split_once('.').expect("extension kept");
    assert_eq!(base.len(), 10);
    assert!(base.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(ext, "png");

    assert_eq!(
        fs::read_to_string(root.join("style.css"))?,
        format!(".{btn}{{color:red}}\n.{banner} {{ background: url(img/{logo}) }}\n")
    );
    assert_eq!(
        fs::read_to_string(root.join("index.html"))?,
        format!("<div class=\"{btn}\"><img src=\"img/{logo}\"></div>\n")
    );
    assert!(root.join("img").join(logo).is_file());
    assert!(!root.join("img/logo.png").exists());

    assert_eq!(report.images.paths_renamed, 1);
    assert_eq!(report.classes.content_changes, 2);
    assert_eq!(report.images.content_changes, 2);
    Ok(())
}

#[test]
fn test_dry_run_changes_nothing() -> Result<()> {
    let dir = tempdir()?;
    let root = dir.path();
    write_sample_project(root)?;
    let css_before = fs::read(root.join("style.css"))?;
    let html_before = fs::read(root.join("index.html"))?;

    let mut generator = NameGenerator::seeded(7);
    let options = RunOptions {
        dry_run: true,
        ..RunOptions::default()
    };
    let report = obfuscate_project(root, &mut generator, &options)?;

    assert_eq!(report.class_names.len(), 2);
    assert_eq!(report.image_names.len(), 1);
    assert_eq!(fs::read(root.join("style.css"))?, css_before);
    assert_eq!(fs::read(root.join("index.html"))?, html_before);
    assert!(root.join("img/logo.png").is_file());
    Ok(())
}

#[test]
fn test_same_seed_same_result() -> Result<()> {
    let first = tempdir()?;
    let second = tempdir()?;
    write_sample_project(first.path())?;
    write_sample_project(second.path())?;

    let a = obfuscate_project(first.path(), &mut NameGenerator::seeded(99), &RunOptions::default())?;
    let b = obfuscate_project(second.path(), &mut NameGenerator::seeded(99), &RunOptions::default())?;

    let pairs = |m: &scramble_core::NameMapping| {
        m.iter()
            .map(|(o, r)| (o.to_string(), r.to_string()))
            .collect::<Vec<_>>()
    };
    assert_eq!(pairs(&a.class_names), pairs(&b.class_names));
    assert_eq!(pairs(&a.image_names), pairs(&b.image_names));
    assert_eq!(
        fs::read_to_string(first.path().join("index.html"))?,
        fs::read_to_string(second.path().join("index.html"))?
    );
    Ok(())
}

#[test]
fn test_unrelated_files_untouched() -> Result<()> {
    let dir = tempdir()?;
    let root = dir.path();
    write_sample_project(root)?;
    fs::write(root.join("README.md"), "Use class btn and logo.png\n")?;

    obfuscate_project(root, &mut NameGenerator::seeded(3), &RunOptions::default())?;

    assert_eq!(fs::read_to_string(root.join("README.md"))?, "Use class btn and logo.png\n");
    Ok(())
}
