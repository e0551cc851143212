use rand::Rng;
use std::path::Path;
use tracing::{debug, info};

use crate::mapping::NameMapping;
use crate::naming::NameGenerator;
use crate::rewrite::{ClassRewriters, CssClassScanner};
use crate::walk::{collect_text_files, read_text, FileKind};
use crate::{rewrite_file, ObfuscateError, PassResult, RunOptions};

pub fn find_and_replace_class_names<R: Rng>(
    root: &Path,
    mapping: &mut NameMapping,
    generator: &mut NameGenerator<R>,
    options: &RunOptions,
) -> Result<PassResult, ObfuscateError> {
    find_and_replace_class_names_with(root, mapping, generator, options, &|_: &Path, _: &str, _: &str| {})
}

/// Harvests class selectors from every CSS file under `root`, maps each new
/// one to a generated name, then rewrites CSS, HTML and JS files with the
/// whole mapping.
pub fn find_and_replace_class_names_with<R, F>(
    root: &Path,
    mapping: &mut NameMapping,
    generator: &mut NameGenerator<R>,
    options: &RunOptions,
    content_callback: &F,
) -> Result<PassResult, ObfuscateError>
where
    R: Rng,
    F: Fn(&Path, &str, &str),
{
    if options.class_name_length == 0 {
        return Err(ObfuscateError::Options {
            message: "class name length must be at least 1".to_string(),
        });
    }

    info!("Discovering class names under: {:?}", root);

    let scanner = CssClassScanner::new()?;
    let mut discovered = Vec::new();
    for (path, _) in collect_text_files(root, &[FileKind::Css])? {
        debug!("Scanning stylesheet: {:?}", path);
        let (content, _) = read_text(&path)?;
        discovered.extend(scanner.class_names(&content));
    }

    // Originals are reserved up front so no replacement can equal a class
    // that has not been mapped yet.
    for name in &discovered {
        generator.reserve(name);
    }
    for name in &discovered {
        if !mapping.contains(name) {
            let replacement = mapping.try_get_or_insert_with(name, || {
                generator.class_name_with_length(options.class_name_length)
            })?;
            debug!("Class mapping: {} -> {}", name, replacement);
        }
    }

    info!("Mapped {} class names", mapping.len());

    let mut result = PassResult::default();
    if mapping.is_empty() {
        return Ok(result);
    }

    let rewriters = ClassRewriters::new()?;

    for (path, kind) in collect_text_files(root, &[FileKind::Css, FileKind::Html, FileKind::Js])? {
        rewrite_file(
            &path,
            rewriters.for_kind(kind),
            mapping,
            options,
            content_callback,
            &mut result,
        )?;
    }

    info!(
        "Class renaming complete: {} files processed, {} content changes",
        result.files_processed, result.content_changes
    );

    Ok(result)
}
