use rand::Rng;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::mapping::NameMapping;
use crate::naming::NameGenerator;
use crate::rewrite::FileReferenceRewriter;
use crate::walk::{collect_files, collect_text_files, FileKind};
use crate::{rewrite_file, ObfuscateError, PassResult, RunOptions};

/// Subdirectory of the project root whose files are renamed.
pub const IMAGE_DIR: &str = "img";

/// Reserves the leaf name of every file under `root/img` so no generated
/// token, class or image, can take an existing image's name.
pub fn reserve_image_names<R: Rng>(
    root: &Path,
    generator: &mut NameGenerator<R>,
) -> Result<Vec<PathBuf>, ObfuscateError> {
    let image_dir = root.join(IMAGE_DIR);
    if !image_dir.is_dir() {
        return Ok(Vec::new());
    }

    let images = collect_files(&image_dir, |_| true)?;
    for path in &images {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            generator.reserve(name);
        }
    }
    Ok(images)
}

pub fn find_and_replace_image_names<R: Rng>(
    root: &Path,
    mapping: &mut NameMapping,
    generator: &mut NameGenerator<R>,
    options: &RunOptions,
) -> Result<PassResult, ObfuscateError> {
    find_and_replace_image_names_with(
        root,
        mapping,
        generator,
        options,
        &|_: &Path, _: &str, _: &str| {},
        &|_: &Path, _: &Path| {},
    )
}

/// Renames every file under `root/img` to a random name with the same
/// extension, then rewrites references to the old names in CSS, HTML and JS
/// files anywhere under `root`.
///
/// Files sharing a leaf name in different subdirectories get the same new
/// name, so a reference to that name stays valid whichever file it meant.
pub fn find_and_replace_image_names_with<R, F, G>(
    root: &Path,
    mapping: &mut NameMapping,
    generator: &mut NameGenerator<R>,
    options: &RunOptions,
    content_callback: &F,
    path_callback: &G,
) -> Result<PassResult, ObfuscateError>
where
    R: Rng,
    F: Fn(&Path, &str, &str),
    G: Fn(&Path, &Path),
{
    let mut result = PassResult::default();

    let image_dir = root.join(IMAGE_DIR);
    if !image_dir.is_dir() {
        info!("No image directory at {:?}, skipping image renaming", image_dir);
        return Ok(result);
    }

    info!("Renaming images under: {:?}", image_dir);

    let images = reserve_image_names(root, generator)?;

    for path in &images {
        let Some(original) = path.file_name().and_then(|n| n.to_str()) else {
            debug!("Skipping file with non UTF-8 name: {:?}", path);
            continue;
        };
        let extension = path.extension().and_then(|e| e.to_str());
        let new_name = mapping
            .try_get_or_insert_with(original, || generator.file_name(extension))?
            .to_string();
        let new_path = path.with_file_name(&new_name);

        path_callback(path.as_path(), new_path.as_path());
        if options.dry_run {
            info!("Would rename file: {:?} -> {:?}", path, new_path);
        } else {
            info!("Renaming file: {:?} -> {:?}", path, new_path);
            fs::rename(path, &new_path).map_err(|e| ObfuscateError::io(path, e))?;
        }
        result.paths_renamed += 1;
    }

    if mapping.is_empty() {
        return Ok(result);
    }

    let rewriter = FileReferenceRewriter;
    for (path, _) in collect_text_files(root, &[FileKind::Html, FileKind::Css, FileKind::Js])? {
        rewrite_file(&path, &rewriter, mapping, options, content_callback, &mut result)?;
    }

    info!(
        "Image renaming complete: {} paths renamed, {} files processed, {} content changes",
        result.paths_renamed, result.files_processed, result.content_changes
    );

    Ok(result)
}
