use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub mod classes;
pub mod images;
pub mod mapping;
pub mod naming;
pub mod rewrite;
pub mod walk;

pub use classes::{find_and_replace_class_names, find_and_replace_class_names_with};
pub use images::{
    find_and_replace_image_names, find_and_replace_image_names_with, reserve_image_names, IMAGE_DIR,
};
pub use mapping::NameMapping;
pub use naming::{NameGenerator, DEFAULT_CLASS_NAME_LENGTH};
pub use rewrite::TextRewriter;

#[derive(thiserror::Error, Debug)]
pub enum ObfuscateError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Root error: {message}: {path:?}")]
    Root { path: PathBuf, message: String },
    #[error("Invalid options: {message}")]
    Options { message: String },
    #[error("Name space exhausted: no unused {kind} left after {attempts} attempts")]
    NameSpaceExhausted { kind: &'static str, attempts: usize },
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl ObfuscateError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ObfuscateError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn walk(root: &Path, err: walkdir::Error) -> Self {
        let path = err.path().unwrap_or(root).to_path_buf();
        ObfuscateError::Io {
            path,
            source: err.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub dry_run: bool,
    pub class_name_length: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            class_name_length: DEFAULT_CLASS_NAME_LENGTH,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassResult {
    pub files_processed: usize,
    pub paths_renamed: usize,
    pub content_changes: usize,
}

#[derive(Debug, Default)]
pub struct ObfuscationReport {
    pub class_names: NameMapping,
    pub image_names: NameMapping,
    pub classes: PassResult,
    pub images: PassResult,
}

/// Renames every CSS class, then every image under `root/img`, across the project.
pub fn obfuscate_project<R: Rng>(
    root: &Path,
    generator: &mut NameGenerator<R>,
    options: &RunOptions,
) -> Result<ObfuscationReport, ObfuscateError> {
    obfuscate_project_with(
        root,
        generator,
        options,
        |_: &Path, _: &str, _: &str| {},
        |_: &Path, _: &Path| {},
    )
}

/// Like [`obfuscate_project`], reporting each content change and rename to
/// the callbacks before it is applied.
pub fn obfuscate_project_with<R, F, G>(
    root: &Path,
    generator: &mut NameGenerator<R>,
    options: &RunOptions,
    content_callback: F,
    path_callback: G,
) -> Result<ObfuscationReport, ObfuscateError>
where
    R: Rng,
    F: Fn(&Path, &str, &str),
    G: Fn(&Path, &Path),
{
    if !root.is_dir() {
        return Err(ObfuscateError::Root {
            path: root.to_path_buf(),
            message: "project root does not exist or is not a directory".to_string(),
        });
    }

    info!("Starting project obfuscation: {:?}", root);

    // Image names are reserved before any class token is drawn, so a class
    // replacement can never equal an image's name and be rewritten again by
    // the image pass.
    reserve_image_names(root, generator)?;

    let mut report = ObfuscationReport::default();
    report.classes = find_and_replace_class_names_with(
        root,
        &mut report.class_names,
        generator,
        options,
        &content_callback,
    )?;
    report.images = find_and_replace_image_names_with(
        root,
        &mut report.image_names,
        generator,
        options,
        &content_callback,
        &path_callback,
    )?;

    info!(
        "Obfuscation complete: {} class names, {} image names",
        report.class_names.len(),
        report.image_names.len()
    );

    Ok(report)
}

pub(crate) fn rewrite_file<F>(
    path: &Path,
    rewriter: &dyn TextRewriter,
    mapping: &NameMapping,
    options: &RunOptions,
    content_callback: &F,
    result: &mut PassResult,
) -> Result<(), ObfuscateError>
where
    F: Fn(&Path, &str, &str),
{
    debug!("Processing file: {:?}", path);
    result.files_processed += 1;

    let (content, encoding) = walk::read_text(path)?;

    if let Some(new_content) = rewriter.rewrite(&content, mapping) {
        content_callback(path, content.as_str(), new_content.as_str());
        if options.dry_run {
            info!("Would update contents of: {:?}", path);
        } else {
            info!("Updating contents of: {:?}", path);
            walk::write_text(path, &new_content, encoding)?;
        }
        result.content_changes += 1;
    }

    Ok(())
}
