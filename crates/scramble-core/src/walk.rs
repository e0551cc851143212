use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::ObfuscateError;

/// Text file flavours the renamers know how to rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Css,
    Html,
    Js,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("css") {
            Some(FileKind::Css)
        } else if ext.eq_ignore_ascii_case("html") {
            Some(FileKind::Html)
        } else if ext.eq_ignore_ascii_case("js") {
            Some(FileKind::Js)
        } else {
            None
        }
    }
}

/// Recursively lists regular files under `root` that satisfy `keep`, sorted by name.
pub fn collect_files<F>(root: &Path, keep: F) -> Result<Vec<PathBuf>, ObfuscateError>
where
    F: Fn(&Path) -> bool,
{
    debug!("Collecting files from directory: {:?}", root);

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| ObfuscateError::walk(root, e))?;
        if entry.file_type().is_file() && keep(entry.path()) {
            files.push(entry.into_path());
        }
    }

    debug!("Collected {} files", files.len());
    Ok(files)
}

/// Every file under `root` whose kind is one of `kinds`.
pub fn collect_text_files(
    root: &Path,
    kinds: &[FileKind],
) -> Result<Vec<(PathBuf, FileKind)>, ObfuscateError> {
    let files = collect_files(root, |path| {
        FileKind::from_path(path).is_some_and(|kind| kinds.contains(&kind))
    })?;
    Ok(files
        .into_iter()
        .filter_map(|path| FileKind::from_path(&path).map(|kind| (path, kind)))
        .collect())
}

/// How a file's bytes were turned into the text handed to the rewriters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// Not valid UTF-8. Each byte became the char with the same value, so
    /// ASCII names still match and every other byte survives a rewrite.
    Bytes,
}

/// Reads a file as text. Files that are not valid UTF-8 are read byte for
/// byte rather than skipped.
pub fn read_text(path: &Path) -> Result<(String, TextEncoding), ObfuscateError> {
    let bytes = fs::read(path).map_err(|e| ObfuscateError::io(path, e))?;
    match String::from_utf8(bytes) {
        Ok(content) => Ok((content, TextEncoding::Utf8)),
        Err(e) => {
            warn!("{:?} is not valid UTF-8, rewriting its ASCII names byte for byte", path);
            let content = e.into_bytes().into_iter().map(char::from).collect();
            Ok((content, TextEncoding::Bytes))
        }
    }
}

/// Writes `content` back in the encoding it was read with.
pub fn write_text(path: &Path, content: &str, encoding: TextEncoding) -> Result<(), ObfuscateError> {
    let bytes = match encoding {
        TextEncoding::Utf8 => content.as_bytes().to_vec(),
        TextEncoding::Bytes => {
            let mut bytes = Vec::with_capacity(content.len());
            for c in content.chars() {
                match u8::try_from(c) {
                    Ok(b) => bytes.push(b),
                    // Only inserted names can hold wider chars; keep them as UTF-8.
                    Err(_) => bytes.extend_from_slice(c.encode_utf8(&mut [0; 4]).as_bytes()),
                }
            }
            bytes
        }
    };
    fs::write(path, bytes).map_err(|e| ObfuscateError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_case_insensitive() {
        assert_eq!(FileKind::from_path(Path::new("a/STYLE.CSS")), Some(FileKind::Css));
        assert_eq!(FileKind::from_path(Path::new("index.Html")), Some(FileKind::Html));
        assert_eq!(FileKind::from_path(Path::new("app.js")), Some(FileKind::Js));
        assert_eq!(FileKind::from_path(Path::new("app.jsx")), None);
        assert_eq!(FileKind::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_collect_text_files_filters_and_recurses() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        fs::write(root.join("b.css"), "").unwrap();
        fs::write(root.join("a.html"), "").unwrap();
        fs::write(root.join("nested/deeper/c.JS"), "").unwrap();
        fs::write(root.join("nested/readme.md"), "").unwrap();

        let css_only = collect_text_files(root, &[FileKind::Css]).unwrap();
        assert_eq!(css_only, vec![(root.join("b.css"), FileKind::Css)]);

        let markup = collect_text_files(root, &[FileKind::Html, FileKind::Js]).unwrap();
        let names: Vec<_> = markup.iter().map(|(p, _)| p.strip_prefix(root).unwrap().to_path_buf()).collect();
        assert_eq!(
            names,
            vec![PathBuf::from("a.html"), PathBuf::from("nested/deeper/c.JS")]
        );
    }

    #[test]
    fn test_non_utf8_text_keeps_its_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.html");
        let original = b"<p class=\"btn\">caf\xe9 \xff</p>".to_vec();
        fs::write(&path, &original).unwrap();

        let (content, encoding) = read_text(&path).unwrap();
        assert_eq!(encoding, TextEncoding::Bytes);
        assert!(content.contains("class=\"btn\""));

        write_text(&path, &content.replace("btn", "Xy12ab34"), encoding).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"<p class=\"Xy12ab34\">caf\xe9 \xff</p>".to_vec());
    }
}
