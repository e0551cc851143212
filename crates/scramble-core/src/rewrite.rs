//! Per-language text rewriters.
//!
//! Each rewriter only touches the region of a file where a name can
//! legitimately appear: CSS selector preludes, HTML `class` attribute values,
//! JS string literals, or whole filename tokens for image references.

use regex::{Captures, Regex};
use std::ops::Range;
use tracing::debug;

use crate::mapping::NameMapping;
use crate::walk::FileKind;

/// Rewrites occurrences of mapped names inside a file's content.
///
/// Returns `None` when the content is left unchanged.
pub trait TextRewriter {
    fn rewrite(&self, content: &str, mapping: &NameMapping) -> Option<String>;
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_filename_char(c: char) -> bool {
    is_ident_char(c) || c == '.'
}

/// Byte ranges of CSS selector preludes, skipping comments and at-rule preludes.
///
/// The range closing a prelude includes its `{`, so selector patterns that
/// look for the opening brace still see it.
pub fn selector_preludes(css: &str) -> Vec<Range<usize>> {
    let bytes = css.as_bytes();
    let mut preludes = Vec::new();
    let mut pending: Vec<Range<usize>> = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                if start < i {
                    pending.push(start..i);
                }
                i = match css[i + 2..].find("*/") {
                    Some(end) => i + 2 + end + 2,
                    None => bytes.len(),
                };
                start = i;
                continue;
            }
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'{' => {
                pending.push(start..i + 1);
                let at_rule = pending
                    .iter()
                    .map(|r| css[r.clone()].trim_start())
                    .find(|s| !s.is_empty())
                    .is_some_and(|s| s.starts_with('@'));
                if at_rule {
                    pending.clear();
                } else {
                    preludes.append(&mut pending);
                }
                start = i + 1;
            }
            b'}' | b';' => {
                pending.clear();
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    preludes
}

/// Harvests class names from CSS selectors, in order of appearance.
pub struct CssClassScanner {
    selector_pattern: Regex,
}

impl CssClassScanner {
    pub fn new() -> Result<Self, regex::Error> {
        let selector_pattern = Regex::new(r"\.([a-zA-Z0-9_-]+)\s*[{,]")?;
        Ok(Self { selector_pattern })
    }

    pub fn class_names(&self, css: &str) -> Vec<String> {
        selector_preludes(css)
            .into_iter()
            .flat_map(|range| {
                self.selector_pattern
                    .captures_iter(&css[range])
                    .map(|caps| caps[1].to_string())
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

pub struct CssClassRewriter {
    class_token: Regex,
}

impl CssClassRewriter {
    pub fn new() -> Result<Self, regex::Error> {
        let class_token = Regex::new(r"\.([a-zA-Z0-9_-]+)")?;
        Ok(Self { class_token })
    }
}

impl TextRewriter for CssClassRewriter {
    fn rewrite(&self, content: &str, mapping: &NameMapping) -> Option<String> {
        let mut output = String::with_capacity(content.len());
        let mut last = 0;
        let mut replaced = 0;

        for range in selector_preludes(content) {
            output.push_str(&content[last..range.start]);
            let prelude = &content[range.clone()];
            let rewritten = self.class_token.replace_all(prelude, |caps: &Captures| {
                match mapping.get(&caps[1]) {
                    Some(replacement) => {
                        replaced += 1;
                        format!(".{}", replacement)
                    }
                    None => caps[0].to_string(),
                }
            });
            output.push_str(&rewritten);
            last = range.end;
        }
        output.push_str(&content[last..]);

        if replaced > 0 {
            debug!("CSS rewrite: replaced {} selector occurrences", replaced);
            Some(output)
        } else {
            None
        }
    }
}

pub struct HtmlClassRewriter {
    class_attribute: Regex,
    word: Regex,
}

impl HtmlClassRewriter {
    pub fn new() -> Result<Self, regex::Error> {
        let class_attribute = Regex::new(r#"(?i)(?:^|\s)class\s*=\s*(?:"([^"]*)"|'([^']*)')"#)?;
        let word = Regex::new(r"\S+")?;
        Ok(Self {
            class_attribute,
            word,
        })
    }
}

impl TextRewriter for HtmlClassRewriter {
    fn rewrite(&self, content: &str, mapping: &NameMapping) -> Option<String> {
        let mut output = String::with_capacity(content.len());
        let mut last = 0;
        let mut replaced = 0;

        for caps in self.class_attribute.captures_iter(content) {
            let Some(value) = caps.get(1).or_else(|| caps.get(2)) else {
                continue;
            };
            output.push_str(&content[last..value.start()]);
            let rewritten = self.word.replace_all(value.as_str(), |word: &Captures| {
                match mapping.get(&word[0]) {
                    Some(replacement) => {
                        replaced += 1;
                        replacement.to_string()
                    }
                    None => word[0].to_string(),
                }
            });
            output.push_str(&rewritten);
            last = value.end();
        }
        output.push_str(&content[last..]);

        if replaced > 0 {
            debug!("HTML rewrite: replaced {} class attribute words", replaced);
            Some(output)
        } else {
            None
        }
    }
}

/// Rewrites class names that appear as exact quoted string literals.
pub struct JsClassRewriter;

impl TextRewriter for JsClassRewriter {
    fn rewrite(&self, content: &str, mapping: &NameMapping) -> Option<String> {
        let mut output = content.to_string();
        let mut found = false;

        for (original, replacement) in mapping.iter() {
            for quote in ['\'', '"'] {
                let literal = format!("{quote}{original}{quote}");
                if output.contains(&literal) {
                    output = output.replace(&literal, &format!("{quote}{replacement}{quote}"));
                    found = true;
                    debug!("JS rewrite: {} -> {}", literal, replacement);
                }
            }
        }

        found.then_some(output)
    }
}

/// Rewrites filenames standing as whole tokens, so `logo.png` never matches
/// inside `mylogo.png` or `logo.png-old`.
pub struct FileReferenceRewriter;

impl FileReferenceRewriter {
    fn replace_bounded(content: &str, needle: &str, replacement: &str) -> Option<String> {
        let mut output = String::with_capacity(content.len());
        let mut last = 0;
        let mut count = 0;

        for (start, _) in content.match_indices(needle) {
            let end = start + needle.len();
            let before = content[..start].chars().next_back();
            let mut rest = content[end..].chars();
            let after = rest.next();
            // A dot followed by a name char extends the filename (`logo.png.bak`),
            // a lone trailing dot ends a sentence.
            let continues = match after {
                Some('.') => rest.next().is_some_and(is_ident_char),
                Some(c) => is_ident_char(c),
                None => false,
            };
            if before.is_some_and(is_filename_char) || continues {
                continue;
            }
            output.push_str(&content[last..start]);
            output.push_str(replacement);
            last = end;
            count += 1;
        }

        if count == 0 {
            return None;
        }
        output.push_str(&content[last..]);
        debug!("Reference rewrite: {} -> {} ({} occurrences)", needle, replacement, count);
        Some(output)
    }
}

impl TextRewriter for FileReferenceRewriter {
    fn rewrite(&self, content: &str, mapping: &NameMapping) -> Option<String> {
        let mut current: Option<String> = None;
        for (original, replacement) in mapping.iter() {
            let source = current.as_deref().unwrap_or(content);
            if let Some(updated) = Self::replace_bounded(source, original, replacement) {
                current = Some(updated);
            }
        }
        current
    }
}

/// The class-name rewriter for each text file kind.
pub struct ClassRewriters {
    css: CssClassRewriter,
    html: HtmlClassRewriter,
    js: JsClassRewriter,
}

impl ClassRewriters {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            css: CssClassRewriter::new()?,
            html: HtmlClassRewriter::new()?,
            js: JsClassRewriter,
        })
    }

    pub fn for_kind(&self, kind: FileKind) -> &dyn TextRewriter {
        match kind {
            FileKind::Css => &self.css,
            FileKind::Html => &self.html,
            FileKind::Js => &self.js,
        }
    }
}
