use anyhow::Result;
use inquire::Confirm;
use similar::{ChangeTag, TextDiff};
use std::fmt::Write;
use std::path::Path;

/// Colored line diff of `old_content` against `new_content`, or `None` when they match.
pub fn render_diff(old_content: &str, new_content: &str) -> Result<Option<String>> {
    let diff = TextDiff::from_lines(old_content, new_content);
    let mut output = String::new();
    let mut has_changes = false;

    for (i, group) in diff.grouped_ops(3).iter().enumerate() {
        if i > 0 {
            writeln!(output, "{:-^1$}", "", 40)?;
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let (sign, style) = match change.tag() {
                    ChangeTag::Delete => ("- ", "\x1b[31m"), // Red
                    ChangeTag::Insert => ("+ ", "\x1b[32m"), // Green
                    ChangeTag::Equal => ("  ", "\x1b[0m"),
                };
                write!(output, "{}{}{}\x1b[0m", style, sign, change.value())?;
                if change.missing_newline() {
                    writeln!(output)?;
                }
                if change.tag() != ChangeTag::Equal {
                    has_changes = true;
                }
            }
        }
    }

    Ok(has_changes.then_some(output))
}

pub fn show_content_diff(file_path: &Path, old_content: &str, new_content: &str) {
    println!("\n📝 Content change: {}", file_path.display());
    match render_diff(old_content, new_content) {
        Ok(Some(output)) => print!("{}", output),
        Ok(None) => println!("No changes detected."),
        Err(e) => println!("Unable to render diff: {}", e),
    }
}

pub fn show_rename(old_path: &Path, new_path: &Path) {
    println!("\n📁 File rename:");
    println!("  \x1b[31m- {}\x1b[0m", old_path.display());
    println!("  \x1b[32m+ {}\x1b[0m", new_path.display());
}

pub fn confirm_run(target_dir: &Path) -> Result<bool> {
    println!(
        "Every CSS class and every file under img/ in {} will be renamed.",
        target_dir.display()
    );
    println!("Move third-party libraries (Bootstrap, jQuery, ...) out of the project first.");

    let proceed = Confirm::new("Proceed with renaming?")
        .with_default(false)
        .prompt()?;

    Ok(proceed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_detection() {
        let old_content = ".btn { color: red }\n.card { }\n";
        let new_content = ".Xy12ab34 { color: red }\n.card { }\n";

        let output = render_diff(old_content, new_content).unwrap().unwrap();

        assert!(output.contains("- .btn { color: red }"));
        assert!(output.contains("+ .Xy12ab34 { color: red }"));
    }

    #[test]
    fn test_no_diff_detection() {
        let content = "<div class=\"btn\">\n";
        assert!(render_diff(content, content).unwrap().is_none());
    }
}
