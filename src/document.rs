//! Splitting a post into frontmatter and body, and putting it back together.

use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};

/// Marker line that opens and closes the frontmatter block.
pub const DELIMITER: &str = "---";

/// A source post as read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Text between the two delimiter lines, including the newline after the
    /// opening marker and the one before the closing marker.
    pub frontmatter: Option<String>,
    pub body: Body,
}

/// The body split into its translatable core and the whitespace around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub leading: String,
    pub text: String,
    pub trailing: String,
}

impl Body {
    fn new(raw: &str) -> Self {
        let text = raw.trim();
        if text.is_empty() {
            return Self {
                leading: raw.to_string(),
                text: String::new(),
                trailing: String::new(),
            };
        }
        let start = raw.len() - raw.trim_start().len();
        let end = start + text.len();
        Self {
            leading: raw[..start].to_string(),
            text: text.to_string(),
            trailing: raw[end..].to_string(),
        }
    }

    /// The body with `text` in place of the original core.
    pub fn with_text(&self, text: &str) -> String {
        format!("{}{text}{}", self.leading, self.trailing)
    }
}

impl SourceDocument {
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    /// Frontmatter is recognized only when the very first line is the
    /// delimiter and a later line is the delimiter again. Anything else is
    /// all body.
    pub fn parse(content: &str) -> Self {
        match split_frontmatter(content) {
            Some((frontmatter, body)) => Self {
                frontmatter: Some(frontmatter.to_string()),
                body: Body::new(body),
            },
            None => Self {
                frontmatter: None,
                body: Body::new(content),
            },
        }
    }

    pub const fn has_frontmatter(&self) -> bool {
        self.frontmatter.is_some()
    }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    if !is_delimiter(first) {
        return None;
    }

    let open_end = DELIMITER.len();
    let mut offset = first.len();
    for line in lines {
        if is_delimiter(line) {
            let frontmatter = &content[open_end..offset];
            let body = &content[offset + DELIMITER.len()..];
            return Some((frontmatter, body));
        }
        offset += line.len();
    }
    None
}

/// Reassembles a translated post.
///
/// With frontmatter the result is `---{frontmatter}---{body}`, which restores
/// the original delimiter lines because `frontmatter` carries its own
/// newlines. Without frontmatter only the body is written.
pub fn assemble(frontmatter: Option<&str>, body: &str) -> String {
    match frontmatter {
        Some(fm) => format!("{DELIMITER}{fm}{DELIMITER}{body}"),
        None => body.to_string(),
    }
}

/// Derives the output path of `source` for a target language.
///
/// The directory segment nearest to the file that names the source language
/// (case-insensitive) is replaced by `target_dir`. Without such a segment
/// the output goes into a `target_dir` subdirectory beside the source.
pub fn output_path(source: &Path, source_lang: &str, target_dir: &str) -> PathBuf {
    let components: Vec<Component<'_>> = source.components().collect();
    let dir_count = components.len().saturating_sub(1);

    let segment = components[..dir_count].iter().rposition(|c| {
        matches!(c, Component::Normal(name) if name.to_str().is_some_and(|n| n.eq_ignore_ascii_case(source_lang)))
    });

    if let Some(index) = segment {
        return components
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i == index {
                    Component::Normal(target_dir.as_ref())
                } else {
                    *c
                }
            })
            .collect();
    }

    let parent = source.parent().unwrap_or_else(|| Path::new(""));
    let file_name = source.file_name().unwrap_or_default();
    parent.join(target_dir).join(file_name)
}
