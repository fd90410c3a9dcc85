//! Line-oriented frontmatter model.
//!
//! Only three top-level keys are understood: `title` and `description` as
//! quoted scalars and `tags` as a one-line bracket list. Every other line is
//! kept verbatim, so `Frontmatter::parse(x).render() == x` for any input.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| quoted_field_regex("title"));
static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| quoted_field_regex("description"));
static TAGS_RE: LazyLock<Regex> = LazyLock::new(tags_regex);

#[allow(clippy::unwrap_used)]
fn tags_regex() -> Regex {
    Regex::new(r"(?s)^(tags:[ \t]*)(\[[^\n]*?\])(.*)$").unwrap()
}

#[allow(clippy::unwrap_used)]
fn quoted_field_regex(key: &str) -> Regex {
    Regex::new(&format!(
        r#"(?s)^({key}:[ \t]*)(?:'((?:[^']|'')*)'|"((?:[^"\\]|\\.)*)")(.*)$"#
    ))
    .unwrap()
}

/// Quote style of a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Single,
    Double,
}

impl Quote {
    pub const fn as_char(self) -> char {
        match self {
            Self::Single => '\'',
            Self::Double => '"',
        }
    }

    fn unescape(self, raw: &str) -> String {
        match self {
            Self::Single => raw.replace("''", "'"),
            Self::Double => {
                let mut out = String::with_capacity(raw.len());
                let mut chars = raw.chars();
                while let Some(c) = chars.next() {
                    if c != '\\' {
                        out.push(c);
                        continue;
                    }
                    match chars.next() {
                        Some('n') => out.push('\n'),
                        Some('t') => out.push('\t'),
                        Some(other @ ('"' | '\\' | '/')) => out.push(other),
                        Some(other) => {
                            out.push('\\');
                            out.push(other);
                        }
                        None => out.push('\\'),
                    }
                }
                out
            }
        }
    }

    fn escape(self, value: &str) -> String {
        match self {
            Self::Single => value.replace('\'', "''"),
            Self::Double => value.replace('\\', "\\\\").replace('"', "\\\""),
        }
    }
}

/// A `key: 'value'` line. `lead` is everything up to the opening quote and
/// `trail` everything after the closing one, line terminator included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedField {
    lead: String,
    quote: Quote,
    raw: String,
    trail: String,
}

impl QuotedField {
    pub const fn quote(&self) -> Quote {
        self.quote
    }

    /// The value exactly as written between the quotes.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The value with quote escapes resolved.
    pub fn value(&self) -> String {
        self.quote.unescape(&self.raw)
    }

    /// Replaces the value, escaping it for the field's own quote style.
    pub fn set_value(&mut self, value: &str) {
        self.raw = self.quote.escape(value);
    }

    fn render_into(&self, out: &mut String) {
        let q = self.quote.as_char();
        out.push_str(&self.lead);
        out.push(q);
        out.push_str(&self.raw);
        out.push(q);
        out.push_str(&self.trail);
    }
}

/// A `tags: [...]` line; the bracket literal is treated as opaque text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagList {
    lead: String,
    literal: String,
    trail: String,
}

impl TagList {
    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn set_literal(&mut self, literal: &str) {
        self.literal = literal.to_string();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Opaque(String),
    Title(QuotedField),
    Description(QuotedField),
    Tags(TagList),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    entries: Vec<Entry>,
}

impl Frontmatter {
    /// Splits `block` into entries. The first matching line per key is
    /// recognized; repeats, indented keys and unquoted values stay opaque.
    pub fn parse(block: &str) -> Self {
        let mut entries = Vec::new();
        let (mut has_title, mut has_description, mut has_tags) = (false, false, false);

        for line in block.split_inclusive('\n') {
            let entry = if !has_title
                && let Some(field) = parse_quoted(&TITLE_RE, line)
            {
                has_title = true;
                Entry::Title(field)
            } else if !has_description
                && let Some(field) = parse_quoted(&DESCRIPTION_RE, line)
            {
                has_description = true;
                Entry::Description(field)
            } else if !has_tags
                && let Some(tags) = parse_tags(line)
            {
                has_tags = true;
                Entry::Tags(tags)
            } else {
                Entry::Opaque(line.to_string())
            };
            entries.push(entry);
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn title(&self) -> Option<&QuotedField> {
        self.entries.iter().find_map(|e| match e {
            Entry::Title(f) => Some(f),
            _ => None,
        })
    }

    pub fn title_mut(&mut self) -> Option<&mut QuotedField> {
        self.entries.iter_mut().find_map(|e| match e {
            Entry::Title(f) => Some(f),
            _ => None,
        })
    }

    pub fn description(&self) -> Option<&QuotedField> {
        self.entries.iter().find_map(|e| match e {
            Entry::Description(f) => Some(f),
            _ => None,
        })
    }

    pub fn description_mut(&mut self) -> Option<&mut QuotedField> {
        self.entries.iter_mut().find_map(|e| match e {
            Entry::Description(f) => Some(f),
            _ => None,
        })
    }

    pub fn tags(&self) -> Option<&TagList> {
        self.entries.iter().find_map(|e| match e {
            Entry::Tags(t) => Some(t),
            _ => None,
        })
    }

    pub fn tags_mut(&mut self) -> Option<&mut TagList> {
        self.entries.iter_mut().find_map(|e| match e {
            Entry::Tags(t) => Some(t),
            _ => None,
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            match entry {
                Entry::Opaque(line) => out.push_str(line),
                Entry::Title(f) | Entry::Description(f) => f.render_into(&mut out),
                Entry::Tags(t) => {
                    out.push_str(&t.lead);
                    out.push_str(&t.literal);
                    out.push_str(&t.trail);
                }
            }
        }
        out
    }
}

impl fmt::Display for Frontmatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn parse_quoted(re: &Regex, line: &str) -> Option<QuotedField> {
    let caps = re.captures(line)?;
    let (quote, raw) = match (caps.get(2), caps.get(3)) {
        (Some(single), _) => (Quote::Single, single.as_str()),
        (None, Some(double)) => (Quote::Double, double.as_str()),
        (None, None) => return None,
    };
    Some(QuotedField {
        lead: caps[1].to_string(),
        quote,
        raw: raw.to_string(),
        trail: caps[4].to_string(),
    })
}

fn parse_tags(line: &str) -> Option<TagList> {
    let caps = TAGS_RE.captures(line)?;
    Some(TagList {
        lead: caps[1].to_string(),
        literal: caps[2].to_string(),
        trail: caps[3].to_string(),
    })
}
