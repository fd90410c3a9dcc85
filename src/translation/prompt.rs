use std::fmt;

pub const TAGS_INSTRUCTION: &str = "IMPORTANT: The input is a list of tags. Translate the terms but \
     output ONLY the list in the same format, e.g. ['Tag1', 'Tag2']. Do not explain.";

pub const METADATA_INSTRUCTION: &str =
    "Translate this short metadata text accurately. Keep it concise and output only the translation.";

/// Which part of a post a request translates. Selects the prompt suffix and
/// the output cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Title,
    Description,
    Tags,
    Body,
}

impl Role {
    /// Short single-line fields that get the brevity instruction.
    pub const fn is_metadata(self) -> bool {
        matches!(self, Self::Title | Self::Description)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Tags => "Tags",
            Self::Body => "Body",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Role-specific instructions appended to a target's base prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRules {
    pub tags_instruction: String,
    pub metadata_instruction: String,
}

impl Default for PromptRules {
    fn default() -> Self {
        Self {
            tags_instruction: TAGS_INSTRUCTION.to_string(),
            metadata_instruction: METADATA_INSTRUCTION.to_string(),
        }
    }
}

pub fn build_system_prompt(base: &str, role: Role, rules: &PromptRules) -> String {
    let suffix = match role {
        Role::Tags => rules.tags_instruction.as_str(),
        Role::Title | Role::Description => rules.metadata_instruction.as_str(),
        Role::Body => return base.to_string(),
    };
    format!("{base}\n{suffix}")
}

/// Normalizes raw model output before it is used.
///
/// Body text is only trimmed, since code fences there are real content.
/// Frontmatter values lose any code-fence markers the model wrapped them in
/// and are folded onto one line; title and description additionally drop a
/// pair of quotes the model may have echoed back.
pub fn clean_output(role: Role, text: &str) -> String {
    let trimmed = text.trim();
    if role == Role::Body {
        return trimmed.to_string();
    }

    let single_line = trimmed
        .lines()
        .map(|line| strip_fences(line.trim()))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let single_line = single_line.trim();

    if role.is_metadata() {
        strip_matching_quotes(single_line).to_string()
    } else {
        single_line.to_string()
    }
}

/// Removes fence markers. A line holding only an opener and its info string becomes empty.
fn strip_fences(line: &str) -> String {
    if let Some(info) = line.strip_prefix("```")
        && info.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return String::new();
    }
    line.replace("```", "").trim().to_string()
}

fn strip_matching_quotes(text: &str) -> &str {
    for quote in ['\'', '"'] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    text
}
