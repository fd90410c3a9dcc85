use thiserror::Error;

use super::parser::Frontmatter;
use crate::config::TargetLanguage;
use crate::metrics::MetricsSink;
use crate::translation::{InferenceClient, Role, Translator};

/// Why a single frontmatter field kept its original value.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("{role} translation failed: {source:#}")]
    Inference {
        role: Role,
        #[source]
        source: anyhow::Error,
    },

    #[error("tags translation lost its list syntax, keeping original tags (got {output:?})")]
    MalformedTags { output: String },
}

/// A translated frontmatter block plus the fields that could not be translated.
#[derive(Debug)]
pub struct Transcoded {
    pub frontmatter: String,
    pub failures: Vec<FieldError>,
}

/// Translates `title`, `description` and `tags` in `block` for `target`.
///
/// Each field is attempted independently; a failed or malformed field keeps
/// its original text and is reported in `failures`. Everything else in the
/// block is returned byte for byte.
pub async fn transcode<C: InferenceClient, S: MetricsSink>(
    translator: &mut Translator<C, S>,
    block: &str,
    target: &TargetLanguage,
) -> Transcoded {
    let mut frontmatter = Frontmatter::parse(block);
    let mut failures = Vec::new();

    if let Some(field) = frontmatter.title_mut() {
        let original = field.value();
        if !original.trim().is_empty() {
            match translator.translate(target, Role::Title, &original).await {
                Ok(translated) => field.set_value(&translated),
                Err(source) => failures.push(FieldError::Inference {
                    role: Role::Title,
                    source,
                }),
            }
        }
    }

    if let Some(field) = frontmatter.description_mut() {
        let original = field.value();
        if !original.trim().is_empty() {
            match translator.translate(target, Role::Description, &original).await {
                Ok(translated) => field.set_value(&translated),
                Err(source) => failures.push(FieldError::Inference {
                    role: Role::Description,
                    source,
                }),
            }
        }
    }

    if let Some(tags) = frontmatter.tags_mut() {
        let original = tags.literal().to_string();
        match translator.translate(target, Role::Tags, &original).await {
            Ok(output) => match accept_tags(&output) {
                Some(literal) => tags.set_literal(&literal),
                None => failures.push(FieldError::MalformedTags { output }),
            },
            Err(source) => failures.push(FieldError::Inference {
                role: Role::Tags,
                source,
            }),
        }
    }

    Transcoded {
        frontmatter: frontmatter.render(),
        failures,
    }
}

/// Extracts the bracket list from a tags translation.
///
/// Returns the span from the first `[` to the last `]`, folded onto one line,
/// or `None` when either bracket is missing or they are out of order.
pub fn accept_tags(output: &str) -> Option<String> {
    let start = output.find('[')?;
    let end = output.rfind(']')?;
    if end < start {
        return None;
    }
    let literal = output[start..=end]
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Some(literal)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::default_targets;
    use crate::testing::{MemorySink, ScriptedClient};
    use crate::translation::PromptRules;

    fn translator(client: ScriptedClient) -> Translator<ScriptedClient, MemorySink> {
        Translator::new(client, MemorySink::default(), "ko", PromptRules::default())
    }

    #[test]
    fn test_accept_tags() {
        assert_eq!(accept_tags("['AI', 'Blog']").unwrap(), "['AI', 'Blog']");
        assert_eq!(
            accept_tags("Here you go: ['AI', 'Blog'] Hope it helps").unwrap(),
            "['AI', 'Blog']"
        );
        assert_eq!(accept_tags("[\n  'AI',\n  'Blog'\n]").unwrap(), "[ 'AI', 'Blog' ]");
        assert!(accept_tags("'AI', 'Blog'").is_none());
        assert!(accept_tags("['AI', 'Blog'").is_none());
        assert!(accept_tags("'AI', 'Blog']").is_none());
        assert!(accept_tags("] reversed [").is_none());
    }

    #[tokio::test]
    async fn test_title_and_tags_scenario() {
        let block = "\ntitle: 'Hello World'\ntags: ['AI', 'Blog']\n";
        let client = ScriptedClient::new(["'Hi World'", "['AI', 'Blog']"]);
        let mut translator = translator(client);

        let out = transcode(&mut translator, block, &default_targets()[0]).await;

        assert!(out.failures.is_empty());
        assert_eq!(out.frontmatter, "\ntitle: 'Hi World'\ntags: ['AI', 'Blog']\n");
        assert!(!out.frontmatter.contains("description"));
    }

    #[tokio::test]
    async fn test_only_title_value_changes() {
        let block = "\nlayout: post\ntitle: '제목'\ndate: 2025-01-02\n# 제목\n";
        let mut translator = translator(ScriptedClient::new(["Title"]));

        let out = transcode(&mut translator, block, &default_targets()[0]).await;

        assert_eq!(out.frontmatter, "\nlayout: post\ntitle: 'Title'\ndate: 2025-01-02\n# 제목\n");
        assert_eq!(translator.sink().rows.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_tags_keep_original() {
        let block = "\ntags: ['인공지능', '블로그']\n";
        let mut translator = translator(ScriptedClient::new(["AI, Blog"]));

        let out = transcode(&mut translator, block, &default_targets()[0]).await;

        assert_eq!(out.frontmatter, block);
        assert_eq!(out.failures.len(), 1);
        assert!(matches!(
            &out.failures[0],
            FieldError::MalformedTags { output } if output == "AI, Blog"
        ));
    }

    #[tokio::test]
    async fn test_field_failure_does_not_block_others() {
        let block = "\ntitle: '제목'\ndescription: \"설명\"\ntags: ['태그']\n";
        let client = ScriptedClient::from_results([
            Err("backend down".to_string()),
            Ok("Description".to_string()),
            Ok("['Tag']".to_string()),
        ]);
        let mut translator = translator(client);

        let out = transcode(&mut translator, block, &default_targets()[0]).await;

        assert_eq!(
            out.frontmatter,
            "\ntitle: '제목'\ndescription: \"Description\"\ntags: ['Tag']\n"
        );
        assert_eq!(out.failures.len(), 1);
        assert!(out.failures[0].to_string().contains("Title translation failed"));
    }

    #[tokio::test]
    async fn test_translated_value_sent_unescaped_and_written_escaped() {
        let block = "title: 'It''s 제목'\n";
        let mut translator = translator(ScriptedClient::new(["It's a title"]));

        let out = transcode(&mut translator, block, &default_targets()[0]).await;

        assert_eq!(out.frontmatter, "title: 'It''s a title'\n");
        assert_eq!(translator.sink().rows[0].input_text, "It's 제목");
    }

    #[tokio::test]
    async fn test_empty_block_and_empty_values_make_no_calls() {
        let mut translator = translator(ScriptedClient::new(Vec::<String>::new()));

        let out = transcode(&mut translator, "", &default_targets()[0]).await;
        assert_eq!(out.frontmatter, "");

        let out = transcode(&mut translator, "\ntitle: ''\ndraft: true\n", &default_targets()[0]).await;
        assert_eq!(out.frontmatter, "\ntitle: ''\ndraft: true\n");
        assert!(out.failures.is_empty());
        assert!(translator.sink().rows.is_empty());
    }
}
