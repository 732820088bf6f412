//! Affirmation export helpers

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::Affirmation;

/// Export output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// Serializable affirmation representation used in JSON and Markdown exports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportAffirmation {
    pub id: String,
    pub text: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&Affirmation> for ExportAffirmation {
    fn from(affirmation: &Affirmation) -> Self {
        Self {
            id: affirmation.id.to_string(),
            text: affirmation.text.clone(),
            is_active: affirmation.is_active,
            created_at: affirmation.created_at,
            updated_at: affirmation.updated_at,
        }
    }
}

/// Render affirmations as pretty-printed JSON
pub fn render_json_export(affirmations: &[Affirmation]) -> serde_json::Result<String> {
    let items = affirmations
        .iter()
        .map(ExportAffirmation::from)
        .collect::<Vec<_>>();
    serde_json::to_string_pretty(&items)
}

/// Render affirmations in Markdown with frontmatter blocks
#[must_use]
pub fn render_markdown_export(affirmations: &[Affirmation]) -> String {
    let mut output = String::new();

    for (index, affirmation) in affirmations.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }

        let _ = writeln!(output, "---");
        let _ = writeln!(output, "id: {}", affirmation.id);
        let _ = writeln!(output, "active: {}", affirmation.is_active);
        let _ = writeln!(output, "created_at: {}", affirmation.created_at);
        let _ = writeln!(output, "updated_at: {}", affirmation.updated_at);
        let _ = writeln!(output, "---");
        let _ = writeln!(output);
        let _ = writeln!(output, "{}", affirmation.text);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(text: &str, is_active: bool) -> Affirmation {
        Affirmation {
            id: "11111111-1111-7111-8111-111111111111".parse().unwrap(),
            text: text.to_string(),
            is_active,
            created_at: 1_000,
            updated_at: 2_000,
        }
    }

    #[test]
    fn json_export_includes_fields() {
        let rendered = render_json_export(&[sample("I am whole", true)]).unwrap();
        let parsed: Vec<ExportAffirmation> = serde_json::from_str(&rendered).unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].id, "11111111-1111-7111-8111-111111111111");
        assert_eq!(parsed[0].text, "I am whole");
        assert!(parsed[0].is_active);
        assert_eq!(parsed[0].updated_at, 2_000);
    }

    #[test]
    fn json_export_of_nothing_is_empty_array() {
        assert_eq!(render_json_export(&[]).unwrap(), "[]");
    }

    #[test]
    fn markdown_export_has_frontmatter_per_affirmation() {
        let rendered =
            render_markdown_export(&[sample("First", true), sample("Second", false)]);

        assert_eq!(rendered.matches("---\n").count(), 4);
        assert!(rendered.contains("active: false"));
        assert!(rendered.contains("\nFirst\n"));
        assert!(rendered.ends_with("Second\n"));
    }

    #[test]
    fn export_format_extensions() {
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::Markdown.extension(), "md");
    }
}
