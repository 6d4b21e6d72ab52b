use crate::core::analysis::AnalysisResult;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Markdown,
    Json,
}

impl OutputFormat {
    /// Unknown selectors fall back to markdown.
    pub fn from_selector(selector: &str) -> Self {
        match selector.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "md" | "markdown" => Self::Markdown,
            other => {
                tracing::warn!(format = other, "unknown output format, using markdown");
                Self::Markdown
            }
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }

    pub fn render(self, analysis: &AnalysisResult) -> Result<String> {
        match self {
            Self::Markdown => Ok(format_as_markdown(analysis)),
            Self::Json => format_as_json(analysis),
        }
    }
}

pub fn format_as_markdown(analysis: &AnalysisResult) -> String {
    let mut output = String::new();

    output.push_str("# Transcript Analysis\n\n");

    output.push_str(&format!("- **Title:** {}\n", analysis.video_title));
    output.push_str(&format!("- **URL:** {}\n", analysis.video_url));
    output.push_str(&format!(
        "- **Published:** {}\n",
        analysis.video_publish_date.format("%Y-%m-%d")
    ));
    output.push_str(&format!(
        "- **Analyzed:** {}\n",
        analysis.create_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!("- **Model:** {}\n\n", analysis.summarize_by));

    output.push_str("## Quick Summary\n\n");
    output.push_str(analysis.quick_summary.trim());
    output.push_str("\n\n");

    output.push_str("## Bullet Point Highlights\n\n");
    for highlight in &analysis.bullet_point_highlights {
        output.push_str(&format!("* {}\n", highlight.trim()));
    }
    output.push('\n');

    output.push_str("## Sentiment Analysis\n\n");
    output.push_str(analysis.sentiment_analysis.trim());
    output.push_str("\n\n");

    output.push_str("## Keywords\n\n");
    for keyword in &analysis.keywords {
        output.push_str(&format!("* {}\n", keyword.trim()));
    }
    output.push('\n');

    output.push_str("## Sections\n");
    for section in &analysis.sections {
        output.push_str(&format!("\n### {}\n\n", section.section_title.trim()));
        output.push_str(section.section_summary.trim());
        output.push('\n');
    }

    output
}

pub fn format_as_json(analysis: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(analysis)
        .map_err(|e| Error::custom(format!("Failed to serialize analysis: {e}")))
}
