use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use schemars::r#gen::SchemaSettings;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Section {
    /// Short heading for this part of the video
    pub section_title: String,
    /// What this part of the video covers
    pub section_summary: String,
}

/// The shape the model is asked to return.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GeneratedAnalysis {
    /// Title of the video, inferred from the transcript if not stated
    pub video_title: String,
    /// Publish date as RFC 3339 or YYYY-MM-DD
    #[serde(deserialize_with = "deserialize_date")]
    #[schemars(with = "String")]
    pub video_publish_date: DateTime<Utc>,
    /// Concise summary of the whole video
    pub quick_summary: String,
    /// Key points in the order they appear
    pub bullet_point_highlights: Vec<String>,
    /// Overall tone and sentiment of the speaker(s)
    pub sentiment_analysis: String,
    /// Keywords and key phrases
    pub keywords: Vec<String>,
    /// Chronological breakdown of the video
    pub sections: Vec<Section>,
}

/// Final result of one run, consumed by the formatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub video_title: String,
    pub video_url: String,
    pub video_publish_date: DateTime<Utc>,
    pub create_date: DateTime<Utc>,
    pub summarize_by: String,
    pub quick_summary: String,
    pub bullet_point_highlights: Vec<String>,
    pub sentiment_analysis: String,
    pub keywords: Vec<String>,
    pub sections: Vec<Section>,
}

impl AnalysisResult {
    pub fn from_generated(
        generated: GeneratedAnalysis,
        video_url: &str,
        model: &str,
        create_date: DateTime<Utc>,
    ) -> Self {
        Self {
            video_title: generated.video_title,
            video_url: video_url.to_string(),
            video_publish_date: generated.video_publish_date,
            create_date,
            summarize_by: model.to_string(),
            quick_summary: generated.quick_summary,
            bullet_point_highlights: generated.bullet_point_highlights,
            sentiment_analysis: generated.sentiment_analysis,
            keywords: generated.keywords,
            sections: generated.sections,
        }
    }
}

/// JSON Schema of [`GeneratedAnalysis`] with nested types inlined, as the
/// structured-output request format expects. Also embedded in the prompt.
pub fn response_schema_value() -> Result<serde_json::Value> {
    let schema = SchemaSettings::draft2019_09()
        .with(|settings| {
            settings.inline_subschemas = true;
            settings.meta_schema = None;
        })
        .into_generator()
        .into_root_schema_for::<GeneratedAnalysis>();
    serde_json::to_value(&schema).map_err(Error::custom)
}

/// Parses and validates raw model output against [`GeneratedAnalysis`].
pub fn parse_generated(raw: &str) -> Result<GeneratedAnalysis> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Err(Error::analysis("model returned an empty response"));
    }

    let generated: GeneratedAnalysis = serde_json::from_str(body)
        .map_err(|e| Error::analysis(format!("response does not match the schema: {e}")))?;

    if generated.quick_summary.trim().is_empty() {
        return Err(Error::analysis("response has an empty quick_summary"));
    }
    if let Some(pos) = generated
        .sections
        .iter()
        .position(|s| s.section_title.trim().is_empty())
    {
        return Err(Error::analysis(format!("section {} has no title", pos + 1)));
    }

    Ok(generated)
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub const VALID_RESPONSE: &str = r#"{
        "video_title": "Rust in Production",
        "video_publish_date": "2024-03-15",
        "quick_summary": "A talk about shipping Rust services.",
        "bullet_point_highlights": ["Ownership prevents data races", "Tooling is mature"],
        "sentiment_analysis": "Positive and enthusiastic",
        "keywords": ["rust", "production"],
        "sections": [
            {"section_title": "Intro", "section_summary": "Speaker introduces the topic."}
        ]
    }"#;

    pub fn sample_result() -> AnalysisResult {
        AnalysisResult {
            video_title: "Rust in Production".to_string(),
            video_url: "https://www.youtube.com/watch?v=LkDelp5WWYU".to_string(),
            video_publish_date: Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap(),
            create_date: Utc.with_ymd_and_hms(2026, 10, 18, 12, 30, 0).unwrap(),
            summarize_by: "gpt-5-mini".to_string(),
            quick_summary: "A talk about shipping Rust services.".to_string(),
            bullet_point_highlights: vec![
                "Ownership prevents data races".to_string(),
                "Tooling is mature".to_string(),
            ],
            sentiment_analysis: "Positive and enthusiastic".to_string(),
            keywords: vec!["rust".to_string(), "production".to_string()],
            sections: vec![
                Section {
                    section_title: "Intro".to_string(),
                    section_summary: "Speaker introduces the topic.".to_string(),
                },
                Section {
                    section_title: "Deployment".to_string(),
                    section_summary: "How the services are rolled out.".to_string(),
                },
            ],
        }
    }

    #[test]
    fn parses_valid_response() {
        let generated = parse_generated(VALID_RESPONSE).unwrap();
        assert_eq!(generated.video_title, "Rust in Production");
        assert_eq!(
            generated.video_publish_date,
            Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap()
        );
        assert_eq!(generated.bullet_point_highlights.len(), 2);
        assert_eq!(generated.sections[0].section_title, "Intro");
    }

    #[test]
    fn parses_fenced_response() {
        let fenced = format!("```json\n{VALID_RESPONSE}\n```");
        assert!(parse_generated(&fenced).is_ok());
    }

    #[test]
    fn accepts_rfc3339_dates() {
        let raw = VALID_RESPONSE.replace("2024-03-15", "2024-03-15T08:00:00+02:00");
        let generated = parse_generated(&raw).unwrap();
        assert_eq!(
            generated.video_publish_date,
            Utc.with_ymd_and_hms(2024, 3, 15, 6, 0, 0).unwrap()
        );
    }

    #[test]
    fn rejects_malformed_content() {
        let cases = [
            String::new(),
            "Sorry, I cannot help with that.".to_string(),
            "{\"video_title\": \"x\"}".to_string(),
            VALID_RESPONSE.replace("2024-03-15", "last spring"),
            VALID_RESPONSE.replace("\"keywords\"", "\"tags\""),
            VALID_RESPONSE.replace("A talk about shipping Rust services.", "  "),
            VALID_RESPONSE.replace("\"Intro\"", "\"\""),
        ];
        for raw in &cases {
            let err = parse_generated(raw).unwrap_err();
            assert!(matches!(err, Error::AnalysisRequestFailed(_)), "{raw}");
        }
    }

    #[test]
    fn empty_sequences_are_allowed() {
        let raw = r#"{
            "video_title": "Silent film",
            "video_publish_date": "2020-01-01",
            "quick_summary": "Nothing is said.",
            "bullet_point_highlights": [],
            "sentiment_analysis": "Neutral",
            "keywords": [],
            "sections": []
        }"#;
        let generated = parse_generated(raw).unwrap();
        assert!(generated.keywords.is_empty());
        assert!(generated.sections.is_empty());
    }

    #[test]
    fn stamps_client_side_fields() {
        let generated = parse_generated(VALID_RESPONSE).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        let result = AnalysisResult::from_generated(
            generated,
            "https://youtu.be/LkDelp5WWYU",
            "gpt-5-mini",
            now,
        );
        assert_eq!(result.video_url, "https://youtu.be/LkDelp5WWYU");
        assert_eq!(result.summarize_by, "gpt-5-mini");
        assert_eq!(result.create_date, now);
    }

    #[test]
    fn schema_names_every_field() {
        let schema = response_schema_value().unwrap().to_string();
        for field in [
            "video_title",
            "video_publish_date",
            "quick_summary",
            "bullet_point_highlights",
            "sentiment_analysis",
            "keywords",
            "sections",
            "section_title",
            "section_summary",
        ] {
            assert!(schema.contains(field), "{field}");
        }
    }

    #[test]
    fn schema_value_is_strict_ready() {
        let schema = response_schema_value().unwrap();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], false);
        assert!(schema.get("$schema").is_none());
        assert!(schema.get("definitions").is_none());

        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 7);
        let section = &schema["properties"]["sections"]["items"];
        assert_eq!(section["additionalProperties"], false);
        assert_eq!(section["required"].as_array().unwrap().len(), 2);
    }
}
