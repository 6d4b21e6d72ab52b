use crate::config::Config;
use crate::core::analysis::{self, AnalysisResult};
use crate::error::{Error, Result};
use async_openai::{
    self,
    config::OpenAIConfig,
    types::responses::{
        CreateResponse, CreateResponseArgs, EasyInputMessageArgs, InputItem, InputParam,
        OutputItem, OutputMessageContent, ResponseFormatJsonSchema, ResponseTextParam, Role,
        TextResponseFormatConfiguration,
    },
};
use chrono::Utc;

const SYSTEM_PROMPT: &str = "You are a meticulous video content analyst. \
You answer with a single JSON object and nothing else.";

const MAX_OUTPUT_TOKENS: u32 = 16_000;

const SCHEMA_NAME: &str = "transcript_analysis";

/// Turns a transcript into a structured analysis.
#[allow(async_fn_in_trait)]
pub trait Analyzer {
    async fn analyze(&self, transcript_text: &str, video_url: &str) -> Result<AnalysisResult>;
}

#[derive(Clone)]
pub struct AnalysisRequester {
    client: async_openai::Client<OpenAIConfig>,
    model: String,
}

impl AnalysisRequester {
    pub fn new(config: &Config) -> Self {
        let mut openai = OpenAIConfig::new().with_api_key(config.api_key.clone());
        if let Some(base) = &config.api_base {
            openai = openai.with_api_base(base.clone());
        }

        Self {
            client: async_openai::Client::with_config(openai),
            model: config.model.clone(),
        }
    }

    async fn request_text(&self, prompt: String, schema: serde_json::Value) -> Result<String> {
        let request = build_request(&self.model, prompt, schema)?;

        let response = self
            .client
            .responses()
            .create(request)
            .await
            .map_err(Error::analysis)?;

        let mut content = String::new();
        for output in response.output {
            if let OutputItem::Message(out) = output {
                for c in out.content {
                    match c {
                        OutputMessageContent::OutputText(text) => content.push_str(&text.text),
                        other => {
                            tracing::debug!(content = ?other, "skipping non-text output");
                        }
                    }
                }
            }
        }

        Ok(content)
    }
}

impl Analyzer for AnalysisRequester {
    async fn analyze(&self, transcript_text: &str, video_url: &str) -> Result<AnalysisResult> {
        let schema = analysis::response_schema_value()?;
        let schema_text = serde_json::to_string_pretty(&schema).map_err(Error::custom)?;
        let prompt = build_prompt(transcript_text, video_url, &schema_text);

        tracing::info!(model = %self.model, "requesting analysis");
        let raw = self.request_text(prompt, schema).await?;
        tracing::debug!(bytes = raw.len(), "analysis response received");

        let generated = analysis::parse_generated(&raw)?;
        Ok(AnalysisResult::from_generated(
            generated,
            video_url,
            &self.model,
            Utc::now(),
        ))
    }
}

/// Responses API request asking for output that strictly follows `schema`.
pub fn build_request(
    model: &str,
    prompt: String,
    schema: serde_json::Value,
) -> Result<CreateResponse> {
    CreateResponseArgs::default()
        .max_output_tokens(MAX_OUTPUT_TOKENS)
        .model(model)
        .text(ResponseTextParam {
            format: TextResponseFormatConfiguration::JsonSchema(ResponseFormatJsonSchema {
                description: Some("Structured analysis of a video transcript".to_string()),
                name: SCHEMA_NAME.to_string(),
                schema: Some(schema),
                strict: Some(true),
            }),
            verbosity: None,
        })
        .input(InputParam::Items(vec![
            InputItem::EasyMessage(
                EasyInputMessageArgs::default()
                    .role(Role::System)
                    .content(SYSTEM_PROMPT)
                    .build()
                    .map_err(Error::analysis)?,
            ),
            InputItem::EasyMessage(
                EasyInputMessageArgs::default()
                    .role(Role::User)
                    .content(prompt)
                    .build()
                    .map_err(Error::analysis)?,
            ),
        ]))
        .build()
        .map_err(Error::analysis)
}

pub fn build_prompt(transcript_text: &str, video_url: &str, schema: &str) -> String {
    format!(
        "### Task
Analyze the video transcript below and return a concise summary of it.

### Video
URL: {video_url}

### Fields
- video_title: the video's title; infer a descriptive one from the content if it is never stated.
- video_publish_date: the publish date as YYYY-MM-DD; use your best estimate if it is not stated.
- quick_summary: a concise summary of the whole video in a few sentences.
- bullet_point_highlights: the key points, in the order they appear.
- sentiment_analysis: the overall tone and sentiment of the speaker(s).
- keywords: the main keywords and key phrases.
- sections: a chronological breakdown, each with a section_title and a section_summary.

### Output
Respond with one JSON object that validates against this JSON Schema. Do not wrap it in prose.

{schema}

### Transcript
<TRANSCRIPT>
{transcript_text}
</TRANSCRIPT>
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_url_schema_and_transcript() {
        let schema =
            serde_json::to_string_pretty(&analysis::response_schema_value().unwrap()).unwrap();
        let prompt = build_prompt(
            "hello there world",
            "https://www.youtube.com/watch?v=LkDelp5WWYU",
            &schema,
        );
        assert!(prompt.contains("URL: https://www.youtube.com/watch?v=LkDelp5WWYU"));
        assert!(prompt.contains("<TRANSCRIPT>\nhello there world\n</TRANSCRIPT>"));
        assert!(prompt.contains(&schema));
        for field in ["quick_summary", "bullet_point_highlights", "sentiment_analysis", "keywords"] {
            assert!(prompt.contains(field), "{field}");
        }
    }

    #[test]
    fn request_asks_for_strict_schema_output() {
        let schema = analysis::response_schema_value().unwrap();
        let request = build_request("gpt-5-mini", "summarize".to_string(), schema.clone()).unwrap();

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], "gpt-5-mini");
        let format = &body["text"]["format"];
        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["name"], SCHEMA_NAME);
        assert_eq!(format["strict"], true);
        assert_eq!(format["schema"], schema);
    }
}
