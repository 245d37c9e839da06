use serde::Deserialize;
use serde_json::{Map, Value};

use super::{FieldKind, FieldSpec, OutputSchema, ParamKind, ParamSpec, PromptDefinition};
use crate::application::ports::ModelOptions;
use crate::domain::DialogueSegment;

const PARAMETERS: &[ParamSpec] = &[
    ParamSpec {
        name: "content",
        kind: ParamKind::String { non_empty: true },
        required: true,
    },
    ParamSpec {
        name: "host_name",
        kind: ParamKind::String { non_empty: true },
        required: true,
    },
    ParamSpec {
        name: "host_description",
        kind: ParamKind::String { non_empty: false },
        required: true,
    },
    ParamSpec {
        name: "cohost_name",
        kind: ParamKind::String { non_empty: true },
        required: true,
    },
    ParamSpec {
        name: "cohost_description",
        kind: ParamKind::String { non_empty: false },
        required: true,
    },
    ParamSpec {
        name: "target_minutes",
        kind: ParamKind::Number,
        required: false,
    },
];

const DIALOGUE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "speaker",
        kind: FieldKind::String { non_empty: true },
        required: true,
    },
    FieldSpec {
        name: "line",
        kind: FieldKind::String { non_empty: true },
        required: true,
    },
];

const OUTPUT_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "title",
        kind: FieldKind::String { non_empty: true },
        required: true,
    },
    FieldSpec {
        name: "summary",
        kind: FieldKind::String { non_empty: true },
        required: true,
    },
    FieldSpec {
        name: "tags",
        kind: FieldKind::StringArray { non_empty: false },
        required: true,
    },
    FieldSpec {
        name: "dialogue",
        kind: FieldKind::ObjectArray {
            fields: DIALOGUE_FIELDS,
            non_empty: true,
        },
        required: true,
    },
];

/// The script-generation prompt: source material plus two personas in,
/// title/summary/tags/dialogue out.
pub fn podcast_script_prompt() -> PromptDefinition {
    PromptDefinition {
        name: "podcast_script",
        parameters: PARAMETERS,
        render: render_script_prompt,
        output_schema: Some(OutputSchema {
            fields: OUTPUT_FIELDS,
        }),
        defaults: ModelOptions {
            model: None,
            temperature: Some(0.7),
            max_tokens: Some(4096),
        },
    }
}

fn render_script_prompt(params: &Map<String, Value>) -> String {
    let text = |key: &str| params.get(key).and_then(Value::as_str).unwrap_or_default();
    let target_minutes = params
        .get("target_minutes")
        .and_then(Value::as_u64)
        .unwrap_or(8);

    format!(
        "You are writing the script for a two-host podcast episode of roughly \
         {target_minutes} minutes.\n\
         \n\
         The hosts:\n\
         - {host}: {host_description}\n\
         - {cohost}: {cohost_description}\n\
         \n\
         Write a natural back-and-forth conversation in which the hosts \
         discuss the source material below. {host} opens and closes the \
         episode. Every dialogue entry uses the host's name as \"speaker\" \
         exactly as given above. Also produce an episode title, a two to \
         three sentence summary, and a handful of topical tags.\n\
         \n\
         Source material:\n\
         ---\n\
         {content}\n\
         ---",
        target_minutes = target_minutes,
        host = text("host_name"),
        host_description = text("host_description"),
        cohost = text("cohost_name"),
        cohost_description = text("cohost_description"),
        content = text("content"),
    )
}

/// Typed view of a conforming script-prompt reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptOutput {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub dialogue: Vec<DialogueSegment>,
}
