mod definition;
mod podcast_script;

pub use definition::{
    FieldError, FieldKind, FieldSpec, OutputSchema, ParamKind, ParamSpec, PromptDefinition,
    validate_params,
};
pub(crate) use definition::format_field_errors;
pub use podcast_script::{ScriptOutput, podcast_script_prompt};
