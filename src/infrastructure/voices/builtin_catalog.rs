use crate::application::voices::VoiceCatalog;
use crate::domain::Personality;
use crate::infrastructure::speech::OPENAI_PROVIDER;

/// The shipped host personas. Each carries one synthesis handle per
/// provider it is available on; the active provider picks the handle at
/// use time.
pub fn builtin_catalog() -> VoiceCatalog {
    VoiceCatalog::new(vec![
        Personality::new(
            "nova",
            "Nova",
            "Warm, curious lead host who asks the questions listeners would \
             ask and keeps the conversation moving.",
        )
        .with_voice(OPENAI_PROVIDER, "nova")
        .with_voice("elevenlabs", "EXAVITQu4vr4xnSDxMaL"),
        Personality::new(
            "orion",
            "Orion",
            "Dry, analytical cohost who digs into the details and isn't \
             afraid to push back.",
        )
        .with_voice(OPENAI_PROVIDER, "onyx")
        .with_voice("elevenlabs", "TxGEqnHWrfWFTfGW9XjX"),
        Personality::new(
            "lyra",
            "Lyra",
            "Upbeat storyteller who connects the material to everyday \
             experience with vivid examples.",
        )
        .with_voice(OPENAI_PROVIDER, "shimmer")
        .with_voice("elevenlabs", "ThT5KcBeYPX3keUQqHPh"),
        Personality::new(
            "atlas",
            "Atlas",
            "Calm explainer who summarizes complex points in plain language \
             and lands the takeaways.",
        )
        .with_voice(OPENAI_PROVIDER, "echo")
        .with_voice("elevenlabs", "onwK4e9ZLuTAKqWW03F9"),
    ])
}
