use std::collections::HashMap;
use std::fmt;

/// Identifies a catalog personality (a stable slug, not a database row).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonalityId(String);

impl PersonalityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonalityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a speech-synthesis provider ("openai", "elevenlabs", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named host persona. The synthesis handle varies by provider, so the
/// catalog stores one handle per provider the persona is available on.
#[derive(Debug, Clone)]
pub struct Personality {
    pub id: PersonalityId,
    pub name: String,
    pub description: String,
    pub voice_handles: HashMap<ProviderId, String>,
}

impl Personality {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: PersonalityId::new(id),
            name: name.into(),
            description: description.into(),
            voice_handles: HashMap::new(),
        }
    }

    pub fn with_voice(mut self, provider: impl Into<String>, handle: impl Into<String>) -> Self {
        self.voice_handles
            .insert(ProviderId::new(provider), handle.into());
        self
    }
}
