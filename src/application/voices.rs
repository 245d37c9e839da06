use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::{Personality, PersonalityId, ProviderId};

/// Read-only lookup over the static personality catalog.
///
/// Handle resolution is table-driven: one `(provider, personality)` table,
/// memoized per provider and recomputed whenever the asked-for provider
/// differs from the cached one. Misses are explicit errors, never silent
/// fallbacks.
pub struct VoiceCatalog {
    personalities: Vec<Personality>,
    table: RwLock<Option<ProviderVoiceTable>>,
}

struct ProviderVoiceTable {
    provider: ProviderId,
    handles: HashMap<PersonalityId, String>,
}

impl VoiceCatalog {
    pub fn new(personalities: Vec<Personality>) -> Self {
        Self {
            personalities,
            table: RwLock::new(None),
        }
    }

    pub fn personalities(&self) -> &[Personality] {
        &self.personalities
    }

    pub fn personality(&self, id: &PersonalityId) -> Option<&Personality> {
        self.personalities.iter().find(|p| p.id == *id)
    }

    pub fn voice_handle(
        &self,
        provider: &ProviderId,
        id: &PersonalityId,
    ) -> Result<String, VoiceLookupError> {
        if self.personality(id).is_none() {
            return Err(VoiceLookupError::UnknownPersonality(id.clone()));
        }

        {
            let cached = self.table.read().unwrap_or_else(|e| e.into_inner());
            if let Some(table) = cached.as_ref() {
                if table.provider == *provider {
                    return table.lookup(provider, id);
                }
            }
        }

        let table = self.build_table(provider);
        let result = table.lookup(provider, id);
        *self.table.write().unwrap_or_else(|e| e.into_inner()) = Some(table);
        result
    }

    fn build_table(&self, provider: &ProviderId) -> ProviderVoiceTable {
        let handles = self
            .personalities
            .iter()
            .filter_map(|p| {
                p.voice_handles
                    .get(provider)
                    .map(|handle| (p.id.clone(), handle.clone()))
            })
            .collect();
        ProviderVoiceTable {
            provider: provider.clone(),
            handles,
        }
    }
}

impl ProviderVoiceTable {
    fn lookup(
        &self,
        provider: &ProviderId,
        id: &PersonalityId,
    ) -> Result<String, VoiceLookupError> {
        self.handles
            .get(id)
            .cloned()
            .ok_or_else(|| VoiceLookupError::NoVoiceForProvider {
                personality: id.clone(),
                provider: provider.clone(),
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VoiceLookupError {
    #[error("unknown personality: {0}")]
    UnknownPersonality(PersonalityId),
    #[error("personality {personality} has no voice for provider {provider}")]
    NoVoiceForProvider {
        personality: PersonalityId,
        provider: ProviderId,
    },
}
