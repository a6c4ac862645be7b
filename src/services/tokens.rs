// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory wellness provider tokens, one pair per provider.

use crate::models::{ProviderTokens, WellnessProvider};
use dashmap::DashMap;
use std::sync::Arc;

/// Token pairs obtained from successful provider callbacks.
///
/// The pair belongs to the process, not to whoever completed the callback:
/// every signed-in user reads the same pair. A new callback replaces it.
/// Nothing is persisted, so a restart forgets every authorisation.
#[derive(Clone, Default)]
pub struct TokenVault {
    tokens: Arc<DashMap<WellnessProvider, ProviderTokens>>,
}

impl TokenVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `tokens` for `provider`, replacing any earlier pair.
    pub fn store(&self, provider: WellnessProvider, tokens: ProviderTokens) {
        let replaced = self.tokens.insert(provider, tokens).is_some();
        tracing::info!(%provider, replaced, "Provider tokens stored");
    }

    pub fn get(&self, provider: WellnessProvider) -> Option<ProviderTokens> {
        self.tokens.get(&provider).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
