//! Wallet Age Service
//!
//! Classifies wallet age from the record and asks the text-generation
//! provider for a short interpretation. The dates and category always come
//! from [`classify_wallet_age`]; the provider only writes the analysis text.

use std::sync::Arc;

use agent_core::{GenerationOptions, LlmProvider, Message};
use chrono::{DateTime, Utc};
use serde_json::json;

use crate::age::{classify_wallet_age, WalletAgeFacts, WalletAgeReport};
use crate::error::Result;
use crate::model::WalletRecord;
use crate::report::ReportArtifact;
use crate::source::WalletRecordSource;

/// Instructions for the text-generation provider
pub const WALLET_AGE_PROMPT: &str = r#"You review the age of a cryptocurrency wallet.
You are given the computed first transaction date, wallet age and category.
Do not recompute them. Write a brief interpretation of what the wallet's age
suggests about the holder's experience.

Reply with a JSON object with exactly these string keys:
"First Transaction", "Wallet Age", "Category", "Analysis"."#;

impl WalletAgeReport {
    /// Pretty-printed JSON artifact for `wallet_address`
    pub fn artifact(&self, wallet_address: &str, generated_at: DateTime<Utc>) -> Result<ReportArtifact> {
        Ok(ReportArtifact::new(
            "wallet_age",
            wallet_address,
            generated_at,
            "json",
            serde_json::to_string_pretty(self)?,
        ))
    }
}

pub struct WalletAgeService {
    source: Arc<dyn WalletRecordSource>,
    provider: Option<Arc<dyn LlmProvider>>,
    options: GenerationOptions,
}

impl WalletAgeService {
    /// Without a provider the analysis text falls back to a fixed reading per category
    pub fn new(source: Arc<dyn WalletRecordSource>, provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self {
            source,
            provider,
            options: GenerationOptions::default().json(),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn analyze(&self, wallet_address: &str, now: DateTime<Utc>) -> Result<WalletAgeReport> {
        let record = self.source.require(wallet_address).await?;
        let facts = classify_wallet_age(&record, now)?;

        tracing::info!(
            wallet = %wallet_address,
            first_transaction = %facts.first_transaction,
            category = %facts.category,
            "wallet age classified"
        );

        let analysis = self.interpret(&record, &facts, now).await;
        Ok(facts.into_report(analysis))
    }

    async fn interpret(&self, record: &WalletRecord, facts: &WalletAgeFacts, now: DateTime<Utc>) -> String {
        let fallback = facts.category.interpretation().to_string();
        let Some(provider) = &self.provider else {
            return fallback;
        };

        let context = json!({
            "wallet_address": record.wallet_address,
            "today": now.format("%Y-%m-%d").to_string(),
            "First Transaction": facts.first_transaction.format("%Y-%m-%d").to_string(),
            "Wallet Age": facts.age.to_string(),
            "Category": facts.category,
            "transaction_count": record.transaction_history.len(),
            "tokens_held": record.token_balances.iter().map(|b| b.symbol.as_str()).collect::<Vec<_>>(),
        });
        let messages = Message::prompt(WALLET_AGE_PROMPT, format!("Analyze the wallet age for this wallet:\n{context}"));

        match provider.complete(&messages, &self.options).await {
            Ok(completion) if completion.truncated() => {
                tracing::warn!(
                    provider = provider.name(),
                    max_tokens = self.options.max_tokens,
                    "wallet age reply cut off, using fallback"
                );
                fallback
            }
            Ok(completion) => match WalletAgeReport::parse_reply(&completion.content) {
                Ok(reply) if !reply.analysis.trim().is_empty() => reply.analysis,
                _ if !completion.content.trim().is_empty() && !completion.content.contains('{') => {
                    completion.content.trim().to_string()
                }
                _ => {
                    tracing::warn!(provider = provider.name(), "unusable wallet age reply, using fallback");
                    fallback
                }
            },
            Err(e) => {
                tracing::warn!(
                    provider = provider.name(),
                    error = %e,
                    retryable = e.is_retryable(),
                    "wallet age interpretation failed, using fallback"
                );
                fallback
            }
        }
    }
}
