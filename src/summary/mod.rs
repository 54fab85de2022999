// Summary module: narrative text for the selected localities.

pub mod prompt;
pub mod rules;

use crate::generator::TextGenerator;
use crate::model::{GenerationError, Record, YearlyAggregate};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const NO_DATA_SUMMARY: &str = "No data is available for the selected localities.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    External,
    Rules,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub text: String,
    pub source: SummarySource,
}

/// Picks between external text generation and the rule-based fallback.
#[derive(Clone, Default)]
pub struct SummaryGenerator {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl SummaryGenerator {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        Self { generator }
    }

    pub fn rules_only() -> Self {
        Self::default()
    }

    pub async fn summarize(
        &self,
        query: &str,
        areas: &[String],
        aggregates: &[YearlyAggregate],
        rows: &[&Record],
    ) -> Summary {
        if areas.is_empty() {
            return Summary {
                text: NO_DATA_SUMMARY.to_string(),
                source: SummarySource::Rules,
            };
        }

        match self.try_external(query, aggregates).await {
            Ok(text) => {
                info!("✅ Using generated summary for {:?}", areas);
                Summary {
                    text,
                    source: SummarySource::External,
                }
            }
            Err(e) => {
                match e {
                    GenerationError::NotConfigured | GenerationError::NoStats => {
                        debug!("Skipping text generation: {}", e)
                    }
                    _ => warn!("❌ Text generation failed, using rule-based summary: {}", e),
                }
                Summary {
                    text: rules::rule_summaries(areas, rows),
                    source: SummarySource::Rules,
                }
            }
        }
    }

    async fn try_external(
        &self,
        query: &str,
        aggregates: &[YearlyAggregate],
    ) -> Result<String, GenerationError> {
        let generator = self.generator.as_ref().ok_or(GenerationError::NotConfigured)?;
        let stats = prompt::stats_text(aggregates);
        if stats.is_empty() {
            return Err(GenerationError::NoStats);
        }
        let text = generator.generate(&prompt::build_prompt(query, &stats)).await?;
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}
