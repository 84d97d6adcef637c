//! Types at the boundary with the external emotion classifier.
//!
//! Classification itself lives outside this crate; the core only consumes the
//! overall risk score and the primary (first) label.

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledEmotion {
    pub label: String,
    pub confidence: f64,
    pub risk_tier: RiskTier,
}

/// Result of classifying one piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionAnalysis {
    /// 0..=100, higher means more distress.
    pub risk_score: f64,
    /// Ordered by confidence, strongest first.
    pub emotions: Vec<LabeledEmotion>,
}

impl EmotionAnalysis {
    pub fn primary_label(&self) -> Option<&str> {
        self.emotions.first().map(|e| e.label.as_str())
    }
}

/// An emotion classifier supplied by the caller.
pub trait EmotionClassifier {
    /// Classify `text`. Returns `Ok(None)` for blank input.
    fn classify(&self, text: &str) -> Result<Option<EmotionAnalysis>>;
}
