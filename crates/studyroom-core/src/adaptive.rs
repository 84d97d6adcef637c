//! Risk-driven pacing for the next focus run.
//!
//! The policy is a pure recommendation: callers feed it the risk score of an
//! external emotion analysis and pass the result to the next
//! [`SessionScheduler::start_focus`](crate::SessionScheduler::start_focus).

use serde::{Deserialize, Serialize};

/// Shortest focus run the policy will shorten to.
pub const MIN_ADJUSTED_MINUTES: u32 = 15;
/// Longest focus run the policy will lengthen to.
pub const MAX_ADJUSTED_MINUTES: u32 = 60;

/// Recommend the next focus duration for `risk_score` (0..=100).
///
/// - above 66: shorten to 60%, not below 15 minutes
/// - above 40: shorten to 80%, not below 15 minutes
/// - below 20: lengthen to 120%, not above 60 minutes
/// - otherwise unchanged
pub fn adjust(risk_score: f64, current_minutes: u32) -> u32 {
    let scaled = |factor: f64| (f64::from(current_minutes) * factor).round() as u32;
    if risk_score > 66.0 {
        scaled(0.6).max(MIN_ADJUSTED_MINUTES)
    } else if risk_score > 40.0 {
        scaled(0.8).max(MIN_ADJUSTED_MINUTES)
    } else if risk_score < 20.0 {
        scaled(1.2).min(MAX_ADJUSTED_MINUTES)
    } else {
        current_minutes
    }
}

/// Stateless handle over [`adjust`] for callers that pass policies around.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptivePolicy;

impl AdaptivePolicy {
    pub fn adjust(&self, risk_score: f64, current_minutes: u32) -> u32 {
        adjust(risk_score, current_minutes)
    }
}

/// Coarse wellbeing band for a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Excellent,
    Balanced,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_score(risk_score: f64) -> Self {
        if risk_score > 66.0 {
            RiskLevel::High
        } else if risk_score > 40.0 {
            RiskLevel::Moderate
        } else if risk_score > 20.0 {
            RiskLevel::Balanced
        } else {
            RiskLevel::Excellent
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskLevel::High => {
                "High stress detected: take a longer break, shorten study sessions for now, \
                 and reach out to someone you trust if the feeling persists."
            }
            RiskLevel::Moderate => {
                "Moderate stress: take a 5-10 minute break and split work into smaller chunks."
            }
            RiskLevel::Balanced => "Balanced: keep your regular breaks and study habits.",
            RiskLevel::Excellent => "Excellent state: keep the current routine going.",
        }
    }
}
