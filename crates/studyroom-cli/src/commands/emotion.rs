use clap::Subcommand;
use serde::Serialize;
use studyroom_core::{adjust, Config, RiskLevel};

use super::{open_tracker, print_json};

#[derive(Subcommand)]
pub enum EmotionAction {
    /// Record a check-in from an external emotion analysis
    Log {
        /// Risk score (0-100)
        #[arg(long)]
        risk: f64,
        /// Primary emotion label
        #[arg(long, default_value = "neutral")]
        label: String,
        /// Focus duration to adjust (defaults to timer.focus_minutes)
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Show recent check-ins
    History {
        /// Number of most recent entries
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Serialize)]
struct Recommendation {
    risk_score: f64,
    level: RiskLevel,
    current_minutes: u32,
    recommended_minutes: u32,
    advice: &'static str,
}

impl Recommendation {
    fn new(risk_score: f64, current_minutes: u32) -> Self {
        let level = RiskLevel::from_score(risk_score);
        Self {
            risk_score,
            level,
            current_minutes,
            recommended_minutes: adjust(risk_score, current_minutes),
            advice: level.recommendation(),
        }
    }
}

fn validate_risk(risk: f64) -> Result<f64, Box<dyn std::error::Error>> {
    if !(0.0..=100.0).contains(&risk) {
        return Err(format!("risk score must be within 0-100, got {risk}").into());
    }
    Ok(risk)
}

pub fn run(action: EmotionAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let tracker = open_tracker(&config)?;

    match action {
        EmotionAction::Log {
            risk,
            label,
            minutes,
        } => {
            let risk = validate_risk(risk)?;
            tracker.add_emotion_entry(risk, label.trim())?;
            let minutes = minutes.unwrap_or(config.timer.focus_minutes);
            print_json(&Recommendation::new(risk, minutes))
        }
        EmotionAction::History { limit } => {
            let history = tracker.record().emotion_history;
            let start = history.len().saturating_sub(limit);
            print_json(&history[start..])
        }
    }
}

/// `adapt`: pure policy query, nothing is recorded.
pub fn adapt(risk: f64, minutes: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    let risk = validate_risk(risk)?;
    let minutes = minutes.unwrap_or_else(|| Config::load_or_default().timer.focus_minutes);
    print_json(&Recommendation::new(risk, minutes))
}
