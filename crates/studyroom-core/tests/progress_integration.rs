//! Integration tests for progress tracking over the SQLite store.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use studyroom_core::{
    Clock, Database, GoalConfig, ManualClock, ProgressRecord, ProgressTracker, Trend,
};

fn clock_at(y: i32, m: u32, d: u32) -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap(),
    ))
}

#[test]
fn record_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studyroom.db");
    let clock = clock_at(2024, 7, 1);

    {
        let tracker = ProgressTracker::open(
            Box::new(Database::open_at(&path).unwrap()),
            GoalConfig::default(),
            clock.clone(),
        );
        tracker.add_session_time(1500).unwrap();
        tracker.add_emotion_entry(35.0, "curiosity").unwrap();
        tracker.add_completed_task("problem set 4").unwrap();
    }

    let tracker = ProgressTracker::open(
        Box::new(Database::open_at(&path).unwrap()),
        GoalConfig::default(),
        clock.clone(),
    );
    let record = tracker.record();
    assert_eq!(record.total_study_seconds, 1500);
    assert_eq!(record.current_streak, 1);
    assert_eq!(record.last_study_date, Some(clock.today()));
    assert_eq!(record.emotion_history.len(), 1);
    assert_eq!(record.completed_tasks[0].text, "problem set 4");
}

#[test]
fn non_finite_risk_score_cannot_erase_saved_progress() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studyroom.db");
    let clock = clock_at(2024, 7, 1);

    {
        let tracker = ProgressTracker::open(
            Box::new(Database::open_at(&path).unwrap()),
            GoalConfig::default(),
            clock.clone(),
        );
        tracker.add_session_time(3600).unwrap();
        assert!(tracker.add_emotion_entry(f64::NAN, "fear").is_err());
    }

    let tracker = ProgressTracker::open(
        Box::new(Database::open_at(&path).unwrap()),
        GoalConfig::default(),
        clock,
    );
    let record = tracker.record();
    assert_eq!(record.total_study_seconds, 3600);
    assert_eq!(record.sessions_completed, 1);
    assert!(record.emotion_history.is_empty());
}

#[test]
fn corrupt_database_file_is_set_aside() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studyroom.db");
    std::fs::write(&path, "not an sqlite file ".repeat(256)).unwrap();

    let tracker = ProgressTracker::open(
        Box::new(Database::open_or_recover(&path).unwrap()),
        GoalConfig::default(),
        clock_at(2024, 7, 1),
    );
    assert_eq!(tracker.record(), ProgressRecord::default());
    tracker.add_session_time(900).unwrap();

    assert!(dir.path().join("studyroom.db.corrupt").exists());
    let reopened = Database::open_at(&path).unwrap();
    assert!(reopened.kv_get("progress_record").unwrap().is_some());
}

#[test]
fn corrupt_database_record_starts_fresh() {
    let db = Database::open_memory().unwrap();
    db.kv_set("progress_record", "not json at all").unwrap();
    let tracker = ProgressTracker::open(Box::new(db), GoalConfig::default(), clock_at(2024, 7, 1));
    assert_eq!(tracker.record(), ProgressRecord::default());

    tracker.add_session_time(120).unwrap();
    assert_eq!(tracker.record().sessions_completed, 1);
}

#[test]
fn streak_breaks_after_gap() {
    let clock = clock_at(2024, 7, 1);
    let tracker = ProgressTracker::open(
        Box::new(Database::open_memory().unwrap()),
        GoalConfig::default(),
        clock.clone(),
    );

    let mut streaks = Vec::new();
    for _ in 0..3 {
        tracker.add_session_time(300).unwrap();
        tracker.add_session_time(300).unwrap();
        streaks.push(tracker.streak_info().current_streak);
        clock.advance(Duration::days(1));
    }
    // Day D+3 has no activity.
    clock.advance(Duration::days(1));
    tracker.add_session_time(700).unwrap();
    streaks.push(tracker.streak_info().current_streak);

    assert_eq!(streaks, vec![1, 2, 3, 1]);
    let info = tracker.streak_info();
    assert_eq!(info.longest_streak, 3);
    assert!((info.progress - 100.0 / 7.0).abs() < 1e-9);
}

#[test]
fn streak_progress_can_exceed_goal() {
    let clock = clock_at(2024, 7, 1);
    let goals = GoalConfig {
        streak_days: 2,
        ..Default::default()
    };
    let tracker =
        ProgressTracker::open(Box::new(Database::open_memory().unwrap()), goals, clock.clone());
    for _ in 0..3 {
        tracker.add_session_time(600).unwrap();
        clock.advance(Duration::days(1));
    }
    assert_eq!(tracker.streak_info().progress, 150.0);
    assert_eq!(tracker.today_stats().goal_progress, 0.0);
}

#[test]
fn today_progress_is_clamped() {
    let tracker = ProgressTracker::open(
        Box::new(Database::open_memory().unwrap()),
        GoalConfig::default(),
        clock_at(2024, 7, 3),
    );
    tracker.add_session_time(5 * 3600).unwrap();
    let today = tracker.today_stats();
    assert_eq!(today.goal_progress, 100.0);
    assert_eq!(today.study_time_formatted, "5h 0m");
}

#[test]
fn week_stats_always_has_seven_days() {
    // 2024-07-03 is a Wednesday.
    let tracker = ProgressTracker::open(
        Box::new(Database::open_memory().unwrap()),
        GoalConfig::default(),
        clock_at(2024, 7, 3),
    );
    let week = tracker.week_stats();
    let dates: Vec<NaiveDate> = week.daily_breakdown.iter().map(|d| d.date).collect();
    assert_eq!(dates.len(), 7);
    assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
    assert_eq!(dates[6], NaiveDate::from_ymd_opt(2024, 7, 7).unwrap());
    assert_eq!(week.total_minutes, 0);
}

#[test]
fn emotion_history_cap_and_insights() {
    let clock = clock_at(2024, 7, 1);
    let tracker = ProgressTracker::open(
        Box::new(Database::open_memory().unwrap()),
        GoalConfig::default(),
        clock.clone(),
    );
    for i in 0..150 {
        tracker.add_emotion_entry(f64::from(i % 100), "neutral").unwrap();
        clock.advance(Duration::minutes(1));
    }
    let history = tracker.record().emotion_history;
    assert_eq!(history.len(), 100);
    assert_eq!(history[0].risk_score, 50.0);
    assert!(history.windows(2).all(|w| w[0].timestamp < w[1].timestamp));

    let tracker = ProgressTracker::open(
        Box::new(Database::open_memory().unwrap()),
        GoalConfig::default(),
        clock.clone(),
    );
    let entries = [
        (80.0, "fear"),
        (80.0, "fear"),
        (80.0, "grief"),
        (10.0, "joy"),
        (10.0, "joy"),
        (10.0, "relief"),
    ];
    for (risk, label) in entries {
        tracker.add_emotion_entry(risk, label).unwrap();
        clock.advance(Duration::minutes(5));
    }
    let insights = tracker.emotion_insights(7);
    assert_eq!(insights.trend, Trend::Improving);
    assert_eq!(insights.most_common_emotion, "fear");
    assert_eq!(insights.total_entries, 6);

    clock.advance(Duration::days(8));
    let stale = tracker.emotion_insights(7);
    assert_eq!(stale.total_entries, 0);
    assert_eq!(stale.most_common_emotion, "neutral");
    assert_eq!(stale.trend, Trend::Stable);
}
