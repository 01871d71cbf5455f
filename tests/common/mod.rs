use carbon_quest::catalog::{default_catalog, Dimension};
use carbon_quest::storage::FileStore;
use carbon_quest::tracker::{Session, SessionSettings, Step, Submission};
use chrono::{DateTime, TimeZone, Utc};
use std::path::Path;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn open_session(dir: &Path) -> Session<FileStore> {
    init_tracing();
    let store = FileStore::open(dir).expect("Failed to open test store");
    Session::open(
        default_catalog().expect("Built-in catalog should parse"),
        store,
        SessionSettings::default(),
    )
}

pub fn morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 22, 7, 45, 0).unwrap()
}

pub type Pick = (Dimension, &'static str, Option<f64>);

/// Answers all five questions in order and submits on the last one.
pub fn play_day(
    session: &mut Session<FileStore>,
    picks: &[Pick],
    now: DateTime<Utc>,
) -> Result<Submission, carbon_quest::tracker::TrackerError> {
    for (dimension, label, aux) in picks {
        session
            .select_option(*dimension, label)
            .expect("Option should exist");
        if let Some(value) = aux {
            session
                .set_aux_value(*dimension, *value)
                .expect("Aux value should be in range");
        }
        match session.go_next(now)? {
            Step::Moved(_) => {}
            Step::Submitted(submission) => return Ok(*submission),
        }
    }
    panic!("Quiz ended without a submission");
}

pub fn car_commute() -> Vec<Pick> {
    vec![
        (Dimension::Transport, "Car", Some(10.0)),
        (Dimension::Vegetarian, "No", None),
        (Dimension::EWaste, "No", None),
        (Dimension::Energy, "No", None),
        (Dimension::Plastic, "No", None),
    ]
}

pub fn green_day(bike_miles: f64) -> Vec<Pick> {
    vec![
        (Dimension::Transport, "Bike", Some(bike_miles)),
        (Dimension::Vegetarian, "Yes", Some(1.0)),
        (Dimension::EWaste, "Yes, recycled or donated", Some(1.0)),
        (Dimension::Energy, "Yes", None),
        (Dimension::Plastic, "Yes", None),
    ]
}
