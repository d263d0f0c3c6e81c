use std::fs;

use lottery_cascade::{
    load_config, run_cases, ComparisonTable, ConfigLoadError, OutcomeKey, ScenarioSummary,
    SimulationReport,
};

const DOC: &str = r#"{
    "simulation_settings": {
        "total_overall_attendance": 10000,
        "num_total_events": 10,
        "core_fan_total_population": 1000
    },
    "user_target_events_details": {"test": 1},
    "lottery_stages_definition": [
        {"name": "S1", "applicant_core_fan_ratio": 0.5, "additional_applicants": 0, "weight": 1},
        {"name": "S2", "applicant_core_fan_ratio": 1.0, "additional_applicants": 0, "weight": 1}
    ],
    "simulation_cases_to_run": [
        {"case_name": "no duplicates", "duplicate_config": {}},
        {"case_name": "broken", "duplicate_config": {"type": "seat_reduction", "rate": 2.0}},
        {"case_name": "20% reduction", "duplicate_config": {"type": "seat_reduction", "rate": 0.2}}
    ]
}"#;

#[test]
fn loads_file_and_runs_every_case() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, DOC).unwrap();

    let config = load_config(&path).unwrap();
    let outcome = run_cases(&config);

    assert_eq!(outcome.results().len(), 2);
    assert_eq!(outcome.failures().len(), 1);
    assert_eq!(outcome.failures()[0].case_name, "broken");
    assert!(outcome.failures()[0]
        .error
        .to_string()
        .contains("reduction rate out of range"));

    let plain = &outcome.results()[0];
    assert_eq!(plain.probabilities.win_at("S1"), Some(1.0));
    let reduced = &outcome.results()[1];
    assert!((reduced.probabilities.win_at("S2").unwrap() - 0.1333).abs() < 1e-3);

    let table = ComparisonTable::from_results(outcome.results());
    assert_eq!(table.rows().len(), 3);
    assert_eq!(table.rows()[0].key, OutcomeKey::win_at("S1"));
    assert!((table.rows()[0].probabilities[1] - 0.8).abs() < 1e-9);

    let summary = ScenarioSummary::new(&config).to_string();
    assert!(summary.contains("Seats per event:      1000"));

    let report = SimulationReport::new(reduced).with_details(true).to_string();
    assert!(report.contains("S2"));
    assert!(report.contains("13.33%"));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigLoadError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn malformed_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigLoadError::Parse { .. }));
}

#[test]
fn shipped_sample_config_runs_cleanly() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/config.json");
    let config = load_config(path).unwrap();
    let outcome = run_cases(&config);
    assert!(outcome.failures().is_empty());
    assert_eq!(outcome.results().len(), config.simulation_cases_to_run.len());
    for result in outcome.results() {
        assert!((result.probabilities.total() - 1.0).abs() < 1e-6);
    }
}

#[test]
fn json_output_is_plain_data() {
    let config = lottery_cascade::LotteryConfig::from_json_str(DOC).unwrap();
    let outcome = run_cases(&config);
    let json = serde_json::to_value(outcome.document(chrono::Utc::now())).unwrap();
    let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 3);
    assert!(json["generated_at"].is_string());
    assert_eq!(json["cases"][0]["case_name"], "no duplicates");
    assert_eq!(json["cases"][1]["duplicate_win_policy"]["type"], "seat_reduction");
    assert_eq!(json["cases"][1]["stages"][1]["actual_applicants"], 600);
    assert_eq!(json["cases"][0]["probabilities"][2]["outcome"], "no_win");
    assert_eq!(json["failures"][0]["case_name"], "broken");
}
