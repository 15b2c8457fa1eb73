use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

const RECORDS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/records.json");
const AREA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/area.json");

fn booking_utils() -> Command {
    let mut cmd = Command::cargo_bin("booking-utils").unwrap();
    cmd.env_remove("AVAILABILITY_TIMEZONE").env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

// ── availability ────────────────────────────────────────────────────────────

#[test]
fn test_availability_merges_and_reindexes() {
    let json = stdout_json(booking_utils().args(["availability", RECORDS]));
    assert_eq!(json["1"], serde_json::json!([{"start": 540, "end": 1080}]));
    assert_eq!(json["5"], serde_json::json!([{"start": 600, "end": 1320}]));
    assert_eq!(json["6"], serde_json::json!([]));
    assert_eq!(json.as_object().unwrap().len(), 7);
}

#[test]
fn test_availability_from_stdin() {
    let json = stdout_json(
        booking_utils()
            .arg("availability")
            .write_stdin(r#"[{"day_of_week": "sunday", "opening": "08:00", "closing": "10:00"}]"#),
    );
    assert_eq!(json["0"], serde_json::json!([{"start": 480, "end": 600}]));
}

#[test]
fn test_availability_skips_malformed_records() {
    let json = stdout_json(booking_utils().arg("availability").write_stdin(
        r#"[
            {"day_of_week": "monday", "opening": "09:00", "closing": "12:00"},
            {"day_of_week": 2.5, "opening": "09:00", "closing": "12:00"},
            {"day_of_week": "tuesday", "opening": 900, "closing": "12:00"}
        ]"#,
    ));
    assert_eq!(json["1"], serde_json::json!([{"start": 540, "end": 720}]));
    assert_eq!(json["2"], serde_json::json!([]));
    assert_eq!(json["3"], serde_json::json!([]));
}

#[test]
fn test_availability_rejects_bad_json() {
    booking_utils()
        .arg("availability")
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("parsing JSON"));
}

// ── check ───────────────────────────────────────────────────────────────────

#[test]
fn test_check_open_time() {
    // 2026-10-19 is a Monday
    booking_utils()
        .args(["check", "--date", "2026-10-19", "--time", "18:00", RECORDS])
        .assert()
        .success()
        .stdout("true\n");
}

#[test]
fn test_check_closed_time_exits_nonzero() {
    booking_utils()
        .args(["check", "--date", "2026-10-19", "--time", "18:01", RECORDS])
        .assert()
        .code(1)
        .stdout("false\n");
}

#[test]
fn test_check_rejects_bad_date() {
    booking_utils()
        .args(["check", "--date", "19/10/2026", "--time", "10:00", RECORDS])
        .assert()
        .failure();
}

// ── parse-rate ──────────────────────────────────────────────────────────────

#[test]
fn test_parse_rate_variants() {
    let json = stdout_json(booking_utils().args(["parse-rate", "2-4 hours"]));
    assert_eq!(json["kind"], "range");
    assert_eq!(json["minHours"], 2.0);
    assert_eq!(json["maxHours"], 4.0);

    let json = stdout_json(booking_utils().args(["parse-rate", "Per Hour"]));
    assert_eq!(json, serde_json::json!({"kind": "hourly"}));

    let json = stdout_json(booking_utils().args(["parse-rate", "Whole day"]));
    assert_eq!(json, Value::Null);
}

// ── price ───────────────────────────────────────────────────────────────────

#[test]
fn test_price_bracket_and_hourly() {
    let json = stdout_json(booking_utils().args(["price", "--hours", "2", "--guests", "4", AREA]));
    assert_eq!(json["total"], "2000");
    assert_eq!(json["usesHourlyMultiplier"], false);

    let json = stdout_json(booking_utils().args(["price", "--hours", "10", "--guests", "4", AREA]));
    assert_eq!(json["total"], "6000");
    assert_eq!(json["usesHourlyMultiplier"], true);
    assert_eq!(json["label"], "₱150.00 per guest / hour");
}

// ── options ─────────────────────────────────────────────────────────────────

#[test]
fn test_options_with_fallback() {
    let json = stdout_json(booking_utils().args(["options", "--fallback", "1,2,6", AREA]));
    let values: Vec<u64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["value"].as_u64().unwrap())
        .collect();
    assert_eq!(values, vec![1, 2, 3, 6]);
    assert_eq!(json[3]["label"], "6 hours • ₱150.00/guest/hour");
}

// ── payload ─────────────────────────────────────────────────────────────────

#[test]
fn test_payload_built() {
    let json = stdout_json(booking_utils().args([
        "payload",
        "--records",
        RECORDS,
        "--area",
        AREA,
        "--date",
        "2026-10-19",
        "--time",
        "9:00",
        "--hours",
        "3",
        "--guests",
        "2",
        "--payment-method",
        "gcash",
    ]));
    assert_eq!(json["areaId"], 12);
    assert_eq!(json["reservationDate"], "2026-10-19");
    assert_eq!(json["arrivalTime"], "09:00");
    assert_eq!(json["amount"], "1000");
}

#[test]
fn test_payload_outside_hours_fails() {
    booking_utils()
        .args([
            "payload",
            "--records",
            RECORDS,
            "--area",
            AREA,
            "--date",
            "2026-10-20",
            "--time",
            "10:00",
            "--payment-method",
            "card",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the opening hours"));
}

// ── global flags ────────────────────────────────────────────────────────────

#[test]
fn test_invalid_timezone_flag_fails() {
    booking_utils()
        .args(["--timezone", "Nowhere/Land", "availability", RECORDS])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn test_help_lists_subcommands() {
    booking_utils()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("parse-rate"))
        .stdout(predicate::str::contains("payload"));
}
