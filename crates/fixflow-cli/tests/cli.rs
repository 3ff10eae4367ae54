use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn fixflow() -> Command {
    Command::cargo_bin("fixflow").unwrap()
}

#[test]
fn available_expressions_report() {
    fixflow()
        .arg(fixture("module.json"))
        .args(["--analysis", "available"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "available-expressions: diamond\n\
             ----- b1 -----\n\
             Available: x+y\n\
             ----- b2 -----\n\
             Available: x*2 x+y\n",
        ))
        .stdout(predicate::str::contains("liveness").not())
        .stdout(predicate::str::contains("main").not());
}

#[test]
fn liveness_without_heading() {
    fixflow()
        .arg(fixture("module.json"))
        .args(["--analysis", "liveness", "--no-heading"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("----- b1 -----\nLive-out: t w x\n"))
        .stdout(predicate::str::contains("liveness:").not());
}

#[test]
fn main_is_analyzed_with_no_skip() {
    fixflow()
        .arg(fixture("module.json"))
        .arg("--no-skip")
        .assert()
        .success()
        .stdout(predicate::str::contains("available-expressions: main"))
        .stdout(predicate::str::contains("liveness: main"));
}

#[test]
fn skip_list_is_extended() {
    fixflow()
        .arg(fixture("module.json"))
        .args(["--skip", "diamond"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn dump_lists_local_sets() {
    fixflow()
        .arg(fixture("module.json"))
        .args(["--analysis", "available", "--dump"])
        .assert()
        .success()
        .stdout(predicate::str::contains("passes: 2"))
        .stdout(predicate::str::contains("----- b3 -----\npred: b1\nsucc: b4\nGEN: x*2\nKILL: x+y\n"));
}

#[test]
fn json_output() {
    let output = fixflow()
        .arg(fixture("module.json"))
        .args(["--analysis", "liveness", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let report = &json["reports"][0];
    assert_eq!(report["analysis"], "liveness");
    assert_eq!(report["function"], "diamond");
    assert_eq!(report["blocks"][0]["block"], "b1");
    assert_eq!(report["blocks"][0]["facts"], serde_json::json!(["t", "w", "x"]));
    assert!(report.get("dump").is_none());
    assert_eq!(json["errors"], serde_json::json!([]));
}

#[test]
fn failing_function_does_not_hide_the_others() {
    fixflow()
        .arg(fixture("broken.json"))
        .args(["--analysis", "liveness"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("liveness: fine\n----- entry -----\nLive-out:\n"))
        .stderr(predicate::str::contains(
            "error: liveness failed for 'dangling': block 'entry' in function 'dangling' \
             branches to unknown block 'nowhere'",
        ));
}

#[test]
fn pass_limit() {
    fixflow()
        .arg(fixture("module.json"))
        .args(["--analysis", "available", "--max-passes", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "no fixed point for function 'diamond' after 1 passes",
        ));
}

#[test]
fn missing_module() {
    fixflow()
        .arg(fixture("does-not-exist.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn rejects_unknown_analysis() {
    fixflow()
        .arg(fixture("module.json"))
        .args(["--analysis", "reaching"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'reaching'"));
}
