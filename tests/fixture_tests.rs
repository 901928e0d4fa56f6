//! Runs every JSON fixture under `tests/fixtures` through the policies it describes.

use std::path::PathBuf;

use cpu_sched_sim::fixture::{ExpectedOutput, Fixture};
use cpu_sched_sim::PolicyKind;

fn fixture_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(file)
}

fn assert_fixture_passes(file: &str, policy: PolicyKind) {
    let fixture = Fixture::load(fixture_path(file)).expect("fixture loads");
    let report = fixture.run(policy).expect("fixture input is valid");
    let outcome = fixture.check(&report);
    assert!(outcome.compared, "{file}: nothing compared");
    assert!(outcome.passed(), "{file}\n{outcome}\n{report}");
}

#[test]
fn round_robin_equal_bursts() {
    assert_fixture_passes("rr_equal_bursts.json", PolicyKind::RoundRobin);
}

#[test]
fn sjf_shorter_arrival() {
    assert_fixture_passes("sjf_shorter_arrival.json", PolicyKind::Sjf);
}

#[test]
fn priority_aging_tie() {
    assert_fixture_passes("priority_aging_tie.json", PolicyKind::Priority);
}

#[test]
fn ag_priority_preemption() {
    assert_fixture_passes("ag_priority_preemption.json", PolicyKind::Ag);
}

#[test]
fn ag_shortest_remaining() {
    assert_fixture_passes("ag_shortest_remaining.json", PolicyKind::Ag);
}

#[test]
fn shared_workload_matches_every_policy() {
    let fixture = Fixture::load(fixture_path("shared_workload.json")).expect("fixture loads");
    assert!(matches!(
        fixture.expected_output,
        Some(ExpectedOutput::PerPolicy(_))
    ));
    for policy in PolicyKind::ALL {
        let report = fixture.run(policy).expect("fixture input is valid");
        let outcome = fixture.check(&report);
        assert!(outcome.passed(), "{policy}\n{outcome}\n{report}");
    }
}

#[test]
fn context_switch_override_breaks_expectations() {
    let mut fixture = Fixture::load(fixture_path("rr_equal_bursts.json")).expect("fixture loads");
    fixture.input.context_switch = 1;
    let report = fixture.run(PolicyKind::RoundRobin).expect("fixture input is valid");
    // P1 [0,2) | cs | P2 [3,5) | cs | P1 [6,8) | cs | P2 [9,11)
    assert_eq!(report.record("P2").and_then(|r| r.completion_time()), Some(11));
    assert!(!fixture.check(&report).passed());
}

#[test]
fn missing_file_is_an_io_error() {
    let err = Fixture::load(fixture_path("does_not_exist.json")).unwrap_err();
    assert!(matches!(err, cpu_sched_sim::FixtureError::Io(_)));
}
