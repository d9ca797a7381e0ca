//! CLI integration tests for the `izprime` binary.
//!
//! # How to run
//!
//! ```bash
//! cargo test --test cli_tests
//! ```

use assert_cmd::Command;
use predicates::prelude::*;

fn izprime() -> Command {
    Command::cargo_bin("izprime").unwrap()
}

#[test]
fn help_shows_all_subcommands() {
    izprime().arg("--help").assert().success().stdout(
        predicate::str::contains("sieve")
            .and(predicate::str::contains("next-prime"))
            .and(predicate::str::contains("random-prime"))
            .and(predicate::str::contains("batch-random-prime"))
            .and(predicate::str::contains("vx-segment"))
            .and(predicate::str::contains("verify-prime")),
    );
}

#[test]
fn sieve_classic_prints_expected_primes() {
    izprime()
        .args(["sieve", "30", "--algo", "classic"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[2, 3, 5, 7, 11, 13, 17, 19, 23, 29]",
        ));
}

#[test]
fn sieve_iz_matches_classic() {
    izprime()
        .args(["sieve", "100", "--algo", "iz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("97"));
}

#[test]
fn sieve_writes_a_hashed_file_when_output_given() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("primes_under_100");
    izprime()
        .args(["sieve", "100", "--output"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.with_extension("primes").exists());
}

#[test]
fn next_prime_forward_from_100() {
    izprime()
        .args(["next-prime", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("101"));
}

#[test]
fn next_prime_rejects_garbage_base() {
    izprime()
        .args(["next-prime", "not-a-number"])
        .assert()
        .failure();
}

#[test]
fn verify_prime_accepts_and_rejects() {
    izprime()
        .args(["verify-prime", "97"])
        .assert()
        .success()
        .stdout(predicate::str::contains("true"));
    izprime()
        .args(["verify-prime", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("false"));
}

#[test]
fn random_prime_rejects_bad_id() {
    izprime()
        .args(["random-prime", "64", "--id", "0"])
        .assert()
        .failure();
}

#[test]
fn vx_segment_writes_a_gap_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("segment_0");
    izprime()
        .args(["vx-segment", "1001", "0", "--output"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.with_extension("gaps").exists());

    izprime()
        .arg("gap-list-inspect")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("y=0"));
}

#[test]
fn bitmap_inspect_reports_length_and_popcount() {
    use iz_prime::bitmap::Bitmap;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample");
    let mut bm = Bitmap::create(64);
    bm.set_bit(1);
    bm.set_bit(2);
    bm.compute_hash();
    bm.write_file(&path).unwrap();

    izprime()
        .arg("bitmap-inspect")
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("len=64").and(predicate::str::contains("popcount=2")),
        );
}
