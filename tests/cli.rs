use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;

#[test]
fn version_names_the_binary() {
    cargo_bin_cmd!("reqlog-job")
        .arg("--version")
        .assert()
        .success()
        .stdout(contains("reqlog-job"));
}

#[test]
fn run_help_lists_window_flags() {
    cargo_bin_cmd!("reqlog-job")
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(contains("--start-time"))
        .stdout(contains("--end-time"));
}

#[test]
fn unknown_subcommand_is_rejected() {
    cargo_bin_cmd!("reqlog-job")
        .arg("send-everything")
        .assert()
        .failure();
}
