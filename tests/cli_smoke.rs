use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn tickit_help_works() {
    Command::cargo_bin("tickit")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("to-do list"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "add", "edit", "toggle", "done", "rm", "show", "list", "count", "ui",
    ];

    for cmd in subcommands {
        Command::cargo_bin("tickit")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn unknown_filter_is_rejected() {
    Command::cargo_bin("tickit")
        .expect("binary")
        .args(["list", "--filter", "someday"])
        .assert()
        .failure()
        .stderr(contains("someday"));
}
