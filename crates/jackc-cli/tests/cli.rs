//! End-to-end tests driving the `jackc` binary through `std::process::Command`.

use std::fs;
use std::process::Command;

fn jackc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jackc"))
}

#[test]
fn compiles_a_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("Main.jack");
    fs::write(&src, "class Main { function void main() { return; } }").unwrap();

    let status = jackc().arg(&src).status().unwrap();
    assert!(status.success());

    let vm = fs::read_to_string(dir.path().join("Main.vm")).unwrap();
    assert_eq!(vm, "function Main.main 0\npush constant 0\nreturn\n");
}

#[test]
fn compiles_every_top_level_jack_file_in_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("A.jack"),
        "class A { function void m() { return; } }",
    )
    .unwrap();
    fs::write(
        dir.path().join("B.jack"),
        "class B { function void m() { return; } }",
    )
    .unwrap();

    let status = jackc().arg(dir.path()).status().unwrap();
    assert!(status.success());

    assert!(dir.path().join("A.vm").exists());
    assert!(dir.path().join("B.vm").exists());
}

#[test]
fn a_failing_unit_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Good.jack"), "class Good { function void m() { return; } }").unwrap();
    fs::write(dir.path().join("Bad.jack"), "class Bad { 123 }").unwrap();

    let status = jackc().arg(dir.path()).status().unwrap();
    assert!(!status.success());
    assert!(dir.path().join("Good.vm").exists());
}

#[test]
fn non_jack_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("notes.txt");
    fs::write(&src, "not jack source").unwrap();

    let status = jackc().arg(&src).status().unwrap();
    assert!(!status.success());
}

#[test]
fn verbose_flag_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("Main.jack");
    fs::write(&src, "class Main { function void main() { return; } }").unwrap();

    let status = jackc().arg("-v").arg(&src).status().unwrap();
    assert!(status.success());
}
