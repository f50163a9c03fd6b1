//! Integration tests for the timecut binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("crates/timecut-core/tests/fixtures")
        .join(name)
}

fn run_command(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_timecut"))
        // Tests must not depend on a user's ~/.config/timecut/config.toml.
        .arg("--no-config")
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

/// Scratch directory holding a copy of the timetable fixture.
struct Scratch {
    dir: PathBuf,
}

impl Scratch {
    fn new(tag: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("timecut_cli_{}_{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::copy(fixture("timetable.grd"), dir.join("timetable.grd")).unwrap();
        Scratch { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn arg(&self, name: &str) -> String {
        self.path(name).to_string_lossy().into_owned()
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_filters_year_in_place() {
    let scratch = Scratch::new("in_place");
    let (stdout, _, code) = run_command(&[&scratch.arg("timetable.grd"), "2", "-c", "GR"]);
    assert_eq!(code, 0);
    assert_eq!(
        read(&scratch.path("timetable.grd")),
        read(&fixture("timetable.filtered.grd"))
    );
    assert!(stdout.contains("GR\tGroup Revision\tDr. Smith\tRoom 4"));
    assert!(stdout.contains("QO\tQuantum Optics\tProf. Jones\tLab 2"));
}

#[test]
fn test_output_flag_leaves_input_untouched() {
    let scratch = Scratch::new("output");
    let (_, _, code) = run_command(&[
        &scratch.arg("timetable.grd"),
        "2",
        "-c",
        "GR",
        "-o",
        &scratch.arg("out.grd"),
    ]);
    assert_eq!(code, 0);
    assert_eq!(
        read(&scratch.path("timetable.grd")),
        read(&fixture("timetable.grd"))
    );
    assert_eq!(
        read(&scratch.path("out.grd")),
        read(&fixture("timetable.filtered.grd"))
    );
}

#[test]
fn test_dry_run_does_not_save() {
    let scratch = Scratch::new("dry_run");
    let (_, _, code) = run_command(&[&scratch.arg("timetable.grd"), "2", "-c", "GR", "--dry-run"]);
    assert_eq!(code, 0);
    assert_eq!(
        read(&scratch.path("timetable.grd")),
        read(&fixture("timetable.grd"))
    );
}

#[test]
fn test_year_four_uses_third_sheet() {
    let scratch = Scratch::new("year_four");
    let (stdout, _, code) = run_command(&[&scratch.arg("timetable.grd"), "4", "-c", "MP", "--dry-run"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "MP\tMathematical Physics\tDr. Lee\tRoom 9");
}

#[test]
fn test_json_registry() {
    let scratch = Scratch::new("json");
    let (stdout, _, code) = run_command(&[
        &scratch.arg("timetable.grd"),
        "3",
        "-c",
        "MP",
        "--dry-run",
        "--json",
    ]);
    assert_eq!(code, 0);
    assert!(stdout.contains("\"MP\": {"));
    assert!(stdout.contains("\"tutor\": \"Dr. Lee\""));
}

#[test]
fn test_year_out_of_range_fails() {
    let scratch = Scratch::new("bad_year");
    let (_, stderr, code) = run_command(&[&scratch.arg("timetable.grd"), "7", "-c", "GR"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Year 7"), "stderr: {}", stderr);
    assert_eq!(
        read(&scratch.path("timetable.grd")),
        read(&fixture("timetable.grd"))
    );
}

#[test]
fn test_help_names_read_only_spreadsheets() {
    let (stdout, _, code) = run_command(&["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Spreadsheets"), "stdout: {}", stdout);
    assert!(stdout.contains(".grd"));
}

#[test]
fn test_missing_file_fails() {
    let (_, stderr, code) = run_command(&["/nonexistent/timetable.grd", "1", "-c", "GR"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Failed to open"));
}

#[test]
fn test_ics_export() {
    let scratch = Scratch::new("ics");
    let (_, _, code) = run_command(&[
        &scratch.arg("timetable.grd"),
        "2",
        "-c",
        "GR",
        "--dry-run",
        "--ics",
        &scratch.arg("gr.ics"),
    ]);
    assert_eq!(code, 0);
    let ics = read(&scratch.path("gr.ics"));
    assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
    assert_eq!(ics.matches("SUMMARY:Group Revision (GR)").count(), 3);
    assert!(ics.contains("DTSTART:20240916T090000"));
    assert!(ics.contains("DTSTART:20240916T150000"));
    assert!(ics.contains("DTSTART:20240923T130000"));
}

#[test]
fn test_template_render_out() {
    let scratch = Scratch::new("template");
    fs::write(
        scratch.path("line.rhai"),
        "fn render(l) { `${l.abbrev} ${l.date} ${l.time} ${l.end}` }",
    )
    .unwrap();
    let (_, _, code) = run_command(&[
        &scratch.arg("timetable.grd"),
        "2",
        "-c",
        "QO",
        "--dry-run",
        "--template",
        &scratch.arg("line.rhai"),
        "--render-out",
        &scratch.arg("out.txt"),
    ]);
    assert_eq!(code, 0);
    assert_eq!(
        read(&scratch.path("out.txt")),
        "QO 2024-09-16 9:00 2024-09-16T10:00:00\n\
         QO 2024-09-16 9:00 2024-09-16T10:00:00\n\
         QO 2024-09-23 13:00 2024-09-23T14:00:00\n"
    );
}
