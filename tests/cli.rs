//! End-to-end tests driving the built `csvfix` binary against real files,
//! exercising a whole invocation rather than one function at a time.

use std::io::Write;
use std::process::{Command, Output};

fn csvfix() -> Command {
    Command::new(env!("CARGO_BIN_EXE_csvfix"))
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn write_fixture(contents: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f
}

#[test]
fn echo_passes_csv_through_unchanged() {
    let fixture = write_fixture("a,b,c\n1,2,3\n");
    let out = csvfix()
        .arg("echo")
        .arg(fixture.path())
        .output()
        .expect("run csvfix echo");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "\"a\",\"b\",\"c\"\n\"1\",\"2\",\"3\"\n");
}

#[test]
fn head_limits_to_requested_count() {
    let fixture = write_fixture("1\n2\n3\n4\n5\n");
    let out = csvfix()
        .args(["head", "-n", "2"])
        .arg(fixture.path())
        .output()
        .expect("run csvfix head");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "\"1\"\n\"2\"\n");
}

#[test]
fn order_reorders_fields_by_index() {
    let fixture = write_fixture("a,b,c\n");
    let out = csvfix()
        .args(["order", "-f", "3,1"])
        .arg(fixture.path())
        .output()
        .expect("run csvfix order");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "\"c\",\"a\"\n");
}

#[test]
fn order_reverse_row_then_select() {
    let fixture = write_fixture("a,b,c\n");
    let out = csvfix()
        .args(["order", "-rf", "-f", "1"])
        .arg(fixture.path())
        .output()
        .expect("run csvfix order -rf");
    assert!(out.status.success());
    // -rf reverses to c,b,a first, then -f 1 takes the first of that.
    assert_eq!(stdout(&out), "\"c\"\n");
}

#[test]
fn order_by_name_requires_ifn() {
    let fixture = write_fixture("name,age\nbob,9\n");
    let out = csvfix()
        .args(["order", "-fn", "age,name"])
        .arg(fixture.path())
        .output()
        .expect("run csvfix order -fn");
    assert!(!out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("-ifn"));
}

#[test]
fn order_by_name_with_ifn_resolves_header_and_skips_it() {
    let fixture = write_fixture("name,age\nbob,9\n");
    let out = csvfix()
        .args(["order", "-ifn", "-fn", "age,name"])
        .arg(fixture.path())
        .output()
        .expect("run csvfix order -ifn -fn");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "\"9\",\"bob\"\n");
}

#[test]
fn trim_strips_whitespace_from_all_fields_by_default() {
    let fixture = write_fixture(" a , b \n");
    let out = csvfix().arg("trim").arg(fixture.path()).output().expect("run csvfix trim");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "\"a\",\"b\"\n");
}

#[test]
fn unknown_command_reports_error_and_nonzero_exit() {
    let out = csvfix().arg("not_a_real_command").output().expect("run csvfix");
    assert!(!out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.starts_with("ERROR:"));
}

#[test]
fn help_with_no_args_lists_subcommands() {
    let out = csvfix().args(["help"]).output().expect("run csvfix help");
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("echo"));
    assert!(text.contains("order"));
}

#[test]
fn check_exits_nonzero_and_reports_offending_line_on_bad_syntax() {
    let fixture = write_fixture("1,2,3\na\"b,c\n");
    let out = csvfix().arg("check").arg(fixture.path()).output().expect("run csvfix check");
    assert!(!out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("a\"b,c"));
}

#[test]
fn check_passes_and_exits_zero_on_valid_input() {
    let fixture = write_fixture("1,2,3\n4,5,6\n");
    let out = csvfix().arg("check").arg(fixture.path()).output().expect("run csvfix check");
    assert!(out.status.success());
}

#[test]
fn check_quiet_mode_suppresses_output_and_stops_at_first_error() {
    let fixture = write_fixture("a\"b,c\nd\"e,f\n");
    let out = csvfix()
        .args(["check", "-q"])
        .arg(fixture.path())
        .output()
        .expect("run csvfix check -q");
    assert!(!out.status.success());
    assert_eq!(stdout(&out), "");
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(!err.contains("d\"e,f"));
}

#[test]
fn unambiguous_prefix_dispatches_to_the_right_command() {
    // "ech" is an unambiguous prefix of "echo" among the registered commands.
    let fixture = write_fixture("x\n");
    let out = csvfix().arg("ech").arg(fixture.path()).output().expect("run csvfix ech");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "\"x\"\n");
}

#[test]
fn validate_reports_violations_to_stderr_and_still_writes_good_rows() {
    let rules = write_fixture("1 numeric\n");
    let data = write_fixture("12\nabc\n34\n");
    let out = csvfix()
        .args(["validate", "-rules"])
        .arg(rules.path())
        .arg(data.path())
        .output()
        .expect("run csvfix validate");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "\"12\"\n\"abc\"\n\"34\"\n");
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("numeric"));
}

#[test]
fn join_matches_left_and_right_on_named_field_pair() {
    let left = write_fixture("A,1\nB,2\n");
    let right = write_fixture("1,X\n2,Y\n2,Z\n");
    let out = csvfix()
        .args(["join", "-f", "2:1"])
        .arg(left.path())
        .arg(right.path())
        .output()
        .expect("run csvfix join");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "\"A\",\"1\",\"X\"\n\"B\",\"2\",\"Y\"\n\"B\",\"2\",\"Z\"\n");
}

#[test]
fn sequence_pads_and_inserts_at_requested_position() {
    let fixture = write_fixture("a\nb\nc\n");
    let out = csvfix()
        .args(["sequence", "-p", "3", "-f", "1"])
        .arg(fixture.path())
        .output()
        .expect("run csvfix sequence");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "\"001\",\"a\"\n\"002\",\"b\"\n\"003\",\"c\"\n");
}

#[test]
fn template_expands_field_references_and_expressions() {
    let fixture = write_fixture("x,41\n");
    let tmpl = write_fixture("{1}={@$2+1}\n");
    let out = csvfix()
        .args(["template", "-ft"])
        .arg(tmpl.path())
        .arg(fixture.path())
        .output()
        .expect("run csvfix template");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "x=42\n");
}

#[test]
fn stat_reports_one_record_per_input_file() {
    let a = write_fixture("1,2\n3,4,5\n");
    let b = write_fixture("");
    let out = csvfix()
        .arg("stat")
        .arg(a.path())
        .arg(b.path())
        .output()
        .expect("run csvfix stat");
    assert!(out.status.success());
    let lines: Vec<String> = stdout(&out).lines().map(str::to_string).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], format!("\"{}\",\"2\",\"2\",\"3\"", a.path().display()));
    assert_eq!(lines[1], format!("\"{}\",\"0\",\"0\",\"0\"", b.path().display()));
}

#[test]
fn from_xml_extracts_records_into_csv_rows() {
    let xml = write_fixture(
        r#"<rows><row id="1"><name>Alice</name></row><row id="2"><name>Bob</name></row></rows>"#,
    );
    let out = csvfix()
        .args(["from_xml", "-re", "rows@row"])
        .arg(xml.path())
        .output()
        .expect("run csvfix from_xml");
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Alice"));
    assert!(text.contains("Bob"));
}
