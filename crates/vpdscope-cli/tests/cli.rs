use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("vpdscope"))
}

fn repo_root() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root")
        .to_path_buf()
}

fn sample_capture() -> std::path::PathBuf {
    repo_root().join("tests").join("fixtures").join("sas_disk")
}

#[test]
fn help_lists_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("decode").and(contains("pages")));
    cmd().arg("decode").arg("--help").assert().success();
}

#[test]
fn pages_enumerates_acronyms() {
    cmd()
        .arg("pages")
        .assert()
        .success()
        .stdout(contains("Standard VPD pages:").and(contains("di_lu")));
}

#[test]
fn pages_json_lists_every_entry() {
    let assert = cmd().arg("pages").arg("--json").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["pages"].as_array().map(Vec::len), Some(25));
}

#[test]
fn default_page_is_supported_pages() {
    cmd()
        .arg("decode")
        .arg(sample_capture())
        .assert()
        .success()
        .stdout(contains("Supported VPD pages VPD page:").and(contains("Unit serial number [sn]")));
}

#[test]
fn serial_number_by_acronym() {
    cmd()
        .arg("decode")
        .arg(sample_capture())
        .arg("-p")
        .arg("sn")
        .assert()
        .success()
        .stdout("Unit serial number VPD page:\n  Unit serial number: Z1Z0ABCD\n");
}

#[test]
fn double_ident_prints_logical_unit_designator() {
    cmd()
        .arg("decode")
        .arg(sample_capture())
        .arg("-ii")
        .assert()
        .success()
        .stdout("0x5000c50012345678\n");
}

#[test]
fn quiet_device_identification_pairs_target_port() {
    cmd()
        .arg("decode")
        .arg(sample_capture())
        .arg("-p")
        .arg("0x83,2")
        .arg("-q")
        .assert()
        .success()
        .stdout("0x5000c50012345679,0x1\n");
}

#[test]
fn raw_writes_response_unchanged() {
    let expected = std::fs::read(sample_capture().join("vpd_80.bin")).expect("fixture");
    let assert = cmd()
        .arg("decode")
        .arg(sample_capture())
        .arg("-p")
        .arg("128")
        .arg("-r")
        .assert()
        .success();
    assert_eq!(assert.get_output().stdout, expected);
}

#[test]
fn hex_and_raw_conflict() {
    cmd()
        .arg("decode")
        .arg(sample_capture())
        .arg("-H")
        .arg("-r")
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn json_report_for_device_identification() {
    let assert = cmd()
        .arg("decode")
        .arg(sample_capture())
        .arg("-p")
        .arg("di")
        .arg("--json")
        .arg("--pretty")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["report_version"], 1);
    assert_eq!(value["pages"][0]["page_code"], 0x83);
    assert_eq!(value["pages"][0]["acronym"], "di");
    assert!(value.get("failures").is_none());
}

#[test]
fn unknown_acronym_shows_hint() {
    cmd()
        .arg("decode")
        .arg(sample_capture())
        .arg("-p")
        .arg("nope")
        .assert()
        .failure()
        .stderr(contains("doesn't match a VPD page").and(contains("vpdscope pages")));
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    cmd()
        .arg("decode")
        .arg(temp.path().join("missing"))
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn missing_page_file_fails() {
    cmd()
        .arg("decode")
        .arg(sample_capture())
        .arg("-p")
        .arg("mpp")
        .assert()
        .failure()
        .stderr(contains("decoding VPD page 0x87 failed"));
}

#[test]
fn standard_inquiry_response_is_rejected() {
    let temp = TempDir::new().expect("tempdir");
    let mut standard = vec![0x00, 0x00, 0x05, 0x02, 0x5b, 0x00, 0x00, 0x02];
    standard.extend_from_slice(b"ACME    DISK            0001");
    let capture = temp.path().join("inquiry.bin");
    std::fs::write(&capture, standard).expect("write capture");

    cmd()
        .arg("decode")
        .arg(&capture)
        .arg("-p")
        .arg("sn")
        .arg("-v")
        .assert()
        .failure()
        .stderr(
            contains("probably a STANDARD INQUIRY response")
                .and(contains("First 32 bytes of bad response")),
        );
}

#[test]
fn glob_pattern_matching_one_capture() {
    let pattern = repo_root().join("tests").join("fixtures").join("sas_*");
    cmd()
        .arg("decode")
        .arg(pattern)
        .arg("-p")
        .arg("sn")
        .assert()
        .success()
        .stdout(contains("Z1Z0ABCD"));
}

#[test]
fn glob_pattern_matching_several_captures_fails() {
    let temp = TempDir::new().expect("tempdir");
    std::fs::write(temp.path().join("a.bin"), [0u8, 0x80, 0, 0]).expect("write a");
    std::fs::write(temp.path().join("b.bin"), [0u8, 0x80, 0, 0]).expect("write b");

    cmd()
        .arg("decode")
        .arg(temp.path().join("*.bin"))
        .assert()
        .failure()
        .stderr(contains("multiple captures match pattern"));
}
