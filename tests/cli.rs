use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("dechest"))
}

const CHART_JSON: &[u8] = br#"{"meta":{"title":"Test","level":"IN 13"}}"#;
const AUDIO_BYTES: &[u8] = &[0x4F, 0x67, 0x67, 0x53, 0x00, 0x02, 0x00, 0x00];

fn write_inputs(dir: &std::path::Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let chart = dir.join("chart.json");
    let audio = dir.join("song.ogg");
    fs::write(&chart, CHART_JSON).unwrap();
    fs::write(&audio, AUDIO_BYTES).unwrap();
    (chart, audio)
}

#[test]
fn pack_creates_container() {
    let dir = tempdir().unwrap();
    let (chart, audio) = write_inputs(dir.path());
    let container = dir.path().join("song.dech");

    bin()
        .env("DECHEST_SECRET", "secret")
        .arg("pack")
        .arg(&chart)
        .arg(&audio)
        .arg("--output")
        .arg(&container)
        .assert()
        .success()
        .stdout(predicate::str::contains("packed chart"));

    let bytes = fs::read(&container).unwrap();
    assert_eq!(&bytes[..4], b"DECH");
}

#[test]
fn pack_and_unpack_roundtrip() {
    let dir = tempdir().unwrap();
    let (chart, audio) = write_inputs(dir.path());
    let container = dir.path().join("song.dech");

    bin()
        .env("DECHEST_SECRET", "secret")
        .arg("pack")
        .arg(&chart)
        .arg(&audio)
        .arg("--output")
        .arg(&container)
        .assert()
        .success();

    bin()
        .env("DECHEST_SECRET", "secret")
        .arg("unpack")
        .arg(&container)
        .assert()
        .success()
        .stdout(predicate::str::contains("unpacked chart"));

    // Defaults derive from the container path; the audio extension comes
    // from the embedded tag. The chart document is re-serialized on pack,
    // so compare parsed values rather than bytes.
    let chart_out: serde_json::Value =
        serde_json::from_slice(&fs::read(dir.path().join("song.json")).unwrap()).unwrap();
    let audio_out = fs::read(dir.path().join("song.ogg")).unwrap();

    assert_eq!(chart_out["meta"]["title"], "Test");
    assert_eq!(chart_out["meta"]["level"], "IN 13");
    assert_eq!(audio_out, AUDIO_BYTES);
}

#[test]
fn unpack_honors_explicit_output_paths() {
    let dir = tempdir().unwrap();
    let (chart, audio) = write_inputs(dir.path());
    let container = dir.path().join("song.dech");

    bin()
        .env("DECHEST_SECRET", "secret")
        .arg("pack")
        .arg(&chart)
        .arg(&audio)
        .arg("--output")
        .arg(&container)
        .assert()
        .success();

    let chart_out = dir.path().join("restored.json");
    let audio_out = dir.path().join("restored.audio");

    bin()
        .env("DECHEST_SECRET", "secret")
        .arg("unpack")
        .arg(&container)
        .arg("--chart")
        .arg(&chart_out)
        .arg("--audio")
        .arg(&audio_out)
        .assert()
        .success();

    let restored: serde_json::Value =
        serde_json::from_slice(&fs::read(chart_out).unwrap()).unwrap();
    assert_eq!(restored["meta"]["title"], "Test");
    assert_eq!(fs::read(audio_out).unwrap(), AUDIO_BYTES);
}

#[test]
fn wrong_secret_fails() {
    let dir = tempdir().unwrap();
    let (chart, audio) = write_inputs(dir.path());
    let container = dir.path().join("song.dech");

    bin()
        .env("DECHEST_SECRET", "secret")
        .arg("pack")
        .arg(&chart)
        .arg(&audio)
        .arg("--output")
        .arg(&container)
        .assert()
        .success();

    bin()
        .env("DECHEST_SECRET", "wrong_secret")
        .arg("unpack")
        .arg(&container)
        .assert()
        .failure()
        .stderr(predicate::str::contains("authentication failed"));
}

#[test]
fn tampered_container_fails() {
    let dir = tempdir().unwrap();
    let (chart, audio) = write_inputs(dir.path());
    let container = dir.path().join("song.dech");

    bin()
        .env("DECHEST_SECRET", "secret")
        .arg("pack")
        .arg(&chart)
        .arg(&audio)
        .arg("--output")
        .arg(&container)
        .assert()
        .success();

    // Flip one bit inside the ciphertext region.
    let mut bytes = fs::read(&container).unwrap();
    bytes[85] ^= 0x01;
    fs::write(&container, bytes).unwrap();

    bin()
        .env("DECHEST_SECRET", "secret")
        .arg("unpack")
        .arg(&container)
        .assert()
        .failure()
        .stderr(predicate::str::contains("authentication failed"));
}

#[test]
fn missing_secret_fails() {
    let dir = tempdir().unwrap();
    let (chart, audio) = write_inputs(dir.path());

    bin()
        .arg("pack")
        .arg(&chart)
        .arg(&audio)
        .arg("--output")
        .arg(dir.path().join("song.dech"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no secret provided"));
}

#[test]
fn secret_can_be_piped_on_stdin() {
    let dir = tempdir().unwrap();
    let (chart, audio) = write_inputs(dir.path());
    let container = dir.path().join("song.dech");

    bin()
        .arg("pack")
        .arg(&chart)
        .arg(&audio)
        .arg("--output")
        .arg(&container)
        .write_stdin("secret\n")
        .assert()
        .success();

    bin()
        .env("DECHEST_SECRET", "secret")
        .arg("unpack")
        .arg(&container)
        .assert()
        .success();
}

#[test]
fn info_shows_header_fields() {
    let dir = tempdir().unwrap();
    let (chart, audio) = write_inputs(dir.path());
    let container = dir.path().join("song.dech");

    bin()
        .env("DECHEST_SECRET", "secret")
        .arg("pack")
        .arg(&chart)
        .arg(&audio)
        .arg("--output")
        .arg(&container)
        .assert()
        .success();

    // No secret needed: info reads only the cleartext header.
    bin()
        .arg("info")
        .arg(&container)
        .assert()
        .success()
        .stdout(predicate::str::contains("version    1.1"));
}

#[test]
fn info_rejects_non_container() {
    let dir = tempdir().unwrap();
    let junk = dir.path().join("junk.dech");
    fs::write(&junk, vec![0u8; 200]).unwrap();

    bin()
        .arg("info")
        .arg(&junk)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad magic"));
}

#[test]
fn malformed_chart_document_fails_to_pack() {
    let dir = tempdir().unwrap();
    let chart = dir.path().join("chart.json");
    let audio = dir.path().join("song.ogg");
    fs::write(&chart, b"{not json").unwrap();
    fs::write(&audio, AUDIO_BYTES).unwrap();

    bin()
        .env("DECHEST_SECRET", "secret")
        .arg("pack")
        .arg(&chart)
        .arg(&audio)
        .arg("--output")
        .arg(dir.path().join("song.dech"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}
