use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<muidb xmlns="http://github.com/fmuecke/MuiDB">
  <settings languages="de;en" base-name="Strings" project-title="cli sample">
    <target-file lang="en" designer="internal">Strings.resx</target-file>
    <target-file lang="de">Strings.de.resx</target-file>
  </settings>
  <items>
    <item id="zebra">
      <comment>animal</comment>
      <text lang="de" state="translated">Zebra</text>
      <text lang="en" state="final">Zebra</text>
    </item>
    <item id="apple">
      <text lang="de" state="new">Apfel</text>
      <text lang="en" state="reviewed">Apple</text>
    </item>
  </items>
</muidb>
"#;

const INCOMPLETE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<muidb xmlns="http://github.com/fmuecke/MuiDB">
  <settings languages="de;en" />
  <items>
    <item id="item1">
      <text lang="en" state="new">only english</text>
    </item>
  </items>
</muidb>
"#;

const XLIFF: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<xliff version="1.2" xmlns="urn:oasis:names:tc:xliff:document:1.2">
  <file original="Strings.resx" source-language="en" target-language="fr">
    <body>
      <trans-unit id="apple">
        <source>Apple</source>
        <target state="translated">Pomme</target>
        <note>fruit</note>
      </trans-unit>
      <trans-unit id="none" resname="zebra">
        <source>Zebra</source>
        <target state="final">Zèbre</target>
      </trans-unit>
    </body>
  </file>
</xliff>
"#;

fn muidb_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("muidb"))
}

fn write_sample(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_info_text_report() {
    let temp_dir = TempDir::new().unwrap();
    let db = write_sample(temp_dir.path(), "Strings.xml", SAMPLE);

    let output = muidb_cmd().args(["info", &db]).output().unwrap();
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Project: cli sample"));
    assert!(stdout.contains("items total : 2"));
    assert!(stdout.contains("# final"));
    assert!(stdout.contains(" - Strings.resx (lang=en, designer=internal Strings)"));
    assert!(stdout.contains(" - Strings.de.resx (lang=de)"));
}

#[test]
fn test_info_json_report() {
    let temp_dir = TempDir::new().unwrap();
    let db = write_sample(temp_dir.path(), "Strings.xml", SAMPLE);

    let output = muidb_cmd().args(["info", &db, "--json"]).output().unwrap();
    assert!(output.status.success());

    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["project_title"], "cli sample");
    assert_eq!(v["stats"]["items"], 2);
    assert_eq!(v["stats"]["by_state"]["final"], 1);
    assert_eq!(v["stats"]["by_state"]["new"], 1);
    assert_eq!(v["configured_languages"], serde_json::json!(["de", "en"]));
    assert_eq!(v["target_files"][0]["designer"]["is_internal"], true);
    assert!(v["target_files"][1]["designer"].is_null());
}

#[test]
fn test_info_missing_database_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.xml");

    let output = muidb_cmd()
        .args(["info", missing.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("file not found"));
}

#[test]
fn test_export_writes_all_target_files() {
    let temp_dir = TempDir::new().unwrap();
    let db = write_sample(temp_dir.path(), "Strings.xml", SAMPLE);

    let output = muidb_cmd().args(["export", &db]).output().unwrap();
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let english = fs::read_to_string(temp_dir.path().join("Strings.resx")).unwrap();
    let german = fs::read_to_string(temp_dir.path().join("Strings.de.resx")).unwrap();
    assert!(german.contains("<value>Apfel</value>"));
    assert!(english.contains("<comment>animal</comment>"));
    // sorted by id
    assert!(english.find("name=\"apple\"").unwrap() < english.find("name=\"zebra\"").unwrap());
}

#[test]
fn test_export_file_without_comments() {
    let temp_dir = TempDir::new().unwrap();
    let db = write_sample(temp_dir.path(), "Strings.xml", SAMPLE);
    let out = temp_dir.path().join("out").join("de.resx");

    let output = muidb_cmd()
        .args([
            "export-file",
            "--db",
            &db,
            "--lang",
            "de",
            "--output",
            out.to_str().unwrap(),
            "--format",
            "resx",
            "--no-comments",
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("<value>Zebra</value>"));
    assert!(!written.contains("<comment>"));
}

#[test]
fn test_export_file_unconfigured_language() {
    let temp_dir = TempDir::new().unwrap();
    let db = write_sample(temp_dir.path(), "Strings.xml", SAMPLE);
    let out = temp_dir.path().join("fr.resx");

    let output = muidb_cmd()
        .args(["export-file", "-d", &db, "-l", "fr", "-o", out.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("'fr' is not a configured language."));
    assert!(!out.exists());
}

#[test]
fn test_export_file_xliff_not_implemented() {
    let temp_dir = TempDir::new().unwrap();
    let db = write_sample(temp_dir.path(), "Strings.xml", SAMPLE);
    let out = temp_dir.path().join("de.xlf");

    let output = muidb_cmd()
        .args(["export-file", "-d", &db, "-l", "de", "-o", out.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not implemented"));
}

#[test]
fn test_import_xliff_updates_database() {
    let temp_dir = TempDir::new().unwrap();
    let db = write_sample(temp_dir.path(), "Strings.xml", SAMPLE);
    let xlf = write_sample(temp_dir.path(), "fr.xlf", XLIFF);

    let output = muidb_cmd()
        .args([
            "import-file", "--input", &xlf, "--format", "xliff", "--lang", "fr", "--db", &db,
            "--verbose",
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("updated 'zebra'"));

    let saved = fs::read_to_string(&db).unwrap();
    assert!(saved.contains(r#"languages="de;en;fr""#));
    assert!(saved.contains(r#"<text lang="fr" state="translated">Pomme</text>"#));
    assert!(saved.contains(r#"<text lang="fr" state="final">Zèbre</text>"#));
    assert!(saved.contains("<comment>fruit</comment>"));
}

#[test]
fn test_import_resx_creates_database() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_sample(temp_dir.path(), "Strings.xml", SAMPLE);
    let resx = temp_dir.path().join("Strings.en.resx");
    let status = muidb_cmd()
        .args(["export-file", "-d", &source, "-l", "en", "-o", resx.to_str().unwrap()])
        .status()
        .unwrap();
    assert!(status.success());

    let fresh = temp_dir.path().join("fresh.xml");
    let output = muidb_cmd()
        .args([
            "import-file",
            "-i",
            resx.to_str().unwrap(),
            "-l",
            "en",
            "-d",
            fresh.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "CLI failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let saved = fs::read_to_string(&fresh).unwrap();
    assert!(saved.contains(r#"languages="en""#));
    assert!(saved.contains(r#"<text lang="en" state="new">Apple</text>"#));
}

#[test]
fn test_import_rejects_bad_language() {
    let temp_dir = TempDir::new().unwrap();
    let db = write_sample(temp_dir.path(), "Strings.xml", SAMPLE);
    let xlf = write_sample(temp_dir.path(), "fr.xlf", XLIFF);

    let output = muidb_cmd()
        .args(["import-file", "-i", &xlf, "-l", "not a tag", "-d", &db])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid language code"));
    assert_eq!(fs::read_to_string(&db).unwrap(), SAMPLE);
}

#[test]
fn test_format_sorts_items() {
    let temp_dir = TempDir::new().unwrap();
    let db = write_sample(temp_dir.path(), "Strings.xml", SAMPLE);

    let status = muidb_cmd().args(["format", &db]).status().unwrap();
    assert!(status.success());

    let saved = fs::read_to_string(&db).unwrap();
    assert!(saved.find("id=\"apple\"").unwrap() < saved.find("id=\"zebra\"").unwrap());
    assert!(saved.contains(r#"project-title="cli sample""#));
}

#[test]
fn test_validate_command() {
    let temp_dir = TempDir::new().unwrap();
    let good = write_sample(temp_dir.path(), "Strings.xml", SAMPLE);
    let bad = write_sample(temp_dir.path(), "Incomplete.xml", INCOMPLETE);

    assert!(muidb_cmd().args(["validate", &good]).status().unwrap().success());

    let output = muidb_cmd().args(["validate", &bad]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .contains("'item1' misses a translation in language 'de'.")
    );
}

#[test]
fn test_validate_reports_shape_errors_of_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let db = write_sample(
        temp_dir.path(),
        "Odd.xml",
        &SAMPLE.replace("<settings ", "<settings colour=\"red\" "),
    );

    let output = muidb_cmd().args(["validate", &db]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .contains("'settings' does not allow attribute 'colour'")
    );
}

#[test]
fn test_validate_expands_globs() {
    let temp_dir = TempDir::new().unwrap();
    write_sample(temp_dir.path(), "A.xml", SAMPLE);
    write_sample(temp_dir.path(), "B.xml", SAMPLE);
    let pattern = temp_dir.path().join("*.xml");

    let status = muidb_cmd()
        .args(["validate", pattern.to_str().unwrap()])
        .status()
        .unwrap();
    assert!(status.success());

    write_sample(temp_dir.path(), "C.xml", INCOMPLETE);
    let output = muidb_cmd()
        .args(["validate", pattern.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("C.xml: 'item1' misses a translation in language 'de'."));
}
