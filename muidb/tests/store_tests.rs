use muidb::document::EMPTY_DOCUMENT;
use muidb::traits::Parser;
use muidb::{
    AddOrUpdateResult, DesignerVisibility, Document, Error, MissingTranslation, MuiDbFile,
    MuiDbState, OpenMode,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

/// Copies a fixture into a scratch directory so tests may save over it.
fn scratch_copy(name: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    fs::copy(data_dir().join(name), &path).unwrap();
    (dir, path)
}

#[test]
fn test_open_sample_settings() {
    let db = MuiDbFile::open(data_dir().join("Sample.xml"), OpenMode::OpenExisting).unwrap();

    assert_eq!(db.languages(), ["de", "en"]);
    assert_eq!(db.base_name(), Some("Strings"));
    assert_eq!(db.code_namespace(), Some("Sample.App"));
    assert_eq!(db.project_title(), Some("test sample"));
    assert_eq!(db.items().len(), 4);

    let targets = db.target_files();
    assert_eq!(targets.len(), 3);
    assert_eq!(targets[0].path, "Strings.resx");
    assert_eq!(targets[0].designer, Some(DesignerVisibility::Public));
    assert_eq!(targets[1].lang, "de");
    assert_eq!(targets[1].designer, None);
    assert_eq!(targets[2].designer, None);

    let designer = targets[0].designer_file(db.settings()).unwrap();
    assert_eq!(designer.class_name, "Strings");
    assert_eq!(designer.namespace.as_deref(), Some("Sample.App"));
    assert!(!designer.is_internal);
}

#[test]
fn test_open_sample_items() {
    let db = MuiDbFile::open(data_dir().join("Sample.xml"), OpenMode::OpenExisting).unwrap();

    let zebra = db.item("zebra").unwrap();
    assert_eq!(zebra.comment(), Some("last in line"));
    assert_eq!(zebra.texts["de"].state, MuiDbState::Translated);

    let everywhere = db.item("everywhere").unwrap();
    assert_eq!(everywhere.text_for("de").unwrap().value, "OK");
    assert_eq!(everywhere.text_for("fr").unwrap().value, "OK");

    let markup = db.item("markup").unwrap();
    assert_eq!(markup.texts["de"].value, "<b>Fett</b>\nzweite Zeile");
    assert_eq!(markup.texts["en"].state, MuiDbState::New);
    assert_eq!(markup.comment(), Some("contains markup & line breaks"));
}

#[test]
fn test_validate_checks_file_as_loaded() {
    let (dir, path) = scratch_copy("Sample.xml");
    let mut db = MuiDbFile::open(&path, OpenMode::OpenExisting).unwrap();

    // loads leniently, but the file carries an unknown designer value
    match db.validate() {
        Err(Error::MalformedDocument(message)) => {
            assert!(message.contains("invalid designer 'bogus'"), "{message}")
        }
        other => panic!("unexpected result: {:?}", other),
    }

    // saving rewrites the file in canonical form
    db.save_as(dir.path().join("Canonical.xml")).unwrap();
    db.validate().unwrap();
    MuiDbFile::open(dir.path().join("Canonical.xml"), OpenMode::OpenExisting)
        .unwrap()
        .validate()
        .unwrap();
}

#[test]
fn test_validate_reports_violations_dropped_on_load() {
    let db = MuiDbFile::open(data_dir().join("SchemaViolations.xml"), OpenMode::OpenExisting)
        .unwrap();
    assert_eq!(db.item("a").unwrap().comment(), Some("late"));

    match db.validate() {
        Err(Error::MalformedDocument(message)) => {
            assert_eq!(message, "'settings' does not allow attribute 'colour'")
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_validate_rejects_comment_after_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("late-comment.xml");
    fs::write(
        &path,
        r#"<?xml version="1.0" encoding="utf-8"?>
<muidb xmlns="http://github.com/fmuecke/MuiDB">
  <settings languages="en" />
  <items>
    <item id="a">
      <text lang="en" state="new">x</text>
      <comment>late</comment>
    </item>
  </items>
</muidb>
"#,
    )
    .unwrap();

    let db = MuiDbFile::open(&path, OpenMode::OpenExisting).unwrap();
    match db.validate() {
        Err(Error::MalformedDocument(message)) => {
            assert_eq!(message, "the comment of item 'a' must be its first child")
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_duplicate_language_is_malformed() {
    let err = MuiDbFile::open(data_dir().join("DuplicateLanguage.xml"), OpenMode::OpenExisting)
        .unwrap_err();
    match err {
        Error::MalformedDocument(message) => {
            assert_eq!(message, "Item 'twice' has multiple entries for language 'de'.")
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_validate_reports_every_missing_translation() {
    let db = MuiDbFile::open(
        data_dir().join("MissingTranslations.xml"),
        OpenMode::OpenExisting,
    )
    .unwrap();

    let err = db.validate().unwrap_err();
    let mut missing = err.missing_translations().unwrap().to_vec();
    missing.sort();
    assert_eq!(
        missing,
        [
            MissingTranslation::new("item1", "de"),
            MissingTranslation::new("item2", "en"),
        ]
    );
    assert!(err.to_string().contains("'item1' misses a translation in language 'de'."));
}

#[test]
fn test_empty_store_matches_skeleton() {
    let dir = TempDir::new().unwrap();
    let db = MuiDbFile::open(dir.path().join("new.xml"), OpenMode::CreateIfMissing).unwrap();

    assert!(db.items().is_empty());
    assert!(db.target_files().is_empty());
    assert!(db.languages().is_empty());
    assert_eq!(db.document_copy(), Document::from_str(EMPTY_DOCUMENT).unwrap());
}

#[test]
fn test_add_update_and_language_growth() {
    let dir = TempDir::new().unwrap();
    let mut db = MuiDbFile::open(dir.path().join("new.xml"), OpenMode::CreateIfMissing).unwrap();

    assert_eq!(
        db.add_or_update_string("id", "de", "text", "new", None).unwrap(),
        AddOrUpdateResult::Added
    );
    assert_eq!(db.languages(), ["de"]);

    assert_eq!(
        db.add_or_update_string("id", "de", "Text", "final", None).unwrap(),
        AddOrUpdateResult::Updated
    );
    let item = db.item("id").unwrap();
    assert_eq!(item.texts.len(), 1);
    assert_eq!(item.texts["de"].value, "Text");
    assert_eq!(item.texts["de"].state, MuiDbState::Final);
}

#[test]
fn test_save_writes_sorted_items_and_reloads() {
    let (_dir, path) = scratch_copy("Sample.xml");
    let mut db = MuiDbFile::open(&path, OpenMode::OpenExisting).unwrap();
    db.add_or_update_string("banana", "de", "Banane", "translated", Some("new fruit"))
        .unwrap();
    db.add_or_update_string("banana", "en", "Banana", "translated", None)
        .unwrap();
    db.save().unwrap();

    let written = fs::read_to_string(&path).unwrap();
    let positions: Vec<_> = ["apple", "banana", "everywhere", "markup", "zebra"]
        .iter()
        .map(|id| written.find(&format!("id=\"{}\"", id)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    muidb::schema::validate_str(&written).unwrap();

    let reloaded = MuiDbFile::open(&path, OpenMode::OpenExisting).unwrap();
    assert_eq!(reloaded.document_copy(), db.document_copy());
    assert_eq!(reloaded.project_title(), Some("test sample"));
    assert_eq!(reloaded.target_files(), db.target_files());
}

#[test]
fn test_format_is_stable() {
    let (_dir, path) = scratch_copy("Sample.xml");
    let mut db = MuiDbFile::open(&path, OpenMode::OpenExisting).unwrap();
    db.save().unwrap();
    let first = fs::read_to_string(&path).unwrap();

    let mut db = MuiDbFile::open(&path, OpenMode::OpenExisting).unwrap();
    db.save().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), first);
}

#[test]
fn test_utf16_document_is_decoded() {
    let source = fs::read_to_string(data_dir().join("MissingTranslations.xml")).unwrap();
    let mut bytes = vec![0xFF, 0xFE];
    for unit in source.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("utf16.xml");
    fs::write(&path, bytes).unwrap();

    let db = MuiDbFile::open(&path, OpenMode::OpenExisting).unwrap();
    assert_eq!(db.items().len(), 2);
    assert_eq!(db.item("item2").unwrap().texts["de"].value, "nur deutsch");
}

#[test]
fn test_not_found() {
    let err = MuiDbFile::open(data_dir().join("Missing.xml"), OpenMode::OpenExisting).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
