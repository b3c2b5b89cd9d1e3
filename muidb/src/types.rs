//! Core types of a MuiDB document.
//!
//! A [`Document`] is a plain value: its [`Settings`] plus the ordered list of
//! [`Item`]s. The store owns one and hands out clones, so a snapshot never
//! aliases the live document.

use std::{
    collections::{BTreeMap, HashSet},
    fmt::Display,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::state::MuiDbState;

/// Language marker for texts and comments that apply to every language.
pub const NEUTRAL_LANGUAGE: &str = "*";

/// One localizable unit: an id, its texts per language, and a comment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Item {
    /// Unique key of the item within its document.
    pub id: String,

    /// Language tag (or [`NEUTRAL_LANGUAGE`]) → text.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub texts: BTreeMap<String, TextItem>,

    /// Language tag → comment. Documents only ever populate the neutral key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub comments: BTreeMap<String, String>,
}

impl Item {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Text for `lang`, falling back to the neutral text.
    pub fn text_for(&self, lang: &str) -> Option<&TextItem> {
        self.texts
            .get(lang)
            .or_else(|| self.texts.get(NEUTRAL_LANGUAGE))
    }

    /// Comment for `lang`, falling back to the neutral comment.
    pub fn comment_for(&self, lang: &str) -> Option<&str> {
        self.comments
            .get(lang)
            .or_else(|| self.comments.get(NEUTRAL_LANGUAGE))
            .map(String::as_str)
    }

    /// The single item comment.
    pub fn comment(&self) -> Option<&str> {
        self.comments.get(NEUTRAL_LANGUAGE).map(String::as_str)
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Item {{ id: {}, languages: [{}] }}",
            self.id,
            self.texts.keys().cloned().collect::<Vec<_>>().join(", ")
        )
    }
}

/// A text in one language together with its workflow state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct TextItem {
    pub value: String,
    pub state: MuiDbState,
}

impl TextItem {
    pub fn new(value: impl Into<String>, state: MuiDbState) -> Self {
        Self {
            value: value.into(),
            state,
        }
    }
}

/// Visibility of a generated designer class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignerVisibility {
    Internal,
    Public,
}

impl DesignerVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            DesignerVisibility::Internal => "internal",
            DesignerVisibility::Public => "public",
        }
    }

    /// Any value other than `internal` or `public` means "no designer".
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "internal" => Some(DesignerVisibility::Internal),
            "public" => Some(DesignerVisibility::Public),
            _ => None,
        }
    }
}

/// A resource file that the document is exported into.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TargetFile {
    /// Output path, relative to the document's directory.
    pub path: String,
    pub lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designer: Option<DesignerVisibility>,
}

impl TargetFile {
    /// Resolves the designer class declared for this target, if any.
    ///
    /// The class is named after the document's base name, or after the
    /// target's file stem when no base name is set.
    pub fn designer_file(&self, settings: &Settings) -> Option<DesignerFile> {
        let visibility = self.designer?;
        let class_name = match settings.base_name.as_deref() {
            Some(base) if !base.trim().is_empty() => base.to_string(),
            _ => Path::new(&self.path)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string(),
        };

        Some(DesignerFile {
            class_name,
            namespace: settings.code_namespace.clone(),
            is_internal: visibility == DesignerVisibility::Internal,
        })
    }
}

/// The strongly typed resource class generated next to a target file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DesignerFile {
    pub class_name: String,
    pub namespace: Option<String>,
    pub is_internal: bool,
}

/// Document-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Settings {
    /// Configured language tags, in order.
    #[serde(default)]
    pub languages: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_title: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_files: Vec<TargetFile>,
}

impl Settings {
    /// Splits a `;`-delimited language list. Entries are trimmed; empty ones
    /// are dropped.
    pub fn parse_languages(raw: &str) -> Vec<String> {
        raw.split(';')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The `;`-delimited form of [`Settings::languages`].
    pub fn languages_attribute(&self) -> String {
        self.languages.join(";")
    }

    pub fn has_language(&self, lang: &str) -> bool {
        self.languages.iter().any(|l| l == lang)
    }
}

/// One localization database: settings plus items.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Document {
    pub settings: Settings,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Document {
    /// The skeleton used for a database that does not exist yet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Orders items by ascending id.
    pub fn sort_items(&mut self) {
        self.items.sort_by(|a, b| a.id.cmp(&b.id));
    }
}

/// Outcome of a single add-or-update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddOrUpdateResult {
    Added,
    Updated,
}

/// Ids touched by an import, split by whether the item was new.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ImportResult {
    pub added: Vec<String>,
    pub updated: Vec<String>,
}

impl ImportResult {
    pub(crate) fn record(&mut self, id: &str, result: AddOrUpdateResult) {
        match result {
            AddOrUpdateResult::Added => self.added.push(id.to_string()),
            AddOrUpdateResult::Updated => self.updated.push(id.to_string()),
        }
    }

    pub fn total(&self) -> usize {
        self.added.len() + self.updated.len()
    }
}

/// Counts over a whole document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    pub items: usize,
    /// Distinct language keys used by texts, the neutral marker included.
    pub languages: usize,
    pub comments: usize,
    pub by_state: BTreeMap<MuiDbState, usize>,
}

impl Stats {
    pub fn collect(document: &Document) -> Self {
        let mut stats = Stats {
            items: document.items.len(),
            by_state: MuiDbState::enumerate().map(|s| (s, 0)).collect(),
            ..Default::default()
        };
        let mut languages = HashSet::new();

        for item in &document.items {
            stats.comments += item.comments.len();
            for (lang, text) in &item.texts {
                languages.insert(lang.as_str());
                *stats.by_state.entry(text.state).or_insert(0) += 1;
            }
        }
        stats.languages = languages.len();

        stats
    }

    pub fn count(&self, state: MuiDbState) -> usize {
        self.by_state.get(&state).copied().unwrap_or(0)
    }
}
