//! The database file abstraction: one [`Document`] bound to a path.

use std::{
    collections::HashMap,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::{
    error::{Error, MissingTranslation},
    options::OpenMode,
    schema,
    state::to_muidb,
    traits::{Parser, read_decoded},
    types::{
        AddOrUpdateResult, Document, Item, NEUTRAL_LANGUAGE, Settings, Stats, TargetFile, TextItem,
    },
};

/// A MuiDB document loaded into memory.
///
/// The file is only touched by [`MuiDbFile::open`] and the save methods; no
/// handle is kept open in between.
///
/// ```rust,no_run
/// use muidb::{MuiDbFile, OpenMode};
///
/// let mut db = MuiDbFile::open("Strings.xml", OpenMode::CreateIfMissing)?;
/// db.add_or_update_string("hello", "en", "Hello", "new", Some("Greeting"))?;
/// db.validate()?;
/// db.save()?;
/// # Ok::<(), muidb::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MuiDbFile {
    path: PathBuf,
    document: Document,
    /// Item id → position in `document.items`.
    index: HashMap<String, usize>,
    /// First shape violation of the file as loaded. Loading is lenient, so
    /// this is kept until a save rewrites the file in canonical form.
    source_violation: Option<String>,
}

impl MuiDbFile {
    /// Opens the document at `path`.
    ///
    /// With [`OpenMode::CreateIfMissing`] a missing file yields an empty
    /// document; nothing is written until the first save.
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.exists() {
            return match mode {
                OpenMode::OpenExisting => Err(Error::NotFound(path.to_path_buf())),
                OpenMode::CreateIfMissing => Self::from_document(path, Document::empty()),
            };
        }

        let source = read_decoded(path)?;
        let mut file = Self::from_document(path, Document::from_str(&source)?)?;
        file.source_violation = schema::validate_str(&source).err().map(|e| match e {
            Error::MalformedDocument(message) => message,
            other => other.to_string(),
        });
        Ok(file)
    }

    /// Binds an in-memory document to `path`.
    pub fn from_document<P: AsRef<Path>>(path: P, document: Document) -> Result<Self, Error> {
        let mut file = Self {
            path: path.as_ref().to_path_buf(),
            document,
            index: HashMap::new(),
            source_violation: None,
        };
        file.rebuild_index()?;
        Ok(file)
    }

    fn rebuild_index(&mut self) -> Result<(), Error> {
        self.index.clear();
        for (position, item) in self.document.items.iter().enumerate() {
            if self.index.insert(item.id.clone(), position).is_some() {
                return Err(Error::malformed(format!("duplicate item id '{}'", item.id)));
            }
        }
        Ok(())
    }

    /// The path the document was opened from (or last saved to).
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn items(&self) -> &[Item] {
        &self.document.items
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.index.get(id).map(|&position| &self.document.items[position])
    }

    pub fn settings(&self) -> &Settings {
        &self.document.settings
    }

    /// The configured languages, in order.
    pub fn languages(&self) -> &[String] {
        &self.document.settings.languages
    }

    /// Replaces the configured languages. Tags are trimmed; blanks and
    /// repeats are dropped, keeping the first occurrence.
    pub fn set_languages<I, S>(&mut self, languages: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut unique: Vec<String> = Vec::new();
        for lang in languages {
            let lang = lang.as_ref().trim();
            if !lang.is_empty() && !unique.iter().any(|l| l == lang) {
                unique.push(lang.to_string());
            }
        }
        self.document.settings.languages = unique;
    }

    /// Appends `lang` to the configured languages if it is not there yet.
    pub(crate) fn ensure_language(&mut self, lang: &str) {
        if !lang.is_empty() && lang != NEUTRAL_LANGUAGE && !self.document.settings.has_language(lang) {
            self.document.settings.languages.push(lang.to_string());
        }
    }

    pub fn base_name(&self) -> Option<&str> {
        self.document.settings.base_name.as_deref()
    }

    /// Sets the base name; an empty string clears it.
    pub fn set_base_name(&mut self, base_name: &str) {
        self.document.settings.base_name = optional(base_name);
    }

    pub fn code_namespace(&self) -> Option<&str> {
        self.document.settings.code_namespace.as_deref()
    }

    /// Sets the code namespace; an empty string clears it.
    pub fn set_code_namespace(&mut self, code_namespace: &str) {
        self.document.settings.code_namespace = optional(code_namespace);
    }

    pub fn project_title(&self) -> Option<&str> {
        self.document.settings.project_title.as_deref()
    }

    /// Sets the project title; an empty string clears it.
    pub fn set_project_title(&mut self, project_title: &str) {
        self.document.settings.project_title = optional(project_title);
    }

    pub fn target_files(&self) -> &[TargetFile] {
        &self.document.settings.target_files
    }

    /// Adds a text to the item `id`, or overwrites the existing text for
    /// `lang`.
    ///
    /// `state` may come from any known vocabulary and is stored as its MuiDB
    /// equivalent. A blank `lang` means the neutral language. A blank
    /// `comment` leaves the item comment untouched. Languages new to the
    /// document are appended to its configured languages.
    ///
    /// Nothing is changed when `id` is blank or `state` can not be converted.
    pub fn add_or_update_string(
        &mut self,
        id: &str,
        lang: &str,
        value: &str,
        state: &str,
        comment: Option<&str>,
    ) -> Result<AddOrUpdateResult, Error> {
        let state = to_muidb(state)?;
        if id.trim().is_empty() {
            return Err(Error::InvalidArgument("item id must not be blank".to_string()));
        }
        let lang = match lang.trim() {
            "" => NEUTRAL_LANGUAGE,
            lang => lang,
        };

        let (position, result) = match self.index.get(id) {
            Some(&position) => (position, AddOrUpdateResult::Updated),
            None => {
                self.document.items.push(Item::new(id));
                let position = self.document.items.len() - 1;
                self.index.insert(id.to_string(), position);
                (position, AddOrUpdateResult::Added)
            }
        };

        let item = &mut self.document.items[position];
        let is_new_language = item
            .texts
            .insert(lang.to_string(), TextItem::new(value, state))
            .is_none();

        if let Some(comment) = comment.filter(|c| !c.trim().is_empty()) {
            item.comments
                .insert(NEUTRAL_LANGUAGE.to_string(), comment.to_string());
        }

        if is_new_language {
            self.ensure_language(lang);
        }

        Ok(result)
    }

    /// Every (item, configured language) pair without a text for that
    /// language or a neutral fallback.
    pub fn missing_translations(&self) -> Vec<MissingTranslation> {
        let languages = &self.document.settings.languages;
        self.document
            .items
            .iter()
            .flat_map(|item| {
                languages
                    .iter()
                    .filter(move |lang| item.text_for(lang).is_none())
                    .map(move |lang| MissingTranslation::new(&item.id, lang))
            })
            .collect()
    }

    /// Checks the document shape, then that every item is translated into
    /// every configured language. All missing pairs are reported at once.
    ///
    /// Until the next save, the shape check covers the file as it was read,
    /// including content the in-memory model does not keep.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(message) = &self.source_violation {
            return Err(Error::malformed(message.clone()));
        }
        schema::validate_str(&self.document.to_xml_string()?)?;

        let missing = self.missing_translations();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingTranslations(missing))
        }
    }

    /// Saves to the path the document is bound to.
    pub fn save(&mut self) -> Result<(), Error> {
        let path = self.path.clone();
        self.save_as(path)
    }

    /// Saves to `path`, which becomes the bound path. Items are written in
    /// ascending id order. The target is replaced atomically: a failed save
    /// leaves an existing file untouched.
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        self.document.sort_items();
        self.rebuild_index()?;

        write_atomically(path, &self.document)?;
        self.path = path.to_path_buf();
        self.source_violation = None;
        Ok(())
    }

    /// A detached snapshot of the current document.
    pub fn document_copy(&self) -> Document {
        self.document.clone()
    }

    pub fn stats(&self) -> Stats {
        Stats::collect(&self.document)
    }
}

fn optional(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn write_atomically(path: &Path, document: &Document) -> Result<(), Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    document.to_writer(temp.as_file_mut())?;
    temp.as_file_mut().flush()?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
