//! Import and export between a [`MuiDbFile`] and exchange files.

use std::path::{Path, PathBuf};

use crate::{
    error::{Error, MissingTranslation},
    formats::{FormatType, ResxEntry, XliffFormat},
    options::ExportOptions,
    state::{MuiDbState, to_muidb},
    store::MuiDbFile,
    traits::Parser,
    types::ImportResult,
};

impl MuiDbFile {
    /// The ResX entries for `lang`, without writing them anywhere.
    ///
    /// Texts fall back to the neutral language. Fails with
    /// [`Error::UnconfiguredLanguage`] for a language the document does not
    /// list, and with [`Error::MissingTranslations`] naming every item that
    /// has no text for it.
    pub fn resx_entries(&self, lang: &str, options: &ExportOptions) -> Result<Vec<ResxEntry>, Error> {
        if !self.settings().has_language(lang) {
            return Err(Error::UnconfiguredLanguage(lang.to_string()));
        }

        let mut entries = Vec::with_capacity(self.items().len());
        let mut missing = Vec::new();

        for item in self.items() {
            match item.text_for(lang) {
                Some(text) => {
                    let comment = if options.include_comments {
                        item.comment_for(lang).map(str::to_string)
                    } else {
                        None
                    };
                    entries.push(ResxEntry::new(&item.id, &text.value, comment));
                }
                None => missing.push(MissingTranslation::new(&item.id, lang)),
            }
        }

        if !missing.is_empty() {
            return Err(Error::MissingTranslations(missing));
        }

        if options.sort_entries {
            // Stable; the empty id sorts first.
            entries.sort_by(|a, b| a.id.cmp(&b.id));
        }

        Ok(entries)
    }

    /// Writes the texts for `lang` into a ResX file. Nothing is written when
    /// the export fails.
    pub fn export_resx<P: AsRef<Path>>(
        &self,
        path: P,
        lang: &str,
        options: &ExportOptions,
    ) -> Result<(), Error> {
        self.resx_entries(lang, options)?.write_to(path)
    }

    /// Imports every entry of a ResX file as a `new` text in `lang`.
    ///
    /// `lang` is added to the configured languages even when the file is
    /// empty. Entries with a blank name are rejected before anything changes.
    pub fn import_resx<P: AsRef<Path>>(&mut self, path: P, lang: &str) -> Result<ImportResult, Error> {
        let entries = Vec::<ResxEntry>::read_from(path)?;
        self.import_resx_entries(&entries, lang)
    }

    pub fn import_resx_entries(
        &mut self,
        entries: &[ResxEntry],
        lang: &str,
    ) -> Result<ImportResult, Error> {
        if let Some(entry) = entries.iter().find(|e| e.id.trim().is_empty()) {
            return Err(Error::InvalidArgument(format!(
                "resource with value '{}' has a blank name",
                entry.value
            )));
        }

        let mut result = ImportResult::default();
        for entry in entries {
            let outcome = self.add_or_update_string(
                &entry.id,
                lang,
                &entry.value,
                MuiDbState::New.as_str(),
                entry.comment.as_deref(),
            )?;
            result.record(&entry.id, outcome);
        }

        self.ensure_language(lang.trim());
        Ok(result)
    }

    /// Imports the translation units of the first `file` of an XLIFF file
    /// into `lang`.
    ///
    /// Target states are converted to MuiDB states; a unit without a state
    /// imports as `new`, a unit without a target is skipped. All states are
    /// checked before the document is changed.
    pub fn import_xliff<P: AsRef<Path>>(&mut self, path: P, lang: &str) -> Result<ImportResult, Error> {
        let format = XliffFormat::read_from(path)?;
        self.import_xliff_format(&format, lang)
    }

    pub fn import_xliff_format(
        &mut self,
        format: &XliffFormat,
        lang: &str,
    ) -> Result<ImportResult, Error> {
        let units = format.files.first().map(|f| f.units.as_slice()).unwrap_or_default();

        let mut pending = Vec::with_capacity(units.len());
        for unit in units {
            let Some(target) = unit.target.as_deref() else {
                continue;
            };
            let state = match unit.target_state.as_deref() {
                Some(state) => to_muidb(state)?,
                None => MuiDbState::New,
            };
            if unit.key().trim().is_empty() {
                return Err(Error::InvalidArgument(format!(
                    "trans-unit '{}' has no usable id",
                    unit.id
                )));
            }
            pending.push((unit.key(), target, state, unit.comment()));
        }

        let mut result = ImportResult::default();
        for (id, target, state, comment) in pending {
            let outcome = self.add_or_update_string(id, lang, target, state.as_str(), comment)?;
            result.record(id, outcome);
        }

        self.ensure_language(lang.trim());
        Ok(result)
    }

    /// Imports `path` as `format`.
    pub fn import_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        format: FormatType,
        lang: &str,
    ) -> Result<ImportResult, Error> {
        match format {
            FormatType::Resx => self.import_resx(path, lang),
            FormatType::Xliff => self.import_xliff(path, lang),
        }
    }

    /// Exports `lang` into `path` as `format`.
    pub fn export_file<P: AsRef<Path>>(
        &self,
        path: P,
        format: FormatType,
        lang: &str,
        options: &ExportOptions,
    ) -> Result<(), Error> {
        if !format.is_writable() {
            return Err(Error::NotImplemented(format!(
                "exporting {} files is not supported",
                format
            )));
        }
        self.export_resx(path, lang, options)
    }

    /// Exports every declared target file, sorted, resolving relative paths
    /// against `base_dir`. Returns the written paths in declaration order.
    pub fn export_target_files<P: AsRef<Path>>(&self, base_dir: P) -> Result<Vec<PathBuf>, Error> {
        let options = ExportOptions::new().with_sort_entries(true);
        let mut written = Vec::with_capacity(self.target_files().len());

        for target in self.target_files() {
            let path = base_dir.as_ref().join(&target.path);
            self.export_resx(&path, &target.lang, &options)?;
            written.push(path);
        }

        Ok(written)
    }
}
