//! Options for opening a database and exporting resource files.

/// How [`crate::MuiDbFile::open`] treats a missing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// The file must exist; otherwise opening fails with [`crate::Error::NotFound`].
    #[default]
    OpenExisting,
    /// A missing file starts out as the empty document. Nothing is written
    /// until the first save.
    CreateIfMissing,
}

/// Export behavior options for [`crate::MuiDbFile::export_resx`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Orders entries by ascending id.
    pub sort_entries: bool,
    /// Writes item comments next to the values.
    pub include_comments: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            sort_entries: false,
            include_comments: true,
        }
    }
}

impl ExportOptions {
    /// Creates default export options: document order, comments included.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables/disables sorting by id.
    pub fn with_sort_entries(mut self, sort_entries: bool) -> Self {
        self.sort_entries = sort_entries;
        self
    }

    /// Enables/disables comments in the output.
    pub fn with_comments(mut self, include_comments: bool) -> Self {
        self.include_comments = include_comments;
        self
    }
}
