//! Read support for XLIFF translation files.
//!
//! Units are read from `file` → `trans-unit` (groups are walked through).
//! `alt-trans` proposals inside a unit are ignored. Writing XLIFF is not
//! supported and fails with [`Error::NotImplemented`].

use std::{
    io::{BufRead, Write},
    path::Path,
};

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use serde::Serialize;

use crate::{
    error::Error,
    traits::Parser,
    xml::{attribute, read_text, skip_element},
};

/// Id some tools emit for units that are keyed by `resname` instead.
pub const PLACEHOLDER_ID: &str = "none";

/// A parsed XLIFF document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Format {
    pub version: Option<String>,
    pub files: Vec<File>,
}

/// One `file` element of an XLIFF document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct File {
    pub original: Option<String>,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub units: Vec<TransUnit>,
}

/// One translation unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TransUnit {
    pub id: String,
    pub resname: Option<String>,
    pub source: String,
    /// `None` when the unit has no `target` element.
    pub target: Option<String>,
    /// The raw `state` attribute of `target`, in the XLIFF vocabulary.
    pub target_state: Option<String>,
    pub notes: Vec<String>,
}

impl TransUnit {
    /// The key to store this unit under: its id, or its `resname` when the id
    /// is the placeholder `none`.
    pub fn key(&self) -> &str {
        match (self.id.as_str(), self.resname.as_deref()) {
            (PLACEHOLDER_ID, Some(resname)) => resname,
            (id, _) => id,
        }
    }

    /// The first note, used as the item comment on import.
    pub fn comment(&self) -> Option<&str> {
        self.notes.first().map(String::as_str)
    }
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml = Reader::from_reader(reader);
        let mut buf = Vec::new();
        let mut format = Format::default();
        let mut saw_root = false;

        loop {
            match xml.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) if !saw_root => {
                    if e.local_name().as_ref() != b"xliff" {
                        return Err(Error::malformed(format!(
                            "expected root element 'xliff', found '{}'",
                            String::from_utf8_lossy(e.local_name().as_ref())
                        )));
                    }
                    format.version = attribute(e, b"version")?;
                    saw_root = true;
                }
                Event::Start(ref e) | Event::Empty(ref e)
                    if e.local_name().as_ref() == b"file" =>
                {
                    format.files.push(File {
                        original: attribute(e, b"original")?,
                        source_language: attribute(e, b"source-language")?,
                        target_language: attribute(e, b"target-language")?,
                        units: Vec::new(),
                    });
                }
                Event::Start(ref e) if e.local_name().as_ref() == b"trans-unit" => {
                    let unit = parse_trans_unit(e, Some(&mut xml))?;
                    push_unit(&mut format, unit)?;
                }
                Event::Empty(ref e) if e.local_name().as_ref() == b"trans-unit" => {
                    let unit = parse_trans_unit::<R>(e, None)?;
                    push_unit(&mut format, unit)?;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !saw_root {
            return Err(Error::malformed("missing root element 'xliff'"));
        }

        Ok(format)
    }

    fn to_writer<W: Write>(&self, _writer: W) -> Result<(), Error> {
        Err(not_writable())
    }

    /// Fails before the target is created, so an existing file is kept.
    fn write_to<P: AsRef<Path>>(&self, _path: P) -> Result<(), Error> {
        Err(not_writable())
    }
}

fn not_writable() -> Error {
    Error::NotImplemented("writing XLIFF files is not supported".to_string())
}

fn push_unit(format: &mut Format, unit: TransUnit) -> Result<(), Error> {
    let file = format.files.last_mut().ok_or_else(|| {
        Error::malformed(format!("trans-unit '{}' outside of a 'file'", unit.id))
    })?;
    file.units.push(unit);
    Ok(())
}

/// Parses one `trans-unit`. `xml` is `None` for a self-closing element.
fn parse_trans_unit<R: BufRead>(
    e: &BytesStart<'_>,
    xml: Option<&mut Reader<R>>,
) -> Result<TransUnit, Error> {
    let mut unit = TransUnit {
        id: attribute(e, b"id")?
            .ok_or_else(|| Error::malformed("trans-unit missing 'id'"))?,
        resname: attribute(e, b"resname")?,
        ..Default::default()
    };
    let Some(xml) = xml else {
        return Ok(unit);
    };

    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref child) => match child.local_name().as_ref() {
                b"source" => unit.source = read_text(xml)?,
                b"target" => {
                    unit.target_state = attribute(child, b"state")?;
                    unit.target = Some(read_text(xml)?);
                }
                b"note" => unit.notes.push(read_text(xml)?),
                _ => skip_element(xml, child)?,
            },
            Event::Empty(ref child) => match child.local_name().as_ref() {
                b"target" => {
                    unit.target_state = attribute(child, b"state")?;
                    unit.target = Some(String::new());
                }
                b"note" => unit.notes.push(String::new()),
                _ => {}
            },
            Event::End(_) => break,
            Event::Eof => {
                return Err(Error::malformed(format!(
                    "unexpected end of file in trans-unit '{}'",
                    unit.id
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(unit)
}
