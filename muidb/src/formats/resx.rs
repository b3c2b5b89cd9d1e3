//! Support for .NET `.resx` resource files.
//!
//! Only string resources are handled: `data` elements carrying a `type` or
//! `mimetype` attribute (file references, binary payloads) are skipped on read.
//! Carriage returns are dropped on read; line feeds become the platform line
//! ending on write.

use std::io::{BufRead, Write};

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde::Serialize;

use crate::{
    error::Error,
    traits::Parser,
    xml::{attribute, read_text, skip_element},
};

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

const RESHEADERS: [(&str, &str); 4] = [
    ("resmimetype", "text/microsoft-resx"),
    ("version", "2.0"),
    (
        "reader",
        "System.Resources.ResXResourceReader, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089",
    ),
    (
        "writer",
        "System.Resources.ResXResourceWriter, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089",
    ),
];

/// One string resource: key, value and optional translator comment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResxEntry {
    pub id: String,
    pub value: String,
    pub comment: Option<String>,
}

impl ResxEntry {
    pub fn new(id: impl Into<String>, value: impl Into<String>, comment: Option<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            comment,
        }
    }
}

impl Parser for Vec<ResxEntry> {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml = Reader::from_reader(reader);
        let mut buf = Vec::new();
        let mut entries = Vec::new();

        loop {
            match xml.read_event_into(&mut buf)? {
                Event::Start(ref e) if e.local_name().as_ref() == b"data" => {
                    if let Some(entry) = parse_data(e, &mut xml)? {
                        entries.push(entry);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(entries)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml = Writer::new_with_indent(&mut writer, b' ', 2);

        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml.write_event(Event::Start(BytesStart::new("root")))?;

        for (name, value) in RESHEADERS {
            let mut elem = BytesStart::new("resheader");
            elem.push_attribute(("name", name));
            xml.write_event(Event::Start(elem))?;
            write_leaf(&mut xml, "value", value)?;
            xml.write_event(Event::End(BytesEnd::new("resheader")))?;
        }

        for entry in self {
            let mut elem = BytesStart::new("data");
            elem.push_attribute(("name", entry.id.as_str()));
            elem.push_attribute(("xml:space", "preserve"));
            xml.write_event(Event::Start(elem))?;
            write_leaf(&mut xml, "value", &to_platform_newlines(&entry.value))?;
            if let Some(comment) = entry.comment.as_deref().filter(|c| !c.trim().is_empty()) {
                write_leaf(&mut xml, "comment", &to_platform_newlines(comment))?;
            }
            xml.write_event(Event::End(BytesEnd::new("data")))?;
        }

        xml.write_event(Event::End(BytesEnd::new("root")))?;
        writer.write_all(LINE_ENDING.as_bytes())?;
        Ok(())
    }
}

fn write_leaf<W: Write>(xml: &mut Writer<W>, name: &str, text: &str) -> Result<(), Error> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn to_platform_newlines(text: &str) -> String {
    text.replace('\n', LINE_ENDING)
}

fn strip_carriage_returns(text: String) -> String {
    if text.contains('\r') {
        text.replace('\r', "")
    } else {
        text
    }
}

fn parse_data<R: BufRead>(
    e: &BytesStart<'_>,
    xml: &mut Reader<R>,
) -> Result<Option<ResxEntry>, Error> {
    let id = attribute(e, b"name")?
        .ok_or_else(|| Error::malformed("data element missing 'name'"))?;

    if attribute(e, b"type")?.is_some() || attribute(e, b"mimetype")?.is_some() {
        skip_element(xml, e)?;
        return Ok(None);
    }

    let mut buf = Vec::new();
    let mut value = String::new();
    let mut comment = None;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref child) if child.local_name().as_ref() == b"value" => {
                value = strip_carriage_returns(read_text(xml)?);
            }
            Event::Start(ref child) if child.local_name().as_ref() == b"comment" => {
                comment = Some(strip_carriage_returns(read_text(xml)?));
            }
            Event::Start(ref child) => skip_element(xml, child)?,
            Event::End(_) => break,
            Event::Eof => {
                return Err(Error::malformed(format!(
                    "unexpected end of file in data '{}'",
                    id
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(Some(ResxEntry { id, value, comment }))
}
