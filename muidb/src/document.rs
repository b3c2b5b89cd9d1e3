//! XML representation of a MuiDB [`Document`].
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <muidb xmlns="http://github.com/fmuecke/MuiDB">
//!   <settings languages="de;en" base-name="Strings" code-namespace="My.App" project-title="Demo">
//!     <target-file lang="en" designer="public">Strings.resx</target-file>
//!   </settings>
//!   <items>
//!     <item id="hello">
//!       <comment>Greeting on the start page</comment>
//!       <text lang="de" state="translated">Hallo</text>
//!       <text lang="en" state="final">Hello</text>
//!     </item>
//!   </items>
//! </muidb>
//! ```
//!
//! Reading is lenient about elements it does not know; [`crate::schema`]
//! checks the strict shape.

use std::{
    collections::HashSet,
    io::{BufRead, Write},
    str::FromStr,
};

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    error::Error,
    state::MuiDbState,
    traits::Parser,
    types::{DesignerVisibility, Document, Item, NEUTRAL_LANGUAGE, Settings, TargetFile, TextItem},
    xml::{attribute, read_text},
};

/// XML namespace of MuiDB documents.
pub const NAMESPACE: &str = "http://github.com/fmuecke/MuiDB";

/// The serialized form of [`Document::empty`].
pub const EMPTY_DOCUMENT: &str = r#"<muidb xmlns="http://github.com/fmuecke/MuiDB"><settings base-name="" languages="" /><items /></muidb>"#;

pub(crate) const ROOT: &[u8] = b"muidb";
pub(crate) const SETTINGS: &[u8] = b"settings";
pub(crate) const TARGET_FILE: &[u8] = b"target-file";
pub(crate) const ITEMS: &[u8] = b"items";
pub(crate) const ITEM: &[u8] = b"item";
pub(crate) const TEXT: &[u8] = b"text";
pub(crate) const COMMENT: &[u8] = b"comment";

pub(crate) const LANGUAGES: &[u8] = b"languages";
pub(crate) const BASE_NAME: &[u8] = b"base-name";
pub(crate) const CODE_NAMESPACE: &[u8] = b"code-namespace";
pub(crate) const PROJECT_TITLE: &[u8] = b"project-title";
pub(crate) const ID: &[u8] = b"id";
pub(crate) const LANG: &[u8] = b"lang";
pub(crate) const STATE: &[u8] = b"state";
pub(crate) const DESIGNER: &[u8] = b"designer";

impl Parser for Document {
    /// Parse from any reader.
    ///
    /// Fails with [`Error::MalformedDocument`] when the root is not `muidb`,
    /// when two items share an id, when an item has two texts for the same
    /// language, or when a text carries a state outside the MuiDB vocabulary.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml = Reader::from_reader(reader);
        let mut buf = Vec::new();
        let mut document = Document::empty();
        let mut ids = HashSet::new();
        let mut saw_root = false;

        loop {
            match xml.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) if !saw_root => {
                    if e.local_name().as_ref() != ROOT {
                        return Err(Error::malformed(format!(
                            "expected root element 'muidb', found '{}'",
                            String::from_utf8_lossy(e.local_name().as_ref())
                        )));
                    }
                    saw_root = true;
                }
                Event::Start(ref e) if e.local_name().as_ref() == SETTINGS => {
                    read_settings_attributes(e, &mut document.settings)?;
                    parse_settings_children(&mut xml, &mut document.settings)?;
                }
                Event::Empty(ref e) if e.local_name().as_ref() == SETTINGS => {
                    read_settings_attributes(e, &mut document.settings)?;
                }
                Event::Start(ref e) if e.local_name().as_ref() == ITEM => {
                    let item = parse_item(e, Some(&mut xml))?;
                    push_item(&mut document, &mut ids, item)?;
                }
                Event::Empty(ref e) if e.local_name().as_ref() == ITEM => {
                    let item = parse_item::<R>(e, None)?;
                    push_item(&mut document, &mut ids, item)?;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !saw_root {
            return Err(Error::malformed("missing root element 'muidb'"));
        }

        Ok(document)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml = Writer::new_with_indent(&mut writer, b' ', 2);

        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut root = BytesStart::new("muidb");
        root.push_attribute(("xmlns", NAMESPACE));
        xml.write_event(Event::Start(root))?;

        write_settings(&mut xml, &self.settings)?;

        if self.items.is_empty() {
            xml.write_event(Event::Empty(BytesStart::new("items")))?;
        } else {
            xml.write_event(Event::Start(BytesStart::new("items")))?;
            for item in &self.items {
                write_item(&mut xml, item)?;
            }
            xml.write_event(Event::End(BytesEnd::new("items")))?;
        }

        xml.write_event(Event::End(BytesEnd::new("muidb")))?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl Document {
    /// Serializes the document into an XML string.
    pub fn to_xml_string(&self) -> Result<String, Error> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        String::from_utf8(out).map_err(|e| Error::malformed(e.to_string()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn read_settings_attributes(e: &BytesStart<'_>, settings: &mut Settings) -> Result<(), Error> {
    if let Some(languages) = attribute(e, LANGUAGES)? {
        settings.languages = Settings::parse_languages(&languages);
    }
    settings.base_name = non_empty(attribute(e, BASE_NAME)?);
    settings.code_namespace = non_empty(attribute(e, CODE_NAMESPACE)?);
    settings.project_title = non_empty(attribute(e, PROJECT_TITLE)?);
    Ok(())
}

fn parse_settings_children<R: BufRead>(
    xml: &mut Reader<R>,
    settings: &mut Settings,
) -> Result<(), Error> {
    let mut buf = Vec::new();
    let mut depth = 0usize;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) if depth == 0 && e.local_name().as_ref() == TARGET_FILE => {
                let mut target = parse_target_file(e)?;
                target.path = read_text(xml)?.trim().to_string();
                settings.target_files.push(target);
            }
            Event::Empty(ref e) if depth == 0 && e.local_name().as_ref() == TARGET_FILE => {
                settings.target_files.push(parse_target_file(e)?);
            }
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => break,
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(Error::malformed("unexpected end of file in 'settings'")),
            _ => {}
        }
        buf.clear();
    }

    Ok(())
}

fn parse_target_file(e: &BytesStart<'_>) -> Result<TargetFile, Error> {
    Ok(TargetFile {
        path: String::new(),
        lang: attribute(e, LANG)?.unwrap_or_default(),
        designer: attribute(e, DESIGNER)?
            .as_deref()
            .and_then(DesignerVisibility::parse),
    })
}

/// Parses one `item`. `xml` is `None` for a self-closing element.
fn parse_item<R: BufRead>(
    e: &BytesStart<'_>,
    xml: Option<&mut Reader<R>>,
) -> Result<Item, Error> {
    let mut item = Item::new(attribute(e, ID)?.unwrap_or_default());
    let Some(xml) = xml else {
        return Ok(item);
    };

    let mut buf = Vec::new();
    let mut depth = 0usize;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) if depth == 0 && e.local_name().as_ref() == TEXT => {
                let (lang, state) = parse_text_attributes(&item, e)?;
                let value = read_text(xml)?;
                item.texts.insert(lang, TextItem { value, state });
            }
            Event::Empty(ref e) if depth == 0 && e.local_name().as_ref() == TEXT => {
                let (lang, state) = parse_text_attributes(&item, e)?;
                item.texts.insert(lang, TextItem::new("", state));
            }
            Event::Start(ref e) if depth == 0 && e.local_name().as_ref() == COMMENT => {
                // Comments always land on the neutral marker, whatever their lang.
                let comment = read_text(xml)?;
                item.comments.insert(NEUTRAL_LANGUAGE.to_string(), comment);
            }
            Event::Empty(ref e) if depth == 0 && e.local_name().as_ref() == COMMENT => {
                item.comments
                    .insert(NEUTRAL_LANGUAGE.to_string(), String::new());
            }
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => break,
            Event::End(_) => depth -= 1,
            Event::Eof => {
                return Err(Error::malformed(format!(
                    "unexpected end of file in item '{}'",
                    item.id
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(item)
}

fn parse_text_attributes(item: &Item, e: &BytesStart<'_>) -> Result<(String, MuiDbState), Error> {
    let lang = attribute(e, LANG)?
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| NEUTRAL_LANGUAGE.to_string());

    if item.texts.contains_key(&lang) {
        return Err(Error::malformed(format!(
            "Item '{}' has multiple entries for language '{}'.",
            item.id, lang
        )));
    }

    let state = match attribute(e, STATE)? {
        Some(state) => MuiDbState::from_str(&state).map_err(|_| {
            Error::malformed(format!(
                "item '{}' has an invalid state '{}' for language '{}'",
                item.id, state, lang
            ))
        })?,
        None => MuiDbState::New,
    };

    Ok((lang, state))
}

fn push_item(document: &mut Document, ids: &mut HashSet<String>, item: Item) -> Result<(), Error> {
    if !ids.insert(item.id.clone()) {
        return Err(Error::malformed(format!(
            "item id '{}' is used more than once",
            item.id
        )));
    }
    document.items.push(item);
    Ok(())
}

fn write_settings<W: Write>(xml: &mut Writer<W>, settings: &Settings) -> Result<(), Error> {
    let languages = settings.languages_attribute();
    let mut elem = BytesStart::new("settings");
    elem.push_attribute(("languages", languages.as_str()));
    if let Some(base_name) = &settings.base_name {
        elem.push_attribute(("base-name", base_name.as_str()));
    }
    if let Some(code_namespace) = &settings.code_namespace {
        elem.push_attribute(("code-namespace", code_namespace.as_str()));
    }
    if let Some(project_title) = &settings.project_title {
        elem.push_attribute(("project-title", project_title.as_str()));
    }

    if settings.target_files.is_empty() {
        xml.write_event(Event::Empty(elem))?;
        return Ok(());
    }

    xml.write_event(Event::Start(elem))?;
    for target in &settings.target_files {
        let mut elem = BytesStart::new("target-file");
        elem.push_attribute(("lang", target.lang.as_str()));
        if let Some(designer) = target.designer {
            elem.push_attribute(("designer", designer.as_str()));
        }
        xml.write_event(Event::Start(elem))?;
        xml.write_event(Event::Text(BytesText::new(&target.path)))?;
        xml.write_event(Event::End(BytesEnd::new("target-file")))?;
    }
    xml.write_event(Event::End(BytesEnd::new("settings")))?;
    Ok(())
}

fn write_item<W: Write>(xml: &mut Writer<W>, item: &Item) -> Result<(), Error> {
    let mut elem = BytesStart::new("item");
    elem.push_attribute(("id", item.id.as_str()));

    if item.texts.is_empty() && item.comments.is_empty() {
        xml.write_event(Event::Empty(elem))?;
        return Ok(());
    }

    xml.write_event(Event::Start(elem))?;

    // The comment has to stay the first child of its item.
    if let Some(comment) = item.comment() {
        xml.write_event(Event::Start(BytesStart::new("comment")))?;
        xml.write_event(Event::Text(BytesText::new(comment)))?;
        xml.write_event(Event::End(BytesEnd::new("comment")))?;
    }

    for (lang, text) in &item.texts {
        let mut elem = BytesStart::new("text");
        if lang != NEUTRAL_LANGUAGE {
            elem.push_attribute(("lang", lang.as_str()));
        }
        elem.push_attribute(("state", text.state.as_str()));
        xml.write_event(Event::Start(elem))?;
        xml.write_event(Event::Text(BytesText::new(&text.value)))?;
        xml.write_event(Event::End(BytesEnd::new("text")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("item")))?;
    Ok(())
}
