//! Structural validation of MuiDB documents.
//!
//! The accepted shape:
//!
//! - root `muidb` holding exactly one `settings` followed by exactly one `items`;
//! - `settings` may carry `languages`, `base-name`, `code-namespace` and
//!   `project-title`, and contains only `target-file` elements;
//! - a `target-file` needs a `lang`, may carry `designer` (`internal` or
//!   `public`) and holds its non-empty path as text;
//! - `items` contains only `item` elements with a non-empty, unique `id`;
//! - an `item` holds at most one `comment`, which must be its first child,
//!   and any number of `text` elements with a MuiDB `state` and optional `lang`;
//! - `text` and `comment` hold text only.
//!
//! Namespace declarations and `xml:` attributes are allowed everywhere.

use std::{collections::HashSet, io::BufRead, io::Cursor, str::FromStr};

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::{
    document::{
        BASE_NAME, CODE_NAMESPACE, COMMENT, DESIGNER, ID, ITEM, ITEMS, LANG, LANGUAGES,
        PROJECT_TITLE, ROOT, SETTINGS, STATE, TARGET_FILE, TEXT,
    },
    error::Error,
    state::MuiDbState,
    types::DesignerVisibility,
    xml::{attribute, is_reserved_attribute},
};

#[derive(Debug)]
enum Frame {
    Root { settings: bool, items: bool },
    Settings,
    TargetFile { has_path: bool },
    Items,
    Item { children: usize, id: String },
    Leaf(&'static str),
}

impl Frame {
    fn name(&self) -> &'static str {
        match self {
            Frame::Root { .. } => "muidb",
            Frame::Settings => "settings",
            Frame::TargetFile { .. } => "target-file",
            Frame::Items => "items",
            Frame::Item { .. } => "item",
            Frame::Leaf(name) => name,
        }
    }
}

/// Validates an XML string against the MuiDB document shape.
pub fn validate_str(xml: &str) -> Result<(), Error> {
    validate_reader(Cursor::new(xml))
}

/// Validates XML from any reader against the MuiDB document shape.
///
/// # Errors
///
/// [`Error::MalformedDocument`] naming the first violation, or
/// [`Error::XmlParse`] when the input is not well-formed XML.
pub fn validate_reader<R: BufRead>(reader: R) -> Result<(), Error> {
    let mut xml = Reader::from_reader(reader);
    let mut validator = Validator::default();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                let frame = validator.open(e)?;
                validator.stack.push(frame);
            }
            Event::Empty(ref e) => {
                let frame = validator.open(e)?;
                validator.close(frame)?;
            }
            Event::End(_) => {
                if let Some(frame) = validator.stack.pop() {
                    validator.close(frame)?;
                }
            }
            Event::Text(ref e) => {
                let text = e.unescape()?;
                validator.text(&text)?;
            }
            Event::CData(ref e) => {
                let text = String::from_utf8_lossy(e);
                validator.text(&text)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !validator.saw_root {
        return Err(Error::malformed("missing root element 'muidb'"));
    }
    Ok(())
}

#[derive(Default)]
struct Validator {
    stack: Vec<Frame>,
    ids: HashSet<String>,
    saw_root: bool,
}

impl Validator {
    fn open(&mut self, e: &BytesStart<'_>) -> Result<Frame, Error> {
        let name = e.local_name();
        let name = name.as_ref();

        let frame = match self.stack.last_mut() {
            None => {
                if name != ROOT || self.saw_root {
                    return Err(unexpected(name, "document"));
                }
                check_attributes(e, "muidb", &[])?;
                self.saw_root = true;
                Frame::Root {
                    settings: false,
                    items: false,
                }
            }
            Some(Frame::Root { settings, items }) => match name {
                n if n == SETTINGS => {
                    if *settings || *items {
                        return Err(Error::malformed(
                            "'settings' must appear exactly once, before 'items'",
                        ));
                    }
                    *settings = true;
                    check_attributes(
                        e,
                        "settings",
                        &[LANGUAGES, BASE_NAME, CODE_NAMESPACE, PROJECT_TITLE],
                    )?;
                    Frame::Settings
                }
                n if n == ITEMS => {
                    if !*settings || *items {
                        return Err(Error::malformed(
                            "'items' must appear exactly once, after 'settings'",
                        ));
                    }
                    *items = true;
                    check_attributes(e, "items", &[])?;
                    Frame::Items
                }
                other => return Err(unexpected(other, "muidb")),
            },
            Some(Frame::Settings) => {
                if name != TARGET_FILE {
                    return Err(unexpected(name, "settings"));
                }
                check_attributes(e, "target-file", &[LANG, DESIGNER])?;
                if attribute(e, LANG)?.is_none() {
                    return Err(Error::malformed("'target-file' is missing 'lang'"));
                }
                if let Some(designer) = attribute(e, DESIGNER)? {
                    if DesignerVisibility::parse(&designer).is_none() {
                        return Err(Error::malformed(format!(
                            "'target-file' has an invalid designer '{}'",
                            designer
                        )));
                    }
                }
                Frame::TargetFile { has_path: false }
            }
            Some(Frame::Items) => {
                if name != ITEM {
                    return Err(unexpected(name, "items"));
                }
                check_attributes(e, "item", &[ID])?;
                let id = attribute(e, ID)?.unwrap_or_default();
                if id.trim().is_empty() {
                    return Err(Error::malformed("'item' is missing a non-empty 'id'"));
                }
                if !self.ids.insert(id.clone()) {
                    return Err(Error::malformed(format!(
                        "item id '{}' is used more than once",
                        id
                    )));
                }
                Frame::Item { children: 0, id }
            }
            Some(Frame::Item { children, id }) => {
                *children += 1;
                match name {
                    n if n == COMMENT => {
                        if *children != 1 {
                            return Err(Error::malformed(format!(
                                "the comment of item '{}' must be its first child",
                                id
                            )));
                        }
                        check_attributes(e, "comment", &[LANG])?;
                        Frame::Leaf("comment")
                    }
                    n if n == TEXT => {
                        check_attributes(e, "text", &[LANG, STATE])?;
                        match attribute(e, STATE)? {
                            Some(state) if MuiDbState::from_str(&state).is_ok() => {}
                            Some(state) => {
                                return Err(Error::malformed(format!(
                                    "item '{}' has an invalid state '{}'",
                                    id, state
                                )));
                            }
                            None => {
                                return Err(Error::malformed(format!(
                                    "a text of item '{}' is missing 'state'",
                                    id
                                )));
                            }
                        }
                        Frame::Leaf("text")
                    }
                    other => return Err(unexpected(other, "item")),
                }
            }
            Some(parent) => return Err(unexpected(name, parent.name())),
        };

        Ok(frame)
    }

    fn close(&mut self, frame: Frame) -> Result<(), Error> {
        match frame {
            Frame::TargetFile { has_path: false } => {
                Err(Error::malformed("'target-file' needs a non-empty path"))
            }
            Frame::Root { settings, items } if !settings || !items => Err(Error::malformed(
                "'muidb' needs both 'settings' and 'items'",
            )),
            _ => Ok(()),
        }
    }

    fn text(&mut self, text: &str) -> Result<(), Error> {
        match self.stack.last_mut() {
            Some(Frame::TargetFile { has_path }) => {
                if !text.trim().is_empty() {
                    *has_path = true;
                }
                Ok(())
            }
            Some(Frame::Leaf(_)) => Ok(()),
            Some(parent) if !text.trim().is_empty() => Err(Error::malformed(format!(
                "unexpected text in '{}'",
                parent.name()
            ))),
            _ => Ok(()),
        }
    }
}

fn check_attributes(e: &BytesStart<'_>, element: &str, allowed: &[&[u8]]) -> Result<(), Error> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr?;
        let key = attr.key.as_ref();
        if is_reserved_attribute(key) || allowed.contains(&key) {
            continue;
        }
        return Err(Error::malformed(format!(
            "'{}' does not allow attribute '{}'",
            element,
            String::from_utf8_lossy(key)
        )));
    }
    Ok(())
}

fn unexpected(name: &[u8], parent: &str) -> Error {
    Error::malformed(format!(
        "unexpected element '{}' in '{}'",
        String::from_utf8_lossy(name),
        parent
    ))
}
