//! Small helpers shared by the quick-xml based readers.

use std::io::BufRead;

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
    name::QName,
};

use crate::error::Error;

/// Returns the unescaped value of attribute `key`, if present.
pub(crate) fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, Error> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Reads the text content of the element whose start tag was just consumed,
/// up to and including its end tag. Text of nested elements is concatenated.
pub(crate) fn read_text<R: BufRead>(xml: &mut Reader<R>) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => break,
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(Error::malformed("unexpected end of file")),
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

/// Skips everything up to and including the end tag of `e`.
pub(crate) fn skip_element<R: BufRead>(
    xml: &mut Reader<R>,
    e: &BytesStart<'_>,
) -> Result<(), Error> {
    let end = e.name().as_ref().to_vec();
    let mut buf = Vec::new();
    xml.read_to_end_into(QName(&end), &mut buf)?;
    Ok(())
}

/// Whether `key` is a namespace declaration or an `xml:` attribute, which
/// every element may carry.
pub(crate) fn is_reserved_attribute(key: &[u8]) -> bool {
    key == b"xmlns" || key.starts_with(b"xmlns:") || key.starts_with(b"xml:")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_start(xml: &mut Reader<&[u8]>) -> BytesStart<'static> {
        let mut buf = Vec::new();
        loop {
            if let Event::Start(e) = xml.read_event_into(&mut buf).unwrap() {
                return e.into_owned();
            }
            buf.clear();
        }
    }

    #[test]
    fn test_read_text_keeps_whitespace_and_entities() {
        let mut xml = Reader::from_str("<v>  a &amp; b\n <![CDATA[<c>]]></v>");
        first_start(&mut xml);
        assert_eq!(read_text(&mut xml).unwrap(), "  a & b\n <c>");
    }

    #[test]
    fn test_read_text_concatenates_nested_text() {
        let mut xml = Reader::from_str("<v>a<b>b</b>c</v><after/>");
        first_start(&mut xml);
        assert_eq!(read_text(&mut xml).unwrap(), "abc");
    }

    #[test]
    fn test_read_text_unterminated() {
        let mut xml = Reader::from_str("<v>abc");
        first_start(&mut xml);
        assert!(matches!(
            read_text(&mut xml),
            Err(Error::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_attribute_lookup() {
        let mut xml = Reader::from_str(r#"<v name="a &lt; b" other="x">t</v>"#);
        let e = first_start(&mut xml);
        assert_eq!(attribute(&e, b"name").unwrap().as_deref(), Some("a < b"));
        assert_eq!(attribute(&e, b"missing").unwrap(), None);
    }

    #[test]
    fn test_skip_element() {
        let mut xml = Reader::from_str("<a><b><c/>text</b><d>keep</d></a>");
        let mut buf = Vec::new();
        // <a>
        xml.read_event_into(&mut buf).unwrap();
        let b = first_start(&mut xml);
        skip_element(&mut xml, &b).unwrap();
        let d = first_start(&mut xml);
        assert_eq!(d.name().as_ref(), b"d");
        assert_eq!(read_text(&mut xml).unwrap(), "keep");
    }

    #[test]
    fn test_reserved_attributes() {
        assert!(is_reserved_attribute(b"xmlns"));
        assert!(is_reserved_attribute(b"xmlns:xsi"));
        assert!(is_reserved_attribute(b"xml:space"));
        assert!(!is_reserved_attribute(b"lang"));
    }
}
