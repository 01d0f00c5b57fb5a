//! Extraction of values from XWiki REST XML envelopes.
//!
//! Only two values are ever needed: the `content` of a page resource and the
//! `fullName` of each page in a page listing. Elements are matched by local
//! name, so namespace prefixes are ignored.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::XWikiError;

/// Element holding the serialized metadata of a page.
const CONTENT_ELEMENT: &str = "content";

/// Element holding the document identifier of a listed page.
const FULL_NAME_ELEMENT: &str = "fullName";

/// Text of the first `content` element of a page resource.
///
/// Returns `None` if the envelope has no `content` element.
pub(crate) fn page_content(xml: &str) -> Result<Option<String>, XWikiError> {
    Ok(element_texts(xml, CONTENT_ELEMENT)?.into_iter().next())
}

/// Text of every `fullName` element of a page listing, in document order.
pub(crate) fn page_full_names(xml: &str) -> Result<Vec<String>, XWikiError> {
    element_texts(xml, FULL_NAME_ELEMENT)
}

/// Collect the text of every element with the given local name.
///
/// Text of nested child elements is included; entity and character
/// references are resolved.
fn element_texts(xml: &str, name: &str) -> Result<Vec<String>, XWikiError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut texts = Vec::new();
    let mut current: Option<String> = None;
    // Depth of nesting below the matched element
    let mut depth = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if current.is_some() {
                    depth += 1;
                } else if e.local_name().as_ref() == name.as_bytes() {
                    current = Some(String::new());
                }
            }
            Event::Empty(e) => {
                if current.is_none() && e.local_name().as_ref() == name.as_bytes() {
                    texts.push(String::new());
                }
            }
            Event::End(_) => {
                if depth > 0 {
                    depth -= 1;
                } else if let Some(text) = current.take() {
                    texts.push(text);
                }
            }
            Event::Text(e) => {
                if let Some(text) = current.as_mut() {
                    text.push_str(&reader.decoder().decode(&e)?);
                }
            }
            Event::GeneralRef(e) => {
                if let Some(text) = current.as_mut() {
                    let entity = reader.decoder().decode(&e)?;
                    text.push_str(&decode_entity(&entity));
                }
            }
            Event::CData(e) => {
                if let Some(text) = current.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::Eof => break,
            Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    Ok(texts)
}

/// Decode an entity reference (the part between `&` and `;`).
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if s.starts_with("#x") || s.starts_with("#X") {
                u32::from_str_radix(&s[2..], 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        // Unknown entity - preserve as-is
        _ => format!("&{entity};"),
    }
}
