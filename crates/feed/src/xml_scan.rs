// ABOUTME: Raw XML pass recovering entry fields that feed-rs doesn't expose verbatim.
// ABOUTME: Captures native id presence, raw date strings, itunes:duration and enclosures per item.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::html_utils::decode_entities;
use crate::models::Enclosure;

/// Raw values for one `<item>`/`<entry>`, in document order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScannedEntry {
    /// True when the entry carries a `<guid>`/`<id>` with non-empty text.
    pub has_native_id: bool,
    pub published_raw: Option<String>,
    pub updated_raw: Option<String>,
    /// Raw itunes:duration text.
    pub duration: Option<String>,
    pub enclosures: Vec<Enclosure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Published,
    Updated,
    Duration,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "guid" | "id" | "atom:id" => Some(Field::Id),
            "pubDate" | "published" | "issued" | "atom:published" => Some(Field::Published),
            "updated" | "modified" | "atom:updated" | "dc:date" | "dcterms:modified" => {
                Some(Field::Updated)
            }
            "itunes:duration" => Some(Field::Duration),
            _ => None,
        }
    }
}

/// Scans raw RSS/Atom bytes and returns one `ScannedEntry` per item.
/// Stops quietly at the first XML error; callers must check alignment.
pub fn scan_entries(data: &[u8]) -> Vec<ScannedEntry> {
    let mut entries = Vec::new();
    let mut reader = Reader::from_reader(data);

    let mut buf = Vec::new();
    let mut current: Option<ScannedEntry> = None;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = qualified_name(e);
                if is_entry_element(&name) {
                    current = Some(ScannedEntry::default());
                } else if let Some(entry) = current.as_mut() {
                    collect_enclosure(entry, &name, e);
                    field = Field::from_name(&name);
                    text.clear();
                }
            }
            Ok(Event::Empty(ref e)) => {
                if let Some(entry) = current.as_mut() {
                    collect_enclosure(entry, &qualified_name(e), e);
                }
            }
            Ok(Event::Text(ref e)) => {
                if field.is_some() {
                    if let Ok(s) = e.decode() {
                        text.push_str(&s);
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if field.is_some() {
                    let reference = String::from_utf8_lossy(&e);
                    text.push_str(&decode_entities(&format!("&{reference};")));
                }
            }
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if is_entry_element(&name) {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }
                    field = None;
                } else if let (Some(f), Some(entry)) = (field.take(), current.as_mut()) {
                    commit_field(entry, f, text.trim());
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    entries
}

fn qualified_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn is_entry_element(name: &str) -> bool {
    matches!(name, "item" | "entry" | "atom:entry" | "rss:item")
}

/// Keeps the first occurrence of each field.
fn commit_field(entry: &mut ScannedEntry, field: Field, value: &str) {
    if value.is_empty() {
        return;
    }
    let slot = match field {
        Field::Id => {
            entry.has_native_id = true;
            return;
        }
        Field::Published => &mut entry.published_raw,
        Field::Updated => &mut entry.updated_raw,
        Field::Duration => &mut entry.duration,
    };
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}

/// Records RSS `<enclosure url>` and Atom `<link rel="enclosure" href>` elements.
fn collect_enclosure(entry: &mut ScannedEntry, name: &str, e: &BytesStart) {
    let url = match name {
        "enclosure" => get_attribute(e, "url"),
        "link" | "atom:link" if get_attribute(e, "rel").as_deref() == Some("enclosure") => {
            get_attribute(e, "href")
        }
        _ => return,
    };
    entry.enclosures.push(Enclosure {
        url,
        mime_type: get_attribute(e, "type"),
        length: get_attribute(e, "length").and_then(|l| l.trim().parse().ok()),
    });
}

/// Gets an attribute value with entity references resolved.
fn get_attribute(e: &BytesStart, name: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name.as_bytes())
        .map(|attr| decode_entities(&String::from_utf8_lossy(&attr.value)))
}
