// ABOUTME: HTML utility functions for episode descriptions.
// ABOUTME: Extracts visible text with scraper and decodes leftover HTML entities in one pass.

use scraper::{Html, Node};

/// Elements whose text is never visible.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "template"];

/// Named entities recognised by `decode_entities`.
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", "\u{00A0}"),
    ("ndash", "–"),
    ("mdash", "—"),
    ("lsquo", "\u{2018}"),
    ("rsquo", "\u{2019}"),
    ("ldquo", "\u{201C}"),
    ("rdquo", "\u{201D}"),
    ("hellip", "…"),
    ("copy", "©"),
    ("reg", "®"),
    ("trade", "™"),
    ("bull", "•"),
    ("middot", "·"),
    ("deg", "°"),
    ("plusmn", "±"),
    ("times", "×"),
    ("divide", "÷"),
    ("frac12", "½"),
    ("frac14", "¼"),
    ("frac34", "¾"),
    ("euro", "€"),
    ("pound", "£"),
    ("yen", "¥"),
    ("cent", "¢"),
    ("eacute", "é"),
    ("egrave", "è"),
    ("aacute", "á"),
    ("agrave", "à"),
    ("uuml", "ü"),
    ("ouml", "ö"),
    ("auml", "ä"),
    ("ntilde", "ñ"),
    ("ccedil", "ç"),
    ("szlig", "ß"),
];

/// Longest entity name we try to match.
const MAX_ENTITY_NAME: usize = 32;

/// Converts a possibly-HTML string into plain text.
///
/// Text nodes are trimmed, empty ones dropped, and the rest joined with single
/// spaces. Remaining entity references are then decoded. Malformed markup is
/// handled by the HTML5 parser's error recovery; this never fails.
pub fn strip_html(value: Option<&str>) -> String {
    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => return String::new(),
    };

    let fragment = Html::parse_fragment(value);
    let mut pieces: Vec<&str> = Vec::new();

    for node in fragment.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            pieces.push(trimmed);
        }
    }

    decode_entities(&pieces.join(" "))
}

/// Decodes named and numeric HTML entities in a single left-to-right pass.
/// Unknown or malformed references are copied through unchanged.
pub fn decode_entities(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find('&') {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos + 1..];
        match decode_reference(candidate) {
            Some((decoded, consumed)) => {
                result.push_str(&decoded);
                rest = &candidate[consumed..];
            }
            None => {
                result.push('&');
                rest = candidate;
            }
        }
    }
    result.push_str(rest);

    result
}

/// Decodes one reference following an '&'. Returns the text and bytes consumed.
fn decode_reference(s: &str) -> Option<(String, usize)> {
    if let Some(numeric) = s.strip_prefix('#') {
        let (digits_start, radix) = match numeric.as_bytes().first() {
            Some(b'x') | Some(b'X') => (1, 16),
            _ => (0, 10),
        };
        let body = &numeric[digits_start..];
        let len = body
            .bytes()
            .take_while(|b| (*b as char).is_digit(radix))
            .count();
        if len == 0 {
            return None;
        }
        let code = u32::from_str_radix(&body[..len], radix).ok()?;
        let ch = char::from_u32(code).filter(|c| *c != '\0').unwrap_or('\u{FFFD}');
        let mut consumed = 1 + digits_start + len;
        if body[len..].starts_with(';') {
            consumed += 1;
        }
        return Some((ch.to_string(), consumed));
    }

    let name_len = s
        .bytes()
        .take(MAX_ENTITY_NAME)
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if name_len == 0 || !s[name_len..].starts_with(';') {
        return None;
    }
    let name = &s[..name_len];
    NAMED_ENTITIES
        .iter()
        .find(|(entity, _)| *entity == name)
        .map(|(_, replacement)| (replacement.to_string(), name_len + 1))
}
