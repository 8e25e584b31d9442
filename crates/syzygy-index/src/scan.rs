//! Event-style scanning of untrusted directory-listing HTML.
//!
//! Mirror indexes are machine-generated but still untrusted input, so the
//! scanner is lenient by construction: it walks the text once, reports each
//! well-formed start tag to a [`StartTagSink`], and silently drops anything
//! malformed or truncated. There is no tree, so there are no tree invariants
//! to violate.

/// File extension of a WDL table as it appears in the mirror index.
pub const TABLE_SUFFIX: &str = ".rtbw";

/// Receiver for start-tag events emitted by [`scan_start_tags`].
///
/// Tag and attribute names are lowercased; attribute values are passed
/// through verbatim (no entity decoding).
pub trait StartTagSink {
    fn start_tag(&mut self, name: &str, attrs: &[(String, String)]);
}

/// Scans `html` and reports every parseable start tag to `sink`.
///
/// Comments, doctypes, processing instructions, and end tags are skipped.
/// A tag that is truncated or has an unterminated quoted value is dropped
/// along with the rest of the input, matching the best-effort contract.
pub fn scan_start_tags(html: &str, sink: &mut dyn StartTagSink) {
    let bytes = html.as_bytes();
    let mut pos = 0;

    while let Some(open) = find_byte(bytes, pos, b'<') {
        pos = open + 1;
        match bytes.get(pos) {
            None => return,
            Some(b'!') => {
                if bytes[pos..].starts_with(b"!--") {
                    match find_seq(bytes, pos + 3, b"-->") {
                        Some(end) => pos = end + 3,
                        None => return,
                    }
                } else {
                    match find_byte(bytes, pos, b'>') {
                        Some(end) => pos = end + 1,
                        None => return,
                    }
                }
            }
            Some(b'/') | Some(b'?') => match find_byte(bytes, pos, b'>') {
                Some(end) => pos = end + 1,
                None => return,
            },
            Some(c) if c.is_ascii_alphabetic() => {
                let Some((name, attrs, next)) = parse_start_tag(html, pos) else {
                    return;
                };
                sink.start_tag(&name, &attrs);
                pos = next;
            }
            // Stray '<' in text content; keep scanning.
            Some(_) => {}
        }
    }
}

/// Collects `href` targets of anchor tags whose value ends in `suffix`,
/// in document order. Duplicates are preserved.
pub fn collect_table_links(html: &str, suffix: &str) -> Vec<String> {
    let mut collector = LinkCollector {
        suffix,
        links: Vec::new(),
    };
    scan_start_tags(html, &mut collector);
    collector.links
}

struct LinkCollector<'a> {
    suffix: &'a str,
    links: Vec<String>,
}

impl StartTagSink for LinkCollector<'_> {
    fn start_tag(&mut self, name: &str, attrs: &[(String, String)]) {
        if name != "a" {
            return;
        }
        for (key, value) in attrs {
            if key == "href" && value.ends_with(self.suffix) {
                self.links.push(value.clone());
                break;
            }
        }
    }
}

type ParsedTag = (String, Vec<(String, String)>, usize);

/// Parses one start tag beginning at the tag-name byte. Returns `None` when
/// the tag runs past the end of input or a quoted value never closes.
fn parse_start_tag(html: &str, start: usize) -> Option<ParsedTag> {
    let bytes = html.as_bytes();
    let mut i = start;

    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    let name = html[start..i].to_ascii_lowercase();
    let mut attrs = Vec::new();

    loop {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        if bytes[i] == b'>' {
            return Some((name, attrs, i + 1));
        }

        let key_start = i;
        while i < bytes.len() && !is_attr_delimiter(bytes[i]) {
            i += 1;
        }
        if i == key_start {
            // Junk byte where an attribute name should be.
            i += 1;
            continue;
        }
        let key = html[key_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let value = if bytes.get(i) == Some(&b'=') {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i) {
                Some(&quote) if quote == b'"' || quote == b'\'' => {
                    i += 1;
                    let value_start = i;
                    let end = find_byte(bytes, i, quote)?;
                    i = end + 1;
                    html[value_start..end].to_string()
                }
                _ => {
                    let value_start = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    html[value_start..i].to_string()
                }
            }
        } else {
            String::new()
        };

        attrs.push((key, value));
    }
}

fn is_attr_delimiter(byte: u8) -> bool {
    byte.is_ascii_whitespace() || matches!(byte, b'=' | b'>' | b'/')
}

fn find_byte(bytes: &[u8], from: usize, target: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == target)
        .map(|offset| from + offset)
}

fn find_seq(bytes: &[u8], from: usize, target: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(target.len())
        .position(|window| window == target)
        .map(|offset| from + offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_links_by_suffix() {
        let html = r#"<a href="KPvK.rtbw">KPvK</a><a href="readme.txt">readme</a>"#;
        assert_eq!(collect_table_links(html, TABLE_SUFFIX), vec!["KPvK.rtbw"]);
    }

    #[test]
    fn preserves_document_order_and_duplicates() {
        let html = r#"
            <a href="KQvK.rtbw">x</a>
            <a href="KNvK.rtbw">y</a>
            <a href="KQvK.rtbw">x again</a>
        "#;
        assert_eq!(
            collect_table_links(html, TABLE_SUFFIX),
            vec!["KQvK.rtbw", "KNvK.rtbw", "KQvK.rtbw"]
        );
    }

    #[test]
    fn handles_quoting_variants() {
        let html = "<a href='KPvK.rtbw'>s</a><a href=KNvK.rtbw>u</a><a href=\"KQvK.rtbw\">d</a>";
        assert_eq!(
            collect_table_links(html, TABLE_SUFFIX),
            vec!["KPvK.rtbw", "KNvK.rtbw", "KQvK.rtbw"]
        );
    }

    #[test]
    fn ignores_non_anchor_tags_and_other_attributes() {
        let html = r#"<img src="KPvK.rtbw"><a title="KNvK.rtbw" href="KQvK.rtbw">x</a>"#;
        assert_eq!(collect_table_links(html, TABLE_SUFFIX), vec!["KQvK.rtbw"]);
    }

    #[test]
    fn at_most_one_link_per_tag() {
        let html = r#"<a href="KPvK.rtbw" href="KNvK.rtbw">x</a>"#;
        assert_eq!(collect_table_links(html, TABLE_SUFFIX), vec!["KPvK.rtbw"]);
    }

    #[test]
    fn tolerates_malformed_markup() {
        let html = r#"
            <a href="KPvK.rtbw">ok</a>
            <a href="KNvK.rtbw
            <<>< not a tag
            <a href="KQvK.rtbw">swallowed by the runaway quote above
        "#;
        // The unterminated quote mangles everything up to the next quote
        // character; nothing after the first anchor survives, and nothing
        // errors.
        assert_eq!(collect_table_links(html, TABLE_SUFFIX), vec!["KPvK.rtbw"]);
    }

    #[test]
    fn skips_comments_end_tags_and_doctype() {
        let html = r#"
            <!DOCTYPE html>
            <!-- <a href="KRvK.rtbw">commented out</a> -->
            </a>
            <a href="KPvK.rtbw">real</a>
        "#;
        assert_eq!(collect_table_links(html, TABLE_SUFFIX), vec!["KPvK.rtbw"]);
    }

    #[test]
    fn uppercase_tag_and_attribute_names_are_lowercased() {
        let html = r#"<A HREF="KPvK.rtbw">x</A>"#;
        assert_eq!(collect_table_links(html, TABLE_SUFFIX), vec!["KPvK.rtbw"]);
    }

    #[test]
    fn empty_and_tagless_input() {
        assert!(collect_table_links("", TABLE_SUFFIX).is_empty());
        assert!(collect_table_links("no tags here", TABLE_SUFFIX).is_empty());
    }

    #[test]
    fn reports_all_start_tags_to_sink() {
        struct Names(Vec<String>);
        impl StartTagSink for Names {
            fn start_tag(&mut self, name: &str, _attrs: &[(String, String)]) {
                self.0.push(name.to_string());
            }
        }
        let mut sink = Names(Vec::new());
        scan_start_tags("<html><body><table><tr><td>x</td></tr>", &mut sink);
        assert_eq!(sink.0, vec!["html", "body", "table", "tr", "td"]);
    }

    #[test]
    fn self_closing_tag_attributes_survive() {
        let html = r#"<a href="KPvK.rtbw"/>"#;
        assert_eq!(collect_table_links(html, TABLE_SUFFIX), vec!["KPvK.rtbw"]);
    }
}
