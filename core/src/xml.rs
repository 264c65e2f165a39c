//! Builder and parser for the flat XML documents the vendor embeds.
//!
//! # Design
//! Every XML fragment on this wire is a document whose root's direct children
//! are all leaf text elements — the `Applicant` and `TUAdditionalData` fields
//! outbound, `TEResponse` inbound. This module handles exactly that class and
//! nothing more: no attributes, no nesting, no namespaces, no CDATA. Attributes
//! or nested elements in input are rejected as malformed rather than silently
//! flattened.
//!
//! The builder reproduces the original formatter's output byte for byte:
//! XML declaration, two-space indent, one element per line, self-closing
//! empty elements, trailing newline.

/// Serialize a flat document. Children appear in slice order; an empty text
/// value produces a self-closing element.
pub fn build_document(root: &str, children: &[(&str, &str)]) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n");
    out.push('<');
    out.push_str(root);
    out.push_str(">\n");
    for (name, text) in children {
        if text.is_empty() {
            out.push_str("  <");
            out.push_str(name);
            out.push_str("/>\n");
        } else {
            out.push_str("  <");
            out.push_str(name);
            out.push('>');
            out.push_str(&escape_text(text));
            out.push_str("</");
            out.push_str(name);
            out.push_str(">\n");
        }
    }
    out.push_str("</");
    out.push_str(root);
    out.push_str(">\n");
    out
}

/// Parse a flat document into `(tag, text)` pairs in document order.
///
/// The root tag name is not reported — only its children matter to callers,
/// which build a map from the pairs.
pub fn parse_flat(xml: &str) -> Result<Vec<(String, String)>, String> {
    let mut input = xml.trim_start();

    if let Some(rest) = input.strip_prefix("<?") {
        let end = rest
            .find("?>")
            .ok_or_else(|| "unterminated XML declaration".to_string())?;
        input = rest[end + 2..].trim_start();
    }

    let (root, mut rest) = read_open_tag(input)?;
    let close_root = format!("</{root}>");
    let mut pairs = Vec::new();

    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix(close_root.as_str()) {
            if !after.trim().is_empty() {
                return Err("content after document root".to_string());
            }
            return Ok(pairs);
        }
        if rest.is_empty() {
            return Err(format!("missing closing tag for {root}"));
        }

        let inner = rest
            .strip_prefix('<')
            .ok_or_else(|| "expected child element".to_string())?;
        let name_len = inner
            .find(['>', '/'])
            .ok_or_else(|| "unterminated tag".to_string())?;
        let name = &inner[..name_len];
        check_tag_name(name)?;

        if let Some(after) = inner[name_len..].strip_prefix("/>") {
            pairs.push((name.to_string(), String::new()));
            rest = after;
            continue;
        }

        let body = &inner[name_len + 1..];
        let text_len = body
            .find("</")
            .ok_or_else(|| format!("missing closing tag for {name}"))?;
        let text = &body[..text_len];
        if text.contains('<') {
            return Err(format!("nested elements are not supported (inside {name})"));
        }
        let after_close = body[text_len + 2..]
            .strip_prefix(name)
            .and_then(|r| r.strip_prefix('>'))
            .ok_or_else(|| format!("mismatched closing tag for {name}"))?;
        pairs.push((name.to_string(), unescape_text(text)?));
        rest = after_close;
    }
}

fn read_open_tag(input: &str) -> Result<(&str, &str), String> {
    let inner = input
        .strip_prefix('<')
        .ok_or_else(|| "expected document root".to_string())?;
    let end = inner
        .find('>')
        .ok_or_else(|| "unterminated root tag".to_string())?;
    let name = &inner[..end];
    check_tag_name(name)?;
    Ok((name, &inner[end + 1..]))
}

fn check_tag_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("empty tag name".to_string());
    }
    if name.contains(char::is_whitespace) {
        return Err(format!("attributes are not supported (tag {name})"));
    }
    Ok(())
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape_text(text: &str) -> Result<String, String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let entity = &rest[pos..];
        let end = entity
            .find(';')
            .ok_or_else(|| "unterminated entity".to_string())?;
        match &entity[1..end] {
            "amp" => out.push('&'),
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            other => return Err(format!("unknown entity &{other};")),
        }
        rest = &entity[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
