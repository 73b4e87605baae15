//! BibTeX formatting module
//!
//! Converts BibTeXEntry structures to BibTeX string format.

use super::entry::BibTeXEntry;

/// Format a single BibTeX entry to string
pub fn format_entry(entry: &BibTeXEntry) -> String {
    let mut result = String::new();

    result.push('@');
    result.push_str(entry.entry_type.as_str());
    result.push('{');
    result.push_str(&entry.cite_key);
    result.push(',');
    result.push('\n');

    let fields: Vec<String> = entry
        .fields
        .iter()
        .map(|field| format!("    {} = {}", field.key, format_field_value(&field.value)))
        .collect();
    result.push_str(&fields.join(",\n"));
    if !fields.is_empty() {
        result.push('\n');
    }

    result.push('}');
    result
}

/// Numeric values go out bare, everything else brace-delimited
fn format_field_value(value: &str) -> String {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        return value.to_string();
    }

    let escaped = escape_value(value);
    let mut result = String::with_capacity(escaped.len() + 2);
    result.push('{');
    result.push_str(&escaped);
    result.push('}');
    result
}

/// Escape braces in a value whose braces do not nest cleanly.
///
/// Balanced braces are kept since they carry case protection
/// (`{DNA} sequencing`); an unbalanced brace would end the field early.
pub fn escape_value(value: &str) -> String {
    if braces_balanced(value) {
        return value.to_string();
    }

    let mut result = String::with_capacity(value.len() + 4);
    let mut prev = None;
    for c in value.chars() {
        if (c == '{' || c == '}') && prev != Some('\\') {
            result.push('\\');
        }
        result.push(c);
        prev = Some(c);
    }
    result
}

fn braces_balanced(value: &str) -> bool {
    let mut depth: i32 = 0;
    let mut prev = None;
    for c in value.chars() {
        if prev != Some('\\') {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        prev = Some(c);
    }
    depth == 0
}
