//! XML escaping and name validation for envelope assembly.
//!
//! All caller-provided values interpolated into an envelope MUST go through
//! [`escape`]; field keys used as attribute names MUST pass
//! [`is_valid_name`].

/// Escape a string for safe inclusion in XML content or attribute values.
///
/// This escapes the five predefined XML entities.
///
/// # Example
///
/// ```rust
/// use relatics_dx_soap::xml;
///
/// let safe = xml::escape("Lock & Dam <7>");
/// assert_eq!(safe, "Lock &amp; Dam &lt;7&gt;");
/// ```
#[must_use]
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 16);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Validate that a string is usable as an XML element or attribute name.
///
/// Covers the practical subset the import webservice accepts for `Row`
/// field names: a leading ASCII letter or underscore, followed by ASCII
/// letters, digits, `_`, `-` or `.`. Colons are rejected on purpose;
/// caller-supplied names must not smuggle in namespace prefixes.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("hello"), "hello");
        assert_eq!(escape("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape("&amp;"), "&amp;amp;");
        assert_eq!(escape("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(escape("it's"), "it&apos;s");
        assert_eq!(
            escape("<Row Name=\"x\"/>"),
            "&lt;Row Name=&quot;x&quot;/&gt;"
        );
    }

    #[test]
    fn test_is_valid_name() {
        // Valid names
        assert!(is_valid_name("name"));
        assert!(is_valid_name("Name"));
        assert!(is_valid_name("_internal"));
        assert!(is_valid_name("object-description"));
        assert!(is_valid_name("field.1"));

        // Invalid names
        assert!(!is_valid_name("")); // empty
        assert!(!is_valid_name("1name")); // starts with digit
        assert!(!is_valid_name("has space"));
        assert!(!is_valid_name("a=b"));
        assert!(!is_valid_name("rel:name")); // prefix smuggling
        assert!(!is_valid_name("quote\"name"));
    }
}
