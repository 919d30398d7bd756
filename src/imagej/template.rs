//! Minimal `${name}` template rendering for macro code.
//!
//! `$$` produces a literal `$`. A `$` followed by anything else is kept
//! as is, so ImageJ code using `$` needs no escaping.

use std::collections::BTreeMap;

use crate::error::MacroError;

/// Template variables, by name.
pub type Variables = BTreeMap<&'static str, String>;

/// Render `template`, replacing every `${name}` with its value.
pub fn render(template: &str, vars: &Variables) -> Result<String, MacroError> {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;
    let mut offset = 0;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if after.starts_with('$') {
            out.push('$');
            rest = &after[1..];
            offset += pos + 2;
        } else if let Some(body) = after.strip_prefix('{') {
            let end = body
                .find('}')
                .ok_or(MacroError::UnclosedPlaceholder(offset + pos))?;
            let name = &body[..end];
            let value = vars
                .get(name)
                .ok_or_else(|| MacroError::UnknownPlaceholder {
                    name: name.to_string(),
                    offset: offset + pos,
                })?;
            out.push_str(value);
            rest = &body[end + 1..];
            offset += pos + end + 3;
        } else {
            out.push('$');
            rest = after;
            offset += pos + 1;
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Escape a value for use inside an ImageJ macro string literal.
pub fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            _ => result.push(c),
        }
    }
    result
}
