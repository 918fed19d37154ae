//! Single-pass `{name}` template substitution.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder regex"));

/// A placeholder the caller did not bind. This is a configuration mistake and
/// always surfaces to the caller; it is never swallowed.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("missing placeholder binding: {{{0}}}")]
    MissingPlaceholder(String),
}

/// Substitutes `{name}` placeholders from `bindings` in one pass.
///
/// `{{` and `}}` escape literal braces. Substituted values are inserted
/// verbatim and never re-scanned, so few-shot text containing braces cannot
/// inject placeholders. Unbound placeholders are an error; unused bindings are
/// fine.
pub fn render(template: &str, bindings: &BTreeMap<String, String>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(template) {
        let matched = caps.get(0).expect("match group 0");
        out.push_str(&template[last..matched.start()]);
        last = matched.end();
        match matched.as_str() {
            "{{" => out.push('{'),
            "}}" => out.push('}'),
            _ => {
                let name = caps.get(1).expect("placeholder name").as_str();
                let value = bindings
                    .get(name)
                    .ok_or_else(|| TemplateError::MissingPlaceholder(name.to_string()))?;
                out.push_str(value);
            }
        }
    }
    out.push_str(&template[last..]);
    Ok(out)
}
