//! Textual placeholder substitution.

/// Result of rendering one template: the substituted text plus any tokens
/// that were expected but absent from the template. A missing placeholder
/// means the solver input silently keeps a stale/default value, so callers
/// must at least warn about it.
#[derive(Debug)]
pub struct Rendered {
    pub text: String,
    pub missing: Vec<&'static str>,
}

impl Rendered {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Replaces every occurrence of each token with its value. Tokens are
/// validated as mutually disjoint at startup, so substitution order cannot
/// affect other placeholders.
pub fn render(template: &str, values: &[(&'static str, String)]) -> Rendered {
    let mut text = template.to_string();
    let mut missing = Vec::new();
    for (token, value) in values {
        if text.contains(token) {
            text = text.replace(token, value);
        } else {
            missing.push(*token);
        }
    }
    Rendered { text, missing }
}
