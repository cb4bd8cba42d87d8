use hashlink::LinkedHashMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Values collected for a template, in the order the variables were scanned.
pub type VariableBindings = LinkedHashMap<String, String>;

/// Matches `{{name}}` where `name` is any run of characters other than braces.
///
/// Whitespace is part of the name: `{{ name }}` and `{{name}}` are different
/// variables.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("valid placeholder regex"));

/// Return the distinct variable names referenced by `content` in
/// first-occurrence order.
///
/// Accepts `&str` or `Option<&str>`; `None` and `""` both yield an empty list.
pub fn extract_variables<'a>(content: impl Into<Option<&'a str>>) -> Vec<String> {
    let Some(content) = content.into() else {
        return Vec::new();
    };
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(content) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Substitute bound variables into `content` in a single pass.
///
/// Placeholders whose name has no binding stay exactly as written so a
/// partially filled form can still be previewed.
pub fn render_template(content: &str, bindings: &VariableBindings) -> String {
    PLACEHOLDER
        .replace_all(content, |caps: &Captures| match bindings.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Build bindings with an empty value for every variable in `content`.
pub fn empty_bindings(content: &str) -> VariableBindings {
    extract_variables(content)
        .into_iter()
        .map(|name| (name, String::new()))
        .collect()
}
