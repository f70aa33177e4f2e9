//! Pre-formatted doc comments for generated items.

/// Maximum rendered width of a doc comment line, `/// ` prefix included.
pub const DOC_WIDTH: usize = 80;

const DOC_PREFIX: &str = "/// ";

/// Renders `text` as `///` comment lines wrapped at [`DOC_WIDTH`].
///
/// Lines that start with whitespace are treated as code and kept verbatim;
/// blank lines become a bare `///`.
///
/// # Examples
///
/// ```
/// use schema_modelgen_core::docs::doc_comment;
///
/// assert_eq!(doc_comment("Pet a pet"), "/// Pet a pet");
/// assert_eq!(doc_comment("a\n\n    b"), "/// a\n///\n///     b");
/// ```
pub fn doc_comment(text: &str) -> String {
    let mut lines = Vec::new();
    for line in text.trim_end().lines() {
        if line.trim().is_empty() {
            lines.push("///".to_string());
        } else if line.starts_with(char::is_whitespace) {
            lines.push(format!("{DOC_PREFIX}{line}"));
        } else {
            wrap_into(line, &mut lines);
        }
    }
    lines.join("\n")
}

fn wrap_into(line: &str, lines: &mut Vec<String>) {
    let width = DOC_WIDTH - DOC_PREFIX.len();
    let mut current = String::new();
    for word in line.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(format!("{DOC_PREFIX}{current}"));
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(format!("{DOC_PREFIX}{current}"));
    }
}

/// Doc comment of a model: the type name followed by its description.
pub fn model_doc(type_name: &str, description: Option<&str>) -> String {
    doc_comment(&join_name(type_name, description))
}

/// Doc comment of a property: the accessor followed by its description, and
/// an indented example block when an example literal is known.
pub fn property_doc(accessor: &str, description: Option<&str>, example: Option<&str>) -> String {
    let mut text = join_name(accessor, description);
    if let Some(example) = example {
        text.push_str(" eg.\n\n    ");
        text.push_str(example);
    }
    doc_comment(&text)
}

fn join_name(name: &str, description: Option<&str>) -> String {
    match description.map(str::trim).filter(|d| !d.is_empty()) {
        Some(description) => format!("{name} {description}"),
        None => name.to_string(),
    }
}
