//! Identifier helpers for generated code.
//!
//! Names are split into words on anything that is not a letter or digit and
//! on case humps, then re-joined in the casing each target needs. Letters
//! and digits of every script count, so `名前` is one word. A run of
//! capitals stays together except for its last capital when a lowercase
//! letter follows (`HTTPServer` → `HTTP`, `Server`).

use std::sync::LazyLock;

use regex::Regex;

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").expect("static regex must compile"));

/// Rust keywords that need a raw identifier as field names.
const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "macro", "override", "priv",
    "try", "typeof", "unsized", "virtual", "yield",
];

/// Keywords that cannot be raw identifiers.
const RESERVED_PATH_KEYWORDS: &[&str] = &["crate", "self", "super", "Self"];

fn words(name: &str) -> Vec<&str> {
    let mut words = Vec::new();
    for chunk in SEPARATOR_RE.split(name).filter(|chunk| !chunk.is_empty()) {
        let chars: Vec<(usize, char)> = chunk.char_indices().collect();
        let mut start = 0;
        for pos in 1..chars.len() {
            let (offset, current) = chars[pos];
            let previous = chars[pos - 1].1;
            let next = chars.get(pos + 1).map(|&(_, c)| c);
            let hump = current.is_uppercase()
                && (!previous.is_uppercase() || next.is_some_and(char::is_lowercase));
            if hump {
                words.push(&chunk[start..offset]);
                start = offset;
            }
        }
        words.push(&chunk[start..]);
    }
    words
}

/// Spelling of a name without letters or digits, one hex code point per
/// character (`--` → `x2d_2d`).
fn escaped(name: &str) -> String {
    let codes: Vec<String> = name
        .chars()
        .map(|c| format!("{:x}", u32::from(c)))
        .collect();
    format!("x{}", codes.join("_"))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn starts_with_digit(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_numeric)
}

/// Converts a schema name into a PascalCase type name.
///
/// # Examples
///
/// ```
/// use schema_modelgen_core::naming::to_type_name;
///
/// assert_eq!(to_type_name("pet"), "Pet");
/// assert_eq!(to_type_name("order_line-item"), "OrderLineItem");
/// assert_eq!(to_type_name("petID"), "PetId");
/// ```
pub fn to_type_name(name: &str) -> String {
    let joined: String = words(name).into_iter().map(capitalize).collect();
    if joined.is_empty() {
        return capitalize(&escaped(name));
    }
    if starts_with_digit(&joined) {
        return format!("Nr{joined}");
    }
    joined
}

/// Converts a property name into a snake_case Rust field name.
///
/// Keywords are escaped as raw identifiers (`type` → `r#type`).
///
/// # Examples
///
/// ```
/// use schema_modelgen_core::naming::to_field_name;
///
/// assert_eq!(to_field_name("photoUrls"), "photo_urls");
/// assert_eq!(to_field_name("type"), "r#type");
/// assert_eq!(to_field_name("self"), "self_");
/// ```
pub fn to_field_name(name: &str) -> String {
    let joined = words(name)
        .into_iter()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_");
    if joined.is_empty() {
        return escaped(name);
    }
    if starts_with_digit(&joined) {
        return format!("nr_{joined}");
    }
    if RESERVED_PATH_KEYWORDS.contains(&joined.as_str()) {
        return format!("{joined}_");
    }
    if RUST_KEYWORDS.contains(&joined.as_str()) {
        return format!("r#{joined}");
    }
    joined
}

/// Converts a property name into its normalized lowerCamel form.
///
/// This is the key used for properties in a model, so differently-cased
/// spellings of the same name collapse onto one entry. Names without any
/// letter or digit are escaped rather than collapsing onto `""`.
///
/// # Examples
///
/// ```
/// use schema_modelgen_core::naming::to_json_name;
///
/// assert_eq!(to_json_name("photo_urls"), "photoUrls");
/// assert_eq!(to_json_name("PhotoUrls"), "photoUrls");
/// assert_eq!(to_json_name("名前"), "名前");
/// ```
pub fn to_json_name(name: &str) -> String {
    let parts = words(name);
    if parts.is_empty() {
        return escaped(name);
    }
    let mut out = String::new();
    for (i, word) in parts.into_iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

/// Converts a name into lower-case words separated by spaces.
pub fn to_human_name(name: &str) -> String {
    let parts = words(name);
    if parts.is_empty() {
        return name.trim().to_string();
    }
    parts
        .into_iter()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
