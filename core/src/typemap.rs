//! Static type and format lookup tables.
//!
//! These tables map schema type/format tokens onto Rust target types and
//! classify target types for the property builder. Custom-formatted scalars
//! live in the generated crate's `formats` module.

use crate::schema::Schema;

/// Target type used for values with no schema at all.
pub const INTERFACE_TYPE: &str = "serde_json::Value";

/// Target type for the declared `string` type.
pub const STRING_TYPE: &str = "String";

/// Schema type or format token → Rust target type.
///
/// Format tokens are looked up with dashes removed (`date-time` → `datetime`).
pub const TYPE_MAPPING: &[(&str, &str)] = &[
    ("byte", "formats::Base64"),
    ("date", "formats::Date"),
    ("datetime", "formats::DateTime"),
    ("uri", "formats::Uri"),
    ("email", "formats::Email"),
    ("hostname", "formats::Hostname"),
    ("ipv4", "formats::Ipv4"),
    ("ipv6", "formats::Ipv6"),
    ("uuid", "formats::Uuid"),
    ("uuid3", "formats::Uuid3"),
    ("uuid4", "formats::Uuid4"),
    ("uuid5", "formats::Uuid5"),
    ("isbn", "formats::Isbn"),
    ("isbn10", "formats::Isbn10"),
    ("isbn13", "formats::Isbn13"),
    ("creditcard", "formats::CreditCard"),
    ("ssn", "formats::Ssn"),
    ("hexcolor", "formats::HexColor"),
    ("rgbcolor", "formats::RgbColor"),
    ("duration", "formats::Duration"),
    ("password", "formats::Password"),
    ("char", "char"),
    ("int", "i64"),
    ("int8", "i8"),
    ("int16", "i16"),
    ("int32", "i32"),
    ("int64", "i64"),
    ("uint", "u64"),
    ("uint8", "u8"),
    ("uint16", "u16"),
    ("uint32", "u32"),
    ("uint64", "u64"),
    ("float", "f32"),
    ("double", "f64"),
    ("number", "f64"),
    ("integer", "i64"),
    ("boolean", "bool"),
    ("file", "formats::File"),
];

/// Target types rendered as plain Rust scalars.
pub const PRIMITIVES: &[&str] = &[
    "bool", "u8", "u16", "u32", "u64", "i8", "i16", "i32", "i64", "f32", "f64", "char", "String",
    "Vec<u8>",
];

/// Scalars that are textually primitive but carry their own parsing and
/// validation. Dates and durations are parsed structurally and are not in
/// this list.
pub const CUSTOM_FORMATTERS: &[&str] = &[
    "formats::Uri",
    "formats::Email",
    "formats::Hostname",
    "formats::Ipv4",
    "formats::Ipv6",
    "formats::Uuid",
    "formats::Uuid3",
    "formats::Uuid4",
    "formats::Uuid5",
    "formats::Isbn",
    "formats::Isbn10",
    "formats::Isbn13",
    "formats::CreditCard",
    "formats::Ssn",
    "formats::Password",
    "formats::HexColor",
    "formats::RgbColor",
    "formats::Base64",
];

/// Target type → zero-value expression.
pub const ZERO_VALUES: &[(&str, &str)] = &[
    ("String", "String::new()"),
    ("char", "'\\0'"),
    ("i8", "0"),
    ("i16", "0"),
    ("i32", "0"),
    ("i64", "0"),
    ("u8", "0"),
    ("u16", "0"),
    ("u32", "0"),
    ("u64", "0"),
    ("bool", "false"),
    ("f32", "0.0"),
    ("f64", "0.0"),
    ("formats::DateTime", "formats::DateTime::default()"),
    ("formats::Date", "formats::Date::default()"),
    ("formats::Uri", "formats::Uri::default()"),
    ("formats::Email", "formats::Email::default()"),
    ("formats::Hostname", "formats::Hostname::default()"),
    ("formats::Ipv4", "formats::Ipv4::default()"),
    ("formats::Ipv6", "formats::Ipv6::default()"),
    ("formats::Uuid", "formats::Uuid::default()"),
    ("formats::Uuid3", "formats::Uuid3::default()"),
    ("formats::Uuid4", "formats::Uuid4::default()"),
    ("formats::Uuid5", "formats::Uuid5::default()"),
    ("formats::Isbn", "formats::Isbn::default()"),
    ("formats::Isbn10", "formats::Isbn10::default()"),
    ("formats::Isbn13", "formats::Isbn13::default()"),
    ("formats::CreditCard", "formats::CreditCard::default()"),
    ("formats::Ssn", "formats::Ssn::default()"),
    ("formats::Password", "formats::Password::default()"),
    ("formats::HexColor", "formats::HexColor::from(\"#000000\")"),
    ("formats::RgbColor", "formats::RgbColor::from(\"rgb(0,0,0)\")"),
    ("formats::Base64", "formats::Base64::default()"),
    ("formats::Duration", "formats::Duration::default()"),
];

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Looks up the target type of a schema type or (dash-free) format token.
pub fn mapped_type(token: &str) -> Option<&'static str> {
    lookup(TYPE_MAPPING, token)
}

/// Looks up the target type of a format string.
///
/// # Examples
///
/// ```
/// use schema_modelgen_core::typemap::format_type;
///
/// assert_eq!(format_type("date-time"), Some("formats::DateTime"));
/// assert_eq!(format_type("int32"), Some("i32"));
/// assert_eq!(format_type("shoe-size"), None);
/// ```
pub fn format_type(format: &str) -> Option<&'static str> {
    mapped_type(&format.replace('-', ""))
}

/// Returns `true` for plain Rust scalar target types.
pub fn is_primitive(target_type: &str) -> bool {
    PRIMITIVES.contains(&target_type)
}

/// Returns `true` for custom-formatted scalar target types.
pub fn is_custom_formatter(target_type: &str) -> bool {
    CUSTOM_FORMATTERS.contains(&target_type)
}

/// Returns the zero-value expression for a target type, if it has one.
pub fn zero_value(target_type: &str) -> Option<&'static str> {
    lookup(ZERO_VALUES, target_type)
}

/// Resolves the target type of a simple (parameter or header style) schema.
///
/// Formats win over types; arrays wrap their element type in `Vec`, and an
/// array without `items` becomes a vector of untyped values. Tokens with no
/// mapping are returned as-is.
///
/// # Examples
///
/// ```
/// use schema_modelgen_core::{typemap::resolve_simple_type, Schema};
///
/// assert_eq!(resolve_simple_type("integer", Some("int32"), None), "i32");
/// let items = Schema::of_type("string").with_format("uuid");
/// assert_eq!(
///     resolve_simple_type("array", None, Some(&items)),
///     "Vec<formats::Uuid>"
/// );
/// ```
pub fn resolve_simple_type(type_name: &str, format: Option<&str>, items: Option<&Schema>) -> String {
    if let Some(target) = format.filter(|f| !f.is_empty()).and_then(format_type) {
        return target.to_string();
    }
    if let Some(target) = mapped_type(type_name) {
        return target.to_string();
    }
    if type_name == "array" {
        return match items {
            Some(items) => format!(
                "Vec<{}>",
                resolve_simple_type(
                    items.first_type(),
                    items.format.as_deref(),
                    items.single_items()
                )
            ),
            None => format!("Vec<{INTERFACE_TYPE}>"),
        };
    }
    if type_name == "string" {
        return STRING_TYPE.to_string();
    }
    type_name.to_string()
}
