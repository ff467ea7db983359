//! Naming helpers for model identities

use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

use crate::config::NamingStrategy;

/// Extract the bare identifier from a fully qualified type name.
///
/// `app::models::UserAccount<app::Id>` becomes `UserAccount`. Only `::` outside
/// angle brackets separates path segments, so qualified paths such as
/// `<app::Wrapper as app::Model>::Assoc` yield `Assoc`. Falls back to the whole
/// name when no segment is left.
pub fn identifier_of(type_name: &str) -> &str {
    let bytes = type_name.as_bytes();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                start = i + 2;
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }

    let segment = &type_name[start..];
    let segment = segment.split('<').next().unwrap_or(segment).trim();
    if segment.is_empty() {
        type_name.trim()
    } else {
        segment
    }
}

/// Normalize an identifier according to a naming strategy
pub fn normalize(identifier: &str, strategy: NamingStrategy) -> String {
    match strategy {
        NamingStrategy::Camel => identifier.to_lower_camel_case(),
        NamingStrategy::Snake => identifier.to_snake_case(),
        NamingStrategy::Pascal => identifier.to_upper_camel_case(),
        NamingStrategy::Kebab => identifier.to_kebab_case(),
        NamingStrategy::Preserve => identifier.to_string(),
    }
}
