//! Property-accessor naming conventions.
//!
//! Accessor names encode a property name (`getFoo`/`isFoo`/`setFoo` for
//! `foo`). The encapsulate-fields rewriter uses decoding both ways: to
//! suggest accessor names for a field and to recognize a "simple" accessor
//! whose name trivially decodes back to the field's own name.

/// Decodes a getter name to its property name. `allow_is` also accepts the
/// `is` prefix used for boolean properties.
pub fn property_name_by_getter(name: &str, allow_is: bool) -> Option<String> {
    if let Some(rest) = name.strip_prefix("get") {
        return decode_suffix(rest);
    }
    if allow_is {
        if let Some(rest) = name.strip_prefix("is") {
            return decode_suffix(rest);
        }
    }
    None
}

/// Decodes a setter name to its property name.
pub fn property_name_by_setter(name: &str) -> Option<String> {
    decode_suffix(name.strip_prefix("set")?)
}

fn decode_suffix(rest: &str) -> Option<String> {
    let mut chars = rest.chars();
    let first = chars.next()?;
    if !first.is_uppercase() {
        return None;
    }
    // JavaBeans decapitalization: `URL` stays `URL`, `Foo` becomes `foo`.
    if chars.next().is_some_and(char::is_uppercase) {
        return Some(rest.to_string());
    }
    let mut out = String::with_capacity(rest.len());
    out.extend(first.to_lowercase());
    out.push_str(&rest[first.len_utf8()..]);
    Some(out)
}

fn encode(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    // Mirror decapitalization: a name whose second character is uppercase is
    // used verbatim so the round trip stays lossless.
    if chars.next().is_some_and(char::is_uppercase) {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len());
    out.extend(first.to_uppercase());
    out.push_str(&name[first.len_utf8()..]);
    out
}

/// Conventional getter name for a field; boolean fields get the `is` prefix.
pub fn suggest_getter_name(field_name: &str, is_boolean: bool) -> String {
    let prefix = if is_boolean { "is" } else { "get" };
    format!("{prefix}{}", encode(field_name))
}

pub fn suggest_setter_name(field_name: &str) -> String {
    format!("set{}", encode(field_name))
}

/// Validates an accessor name as a usable identifier.
///
/// Conservative ASCII-only subset: `_` or letter first, alphanumeric or `_`
/// after, and not a reserved keyword.
pub fn is_valid_identifier(name: &str) -> bool {
    let name = name.trim();
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return false;
    }
    !is_keyword(name)
}

fn is_keyword(ident: &str) -> bool {
    matches!(
        ident,
        "abstract"
            | "assert"
            | "boolean"
            | "break"
            | "byte"
            | "case"
            | "catch"
            | "char"
            | "class"
            | "const"
            | "continue"
            | "default"
            | "do"
            | "double"
            | "else"
            | "enum"
            | "extends"
            | "final"
            | "finally"
            | "float"
            | "for"
            | "goto"
            | "if"
            | "implements"
            | "import"
            | "instanceof"
            | "int"
            | "interface"
            | "long"
            | "native"
            | "new"
            | "package"
            | "private"
            | "protected"
            | "public"
            | "return"
            | "short"
            | "static"
            | "strictfp"
            | "super"
            | "switch"
            | "synchronized"
            | "this"
            | "throw"
            | "throws"
            | "transient"
            | "try"
            | "void"
            | "volatile"
            | "while"
            | "true"
            | "false"
            | "null"
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn getter_and_setter_names_decode() {
        assert_eq!(property_name_by_getter("getValue", true).as_deref(), Some("value"));
        assert_eq!(property_name_by_getter("isEmpty", true).as_deref(), Some("empty"));
        assert_eq!(property_name_by_getter("isEmpty", false), None);
        assert_eq!(property_name_by_setter("setValue").as_deref(), Some("value"));
        assert_eq!(property_name_by_setter("getValue"), None);
        assert_eq!(property_name_by_getter("getvalue", true), None);
    }

    #[test]
    fn consecutive_capitals_survive_the_round_trip() {
        assert_eq!(property_name_by_getter("getURL", true).as_deref(), Some("URL"));
        assert_eq!(suggest_getter_name("URL", false), "getURL");
        assert_eq!(suggest_setter_name("x"), "setX");
        assert_eq!(suggest_getter_name("open", true), "isOpen");
    }

    #[test]
    fn identifier_validation_rejects_keywords() {
        assert!(is_valid_identifier("getValue"));
        assert!(is_valid_identifier("_x1"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("1abc"));
        assert!(!is_valid_identifier("class"));
        assert!(!is_valid_identifier("a-b"));
    }
}
