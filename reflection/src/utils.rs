//! Utility functions

/// Convert PascalCase or camelCase to snake_case
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();

    for c in s.chars() {
        if c.is_uppercase() {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

/// Whether `s` can be used verbatim as a C++ / protobuf identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_conversion() {
        assert_eq!(to_snake_case("Health"), "health");
        assert_eq!(to_snake_case("bIsOpen"), "b_is_open");
        assert_eq!(to_snake_case("Max_Speed"), "max_speed");
        assert_eq!(to_snake_case("speed"), "speed");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("MyActor"));
        assert!(is_identifier("_Private1"));
        assert!(is_identifier("BP_Door_C"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1Actor"));
        assert!(!is_identifier("BP Door"));
        assert!(!is_identifier("Door-2"));
    }
}
