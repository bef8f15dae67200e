use lazy_static::lazy_static;
use regex::Regex;

/// Digits with an optional leading `+`. No country-code normalisation.
pub fn is_numeric_phone(phone: &str) -> bool {
    lazy_static! {
        static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9]+$").unwrap();
    }
    PHONE_RE.is_match(phone)
}

/// Keeps the first three and last four characters, e.g. `+38*****3456`.
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() < 8 {
        return "****".into();
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 7), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_digits_with_optional_plus() {
        assert!(is_numeric_phone("0612345678"));
        assert!(is_numeric_phone("+38763123456"));
    }

    #[test]
    fn rejects_formatting_and_letters() {
        assert!(!is_numeric_phone(""));
        assert!(!is_numeric_phone("+"));
        assert!(!is_numeric_phone("061 234 5678"));
        assert!(!is_numeric_phone("06123-45678"));
        assert!(!is_numeric_phone("phone12345"));
        assert!(!is_numeric_phone("12+3456789012"));
    }

    #[test]
    fn mask_hides_the_middle() {
        assert_eq!(mask_phone("+38763123456"), "+38*****3456");
        assert_eq!(mask_phone("0612345678"), "061***5678");
    }

    #[test]
    fn mask_hides_short_input_entirely() {
        assert_eq!(mask_phone("12345"), "****");
    }
}
