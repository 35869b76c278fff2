//! # Vietnamese Localization
//!
//! The core carries stems and branches as bare Latin tokens (`Giap`, `Ti`,
//! ...). This module owns the closed token-to-diacritic map and applies it
//! token by token to composed labels; it is the only place diacritics for
//! stems and branches come from, keeping the mapping out of the data model.

/// Diacritic form of a single bare token, if it is one of the ten stems or
/// twelve branches.
pub fn localize_token(token: &str) -> Option<&'static str> {
    let localized = match token {
        "Giap" => "Giáp",
        "At" => "Ất",
        "Binh" => "Bính",
        "Dinh" => "Đinh",
        "Mau" => "Mậu",
        "Ky" => "Kỷ",
        "Canh" => "Canh",
        "Tan" => "Tân",
        "Nham" => "Nhâm",
        "Quy" => "Quý",
        "Ti" => "Tí",
        "Suu" => "Sửu",
        "Dan" => "Dần",
        "Mao" => "Mão",
        "Thin" => "Thìn",
        "Ty" => "Tỵ",
        "Ngo" => "Ngọ",
        "Mui" => "Mùi",
        "Than" => "Thân",
        "Dau" => "Dậu",
        "Tuat" => "Tuất",
        "Hoi" => "Hợi",
        _ => return None,
    };
    Some(localized)
}

/// Localize every whitespace-separated token of a phrase, leaving tokens
/// outside the map untouched.
pub fn localize(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(|token| localize_token(token).unwrap_or(token))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localize_tokens() {
        assert_eq!(localize_token("Giap"), Some("Giáp"));
        assert_eq!(localize_token("Hoi"), Some("Hợi"));
        assert_eq!(localize_token("Canh"), Some("Canh"));
        assert_eq!(localize_token("giap"), None);
    }

    #[test]
    fn test_localize_phrase() {
        assert_eq!(localize("At Hoi"), "Ất Hợi");
        assert_eq!(localize("Mau Tuat"), "Mậu Tuất");
        assert_eq!(localize("Dinh Suu"), "Đinh Sửu");
    }
}
