//! URL slug generation
//!
//! Slugs are lower-case ASCII words joined by single hyphens. Camel-cased
//! input is split into words first (`fooBar` → `foo-bar`) and common Latin
//! accents are transliterated instead of dropped.

use regex::Regex;
use std::sync::LazyLock;

/// Split points for camel-cased words, applied in order.
static DECAMELIZE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // fooBar -> foo Bar, v2Beta -> v2 Beta
        Regex::new(r"([a-z\d])([A-Z])").unwrap(),
        // HTMLParser -> HTML Parser
        Regex::new(r"([A-Z]+)([A-Z][a-z\d]+)").unwrap(),
    ]
});

/// Create a URL slug from arbitrary display text.
///
/// # Examples
///
/// ```
/// use contentgraph_core::utils::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
/// assert_eq!(slugify("Rust & Go!"), "rust-and-go");
/// ```
pub fn slugify(input: &str) -> String {
    let mut text = input.to_string();
    for pattern in DECAMELIZE_PATTERNS.iter() {
        text = pattern.replace_all(&text, "$1 $2").into_owned();
    }

    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for ch in text.chars() {
        let mut buf = [0u8; 4];
        let mapped: &str = match transliterate(ch) {
            Some(replacement) => replacement,
            None => ch.encode_utf8(&mut buf),
        };

        for c in mapped.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_separator && !slug.is_empty() {
                    slug.push('-');
                }
                pending_separator = false;
                slug.push(c.to_ascii_lowercase());
            } else {
                pending_separator = true;
            }
        }
    }

    slug
}

fn transliterate(ch: char) -> Option<&'static str> {
    let replacement = match ch {
        '&' => " and ",
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' | 'Ā' | 'Ă' | 'Ą' => "A",
        'æ' => "ae",
        'Æ' => "AE",
        'ç' | 'ć' | 'č' => "c",
        'Ç' | 'Ć' | 'Č' => "C",
        'ď' | 'đ' => "d",
        'Ď' | 'Đ' => "D",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'È' | 'É' | 'Ê' | 'Ë' | 'Ē' | 'Ė' | 'Ę' | 'Ě' => "E",
        'ğ' => "g",
        'Ğ' => "G",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'Ì' | 'Í' | 'Î' | 'Ï' | 'Ī' | 'Į' | 'İ' => "I",
        'ł' => "l",
        'Ł' => "L",
        'ñ' | 'ń' | 'ň' => "n",
        'Ñ' | 'Ń' | 'Ň' => "N",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' | 'Ō' | 'Ő' => "O",
        'œ' => "oe",
        'Œ' => "OE",
        'ř' => "r",
        'Ř' => "R",
        'ś' | 'š' | 'ş' => "s",
        'Ś' | 'Š' | 'Ş' => "S",
        'ß' => "ss",
        'ť' | 'ţ' => "t",
        'Ť' | 'Ţ' => "T",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' | 'ų' => "u",
        'Ù' | 'Ú' | 'Û' | 'Ü' | 'Ū' | 'Ů' | 'Ű' | 'Ų' => "U",
        'ý' | 'ÿ' => "y",
        'Ý' | 'Ÿ' => "Y",
        'ź' | 'ż' | 'ž' => "z",
        'Ź' | 'Ż' | 'Ž' => "Z",
        'þ' => "th",
        'Þ' => "TH",
        'ð' => "d",
        'Ð' => "D",
        _ => return None,
    };
    Some(replacement)
}
