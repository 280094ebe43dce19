//! Name inflection for Rails naming conventions
//!
//! Converts words between singular and plural forms and between CamelCase
//! class names and snake_case file names. Everything here is pure and total:
//! unusual input comes back unchanged rather than failing.

/// Irregular singular/plural pairs, consulted before any suffix rule
const IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("ox", "oxen"),
    ("vertex", "vertices"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("alias", "aliases"),
    ("status", "statuses"),
    ("crisis", "crises"),
    ("analysis", "analyses"),
    ("diagnosis", "diagnoses"),
    ("thesis", "theses"),
    ("phenomenon", "phenomena"),
    ("criterion", "criteria"),
    ("datum", "data"),
];

/// Check whether a character is one of `a, e, i, o, u` (any case)
pub fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Character preceding the final `suffix_len` bytes, if any
fn char_before_suffix(word: &str, suffix_len: usize) -> Option<char> {
    word.get(..word.len().saturating_sub(suffix_len))?
        .chars()
        .next_back()
}

fn preceded_by_consonant(word: &str, suffix_len: usize) -> bool {
    char_before_suffix(word, suffix_len).is_some_and(|c| !is_vowel(c))
}

/// Convert a word to its singular form
///
/// ```text
/// categories -> category, people -> person, boxes -> box, users -> user
/// ```
pub fn singularize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lowercase = word.to_ascii_lowercase();
    if let Some((singular, _)) = IRREGULARS.iter().find(|(_, plural)| *plural == lowercase) {
        return (*singular).to_string();
    }

    let stem = |n: usize| word[..word.len() - n].to_string();

    if word.ends_with("ies") {
        format!("{}y", stem(3))
    } else if word.ends_with("ves") {
        format!("{}f", stem(3))
    } else if word.ends_with("xes")
        || word.ends_with("ches")
        || word.ends_with("sses")
        || word.ends_with("shes")
    {
        stem(2)
    } else if word.ends_with("oes") && word.len() > 3 {
        stem(2)
    } else if word.ends_with("es") {
        stem(1)
    } else if word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("is") {
        stem(1)
    } else {
        word.to_string()
    }
}

/// Convert a word to its plural form
///
/// Words that already look plural are returned unchanged.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lowercase = word.to_ascii_lowercase();
    if let Some((_, plural)) = IRREGULARS.iter().find(|(singular, _)| *singular == lowercase) {
        return (*plural).to_string();
    }

    let looks_plural = (word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is"))
        || word.ends_with("ese")
        || word.ends_with("ose")
        || word.ends_with("ice");
    if looks_plural {
        return word.to_string();
    }

    let stem = |n: usize| &word[..word.len() - n];

    if word.ends_with('y') && preceded_by_consonant(word, 1) {
        format!("{}ies", stem(1))
    } else if word.ends_with('f') {
        format!("{}ves", stem(1))
    } else if word.ends_with("fe") {
        format!("{}ves", stem(2))
    } else if word.ends_with('o') && preceded_by_consonant(word, 1) {
        format!("{word}es")
    } else if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        format!("{word}es")
    } else if word.ends_with("is") {
        format!("{}es", stem(2))
    } else {
        format!("{word}s")
    }
}

/// Convert a CamelCase class name to a snake_case file stem
///
/// An underscore is inserted before every interior uppercase letter.
/// Namespace separators (`::`) become path separators, so
/// `Admin::UsersController` maps to `admin/users_controller`.
pub fn camel_to_snake(name: &str) -> String {
    name.split("::")
        .map(|segment| {
            let mut snake = String::with_capacity(segment.len() + 4);
            for (i, c) in segment.chars().enumerate() {
                if c.is_ascii_uppercase() {
                    if i > 0 {
                        snake.push('_');
                    }
                    snake.push(c.to_ascii_lowercase());
                } else {
                    snake.push(c);
                }
            }
            snake
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Convert a snake_case word to a CamelCase class name
///
/// Every underscore-separated part is capitalized (`line_items` gives
/// `LineItems`), not only the first letter. For single-word names this is the
/// same as [`capitalize`]. Association targets rely on the wider form so that
/// `has_many :line_items` resolves to `LineItem`.
pub fn camelize(word: &str) -> String {
    word.split('_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect()
}

/// Upper-case the first character of a word
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
