//! Word inflections used to derive labels, identifiers and URL segments
//! from stack and custom operation names.

use heck::ToSnakeCase;

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "fish",
    "information",
    "jeans",
    "money",
    "rice",
    "series",
    "sheep",
    "species",
];

/// Irregular forms, highest precedence first.
const IRREGULAR: &[(&str, &str)] = &[
    ("zombie", "zombies"),
    ("cow", "kine"),
    ("move", "moves"),
    ("sex", "sexes"),
    ("child", "children"),
    ("human", "humans"),
    ("man", "men"),
    ("person", "people"),
];

/// Human-readable label: `blog_post` → `Blog post`, `author_id` → `Author`.
///
/// CamelCase input is not split, so `BlogPost` becomes `Blogpost`.
pub fn humanize(word: &str) -> String {
    let word = word.strip_suffix("_id").unwrap_or(word);
    let lowered = word.replace('_', " ").to_ascii_lowercase();

    let mut chars = lowered.chars();
    match chars.next() {
        Some(first) if first.is_alphanumeric() || first == '_' => {
            first.to_uppercase().chain(chars).collect()
        }
        Some(_) => lowered,
        None => String::new(),
    }
}

/// Snake-case identifier: `BlogPost` → `blog_post`.
///
/// Spaces and repeated separators collapse into a single underscore.
pub fn underscore(word: &str) -> String {
    word.to_snake_case()
}

/// Replace underscores with dashes. Casing is left alone.
pub fn dasherize(word: &str) -> String {
    word.replace('_', "-")
}

/// Pluralize `word` by rewriting its ending.
///
/// Rules match case-insensitively against the end of the whole input and
/// only rewrite the matched tail, so `BlogPost` → `BlogPosts`,
/// `Woman` → `Women` and `SalesPerson` → `SalesPeople`. Uncountable words
/// are only recognized when they make up the whole input.
pub fn pluralize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if word.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }

    let (keep, suffix) = irregular_rule(word, &lower).unwrap_or_else(|| suffix_rule(&lower));
    format!("{}{suffix}", &word[..keep])
}

/// Returns how many bytes of the input survive and what gets appended.
fn irregular_rule(word: &str, lower: &str) -> Option<(usize, &'static str)> {
    for &(singular, plural) in IRREGULAR {
        if singular[..1] == plural[..1] {
            // The first letter keeps the caller's casing.
            if lower.ends_with(plural) {
                return Some((word.len() - plural.len() + 1, &plural[1..]));
            }
            if lower.ends_with(singular) {
                return Some((word.len() - singular.len() + 1, &plural[1..]));
            }
        } else {
            if lower.ends_with(plural) {
                return Some((word.len(), ""));
            }
            if lower.ends_with(singular) {
                let start = word.len() - singular.len();
                let upper = word[start..].starts_with(|c: char| c.is_ascii_uppercase());
                return Some((start, if upper { "Kine" } else { plural }));
            }
        }
    }
    None
}

fn suffix_rule(lower: &str) -> (usize, &'static str) {
    let len = lower.len();
    let byte_before = |n: usize| lower.as_bytes().get(len.wrapping_sub(n + 1)).copied();

    if lower.ends_with("quiz") {
        return (len, "zes");
    }
    if lower == "oxen" {
        return (len, "");
    }
    if lower == "ox" {
        return (len, "en");
    }
    if ends_with_any(lower, &["mice", "lice"]) {
        return (len, "");
    }
    if ends_with_any(lower, &["mouse", "louse"]) {
        return (len - 4, "ice");
    }
    if lower.ends_with("passersby") {
        return (len - 3, "sby");
    }
    if lower.ends_with("passerby") {
        return (len - 2, "sby");
    }
    if ends_with_any(lower, &["matrix", "matrex", "vertix", "vertex", "indix", "index"]) {
        return (len - 2, "ices");
    }
    if ends_with_any(lower, &["x", "ch", "ss", "sh"]) {
        return (len, "es");
    }
    if lower.ends_with('y') {
        let consonant = byte_before(1).is_some_and(|b| !b"aeiouy".contains(&b));
        if consonant || lower.ends_with("quy") {
            return (len - 1, "ies");
        }
    }
    if lower.ends_with("hive") {
        return (len, "s");
    }
    if ends_with_any(lower, &["lf", "rf"]) {
        return (len - 1, "ves");
    }
    if lower.ends_with("fe") && byte_before(2).is_some_and(|b| b != b'f') {
        return (len - 2, "ves");
    }
    if lower.ends_with("sis") {
        return (len - 3, "ses");
    }
    if ends_with_any(lower, &["ta", "ia"]) {
        return (len, "");
    }
    if ends_with_any(lower, &["tum", "ium"]) {
        return (len - 2, "a");
    }
    if ends_with_any(lower, &["buffalo", "potato", "tomato"]) {
        return (len - 1, "oes");
    }
    if lower.ends_with("bus") {
        return (len - 1, "ses");
    }
    if ends_with_any(lower, &["alias", "status"]) {
        return (len, "es");
    }
    if ends_with_any(lower, &["octopi", "viri"]) {
        return (len, "");
    }
    if ends_with_any(lower, &["octopus", "virus"]) {
        return (len - 2, "i");
    }
    if matches!(lower, "axis" | "testis") {
        return (len - 2, "es");
    }
    if lower.ends_with('s') {
        return (len, "");
    }
    (len, "s")
}

fn ends_with_any(word: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|suffix| word.ends_with(suffix))
}
