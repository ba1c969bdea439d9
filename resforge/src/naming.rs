//! Naming conventions used by the parser, mapper and generators
//!
//! All functions are pure and deterministic. `snake`, `studly` and `camel`
//! round-trip for ASCII identifiers: `camel(snake(studly(x))) == camel(x)`.

use inflector::Inflector;

/// Nouns whose plural is not formed by a suffix rule
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("louse", "lice"),
    ("goose", "geese"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("ox", "oxen"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("knife", "knives"),
    ("wife", "wives"),
    ("half", "halves"),
    ("shelf", "shelves"),
    ("wolf", "wolves"),
    ("thief", "thieves"),
    ("datum", "data"),
    ("medium", "media"),
    ("criterion", "criteria"),
    ("phenomenon", "phenomena"),
    ("analysis", "analyses"),
    ("crisis", "crises"),
    ("thesis", "theses"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
    ("appendix", "appendices"),
    ("hero", "heroes"),
    ("potato", "potatoes"),
    ("tomato", "tomatoes"),
    ("echo", "echoes"),
];

/// Nouns with no distinct plural form
const UNCOUNTABLE: &[&str] = &[
    "sheep",
    "fish",
    "deer",
    "series",
    "species",
    "news",
    "money",
    "rice",
    "information",
    "equipment",
    "metadata",
    "feedback",
    "staff",
];

/// Case and number transforms for entity, field and table names
pub struct Naming;

impl Naming {
    /// Pluralize a word
    ///
    /// Only the last word is inflected: the part after the final `_`, `-`
    /// or the final capital of a studly name.
    ///
    /// # Examples
    ///
    /// ```
    /// # use resforge::naming::Naming;
    /// assert_eq!(Naming::plural("book"), "books");
    /// assert_eq!(Naming::plural("category"), "categories");
    /// assert_eq!(Naming::plural("book_tag"), "book_tags");
    /// assert_eq!(Naming::plural("person"), "people");
    /// assert_eq!(Naming::plural("UserPerson"), "UserPeople");
    /// ```
    #[must_use]
    pub fn plural(word: &str) -> String {
        let word = word.trim();
        if word.is_empty() {
            return String::new();
        }
        let split = last_word_start(word);
        let (head, last) = word.split_at(split);
        format!("{head}{}", pluralize_word(last))
    }

    /// Convert to `snake_case`
    ///
    /// An underscore goes before every capital that does not start the word,
    /// so acronyms keep one segment per letter (`userID` -> `user_i_d`).
    ///
    /// # Examples
    ///
    /// ```
    /// # use resforge::naming::Naming;
    /// assert_eq!(Naming::snake("BookTag"), "book_tag");
    /// assert_eq!(Naming::snake("publishedAt"), "published_at");
    /// ```
    #[must_use]
    pub fn snake(word: &str) -> String {
        let mut out = String::with_capacity(word.len() + 4);
        for (i, ch) in word.trim().chars().enumerate() {
            if ch == '-' || ch.is_whitespace() || ch == '_' {
                if !out.ends_with('_') {
                    out.push('_');
                }
                continue;
            }
            if ch.is_uppercase() && i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        }
        out
    }

    /// Convert to `StudlyCase`
    ///
    /// `-` and `_` separate words; each word gets an uppercase first letter
    /// and keeps the rest as written.
    ///
    /// # Examples
    ///
    /// ```
    /// # use resforge::naming::Naming;
    /// assert_eq!(Naming::studly("book_tag"), "BookTag");
    /// assert_eq!(Naming::studly("book-tag"), "BookTag");
    /// assert_eq!(Naming::studly("BookTag"), "BookTag");
    /// assert_eq!(Naming::studly("HTTPServer"), "HTTPServer");
    /// ```
    #[must_use]
    pub fn studly(word: &str) -> String {
        word.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(ucfirst)
            .collect()
    }

    /// Convert to `camelCase`
    ///
    /// # Examples
    ///
    /// ```
    /// # use resforge::naming::Naming;
    /// assert_eq!(Naming::camel("book_tag"), "bookTag");
    /// assert_eq!(Naming::camel("Author"), "author");
    /// assert_eq!(Naming::camel("userID"), "userID");
    /// ```
    #[must_use]
    pub fn camel(word: &str) -> String {
        let word = word.trim();
        if word.is_empty() {
            return String::new();
        }
        Self::lcfirst(&Self::studly(word))
    }

    /// Convert to kebab-case
    #[must_use]
    pub fn kebab(word: &str) -> String {
        Self::snake(word).replace('_', "-")
    }

    /// Table name for an entity (`snake_case` plural)
    ///
    /// # Examples
    ///
    /// ```
    /// # use resforge::naming::Naming;
    /// assert_eq!(Naming::table_name("BookTag"), "book_tags");
    /// assert_eq!(Naming::table_name("Category"), "categories");
    /// ```
    #[must_use]
    pub fn table_name(entity: &str) -> String {
        Self::plural(&Self::snake(entity))
    }

    /// Human readable title ("`BookTag`" -> "Book Tag")
    #[must_use]
    pub fn title(word: &str) -> String {
        word.trim().to_title_case()
    }

    /// Lowercase the first character only
    #[must_use]
    pub fn lcfirst(word: &str) -> String {
        let mut chars = word.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_lowercase().chain(chars).collect()
        })
    }
}

fn ucfirst(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Byte offset where the last word of a snake, kebab or studly name starts
fn last_word_start(word: &str) -> usize {
    let mut start = 0;
    let mut prev: Option<char> = None;
    for (i, ch) in word.char_indices() {
        match prev {
            Some('_' | '-') => start = i,
            Some(p) if ch.is_uppercase() && !p.is_uppercase() => start = i,
            _ => {}
        }
        prev = Some(ch);
    }
    start
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(single, _)| *single == lower) {
        return match_case(word, plural);
    }
    if IRREGULAR.iter().any(|(_, plural)| *plural == lower) {
        return word.to_string();
    }

    let upper = word.len() > 1 && word.chars().all(|c| !c.is_lowercase());
    let suffix = |s: &str| {
        if upper {
            s.to_uppercase()
        } else {
            s.to_string()
        }
    };

    if ["ss", "sh", "ch", "us", "x", "z"].iter().any(|end| lower.ends_with(end)) {
        return format!("{word}{}", suffix("es"));
    }
    if lower.ends_with('s') {
        return word.to_string();
    }
    if let Some(stem) = lower.strip_suffix('y') {
        if stem.ends_with(|c: char| !"aeiou".contains(c)) {
            return format!("{}{}", &word[..word.len() - 1], suffix("ies"));
        }
    }
    format!("{word}{}", suffix("s"))
}

fn match_case(original: &str, replacement: &str) -> String {
    if original.len() > 1 && original.chars().all(|c| !c.is_lowercase()) {
        replacement.to_uppercase()
    } else if original.starts_with(char::is_uppercase) {
        ucfirst(replacement)
    } else {
        replacement.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plural() {
        assert_eq!(Naming::plural("author"), "authors");
        assert_eq!(Naming::plural("tag"), "tags");
        assert_eq!(Naming::plural("address"), "addresses");
        assert_eq!(Naming::plural("status"), "statuses");
        assert_eq!(Naming::plural("box"), "boxes");
        assert_eq!(Naming::plural("day"), "days");
        assert_eq!(Naming::plural("books"), "books");
        assert_eq!(Naming::plural(""), "");
    }

    #[test]
    fn test_plural_irregular_nouns() {
        assert_eq!(Naming::plural("person"), "people");
        assert_eq!(Naming::plural("child"), "children");
        assert_eq!(Naming::plural("mouse"), "mice");
        assert_eq!(Naming::plural("Person"), "People");
        assert_eq!(Naming::plural("people"), "people");
        assert_eq!(Naming::plural("sheep"), "sheep");
    }

    #[test]
    fn test_plural_inflects_last_segment_only() {
        assert_eq!(Naming::plural("user_person"), "user_people");
        assert_eq!(Naming::plural("UserPerson"), "UserPeople");
        assert_eq!(Naming::plural("shop-category"), "shop-categories");
        assert_eq!(Naming::plural("person_name"), "person_names");
        assert_eq!(Naming::table_name("Person"), "people");
        assert_eq!(Naming::table_name("ChildMouse"), "child_mice");
    }

    #[test]
    fn test_snake() {
        assert_eq!(Naming::snake("Book"), "book");
        assert_eq!(Naming::snake("UserProfile"), "user_profile");
        assert_eq!(Naming::snake("  created_at "), "created_at");
        assert_eq!(Naming::snake("userID"), "user_i_d");
        assert_eq!(Naming::snake("book-tag"), "book_tag");
    }

    #[test]
    fn test_studly_and_camel() {
        assert_eq!(Naming::studly("user_profile"), "UserProfile");
        assert_eq!(Naming::studly("book"), "Book");
        assert_eq!(Naming::studly("HTTPServer"), "HTTPServer");
        assert_eq!(Naming::studly("a_b_c"), "ABC");
        assert_eq!(Naming::camel("UserProfile"), "userProfile");
        assert_eq!(Naming::camel("tags"), "tags");
        assert_eq!(Naming::camel("a_b_c"), "aBC");
        assert_eq!(Naming::camel("  "), "");
    }

    #[test]
    fn test_round_trip_edge_identifiers() {
        for input in ["a_b_c", "userID", "HTTPServer", "a1B", "ab_", "A__b"] {
            let round = Naming::camel(&Naming::snake(&Naming::studly(input)));
            assert_eq!(round, Naming::camel(input), "round trip of {input}");
        }
    }

    #[test]
    fn test_kebab() {
        assert_eq!(Naming::kebab("BookTag"), "book-tag");
        assert_eq!(Naming::kebab("book_tag"), "book-tag");
    }

    #[test]
    fn test_table_name() {
        assert_eq!(Naming::table_name("Book"), "books");
        assert_eq!(Naming::table_name("UserProfile"), "user_profiles");
    }

    #[test]
    fn test_lcfirst() {
        assert_eq!(Naming::lcfirst("Author"), "author");
        assert_eq!(Naming::lcfirst(""), "");
    }

    proptest! {
        #[test]
        fn prop_camel_round_trip(input in "[A-Za-z][A-Za-z0-9_]{0,12}") {
            let round = Naming::camel(&Naming::snake(&Naming::studly(&input)));
            prop_assert_eq!(round, Naming::camel(&input));
        }

        #[test]
        fn prop_studly_has_no_separators(input in "[A-Za-z][A-Za-z0-9_-]{0,12}") {
            let studly = Naming::studly(&input);
            prop_assert!(!studly.contains('_') && !studly.contains('-'));
        }

        #[test]
        fn prop_plural_keeps_prefix(head in "[a-z]{2,6}", tail in "[a-z]{2,6}") {
            let input = format!("{head}_{tail}");
            let plural = Naming::plural(&input);
            let prefix = format!("{head}_");
            prop_assert!(plural.starts_with(&prefix));
        }
    }
}
