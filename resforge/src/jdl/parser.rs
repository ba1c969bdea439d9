//! Lenient parser for the JDL-style definition language
//!
//! Recognized constructs:
//! - `config { framework laravel \n uriPrefix /api }`
//! - `entity Book { title string required \n pages integer }`
//! - `enum Status { DRAFT, PUBLISHED }`
//! - `relationship ManyToOne { Book{author} to Author }`
//!
//! Comments (`/* */`, `/** */`, `//`) are stripped first. Malformed lines and
//! blocks are dropped without error so that partially written definitions
//! still produce output.

use super::document::{JdlConfig, JdlDocument, JdlEntity, JdlEnum, JdlField, JdlRelation};
use crate::definition::RelationKind;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static DOC_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*\*.*?\*/").expect("Invalid regex"));
static BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("Invalid regex"));
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)//.*$").expect("Invalid regex"));

static ENTITY_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\bentity\s+([A-Za-z_][A-Za-z0-9_]*)\s*\{(.*?)\}").expect("Invalid regex")
});
static FIELD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s+([A-Za-z_][A-Za-z0-9_]*)\s*(required)?\s*$")
        .expect("Invalid regex")
});
static ENUM_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\benum\s+([A-Za-z_][A-Za-z0-9_]*)\s*\{(.*?)\}").expect("Invalid regex")
});
static ENUM_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*,\s*").expect("Invalid regex"));

static CONFIG_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\bconfig\s*\{(.*?)\}").expect("Invalid regex"));
static CONFIG_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(framework|driver|uriPrefix)\s+(.+)$").expect("Invalid regex"));
static CONFIG_FLAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(uuid|tenant|softDeletes|audit|factory)\s+(true|false)$").expect("Invalid regex")
});
static CONFIG_FEATURES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"features\s*\{").expect("Invalid regex"));

static RELATION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\brelationship\s+(OneToOne|OneToMany|ManyToOne|ManyToMany)\s*\{")
        .expect("Invalid regex")
});
static RELATION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([A-Za-z_][A-Za-z0-9_]*)(\{([^}]+)\})?\s+to\s+([A-Za-z_][A-Za-z0-9_]*)(\{([^}]+)\})?\s*$",
    )
    .expect("Invalid regex")
});
static IDENTIFIER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").expect("Invalid regex"));

/// Text to [`JdlDocument`] parser
pub struct JdlParser;

impl JdlParser {
    /// Parse a definition document
    ///
    /// Never fails; unrecognized input is skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// # use resforge::jdl::JdlParser;
    /// let doc = JdlParser::parse("entity Book { title string required\n oops }");
    /// assert_eq!(doc.entities["Book"].fields.len(), 1);
    /// ```
    #[must_use]
    pub fn parse(content: &str) -> JdlDocument {
        let src = strip_comments(content);

        JdlDocument {
            config: parse_config(&src),
            entities: parse_entities(&src),
            enums: parse_enums(&src),
            relations: parse_relations(&src),
        }
    }
}

fn strip_comments(content: &str) -> String {
    let src = DOC_COMMENT.replace_all(content, "");
    let src = BLOCK_COMMENT.replace_all(&src, "");
    LINE_COMMENT.replace_all(&src, "").into_owned()
}

/// Split on any line terminator, trim, drop blanks
fn lines(body: &str) -> impl Iterator<Item = &str> {
    body.split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

fn parse_entities(src: &str) -> IndexMap<String, JdlEntity> {
    let mut out = IndexMap::new();

    for caps in ENTITY_BLOCK.captures_iter(src) {
        let name = caps[1].trim().to_string();
        let fields = lines(&caps[2]).filter_map(parse_field_line).collect();
        out.insert(name.clone(), JdlEntity { name, fields });
    }

    out
}

fn parse_field_line(line: &str) -> Option<JdlField> {
    let Some(caps) = FIELD_LINE.captures(line) else {
        tracing::debug!(line, "dropping malformed field line");
        return None;
    };

    Some(JdlField {
        name: caps[1].to_string(),
        field_type: caps[2].to_string(),
        required: caps.get(3).is_some(),
    })
}

fn parse_enums(src: &str) -> IndexMap<String, JdlEnum> {
    let mut out = IndexMap::new();

    for caps in ENUM_BLOCK.captures_iter(src) {
        let name = caps[1].trim().to_string();
        let values = ENUM_SEPARATOR
            .split(caps[2].trim())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        out.insert(name.clone(), JdlEnum { name, values });
    }

    out
}

fn parse_config(src: &str) -> JdlConfig {
    let mut config = JdlConfig::default();
    let Some(caps) = CONFIG_BLOCK.captures(src) else {
        return config;
    };

    for line in lines(caps[1].trim()) {
        if let Some(m) = CONFIG_TEXT.captures(line) {
            let value = m[2].trim().to_string();
            match &m[1] {
                "framework" => config.framework = value,
                "driver" => config.driver = value,
                _ => config.uri_prefix = value,
            }
            continue;
        }

        if let Some(m) = CONFIG_FLAG.captures(line) {
            let value = &m[2] == "true";
            match &m[1] {
                "uuid" => config.uuid = value,
                "tenant" => config.tenant = value,
                "softDeletes" => config.soft_deletes = value,
                "audit" => config.audit = value,
                _ => config.factory = value,
            }
            continue;
        }

        if CONFIG_FEATURES.is_match(line) {
            continue;
        }

        tracing::debug!(line, "ignoring unknown config line");
    }

    config
}

fn parse_relations(src: &str) -> Vec<JdlRelation> {
    let mut relations = Vec::new();
    let mut pos = 0;

    // Search resumes after each block; a literal "relationship" that fails the
    // header pattern is passed over by the forward search.
    while pos < src.len() {
        let Some(caps) = RELATION_HEADER.captures_at(src, pos) else {
            break;
        };
        let (Some(header), Ok(kind)) = (caps.get(0), caps[1].parse::<RelationKind>()) else {
            break;
        };

        let open = header.end() - 1;
        let (body, end) = read_balanced_body(src, open);
        pos = end;

        relations.extend(lines(body.trim()).filter_map(|line| parse_relation_line(kind, line)));
    }

    relations
}

/// Body between the brace at `open` and its matching close, plus the offset
/// just past the close. Unbalanced input yields an empty body and end of input.
fn read_balanced_body(src: &str, open: usize) -> (&str, usize) {
    let mut depth = 0usize;
    let mut start = None;

    for (offset, byte) in src.bytes().enumerate().skip(open) {
        match byte {
            b'{' => {
                depth += 1;
                if depth == 1 {
                    start = Some(offset + 1);
                }
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some(start) = start {
                        return (&src[start..offset], offset + 1);
                    }
                }
            }
            _ => {}
        }
    }

    ("", src.len())
}

fn parse_relation_line(kind: RelationKind, line: &str) -> Option<JdlRelation> {
    let Some(caps) = RELATION_LINE.captures(line) else {
        tracing::debug!(line, %kind, "dropping malformed relation line");
        return None;
    };

    Some(JdlRelation {
        kind,
        from_entity: caps[1].to_string(),
        from_field: caps.get(3).map(|m| extract_field_name(m.as_str())),
        to_entity: caps[4].to_string(),
        to_field: caps.get(6).map(|m| extract_field_name(m.as_str())),
    })
}

/// Leading identifier of a brace hint, or the trimmed hint itself
fn extract_field_name(raw: &str) -> String {
    let raw = raw.trim();
    IDENTIFIER_PREFIX
        .find(raw)
        .map_or_else(|| raw.to_string(), |m| m.as_str().to_string())
}
