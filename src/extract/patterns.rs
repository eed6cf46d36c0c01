//! Lexical patterns used by the heuristic extractor.
//!
//! All patterns run against upper-cased, comment-free SQL.

use regex::Regex;
use std::sync::LazyLock;

/// Identifier: word characters, dots, hyphens, optionally delimited.
macro_rules! ident {
    () => {
        r#"([`"\[\]\w.\-]+)"#
    };
}

static LINE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)--.*$").unwrap());

static BLOCK_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

pub(super) static FROM_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(concat!(r"\bFROM\s+", ident!())).unwrap());

pub(super) static JOIN_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(r"\b(?:(?:INNER|LEFT|RIGHT|FULL)\s+)?JOIN\s+", ident!())).unwrap()
});

pub(super) static INSERT_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(concat!(r"\bINSERT\s+INTO\s+", ident!())).unwrap());

pub(super) static CREATE_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\bCREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?",
        ident!()
    ))
    .unwrap()
});

pub(super) static INTO_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(concat!(r"\bINTO\s+", ident!())).unwrap());

/// First `SELECT ... FROM` span; nested selects are not recursed into.
pub(super) static SELECT_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\bSELECT\s+(.*?)\bFROM\b").unwrap());

/// `name`, `qualifier.name`, either optionally followed by `AS alias`.
pub(super) static COLUMN_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)(?:\.(\w+))?(?:\s+AS\s+(\w+))?").unwrap());

static KEYWORDS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    ["INSERT", "CREATE", "SELECT", "UPDATE", "DELETE", "MERGE", "INTO"]
        .into_iter()
        .map(|kw| (kw, Regex::new(&format!(r"\b{}\b", kw)).unwrap()))
        .collect()
});

/// Upper-case the text and strip `--` line comments and `/* */` block comments.
pub fn preprocess(sql: &str) -> String {
    let upper = sql.to_uppercase();
    let without_line = LINE_COMMENT.replace_all(upper.trim(), "");
    BLOCK_COMMENT.replace_all(&without_line, "").into_owned()
}

/// Whether a keyword occurs as a whole word in preprocessed SQL.
pub(super) fn has_keyword(sql: &str, keyword: &str) -> bool {
    KEYWORDS
        .iter()
        .find(|(kw, _)| *kw == keyword)
        .map(|(_, re)| re.is_match(sql))
        .unwrap_or(false)
}

/// Collect the first capture group of every match, in text order.
pub(super) fn captures(re: &Regex, sql: &str) -> Vec<String> {
    re.captures_iter(sql)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .collect()
}
