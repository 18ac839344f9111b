//! Parameter extraction.
//!
//! Every task kind declares a small schema of named captures, each a regex
//! with a required flag and optionally which occurrence of the pattern to
//! take. Extraction runs each capture independently and best-effort: a miss
//! leaves the name absent rather than failing the request. The engine consults
//! [`Extractor::missing_required`] before dispatch so no handler ever sees a
//! required parameter absent.
//!
//! Extraction performs no I/O and has no side effects.

use std::collections::HashMap;

use regex::Regex;

use crate::classify::TaskKind;

/// Extracted parameters for one question. Absence of a name means the
/// capture found nothing.
#[derive(Debug, Default, Clone)]
pub struct ParameterSet {
    values: HashMap<&'static str, String>,
}

impl ParameterSet {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn insert(&mut self, name: &'static str, value: String) {
        self.values.insert(name, value);
    }
}

/// Declaration of one named capture.
pub struct CaptureSpec {
    pub name: &'static str,
    pattern: &'static str,
    pub required: bool,
    /// Which match of the pattern to take (0-based). Lets two specs share one
    /// pattern, e.g. the first and second date expression in the question.
    occurrence: usize,
    /// Optional cleanup/validation; returning `None` discards the capture.
    post: Option<fn(&str) -> Option<String>>,
}

const fn required(name: &'static str, pattern: &'static str) -> CaptureSpec {
    CaptureSpec {
        name,
        pattern,
        required: true,
        occurrence: 0,
        post: None,
    }
}

const fn optional(name: &'static str, pattern: &'static str) -> CaptureSpec {
    CaptureSpec {
        name,
        pattern,
        required: false,
        occurrence: 0,
        post: None,
    }
}

/// A URL token; cleaned and validated by [`clean_url`].
const URL: &str = r#"https?://[^\s"'<>)]+"#;

/// A date expression: `January 1, 2024`, `2024-01-01`, or `1 January 2024`.
const DATE: &str = r"(?i)\b(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{1,2},\s*\d{4}|\b\d{4}-\d{2}-\d{2}\b|(?i)\b\d{1,2}\s+(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{4}\b";

/// A known charset token (the encoding adapter resolves the exact label).
const ENCODING: &str =
    r"(?i)\b(utf-?8|utf-?16(?:le|be)?|cp-?1252|windows-?1252|latin-?1|iso-?8859-?1|us-ascii|ascii)\b";

const HTTP_HEAD_STATUS: &[CaptureSpec] = &[CaptureSpec {
    name: "url",
    pattern: URL,
    required: true,
    occurrence: 0,
    post: Some(clean_url),
}];

// Two specs for the same name: a backtick-fenced command wins over the
// looser "command ..."/"run ..." tail capture.
const RUN_COMMAND: &[CaptureSpec] = &[
    required("command", r"(?s)`([^`]+)`"),
    required(
        "command",
        r"(?i)\bcommand[:\s]\s*(.+?)\s*[.?]?\s*$|\brun\s+(.+?)\s*[.?]?\s*$",
    ),
];

// Quoted names and positional letters capture under different names so the
// handler can tell a header called "x" from column X.
const SPREADSHEET_SUM: &[CaptureSpec] = &[
    optional(
        "column",
        r#"(?i)['"]([^'"]+)['"]\s+column|\bcolumn\s+['"]([^'"]+)['"]"#,
    ),
    optional("column_letter", r"(?i)\bcolumn\s+([a-z])\b"),
];

const WEEKDAY_COUNT: &[CaptureSpec] = &[
    required("start_date", DATE),
    CaptureSpec {
        name: "end_date",
        pattern: DATE,
        required: true,
        occurrence: 1,
        post: None,
    },
];

const ARCHIVE_CSV_LOOKUP: &[CaptureSpec] = &[
    optional("csv_filename", r"([A-Za-z0-9_\-]+\.csv)"),
    optional(
        "column",
        r#"(?i)['"]([^'"]+)['"]\s+column|\bcolumn\s+['"]([^'"]+)['"]|\b(?:the\s+)?(\w+)\s+column\b"#,
    ),
];

const JSON_KEY_LOOKUP: &[CaptureSpec] = &[required(
    "key",
    r#"(?i)key\s*(?:named\s+)?[:=]?\s*['"]([^'"]+)['"]"#,
)];

const JSON_LIST_BUILD: &[CaptureSpec] = &[required(
    "items",
    r"(?i)(?:list|array)\s+of\s+(.+?)\s*[.?]?\s*$|:\s*(.+?)\s*[.?]?\s*$",
)];

const CSS_SELECTOR_COUNT: &[CaptureSpec] = &[
    CaptureSpec {
        name: "url",
        pattern: URL,
        required: true,
        occurrence: 0,
        post: Some(clean_url),
    },
    required(
        "selector",
        r#"(?i)selector\s*[:=]?\s*['"]([^'"]+)['"]"#,
    ),
];

const ENCODED_TEXT_DECODE: &[CaptureSpec] = &[required("encoding", ENCODING)];

/// Capture schema for a task kind. Kinds without parameters get an empty
/// schema, which also covers the declared-unimplemented kinds.
pub fn schema_for(kind: TaskKind) -> &'static [CaptureSpec] {
    match kind {
        TaskKind::HttpHeadStatus => HTTP_HEAD_STATUS,
        TaskKind::RunCommand => RUN_COMMAND,
        TaskKind::SpreadsheetSum => SPREADSHEET_SUM,
        TaskKind::WeekdayCount => WEEKDAY_COUNT,
        TaskKind::ArchiveCsvLookup => ARCHIVE_CSV_LOOKUP,
        TaskKind::JsonKeyLookup => JSON_KEY_LOOKUP,
        TaskKind::JsonListBuild => JSON_LIST_BUILD,
        TaskKind::CssSelectorCount => CSS_SELECTOR_COUNT,
        TaskKind::EncodedTextDecode => ENCODED_TEXT_DECODE,
        _ => &[],
    }
}

/// Trim trailing sentence punctuation off a URL token and make sure the rest
/// actually parses as a URL.
fn clean_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim_end_matches(['.', ',', ';', ':', '!', '?']);
    url::Url::parse(trimmed).ok()?;
    Some(trimmed.to_string())
}

struct CompiledCapture {
    spec: &'static CaptureSpec,
    regex: Regex,
}

/// Compiled capture schemas for every task kind. Built once and reused for
/// the lifetime of the engine.
pub struct Extractor {
    schemas: HashMap<TaskKind, Vec<CompiledCapture>>,
}

impl Extractor {
    pub fn new() -> Self {
        let mut schemas = HashMap::new();
        for &kind in TaskKind::ALL {
            let compiled: Vec<CompiledCapture> = schema_for(kind)
                .iter()
                .map(|spec| CompiledCapture {
                    spec,
                    regex: Regex::new(spec.pattern).expect("capture pattern is valid"),
                })
                .collect();
            if !compiled.is_empty() {
                schemas.insert(kind, compiled);
            }
        }
        Self { schemas }
    }

    /// Run every capture for `kind` over the question. Each capture is
    /// independent; a miss leaves the name absent. When several specs
    /// share a name the first one that captures wins.
    pub fn extract(&self, kind: TaskKind, question: &str) -> ParameterSet {
        let mut params = ParameterSet::default();
        let Some(captures) = self.schemas.get(&kind) else {
            return params;
        };

        for capture in captures {
            if params.get(capture.spec.name).is_some() {
                continue;
            }
            if let Some(value) = capture.run(question) {
                params.insert(capture.spec.name, value);
            }
        }
        params
    }

    /// Names of required captures that are absent from `params`.
    pub fn missing_required(&self, kind: TaskKind, params: &ParameterSet) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for spec in schema_for(kind) {
            if spec.required && params.get(spec.name).is_none() && !missing.contains(&spec.name) {
                missing.push(spec.name);
            }
        }
        missing
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CompiledCapture {
    fn run(&self, question: &str) -> Option<String> {
        let caps = self.regex.captures_iter(question).nth(self.spec.occurrence)?;

        // First non-empty capture group, else the whole match. Alternation
        // patterns put their value in whichever group matched.
        let raw = caps
            .iter()
            .skip(1)
            .flatten()
            .next()
            .or_else(|| caps.get(0))?
            .as_str()
            .trim();

        if raw.is_empty() {
            return None;
        }
        match self.spec.post {
            Some(post) => post(raw),
            None => Some(raw.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(kind: TaskKind, question: &str) -> ParameterSet {
        Extractor::new().extract(kind, question)
    }

    #[test]
    fn url_capture_trims_punctuation() {
        let params = extract(
            TaskKind::HttpHeadStatus,
            "Report the status code of https://example.com/page.",
        );
        assert_eq!(params.get("url"), Some("https://example.com/page"));
    }

    #[test]
    fn url_capture_rejects_garbage() {
        let params = extract(TaskKind::HttpHeadStatus, "status code of https://:");
        assert_eq!(params.get("url"), None);
    }

    #[test]
    fn command_prefers_backticks() {
        let params = extract(
            TaskKind::RunCommand,
            "Run `npx -y prettier@3.4.2 README.md | sha256sum` in the project root.",
        );
        assert_eq!(
            params.get("command"),
            Some("npx -y prettier@3.4.2 README.md | sha256sum")
        );
    }

    #[test]
    fn command_falls_back_to_run_prefix() {
        let params = extract(TaskKind::RunCommand, "run echo hello");
        assert_eq!(params.get("command"), Some("echo hello"));
    }

    #[test]
    fn dates_take_first_and_second_occurrence() {
        let params = extract(
            TaskKind::WeekdayCount,
            "How many weekdays between January 1, 2024 and January 7, 2024?",
        );
        assert_eq!(params.get("start_date"), Some("January 1, 2024"));
        assert_eq!(params.get("end_date"), Some("January 7, 2024"));
    }

    #[test]
    fn iso_dates_are_recognized() {
        let params = extract(
            TaskKind::WeekdayCount,
            "Count weekdays in the range 1980-09-01 to 2012-03-08.",
        );
        assert_eq!(params.get("start_date"), Some("1980-09-01"));
        assert_eq!(params.get("end_date"), Some("2012-03-08"));
    }

    #[test]
    fn single_date_leaves_end_absent() {
        let params = extract(TaskKind::WeekdayCount, "weekdays since January 1, 2024?");
        assert_eq!(params.get("start_date"), Some("January 1, 2024"));
        assert_eq!(params.get("end_date"), None);
    }

    #[test]
    fn spreadsheet_column_variants() {
        let quoted = extract(
            TaskKind::SpreadsheetSum,
            "What is the sum of the 'amount' column in the sheet?",
        );
        assert_eq!(quoted.get("column"), Some("amount"));
        assert_eq!(quoted.get("column_letter"), None);

        let lettered = extract(TaskKind::SpreadsheetSum, "Sum column B of the sheet.");
        assert_eq!(lettered.get("column"), None);
        assert_eq!(lettered.get("column_letter"), Some("B"));

        // A quoted single letter is a name, not a position.
        let single = extract(TaskKind::SpreadsheetSum, "Sum the 'x' column of the sheet.");
        assert_eq!(single.get("column"), Some("x"));
        assert_eq!(single.get("column_letter"), None);

        let absent = extract(TaskKind::SpreadsheetSum, "Sum the values in the sheet.");
        assert_eq!(absent.get("column"), None);
        assert_eq!(absent.get("column_letter"), None);
    }

    #[test]
    fn archive_captures_member_and_column() {
        let params = extract(
            TaskKind::ArchiveCsvLookup,
            "Unzip file q.zip which has a single extract.csv; what is the value in the answer column?",
        );
        assert_eq!(params.get("csv_filename"), Some("extract.csv"));
        assert_eq!(params.get("column"), Some("answer"));
    }

    #[test]
    fn json_key_is_quoted_capture() {
        let params = extract(
            TaskKind::JsonKeyLookup,
            "In the JSON file, what is the value of key 'color'?",
        );
        assert_eq!(params.get("key"), Some("color"));
    }

    #[test]
    fn list_items_after_colon_or_of() {
        let colon = extract(
            TaskKind::JsonListBuild,
            "Turn this into a JSON list: apples, oranges, pears",
        );
        assert_eq!(colon.get("items"), Some("apples, oranges, pears"));

        let of = extract(TaskKind::JsonListBuild, "Make a JSON array of a, b, c");
        assert_eq!(of.get("items"), Some("a, b, c"));
    }

    #[test]
    fn css_selector_and_url() {
        let params = extract(
            TaskKind::CssSelectorCount,
            "How many elements match the CSS selector '.item li' on https://example.com/q?",
        );
        assert_eq!(params.get("selector"), Some(".item li"));
        assert_eq!(params.get("url"), Some("https://example.com/q"));
    }

    #[test]
    fn encoding_tokens() {
        for (question, expected) in [
            ("This file uses the CP-1252 encoding.", "CP-1252"),
            ("decode the bytes as utf-16", "utf-16"),
            ("the data is Latin-1 encoded", "Latin-1"),
        ] {
            let params = extract(TaskKind::EncodedTextDecode, question);
            assert_eq!(params.get("encoding"), Some(expected), "{}", question);
        }
    }

    #[test]
    fn missing_required_reports_names() {
        let extractor = Extractor::new();
        let params = extractor.extract(TaskKind::CssSelectorCount, "count css elements");
        let mut missing = extractor.missing_required(TaskKind::CssSelectorCount, &params);
        missing.sort();
        assert_eq!(missing, vec!["selector", "url"]);
    }

    #[test]
    fn parameterless_kinds_have_empty_schemas() {
        let extractor = Extractor::new();
        for kind in [
            TaskKind::SqlAggregate,
            TaskKind::Unsupported,
            TaskKind::GitHubUserLookup,
        ] {
            let params = extractor.extract(kind, "anything at all");
            assert!(params.is_empty());
            assert!(extractor.missing_required(kind, &params).is_empty());
        }
    }
}
