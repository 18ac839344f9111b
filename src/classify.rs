//! Task classification.
//!
//! Maps free question text onto one member of a closed set of task kinds by
//! walking a fixed, ordered rule table. Matching is deterministic substring
//! matching over the lowercased question; the first rule that matches wins,
//! so rule order encodes precedence between overlapping patterns (e.g. a
//! question mentioning both "json" and "css selector" resolves to the JSON
//! kind because its rule sits earlier). The fallback is [`TaskKind::Unsupported`].
//!
//! Classification performs no I/O and never fails.

use serde::{Deserialize, Serialize};

/// The closed set of question categories the engine can answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Editor version report. Recognized but not implemented.
    VersionQuery,
    /// HEAD request to a URL, answer is the numeric status code.
    HttpHeadStatus,
    /// Execute a shell command from the question, answer is trimmed stdout.
    RunCommand,
    /// Open an uploaded archive, read a column from the first row of a CSV member.
    ArchiveCsvLookup,
    /// Bulk text replacement across files. Recognized but not implemented.
    TextReplace,
    /// File listing with sizes/dates. Recognized but not implemented.
    FileInventory,
    /// Bulk file renaming. Recognized but not implemented.
    FileRename,
    /// Line-level file comparison. Recognized but not implemented.
    FileCompare,
    /// Sum a column of an uploaded spreadsheet's first sheet.
    SpreadsheetSum,
    /// Count Monday-to-Friday days in an inclusive date range.
    WeekdayCount,
    /// Look up one key in an uploaded JSON document.
    JsonKeyLookup,
    /// Build a JSON array from a comma-separated list in the question.
    JsonListBuild,
    /// Count elements matching a CSS selector on a fetched page.
    CssSelectorCount,
    /// Decode an uploaded file with a named character encoding.
    EncodedTextDecode,
    /// Aggregate query over a fixed in-memory relational dataset.
    SqlAggregate,
    /// Browser-DevTools page inspection. Recognized but not implemented.
    DevToolsInspect,
    /// GitHub account/repo lookup. Recognized but not implemented.
    GitHubUserLookup,
    /// Nothing matched.
    Unsupported,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VersionQuery => "version_query",
            Self::HttpHeadStatus => "http_head_status",
            Self::RunCommand => "run_command",
            Self::ArchiveCsvLookup => "archive_csv_lookup",
            Self::TextReplace => "text_replace",
            Self::FileInventory => "file_inventory",
            Self::FileRename => "file_rename",
            Self::FileCompare => "file_compare",
            Self::SpreadsheetSum => "spreadsheet_sum",
            Self::WeekdayCount => "weekday_count",
            Self::JsonKeyLookup => "json_key_lookup",
            Self::JsonListBuild => "json_list_build",
            Self::CssSelectorCount => "css_selector_count",
            Self::EncodedTextDecode => "encoded_text_decode",
            Self::SqlAggregate => "sql_aggregate",
            Self::DevToolsInspect => "devtools_inspect",
            Self::GitHubUserLookup => "github_user_lookup",
            Self::Unsupported => "unsupported",
        }
    }

    /// Short human label, used in answers about the kind itself.
    pub fn label(&self) -> &'static str {
        match self {
            Self::VersionQuery => "editor version query",
            Self::HttpHeadStatus => "HTTP status lookup",
            Self::RunCommand => "shell command",
            Self::ArchiveCsvLookup => "archive CSV lookup",
            Self::TextReplace => "text replacement across files",
            Self::FileInventory => "file listing with attributes",
            Self::FileRename => "bulk file rename",
            Self::FileCompare => "file comparison",
            Self::SpreadsheetSum => "spreadsheet sum",
            Self::WeekdayCount => "weekday count",
            Self::JsonKeyLookup => "JSON key lookup",
            Self::JsonListBuild => "JSON list building",
            Self::CssSelectorCount => "CSS selector count",
            Self::EncodedTextDecode => "encoded text decoding",
            Self::SqlAggregate => "SQL aggregation",
            Self::DevToolsInspect => "DevTools page inspection",
            Self::GitHubUserLookup => "GitHub account lookup",
            Self::Unsupported => "unsupported question",
        }
    }

    /// Kinds that classify but deliberately answer "not implemented".
    pub fn is_implemented(&self) -> bool {
        !matches!(
            self,
            Self::VersionQuery
                | Self::TextReplace
                | Self::FileInventory
                | Self::FileRename
                | Self::FileCompare
                | Self::DevToolsInspect
                | Self::GitHubUserLookup
        )
    }

    /// Every kind, in rule-table order (fallback last). Used by the
    /// extraction registry and by tests that sweep the whole set.
    pub const ALL: &'static [TaskKind] = &[
        Self::VersionQuery,
        Self::HttpHeadStatus,
        Self::RunCommand,
        Self::ArchiveCsvLookup,
        Self::TextReplace,
        Self::FileInventory,
        Self::FileRename,
        Self::FileCompare,
        Self::SpreadsheetSum,
        Self::WeekdayCount,
        Self::JsonKeyLookup,
        Self::JsonListBuild,
        Self::CssSelectorCount,
        Self::EncodedTextDecode,
        Self::SqlAggregate,
        Self::DevToolsInspect,
        Self::GitHubUserLookup,
        Self::Unsupported,
    ];
}

/// One classification rule. The question matches when any keyword group has
/// all of its members present in the lowercased text.
struct Rule {
    kind: TaskKind,
    patterns: &'static [&'static [&'static str]],
}

impl Rule {
    fn matches(&self, lower: &str) -> bool {
        self.patterns
            .iter()
            .any(|group| group.iter().all(|kw| lower.contains(kw)))
    }
}

/// Ordered rule table. Order is part of the classification contract: earlier
/// rules take precedence over later ones when a question matches several.
const RULES: &[Rule] = &[
    Rule {
        kind: TaskKind::VersionQuery,
        patterns: &[&["code -s"], &["vs code", "version"]],
    },
    Rule {
        kind: TaskKind::HttpHeadStatus,
        patterns: &[&["status code"], &["head request"]],
    },
    Rule {
        kind: TaskKind::RunCommand,
        patterns: &[
            &["sha256sum"],
            &["prettier"],
            &["npx"],
            &["output of the command"],
        ],
    },
    Rule {
        kind: TaskKind::ArchiveCsvLookup,
        patterns: &[&["unzip"]],
    },
    Rule {
        kind: TaskKind::TextReplace,
        patterns: &[&["replace", "files"]],
    },
    Rule {
        kind: TaskKind::FileInventory,
        patterns: &[&["list", "file", "size"], &["list", "file", "attribute"]],
    },
    Rule {
        kind: TaskKind::FileRename,
        patterns: &[&["rename", "file"]],
    },
    Rule {
        kind: TaskKind::FileCompare,
        patterns: &[&["compare", "file"]],
    },
    Rule {
        kind: TaskKind::SpreadsheetSum,
        patterns: &[
            &["spreadsheet", "sum"],
            &["excel", "sum"],
            &["xlsx", "sum"],
            &["sheet", "sum"],
        ],
    },
    Rule {
        kind: TaskKind::WeekdayCount,
        patterns: &[&["weekday"], &["business day"], &["working day"]],
    },
    Rule {
        kind: TaskKind::JsonKeyLookup,
        patterns: &[&["json", "key"]],
    },
    Rule {
        kind: TaskKind::JsonListBuild,
        patterns: &[&["json", "list"], &["json", "array"]],
    },
    Rule {
        kind: TaskKind::CssSelectorCount,
        patterns: &[&["css"], &["selector"]],
    },
    Rule {
        kind: TaskKind::EncodedTextDecode,
        patterns: &[&["encoding"], &["encoded"], &["decode"]],
    },
    Rule {
        kind: TaskKind::SqlAggregate,
        patterns: &[&["sql"], &["sqlite"], &["tickets"]],
    },
    Rule {
        kind: TaskKind::DevToolsInspect,
        patterns: &[&["devtools"], &["hidden input"]],
    },
    Rule {
        kind: TaskKind::GitHubUserLookup,
        patterns: &[&["github"]],
    },
];

/// Classify a question into exactly one task kind.
pub fn classify(question: &str) -> TaskKind {
    let lower = question.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(|rule| rule.kind)
        .unwrap_or(TaskKind::Unsupported)
}
