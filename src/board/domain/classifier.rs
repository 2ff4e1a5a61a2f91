//! Status classification: free-form status text to a board column.
//!
//! Classification is total. Blank and unrecognised statuses resolve to
//! [`ColumnState::Todo`] so a record is never dropped or rejected because of
//! its status text; the reason is kept in a [`ClassificationResult`] and
//! logged for diagnosis.

use super::{ColumnState, TaskId, TaskRecord};
use std::fmt;
use tracing::{debug, trace, warn};

const DONE_KEYWORDS: &[&str] = &[
    "DONE",
    "COMPLETE",
    "COMPLETED",
    "CLOSED",
    "FINISHED",
    "RESOLVED",
    "FIXED",
    "DELIVERED",
    "ACCEPTED",
    "CANCELLED",
    "CANCELED",
];

const DOING_KEYWORDS: &[&str] = &[
    "DOING",
    "IN_PROGRESS",
    "PROGRESS",
    "WIP",
    "ACTIVE",
    "WORKING",
    "ONGOING",
    "STARTED",
    "IN_REVIEW",
    "REVIEW",
    "TESTING",
    "QA",
    "BLOCKED",
];

const TODO_KEYWORDS: &[&str] = &[
    "TODO",
    "TO_DO",
    "OPEN",
    "NEW",
    "PENDING",
    "BACKLOG",
    "NOT_STARTED",
    "READY",
    "PLANNED",
    "REOPENED",
    "ASSIGNED",
];

const NEGATION_WORD: &str = "NOT";

/// Normalizes status text for keyword matching.
///
/// Trims, uppercases, and joins words with single underscores. Spaces,
/// hyphens and underscores all separate words, as do CamelCase boundaries
/// (`InProgress`, `QAReview`).
#[must_use]
pub fn normalize_status(raw: &str) -> String {
    split_camel_case(raw.trim())
        .to_uppercase()
        .split(|ch: char| ch.is_whitespace() || ch == '-' || ch == '_')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Inserts a space before each uppercase letter that starts a new word.
fn split_camel_case(raw: &str) -> String {
    let mut spaced = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut previous: Option<char> = None;
    while let Some(ch) = chars.next() {
        let next_is_lower = chars.peek().is_some_and(|next| next.is_lowercase());
        let starts_word = ch.is_uppercase()
            && previous.is_some_and(|prev| {
                prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower)
            });
        if starts_word {
            spaced.push(' ');
        }
        spaced.push(ch);
        previous = Some(ch);
    }
    spaced
}

/// A keyword held as its normalized word sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Keyword {
    text: String,
    words: Vec<String>,
    compact: String,
}

impl Keyword {
    fn parse(raw: &str) -> Option<Self> {
        let text = normalize_status(raw);
        if text.is_empty() {
            return None;
        }
        let words: Vec<String> = text.split('_').map(str::to_owned).collect();
        let compact = words.concat();
        Some(Self {
            text,
            words,
            compact,
        })
    }

    /// Matches a contiguous run of whole words, or a single status word
    /// spelling the keyword without separators (`INPROGRESS`).
    fn matches(&self, status_words: &[&str]) -> bool {
        let run = status_words.windows(self.words.len()).any(|window| {
            window
                .iter()
                .zip(&self.words)
                .all(|(status_word, keyword_word)| *status_word == keyword_word.as_str())
        });
        run || status_words.contains(&self.compact.as_str())
    }
}

/// Keyword families evaluated in fixed priority order: done, doing, todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    done: Vec<Keyword>,
    doing: Vec<Keyword>,
    todo: Vec<Keyword>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            done: parse_keywords(DONE_KEYWORDS),
            doing: parse_keywords(DOING_KEYWORDS),
            todo: parse_keywords(TODO_KEYWORDS),
        }
    }
}

fn parse_keywords(raw: &[&str]) -> Vec<Keyword> {
    raw.iter().copied().filter_map(Keyword::parse).collect()
}

impl KeywordTable {
    /// Creates a table with no keywords; every status falls back to todo.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            done: Vec::new(),
            doing: Vec::new(),
            todo: Vec::new(),
        }
    }

    /// Adds a keyword to a family. Blank keywords are ignored.
    #[must_use]
    pub fn with_keyword(mut self, family: ColumnState, keyword: &str) -> Self {
        if let Some(parsed) = Keyword::parse(keyword) {
            let keywords = self.family_mut(family);
            if !keywords.contains(&parsed) {
                keywords.push(parsed);
            }
        }
        self
    }

    /// Returns the normalized keywords of a family in match order.
    #[must_use]
    pub fn keywords(&self, family: ColumnState) -> Vec<&str> {
        self.family(family)
            .iter()
            .map(|keyword| keyword.text.as_str())
            .collect()
    }

    const fn family(&self, family: ColumnState) -> &Vec<Keyword> {
        match family {
            ColumnState::Todo => &self.todo,
            ColumnState::Doing => &self.doing,
            ColumnState::Done => &self.done,
        }
    }

    const fn family_mut(&mut self, family: ColumnState) -> &mut Vec<Keyword> {
        match family {
            ColumnState::Todo => &mut self.todo,
            ColumnState::Doing => &mut self.doing,
            ColumnState::Done => &mut self.done,
        }
    }

    fn find_match(&self, status_words: &[&str]) -> Option<(ColumnState, &Keyword)> {
        [ColumnState::Done, ColumnState::Doing, ColumnState::Todo]
            .into_iter()
            .find_map(|family| {
                self.family(family)
                    .iter()
                    .find(|keyword| keyword.matches(status_words))
                    .map(|keyword| (family, keyword))
            })
    }
}

/// Why a status resolved to its column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationReason {
    /// The status was missing or blank; the todo default applied.
    BlankStatus,
    /// The status starts with a negation such as `NOT_STARTED`.
    Negated {
        /// Normalized status text.
        normalized: String,
    },
    /// A keyword from the resolved family matched.
    Keyword {
        /// Family the keyword belongs to.
        family: ColumnState,
        /// Normalized keyword that matched.
        keyword: String,
    },
    /// No keyword matched; the todo fallback applied.
    Unrecognized {
        /// Status text as received.
        original: String,
        /// Normalized status text.
        normalized: String,
    },
}

impl ClassificationReason {
    /// Returns `true` when the todo fallback was used for unknown text.
    #[must_use]
    pub const fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized { .. })
    }
}

impl fmt::Display for ClassificationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlankStatus => f.write_str("blank status, defaulted to todo"),
            Self::Negated { normalized } => write!(f, "negated status '{normalized}'"),
            Self::Keyword { family, keyword } => {
                write!(f, "matched {family} keyword '{keyword}'")
            }
            Self::Unrecognized {
                original,
                normalized,
            } => write!(
                f,
                "unrecognised status '{original}' (normalized '{normalized}'), defaulted to todo"
            ),
        }
    }
}

/// Column and reason for a single status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Resolved column.
    pub column: ColumnState,
    /// Diagnostic reason.
    pub reason: ClassificationReason,
}

/// Audit entry produced for each classified record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    /// Record that was classified.
    pub task_id: TaskId,
    /// Resolved column.
    pub column: ColumnState,
    /// Diagnostic reason.
    pub reason: ClassificationReason,
}

/// Deterministic status classifier over a [`KeywordTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusClassifier {
    table: KeywordTable,
}

impl StatusClassifier {
    /// Creates a classifier over the given keyword table.
    #[must_use]
    pub const fn new(table: KeywordTable) -> Self {
        Self { table }
    }

    /// Returns the keyword table.
    #[must_use]
    pub const fn table(&self) -> &KeywordTable {
        &self.table
    }

    /// Resolves raw status text to a column.
    #[must_use]
    pub fn classify(&self, raw_status: Option<&str>) -> ColumnState {
        self.explain(None, raw_status).column
    }

    /// Resolves raw status text to a column with its diagnostic reason.
    #[must_use]
    pub fn classify_status(&self, raw_status: Option<&str>) -> Classification {
        self.explain(None, raw_status)
    }

    /// Classifies a record and returns its audit entry.
    #[must_use]
    pub fn classify_record(&self, record: &TaskRecord) -> ClassificationResult {
        let Classification { column, reason } = self.explain(Some(record.id()), record.status());
        ClassificationResult {
            task_id: record.id().clone(),
            column,
            reason,
        }
    }

    fn explain(&self, task_id: Option<&TaskId>, raw_status: Option<&str>) -> Classification {
        let task = task_id.map(TaskId::as_str);
        let original = raw_status.unwrap_or_default();
        let normalized = normalize_status(original);
        if normalized.is_empty() {
            debug!(task_id = task, "blank status, defaulting to todo");
            return Classification {
                column: ColumnState::Todo,
                reason: ClassificationReason::BlankStatus,
            };
        }

        let words: Vec<&str> = normalized.split('_').collect();
        if words.first().is_some_and(|word| *word == NEGATION_WORD) {
            trace!(task_id = task, status = %normalized, "negated status resolved to todo");
            return Classification {
                column: ColumnState::Todo,
                reason: ClassificationReason::Negated { normalized },
            };
        }

        if let Some((family, keyword)) = self.table.find_match(&words) {
            trace!(task_id = task, status = %normalized, keyword = %keyword.text, column = %family, "status classified");
            return Classification {
                column: family,
                reason: ClassificationReason::Keyword {
                    family,
                    keyword: keyword.text.clone(),
                },
            };
        }

        warn!(
            task_id = task,
            original = %original,
            normalized = %normalized,
            "unrecognised status, defaulting to todo"
        );
        Classification {
            column: ColumnState::Todo,
            reason: ClassificationReason::Unrecognized {
                original: original.to_owned(),
                normalized,
            },
        }
    }
}
