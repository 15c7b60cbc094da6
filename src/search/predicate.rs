//! Match predicates over book fields.
//!
//! A predicate is a disjunction of field conditions. The repository renders
//! it to SQL; [`Predicate::matches`] evaluates the same thing in memory.
//! Comparisons are case-insensitive on both paths.

use crate::models::Book;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Title,
    Author,
    Category,
}

impl BookField {
    pub fn column(self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Category => "category",
        }
    }

    pub fn value(self, book: &Book) -> &str {
        match self {
            BookField::Title => &book.title,
            BookField::Author => &book.author,
            BookField::Category => &book.category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Equals,
    StartsWith,
    Contains,
}

impl MatchKind {
    pub fn matches(self, haystack: &str, needle: &str) -> bool {
        let haystack = haystack.to_lowercase();
        let needle = needle.to_lowercase();
        match self {
            MatchKind::Equals => haystack == needle,
            MatchKind::StartsWith => haystack.starts_with(&needle),
            MatchKind::Contains => haystack.contains(&needle),
        }
    }

    /// ILIKE pattern for this kind, `None` for equality
    pub fn like_pattern(self, needle: &str) -> Option<String> {
        let escaped = escape_like(needle);
        match self {
            MatchKind::Equals => None,
            MatchKind::StartsWith => Some(format!("{}%", escaped)),
            MatchKind::Contains => Some(format!("%{}%", escaped)),
        }
    }
}

/// Escape LIKE wildcards (`\` is the default escape character in PostgreSQL)
pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: BookField,
    pub kind: MatchKind,
    pub term: String,
}

impl Condition {
    pub fn new(field: BookField, kind: MatchKind, term: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            term: term.into(),
        }
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.kind.matches(self.field.value(book), &self.term)
    }
}

/// Disjunction of conditions. An empty predicate matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    pub any_of: Vec<Condition>,
}

impl Predicate {
    /// `kind` applied to every field in `fields`
    pub fn across(fields: &[BookField], kind: MatchKind, term: &str) -> Self {
        Self {
            any_of: fields
                .iter()
                .map(|field| Condition::new(*field, kind, term))
                .collect(),
        }
    }

    pub fn or(mut self, other: Predicate) -> Self {
        self.any_of.extend(other.any_of);
        self
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.any_of.iter().any(|c| c.matches(book))
    }
}
