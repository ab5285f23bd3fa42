//! # Row Predicates
//!
//! Conjunctive filters for `find_*_where` queries, compiled into a
//! parameterized SQL `WHERE` clause.

use rusqlite::types::Value;

use super::connection::CASEFOLD_FUNCTION;

/// A compiled `WHERE` clause and its positional parameters.
///
/// `clause` is empty when the filter matches everything.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlPredicate {
    pub clause: String,
    pub params: Vec<Value>,
}

impl SqlPredicate {
    fn from_parts(parts: Vec<String>, params: Vec<Value>) -> Self {
        let clause = if parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", parts.join(" AND "))
        };
        Self { clause, params }
    }
}

/// Predicate over the questions table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    /// Only questions in this category
    pub category: Option<i64>,

    /// Case-insensitive substring of the question text
    pub text_contains: Option<String>,

    /// Question ids to leave out
    pub exclude_ids: Vec<i64>,
}

impl QuestionFilter {
    /// A filter matching every question
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_category(mut self, category: i64) -> Self {
        self.category = Some(category);
        self
    }

    pub fn containing(mut self, term: impl Into<String>) -> Self {
        self.text_contains = Some(term.into());
        self
    }

    pub fn excluding(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.exclude_ids.extend(ids);
        self
    }

    /// Compile to SQL.
    ///
    /// Text matching goes through the connection's `casefold` function so
    /// non-ASCII letters compare case-insensitively too. Excluded ids bind as
    /// one JSON array, keeping long quiz histories under SQLite's variable
    /// limit.
    pub fn to_sql(&self) -> SqlPredicate {
        let mut parts = Vec::new();
        let mut params = Vec::new();

        if let Some(category) = self.category {
            parts.push("category = ?".to_string());
            params.push(Value::Integer(category));
        }

        if let Some(term) = &self.text_contains {
            parts.push(format!("instr({}(question), ?) > 0", CASEFOLD_FUNCTION));
            params.push(Value::Text(term.to_lowercase()));
        }

        if !self.exclude_ids.is_empty() {
            parts.push("id NOT IN (SELECT value FROM json_each(?))".to_string());
            params.push(Value::Text(
                serde_json::Value::from(self.exclude_ids.clone()).to_string(),
            ));
        }

        SqlPredicate::from_parts(parts, params)
    }
}

/// Predicate over the categories table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    /// Exact type label
    pub kind: Option<String>,
}

impl CategoryFilter {
    pub fn with_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
        }
    }

    pub fn to_sql(&self) -> SqlPredicate {
        let mut parts = Vec::new();
        let mut params = Vec::new();

        if let Some(kind) = &self.kind {
            parts.push("type = ?".to_string());
            params.push(Value::Text(kind.clone()));
        }

        SqlPredicate::from_parts(parts, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_has_no_clause() {
        let predicate = QuestionFilter::all().to_sql();
        assert!(predicate.clause.is_empty());
        assert!(predicate.params.is_empty());
    }

    #[test]
    fn test_combined_question_filter() {
        let predicate = QuestionFilter::all()
            .in_category(3)
            .excluding([5, 9])
            .to_sql();

        assert_eq!(
            predicate.clause,
            " WHERE category = ? AND id NOT IN (SELECT value FROM json_each(?))"
        );
        assert_eq!(
            predicate.params,
            vec![Value::Integer(3), Value::Text("[5,9]".to_string())]
        );
    }

    #[test]
    fn test_exclusions_bind_a_single_parameter() {
        let predicate = QuestionFilter::all().excluding(1..=50_000).to_sql();
        assert_eq!(predicate.params.len(), 1);
    }

    #[test]
    fn test_search_term_is_folded_and_literal() {
        let predicate = QuestionFilter::all().containing("100%_SURE Étoile").to_sql();

        assert_eq!(predicate.clause, " WHERE instr(casefold(question), ?) > 0");
        assert_eq!(
            predicate.params,
            vec![Value::Text("100%_sure étoile".to_string())]
        );
    }

    #[test]
    fn test_category_filter() {
        assert!(CategoryFilter::default().to_sql().clause.is_empty());

        let predicate = CategoryFilter::with_kind("Art").to_sql();
        assert_eq!(predicate.clause, " WHERE type = ?");
        assert_eq!(predicate.params, vec![Value::Text("Art".to_string())]);
    }
}
