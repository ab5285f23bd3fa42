//! # Trivia Repository
//!
//! Entity operations for questions and categories.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};

use super::errors::{StoreError, StoreResult};
use super::filter::{CategoryFilter, QuestionFilter};
use super::schema::{Category, NewQuestion, Question, Schema};

/// Data access trait for the two trivia tables
pub trait TriviaStore: Send + Sync {
    /// Insert a question, returning its generated id
    fn insert_question(&self, question: &NewQuestion) -> StoreResult<i64>;

    /// Delete a question; `false` when no row had that id
    fn delete_question(&self, id: i64) -> StoreResult<bool>;

    /// Look up a single question
    fn find_question(&self, id: i64) -> StoreResult<Option<Question>>;

    /// All questions ordered by id
    fn find_questions(&self) -> StoreResult<Vec<Question>>;

    /// Questions matching a filter, ordered by id
    fn find_questions_where(&self, filter: &QuestionFilter) -> StoreResult<Vec<Question>>;

    /// Number of stored questions
    fn count_questions(&self) -> StoreResult<usize>;

    /// Insert a category, returning its generated id
    fn insert_category(&self, kind: &str) -> StoreResult<i64>;

    /// Delete a category; `false` when no row had that id
    fn delete_category(&self, id: i64) -> StoreResult<bool>;

    /// Look up a single category
    fn find_category(&self, id: i64) -> StoreResult<Option<Category>>;

    /// All categories ordered by id
    fn find_categories(&self) -> StoreResult<Vec<Category>>;

    /// Categories matching a filter, ordered by id
    fn find_categories_where(&self, filter: &CategoryFilter) -> StoreResult<Vec<Category>>;
}

/// SQLite-backed store.
///
/// A single connection serialized behind a mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap a connection whose schema is already initialized
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Fresh in-memory store with the schema applied
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = super::connection::open_in_memory()?;
        Schema::init(&conn)?;
        Ok(Self::new(conn))
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn query_questions(&self, filter: &QuestionFilter) -> StoreResult<Vec<Question>> {
        let predicate = filter.to_sql();
        let sql = format!(
            "SELECT {} FROM questions{} ORDER BY id",
            Question::COLUMNS,
            predicate.clause
        );

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(predicate.params.iter()), Question::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn query_categories(&self, filter: &CategoryFilter) -> StoreResult<Vec<Category>> {
        let predicate = filter.to_sql();
        let sql = format!(
            "SELECT {} FROM categories{} ORDER BY id",
            Category::COLUMNS,
            predicate.clause
        );

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(predicate.params.iter()), Category::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl TriviaStore for SqliteStore {
    fn insert_question(&self, question: &NewQuestion) -> StoreResult<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)",
            params![
                question.question,
                question.answer,
                question.category,
                question.difficulty
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn delete_question(&self, id: i64) -> StoreResult<bool> {
        let conn = self.lock()?;
        let affected = conn.execute("DELETE FROM questions WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    fn find_question(&self, id: i64) -> StoreResult<Option<Question>> {
        let sql = format!("SELECT {} FROM questions WHERE id = ?1", Question::COLUMNS);
        let conn = self.lock()?;
        let question = conn
            .query_row(&sql, [id], Question::from_row)
            .optional()?;
        Ok(question)
    }

    fn find_questions(&self) -> StoreResult<Vec<Question>> {
        self.query_questions(&QuestionFilter::all())
    }

    fn find_questions_where(&self, filter: &QuestionFilter) -> StoreResult<Vec<Question>> {
        self.query_questions(filter)
    }

    fn count_questions(&self) -> StoreResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn insert_category(&self, kind: &str) -> StoreResult<i64> {
        let conn = self.lock()?;
        conn.execute("INSERT INTO categories (type) VALUES (?1)", [kind])?;
        Ok(conn.last_insert_rowid())
    }

    fn delete_category(&self, id: i64) -> StoreResult<bool> {
        let conn = self.lock()?;
        let affected = conn.execute("DELETE FROM categories WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    fn find_category(&self, id: i64) -> StoreResult<Option<Category>> {
        let sql = format!("SELECT {} FROM categories WHERE id = ?1", Category::COLUMNS);
        let conn = self.lock()?;
        let category = conn
            .query_row(&sql, [id], Category::from_row)
            .optional()?;
        Ok(category)
    }

    fn find_categories(&self) -> StoreResult<Vec<Category>> {
        self.query_categories(&CategoryFilter::default())
    }

    fn find_categories_where(&self, filter: &CategoryFilter) -> StoreResult<Vec<Category>> {
        self.query_categories(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_categories() -> (SqliteStore, i64, i64) {
        let store = SqliteStore::open_in_memory().unwrap();
        let science = store.insert_category("Science").unwrap();
        let history = store.insert_category("History").unwrap();
        (store, science, history)
    }

    fn new_question(text: &str, category: i64) -> NewQuestion {
        NewQuestion {
            question: text.to_string(),
            answer: "answer".to_string(),
            category,
            difficulty: 2,
        }
    }

    #[test]
    fn test_insert_and_find_question() {
        let (store, science, _) = store_with_categories();
        let payload = NewQuestion {
            question: "What is the heaviest organ in the human body?".to_string(),
            answer: "The Liver".to_string(),
            category: science,
            difficulty: 4,
        };

        let id = store.insert_question(&payload).unwrap();
        let found = store.find_question(id).unwrap().unwrap();

        assert_eq!(found.id, id);
        assert_eq!(found.question, payload.question);
        assert_eq!(found.answer, payload.answer);
        assert_eq!(found.category, payload.category);
        assert_eq!(found.difficulty, payload.difficulty);
    }

    #[test]
    fn test_find_missing_question() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.find_question(99).unwrap().is_none());
    }

    #[test]
    fn test_delete_question() {
        let (store, science, _) = store_with_categories();
        let id = store.insert_question(&new_question("q", science)).unwrap();

        assert!(store.delete_question(id).unwrap());
        assert!(store.find_question(id).unwrap().is_none());
        assert!(!store.delete_question(id).unwrap());
        assert_eq!(store.count_questions().unwrap(), 0);
    }

    #[test]
    fn test_insert_with_unknown_category_is_constraint_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.insert_question(&new_question("q", 77)).unwrap_err();
        assert!(err.is_constraint());
    }

    #[test]
    fn test_find_questions_ordered_by_id() {
        let (store, science, history) = store_with_categories();
        let first = store.insert_question(&new_question("one", history)).unwrap();
        let second = store.insert_question(&new_question("two", science)).unwrap();

        let ids: Vec<i64> = store
            .find_questions()
            .unwrap()
            .into_iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn test_find_questions_by_category_excluding_ids() {
        let (store, science, history) = store_with_categories();
        let a = store.insert_question(&new_question("a", science)).unwrap();
        let b = store.insert_question(&new_question("b", science)).unwrap();
        store.insert_question(&new_question("c", history)).unwrap();

        let filter = QuestionFilter::all().in_category(science).excluding([a]);
        let found = store.find_questions_where(&filter).unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, b);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let (store, science, _) = store_with_categories();
        store
            .insert_question(&new_question("What movie earned Tom Hanks his third Oscar?", science))
            .unwrap();
        store
            .insert_question(&new_question("Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?", science))
            .unwrap();
        store
            .insert_question(&new_question("Which is the only team to play in every World Cup?", science))
            .unwrap();

        let found = store
            .find_questions_where(&QuestionFilter::all().containing("TITLE"))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].question.contains("entitled"));

        let none = store
            .find_questions_where(&QuestionFilter::all().containing("zebra"))
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let (store, science, _) = store_with_categories();
        store.insert_question(&new_question("Is 50% half?", science)).unwrap();
        store.insert_question(&new_question("Is 50 a number?", science)).unwrap();

        let found = store
            .find_questions_where(&QuestionFilter::all().containing("50%"))
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_search_folds_non_ascii_case() {
        let (store, science, _) = store_with_categories();
        let id = store.insert_question(&new_question("Who sang ÉTOILE?", science)).unwrap();
        store.insert_question(&new_question("Who sang etoile?", science)).unwrap();

        let found = store
            .find_questions_where(&QuestionFilter::all().containing("étoile"))
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
    }

    #[test]
    fn test_exclusion_list_beyond_variable_limit() {
        let (store, science, _) = store_with_categories();
        let kept = store.insert_question(&new_question("kept", science)).unwrap();
        let dropped = store.insert_question(&new_question("dropped", science)).unwrap();

        let mut excluded: Vec<i64> = (1_000..41_000).collect();
        excluded.push(dropped);
        let found = store
            .find_questions_where(&QuestionFilter::all().excluding(excluded))
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, kept);
    }

    #[test]
    fn test_categories_ordered_and_filtered() {
        let (store, science, history) = store_with_categories();

        let all = store.find_categories().unwrap();
        assert_eq!(all.iter().map(|c| c.id).collect::<Vec<_>>(), vec![science, history]);

        let matched = store
            .find_categories_where(&CategoryFilter::with_kind("History"))
            .unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, history);
        assert_eq!(store.find_category(science).unwrap().unwrap().kind, "Science");
    }

    #[test]
    fn test_delete_category_in_use_is_rejected() {
        let (store, science, history) = store_with_categories();
        store.insert_question(&new_question("q", science)).unwrap();

        assert!(store.delete_category(science).unwrap_err().is_constraint());
        assert!(store.delete_category(history).unwrap());
        assert!(store.find_category(history).unwrap().is_none());
    }
}
