//! Sample data for a fresh database.

use super::errors::StoreResult;
use super::repository::TriviaStore;
use super::schema::NewQuestion;

/// The six standard categories, in id order.
pub const SAMPLE_CATEGORIES: [&str; 6] = [
    "Science",
    "Art",
    "Geography",
    "History",
    "Entertainment",
    "Sports",
];

/// (question, answer, category label, difficulty)
const SAMPLE_QUESTIONS: &[(&str, &str, &str, i64)] = &[
    ("What is the heaviest organ in the human body?", "The Liver", "Science", 4),
    ("Who discovered penicillin?", "Alexander Fleming", "Science", 3),
    ("Hematology is a branch of medicine involving the study of what?", "Blood", "Science", 4),
    ("Which Dutch graphic artist, initials M C, was a creator of optical illusions?", "Escher", "Art", 1),
    ("La Giaconda is better known as what?", "Mona Lisa", "Art", 3),
    ("How many paintings did Van Gogh sell in his lifetime?", "One", "Art", 4),
    ("What is the largest lake in Africa?", "Lake Victoria", "Geography", 2),
    ("In which royal palace would you find the Hall of Mirrors?", "The Palace of Versailles", "Geography", 3),
    ("The Taj Mahal is located in which Indian city?", "Agra", "Geography", 2),
    ("Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?", "Maya Angelou", "History", 2),
    ("What boxer's original name is Cassius Clay?", "Muhammad Ali", "History", 1),
    ("Who invented Peanut Butter?", "George Washington Carver", "History", 2),
    ("What movie earned Tom Hanks his third straight Oscar nomination, in 1996?", "Apollo 13", "Entertainment", 4),
    ("What actor did author Anne Rice first denounce, then praise in the role of her beloved Lestat?", "Tom Cruise", "Entertainment", 4),
    ("Which is the only team to play in every soccer World Cup tournament?", "Brazil", "Sports", 3),
    ("Which country won the first ever soccer World Cup in 1930?", "Uruguay", "Sports", 4),
];

/// Insert sample categories and questions into an empty store.
///
/// Returns the number of questions inserted; a store that already has
/// categories is left alone and `0` is returned.
pub fn seed_sample_data(store: &impl TriviaStore) -> StoreResult<usize> {
    if !store.find_categories()?.is_empty() {
        return Ok(0);
    }

    let mut category_ids = Vec::with_capacity(SAMPLE_CATEGORIES.len());
    for kind in SAMPLE_CATEGORIES {
        category_ids.push((kind, store.insert_category(kind)?));
    }

    let mut inserted = 0;
    for (question, answer, kind, difficulty) in SAMPLE_QUESTIONS {
        let Some((_, category)) = category_ids.iter().find(|(k, _)| k == kind) else {
            continue;
        };
        store.insert_question(&NewQuestion {
            question: question.to_string(),
            answer: answer.to_string(),
            category: *category,
            difficulty: *difficulty,
        })?;
        inserted += 1;
    }

    tracing::info!(
        categories = category_ids.len(),
        questions = inserted,
        "Seeded sample trivia data"
    );

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    #[test]
    fn test_seed_populates_empty_store() {
        let store = SqliteStore::open_in_memory().unwrap();
        let inserted = seed_sample_data(&store).unwrap();

        assert_eq!(inserted, SAMPLE_QUESTIONS.len());
        assert_eq!(store.count_questions().unwrap(), SAMPLE_QUESTIONS.len());

        let labels: Vec<String> = store
            .find_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.kind)
            .collect();
        assert_eq!(labels, SAMPLE_CATEGORIES.to_vec());
    }

    #[test]
    fn test_seed_skips_populated_store() {
        let store = SqliteStore::open_in_memory().unwrap();
        seed_sample_data(&store).unwrap();

        assert_eq!(seed_sample_data(&store).unwrap(), 0);
        assert_eq!(store.find_categories().unwrap().len(), SAMPLE_CATEGORIES.len());
    }
}
