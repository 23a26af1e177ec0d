//! Append-only comment threads on initiatives.
//!
//! Comments can only be added. There is no way to edit or remove one; they
//! go away only with their parent initiative.

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Comment, Initiative};
use crate::repository::{Record, Repository};

/// Append a comment to the initiative with `id` and persist it.
///
/// A blank `author` falls back to the repository's default owner. The
/// parent's `dateModified` is bumped like any other update.
///
/// # Errors
///
/// Returns [`Error::Validation`] if `text` is blank (nothing is written),
/// [`Error::NotFound`] for an unknown id, or a storage error.
pub fn append(
    repo: &mut Repository<'_, Initiative>,
    id: &str,
    text: &str,
    author: &str,
) -> Result<Initiative> {
    if text.trim().is_empty() {
        return Err(Error::missing(vec!["text"]));
    }

    let taken: Vec<String> = repo
        .get(id)
        .ok_or_else(|| Error::not_found(Initiative::KIND, id))?
        .comments
        .iter()
        .map(|c| c.id.clone())
        .collect();
    let comment_id = repo.mint_id(|candidate| taken.iter().any(|t| t == candidate));

    let comment = Comment {
        id: comment_id,
        text: text.to_string(),
        author: if author.trim().is_empty() {
            repo.owner().to_string()
        } else {
            author.to_string()
        },
        date: repo.today(),
    };

    debug!(initiative = id, comment = %comment.id, "Appending comment");
    repo.update_with(id, move |initiative| {
        initiative.comments.push(comment);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InitiativeDraft;
    use crate::storage::Store;
    use chrono::NaiveDate;

    fn april_2() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()
    }

    #[test]
    fn test_append_adds_comment_in_order() {
        let store = Store::open_in_memory().unwrap();
        let mut repo = Repository::<Initiative>::open(&store)
            .unwrap()
            .with_clock(april_2);
        let created = repo.create(InitiativeDraft::new("T", "P")).unwrap();

        append(&mut repo, &created.id, "first", "Ana").unwrap();
        let updated = append(&mut repo, &created.id, "second", "Ben").unwrap();

        let texts: Vec<_> = updated.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(updated.comments[0].author, "Ana");
        assert_eq!(updated.comments[1].date, april_2());
        assert_ne!(updated.comments[0].id, updated.comments[1].id);

        let stored: Vec<Initiative> = store.load(Initiative::SLOT).unwrap();
        assert_eq!(stored[0].comments, updated.comments);
    }

    #[test]
    fn test_append_blank_text_changes_nothing() {
        let store = Store::open_in_memory().unwrap();
        let mut repo = Repository::<Initiative>::open_seeded(&store).unwrap();
        let before = repo.get("1").unwrap().clone();

        for text in ["", "   ", "\n\t"] {
            let err = append(&mut repo, "1", text, "Ana").unwrap_err();
            assert!(matches!(err, Error::Validation { .. }));
        }

        assert_eq!(repo.get("1"), Some(&before));
        let stored: Vec<Initiative> = store.load(Initiative::SLOT).unwrap();
        assert_eq!(stored[0].comments, before.comments);
    }

    #[test]
    fn test_append_unknown_initiative() {
        let store = Store::open_in_memory().unwrap();
        let mut repo = Repository::<Initiative>::open(&store).unwrap();

        let err = append(&mut repo, "missing", "hello", "Ana").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_append_blank_author_uses_default_owner() {
        let store = Store::open_in_memory().unwrap();
        let mut repo = Repository::<Initiative>::open(&store)
            .unwrap()
            .with_owner("Shift Lead");
        let created = repo.create(InitiativeDraft::new("T", "P")).unwrap();

        let updated = append(&mut repo, &created.id, "note", " ").unwrap();
        assert_eq!(updated.comments[0].author, "Shift Lead");
    }

    #[test]
    fn test_append_keeps_seeded_comments() {
        let store = Store::open_in_memory().unwrap();
        let mut repo = Repository::<Initiative>::open_seeded(&store).unwrap();

        let updated = append(&mut repo, "1", "Follow-up audit passed", "Ana").unwrap();
        assert_eq!(updated.comments.len(), 2);
        assert_eq!(updated.comments[0].id, "c1");
    }
}
