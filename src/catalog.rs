//! The lesson catalog together with the user's interaction state.

use std::collections::BTreeSet;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::interaction::InteractionState;
use crate::models::Lesson;
use crate::query::{self, QueryParams};
use crate::storage::{load_json, save_json, KeyValueStore, StorageKey};

/// Read-only lessons plus mutable favorites, bookmarks and history.
///
/// Every successful mutation is written through to the store. Write
/// failures are logged and otherwise ignored; the in-memory state wins for
/// the rest of the session.
pub struct CatalogStore {
    lessons: Vec<Lesson>,
    interaction: InteractionState,
    store: Rc<dyn KeyValueStore>,
}

impl CatalogStore {
    pub fn open(lessons: Vec<Lesson>, store: Rc<dyn KeyValueStore>) -> Self {
        let known: BTreeSet<u32> = lessons.iter().map(|l| l.id).collect();

        let mut interaction = InteractionState {
            favorites: load_ids(store.as_ref(), StorageKey::Favorites).into_iter().collect(),
            bookmarks: load_ids(store.as_ref(), StorageKey::Bookmarks).into_iter().collect(),
            recently_viewed: Vec::new(),
        };
        let mut dropped = interaction.retain_known(|id| known.contains(&id));

        // Stale ids must not count towards the history limit.
        let mut history = load_ids(store.as_ref(), StorageKey::RecentlyViewed);
        let saved = history.len();
        history.retain(|id| known.contains(id));
        dropped += saved - history.len();
        interaction.set_recently_viewed(history);

        if dropped > 0 {
            debug!(dropped, "Ignoring saved lesson ids that are not in the catalog");
        }

        Self {
            lessons,
            interaction,
            store,
        }
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson(&self, id: u32) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn query(&self, params: &QueryParams) -> Vec<&Lesson> {
        query::query(&self.lessons, params, &self.interaction.recently_viewed)
    }

    pub fn all_tags(&self) -> Vec<&str> {
        query::all_tags(&self.lessons)
    }

    /// Recently viewed lessons, most recent first.
    pub fn recent_lessons(&self) -> Vec<&Lesson> {
        self.interaction
            .recently_viewed
            .iter()
            .filter_map(|&id| self.lesson(id))
            .collect()
    }

    /// Returns whether the lesson is a favorite afterwards.
    pub fn toggle_favorite(&mut self, id: u32) -> Result<bool, CatalogError> {
        self.ensure_known(id)?;
        let now_favorite = self.interaction.toggle_favorite(id);
        self.persist(StorageKey::Favorites);
        Ok(now_favorite)
    }

    /// Returns whether the lesson is bookmarked afterwards.
    pub fn toggle_bookmark(&mut self, id: u32) -> Result<bool, CatalogError> {
        self.ensure_known(id)?;
        let now_bookmarked = self.interaction.toggle_bookmark(id);
        self.persist(StorageKey::Bookmarks);
        Ok(now_bookmarked)
    }

    pub fn record_view(&mut self, id: u32) -> Result<(), CatalogError> {
        self.ensure_known(id)?;
        self.interaction.record_view(id);
        self.persist(StorageKey::RecentlyViewed);
        Ok(())
    }

    fn ensure_known(&self, id: u32) -> Result<(), CatalogError> {
        match self.lesson(id) {
            Some(_) => Ok(()),
            None => Err(CatalogError::UnknownLesson(id)),
        }
    }

    fn persist(&self, key: StorageKey) {
        let result = match key {
            StorageKey::Favorites => save_json(self.store.as_ref(), key, &self.interaction.favorites),
            StorageKey::Bookmarks => save_json(self.store.as_ref(), key, &self.interaction.bookmarks),
            StorageKey::RecentlyViewed => {
                save_json(self.store.as_ref(), key, &self.interaction.recently_viewed)
            }
            StorageKey::Theme | StorageKey::User => return,
        };

        if let Err(e) = result {
            warn!(key = key.as_str(), error = %e, "Failed to save lesson state");
        }
    }
}

fn load_ids(store: &dyn KeyValueStore, key: StorageKey) -> Vec<u32> {
    match load_json::<Vec<u32>>(store, key) {
        Ok(ids) => ids.unwrap_or_default(),
        Err(e) => {
            warn!(key = key.as_str(), error = %e, "Failed to load lesson state, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bundled_catalog;
    use crate::query::SortKey;
    use crate::storage::{BrokenStore, MemoryStore};
    use serde_json::json;

    fn open_with(store: Rc<MemoryStore>) -> CatalogStore {
        CatalogStore::open(bundled_catalog().unwrap(), store)
    }

    #[test]
    fn mutations_are_written_through() {
        let store = Rc::new(MemoryStore::default());
        let mut catalog = open_with(store.clone());

        assert!(catalog.toggle_favorite(2).unwrap());
        assert!(catalog.toggle_bookmark(4).unwrap());
        catalog.record_view(3).unwrap();
        catalog.record_view(1).unwrap();

        assert_eq!(store.load(StorageKey::Favorites).unwrap(), Some(json!([2])));
        assert_eq!(store.load(StorageKey::Bookmarks).unwrap(), Some(json!([4])));
        assert_eq!(store.load(StorageKey::RecentlyViewed).unwrap(), Some(json!([1, 3])));

        // A second session sees the same state.
        let reopened = open_with(store);
        assert_eq!(reopened.interaction(), catalog.interaction());
    }

    #[test]
    fn stale_and_duplicate_ids_are_cleaned_on_open() {
        let store = Rc::new(MemoryStore::default());
        store.save(StorageKey::Favorites, &json!([1, 77])).unwrap();
        store.save(StorageKey::RecentlyViewed, &json!([4, 4, 99, 2, 3, 1, 2])).unwrap();

        let catalog = open_with(store);
        assert_eq!(catalog.interaction().favorites.iter().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(catalog.interaction().recently_viewed, vec![4, 2, 3, 1]);
    }

    #[test]
    fn stale_ids_do_not_crowd_out_real_history() {
        let store = Rc::new(MemoryStore::default());
        store
            .save(StorageKey::RecentlyViewed, &json!([99, 98, 97, 96, 95, 1, 2]))
            .unwrap();

        let catalog = open_with(store);
        assert_eq!(catalog.interaction().recently_viewed, vec![1, 2]);
    }

    #[test]
    fn malformed_saved_state_starts_empty() {
        let store = Rc::new(MemoryStore::default());
        store.save(StorageKey::Bookmarks, &json!({"oops": true})).unwrap();
        let catalog = open_with(store);
        assert!(catalog.interaction().bookmarks.is_empty());
    }

    #[test]
    fn unknown_lesson_is_rejected_without_changes() {
        let store = Rc::new(MemoryStore::default());
        let mut catalog = open_with(store.clone());

        assert!(matches!(catalog.toggle_favorite(9), Err(CatalogError::UnknownLesson(9))));
        assert!(matches!(catalog.record_view(0), Err(CatalogError::UnknownLesson(0))));
        assert_eq!(catalog.interaction(), &InteractionState::default());
        assert!(store.load(StorageKey::Favorites).unwrap().is_none());
    }

    #[test]
    fn broken_store_does_not_stop_the_session() {
        let mut catalog = CatalogStore::open(bundled_catalog().unwrap(), Rc::new(BrokenStore));

        assert!(catalog.toggle_favorite(1).unwrap());
        catalog.record_view(2).unwrap();
        assert!(catalog.interaction().is_favorite(1));

        let params = QueryParams {
            sort: SortKey::Recent,
            ..Default::default()
        };
        let ids: Vec<u32> = catalog.query(&params).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 1, 3, 4]);
    }

    #[test]
    fn recent_lessons_resolve_in_history_order() {
        let mut catalog = open_with(Rc::new(MemoryStore::default()));
        catalog.record_view(4).unwrap();
        catalog.record_view(2).unwrap();
        let titles: Vec<&str> = catalog.recent_lessons().iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Daily Conversations", "Pronunciation Practice"]);
    }
}
