//! Per-user favorites, bookmarks and viewing history.

use std::collections::BTreeSet;

/// How many lessons the viewing history keeps.
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    pub favorites: BTreeSet<u32>,
    pub bookmarks: BTreeSet<u32>,
    /// Most recent first, no duplicates, at most [`RECENT_LIMIT`] entries.
    pub recently_viewed: Vec<u32>,
}

impl InteractionState {
    /// Returns whether `id` is a favorite afterwards.
    pub fn toggle_favorite(&mut self, id: u32) -> bool {
        toggle(&mut self.favorites, id)
    }

    /// Returns whether `id` is bookmarked afterwards.
    pub fn toggle_bookmark(&mut self, id: u32) -> bool {
        toggle(&mut self.bookmarks, id)
    }

    pub fn record_view(&mut self, id: u32) {
        self.recently_viewed.retain(|&viewed| viewed != id);
        self.recently_viewed.insert(0, id);
        self.recently_viewed.truncate(RECENT_LIMIT);
    }

    pub fn is_favorite(&self, id: u32) -> bool {
        self.favorites.contains(&id)
    }

    pub fn is_bookmarked(&self, id: u32) -> bool {
        self.bookmarks.contains(&id)
    }

    /// Replace the history with `ids`, dropping repeats and anything past the limit.
    pub fn set_recently_viewed(&mut self, ids: impl IntoIterator<Item = u32>) {
        let mut seen = BTreeSet::new();
        self.recently_viewed = ids
            .into_iter()
            .filter(|id| seen.insert(*id))
            .take(RECENT_LIMIT)
            .collect();
    }

    /// Drop every id for which `known` is false. Returns how many were dropped.
    pub fn retain_known(&mut self, known: impl Fn(u32) -> bool) -> usize {
        let before = self.favorites.len() + self.bookmarks.len() + self.recently_viewed.len();
        self.favorites.retain(|&id| known(id));
        self.bookmarks.retain(|&id| known(id));
        self.recently_viewed.retain(|&id| known(id));
        before - (self.favorites.len() + self.bookmarks.len() + self.recently_viewed.len())
    }
}

fn toggle(set: &mut BTreeSet<u32>, id: u32) -> bool {
    if set.remove(&id) {
        false
    } else {
        set.insert(id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_restores_state() {
        let mut state = InteractionState::default();
        state.toggle_favorite(3);
        let before = state.clone();

        assert!(state.toggle_favorite(1));
        assert!(!state.toggle_favorite(1));
        assert_eq!(state, before);

        assert!(!state.toggle_favorite(3));
        assert!(state.toggle_favorite(3));
        assert_eq!(state, before);
    }

    #[test]
    fn bookmarks_are_independent_of_favorites() {
        let mut state = InteractionState::default();
        state.toggle_bookmark(2);
        assert!(state.is_bookmarked(2));
        assert!(!state.is_favorite(2));
    }

    #[test]
    fn record_view_moves_existing_id_to_front() {
        let mut state = InteractionState::default();
        state.record_view(1);
        state.record_view(2);
        state.record_view(3);
        state.record_view(1);
        assert_eq!(state.recently_viewed, vec![1, 3, 2]);
    }

    #[test]
    fn record_view_never_exceeds_limit_or_repeats() {
        let mut state = InteractionState::default();
        for id in [1, 2, 3, 4, 5, 6, 7, 3, 3, 8, 1] {
            state.record_view(id);
            assert!(state.recently_viewed.len() <= RECENT_LIMIT);
            let unique: BTreeSet<_> = state.recently_viewed.iter().collect();
            assert_eq!(unique.len(), state.recently_viewed.len());
        }
        assert_eq!(state.recently_viewed, vec![1, 8, 3, 7, 6]);
    }

    #[test]
    fn set_recently_viewed_normalizes_input() {
        let mut state = InteractionState::default();
        state.set_recently_viewed([4, 4, 2, 9, 1, 7, 5, 6]);
        assert_eq!(state.recently_viewed, vec![4, 2, 9, 1, 7]);
    }

    #[test]
    fn retain_known_drops_stale_ids() {
        let mut state = InteractionState::default();
        state.toggle_favorite(1);
        state.toggle_favorite(99);
        state.toggle_bookmark(42);
        state.record_view(99);
        state.record_view(2);

        let dropped = state.retain_known(|id| id <= 4);
        assert_eq!(dropped, 3);
        assert_eq!(state.favorites.into_iter().collect::<Vec<_>>(), vec![1]);
        assert!(state.bookmarks.is_empty());
        assert_eq!(state.recently_viewed, vec![2]);
    }
}
