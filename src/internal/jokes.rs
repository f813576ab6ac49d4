use std::collections::HashMap;

use crate::api::FetchError;
use crate::internal::loader::{Activation, Loader};
use crate::internal::models::{Joke, JokeCardState};

/// Responsive column count for the joke grid.
pub fn column_count(area_width: u16) -> usize {
    match area_width {
        0..60 => 1,
        60..100 => 2,
        _ => 3,
    }
}

/// Jokes view state. Card state is keyed by joke id and lives only as long
/// as the activation it was created in.
#[derive(Debug, Default)]
pub struct JokesView {
    pub loader: Loader<Joke>,
    cards: HashMap<u32, JokeCardState>,
    selected: usize,
}

impl JokesView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activate(&mut self) -> Activation {
        self.cards.clear();
        self.selected = 0;
        self.loader.activate()
    }

    pub fn deactivate(&mut self) {
        self.loader.deactivate();
        self.cards.clear();
    }

    pub fn resolve(&mut self, activation_id: u64, result: Result<Vec<Joke>, FetchError>) -> bool {
        self.loader.resolve(activation_id, result)
    }

    pub fn jokes(&self) -> &[Joke] {
        self.loader.items()
    }

    /// State of a card; cards that were never touched read as the default.
    pub fn card(&self, joke_id: u32) -> JokeCardState {
        self.cards.get(&joke_id).copied().unwrap_or_default()
    }

    pub fn toggle_punchline(&mut self, joke_id: u32) {
        let card = self.cards.entry(joke_id).or_default();
        card.punchline_visible = !card.punchline_visible;
    }

    pub fn like(&mut self, joke_id: u32) {
        let card = self.cards.entry(joke_id).or_default();
        card.like_count = card.like_count.saturating_add(1);
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_joke(&self) -> Option<&Joke> {
        self.jokes().get(self.selected)
    }

    pub fn select_next(&mut self) {
        let len = self.jokes().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_joke().map(|j| j.id) {
            self.toggle_punchline(id);
        }
    }

    pub fn like_selected(&mut self) {
        if let Some(id) = self.selected_joke().map(|j| j.id) {
            self.like(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jokes(n: u32) -> Vec<Joke> {
        (1..=n)
            .map(|id| Joke {
                id,
                kind: "general".to_string(),
                setup: format!("Setup {}", id),
                punchline: format!("Punchline {}", id),
            })
            .collect()
    }

    fn loaded(n: u32) -> JokesView {
        let mut view = JokesView::new();
        let activation = view.activate();
        view.resolve(activation.id, Ok(jokes(n)));
        view
    }

    #[test]
    fn test_cards_start_hidden_with_no_likes() {
        let view = loaded(3);
        for joke in view.jokes() {
            let card = view.card(joke.id);
            assert!(!card.punchline_visible);
            assert_eq!(card.like_count, 0);
            assert_eq!(card.toggle_label(), "Show Punchline");
        }
    }

    #[test]
    fn test_toggle_only_affects_one_card() {
        let mut view = loaded(3);
        view.toggle_punchline(2);

        assert!(view.card(2).punchline_visible);
        assert_eq!(view.card(2).toggle_label(), "Hide Punchline");
        assert!(!view.card(1).punchline_visible);
        assert!(!view.card(3).punchline_visible);

        view.toggle_punchline(2);
        assert!(!view.card(2).punchline_visible);
    }

    #[test]
    fn test_likes_accumulate_per_card() {
        let mut view = loaded(2);
        for _ in 0..5 {
            view.like(1);
        }
        view.like(2);

        assert_eq!(view.card(1).like_count, 5);
        assert_eq!(view.card(2).like_count, 1);
    }

    #[test]
    fn test_state_discarded_on_deactivate() {
        let mut view = loaded(2);
        view.like(1);
        view.toggle_punchline(1);

        view.deactivate();
        let activation = view.activate();
        view.resolve(activation.id, Ok(jokes(2)));

        assert_eq!(view.card(1), JokeCardState::default());
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut view = loaded(2);
        view.select_prev();
        assert_eq!(view.selected(), 0);
        view.select_next();
        view.select_next();
        assert_eq!(view.selected(), 1);

        view.like_selected();
        view.toggle_selected();
        assert_eq!(view.card(2).like_count, 1);
        assert!(view.card(2).punchline_visible);
    }

    #[test]
    fn test_selection_without_jokes_is_noop() {
        let mut view = JokesView::new();
        view.select_next();
        view.like_selected();
        assert_eq!(view.selected(), 0);
        assert!(view.selected_joke().is_none());
    }

    #[test]
    fn test_column_count() {
        assert_eq!(column_count(50), 1);
        assert_eq!(column_count(80), 2);
        assert_eq!(column_count(150), 3);
    }
}
