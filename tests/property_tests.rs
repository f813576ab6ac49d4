use proptest::prelude::*;
use std::collections::HashMap;

use sqa_demo::config::AppConfig;
use sqa_demo::internal::gallery::{display_height, masonry};
use sqa_demo::internal::jokes::JokesView;
use sqa_demo::internal::models::{Joke, Photo};
use sqa_demo::internal::router::Route;

fn photo(width: u32, height: u32) -> Photo {
    Photo {
        id: "p".to_string(),
        width,
        height,
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn test_display_height_keeps_aspect_ratio(width in 1u32..10_000, height in 1u32..10_000) {
        let shown = display_height(&photo(width, height), 400) as f64;
        let exact = 400.0 * height as f64 / width as f64;
        prop_assert!((shown - exact).abs() <= 0.5);
    }

    #[test]
    fn test_masonry_columns_do_not_overlap(
        heights in proptest::collection::vec(1u16..60, 0..40),
        columns in 1usize..5,
    ) {
        let placements = masonry(&heights, columns);
        prop_assert_eq!(placements.len(), heights.len());

        let mut bottoms = vec![0u32; columns];
        for p in &placements {
            prop_assert!(p.column < columns);
            // Cards stack in placement order within each column.
            prop_assert_eq!(p.y, bottoms[p.column]);
            bottoms[p.column] += p.height as u32;
        }
    }

    #[test]
    fn test_unknown_paths_are_not_found(path in "/[a-z0-9/_-]{1,20}") {
        let route = Route::from_path(&path);
        let bare = match path.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => path.as_str(),
        };
        match bare {
            "/" | "/jokes" => prop_assert_ne!(route, Route::NotFound(path.clone())),
            _ => prop_assert_eq!(route, Route::NotFound(path.clone())),
        }
    }

    #[test]
    fn test_query_and_fragment_do_not_change_route(suffix in "[?#][a-z=&]{0,12}") {
        prop_assert_eq!(Route::from_path(&format!("/jokes{}", suffix)), Route::Jokes);
        prop_assert_eq!(Route::from_path(&format!("/{}", suffix)), Route::Gallery);
    }

    #[test]
    fn test_card_state_is_per_card(ops in proptest::collection::vec((1u32..6, any::<bool>()), 0..50)) {
        let jokes: Vec<Joke> = (1..=5)
            .map(|id| Joke { id, setup: format!("s{}", id), ..Default::default() })
            .collect();
        let mut view = JokesView::new();
        let activation = view.activate();
        view.resolve(activation.id, Ok(jokes));

        let mut likes: HashMap<u32, u32> = HashMap::new();
        let mut visible: HashMap<u32, bool> = HashMap::new();
        for (id, is_like) in ops {
            if is_like {
                view.like(id);
                *likes.entry(id).or_default() += 1;
            } else {
                view.toggle_punchline(id);
                let v = visible.entry(id).or_default();
                *v = !*v;
            }
        }

        for id in 1..=5 {
            let card = view.card(id);
            prop_assert_eq!(card.like_count, likes.get(&id).copied().unwrap_or(0));
            prop_assert_eq!(card.punchline_visible, visible.get(&id).copied().unwrap_or(false));
        }
    }

    #[test]
    fn test_config_parsing_resilience(s in "\\PC*") {
        // Random input must produce an Err, never a panic
        let _ = ron::from_str::<AppConfig>(&s);
    }
}
