use serde::{Deserialize, Serialize};

/// A photo record from the listing endpoint. Identity is `id`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Photo {
    pub id: String,
    pub author: String,
    pub width: u32,
    pub height: u32,
    pub url: String,
    pub download_url: String,
}

/// A joke record from the listing endpoint. Identity is `id`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Joke {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub setup: String,
    pub punchline: String,
}

/// Render state of a view's listing fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Success(Vec<T>),
    Error(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn items(&self) -> &[T] {
        match self {
            Self::Success(items) => items,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Ephemeral per-card interaction state on the jokes view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JokeCardState {
    pub punchline_visible: bool,
    pub like_count: u32,
}

impl JokeCardState {
    pub fn toggle_label(&self) -> &'static str {
        match self.punchline_visible {
            true => "Hide Punchline",
            false => "Show Punchline",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joke_type_field_renamed() {
        let joke: Joke = serde_json::from_str(
            r#"{"id":1,"type":"general","setup":"Why?","punchline":"Because."}"#,
        )
        .unwrap();
        assert_eq!(joke.kind, "general");
        assert_eq!(joke.id, 1);
    }

    #[test]
    fn test_load_state_accessors() {
        let state: LoadState<u32> = LoadState::Success(vec![1, 2]);
        assert_eq!(state.items(), &[1, 2]);
        assert!(state.error().is_none());

        let state: LoadState<u32> = LoadState::Error("boom".to_string());
        assert!(state.items().is_empty());
        assert_eq!(state.error(), Some("boom"));

        assert!(LoadState::<u32>::Loading.is_loading());
        assert_eq!(LoadState::<u32>::default(), LoadState::Idle);
    }

    #[test]
    fn test_toggle_label_follows_visibility() {
        let mut card = JokeCardState::default();
        assert_eq!(card.toggle_label(), "Show Punchline");
        card.punchline_visible = true;
        assert_eq!(card.toggle_label(), "Hide Punchline");
    }
}
