use anyhow::Result;
use std::sync::Arc;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};

use crate::api::{ApiService, FetchError};
use crate::config::AppConfig;
use crate::internal::gallery::GalleryView;
use crate::internal::jokes::JokesView;
use crate::internal::loader::Activation;
use crate::internal::models::{Joke, Photo};
use crate::internal::notification::Toast;
use crate::internal::router::{NavLink, Route};
use crate::internal::theme_store::{ThemePreference, ThemeStore};
use crate::internal::thumbnail::{MAX_THUMBNAIL_WIDTH, Thumbnail};
use crate::internal::ui::keybindings::{KeyBindingContext, KeyBindingMap};
use crate::utils::theme_loader::TuiTheme;

use ratatui::Frame;

/// Rows moved by a page scroll in the gallery.
const PAGE_ROWS: i32 = 10;

/// Input modes for the UI.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InputMode {
    Normal,
    PathInput,
}

/// Actions/messages sent through the app action channel.
///
/// Only the key-bindable variants (de)serialize; the rest carry results from
/// spawned tasks back to the event loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Quit,
    Navigate(String),
    NextLink,
    PrevLink,
    OpenPathPrompt,
    ToggleTheme,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    SelectNext,
    SelectPrev,
    TogglePunchline,
    LikeSelected,
    #[serde(skip)]
    PhotosLoaded {
        activation: u64,
        result: Result<Vec<Photo>, FetchError>,
    },
    #[serde(skip)]
    JokesLoaded {
        activation: u64,
        result: Result<Vec<Joke>, FetchError>,
    },
    #[serde(skip)]
    ImageDecoded {
        activation: u64,
        photo_id: String,
        thumbnail: Thumbnail,
    },
    #[serde(skip)]
    ImageFailed {
        activation: u64,
        photo_id: String,
        error: String,
    },
}

impl Action {
    pub fn is_runtime_only(&self) -> bool {
        matches!(
            self,
            Action::PhotosLoaded { .. }
                | Action::JokesLoaded { .. }
                | Action::ImageDecoded { .. }
                | Action::ImageFailed { .. }
        )
    }
}

pub struct App {
    pub running: bool,
    pub route: Route,
    pub config: AppConfig,
    pub api_service: Arc<ApiService>,
    pub theme_store: ThemeStore,
    pub theme: TuiTheme,
    pub gallery: GalleryView,
    pub jokes: JokesView,
    pub toast: Option<Toast>,
    pub input_mode: InputMode,
    pub path_input: String,
    pub keybindings: KeyBindingMap,
    pub action_tx: UnboundedSender<Action>,
    pub action_rx: UnboundedReceiver<Action>,
}

impl App {
    /// Build the app from `config.ron` and the persisted theme preference,
    /// starting at `initial_path` (the gallery when absent).
    #[tracing::instrument]
    pub fn new(initial_path: Option<&str>) -> Self {
        let start = std::time::Instant::now();
        let config = AppConfig::load();

        let theme_store = match ThemeStore::load_or_create() {
            Ok(store) => store,
            Err(e) => {
                tracing::error!("Failed to load theme preference: {}", e);
                ThemeStore::new(ThemePreference::default())
            }
        };

        let route = initial_path.map(Route::from_path).unwrap_or_default();
        let app = Self::with_parts(config, theme_store, route);

        tracing::info!(elapsed = ?start.elapsed(), "App initialized");
        app
    }

    pub fn with_parts(config: AppConfig, theme_store: ThemeStore, route: Route) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let api_service = Arc::new(ApiService::new(
            config.network.clone(),
            config.logging.enable_performance_metrics,
        ));

        let theme = TuiTheme::resolve(config.theme_file.as_deref(), theme_store.preference());

        let mut keybindings =
            crate::internal::ui::keybindings_default::create_default_keybindings();
        if let Some(custom_bindings) = &config.keybindings {
            for conflict in
                crate::internal::ui::keybinding_validator::detect_conflicts(custom_bindings)
            {
                tracing::warn!("Keybinding conflict: {}", conflict.description);
            }
            keybindings.merge_config(custom_bindings);
        }

        Self {
            running: true,
            route,
            gallery: GalleryView::new(config.gallery.target_width),
            jokes: JokesView::new(),
            config,
            api_service,
            theme_store,
            theme,
            toast: None,
            input_mode: InputMode::Normal,
            path_input: String::new(),
            keybindings,
            action_tx,
            action_rx,
        }
    }

    pub async fn run(&mut self, mut tui: crate::tui::Tui) -> Result<()> {
        // Initial load for the starting route
        self.activate_current_view();

        let mut event_interval = tokio::time::interval(std::time::Duration::from_millis(16));

        loop {
            if let Some(toast) = &self.toast
                && toast.is_expired()
            {
                self.toast = None;
            }

            tui.draw(|f| self.ui(f))?;

            tokio::select! {
                _ = event_interval.tick() => {
                    if event::poll(std::time::Duration::from_millis(0))?
                        && let Event::Key(key) = event::read()?
                            && key.kind == KeyEventKind::Press {
                                self.handle_key_event(key);
                            }
                }
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                }
            }

            if !self.running {
                break;
            }
        }

        // Leaving the app unmounts the current view.
        self.deactivate_current_view();
        Ok(())
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::PathInput => self.handle_path_input(key),
            InputMode::Normal => {
                if let Some(action) = self
                    .keybindings
                    .get_action(&key, self.keybinding_context())
                {
                    self.handle_action(action);
                }
            }
        }
    }

    fn handle_path_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.path_input.clear();
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let path = std::mem::take(&mut self.path_input);
                self.navigate(&path);
            }
            KeyCode::Backspace => {
                self.path_input.pop();
            }
            KeyCode::Char(c) => self.path_input.push(c),
            _ => {}
        }
    }

    pub fn keybinding_context(&self) -> KeyBindingContext {
        match self.route {
            Route::Gallery => KeyBindingContext::Gallery,
            Route::Jokes => KeyBindingContext::Jokes,
            Route::NotFound(_) => KeyBindingContext::NotFound,
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(path) => self.navigate(&path),
            Action::NextLink => self.navigate(NavLink::next_from(&self.route, true).path()),
            Action::PrevLink => self.navigate(NavLink::next_from(&self.route, false).path()),
            Action::OpenPathPrompt => {
                self.input_mode = InputMode::PathInput;
                self.path_input = "/".to_string();
            }
            Action::ToggleTheme => self.toggle_theme(),
            Action::ScrollUp => self.scroll_gallery(-1),
            Action::ScrollDown => self.scroll_gallery(1),
            Action::PageUp => self.scroll_gallery(-PAGE_ROWS),
            Action::PageDown => self.scroll_gallery(PAGE_ROWS),
            Action::SelectNext if self.route == Route::Jokes => self.jokes.select_next(),
            Action::SelectPrev if self.route == Route::Jokes => self.jokes.select_prev(),
            Action::TogglePunchline if self.route == Route::Jokes => self.jokes.toggle_selected(),
            Action::LikeSelected if self.route == Route::Jokes => self.jokes.like_selected(),
            Action::SelectNext
            | Action::SelectPrev
            | Action::TogglePunchline
            | Action::LikeSelected => {}
            Action::PhotosLoaded { activation, result } => {
                if self.gallery.resolve(activation, result) {
                    if let Some(error) = self.gallery.loader.error() {
                        tracing::error!("Error fetching photos: {}", error);
                    } else {
                        tracing::info!(count = self.gallery.photos().len(), "Photos loaded");
                        self.spawn_image_loads();
                    }
                }
            }
            Action::JokesLoaded { activation, result } => {
                if self.jokes.resolve(activation, result) {
                    match self.jokes.loader.error() {
                        Some(error) => tracing::error!("Error fetching jokes: {}", error),
                        None => tracing::info!(count = self.jokes.jokes().len(), "Jokes loaded"),
                    }
                }
            }
            Action::ImageDecoded {
                activation,
                photo_id,
                thumbnail,
            } => {
                self.gallery.mark_decoded(activation, &photo_id, thumbnail);
            }
            Action::ImageFailed {
                activation,
                photo_id,
                error,
            } => {
                if self.gallery.mark_failed(activation, &photo_id) {
                    tracing::warn!(photo_id = %photo_id, "Image unavailable: {}", error);
                }
            }
        }
    }

    /// Switch to the route for `path`. Navigating to the current route does
    /// nothing; otherwise the old view is unmounted and the new one activated.
    pub fn navigate(&mut self, path: &str) {
        let route = Route::from_path(path);
        if route == self.route {
            return;
        }
        tracing::debug!(from = %self.route.path(), to = %route.path(), "navigate");

        self.deactivate_current_view();
        self.route = route;
        self.activate_current_view();
    }

    /// Mount the current route's view, starting its fetch.
    pub fn activate_current_view(&mut self) {
        match &self.route {
            Route::Gallery => {
                let activation = self
                    .gallery
                    .activate(self.config.gallery.loading_placeholders);
                self.spawn_photo_fetch(activation);
            }
            Route::Jokes => {
                let activation = self.jokes.activate();
                self.spawn_joke_fetch(activation);
            }
            Route::NotFound(_) => {
                tracing::error!(
                    "404 Error: User attempted to access non-existent route: {}",
                    self.route.pathname()
                );
            }
        }
    }

    fn deactivate_current_view(&mut self) {
        match self.route {
            Route::Gallery => self.gallery.deactivate(),
            Route::Jokes => self.jokes.deactivate(),
            Route::NotFound(_) => {}
        }
    }

    fn spawn_photo_fetch(&self, activation: Activation) {
        let api = self.api_service.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = activation.token.cancelled() => {
                    tracing::debug!(activation = activation.id, "photo fetch cancelled");
                }
                result = api.fetch_photos() => {
                    let _ = tx.send(Action::PhotosLoaded { activation: activation.id, result });
                }
            }
        });
    }

    fn spawn_joke_fetch(&self, activation: Activation) {
        let api = self.api_service.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = activation.token.cancelled() => {
                    tracing::debug!(activation = activation.id, "joke fetch cancelled");
                }
                result = api.fetch_jokes() => {
                    let _ = tx.send(Action::JokesLoaded { activation: activation.id, result });
                }
            }
        });
    }

    /// Download and decode every photo of the current listing, a bounded
    /// number at a time. Stops when the gallery activation is cancelled.
    fn spawn_image_loads(&self) {
        let activation = self.gallery.loader.activation_id();
        let token = self.gallery.loader.token().clone();
        let concurrency = self.config.network.image_concurrency.max(1);
        let target_width = self.gallery.target_width();
        let requests: Vec<(String, String)> = self
            .gallery
            .photos()
            .iter()
            .map(|photo| {
                let url = self.api_service.photo_image_url(
                    &photo.id,
                    target_width,
                    self.gallery.display_height(photo),
                );
                (photo.id.clone(), url)
            })
            .collect();

        let api = self.api_service.clone();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let mut loads = futures::stream::iter(requests)
                .map(|(photo_id, url)| {
                    let api = api.clone();
                    async move {
                        let outcome = match api.fetch_image_bytes(&url).await {
                            Ok(bytes) => tokio::task::spawn_blocking(move || {
                                Thumbnail::decode(&bytes, MAX_THUMBNAIL_WIDTH)
                            })
                            .await
                            .map_err(|e| e.to_string())
                            .and_then(|decoded| decoded.map_err(|e| e.to_string())),
                            Err(e) => Err(e.to_string()),
                        };
                        (photo_id, outcome)
                    }
                })
                .buffer_unordered(concurrency);

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::debug!(activation, "image loads cancelled");
                        break;
                    }
                    next = loads.next() => match next {
                        Some((photo_id, Ok(thumbnail))) => {
                            let _ = tx.send(Action::ImageDecoded { activation, photo_id, thumbnail });
                        }
                        Some((photo_id, Err(error))) => {
                            let _ = tx.send(Action::ImageFailed { activation, photo_id, error });
                        }
                        None => break,
                    }
                }
            }
        });
    }

    fn scroll_gallery(&mut self, delta: i32) {
        if self.route == Route::Gallery {
            self.gallery.scroll_by(delta);
        }
    }

    /// Flip the theme, re-resolve the palette and persist the choice.
    pub fn toggle_theme(&mut self) {
        let result = self.theme_store.toggle();
        let preference = self.theme_store.preference();
        self.theme = TuiTheme::resolve(self.config.theme_file.as_deref(), preference);

        match result {
            Ok(_) => {
                tracing::info!(theme = %preference, "Theme switched");
                self.toast = Some(Toast::info(format!("Switched to {} mode", preference)));
            }
            Err(e) => {
                tracing::error!("Failed to persist theme preference: {:#}", e);
                self.toast = Some(Toast::error(format!(
                    "Switched to {} mode (not saved: {})",
                    preference, e
                )));
            }
        }
    }

    pub fn ui(&mut self, f: &mut Frame) {
        super::view::draw(self, f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Resource;
    use crate::internal::models::LoadState;
    use crossterm::event::KeyModifiers;
    use mockito::{Matcher, Server};

    const PHOTOS: &str = r#"[
        {"id": "0", "author": "Alejandro Escamilla", "width": 5000, "height": 3333, "url": "https://unsplash.com/photos/yC-Yzbqy7PY", "download_url": "https://picsum.photos/id/0/5000/3333"},
        {"id": "1", "author": "Paul Jarvis", "width": 800, "height": 600, "url": "https://unsplash.com/photos/1", "download_url": "https://picsum.photos/id/1/800/600"},
        {"id": "2", "author": "Jane Doe", "width": 600, "height": 800, "url": "https://unsplash.com/photos/2", "download_url": "https://picsum.photos/id/2/600/800"}
    ]"#;

    const JOKES: &str = r#"[
        {"id": 1, "type": "general", "setup": "Why?", "punchline": "Because."},
        {"id": 2, "type": "programming", "setup": "How?", "punchline": "Carefully."}
    ]"#;

    fn test_app(server_url: &str, route: Route) -> App {
        let mut config = AppConfig::default();
        config.network.photos_base_url = server_url.to_string();
        config.network.jokes_base_url = server_url.to_string();
        App::with_parts(config, ThemeStore::new(ThemePreference::Light), route)
    }

    async fn next_action(app: &mut App) -> Action {
        tokio::time::timeout(std::time::Duration::from_secs(5), app.action_rx.recv())
            .await
            .expect("timed out waiting for action")
            .expect("channel closed")
    }

    #[tokio::test]
    async fn test_gallery_success_renders_one_card_per_photo() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/v2/list")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(PHOTOS)
            .create_async()
            .await;

        let mut app = test_app(&server.url(), Route::Gallery);
        app.activate_current_view();
        assert!(app.gallery.loader.is_loading());

        let action = next_action(&mut app).await;
        assert!(matches!(action, Action::PhotosLoaded { .. }));
        app.handle_action(action);

        assert_eq!(app.gallery.photos().len(), 3);
        assert_eq!(app.gallery.decoded_count(), 0);
    }

    #[tokio::test]
    async fn test_gallery_server_error_sets_banner_message() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/v2/list")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let mut app = test_app(&server.url(), Route::Gallery);
        app.activate_current_view();
        let action = next_action(&mut app).await;
        app.handle_action(action);

        assert_eq!(
            app.gallery.loader.error(),
            Some("Failed to fetch photos: 500")
        );
        assert!(app.gallery.photos().is_empty());
    }

    #[tokio::test]
    async fn test_jokes_rate_limited_sets_banner_message() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/jokes/ten")
            .with_status(429)
            .create_async()
            .await;

        let mut app = test_app(&server.url(), Route::Jokes);
        app.activate_current_view();
        let action = next_action(&mut app).await;
        app.handle_action(action);

        assert_eq!(app.jokes.loader.error(), Some("Failed to fetch jokes: 429"));
    }

    #[tokio::test]
    async fn test_reentry_starts_loading_again() {
        let mut server = Server::new_async().await;
        let _photos = server
            .mock("GET", "/v2/list")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(PHOTOS)
            .create_async()
            .await;
        let _jokes = server
            .mock("GET", "/jokes/ten")
            .with_status(200)
            .with_body(JOKES)
            .create_async()
            .await;

        let mut app = test_app(&server.url(), Route::Jokes);
        app.activate_current_view();
        let action = next_action(&mut app).await;
        app.handle_action(action);
        app.jokes.like(1);
        assert_eq!(app.jokes.jokes().len(), 2);

        app.navigate("/");
        assert_eq!(app.jokes.loader.state(), &LoadState::Idle);
        assert!(app.gallery.loader.is_loading());

        app.navigate("/jokes");
        assert!(app.jokes.loader.is_loading(), "must not show the previous list");
        assert_eq!(app.jokes.card(1).like_count, 0);
    }

    #[tokio::test]
    async fn test_stale_result_after_leaving_is_ignored() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/jokes/ten")
            .with_status(200)
            .with_body(JOKES)
            .create_async()
            .await;

        let mut app = test_app(&server.url(), Route::NotFound("/x".to_string()));
        app.navigate("/jokes");
        let stale = app.jokes.loader.activation_id();
        app.navigate("/x");

        app.handle_action(Action::JokesLoaded {
            activation: stale,
            result: Err(FetchError::Status {
                resource: Resource::Jokes,
                status: 500,
            }),
        });

        assert_eq!(app.jokes.loader.state(), &LoadState::Idle);
        assert_eq!(app.route, Route::NotFound("/x".to_string()));
    }

    #[tokio::test]
    async fn test_navigating_to_current_route_is_noop() {
        let server = Server::new_async().await;
        let mut app = test_app(&server.url(), Route::Jokes);
        app.activate_current_view();
        let activation = app.jokes.loader.activation_id();

        app.navigate("/jokes?ref=nav");
        assert_eq!(app.jokes.loader.activation_id(), activation);
    }

    #[tokio::test]
    async fn test_not_found_keeps_navigation_working() {
        let server = Server::new_async().await;
        let mut app = test_app(&server.url(), Route::from_path("/does-not-exist"));
        app.activate_current_view();
        assert_eq!(app.keybinding_context(), KeyBindingContext::NotFound);

        app.handle_key_event(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::empty()));
        assert_eq!(app.route, Route::Jokes);

        app.navigate("/nope");
        app.handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()));
        assert_eq!(app.route, Route::Gallery);
    }

    #[tokio::test]
    async fn test_path_prompt_navigates() {
        let server = Server::new_async().await;
        let mut app = test_app(&server.url(), Route::Gallery);

        app.handle_action(Action::OpenPathPrompt);
        assert_eq!(app.input_mode, InputMode::PathInput);
        for c in "jokes".chars() {
            app.handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty()));
        }
        app.handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.route, Route::Jokes);
    }

    #[tokio::test]
    async fn test_tab_cycles_links() {
        let server = Server::new_async().await;
        let mut app = test_app(&server.url(), Route::Gallery);

        app.handle_action(Action::NextLink);
        assert_eq!(app.route, Route::Jokes);
        app.handle_action(Action::NextLink);
        assert_eq!(app.route, Route::Gallery);
        app.handle_action(Action::PrevLink);
        assert_eq!(app.route, Route::Jokes);
    }

    #[test]
    fn test_toggle_theme_persists_and_swaps_palette() {
        let path = std::env::temp_dir().join(format!(
            "sqa-demo-app-theme-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let mut app = App::with_parts(
            AppConfig::default(),
            ThemeStore::load_from(&path),
            Route::Gallery,
        );
        assert_eq!(app.theme, TuiTheme::light());

        app.toggle_theme();
        assert_eq!(app.theme, TuiTheme::dark());
        assert!(app.theme_store.is_dark());
        assert_eq!(
            app.toast.as_ref().map(|t| t.message.as_str()),
            Some("Switched to dark mode")
        );

        let reloaded = ThemeStore::load_from(&path);
        assert_eq!(reloaded.preference(), ThemePreference::Dark);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_runtime_actions_are_not_serializable() {
        let action = Action::ImageFailed {
            activation: 1,
            photo_id: "0".to_string(),
            error: "boom".to_string(),
        };
        assert!(action.is_runtime_only());
        assert!(ron::to_string(&action).is_err());
        assert_eq!(ron::to_string(&Action::ToggleTheme).unwrap(), "ToggleTheme");
    }
}
