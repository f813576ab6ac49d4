use crate::internal::ui::app::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Screen a key binding applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyBindingContext {
    Global,
    Gallery,
    Jokes,
    NotFound,
}

/// Maps key events to actions
#[derive(Debug, Clone, Default)]
pub struct KeyBindingMap {
    global: HashMap<KeyEvent, Action>,
    gallery: HashMap<KeyEvent, Action>,
    jokes: HashMap<KeyEvent, Action>,
    not_found: HashMap<KeyEvent, Action>,
}

impl KeyBindingMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, context: KeyBindingContext) -> &HashMap<KeyEvent, Action> {
        match context {
            KeyBindingContext::Global => &self.global,
            KeyBindingContext::Gallery => &self.gallery,
            KeyBindingContext::Jokes => &self.jokes,
            KeyBindingContext::NotFound => &self.not_found,
        }
    }

    fn map_mut(&mut self, context: KeyBindingContext) -> &mut HashMap<KeyEvent, Action> {
        match context {
            KeyBindingContext::Global => &mut self.global,
            KeyBindingContext::Gallery => &mut self.gallery,
            KeyBindingContext::Jokes => &mut self.jokes,
            KeyBindingContext::NotFound => &mut self.not_found,
        }
    }

    /// Get the action for a given key event in a specific context
    /// Checks context-specific bindings first, then falls back to global
    pub fn get_action(&self, key: &KeyEvent, context: KeyBindingContext) -> Option<Action> {
        self.map(context)
            .get(key)
            .or_else(|| self.global.get(key))
            .cloned()
    }

    pub fn add_binding(&mut self, context: KeyBindingContext, key: KeyEvent, action: Action) {
        self.map_mut(context).insert(key, action);
    }

    /// Merge custom keybindings from configuration
    pub fn merge_config(&mut self, config: &crate::config::KeyBindingConfig) {
        let mut merge = |ctx: KeyBindingContext, bindings: &HashMap<String, Action>| {
            for (key_str, action) in bindings {
                if action.is_runtime_only() {
                    tracing::warn!("Action {:?} cannot be bound to a key", action);
                    continue;
                }
                match parse_key_str(key_str) {
                    Some(key_event) => self.add_binding(ctx, key_event, action.clone()),
                    None => tracing::warn!("Invalid key string in config: {}", key_str),
                }
            }
        };

        merge(KeyBindingContext::Global, &config.global);
        merge(KeyBindingContext::Gallery, &config.gallery);
        merge(KeyBindingContext::Jokes, &config.jokes);
        merge(KeyBindingContext::NotFound, &config.not_found);
    }
}

/// Parse a key string into a KeyEvent
/// Supported formats:
/// - Single char: "j", "k", "1"
/// - Special keys: "Enter", "Tab", "BackTab", "Esc", "Space", "Up", "Down", "Left", "Right"
/// - With modifiers: "Ctrl+C", "Shift+Tab"
pub fn parse_key_str(key_str: &str) -> Option<KeyEvent> {
    let parts: Vec<&str> = key_str.split('+').collect();
    let (key_part, modifier_parts) = parts.split_last()?;

    let mut modifiers = KeyModifiers::empty();
    for modifier in modifier_parts {
        match modifier.to_lowercase().as_str() {
            "ctrl" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => return None,
        }
    }

    let code = match *key_part {
        "Enter" => KeyCode::Enter,
        "Tab" => KeyCode::Tab,
        "BackTab" => KeyCode::BackTab,
        "Esc" => KeyCode::Esc,
        "Space" => KeyCode::Char(' '),
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Backspace" => KeyCode::Backspace,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        s => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };

    Some(KeyEvent::new(code, modifiers))
}
