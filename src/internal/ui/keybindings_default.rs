use crate::internal::router::NavLink;
use crate::internal::ui::app::Action;
use crate::internal::ui::keybindings::{KeyBindingContext, KeyBindingMap};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Create default keybindings for the application
pub fn create_default_keybindings() -> KeyBindingMap {
    let mut map = KeyBindingMap::new();

    add_global_bindings(&mut map);
    add_gallery_bindings(&mut map);
    add_jokes_bindings(&mut map);
    add_not_found_bindings(&mut map);

    map
}

fn add_global_bindings(map: &mut KeyBindingMap) {
    let ctx = KeyBindingContext::Global;

    map.add_binding(ctx, key('q'), Action::Quit);
    map.add_binding(
        ctx,
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        Action::Quit,
    );

    // Navigation shell
    map.add_binding(ctx, key('1'), navigate(NavLink::Gallery));
    map.add_binding(ctx, key('2'), navigate(NavLink::Jokes));
    map.add_binding(ctx, key_code(KeyCode::Tab), Action::NextLink);
    map.add_binding(ctx, key_code(KeyCode::BackTab), Action::PrevLink);
    map.add_binding(
        ctx,
        KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT),
        Action::PrevLink,
    );
    map.add_binding(ctx, key(':'), Action::OpenPathPrompt);

    // Theme
    map.add_binding(ctx, key('t'), Action::ToggleTheme);
}

fn add_gallery_bindings(map: &mut KeyBindingMap) {
    let ctx = KeyBindingContext::Gallery;

    map.add_binding(ctx, key('j'), Action::ScrollDown);
    map.add_binding(ctx, key('k'), Action::ScrollUp);
    map.add_binding(ctx, key_code(KeyCode::Down), Action::ScrollDown);
    map.add_binding(ctx, key_code(KeyCode::Up), Action::ScrollUp);
    map.add_binding(ctx, key_code(KeyCode::PageDown), Action::PageDown);
    map.add_binding(ctx, key_code(KeyCode::PageUp), Action::PageUp);
}

fn add_jokes_bindings(map: &mut KeyBindingMap) {
    let ctx = KeyBindingContext::Jokes;

    map.add_binding(ctx, key('j'), Action::SelectNext);
    map.add_binding(ctx, key('k'), Action::SelectPrev);
    map.add_binding(ctx, key_code(KeyCode::Down), Action::SelectNext);
    map.add_binding(ctx, key_code(KeyCode::Up), Action::SelectPrev);
    map.add_binding(ctx, key_code(KeyCode::Right), Action::SelectNext);
    map.add_binding(ctx, key_code(KeyCode::Left), Action::SelectPrev);

    map.add_binding(ctx, key_code(KeyCode::Enter), Action::TogglePunchline);
    map.add_binding(ctx, key(' '), Action::TogglePunchline);
    map.add_binding(ctx, key('l'), Action::LikeSelected);
}

fn add_not_found_bindings(map: &mut KeyBindingMap) {
    // "Return to Gallery"
    map.add_binding(
        KeyBindingContext::NotFound,
        key_code(KeyCode::Enter),
        navigate(NavLink::Gallery),
    );
}

fn navigate(link: NavLink) -> Action {
    Action::Navigate(link.path().to_string())
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty())
}

fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}
