use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Screen reached from a path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Gallery,
    Jokes,
    NotFound(String),
}

impl Route {
    /// Resolve a path. Query string, fragment, one trailing slash and letter
    /// case are ignored for matching; anything that is not a known screen is
    /// `NotFound` with the path as typed.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim();
        let bare = pathname(trimmed);
        let bare = match bare.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => bare,
        };

        match bare.to_ascii_lowercase().as_str() {
            "" | "/" => Self::Gallery,
            "/jokes" => Self::Jokes,
            _ => Self::NotFound(trimmed.to_string()),
        }
    }

    /// The path without its query string or fragment.
    pub fn pathname(&self) -> &str {
        pathname(self.path())
    }

    pub fn path(&self) -> &str {
        match self {
            Self::Gallery => NavLink::Gallery.path(),
            Self::Jokes => NavLink::Jokes.path(),
            Self::NotFound(path) => path,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Gallery => "Photo Gallery",
            Self::Jokes => "Dad Jokes",
            Self::NotFound(_) => "Page Not Found",
        }
    }
}

fn pathname(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or_default()
}

/// Persistent links in the navigation bar, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum NavLink {
    Gallery,
    Jokes,
}

impl NavLink {
    pub fn path(self) -> &'static str {
        match self {
            Self::Gallery => "/",
            Self::Jokes => "/jokes",
        }
    }

    /// Active purely by path equality with the current route.
    pub fn is_active(self, route: &Route) -> bool {
        route.path() == self.path()
    }

    pub fn all() -> Vec<NavLink> {
        NavLink::iter().collect()
    }

    /// Link after the active one, wrapping; the first link when none is active.
    pub fn next_from(route: &Route, forward: bool) -> NavLink {
        let links = Self::all();
        match links.iter().position(|l| l.is_active(route)) {
            Some(idx) if forward => links[(idx + 1) % links.len()],
            Some(idx) => links[(idx + links.len() - 1) % links.len()],
            None => links[0],
        }
    }
}
