pub mod theme_loader;
