use rand::Rng;
use std::collections::{HashMap, HashSet};

use crate::api::FetchError;
use crate::internal::loader::{Activation, Loader};
use crate::internal::models::Photo;
use crate::internal::thumbnail::Thumbnail;

/// Height in pixels a photo is requested and laid out at, keeping its aspect
/// ratio at `target_width`. A zero-width record is treated as square.
pub fn display_height(photo: &Photo, target_width: u32) -> u32 {
    match photo.width {
        0 => target_width,
        w => ((target_width as f64 * photo.height as f64) / w as f64).round() as u32,
    }
}

pub fn caption(photo: &Photo) -> String {
    format!("Photo by {}", photo.author)
}

/// Responsive column count for the masonry grid.
pub fn column_count(area_width: u16) -> usize {
    match area_width {
        0..60 => 1,
        60..100 => 2,
        100..140 => 3,
        _ => 4,
    }
}

/// Terminal rows of picture for a card `col_width` cells wide. Each cell
/// holds two vertical pixels.
pub fn picture_rows(height_px: u32, target_width: u32, col_width: u16) -> u16 {
    if target_width == 0 {
        return 0;
    }
    let px = (col_width as u64 * height_px as u64).div_ceil(target_width as u64);
    px.div_ceil(2).min(u16::MAX as u64) as u16
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub column: usize,
    pub y: u32,
    pub height: u16,
}

/// Masonry placement: each card goes into the currently shortest column, so
/// reading order is kept left to right while columns stay balanced.
pub fn masonry(heights: &[u16], columns: usize) -> Vec<Placement> {
    let columns = columns.max(1);
    let mut tops = vec![0u32; columns];
    heights
        .iter()
        .map(|&height| {
            let column = tops
                .iter()
                .enumerate()
                .min_by_key(|(i, top)| (**top, *i))
                .map(|(i, _)| i)
                .unwrap_or(0);
            let placement = Placement {
                column,
                y: tops[column],
                height,
            };
            tops[column] += height as u32;
            placement
        })
        .collect()
}

/// Gallery view state for one activation.
#[derive(Debug)]
pub struct GalleryView {
    pub loader: Loader<Photo>,
    decoded: HashMap<String, Thumbnail>,
    failed: HashSet<String>,
    skeleton_heights: Vec<u32>,
    pub scroll: u16,
    target_width: u32,
}

impl GalleryView {
    pub fn new(target_width: u32) -> Self {
        Self {
            loader: Loader::new(),
            decoded: HashMap::new(),
            failed: HashSet::new(),
            skeleton_heights: Vec::new(),
            scroll: 0,
            target_width,
        }
    }

    pub fn target_width(&self) -> u32 {
        self.target_width
    }

    /// Enter the view: drop everything from the previous visit and start loading.
    pub fn activate(&mut self, placeholders: usize) -> Activation {
        self.decoded.clear();
        self.failed.clear();
        self.scroll = 0;
        let mut rng = rand::rng();
        self.skeleton_heights = (0..placeholders)
            .map(|_| rng.random_range(200..400))
            .collect();
        self.loader.activate()
    }

    pub fn deactivate(&mut self) {
        self.loader.deactivate();
        self.decoded.clear();
        self.failed.clear();
    }

    pub fn resolve(&mut self, activation_id: u64, result: Result<Vec<Photo>, FetchError>) -> bool {
        self.loader.resolve(activation_id, result)
    }

    pub fn photos(&self) -> &[Photo] {
        self.loader.items()
    }

    /// Random placeholder heights (pixels) shown while the listing loads.
    pub fn skeleton_heights(&self) -> &[u32] {
        &self.skeleton_heights
    }

    pub fn display_height(&self, photo: &Photo) -> u32 {
        display_height(photo, self.target_width)
    }

    /// Record that a photo's image finished decoding. Ignored for a stale
    /// activation or an id that is not in the current listing.
    pub fn mark_decoded(&mut self, activation_id: u64, photo_id: &str, thumb: Thumbnail) -> bool {
        if !self.loader.is_current(activation_id) || !self.contains(photo_id) {
            return false;
        }
        self.failed.remove(photo_id);
        self.decoded.insert(photo_id.to_string(), thumb);
        true
    }

    pub fn mark_failed(&mut self, activation_id: u64, photo_id: &str) -> bool {
        if !self.loader.is_current(activation_id) || self.decoded.contains_key(photo_id) {
            return false;
        }
        self.failed.insert(photo_id.to_string())
    }

    fn contains(&self, photo_id: &str) -> bool {
        self.photos().iter().any(|p| p.id == photo_id)
    }

    pub fn is_decoded(&self, photo_id: &str) -> bool {
        self.decoded.contains_key(photo_id)
    }

    pub fn has_failed(&self, photo_id: &str) -> bool {
        self.failed.contains(photo_id)
    }

    pub fn thumbnail(&self, photo_id: &str) -> Option<&Thumbnail> {
        self.decoded.get(photo_id)
    }

    pub fn decoded_count(&self) -> usize {
        self.decoded.len()
    }

    pub fn scroll_by(&mut self, delta: i32) {
        self.scroll = match delta {
            d if d < 0 => self.scroll.saturating_sub(d.unsigned_abs() as u16),
            d => self.scroll.saturating_add(d as u16),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::models::LoadState;

    fn photo(id: &str, width: u32, height: u32) -> Photo {
        Photo {
            id: id.to_string(),
            author: format!("Author {}", id),
            width,
            height,
            ..Default::default()
        }
    }

    fn pixel() -> Thumbnail {
        Thumbnail::from_pixels(1, 1, vec![[10, 20, 30]]).unwrap()
    }

    #[test]
    fn test_display_height_rounds_aspect_ratio() {
        assert_eq!(display_height(&photo("0", 5000, 3333), 400), 267);
        assert_eq!(display_height(&photo("1", 800, 600), 400), 300);
        assert_eq!(display_height(&photo("2", 600, 800), 400), 533);
        assert_eq!(display_height(&photo("3", 0, 600), 400), 400);
    }

    #[test]
    fn test_caption() {
        assert_eq!(caption(&photo("0", 1, 1)), "Photo by Author 0");
    }

    #[test]
    fn test_column_count_breakpoints() {
        assert_eq!(column_count(40), 1);
        assert_eq!(column_count(60), 2);
        assert_eq!(column_count(120), 3);
        assert_eq!(column_count(200), 4);
    }

    #[test]
    fn test_picture_rows() {
        // 40 cells wide, 300px at 400px width -> 30 pixel rows -> 15 cell rows
        assert_eq!(picture_rows(300, 400, 40), 15);
        assert_eq!(picture_rows(300, 0, 40), 0);
    }

    #[test]
    fn test_masonry_fills_shortest_column() {
        let placements = masonry(&[10, 4, 3, 5], 2);
        assert_eq!(placements[0], Placement { column: 0, y: 0, height: 10 });
        assert_eq!(placements[1], Placement { column: 1, y: 0, height: 4 });
        assert_eq!(placements[2], Placement { column: 1, y: 4, height: 3 });
        assert_eq!(placements[3], Placement { column: 1, y: 7, height: 5 });
    }

    #[test]
    fn test_activation_generates_placeholders() {
        let mut view = GalleryView::new(400);
        view.activate(12);
        assert_eq!(view.skeleton_heights().len(), 12);
        assert!(
            view.skeleton_heights()
                .iter()
                .all(|h| (200..400).contains(h))
        );
        assert!(view.loader.is_loading());
    }

    #[test]
    fn test_decode_set_grows_and_resets_on_reentry() {
        let mut view = GalleryView::new(400);
        let activation = view.activate(12);
        view.resolve(activation.id, Ok(vec![photo("1", 4, 3), photo("2", 4, 3)]));

        assert!(!view.is_decoded("1"));
        assert!(view.mark_decoded(activation.id, "1", pixel()));
        assert!(view.is_decoded("1"));
        assert_eq!(view.decoded_count(), 1);

        view.deactivate();
        let again = view.activate(12);
        assert_eq!(view.decoded_count(), 0);
        assert_eq!(view.loader.state(), &LoadState::Loading);

        // Late decode from the previous visit is ignored.
        assert!(!view.mark_decoded(activation.id, "2", pixel()));
        assert!(!view.mark_decoded(again.id, "2", pixel()), "listing not loaded yet");
    }

    #[test]
    fn test_unknown_photo_id_is_ignored() {
        let mut view = GalleryView::new(400);
        let activation = view.activate(0);
        view.resolve(activation.id, Ok(vec![photo("1", 4, 3)]));
        assert!(!view.mark_decoded(activation.id, "99", pixel()));
    }

    #[test]
    fn test_failed_image_stays_undecoded() {
        let mut view = GalleryView::new(400);
        let activation = view.activate(0);
        view.resolve(activation.id, Ok(vec![photo("1", 4, 3)]));

        assert!(view.mark_failed(activation.id, "1"));
        assert!(view.has_failed("1"));
        assert!(!view.is_decoded("1"));
    }

    #[test]
    fn test_scroll_saturates() {
        let mut view = GalleryView::new(400);
        view.scroll_by(-5);
        assert_eq!(view.scroll, 0);
        view.scroll_by(7);
        view.scroll_by(-2);
        assert_eq!(view.scroll, 5);
    }
}
