use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ratatui::{Terminal, backend::TestBackend};
use sqa_demo::config::AppConfig;
use sqa_demo::internal::gallery::masonry;
use sqa_demo::internal::models::Photo;
use sqa_demo::internal::router::Route;
use sqa_demo::internal::theme_store::{ThemePreference, ThemeStore};
use sqa_demo::internal::thumbnail::Thumbnail;
use sqa_demo::internal::ui::app::App;

fn benchmark_masonry(c: &mut Criterion) {
    let heights: Vec<u16> = (0..200).map(|i| 8 + (i * 7 % 23) as u16).collect();

    c.bench_function("masonry 200 cards x 4 columns", |b| {
        b.iter(|| masonry(black_box(&heights), black_box(4)))
    });
}

fn benchmark_thumbnail_cells(c: &mut Criterion) {
    let pixels = (0..160 * 107)
        .map(|i| [(i % 256) as u8, (i / 256 % 256) as u8, 128])
        .collect();
    let thumb = Thumbnail::from_pixels(160, 107, pixels).unwrap();

    c.bench_function("thumbnail cells 36x14", |b| {
        b.iter(|| thumb.cells(black_box(36), black_box(14)))
    });
}

fn benchmark_gallery_frame(c: &mut Criterion) {
    let mut app = App::with_parts(
        AppConfig::default(),
        ThemeStore::new(ThemePreference::Light),
        Route::Gallery,
    );
    let activation = app.gallery.activate(12);
    let photos: Vec<Photo> = (0..12)
        .map(|i| Photo {
            id: i.to_string(),
            author: format!("Author {}", i),
            width: 800 + i * 50,
            height: 600,
            ..Default::default()
        })
        .collect();
    app.gallery.resolve(activation.id, Ok(photos));
    for i in 0..12 {
        let thumb = Thumbnail::from_pixels(4, 3, vec![[i as u8 * 20, 90, 160]; 12]).unwrap();
        app.gallery.mark_decoded(activation.id, &i.to_string(), thumb);
    }

    let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
    c.bench_function("draw gallery frame 160x48", |b| {
        b.iter(|| terminal.draw(|f| app.ui(f)).unwrap())
    });
}

criterion_group!(
    benches,
    benchmark_masonry,
    benchmark_thumbnail_cells,
    benchmark_gallery_frame
);
criterion_main!(benches);
