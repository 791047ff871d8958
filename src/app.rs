//! Application state. One owner: the event loop mutates it, the renderer
//! reads it. Background loads deliver results tagged with the generation
//! that spawned them; a result whose tag no longer matches is stale and is
//! dropped instead of applied.

use image::imageops::FilterType;

use crate::error::ApiError;
use crate::filter::compute_visible;
use crate::models::{DetailView, Summary};

/// Compact RGB thumbnail decoded from fetched artwork bytes.
pub struct Artwork {
    pub w: u32,
    pub h: u32,
    /// RGB pixels in row-major order (len = w*h*3)
    pub pixels: Vec<u8>,
}

const THUMB_W: u32 = 64;
const THUMB_H: u32 = 64;

impl Artwork {
    /// Decode image bytes into a canonical thumbnail. Returns None on
    /// undecodable data; the caller renders a placeholder instead.
    pub fn decode(bytes: &[u8]) -> Option<Artwork> {
        let img = image::load_from_memory(bytes).ok()?;
        let small = image::imageops::resize(&img.to_rgba8(), THUMB_W, THUMB_H, FilterType::Lanczos3);
        let mut pixels = Vec::with_capacity((THUMB_W * THUMB_H * 3) as usize);
        for y in 0..small.height() {
            for x in 0..small.width() {
                let p = small.get_pixel(x, y);
                pixels.push(p[0]);
                pixels.push(p[1]);
                pixels.push(p[2]);
            }
        }
        Some(Artwork {
            w: THUMB_W,
            h: THUMB_H,
            pixels,
        })
    }

    /// Pixel rows resized to `w` x `h` for rendering into a pane.
    pub fn rows(&self, w: u32, h: u32) -> Vec<Vec<(u8, u8, u8)>> {
        let mut buf = image::RgbaImage::new(self.w, self.h);
        for y in 0..self.h {
            for x in 0..self.w {
                let idx = ((y * self.w + x) * 3) as usize;
                buf.put_pixel(
                    x,
                    y,
                    image::Rgba([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2], 255]),
                );
            }
        }
        let resized = image::imageops::resize(&buf, w.max(1), h.max(1), FilterType::Lanczos3);
        let mut rows = Vec::with_capacity(resized.height() as usize);
        for y in 0..resized.height() {
            let mut row = Vec::with_capacity(resized.width() as usize);
            for x in 0..resized.width() {
                let p = resized.get_pixel(x, y);
                row.push((p[0], p[1], p[2]));
            }
            rows.push(row);
        }
        rows
    }
}

pub enum CollectionState {
    Loading,
    Ready,
    Failed(String),
}

pub enum DetailState {
    Closed,
    Loading(String),
    Ready(Box<DetailView>, Option<Artwork>),
    Failed(String),
}

pub struct App {
    /// Type names for the tab row; index 0 is the synthetic "all" tab.
    pub types: Vec<String>,
    pub tab_index: usize,
    pub all: Vec<Summary>,
    pub visible: Vec<Summary>,
    pub selected: usize,
    pub search_mode: bool,
    pub search_query: String,
    pub collection_state: CollectionState,
    pub detail: DetailState,
    pub show_help: bool,
    pub status: Option<String>,
    collection_generation: u64,
    detail_generation: u64,
}

impl App {
    pub fn new(initial_type: Option<String>) -> Self {
        let mut app = App {
            types: Vec::new(),
            tab_index: 0,
            all: Vec::new(),
            visible: Vec::new(),
            selected: 0,
            search_mode: false,
            search_query: String::new(),
            collection_state: CollectionState::Loading,
            detail: DetailState::Closed,
            show_help: false,
            status: None,
            collection_generation: 0,
            detail_generation: 0,
        };
        if let Some(t) = initial_type {
            app.types = vec![t];
            app.tab_index = 1;
        }
        app
    }

    /// Active type filter, derived from the selected tab. Tab 0 is "all".
    pub fn type_filter(&self) -> Option<&str> {
        if self.tab_index == 0 {
            None
        } else {
            self.types.get(self.tab_index - 1).map(String::as_str)
        }
    }

    /// Replace the tab row with the fetched type directory, keeping the
    /// active filter selected if it is still present.
    pub fn set_types(&mut self, types: Vec<String>) {
        let current = self.type_filter().map(str::to_string);
        self.types = types;
        self.tab_index = match current {
            Some(t) => self
                .types
                .iter()
                .position(|name| *name == t)
                .map(|i| i + 1)
                .unwrap_or(0),
            None => 0,
        };
    }

    /// Start a new collection load; returns the generation to tag the
    /// spawned request with. Any in-flight load is superseded.
    pub fn begin_collection_load(&mut self) -> u64 {
        self.collection_generation += 1;
        self.collection_state = CollectionState::Loading;
        self.collection_generation
    }

    /// Apply a finished collection load, unless it is stale. A failure
    /// keeps the previously displayed records. Returns whether the result
    /// was applied.
    pub fn apply_collection(&mut self, generation: u64, result: Result<Vec<Summary>, ApiError>) -> bool {
        if generation != self.collection_generation {
            tracing::debug!(generation, current = self.collection_generation, "dropping stale collection result");
            return false;
        }
        match result {
            Ok(records) => {
                self.all = records;
                self.collection_state = CollectionState::Ready;
                self.refresh_visible();
            }
            Err(err) => {
                self.collection_state = CollectionState::Failed(format!("failed to load: {}", err));
            }
        }
        true
    }

    pub fn begin_detail_load(&mut self, identifier: &str) -> u64 {
        self.detail_generation += 1;
        self.detail = DetailState::Loading(identifier.to_string());
        self.detail_generation
    }

    /// Close the detail overlay. Bumping the generation makes any in-flight
    /// detail result stale, so it can never reopen the overlay.
    pub fn close_detail(&mut self) {
        self.detail_generation += 1;
        self.detail = DetailState::Closed;
    }

    pub fn apply_detail(
        &mut self,
        generation: u64,
        result: Result<(DetailView, Option<Artwork>), ApiError>,
    ) -> bool {
        if generation != self.detail_generation {
            tracing::debug!(generation, current = self.detail_generation, "dropping stale detail result");
            return false;
        }
        self.detail = match result {
            Ok((view, artwork)) => DetailState::Ready(Box::new(view), artwork),
            Err(err) if err.is_not_found() => DetailState::Failed(err.to_string()),
            Err(err) => DetailState::Failed(format!("failed to load: {}", err)),
        };
        true
    }

    /// Recompute the visible subset after any filter or collection change.
    pub fn refresh_visible(&mut self) {
        self.visible = compute_visible(
            &self.all,
            self.type_filter(),
            Some(self.search_query.as_str()),
        );
        if self.visible.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.visible.len() {
            self.selected = self.visible.len() - 1;
        }
    }

    pub fn selected_record(&self) -> Option<&Summary> {
        self.visible.get(self.selected)
    }

    pub fn next(&mut self) {
        if !self.visible.is_empty() {
            self.selected = (self.selected + 1) % self.visible.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.visible.is_empty() {
            if self.selected == 0 {
                self.selected = self.visible.len() - 1;
            } else {
                self.selected -= 1;
            }
        }
    }

    /// Move the tab selection left or right. Returns true when the active
    /// filter changed (the caller then starts a fresh load).
    pub fn cycle_tab(&mut self, delta: i32) -> bool {
        let count = self.types.len() + 1;
        if count == 1 {
            return false;
        }
        let before = self.tab_index;
        self.tab_index = (self.tab_index as i32 + delta).rem_euclid(count as i32) as usize;
        self.tab_index != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, id: u32, types: &[&str]) -> Summary {
        Summary {
            name: name.to_string(),
            id,
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn view(name: &str) -> DetailView {
        DetailView {
            name: name.to_string(),
            id: 1,
            artwork_url: None,
            types: vec!["grass".to_string()],
            abilities: vec![],
            height: 7,
            weight: 69,
            base_experience: 64,
            stats: vec![],
            flavor: String::new(),
            evolution_stages: vec![],
            moves: vec![],
        }
    }

    #[test]
    fn stale_collection_results_are_dropped() {
        let mut app = App::new(None);
        let old_gen = app.begin_collection_load();
        // The user switched filters before the first load finished.
        let new_gen = app.begin_collection_load();

        assert!(!app.apply_collection(old_gen, Ok(vec![record("stale", 1, &["fire"])])));
        assert!(app.all.is_empty());

        assert!(app.apply_collection(new_gen, Ok(vec![record("fresh", 2, &["water"])])));
        assert_eq!(app.all.len(), 1);
        assert_eq!(app.all[0].name, "fresh");
    }

    #[test]
    fn failed_load_keeps_previous_records() {
        let mut app = App::new(None);
        let generation = app.begin_collection_load();
        app.apply_collection(generation, Ok(vec![record("pikachu", 25, &["electric"])]));

        let generation = app.begin_collection_load();
        app.apply_collection(
            generation,
            Err(ApiError::NotFound {
                identifier: "x".to_string(),
            }),
        );

        assert!(matches!(app.collection_state, CollectionState::Failed(_)));
        assert_eq!(app.all.len(), 1);
        assert_eq!(app.visible.len(), 1);
    }

    #[test]
    fn detail_result_after_close_is_dropped() {
        let mut app = App::new(None);
        let generation = app.begin_detail_load("bulbasaur");
        app.close_detail();

        assert!(!app.apply_detail(generation, Ok((view("bulbasaur"), None))));
        assert!(matches!(app.detail, DetailState::Closed));
    }

    #[test]
    fn detail_result_for_current_generation_is_applied() {
        let mut app = App::new(None);
        let generation = app.begin_detail_load("bulbasaur");
        assert!(app.apply_detail(generation, Ok((view("bulbasaur"), None))));
        assert!(matches!(app.detail, DetailState::Ready(_, _)));
    }

    #[test]
    fn tab_cycling_wraps_and_reports_changes() {
        let mut app = App::new(None);
        app.set_types(vec!["fire".to_string(), "water".to_string()]);

        assert_eq!(app.type_filter(), None);
        assert!(app.cycle_tab(1));
        assert_eq!(app.type_filter(), Some("fire"));
        assert!(app.cycle_tab(-1));
        assert_eq!(app.type_filter(), None);
        assert!(app.cycle_tab(-1));
        assert_eq!(app.type_filter(), Some("water"));
    }

    #[test]
    fn set_types_keeps_active_filter_selected() {
        let mut app = App::new(Some("flying".to_string()));
        assert_eq!(app.type_filter(), Some("flying"));

        app.set_types(vec![
            "normal".to_string(),
            "flying".to_string(),
            "fire".to_string(),
        ]);
        assert_eq!(app.type_filter(), Some("flying"));

        app.set_types(vec!["rock".to_string()]);
        assert_eq!(app.type_filter(), None);
    }

    #[test]
    fn search_refilters_and_clamps_selection() {
        let mut app = App::new(None);
        let generation = app.begin_collection_load();
        app.apply_collection(
            generation,
            Ok(vec![
                record("charmander", 4, &["fire"]),
                record("pidgey", 16, &["normal", "flying"]),
                record("bulbasaur", 1, &["grass"]),
            ]),
        );
        app.selected = 2;

        app.search_query = "fly".to_string();
        app.refresh_visible();
        assert_eq!(app.visible.len(), 1);
        assert_eq!(app.selected, 0);
        assert_eq!(app.selected_record().unwrap().name, "pidgey");
    }
}
