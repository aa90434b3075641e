//! Core type definitions for the application

use std::sync::Arc;

use image::DynamicImage;

use super::clip::Clip;

/// Where the initial catalog load stands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CatalogState {
    #[default]
    Loading,
    Loaded,
    /// User-facing message; the load can be retried
    Failed(String),
}

/// Load status of one cover art URL. Decoded pixels are never kept here,
/// only in the cost-bounded artwork cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtworkStatus {
    Loading,
    Ready,
    Failed,
}

/// Cover art for the visible page as handed to the view
#[derive(Clone)]
pub enum ArtworkState {
    Loading,
    Ready(Arc<DynamicImage>),
    Failed,
}

/// Horizontally paged list of clips, one page per clip
#[derive(Clone, Debug, Default)]
pub struct Carousel {
    clips: Vec<Clip>,
    page: usize,
}

impl Carousel {
    pub fn new(clips: Vec<Clip>) -> Self {
        Self { clips, page: 0 }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn current(&self) -> Option<&Clip> {
        self.clips.get(self.page)
    }

    /// Move one page right; stops at the last clip
    pub fn next_page(&mut self) -> Option<&Clip> {
        if self.page + 1 >= self.clips.len() {
            return None;
        }
        self.page += 1;
        self.current()
    }

    /// Move one page left; stops at the first clip
    pub fn prev_page(&mut self) -> Option<&Clip> {
        if self.page == 0 || self.is_empty() {
            return None;
        }
        self.page -= 1;
        self.current()
    }

    /// Jump to the page showing `id`. Returns false if the clip is unknown.
    pub fn show_clip(&mut self, id: &str) -> bool {
        match self.clips.iter().position(|clip| clip.id == id) {
            Some(index) => {
                self.page = index;
                true
            }
            None => false,
        }
    }

    /// The visible page and its immediate neighbours
    pub fn nearby(&self) -> impl Iterator<Item = &Clip> {
        let start = self.page.saturating_sub(1);
        let end = (self.page + 2).min(self.clips.len());
        self.clips[start.min(end)..end].iter()
    }
}

/// UI state for the application
#[derive(Clone, Default)]
pub struct UiState {
    pub catalog: CatalogState,
    pub carousel: Carousel,
    pub show_help_popup: bool,
}
