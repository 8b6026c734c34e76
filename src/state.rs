use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::sprite::SpriteData;

/// Number of roster entries requested and kept.
pub const ROSTER_LIMIT: usize = 151;
/// Cards appended per pagination step.
pub const PER_PAGE: usize = 20;
/// Queries shorter than this leave the grid in paginated mode.
pub const SEARCH_MIN_CHARS: usize = 3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: u32,
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PokemonDetail {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub stats: Vec<PokemonStat>,
    pub abilities: Vec<String>,
    pub height: u32,
    pub weight: u32,
    pub artwork_url: Option<String>,
    pub sprite_url: Option<String>,
}

impl PokemonDetail {
    /// High-res artwork when the API has it, the default sprite otherwise.
    pub fn image_url(&self) -> Option<&str> {
        self.artwork_url
            .as_deref()
            .or(self.sprite_url.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub name: String,
    pub base_stat: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    NotFound,
    Network,
    Decode,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == FailureKind::NotFound
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub kind: FailureKind,
    pub message: String,
}

impl Banner {
    pub fn from_failure(context: &str, failure: &FetchFailure) -> Self {
        let message = match failure.kind {
            FailureKind::NotFound => format!("{context}: not found"),
            FailureKind::Network | FailureKind::Decode => format!("{context}: {failure}"),
        };
        Self {
            kind: failure.kind,
            message,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayTab {
    #[default]
    Main,
    Stats,
    Evo,
}

impl OverlayTab {
    pub const ALL: [OverlayTab; 3] = [OverlayTab::Main, OverlayTab::Stats, OverlayTab::Evo];

    pub fn label(self) -> &'static str {
        match self {
            OverlayTab::Main => "Main",
            OverlayTab::Stats => "Stats",
            OverlayTab::Evo => "Evo",
        }
    }

    pub fn index(self) -> usize {
        match self {
            OverlayTab::Main => 0,
            OverlayTab::Stats => 1,
            OverlayTab::Evo => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// What the grid shows while a search query is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// Matched roster entry whose detail is still loading.
    Pending(u32),
    Found(u32),
    NotFound,
    Failed,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub editing: bool,
    pub query: String,
    pub outcome: Option<SearchOutcome>,
}

impl SearchState {
    pub fn is_active(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn normalized_query(&self) -> String {
        self.query.trim().to_lowercase()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),

    pub roster: Vec<RosterEntry>,
    pub roster_loading: bool,
    /// Pagination cursor into `roster`.
    pub loaded_count: usize,
    /// Ids rendered in the paginated grid, in render order.
    pub visible_ids: Vec<u32>,
    pub grid_generation: u64,
    pub pending_pages: usize,
    pub grid_cursor: usize,

    pub details: HashMap<u32, PokemonDetail>,
    pub detail_loading: HashSet<u32>,

    pub search: SearchState,

    /// Id shown by the overlay; `None` while it is closed.
    pub selection: Option<u32>,
    pub tab: OverlayTab,
    pub evolutions: HashMap<u32, Vec<u32>>,
    pub evolution_loading: HashSet<u32>,

    pub sprites: HashMap<u32, SpriteData>,
    pub sprite_pending: HashSet<u32>,
    pub sprite_failed: HashSet<u32>,

    pub banner: Option<Banner>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            terminal_size: (80, 24),
            roster: Vec::new(),
            roster_loading: false,
            loaded_count: 0,
            visible_ids: Vec::new(),
            grid_generation: 0,
            pending_pages: 0,
            grid_cursor: 0,
            details: HashMap::new(),
            detail_loading: HashSet::new(),
            search: SearchState::default(),
            selection: None,
            tab: OverlayTab::Main,
            evolutions: HashMap::new(),
            evolution_loading: HashSet::new(),
            sprites: HashMap::new(),
            sprite_pending: HashSet::new(),
            sprite_failed: HashSet::new(),
            banner: None,
            tick: 0,
        }
    }
}

impl AppState {
    pub fn can_paginate(&self) -> bool {
        !self.roster.is_empty() && self.loaded_count < self.roster.len()
    }

    /// Advances the cursor by one page and returns the ids of that slice
    /// that are not rendered yet. `None` once the roster is exhausted.
    pub fn next_page(&mut self) -> Option<Vec<u32>> {
        if !self.can_paginate() {
            return None;
        }
        let end = (self.loaded_count + PER_PAGE).min(self.roster.len());
        let ids = self.roster[self.loaded_count..end]
            .iter()
            .map(|entry| entry.id)
            .filter(|id| !self.visible_ids.contains(id))
            .collect();
        self.loaded_count = end;
        Some(ids)
    }

    /// Clears the paginated grid. Page results from before the reset are
    /// recognised by their generation and dropped.
    pub fn reset_grid(&mut self) {
        self.visible_ids.clear();
        self.loaded_count = 0;
        self.pending_pages = 0;
        self.grid_cursor = 0;
        self.grid_generation = self.grid_generation.wrapping_add(1);
    }

    /// Records the details and appends ids not yet visible. Returns the ids
    /// that were appended.
    pub fn append_visible(&mut self, details: Vec<PokemonDetail>) -> Vec<u32> {
        let mut appended = Vec::new();
        for detail in details {
            let id = detail.id;
            self.details.insert(id, detail);
            if !self.visible_ids.contains(&id) {
                self.visible_ids.push(id);
                appended.push(id);
            }
        }
        appended
    }

    /// Ids of the cards currently on screen.
    pub fn displayed_ids(&self) -> Vec<u32> {
        match self.search.outcome {
            Some(SearchOutcome::Found(id)) => vec![id],
            Some(_) => Vec::new(),
            None => self.visible_ids.clone(),
        }
    }

    pub fn selected_card_id(&self) -> Option<u32> {
        self.displayed_ids().get(self.grid_cursor).copied()
    }

    pub fn first_match(&self, query: &str) -> Option<&RosterEntry> {
        if query.is_empty() {
            return None;
        }
        self.roster
            .iter()
            .find(|entry| entry.name.to_lowercase().contains(query))
    }

    pub fn overlay_open(&self) -> bool {
        self.selection.is_some()
    }

    /// Pokemon whose tab body is rendered: the selection, or the first
    /// visible card when nothing is selected.
    pub fn tab_subject(&self) -> Option<u32> {
        self.selection.or_else(|| self.visible_ids.first().copied())
    }

    pub fn current_detail(&self) -> Option<&PokemonDetail> {
        let id = self.selection?;
        self.details.get(&id)
    }

    pub fn is_loading(&self) -> bool {
        self.roster_loading
            || self.pending_pages > 0
            || !self.detail_loading.is_empty()
            || !self.evolution_loading.is_empty()
            || matches!(self.search.outcome, Some(SearchOutcome::Pending(_)))
    }
}

/// Circular neighbour of `current` in `visible`. An id that is not visible
/// counts as index -1, so `+1` lands on the first entry.
pub fn step_target(visible: &[u32], current: u32, direction: i8) -> Option<u32> {
    if visible.is_empty() {
        return None;
    }
    let len = visible.len() as i64;
    let index = visible
        .iter()
        .position(|id| *id == current)
        .map(|idx| idx as i64)
        .unwrap_or(-1);
    let next = (index + i64::from(direction) + len).rem_euclid(len);
    visible.get(next as usize).copied()
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Grid")
                .entry("roster", ron_string(&self.roster.len()))
                .entry("loaded_count", ron_string(&self.loaded_count))
                .entry("visible", ron_string(&self.visible_ids.len()))
                .entry("generation", ron_string(&self.grid_generation))
                .entry("cursor", ron_string(&self.grid_cursor))
                .entry("cached", ron_string(&self.details.len())),
            DebugSection::new("Search")
                .entry("query", ron_string(&self.search.query))
                .entry("editing", ron_string(&self.search.editing))
                .entry("outcome", ron_string(&self.search.outcome)),
            DebugSection::new("Overlay")
                .entry("selection", ron_string(&self.selection))
                .entry("tab", ron_string(&self.tab))
                .entry("evolutions", ron_string(&self.evolutions.len())),
            DebugSection::new("Status")
                .entry("roster_loading", ron_string(&self.roster_loading))
                .entry("pending_pages", ron_string(&self.pending_pages))
                .entry("detail_loading", ron_string(&self.detail_loading.len()))
                .entry("sprite_pending", ron_string(&self.sprite_pending.len()))
                .entry("banner", ron_string(&self.banner)),
        ]
    }
}
