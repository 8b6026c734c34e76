//! View models derived from [`AppState`].
//!
//! Everything here is plain data so the screen contents can be checked
//! without a terminal; `ui` draws them.

use crate::state::{AppState, OverlayTab, PokemonDetail, PokemonStat, SearchOutcome};

/// Highest base stat a bar scales against.
pub const STAT_SCALE_MAX: u32 = 255;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardView {
    pub id: u32,
    pub label: String,
    pub name: String,
    pub types: Vec<String>,
}

pub fn card_view(detail: &PokemonDetail) -> CardView {
    CardView {
        id: detail.id,
        label: id_label(detail.id),
        name: capitalize(&detail.name),
        types: detail.types.clone(),
    }
}

pub fn id_label(id: u32) -> String {
    format!("#{id:03}")
}

pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridView {
    Loading,
    Searching,
    Cards(Vec<CardView>),
    NotFound,
    Unavailable,
    Empty,
}

pub fn grid_view(state: &AppState) -> GridView {
    match state.search.outcome {
        Some(SearchOutcome::Found(id)) => match state.details.get(&id) {
            Some(detail) => GridView::Cards(vec![card_view(detail)]),
            None => GridView::Searching,
        },
        Some(SearchOutcome::Pending(_)) => GridView::Searching,
        Some(SearchOutcome::NotFound) => GridView::NotFound,
        Some(SearchOutcome::Failed) => GridView::Unavailable,
        None if state.visible_ids.is_empty() => {
            if state.roster_loading || state.pending_pages > 0 {
                GridView::Loading
            } else {
                GridView::Empty
            }
        }
        None => GridView::Cards(
            state
                .visible_ids
                .iter()
                .filter_map(|id| state.details.get(id))
                .map(card_view)
                .collect(),
        ),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageButtonView {
    pub label: String,
    pub enabled: bool,
}

pub fn page_button(state: &AppState) -> PageButtonView {
    let (label, enabled) = if state.search.is_active() {
        ("Back".to_string(), true)
    } else if state.pending_pages > 0 {
        ("Loading...".to_string(), false)
    } else if state.can_paginate() {
        (
            format!("Load more ({}/{})", state.loaded_count, state.roster.len()),
            true,
        )
    } else if state.roster.is_empty() {
        ("Load more".to_string(), false)
    } else {
        ("All loaded".to_string(), false)
    };
    PageButtonView { label, enabled }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatBarView {
    pub label: String,
    pub value: u32,
    pub percent: u16,
}

/// Bar width in percent, capped at 100.
pub fn stat_width_percent(base_stat: u32) -> u16 {
    let percent = u64::from(base_stat) * 100 / u64::from(STAT_SCALE_MAX);
    percent.min(100) as u16
}

pub fn stat_bar(stat: &PokemonStat) -> StatBarView {
    StatBarView {
        label: stat_label(&stat.name),
        value: stat.base_stat,
        percent: stat_width_percent(stat.base_stat),
    }
}

fn stat_label(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SP.ATK".to_string(),
        "special-defense" => "SP.DEF".to_string(),
        "speed" => "SPD".to_string(),
        other => other.to_ascii_uppercase(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MainTabView {
    pub height: String,
    pub weight: String,
    pub abilities: String,
}

/// Height arrives in decimetres and weight in hectograms.
pub fn main_tab(detail: &PokemonDetail) -> MainTabView {
    MainTabView {
        height: format!("{:.1} m", f64::from(detail.height) / 10.0),
        weight: format!("{:.1} kg", f64::from(detail.weight) / 10.0),
        abilities: detail.abilities.join(", "),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvoStageView {
    pub id: u32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvoTabView {
    Loading,
    Unavailable,
    Stages(Vec<EvoStageView>),
}

pub fn evo_tab(state: &AppState, id: u32) -> EvoTabView {
    match state.evolutions.get(&id) {
        Some(stages) => EvoTabView::Stages(
            stages
                .iter()
                .filter_map(|stage| state.details.get(stage))
                .map(|detail| EvoStageView {
                    id: detail.id,
                    name: capitalize(&detail.name),
                })
                .collect(),
        ),
        None if state.evolution_loading.contains(&id) => EvoTabView::Loading,
        None => EvoTabView::Unavailable,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TabBody {
    Loading,
    Main(MainTabView),
    Stats(Vec<StatBarView>),
    Evo(EvoTabView),
}

pub fn tab_body(state: &AppState) -> TabBody {
    let Some(id) = state.tab_subject() else {
        return TabBody::Loading;
    };
    match (state.tab, state.details.get(&id)) {
        (OverlayTab::Evo, _) => TabBody::Evo(evo_tab(state, id)),
        (_, None) => TabBody::Loading,
        (OverlayTab::Main, Some(detail)) => TabBody::Main(main_tab(detail)),
        (OverlayTab::Stats, Some(detail)) => {
            TabBody::Stats(detail.stats.iter().map(stat_bar).collect())
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayView {
    pub id: u32,
    pub title: String,
    pub types: Vec<String>,
    pub tab: OverlayTab,
    pub body: TabBody,
}

pub fn overlay_view(state: &AppState) -> Option<OverlayView> {
    let id = state.selection?;
    let (title, types) = match state.details.get(&id) {
        Some(detail) => (
            format!("{} {}", id_label(id), capitalize(&detail.name)),
            detail.types.clone(),
        ),
        None => (id_label(id), Vec::new()),
    };
    Some(OverlayView {
        id,
        title,
        types,
        tab: state.tab,
        body: tab_body(state),
    })
}
