use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{
    step_target, AppState, Banner, OverlayTab, SearchOutcome, ROSTER_LIMIT, SEARCH_MIN_CHARS,
};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.roster_loading = true;
            state.banner = None;
            DispatchResult::changed_with(Effect::LoadRoster)
        }

        Action::RosterDidLoad(mut entries) => {
            entries.truncate(ROSTER_LIMIT);
            state.roster = entries;
            state.roster_loading = false;
            state.reset_grid();
            let mut effects = load_next_page(state).unwrap_or_default();
            // A query typed while the roster was loading matched nothing.
            if state.search.normalized_query().chars().count() >= SEARCH_MIN_CHARS {
                effects.extend(apply_search(state).effects);
            }
            DispatchResult::changed_with_many(effects)
        }

        Action::RosterDidError(failure) => {
            state.roster_loading = false;
            state.banner = Some(Banner::from_failure("Roster", &failure));
            DispatchResult::changed()
        }

        Action::PageNext => {
            if state.search.is_active() || state.pending_pages > 0 {
                return DispatchResult::unchanged();
            }
            match load_next_page(state) {
                Some(effects) => DispatchResult::changed_with_many(effects),
                None => DispatchResult::unchanged(),
            }
        }

        Action::PageButton => {
            if state.search.is_active() {
                return clear_search(state);
            }
            reducer(state, Action::PageNext)
        }

        Action::PageDidLoad {
            generation,
            details,
        } => {
            if generation != state.grid_generation {
                for detail in details {
                    state.details.insert(detail.id, detail);
                }
                return DispatchResult::unchanged();
            }
            state.pending_pages = state.pending_pages.saturating_sub(1);
            let appended = state.append_visible(details);
            let effects = appended
                .iter()
                .filter_map(|id| sprite_effect(state, *id))
                .collect();
            DispatchResult::changed_with_many(effects)
        }

        Action::PageDidError {
            generation,
            start,
            failure,
        } => {
            if generation != state.grid_generation {
                return DispatchResult::unchanged();
            }
            state.pending_pages = state.pending_pages.saturating_sub(1);
            // Rewind so the next request covers the failed slice again.
            state.loaded_count = state.loaded_count.min(start);
            state.banner = Some(Banner::from_failure("Page", &failure));
            DispatchResult::changed()
        }

        Action::GridMove(delta) => {
            let count = state.displayed_ids().len();
            if count == 0 || state.overlay_open() {
                return DispatchResult::unchanged();
            }
            let next = (state.grid_cursor as i64 + i64::from(delta)).clamp(0, count as i64 - 1);
            if next as usize == state.grid_cursor {
                return DispatchResult::unchanged();
            }
            state.grid_cursor = next as usize;
            DispatchResult::changed()
        }

        Action::GridOpen => match state.selected_card_id() {
            Some(id) if !state.overlay_open() => {
                DispatchResult::changed_with_many(open_overlay(state, id))
            }
            _ => DispatchResult::unchanged(),
        },

        Action::SearchFocus => {
            if state.search.editing {
                return DispatchResult::unchanged();
            }
            state.search.editing = true;
            DispatchResult::changed()
        }

        Action::SearchBlur => {
            if !state.search.editing {
                return DispatchResult::unchanged();
            }
            state.search.editing = false;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.search.query.push(ch);
            apply_search(state)
        }

        Action::SearchBackspace => {
            if state.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            apply_search(state)
        }

        Action::SearchClear => {
            if state.search.query.is_empty() && !state.search.is_active() {
                if state.search.editing {
                    state.search.editing = false;
                    return DispatchResult::changed();
                }
                return DispatchResult::unchanged();
            }
            clear_search(state)
        }

        Action::SearchDidLoad(detail) => {
            let id = detail.id;
            state.details.insert(id, detail);
            if state.search.outcome != Some(SearchOutcome::Pending(id)) {
                return DispatchResult::unchanged();
            }
            state.search.outcome = Some(SearchOutcome::Found(id));
            DispatchResult::changed_with_many(sprite_effect(state, id).into_iter().collect())
        }

        Action::SearchDidError { id, failure } => {
            if state.search.outcome != Some(SearchOutcome::Pending(id)) {
                return DispatchResult::unchanged();
            }
            if failure.is_not_found() {
                state.search.outcome = Some(SearchOutcome::NotFound);
            } else {
                state.search.outcome = Some(SearchOutcome::Failed);
                state.banner = Some(Banner::from_failure("Search", &failure));
            }
            DispatchResult::changed()
        }

        Action::OverlayOpen(id) => DispatchResult::changed_with_many(open_overlay(state, id)),

        Action::OverlayClose => {
            if state.selection.take().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::OverlayTab(tab) => switch_tab(state, tab),
        Action::OverlayTabNext => {
            let next = state.tab.next();
            switch_tab(state, next)
        }

        Action::OverlayStep(direction) => {
            let Some(current) = state.selection else {
                return DispatchResult::unchanged();
            };
            match step_target(&state.visible_ids, current, direction) {
                Some(target) => DispatchResult::changed_with_many(open_overlay(state, target)),
                None => DispatchResult::unchanged(),
            }
        }

        Action::DetailDidLoad(detail) => {
            let id = detail.id;
            state.detail_loading.remove(&id);
            state.details.insert(id, detail);
            if state.selection != Some(id) {
                return DispatchResult::changed();
            }
            let mut effects: Vec<Effect> = sprite_effect(state, id).into_iter().collect();
            effects.extend(tab_effects(state));
            DispatchResult::changed_with_many(effects)
        }

        Action::DetailDidError { id, failure } => {
            state.detail_loading.remove(&id);
            if failure.is_not_found() && state.selection == Some(id) {
                state.selection = None;
            }
            state.banner = Some(Banner::from_failure(&format!("Pokemon #{id}"), &failure));
            DispatchResult::changed()
        }

        Action::EvolutionDidLoad { id, stages } => {
            state.evolution_loading.remove(&id);
            let ids: Vec<u32> = stages.iter().map(|stage| stage.id).collect();
            for stage in stages {
                state.details.insert(stage.id, stage);
            }
            state.evolutions.insert(id, ids.clone());
            if state.tab_subject() != Some(id) {
                return DispatchResult::changed();
            }
            let effects = ids
                .iter()
                .filter_map(|stage| sprite_effect(state, *stage))
                .collect();
            DispatchResult::changed_with_many(effects)
        }

        Action::EvolutionDidError { id, failure } => {
            state.evolution_loading.remove(&id);
            if state.tab_subject() != Some(id) {
                return DispatchResult::changed();
            }
            state.banner = Some(Banner::from_failure("Evolution chain", &failure));
            DispatchResult::changed()
        }

        Action::SpriteDidLoad { id, sprite } => {
            state.sprite_pending.remove(&id);
            state.sprites.insert(id, sprite);
            DispatchResult::changed()
        }

        Action::SpriteDidError { id, .. } => {
            state.sprite_pending.remove(&id);
            state.sprite_failed.insert(id);
            DispatchResult::changed()
        }

        Action::BannerDismiss => {
            if state.banner.take().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Tick => {
            state.tick = state.tick.wrapping_add(1);
            if state.is_loading() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Takes the next page slice. Records that are all cached are appended on
/// the spot, otherwise a fetch is issued. `None` once the roster is spent.
fn load_next_page(state: &mut AppState) -> Option<Vec<Effect>> {
    let start = state.loaded_count;
    let ids = state.next_page()?;
    if ids.iter().all(|id| state.details.contains_key(id)) {
        let details = ids
            .iter()
            .filter_map(|id| state.details.get(id).cloned())
            .collect();
        let appended = state.append_visible(details);
        return Some(
            appended
                .iter()
                .filter_map(|id| sprite_effect(state, *id))
                .collect(),
        );
    }
    state.pending_pages += 1;
    Some(vec![Effect::LoadPage {
        generation: state.grid_generation,
        start,
        ids,
    }])
}

/// Paginates again from the first page.
fn restore_grid(state: &mut AppState) -> DispatchResult<Effect> {
    state.reset_grid();
    let effects = load_next_page(state).unwrap_or_default();
    DispatchResult::changed_with_many(effects)
}

fn clear_search(state: &mut AppState) -> DispatchResult<Effect> {
    let was_active = state.search.is_active();
    state.search.query.clear();
    state.search.editing = false;
    state.search.outcome = None;
    if was_active {
        return restore_grid(state);
    }
    DispatchResult::changed()
}

fn apply_search(state: &mut AppState) -> DispatchResult<Effect> {
    let query = state.search.normalized_query();
    if query.chars().count() < SEARCH_MIN_CHARS {
        if state.search.is_active() {
            state.search.outcome = None;
            return restore_grid(state);
        }
        return DispatchResult::changed();
    }

    state.grid_cursor = 0;
    let Some(id) = state.first_match(&query).map(|entry| entry.id) else {
        state.search.outcome = Some(SearchOutcome::NotFound);
        return DispatchResult::changed();
    };
    if state.details.contains_key(&id) {
        state.search.outcome = Some(SearchOutcome::Found(id));
        return DispatchResult::changed_with_many(sprite_effect(state, id).into_iter().collect());
    }
    if state.search.outcome == Some(SearchOutcome::Pending(id)) {
        return DispatchResult::changed();
    }
    state.search.outcome = Some(SearchOutcome::Pending(id));
    DispatchResult::changed_with(Effect::LoadSearchResult { id })
}

fn open_overlay(state: &mut AppState, id: u32) -> Vec<Effect> {
    state.selection = Some(id);
    state.tab = OverlayTab::Main;
    state.search.editing = false;
    if let Some(position) = state.displayed_ids().iter().position(|shown| *shown == id) {
        state.grid_cursor = position;
    }

    if state.details.contains_key(&id) {
        return sprite_effect(state, id).into_iter().collect();
    }
    if state.detail_loading.insert(id) {
        vec![Effect::LoadDetail { id }]
    } else {
        Vec::new()
    }
}

fn switch_tab(state: &mut AppState, tab: OverlayTab) -> DispatchResult<Effect> {
    if state.tab == tab {
        return DispatchResult::unchanged();
    }
    state.tab = tab;
    DispatchResult::changed_with_many(tab_effects(state))
}

/// Loads whatever the active tab needs for its subject.
fn tab_effects(state: &mut AppState) -> Vec<Effect> {
    if state.tab != OverlayTab::Evo {
        return Vec::new();
    }
    let Some(id) = state.tab_subject() else {
        return Vec::new();
    };
    if let Some(stages) = state.evolutions.get(&id).cloned() {
        return stages
            .iter()
            .filter_map(|stage| sprite_effect(state, *stage))
            .collect();
    }
    if state.evolution_loading.insert(id) {
        vec![Effect::LoadEvolution { id }]
    } else {
        Vec::new()
    }
}

fn sprite_effect(state: &mut AppState, id: u32) -> Option<Effect> {
    if state.sprites.contains_key(&id)
        || state.sprite_pending.contains(&id)
        || state.sprite_failed.contains(&id)
    {
        return None;
    }
    let url = state.details.get(&id)?.image_url()?.to_string();
    state.sprite_pending.insert(id);
    Some(Effect::LoadSprite { id, url })
}
