//! Store-level flows driven through EffectStoreTestHarness: actions in,
//! effects out, async completions fed back by hand.

use pokegrid::{
    action::Action,
    effect::Effect,
    reducer::reducer,
    state::{
        AppState, FailureKind, FetchFailure, OverlayTab, PokemonDetail, PokemonStat, RosterEntry,
        SearchOutcome, PER_PAGE, ROSTER_LIMIT,
    },
    ui::PokeUi,
};
use tui_dispatch::testing::*;
use tui_dispatch::NumericComponentId;

const NAMES: [&str; 30] = [
    "bulbasaur",
    "ivysaur",
    "venusaur",
    "charmander",
    "charmeleon",
    "charizard",
    "squirtle",
    "wartortle",
    "blastoise",
    "caterpie",
    "metapod",
    "butterfree",
    "weedle",
    "kakuna",
    "beedrill",
    "pidgey",
    "pidgeotto",
    "pidgeot",
    "rattata",
    "raticate",
    "spearow",
    "fearow",
    "ekans",
    "arbok",
    "pikachu",
    "raichu",
    "sandshrew",
    "sandslash",
    "nidoran-f",
    "nidorina",
];

fn name_of(id: u32) -> String {
    NAMES
        .get(id as usize - 1)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("mon{id}"))
}

fn roster() -> Vec<RosterEntry> {
    (1..=ROSTER_LIMIT as u32)
        .map(|id| RosterEntry {
            id,
            name: name_of(id),
            url: format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
        })
        .collect()
}

fn detail(id: u32) -> PokemonDetail {
    PokemonDetail {
        id,
        name: name_of(id),
        types: vec!["normal".into()],
        stats: vec![PokemonStat {
            name: "hp".into(),
            base_stat: 40,
        }],
        abilities: vec!["run-away".into()],
        height: 3,
        weight: 18,
        artwork_url: None,
        sprite_url: None,
    }
}

fn take_page(effects: &[Effect]) -> (u64, Vec<u32>) {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::LoadPage {
                generation, ids, ..
            } => Some((*generation, ids.clone())),
            _ => None,
        })
        .expect("a LoadPage effect")
}

/// Roster loaded and the first page rendered.
fn harness_with_first_page() -> EffectStoreTestHarness<AppState, Action, Effect> {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.drain_effects();

    harness.complete_action(Action::RosterDidLoad(roster()));
    harness.process_emitted();
    let (generation, ids) = take_page(&harness.drain_effects());

    harness.complete_action(Action::PageDidLoad {
        generation,
        details: ids.into_iter().map(detail).collect(),
    });
    harness.process_emitted();
    harness
}

fn type_query(harness: &mut EffectStoreTestHarness<AppState, Action, Effect>, query: &str) {
    for ch in query.chars() {
        harness.dispatch_collect(Action::SearchInput(ch));
    }
}

#[test]
fn test_startup_loads_roster_then_first_page() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|effect| matches!(effect, Effect::LoadRoster));

    harness.complete_action(Action::RosterDidLoad(roster()));
    harness.process_emitted();
    let (_, ids) = take_page(&harness.drain_effects());
    assert_eq!(ids, (1..=PER_PAGE as u32).collect::<Vec<_>>());
    harness.assert_state(|s| s.pending_pages == 1 && !s.roster_loading);
}

#[test]
fn test_pagination_is_monotonic_until_exhausted() {
    let mut state = AppState::default();
    let mut result = reducer(&mut state, Action::RosterDidLoad(roster()));
    let mut last_cursor = 0;

    loop {
        let (generation, ids) = take_page(&result.effects);
        reducer(
            &mut state,
            Action::PageDidLoad {
                generation,
                details: ids.into_iter().map(detail).collect(),
            },
        );
        assert!(state.loaded_count > last_cursor);
        last_cursor = state.loaded_count;

        if !state.can_paginate() {
            break;
        }
        result = reducer(&mut state, Action::PageNext);
    }

    assert_eq!(last_cursor, ROSTER_LIMIT);
    let mut unique = state.visible_ids.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), state.visible_ids.len(), "no id is rendered twice");

    let refused = reducer(&mut state, Action::PageNext);
    assert!(!refused.changed);
    assert!(refused.effects.is_empty());
    assert_eq!(state.loaded_count, ROSTER_LIMIT);
}

#[test]
fn test_search_pika_shows_exactly_pikachu() {
    let mut harness = harness_with_first_page();

    type_query(&mut harness, "pika");
    let effects = harness.drain_effects();
    effects.effects_first_matches(|effect| matches!(effect, Effect::LoadSearchResult { id: 25 }));

    harness.complete_action(Action::SearchDidLoad(detail(25)));
    harness.process_emitted();

    harness.assert_state(|s| s.displayed_ids() == vec![25]);
    harness.assert_state(|s| s.search.outcome == Some(SearchOutcome::Found(25)));
}

#[test]
fn test_search_xyz_shows_not_found() {
    let mut harness = harness_with_first_page();

    type_query(&mut harness, "xyz");

    harness.assert_state(|s| s.search.outcome == Some(SearchOutcome::NotFound));
    harness.assert_state(|s| s.displayed_ids().is_empty());
}

#[test]
fn test_search_pi_leaves_grid_untouched() {
    let mut harness = harness_with_first_page();
    let first_page: Vec<u32> = (1..=PER_PAGE as u32).collect();

    type_query(&mut harness, "pi");

    harness.drain_effects().effects_count(0);
    harness.assert_state(|s| !s.search.is_active());
    harness.assert_state(|s| s.displayed_ids() == first_page);
}

#[test]
fn test_back_restores_paginated_grid() {
    let mut harness = harness_with_first_page();
    harness.dispatch_collect(Action::PageNext);
    let (generation, ids) = take_page(&harness.drain_effects());
    harness.complete_action(Action::PageDidLoad {
        generation,
        details: ids.into_iter().map(detail).collect(),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.visible_ids.len() == 2 * PER_PAGE);

    type_query(&mut harness, "char");
    harness.assert_state(|s| s.displayed_ids() == vec![4]);

    harness.dispatch_collect(Action::PageButton);

    harness.assert_state(|s| s.search.query.is_empty());
    harness.assert_state(|s| s.loaded_count == PER_PAGE);
    harness.assert_state(|s| s.visible_ids == (1..=PER_PAGE as u32).collect::<Vec<_>>());
}

#[test]
fn test_search_lookup_failure_raises_banner() {
    let mut harness = harness_with_first_page();
    type_query(&mut harness, "pika");
    harness.drain_effects();

    harness.complete_action(Action::SearchDidError {
        id: 25,
        failure: FetchFailure::new(FailureKind::Network, "connection reset"),
    });
    harness.process_emitted();

    harness.assert_state(|s| s.search.outcome == Some(SearchOutcome::Failed));
    harness.assert_state(|s| {
        s.banner.as_ref().map(|banner| banner.message.as_str()) == Some("Search: connection reset")
    });
}

#[test]
fn test_circular_navigation() {
    let mut state = AppState::default();
    for id in [1, 4, 7] {
        state.details.insert(id, detail(id));
    }
    state.visible_ids = vec![1, 4, 7];
    let mut harness = EffectStoreTestHarness::new(state, reducer);

    harness.dispatch_collect(Action::OverlayOpen(4));
    harness.dispatch_collect(Action::OverlayStep(1));
    harness.assert_state(|s| s.selection == Some(7));

    harness.dispatch_collect(Action::OverlayStep(1));
    harness.assert_state(|s| s.selection == Some(1));

    harness.dispatch_collect(Action::OverlayStep(-1));
    harness.assert_state(|s| s.selection == Some(7));
}

#[test]
fn test_step_from_search_result_jumps_to_first_visible() {
    let mut harness = harness_with_first_page();
    type_query(&mut harness, "pika");
    harness.complete_action(Action::SearchDidLoad(detail(25)));
    harness.process_emitted();

    harness.dispatch_collect(Action::GridOpen);
    harness.assert_state(|s| s.selection == Some(25));

    harness.dispatch_collect(Action::OverlayStep(1));
    harness.assert_state(|s| s.selection == Some(1));
}

#[test]
fn test_evo_tab_flow() {
    let mut harness = harness_with_first_page();
    harness.dispatch_collect(Action::OverlayOpen(1));
    harness.drain_effects();

    harness.dispatch_collect(Action::OverlayTab(OverlayTab::Evo));
    harness
        .drain_effects()
        .effects_first_matches(|effect| matches!(effect, Effect::LoadEvolution { id: 1 }));

    harness.complete_action(Action::EvolutionDidLoad {
        id: 1,
        stages: vec![detail(1), detail(2), detail(3)],
    });
    harness.process_emitted();
    harness.assert_state(|s| s.evolutions.get(&1) == Some(&vec![1, 2, 3]));

    harness.dispatch_collect(Action::OverlayClose);
    harness.assert_state(|s| !s.overlay_open());
}

#[test]
fn test_grid_keys_route_to_actions() {
    let mut harness = harness_with_first_page();
    let mut ui = PokeUi::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("/", |state, event| {
        ui.handle_grid_event(&event.kind, state).actions
    });
    actions.assert_count(1);
    actions.assert_first(Action::SearchFocus);

    let actions = harness.send_keys::<NumericComponentId, _, _>("n", |state, event| {
        ui.handle_grid_event(&event.kind, state).actions
    });
    actions.assert_first(Action::PageButton);
}

#[test]
fn test_overlay_keys_route_to_actions() {
    let mut harness = harness_with_first_page();
    harness.dispatch_collect(Action::OverlayOpen(1));
    let mut ui = PokeUi::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("esc", |state, event| {
        ui.handle_overlay_event(&event.kind, state).actions
    });
    actions.assert_first(Action::OverlayClose);

    let actions = harness.send_keys::<NumericComponentId, _, _>("2", |state, event| {
        ui.handle_overlay_event(&event.kind, state).actions
    });
    actions.assert_first(Action::OverlayTab(OverlayTab::Stats));
}
