//! Full-screen render checks through RenderHarness.

use pokegrid::{
    state::{
        AppState, Banner, FailureKind, OverlayTab, PokemonDetail, PokemonStat, RosterEntry,
        SearchOutcome,
    },
    ui::PokeUi,
};
use tui_dispatch::testing::*;

fn pikachu() -> PokemonDetail {
    PokemonDetail {
        id: 25,
        name: "pikachu".into(),
        types: vec!["electric".into()],
        stats: vec![
            PokemonStat {
                name: "hp".into(),
                base_stat: 35,
            },
            PokemonStat {
                name: "attack".into(),
                base_stat: 300,
            },
        ],
        abilities: vec!["static".into(), "lightning-rod".into()],
        height: 4,
        weight: 60,
        artwork_url: None,
        sprite_url: None,
    }
}

fn state_with_pikachu() -> AppState {
    let mut state = AppState {
        roster: vec![RosterEntry {
            id: 25,
            name: "pikachu".into(),
            url: "https://pokeapi.co/api/v2/pokemon/25/".into(),
        }],
        loaded_count: 1,
        visible_ids: vec![25],
        ..Default::default()
    };
    state.details.insert(25, pikachu());
    state
}

fn draw(state: &AppState, ui: &mut PokeUi) -> String {
    let mut render = RenderHarness::new(100, 40);
    render.render_to_string_plain(|frame| {
        ui.draw(frame, frame.area(), state);
    })
}

#[test]
fn test_card_shows_label_name_and_types() {
    let mut ui = PokeUi::new();
    let output = draw(&state_with_pikachu(), &mut ui);

    assert!(output.contains("#025"), "zero-padded id:\n{output}");
    assert!(output.contains("Pikachu"), "capitalized name:\n{output}");
    assert!(output.contains("ELECTRIC"), "type badge:\n{output}");
}

#[test]
fn test_click_hits_rendered_card() {
    let mut ui = PokeUi::new();
    draw(&state_with_pikachu(), &mut ui);

    // Header takes three rows, then the grid border.
    assert_eq!(ui.card_at(5, 6), Some(25));
    assert_eq!(ui.card_at(90, 30), None);
    assert_eq!(ui.grid_columns(), 4);
}

#[test]
fn test_not_found_placeholder() {
    let mut state = state_with_pikachu();
    state.search.query = "xyz".into();
    state.search.outcome = Some(SearchOutcome::NotFound);
    let mut ui = PokeUi::new();

    let output = draw(&state, &mut ui);

    assert!(output.contains("Pokemon not found"), "{output}");
    assert!(!output.contains("#025"));
}

#[test]
fn test_banner_is_rendered() {
    let mut state = state_with_pikachu();
    state.banner = Some(Banner {
        kind: FailureKind::Network,
        message: "Roster: connection refused".into(),
    });
    let mut ui = PokeUi::new();

    let output = draw(&state, &mut ui);

    assert!(output.contains("Roster: connection refused"), "{output}");
    assert!(output.contains("[x] dismiss"));
}

#[test]
fn test_overlay_main_tab() {
    let mut state = state_with_pikachu();
    state.selection = Some(25);
    let mut ui = PokeUi::new();

    let output = draw(&state, &mut ui);

    assert!(output.contains("#025 Pikachu"), "{output}");
    assert!(output.contains("static, lightning-rod"), "{output}");
    assert!(output.contains("0.4 m"));
    assert!(output.contains("Stats"));
}

#[test]
fn test_overlay_stats_tab_shows_raw_values() {
    let mut state = state_with_pikachu();
    state.selection = Some(25);
    state.tab = OverlayTab::Stats;
    let mut ui = PokeUi::new();

    let output = draw(&state, &mut ui);

    assert!(output.contains("HP"), "{output}");
    assert!(output.contains(" 35"), "{output}");
    assert!(output.contains("300"), "{output}");
}

#[test]
fn test_overlay_evo_tab_loading() {
    let mut state = state_with_pikachu();
    state.selection = Some(25);
    state.tab = OverlayTab::Evo;
    state.evolution_loading.insert(25);
    let mut ui = PokeUi::new();

    let output = draw(&state, &mut ui);

    assert!(output.contains("Loading evolution chain"), "{output}");
}
