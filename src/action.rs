use serde::{Deserialize, Serialize};

use crate::sprite::SpriteData;
use crate::state::{FetchFailure, OverlayTab, PokemonDetail, RosterEntry};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,
    RosterDidLoad(Vec<RosterEntry>),
    RosterDidError(FetchFailure),

    PageNext,
    /// The footer button: "Load more", or "Back" while a search result is shown.
    PageButton,
    PageDidLoad { generation: u64, details: Vec<PokemonDetail> },
    PageDidError {
        generation: u64,
        start: usize,
        failure: FetchFailure,
    },

    GridMove(i16),
    GridOpen,

    SearchFocus,
    SearchBlur,
    SearchInput(char),
    SearchBackspace,
    SearchClear,
    SearchDidLoad(PokemonDetail),
    SearchDidError { id: u32, failure: FetchFailure },

    OverlayOpen(u32),
    OverlayClose,
    OverlayTab(OverlayTab),
    OverlayTabNext,
    OverlayStep(i8),

    DetailDidLoad(PokemonDetail),
    DetailDidError { id: u32, failure: FetchFailure },
    EvolutionDidLoad { id: u32, stages: Vec<PokemonDetail> },
    EvolutionDidError { id: u32, failure: FetchFailure },
    SpriteDidLoad { id: u32, sprite: SpriteData },
    SpriteDidError { id: u32, error: String },

    BannerDismiss,
    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
