#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadRoster,
    /// Details for one page, tagged with the grid generation that asked.
    LoadPage {
        generation: u64,
        start: usize,
        ids: Vec<u32>,
    },
    LoadDetail { id: u32 },
    LoadSearchResult { id: u32 },
    LoadEvolution { id: u32 },
    LoadSprite { id: u32, url: String },
}
