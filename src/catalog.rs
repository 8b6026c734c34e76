//! The service the effect handler talks to: HTTP client plus detail cache.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::api::{ApiError, PokeApi, SpeciesRecord, DEFAULT_API_BASE};
use crate::cache::{DetailCache, DetailSource};
use crate::evolution::{first_branch, EvolutionNode};
use crate::sprite::{decode_sprite, SpriteData};
use crate::state::{PokemonDetail, RosterEntry, ROSTER_LIMIT};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    pub api_base: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// Everything the catalog fetches besides single pokemon records.
#[async_trait]
pub trait CatalogSource: DetailSource {
    async fn fetch_roster(&self, limit: usize) -> Result<Vec<RosterEntry>, ApiError>;
    async fn fetch_species(&self, id: u32) -> Result<SpeciesRecord, ApiError>;
    async fn fetch_evolution_chain(&self, url: &str) -> Result<EvolutionNode, ApiError>;
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError>;
}

#[async_trait]
impl CatalogSource for PokeApi {
    async fn fetch_roster(&self, limit: usize) -> Result<Vec<RosterEntry>, ApiError> {
        PokeApi::fetch_roster(self, limit).await
    }

    async fn fetch_species(&self, id: u32) -> Result<SpeciesRecord, ApiError> {
        PokeApi::fetch_species(self, id).await
    }

    async fn fetch_evolution_chain(&self, url: &str) -> Result<EvolutionNode, ApiError> {
        PokeApi::fetch_evolution_chain(self, url).await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        PokeApi::fetch_bytes(self, url).await
    }
}

pub struct Catalog<S = PokeApi> {
    details: DetailCache<S>,
}

impl Catalog<PokeApi> {
    pub fn new(config: &CatalogConfig) -> Self {
        Self::with_source(PokeApi::new(config.api_base.as_str()))
    }
}

impl<S: CatalogSource> Catalog<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            details: DetailCache::new(source),
        }
    }

    pub fn source(&self) -> &S {
        self.details.source()
    }

    pub fn details(&self) -> &DetailCache<S> {
        &self.details
    }

    pub async fn roster(&self) -> Result<Vec<RosterEntry>, ApiError> {
        let mut roster = self.source().fetch_roster(ROSTER_LIMIT).await?;
        roster.truncate(ROSTER_LIMIT);
        info!(entries = roster.len(), "roster loaded");
        Ok(roster)
    }

    pub async fn detail(&self, key: &str) -> Result<PokemonDetail, ApiError> {
        self.details.get(key).await
    }

    /// Resolves one page in order, one request at a time.
    pub async fn page(&self, ids: &[u32]) -> Result<Vec<PokemonDetail>, ApiError> {
        let mut details = Vec::with_capacity(ids.len());
        for id in ids {
            details.push(self.details.get(&id.to_string()).await?);
        }
        debug!(count = details.len(), "page resolved");
        Ok(details)
    }

    /// Species, then its evolution chain, then a detail for every stage on
    /// the first branch.
    pub async fn evolution(&self, id: u32) -> Result<Vec<PokemonDetail>, ApiError> {
        let species = self.source().fetch_species(id).await?;
        let names = match species.evolution_chain_url {
            Some(url) => first_branch(&self.source().fetch_evolution_chain(&url).await?),
            None => vec![species.name],
        };
        debug!(id, stages = ?names, "evolution chain walked");
        let mut stages = Vec::with_capacity(names.len());
        for name in &names {
            stages.push(self.details.get(name).await?);
        }
        Ok(stages)
    }

    pub async fn sprite(&self, url: &str) -> Result<SpriteData, ApiError> {
        let bytes = self.source().fetch_bytes(url).await?;
        let sprite = tokio::task::spawn_blocking(move || decode_sprite(&bytes)).await??;
        Ok(sprite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CHAIN_URL: &str = "https://pokeapi.co/api/v2/evolution-chain/";

    #[derive(Default)]
    struct FakeSource {
        pokemon: Vec<PokemonDetail>,
        species: HashMap<u32, SpeciesRecord>,
        chains: HashMap<String, EvolutionNode>,
        detail_calls: AtomicUsize,
    }

    impl FakeSource {
        fn with_pokemon(mut self, id: u32, name: &str) -> Self {
            self.pokemon.push(PokemonDetail {
                id,
                name: name.to_string(),
                types: vec!["normal".into()],
                stats: Vec::new(),
                abilities: Vec::new(),
                height: 1,
                weight: 1,
                artwork_url: None,
                sprite_url: None,
            });
            self
        }

        fn with_species(mut self, id: u32, name: &str, chain: Option<EvolutionNode>) -> Self {
            let evolution_chain_url = chain.map(|chain| {
                let url = format!("{CHAIN_URL}{id}/");
                self.chains.insert(url.clone(), chain);
                url
            });
            self.species.insert(
                id,
                SpeciesRecord {
                    name: name.to_string(),
                    evolution_chain_url,
                },
            );
            self
        }

        fn detail_calls(&self) -> usize {
            self.detail_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DetailSource for FakeSource {
        async fn fetch_detail(&self, key: &str) -> Result<PokemonDetail, ApiError> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            self.pokemon
                .iter()
                .find(|detail| detail.name == key || detail.id.to_string() == key)
                .cloned()
                .ok_or_else(|| ApiError::NotFound(key.to_string()))
        }
    }

    #[async_trait]
    impl CatalogSource for FakeSource {
        async fn fetch_roster(&self, limit: usize) -> Result<Vec<RosterEntry>, ApiError> {
            Ok(self
                .pokemon
                .iter()
                .take(limit)
                .map(|detail| RosterEntry {
                    id: detail.id,
                    name: detail.name.clone(),
                    url: String::new(),
                })
                .collect())
        }

        async fn fetch_species(&self, id: u32) -> Result<SpeciesRecord, ApiError> {
            self.species
                .get(&id)
                .cloned()
                .ok_or_else(|| ApiError::NotFound(format!("species {id}")))
        }

        async fn fetch_evolution_chain(&self, url: &str) -> Result<EvolutionNode, ApiError> {
            self.chains
                .get(url)
                .cloned()
                .ok_or_else(|| ApiError::NotFound(url.to_string()))
        }

        async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
            Err(ApiError::NotFound(url.to_string()))
        }
    }

    fn names(details: &[PokemonDetail]) -> Vec<&str> {
        details.iter().map(|detail| detail.name.as_str()).collect()
    }

    fn starters() -> FakeSource {
        FakeSource::default()
            .with_pokemon(1, "bulbasaur")
            .with_pokemon(2, "ivysaur")
            .with_pokemon(3, "venusaur")
            .with_species(
                1,
                "bulbasaur",
                Some(
                    EvolutionNode::leaf("bulbasaur").with_next(
                        EvolutionNode::leaf("ivysaur").with_next(EvolutionNode::leaf("venusaur")),
                    ),
                ),
            )
    }

    #[tokio::test]
    async fn test_page_keeps_requested_order() {
        let catalog = Catalog::with_source(starters());

        let page = catalog.page(&[3, 1, 2]).await.unwrap();

        assert_eq!(names(&page), vec!["venusaur", "bulbasaur", "ivysaur"]);
    }

    #[tokio::test]
    async fn test_page_fails_on_missing_record() {
        let catalog = Catalog::with_source(starters());

        let result = catalog.page(&[1, 99]).await;

        assert!(matches!(result, Err(ApiError::NotFound(key)) if key == "99"));
    }

    #[tokio::test]
    async fn test_evolution_walks_species_then_chain() {
        let catalog = Catalog::with_source(starters());
        catalog.page(&[1]).await.unwrap();

        let stages = catalog.evolution(1).await.unwrap();

        assert_eq!(names(&stages), vec!["bulbasaur", "ivysaur", "venusaur"]);
        // bulbasaur came from the page fetch, aliased by name.
        assert_eq!(catalog.source().detail_calls(), 3);
    }

    #[tokio::test]
    async fn test_species_without_chain_yields_itself() {
        let source = FakeSource::default()
            .with_pokemon(132, "ditto")
            .with_species(132, "ditto", None);
        let catalog = Catalog::with_source(source);

        let stages = catalog.evolution(132).await.unwrap();

        assert_eq!(names(&stages), vec!["ditto"]);
    }

    #[tokio::test]
    async fn test_branching_chain_follows_first_branch() {
        let source = FakeSource::default()
            .with_pokemon(133, "eevee")
            .with_pokemon(134, "vaporeon")
            .with_pokemon(135, "jolteon")
            .with_species(
                133,
                "eevee",
                Some(
                    EvolutionNode::leaf("eevee")
                        .with_next(EvolutionNode::leaf("vaporeon"))
                        .with_next(EvolutionNode::leaf("jolteon")),
                ),
            );
        let catalog = Catalog::with_source(source);

        let stages = catalog.evolution(133).await.unwrap();

        assert_eq!(names(&stages), vec!["eevee", "vaporeon"]);
        assert!(catalog.details().peek("jolteon").is_none());
    }

    #[tokio::test]
    async fn test_roster_is_capped() {
        let source = (1..=160).fold(FakeSource::default(), |source, id| {
            source.with_pokemon(id, &format!("mon{id}"))
        });
        let catalog = Catalog::with_source(source);

        let roster = catalog.roster().await.unwrap();

        assert_eq!(roster.len(), ROSTER_LIMIT);
        assert_eq!(roster[0].name, "mon1");
    }
}
