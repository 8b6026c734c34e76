//! PokeAPI client.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::evolution::EvolutionNode;
use crate::state::{FailureKind, FetchFailure, PokemonDetail, PokemonStat, RosterEntry};

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("response parse error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("unexpected resource url: {0}")]
    BadUrl(String),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::NotFound(_) => FailureKind::NotFound,
            ApiError::Request(_) => FailureKind::Network,
            ApiError::Decode(_)
            | ApiError::Image(_)
            | ApiError::BadUrl(_)
            | ApiError::Task(_) => FailureKind::Decode,
        }
    }
}

impl From<&ApiError> for FetchFailure {
    fn from(error: &ApiError) -> Self {
        FetchFailure::new(error.kind(), error.to_string())
    }
}

impl From<ApiError> for FetchFailure {
    fn from(error: ApiError) -> Self {
        FetchFailure::from(&error)
    }
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    height: u32,
    weight: u32,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct SpeciesResponse {
    name: String,
    evolution_chain: Option<ApiResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct ApiResource {
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct EvolutionChainResponse {
    chain: ChainLink,
}

#[derive(Clone, Debug, Deserialize)]
struct ChainLink {
    species: NamedResource,
    evolves_to: Vec<ChainLink>,
}

impl From<ChainLink> for EvolutionNode {
    fn from(link: ChainLink) -> Self {
        EvolutionNode {
            species: link.species.name,
            evolves_to: link.evolves_to.into_iter().map(EvolutionNode::from).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesRecord {
    pub name: String,
    pub evolution_chain_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct PokeApi {
    base: String,
    client: reqwest::Client,
}

impl Default for PokeApi {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl PokeApi {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Self {
            base,
            client: reqwest::Client::new(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub async fn fetch_roster(&self, limit: usize) -> Result<Vec<RosterEntry>, ApiError> {
        let url = format!("{}/pokemon?limit={limit}", self.base);
        let response: ListResponse = self.fetch_json(&url).await?;
        roster_from_response(response)
    }

    pub async fn fetch_pokemon(&self, id_or_name: &str) -> Result<PokemonDetail, ApiError> {
        let url = format!("{}/pokemon/{id_or_name}", self.base);
        let response: PokemonResponse = self.fetch_json(&url).await?;
        Ok(detail_from_response(response))
    }

    pub async fn fetch_species(&self, id: u32) -> Result<SpeciesRecord, ApiError> {
        let url = format!("{}/pokemon-species/{id}", self.base);
        let response: SpeciesResponse = self.fetch_json(&url).await?;
        Ok(SpeciesRecord {
            name: response.name,
            evolution_chain_url: response.evolution_chain.map(|chain| chain.url),
        })
    }

    pub async fn fetch_evolution_chain(&self, url: &str) -> Result<EvolutionNode, ApiError> {
        let response: EvolutionChainResponse = self.fetch_json(url).await?;
        Ok(response.chain.into())
    }

    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            warn!(%url, "resource not found");
            return Err(ApiError::NotFound(url.to_string()));
        }
        let response = response.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let bytes = self.fetch_bytes(url).await?;
        serde_json::from_slice(&bytes).map_err(|err| {
            warn!(%url, error = %err, "malformed response body");
            ApiError::Decode(err)
        })
    }
}

/// Numeric id from the last path segment of a resource url.
pub fn id_from_url(url: &str) -> Option<u32> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

fn roster_from_response(response: ListResponse) -> Result<Vec<RosterEntry>, ApiError> {
    response
        .results
        .into_iter()
        .map(|entry| {
            let id = id_from_url(&entry.url).ok_or_else(|| ApiError::BadUrl(entry.url.clone()))?;
            Ok(RosterEntry {
                id,
                name: entry.name,
                url: entry.url,
            })
        })
        .collect()
}

fn detail_from_response(response: PokemonResponse) -> PokemonDetail {
    let types = response
        .types
        .into_iter()
        .map(|slot| slot.type_info.name)
        .collect();
    let stats = response
        .stats
        .into_iter()
        .map(|slot| PokemonStat {
            name: slot.stat.name,
            base_stat: slot.base_stat,
        })
        .collect();
    let abilities = response
        .abilities
        .into_iter()
        .map(|slot| slot.ability.name)
        .collect();

    PokemonDetail {
        id: response.id,
        name: response.name,
        types,
        stats,
        abilities,
        height: response.height,
        weight: response.weight,
        artwork_url: pointer_string(&response.sprites, "/other/official-artwork/front_default"),
        sprite_url: pointer_string(&response.sprites, "/front_default"),
    }
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}
