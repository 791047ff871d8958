//! PokeAPI client: collection aggregation and detail assembly.

use futures::future;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::models::{
    ChainLink, DetailView, EvolutionChain, PagedList, PokemonDetail, Species, StatValue, Summary,
    TypeMembers,
};

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Page size for the unfiltered gallery. Only the first page is ever
/// fetched.
pub const DEFAULT_LIST_LIMIT: usize = 151;

/// Upper bound on the per-type fan-out; type membership lists are truncated
/// to this many entries before detail requests go out.
pub const TYPE_MEMBER_CAP: usize = 200;

/// Shown when a species has no English flavor text.
pub const NO_DESCRIPTION: &str = "No description available.";

/// How many moves the detail view samples from the full move list.
pub const MOVE_SAMPLE: usize = 10;

/// HTTP client for the PokeAPI. Cheap to clone; all requests share one
/// connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at a different server (tests use this with a mock).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Client {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| ApiError::Parse {
            url: url.to_string(),
            source,
        })
    }

    /// Type names for the navigation tabs, in API order.
    pub async fn type_names(&self) -> Result<Vec<String>, ApiError> {
        let url = format!("{}/type", self.base_url);
        let listing: PagedList = self.get_json(&url).await?;
        Ok(listing.results.into_iter().map(|r| r.name).collect())
    }

    /// Load the gallery collection.
    ///
    /// With a type filter the refs come from the type-membership resource
    /// (truncated to [`TYPE_MEMBER_CAP`]); otherwise from the first page of
    /// the paginated list. One detail request per ref is then issued, all
    /// concurrently, and the batch fails as a whole if any single request
    /// fails — no partial results, no retry.
    pub async fn load_collection(
        &self,
        type_filter: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Summary>, ApiError> {
        let refs = match type_filter {
            Some(t) => {
                let url = format!("{}/type/{}", self.base_url, t);
                let members: TypeMembers = self.get_json(&url).await?;
                members
                    .pokemon
                    .into_iter()
                    .take(TYPE_MEMBER_CAP)
                    .map(|m| m.pokemon)
                    .collect::<Vec<_>>()
            }
            None => {
                let url = format!("{}/pokemon?limit={}", self.base_url, limit);
                let page: PagedList = self.get_json(&url).await?;
                page.results
            }
        };

        tracing::debug!(count = refs.len(), ?type_filter, "fanning out detail requests");
        let details: Vec<PokemonDetail> =
            future::try_join_all(refs.iter().map(|r| self.get_json(&r.url))).await?;

        Ok(details.into_iter().map(Summary::from).collect())
    }

    /// Assemble the detail view for one identifier (name or id).
    ///
    /// The three fetches are sequential: species needs the URL from the
    /// detail payload, the evolution chain needs the URL from the species
    /// payload. A species without an evolution chain yields empty stages,
    /// not an error.
    pub async fn load_detail(&self, identifier: &str) -> Result<DetailView, ApiError> {
        let url = format!("{}/pokemon/{}", self.base_url, identifier);
        let detail: PokemonDetail = match self.get_json(&url).await {
            Err(ApiError::Status { status, .. }) if status == reqwest::StatusCode::NOT_FOUND => {
                return Err(ApiError::NotFound {
                    identifier: identifier.to_string(),
                })
            }
            other => other?,
        };

        let species: Species = self.get_json(&detail.species.url).await?;

        let evolution_stages = match &species.evolution_chain {
            Some(chain_ref) => {
                let chain: EvolutionChain = self.get_json(&chain_ref.url).await?;
                flatten_evolution(&chain.chain)
            }
            None => Vec::new(),
        };

        tracing::debug!(name = %detail.name, stages = evolution_stages.len(), "assembled detail view");
        Ok(assemble_view(detail, &species, evolution_stages))
    }

    /// Fetch raw image bytes (artwork). Used for the in-terminal artwork
    /// pane; callers treat failure as "no image", never as a detail error.
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                url: url.to_string(),
                status,
            });
        }
        let bytes = response.bytes().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten an evolution chain into stage names, root first.
///
/// Only the first entry of `evolves_to` is followed at each node; alternate
/// branches are dropped.
pub fn flatten_evolution(chain: &ChainLink) -> Vec<String> {
    let mut stages = Vec::new();
    let mut node = Some(chain);
    while let Some(link) = node {
        stages.push(link.species.name.clone());
        node = link.evolves_to.first();
    }
    stages
}

fn assemble_view(detail: PokemonDetail, species: &Species, evolution_stages: Vec<String>) -> DetailView {
    DetailView {
        artwork_url: artwork_url(&detail),
        flavor: english_flavor(species),
        name: detail.name,
        id: detail.id,
        types: detail.types.into_iter().map(|t| t.type_ref.name).collect(),
        abilities: detail
            .abilities
            .into_iter()
            .map(|a| a.ability.name)
            .collect(),
        height: detail.height,
        weight: detail.weight,
        base_experience: detail.base_experience.unwrap_or(0),
        stats: detail
            .stats
            .into_iter()
            .map(|s| StatValue {
                name: s.stat.name,
                base: s.base_stat,
            })
            .collect(),
        evolution_stages,
        moves: detail
            .moves
            .into_iter()
            .take(MOVE_SAMPLE)
            .map(|m| m.move_ref.name)
            .collect(),
    }
}

/// Official artwork when present, else the plain front sprite.
fn artwork_url(detail: &PokemonDetail) -> Option<String> {
    detail
        .sprites
        .other
        .as_ref()
        .and_then(|o| o.official_artwork.as_ref())
        .and_then(|a| a.front_default.clone())
        .or_else(|| detail.sprites.front_default.clone())
}

/// First English flavor text with line and form-feed breaks normalized to
/// spaces.
fn english_flavor(species: &Species) -> String {
    species
        .flavor_text_entries
        .iter()
        .find(|e| e.language.name == "en")
        .map(|e| e.flavor_text.replace('\n', " ").replace('\u{c}', " "))
        .unwrap_or_else(|| NO_DESCRIPTION.to_string())
}
