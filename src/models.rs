use serde::Deserialize;

/// `{name, url}` pointer to a detail resource, as every PokeAPI listing
/// returns it.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct NamedRef {
    pub name: String,
    pub url: String,
}

/// First page of `GET /pokemon?limit=N` (also the shape of `GET /type`).
#[derive(Debug, Deserialize)]
pub struct PagedList {
    pub results: Vec<NamedRef>,
}

/// `GET /type/{name}` membership response.
#[derive(Debug, Deserialize)]
pub struct TypeMembers {
    pub pokemon: Vec<TypeMember>,
}

#[derive(Debug, Deserialize)]
pub struct TypeMember {
    pub pokemon: NamedRef,
}

/// `GET /pokemon/{identifier}` detail payload, trimmed to the fields we
/// render.
#[derive(Debug, Deserialize)]
pub struct PokemonDetail {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    // null for some newer entries in the live API
    #[serde(default)]
    pub base_experience: Option<u32>,
    pub sprites: Sprites,
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
    #[serde(default)]
    pub moves: Vec<MoveSlot>,
    pub species: NamedRef,
}

#[derive(Debug, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub type_ref: NamedRef,
}

#[derive(Debug, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedRef,
}

#[derive(Debug, Deserialize)]
pub struct StatSlot {
    pub base_stat: u32,
    pub stat: NamedRef,
}

#[derive(Debug, Deserialize)]
pub struct MoveSlot {
    #[serde(rename = "move")]
    pub move_ref: NamedRef,
}

#[derive(Debug, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<ArtworkSprite>,
}

#[derive(Debug, Deserialize)]
pub struct ArtworkSprite {
    #[serde(default)]
    pub front_default: Option<String>,
}

/// `GET {species.url}` payload.
#[derive(Debug, Deserialize)]
pub struct Species {
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorTextEntry>,
    #[serde(default)]
    pub evolution_chain: Option<UrlRef>,
}

#[derive(Debug, Deserialize)]
pub struct FlavorTextEntry {
    pub flavor_text: String,
    pub language: NamedRef,
}

#[derive(Debug, Deserialize)]
pub struct UrlRef {
    pub url: String,
}

/// `GET {evolution_chain.url}` payload. Each node may branch into several
/// successor species.
#[derive(Debug, Deserialize)]
pub struct EvolutionChain {
    pub chain: ChainLink,
}

#[derive(Debug, Deserialize)]
pub struct ChainLink {
    pub species: NamedRef,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

/// Minimal display record for the gallery list. Rebuilt on every load;
/// `name` doubles as the de-duplication key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub name: String,
    pub id: u32,
    /// Type names in the API's slot order.
    pub types: Vec<String>,
}

impl From<PokemonDetail> for Summary {
    fn from(detail: PokemonDetail) -> Self {
        Summary {
            name: detail.name,
            id: detail.id,
            types: detail.types.into_iter().map(|t| t.type_ref.name).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatValue {
    pub name: String,
    pub base: u32,
}

/// Everything the detail overlay renders, flattened out of the three
/// responses it is assembled from. Discarded when the overlay closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub name: String,
    pub id: u32,
    pub artwork_url: Option<String>,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub height: u32,
    pub weight: u32,
    pub base_experience: u32,
    pub stats: Vec<StatValue>,
    pub flavor: String,
    /// Stage names from the root species down, first branch only.
    pub evolution_stages: Vec<String>,
    /// First few moves, a sample rather than the full list.
    pub moves: Vec<String>,
}
