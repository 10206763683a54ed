//! PokeAPI wire DTOs and the domain records derived from them.
//!
//! # Design
//! The `*Dto` types mirror the JSON the API sends and are only used inside
//! `client`. Everything past the parse step works with `PokemonSummary` and
//! `PokemonDetail`, which drop the envelope nesting (`type.name`,
//! `stat.name`, `sprites.front_default`) but keep every value verbatim.

use serde::{Deserialize, Serialize};

/// `GET /pokemon` envelope. Fields other than `results` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonListDto {
    #[serde(default)]
    pub results: Vec<NamedResourceDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedResourceDto {
    pub name: String,
}

/// `GET /pokemon/{name}` payload, restricted to the fields the app shows.
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonDto {
    pub name: String,
    pub height: u32,
    pub weight: u32,
    #[serde(default)]
    pub types: Vec<TypeSlotDto>,
    #[serde(default)]
    pub stats: Vec<StatDto>,
    #[serde(default)]
    pub sprites: SpritesDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlotDto {
    #[serde(rename = "type")]
    pub kind: NamedResourceDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatDto {
    pub base_stat: u32,
    pub effort: u32,
    pub stat: NamedResourceDto,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpritesDto {
    pub front_default: Option<String>,
}

/// One entry of the listing. The name is the key used to fetch the detail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PokemonSummary {
    pub name: String,
}

impl From<String> for PokemonSummary {
    fn from(name: String) -> Self {
        Self { name }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PokemonType {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PokemonStat {
    pub name: String,
    pub base_value: u32,
    pub effort: u32,
}

/// Full record for one Pokémon.
///
/// `height` is in decimetres and `weight` in hectograms, exactly as the API
/// reports them. `types` and `stats` keep server order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PokemonDetail {
    pub name: String,
    pub height: u32,
    pub weight: u32,
    pub types: Vec<PokemonType>,
    pub stats: Vec<PokemonStat>,
    pub sprite: Option<String>,
}

impl From<PokemonDto> for PokemonDetail {
    fn from(dto: PokemonDto) -> Self {
        Self {
            name: dto.name,
            height: dto.height,
            weight: dto.weight,
            types: dto
                .types
                .into_iter()
                .map(|slot| PokemonType {
                    name: slot.kind.name,
                })
                .collect(),
            stats: dto
                .stats
                .into_iter()
                .map(|s| PokemonStat {
                    name: s.stat.name,
                    base_value: s.base_stat,
                    effort: s.effort,
                })
                .collect(),
            sprite: dto.sprites.front_default,
        }
    }
}
