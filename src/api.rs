//! PokeAPI client.
//!
//! All fetch functions return `Result<T, String>`; errors are surfaced by the
//! reducer as status messages.

use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::format::format_id;
use crate::state::{CatalogueEntry, DetailedEntity, EntityStat, FullDetail, SpeciesInfo};

const API_BASE: &str = "https://pokeapi.co/api/v2";
const HYDRATE_CONCURRENCY: usize = 12;

/// Shown when an entity has no sprite URL.
pub const ARTWORK_PLACEHOLDER: &str = "/pokemon-placeholder.png";

/// Official artwork on the pokemon.com CDN, keyed by the padded dex number.
pub fn artwork_url(id: u16) -> String {
    format!(
        "https://assets.pokemon.com/assets/cms2/img/pokedex/full/{}.png",
        format_id(id)
    )
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct CountResponse {
    count: u32,
}

#[derive(Clone, Debug, Deserialize)]
struct IndexResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u16,
    name: String,
    height: u16,
    weight: u16,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct SpeciesResponse {
    genera: Vec<GenusEntry>,
    generation: NamedResource,
    gender_rate: i8,
}

#[derive(Clone, Debug, Deserialize)]
struct GenusEntry {
    genus: String,
    language: NamedResource,
}

/// Fetch the full catalogue index: one request for the count, one for the
/// whole list. Ids come from the trailing URL segment.
pub async fn fetch_catalogue() -> Result<Vec<CatalogueEntry>, String> {
    let count: CountResponse = fetch_json(&format!("{API_BASE}/pokemon")).await?;
    let index: IndexResponse =
        fetch_json(&format!("{API_BASE}/pokemon?limit={}", count.count)).await?;
    Ok(index
        .results
        .into_iter()
        .map(|resource| CatalogueEntry {
            id: id_from_url(&resource.url),
            name: resource.name,
        })
        .collect())
}

/// Fetch just the type names of one entity.
pub async fn fetch_entity_types(id: u16) -> Result<Vec<String>, String> {
    let response: PokemonResponse = fetch_json(&format!("{API_BASE}/pokemon/{id}")).await?;
    Ok(type_names(response.types))
}

/// Hydrate a batch of entries with their types, preserving the input order.
/// All-or-nothing: any failed entry fails the whole batch.
pub async fn hydrate_batch(entries: &[CatalogueEntry]) -> Result<Vec<DetailedEntity>, String> {
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let semaphore = Arc::new(Semaphore::new(HYDRATE_CONCURRENCY));
    let mut join_set = JoinSet::new();
    for (index, entry) in entries.iter().enumerate() {
        let entry = entry.clone();
        let semaphore = semaphore.clone();
        join_set.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| "Hydration semaphore closed".to_string())?;
            let types = fetch_entity_types(entry.id).await?;
            Ok::<_, String>((
                index,
                DetailedEntity {
                    id: entry.id,
                    name: entry.name,
                    types,
                },
            ))
        });
    }

    let mut slots: Vec<Option<DetailedEntity>> = vec![None; entries.len()];
    while let Some(result) = join_set.join_next().await {
        match result {
            Ok(Ok((index, entity))) => slots[index] = Some(entity),
            Ok(Err(err)) => return Err(err),
            Err(err) => return Err(err.to_string()),
        }
    }

    Ok(slots.into_iter().flatten().collect())
}

/// Fetch the overlay detail payload for one entity.
pub async fn fetch_full_detail(id: u16) -> Result<FullDetail, String> {
    let response: PokemonResponse = fetch_json(&format!("{API_BASE}/pokemon/{id}")).await?;
    let sprite = pointer_string(&response.sprites, "/front_default");
    Ok(FullDetail {
        id: response.id,
        name: response.name,
        types: type_names(response.types),
        height: response.height,
        weight: response.weight,
        stats: response
            .stats
            .into_iter()
            .map(|slot| EntityStat {
                name: slot.stat.name,
                value: slot.base_stat,
            })
            .collect(),
        sprite,
    })
}

/// Fetch species flavour data: English genus, generation, gender rate.
pub async fn fetch_species(id: u16) -> Result<SpeciesInfo, String> {
    let response: SpeciesResponse =
        fetch_json(&format!("{API_BASE}/pokemon-species/{id}")).await?;
    let genus = response
        .genera
        .into_iter()
        .find(|entry| entry.language.name == "en")
        .map(|entry| entry.genus);
    Ok(SpeciesInfo {
        genus,
        generation: response.generation.name,
        gender_rate: response.gender_rate,
    })
}

async fn fetch_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, String> {
    let response = http_client()
        .get(url)
        .send()
        .await
        .map_err(|err| err.to_string())?;
    let response = response.error_for_status().map_err(|err| err.to_string())?;
    response.json::<T>().await.map_err(|err| err.to_string())
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

fn type_names(slots: Vec<PokemonTypeSlot>) -> Vec<String> {
    slots.into_iter().map(|slot| slot.type_info.name).collect()
}

fn id_from_url(url: &str) -> u16 {
    url.trim_end_matches('/')
        .split('/')
        .last()
        .and_then(|segment| segment.parse().ok())
        .unwrap_or(0)
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_url() {
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/25/"), 25);
        assert_eq!(id_from_url("https://pokeapi.co/api/v2/pokemon/150"), 150);
        assert_eq!(id_from_url("not-a-url"), 0);
    }

    #[test]
    fn test_artwork_url_pads_id() {
        assert_eq!(
            artwork_url(7),
            "https://assets.pokemon.com/assets/cms2/img/pokedex/full/007.png"
        );
        assert_eq!(
            artwork_url(150),
            "https://assets.pokemon.com/assets/cms2/img/pokedex/full/150.png"
        );
    }

    #[test]
    fn test_pointer_string() {
        let value = serde_json::json!({ "front_default": "http://img/25.png" });
        assert_eq!(
            pointer_string(&value, "/front_default"),
            Some("http://img/25.png".to_string())
        );
        assert_eq!(pointer_string(&value, "/back_default"), None);
    }
}
