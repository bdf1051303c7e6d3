//! PokeAPI client
//!
//! All network reads live here. Each call is a single outbound request with
//! no retries and no caching; failures come back as strings and stay scoped
//! to the one page or id that asked.

use std::sync::OnceLock;

use serde::Deserialize;

use crate::sanitize::clean_flavor_text;
use crate::state::{CatalogEntry, CatalogPage, DetailRecord, StatValue, PAGE_SIZE};

const API_BASE: &str = "https://pokeapi.co/api/v2";
const SPRITE_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    height: u16,
    weight: u16,
    types: Vec<PokemonTypeSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    stats: Vec<PokemonStatSlot>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct SpeciesResponse {
    flavor_text_entries: Vec<FlavorTextEntry>,
}

#[derive(Clone, Debug, Deserialize)]
struct FlavorTextEntry {
    flavor_text: String,
    language: NamedResource,
}

/// Grid sprite location for an id; derived, never probed.
pub fn sprite_url(id: u32) -> String {
    format!("{SPRITE_BASE}/{id}.png")
}

/// Official artwork location for the detail page.
pub fn artwork_url(id: u32) -> String {
    format!("{SPRITE_BASE}/other/official-artwork/{id}.png")
}

/// Build a page from the listing's name references. The listing carries no
/// ids; the id of the name at ordinal `i` is `page_index * PAGE_SIZE + i + 1`,
/// so a page's ids are contiguous and increase in listing order.
pub fn index_page(page_index: u32, names: Vec<String>) -> CatalogPage {
    let entries = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let id = page_index * PAGE_SIZE + i as u32 + 1;
            (
                id,
                CatalogEntry {
                    id,
                    name,
                    sprite_url: sprite_url(id),
                },
            )
        })
        .collect();
    CatalogPage {
        page_index,
        entries,
    }
}

/// Fetch one listing batch and index it. The result replaces any previously
/// loaded page; the caller never merges.
pub async fn fetch_catalog_page(page_index: u32) -> Result<CatalogPage, String> {
    let offset = page_index * PAGE_SIZE;
    let url = format!("{API_BASE}/pokemon?limit={PAGE_SIZE}&offset={offset}");
    let response: ListResponse = fetch_json(&url).await?;
    let names = response
        .results
        .into_iter()
        .map(|resource| resource.name)
        .collect();
    Ok(index_page(page_index, names))
}

pub async fn fetch_detail(id: u32) -> Result<DetailRecord, String> {
    let url = format!("{API_BASE}/pokemon/{id}/");
    let response: PokemonResponse = fetch_json(&url).await?;

    let types = response
        .types
        .into_iter()
        .map(|slot| slot.type_info.name)
        .collect();
    let abilities = response
        .abilities
        .into_iter()
        .map(|slot| slot.ability.name)
        .collect();
    let stats = response
        .stats
        .into_iter()
        .map(|slot| StatValue {
            name: slot.stat.name,
            value: slot.base_stat,
        })
        .collect();

    Ok(DetailRecord {
        id: response.id,
        name: response.name,
        height: response.height,
        weight: response.weight,
        types,
        abilities,
        stats,
        artwork_url: artwork_url(response.id),
    })
}

/// Fetch the English flavor text for an id, sanitized. `Ok(None)` means the
/// species payload has no English entry; that is not an error.
pub async fn fetch_flavor_text(id: u32) -> Result<Option<String>, String> {
    let url = format!("{API_BASE}/pokemon-species/{id}/");
    let response: SpeciesResponse = fetch_json(&url).await?;
    Ok(response
        .flavor_text_entries
        .iter()
        .find(|entry| entry.language.name == "en")
        .map(|entry| clean_flavor_text(&entry.flavor_text)))
}

async fn fetch_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, String> {
    let response = http_client()
        .get(url)
        .send()
        .await
        .map_err(|err| err.to_string())?;
    let response = response.error_for_status().map_err(|err| err.to_string())?;
    response.json().await.map_err(|err| err.to_string())
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}
