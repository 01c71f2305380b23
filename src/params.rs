//! Shareable view-parameter string.
//!
//! The TUI has no address bar, so the current view is encoded into a compact
//! query string shown in the footer and accepted back via `--view`. Defaults
//! are omitted so the string is empty for the default view.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::view::{SortDirection, SortKey};

/// Parsed view parameters, all optional pieces resolved to defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ViewParams {
    pub query: String,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    pub pokemon_id: Option<u16>,
}

/// Encode the current view, omitting values equal to the defaults
/// (empty query, sort by id, ascending).
pub fn encode(
    query: &str,
    sort_key: SortKey,
    sort_direction: SortDirection,
    pokemon_id: Option<u16>,
) -> String {
    let mut parts: Vec<String> = Vec::new();
    if !query.is_empty() {
        parts.push(format!("query={}", urlencoding::encode(query)));
    }
    if sort_key != SortKey::Id {
        parts.push(format!("sort={}", sort_key.as_param()));
    }
    if sort_direction != SortDirection::Asc {
        parts.push(format!("order={}", sort_direction.as_param()));
    }
    if let Some(id) = pokemon_id {
        parts.push(format!("pokemonId={id}"));
    }
    parts.join("&")
}

/// Parse a parameter string produced by [`encode`]. Unknown keys and
/// malformed values fall back to the defaults.
pub fn parse(input: &str) -> ViewParams {
    let mut params = ViewParams::default();
    let input = input.strip_prefix('?').unwrap_or(input);
    for pair in input.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let Ok(value) = urlencoding::decode(value) else {
            continue;
        };
        match key {
            "query" => params.query = value.into_owned(),
            "sort" => {
                if let Some(sort_key) = SortKey::parse(&value) {
                    params.sort_key = sort_key;
                }
            }
            "order" => {
                if let Some(direction) = SortDirection::parse(&value) {
                    params.sort_direction = direction;
                }
            }
            "pokemonId" => params.pokemon_id = value.parse().ok(),
            _ => {}
        }
    }
    params
}
