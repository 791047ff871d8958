//! Shared JSON builders for the PokeAPI mock responses.
//
// Each integration test binary compiles its own copy, so not every helper
// is used from every file.
#![allow(dead_code)]

use serde_json::{json, Value};

/// Minimal `GET /pokemon/{name}` payload for collection tests: just enough
/// for the summary projection.
pub fn pokemon_detail(base: &str, id: u64, name: &str, types: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "height": 7,
        "weight": 69,
        "base_experience": 64,
        "sprites": { "front_default": null },
        "types": type_slots(base, types),
        "abilities": [],
        "stats": [],
        "moves": [],
        "species": { "name": name, "url": format!("{}/pokemon-species/{}", base, name) }
    })
}

pub fn type_slots(base: &str, types: &[&str]) -> Value {
    Value::Array(
        types
            .iter()
            .enumerate()
            .map(|(i, t)| {
                json!({
                    "slot": i + 1,
                    "type": { "name": t, "url": format!("{}/type/{}", base, t) }
                })
            })
            .collect(),
    )
}

/// `GET /pokemon?limit=N` page whose refs point back at the mock server.
pub fn list_page(base: &str, names: &[&str]) -> Value {
    json!({
        "count": names.len(),
        "results": names
            .iter()
            .map(|n| json!({ "name": n, "url": format!("{}/pokemon/{}", base, n) }))
            .collect::<Vec<_>>()
    })
}

/// `GET /type/{name}` membership whose refs point back at the mock server.
pub fn type_members(base: &str, names: &[String]) -> Value {
    json!({
        "pokemon": names
            .iter()
            .map(|n| json!({
                "pokemon": { "name": n, "url": format!("{}/pokemon/{}", base, n) },
                "slot": 1
            }))
            .collect::<Vec<_>>()
    })
}

pub fn chain_link(name: &str, evolves_to: Value) -> Value {
    json!({
        "species": { "name": name, "url": format!("https://pokeapi.co/api/v2/pokemon-species/{}", name) },
        "evolves_to": evolves_to
    })
}
