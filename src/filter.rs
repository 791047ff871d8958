//! Pure visibility filtering over the loaded collection.
//!
//! No I/O happens here: the gallery hands in everything it loaded plus the
//! active type tab and search query, and gets back the subset to draw.

use crate::models::Summary;

/// Compute the visible subset of `all` under an optional type filter and an
/// optional free-text query.
///
/// The type filter keeps records whose types contain the selected type.
/// When the collection was already loaded type-scoped this pass is
/// redundant, but it never excludes anything extra. The query (trimmed,
/// lowercased; empty counts as unset) matches as a substring of the name or
/// of any type; name matches come first, then type-only matches, with
/// duplicates removed by name in first-seen order.
pub fn compute_visible(
    all: &[Summary],
    type_filter: Option<&str>,
    query: Option<&str>,
) -> Vec<Summary> {
    let mut result: Vec<Summary> = all.to_vec();

    if let Some(t) = type_filter {
        result.retain(|r| r.types.iter().any(|ty| ty == t));
    }

    let query = query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());
    if let Some(q) = query {
        let by_name = result
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&q));
        let by_type = result
            .iter()
            .filter(|r| r.types.iter().any(|t| t.to_lowercase().contains(&q)));

        let mut merged: Vec<Summary> = Vec::new();
        for r in by_name.chain(by_type) {
            if !merged.iter().any(|m| m.name == r.name) {
                merged.push(r.clone());
            }
        }
        result = merged;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, id: u32, types: &[&str]) -> Summary {
        Summary {
            name: name.to_string(),
            id,
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn sample() -> Vec<Summary> {
        vec![
            record("charmander", 4, &["fire"]),
            record("pidgey", 16, &["normal", "flying"]),
            record("bulbasaur", 1, &["grass", "poison"]),
        ]
    }

    #[test]
    fn no_filters_is_identity() {
        let all = sample();
        assert_eq!(compute_visible(&all, None, None), all);
    }

    #[test]
    fn empty_and_whitespace_queries_are_identity() {
        let all = sample();
        assert_eq!(compute_visible(&all, None, Some("")), all);
        assert_eq!(compute_visible(&all, None, Some("   ")), all);
    }

    #[test]
    fn type_filter_keeps_only_members() {
        let all = sample();
        let visible = compute_visible(&all, Some("flying"), None);
        assert_eq!(visible.len(), 1);
        assert!(visible.iter().all(|r| r.types.iter().any(|t| t == "flying")));
    }

    #[test]
    fn query_matches_name_or_type_case_insensitively() {
        let all = sample();
        for r in compute_visible(&all, None, Some("GRAS")) {
            let q = "gras";
            assert!(
                r.name.to_lowercase().contains(q)
                    || r.types.iter().any(|t| t.to_lowercase().contains(q))
            );
        }
        assert_eq!(
            compute_visible(&all, None, Some("CHARM")),
            vec![record("charmander", 4, &["fire"])]
        );
    }

    #[test]
    fn filtering_is_idempotent() {
        let all = sample();
        let once = compute_visible(&all, Some("flying"), Some("fly"));
        let twice = compute_visible(&once, Some("flying"), Some("fly"));
        assert_eq!(once, twice);
    }

    #[test]
    fn name_and_type_matches_are_deduplicated() {
        // "fire" hits both the name and the type branch for this record.
        let all = vec![
            record("firefly", 99, &["fire", "bug"]),
            record("squirtle", 7, &["water"]),
        ];
        let visible = compute_visible(&all, None, Some("fire"));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "firefly");
    }

    #[test]
    fn name_matches_come_before_type_only_matches() {
        let all = vec![
            record("gyarados", 130, &["water", "flying"]),
            record("flygon", 330, &["ground", "dragon"]),
        ];
        let visible = compute_visible(&all, None, Some("fly"));
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].name, "flygon");
        assert_eq!(visible[1].name, "gyarados");
    }

    #[test]
    fn three_item_page_query_fly() {
        let all = vec![
            record("a", 1, &["fire"]),
            record("b", 2, &["water", "flying"]),
            record("c", 3, &["grass"]),
        ];
        let visible = compute_visible(&all, None, Some("fly"));
        assert_eq!(visible, vec![record("b", 2, &["water", "flying"])]);
    }

    #[test]
    fn type_filter_and_query_compose() {
        let all = sample();
        // Aggregation already scoped to "flying" members; the redundant
        // type pass must not drop anything the query keeps.
        let scoped = compute_visible(&all, Some("flying"), None);
        let visible = compute_visible(&scoped, Some("flying"), Some("pid"));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "pidgey");
    }
}
