use super::*;

fn entry(street: &str) -> AddressEntry {
    AddressEntry::new(street, [-23.55, -46.63], "S-01", "Centro", None)
}

fn sample_index() -> Vec<AddressEntry> {
    vec![
        entry("Avenida Paulista"),
        entry("Rua Augusta"),
        entry("Avenida São João"),
        entry("Praça da Sé"),
        entry("Rua Paulo Orozimbo"),
        entry("Avenida Brigadeiro Luís Antônio"),
    ]
}

fn streets(results: &[SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.street.as_str()).collect()
}

/// Reference predicate: every token of the normalized query inside the entry.
fn reference_matches(entry: &AddressEntry, raw: &str) -> bool {
    canonical::query_tokens(raw)
        .iter()
        .all(|t| entry.normalized.contains(t.as_str()))
}

#[test]
fn short_queries_return_nothing() {
    let index = sample_index();
    for q in ["", " ", "a", "  a  ", "é", "\t\n"] {
        assert!(query(&index, q).is_empty(), "query {q:?} should be empty");
    }
}

#[test]
fn all_tokens_must_match() {
    let index = sample_index();
    assert_eq!(
        streets(&query(&index, "avenida paulista")),
        vec!["Avenida Paulista"]
    );
    assert_eq!(
        streets(&query(&index, "avenida")),
        vec![
            "Avenida Paulista",
            "Avenida São João",
            "Avenida Brigadeiro Luís Antônio"
        ]
    );
    assert!(query(&index, "avenida augusta").is_empty());
}

#[test]
fn tokens_match_inside_words() {
    let index = sample_index();
    assert_eq!(
        streets(&query(&index, "paul")),
        vec!["Avenida Paulista", "Rua Paulo Orozimbo"]
    );
    assert_eq!(streets(&query(&index, "venid ulist")), vec!["Avenida Paulista"]);
}

#[test]
fn query_is_normalized_like_the_index() {
    let index = sample_index();
    assert_eq!(streets(&query(&index, "SÃO joão")), vec!["Avenida São João"]);
    assert_eq!(streets(&query(&index, "praca, se")), vec!["Praça da Sé"]);
    assert_eq!(
        streets(&query(&index, "luis antonio")),
        vec!["Avenida Brigadeiro Luís Antônio"]
    );
}

#[test]
fn token_order_does_not_matter() {
    let index = sample_index();
    assert_eq!(
        query(&index, "paulista avenida"),
        query(&index, "avenida paulista")
    );
}

#[test]
fn results_are_capped_in_index_order() {
    let index: Vec<AddressEntry> = (0..25).map(|i| entry(&format!("Rua {i}"))).collect();
    let results = query(&index, "rua");
    assert_eq!(results.len(), MAX_RESULTS);
    let expected: Vec<String> = (0..10).map(|i| format!("Rua {i}")).collect();
    assert_eq!(
        results.iter().map(|r| r.street.clone()).collect::<Vec<_>>(),
        expected
    );
}

#[test]
fn soundness_and_completeness_against_reference() {
    let mut index = sample_index();
    index.extend((0..30).map(|i| entry(&format!("Travessa Paulista {i}"))));
    for q in ["av", "paulista", "rua", "ta", "sao", "zz top", "a 1", "sta 2"] {
        let expected: Vec<SearchResult> = index
            .iter()
            .filter(|e| reference_matches(e, q))
            .take(MAX_RESULTS)
            .map(AddressEntry::to_result)
            .collect();
        let got = query(&index, q);
        assert_eq!(got, expected, "mismatch for query {q:?}");
        assert!(got.len() <= MAX_RESULTS);
    }
}

#[test]
fn punctuation_only_query_matches_everything() {
    let index = sample_index();
    assert_eq!(query(&index, "!!").len(), index.len());
}

#[test]
fn projection_omits_normalized_and_nulls_missing_subprefecture() {
    let index = sample_index();
    let results = query(&index, "augusta");
    let json = serde_json::to_value(&results[0]).unwrap();
    assert!(json.get("normalized").is_none());
    assert_eq!(json["logradouro"], "Rua Augusta");
    assert_eq!(json["setor"], "S-01");
    assert_eq!(json.get("subprefeitura"), Some(&serde_json::Value::Null));
}

#[test]
fn blank_persisted_normalized_is_recomputed() {
    let mut e: AddressEntry = serde_json::from_value(serde_json::json!({
        "logradouro": "Rua Vergueiro",
        "centroid": [-23.57, -46.64],
        "setor": "S-09",
        "name": "Vila Mariana",
        "subprefeitura": "Vila Mariana"
    }))
    .unwrap();
    assert!(e.ensure_normalized());
    assert_eq!(e.normalized, "rua vergueiro");
    assert!(!e.ensure_normalized());
}

#[test]
fn label_includes_subprefecture_when_present() {
    let mut e = entry("Rua Augusta").to_result();
    assert_eq!(e.label(), "Rua Augusta");
    e.subprefecture = Some("Sé".into());
    assert_eq!(e.label(), "Rua Augusta (Sé)");
}
