use anyhow::Result;
use httpmock::prelude::*;
use local_wildlife::config::toml_config::InatConfig;
use local_wildlife::domain::ports::ObservationSource;
use local_wildlife::{normalize, INatClient, SpeciesListing, TaxonGroup, WildlifeError};
use serde_json::json;
use std::time::Duration;

fn client_for(server: &MockServer) -> INatClient {
    let config = InatConfig {
        base_url: server.url("/v1"),
        timeout_seconds: 5,
        per_page: None,
    };
    INatClient::new(&config).unwrap()
}

/// 自動完成結果只保留有面積的地點，並維持 API 的排序
#[tokio::test]
async fn test_resolve_locations_filters_points_and_keeps_order() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/places/autocomplete")
            .query_param("q", "City of Austin")
            .query_param("order_by", "area");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "total_results": 4,
                "page": 1,
                "per_page": 10,
                "results": [
                    {
                        "id": 1,
                        "name": "Austin",
                        "display_name": "Austin, TX, US",
                        "place_type": 9,
                        "geometry_geojson": {"type": "MultiPolygon", "coordinates": []}
                    },
                    {
                        "id": 2,
                        "display_name": "Austin Nature Center",
                        "place_type": 100,
                        "geometry_geojson": {"type": "Point", "coordinates": [-97.7, 30.2]}
                    },
                    {
                        "id": 3,
                        "display_name": "City of Austin Parks",
                        "place_type": null,
                        "geometry_geojson": {"type": "Polygon", "coordinates": []}
                    },
                    {
                        "id": 4,
                        "display_name": "Austin Memorial Park",
                        "place_type": 100
                    }
                ]
            }));
    });

    let places = client_for(&server).resolve_locations("City of Austin").await?;

    api_mock.assert();
    assert_eq!(places.len(), 2);
    assert_eq!(places[0].name, "Austin, TX, US");
    assert_eq!(places[0].id, 1);
    assert_eq!(places[0].place_type, Some(9));
    assert_eq!(places[1].id, 3);
    assert_eq!(places[1].place_type, None);
    Ok(())
}

#[tokio::test]
async fn test_empty_query_makes_no_request() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/v1/places/autocomplete");
        then.status(200).json_body(json!({"results": []}));
    });

    let places = client_for(&server).resolve_locations("   ").await?;

    assert!(places.is_empty());
    api_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_network_error() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/v1/places/autocomplete");
        then.status(503).body("upstream unavailable");
    });

    let err = client_for(&server)
        .resolve_locations("Big Bend National Park")
        .await
        .unwrap_err();

    api_mock.assert();
    match err {
        WildlifeError::Network { message, .. } => assert!(message.contains("503")),
        other => panic!("expected network error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_results_is_malformed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/places/autocomplete");
        then.status(200).json_body(json!({"total_results": 0}));
    });

    let err = client_for(&server)
        .resolve_locations("Travis County")
        .await
        .unwrap_err();

    assert!(matches!(err, WildlifeError::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/places/autocomplete");
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(json!({"results": []}));
    });

    let config = InatConfig {
        base_url: server.url("/v1"),
        timeout_seconds: 1,
        per_page: None,
    };
    let err = INatClient::new(&config)
        .unwrap()
        .resolve_locations("Austin")
        .await
        .unwrap_err();

    match err {
        WildlifeError::Timeout { seconds, .. } => assert_eq!(seconds, 1),
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_species_counts_query_and_normalization() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/observations/species_counts")
            .query_param("rank", "species")
            .query_param("iconic_taxa", "Aves")
            .query_param("quality_grade", "research")
            .query_param("place_id", "1")
            .query_param("order", "desc");
        then.status(200).json_body(json!({
            "total_results": 3,
            "page": 1,
            "per_page": 500,
            "results": [
                {
                    "count": 5120,
                    "taxon": {
                        "id": 9083,
                        "name": "Cardinalis cardinalis",
                        "preferred_common_name": "Northern Cardinal",
                        "default_photo": {"medium_url": "https://static.inaturalist.org/photos/1/medium.jpg"},
                        "wikipedia_url": "http://en.wikipedia.org/wiki/Northern_cardinal",
                        "rank": "species"
                    }
                },
                {
                    "count": 2011,
                    "taxon": {
                        "id": 3454,
                        "name": "Zenaida asiatica",
                        "preferred_common_name": "White-winged Dove",
                        "default_photo": {"medium_url": "https://static.inaturalist.org/photos/2/medium.jpg"},
                        "wikipedia_url": null
                    }
                },
                {
                    "count": 3,
                    "taxon": {"id": 1, "name": "Vireo atricapilla", "default_photo": null}
                }
            ]
        }));
    });

    let page = client_for(&server)
        .fetch_species_counts(1, TaxonGroup::Aves)
        .await?;
    api_mock.assert();

    let records = normalize(&page).into_records()?;
    assert_eq!(records.len(), page.results.len());
    assert!(records
        .windows(2)
        .all(|pair| pair[0].observation_count >= pair[1].observation_count));
    assert!(records
        .iter()
        .all(|r| !r.common_name.is_empty() && !r.scientific_name.is_empty()));
    assert_eq!(records[2].common_name, "Vireo atricapilla");
    assert_eq!(records[1].wikipedia_url, None);
    Ok(())
}

#[tokio::test]
async fn test_per_page_is_sent_when_configured() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/observations/species_counts")
            .query_param("per_page", "200");
        then.status(200)
            .json_body(json!({"total_results": 0, "results": []}));
    });

    let config = InatConfig {
        base_url: server.url("/v1"),
        timeout_seconds: 5,
        per_page: Some(200),
    };
    INatClient::new(&config)?
        .fetch_species_counts(55071, TaxonGroup::Reptilia)
        .await?;

    api_mock.assert();
    Ok(())
}

/// 沒有研究級紀錄的地點走空結果分支，不是錯誤
#[tokio::test]
async fn test_zero_mollusca_observations() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/v1/observations/species_counts")
            .query_param("iconic_taxa", "Mollusca");
        then.status(200).json_body(json!({
            "total_results": 0,
            "page": 1,
            "per_page": 500,
            "results": []
        }));
    });

    let page = client_for(&server)
        .fetch_species_counts(55071, TaxonGroup::Mollusca)
        .await?;

    assert_eq!(page.total_results, 0);
    assert_eq!(normalize(&page), SpeciesListing::NoObservations);
    Ok(())
}

#[tokio::test]
async fn test_species_entry_without_taxon_name_is_malformed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/observations/species_counts");
        then.status(200).json_body(json!({
            "total_results": 1,
            "results": [{"count": 1, "taxon": {"id": 5}}]
        }));
    });

    let err = client_for(&server)
        .fetch_species_counts(1, TaxonGroup::Insecta)
        .await
        .unwrap_err();

    assert!(matches!(err, WildlifeError::MalformedResponse { .. }));
}
