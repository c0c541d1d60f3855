mod common;

use chrono::TimeDelta;
use common::{at, token_body, FakeServer, Recorded, Route};
use oneobs::{
    ApiError, Audience, BoundingBox, DisplayMode, LatLon, MapQuery, MarkerValue, ParamValue,
    StationFilter, TimeWindow, ViewportUpdate,
};

const STATION_BODY: &str = r#"{
  "type": "FeatureCollection",
  "features": [{
    "type": "Feature",
    "geometry": {"type": "Point", "coordinates": [-0.45, 51.47]},
    "properties": {
      "tags": {"name": "Heathrow", "stationCode": "EGLL"},
      "2024-03-10T10:00:00Z": {"airTemp": 7.1, "windSpeed": 4.0},
      "2024-03-10T11:00:00Z": {"airTemp": 8.2, "wmoWeatherCode": "61"}
    }
  }]
}"#;

const VIEWPORT_BODY: &str = r#"{
  "features": [
    {
      "geometry": {"coordinates": [5.18, 52.1]},
      "properties": {"2024-03-10T11:00:00Z": {"windSpeed2m": 3.2, "airTemp": 9.0}},
      "tags": {"name": "De Bilt", "stationCode": "06260"}
    },
    {
      "properties": {"2024-03-10T11:00:00Z": {"airTemp": 1.0}},
      "tags": {"name": "Nowhere"}
    },
    {
      "geometry": {"coordinates": [4.79, 52.31]},
      "properties": {},
      "tags": {"name": "Schiphol"}
    }
  ]
}"#;

const CONDITIONS_BODY: &str = r#"{
  "features": [{
    "geometry": {"coordinates": [-0.45, 51.47]},
    "properties": {
      "2024-03-10T14:00:00Z": {"globalRadiation": 120.44},
      "2024-03-10T13:00:00Z": {"globalRadiation": 98.0}
    }
  }]
}"#;

const MALFORMED_VALUE_BODY: &str = r#"{
  "features": [
    {
      "geometry": {"coordinates": [5.18, 52.1]},
      "properties": {"2024-03-10T11:00:00Z": {"airTemp": 9.0}},
      "tags": {"name": "De Bilt", "stationCode": "06260"}
    },
    {
      "geometry": {"coordinates": [4.79, 52.31]},
      "properties": {"2024-03-10T11:00:00Z": {"airTemp": 8.0, "cloudLayers": [1, 2]}},
      "tags": {"name": "Schiphol", "stationCode": "06240"}
    }
  ]
}"#;

fn routes() -> Vec<Route> {
    vec![
        Route::ok("/auth", token_body("tok-123")),
        Route::ok("/observations", STATION_BODY),
        Route::ok("/conditions", CONDITIONS_BODY),
    ]
}

#[tokio::test]
async fn station_fetch_sends_bearer_token_and_sorts_newest_first() {
    let server = FakeServer::start(routes()).await;
    let (dash, _) = server.dashboard(at(12, 0));

    let window = TimeWindow::trailing(at(12, 0), TimeDelta::hours(12));
    let result = dash
        .observations()
        .fetch_by_station_code(
            " EGLL ",
            &["airTemp".to_string(), "windSpeed".to_string()],
            window,
        )
        .await;

    assert_eq!(result.observations.len(), 2);
    assert_eq!(result.observations[0].timestamp, "2024-03-10T11:00:00Z");
    assert_eq!(
        result.observations[0].values.get("wmoWeatherCode"),
        Some(&ParamValue::Text("61".into()))
    );
    assert_eq!(result.tags.name(), Some("Heathrow"));
    assert_eq!(result.location, Some(LatLon(51.47, -0.45)));

    let requests = server.requests_to("/observations");
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request
        .headers
        .to_ascii_lowercase()
        .contains("authorization: bearer tok-123"));
    assert_eq!(request.query_value("stationCode").as_deref(), Some("EGLL"));
    assert_eq!(
        request.query_value("parameters").as_deref(),
        Some("airTemp,windSpeed")
    );
    assert_eq!(
        request.query_value("startTime").as_deref(),
        Some("2024-03-10T00:00:00.000Z")
    );
    assert_eq!(request.query_value("showTags").as_deref(), Some("true"));

    let auth = server.requests_to("/auth");
    assert_eq!(auth.len(), 1);
    assert_eq!(auth[0].method, "POST");
    assert!(auth[0].body.contains("grant_type=client_credentials"));
    assert!(auth[0].body.contains("client_id=test-id"));
}

#[tokio::test]
async fn token_is_reused_until_it_expires() {
    let server = FakeServer::start(routes()).await;
    let (dash, clock) = server.dashboard(at(12, 0));
    let params = vec!["airTemp".to_string()];
    let window = TimeWindow::trailing(at(12, 0), TimeDelta::hours(1));

    dash.observations()
        .fetch_by_station_code("EGLL", &params, window)
        .await;
    clock.advance(TimeDelta::minutes(30));
    dash.observations()
        .fetch_by_station_code("EGLL", &params, window)
        .await;
    assert_eq!(server.requests_to("/auth").len(), 1);

    clock.advance(TimeDelta::minutes(16));
    dash.observations()
        .fetch_by_station_code("EGLL", &params, window)
        .await;
    assert_eq!(server.requests_to("/auth").len(), 2);
    assert_eq!(server.requests_to("/observations").len(), 3);

    let cached = dash.tokens().cached(Audience::Observations).await.unwrap();
    assert_eq!(cached.expires_at, at(12, 46) + TimeDelta::minutes(45));
    assert!(dash.tokens().cached(Audience::Conditions).await.is_none());
}

#[tokio::test]
async fn viewport_builds_markers_and_skips_unlocated_stations() {
    let server = FakeServer::start(vec![
        Route::ok("/auth", token_body("tok")),
        Route::ok("/observations", VIEWPORT_BODY),
    ])
    .await;
    let (dash, _) = server.dashboard(at(11, 30));

    let query = MapQuery::builder()
        .bounds(BoundingBox::new(51.0, 53.0, 4.0, 6.0))
        .station_filter(StationFilter::Wmo)
        .display_mode(DisplayMode::WindSpeed)
        .build();
    let ViewportUpdate::Current(markers) = dash.stations_in_view(query).await else {
        panic!("a lone request cannot be superseded");
    };

    assert_eq!(markers.len(), 2);
    let de_bilt = &markers[0];
    assert_eq!(de_bilt.station_code, "06260");
    assert_eq!(de_bilt.location, LatLon(52.1, 5.18));
    assert_eq!(de_bilt.marker.label().as_deref(), Some("3.2m/s"));
    assert_eq!(de_bilt.summary.title, "De Bilt");

    let schiphol = &markers[1];
    assert_eq!(schiphol.station_code, "N/A");
    assert_eq!(schiphol.marker, MarkerValue::Minimal);

    let request = &server.requests_to("/observations")[0];
    assert_eq!(request.query_value("by").as_deref(), Some("boundingBox"));
    assert_eq!(request.query_value("obsTypes").as_deref(), Some("SYNOP,METAR"));
    assert_eq!(
        request.query_value("startTime").as_deref(),
        Some("2024-03-10T10:00:00.000Z")
    );
    assert_eq!(
        request.query_value("endTime").as_deref(),
        Some("2024-03-10T11:31:00.000Z")
    );
    assert!(request
        .query_value("parameters")
        .unwrap()
        .contains("windSpeed2m"));
}

#[tokio::test]
async fn forecast_parameters_are_translated_to_conditions_names() {
    let server = FakeServer::start(routes()).await;
    let (dash, _) = server.dashboard(at(12, 0));

    let series = dash
        .forecasts()
        .fetch_forecast(
            LatLon(51.47, -0.45),
            None,
            &[
                "globalRadiation60Min".to_string(),
                "surfaceTemp".to_string(),
            ],
        )
        .await;

    let request = &server.requests_to("/conditions")[0];
    assert_eq!(request.query_values("parameters"), vec!["globalRadiation"]);
    assert_eq!(request.query_value("lat").as_deref(), Some("51.47"));
    assert_eq!(request.query_value("lon").as_deref(), Some("-0.45"));
    assert_eq!(
        request.query_value("startTime").as_deref(),
        Some("2024-03-10T00:00:00.000Z")
    );
    assert_eq!(
        request.query_value("endTime").as_deref(),
        Some("2024-03-11T12:00:00.000Z")
    );

    assert_eq!(series.forecasts.len(), 2);
    assert_eq!(series.forecasts[0].timestamp, "2024-03-10T13:00:00Z");
    assert_eq!(
        series.forecasts[1].values.get("globalRadiation"),
        Some(&ParamValue::Number(120.44))
    );
    assert!(series.forecasts[1].values.get("globalRadiation60Min").is_none());
    assert_eq!(series.start_time, Some(at(0, 0)));

    let auth = server.requests_to("/auth");
    assert_eq!(auth.len(), 1);
    assert!(auth[0].body.contains("conditions"));
}

#[tokio::test]
async fn http_errors_degrade_but_surface_through_try_variants() {
    let server = FakeServer::start(vec![
        Route::ok("/auth", token_body("tok")),
        Route::status("/observations", 500, r#"{"error":"boom"}"#),
    ])
    .await;
    let (dash, _) = server.dashboard(at(12, 0));
    let window = TimeWindow::trailing(at(12, 0), TimeDelta::hours(1));
    let params = vec!["airTemp".to_string()];

    let degraded = dash
        .observations()
        .fetch_by_station_code("EGLL", &params, window)
        .await;
    assert!(degraded.is_empty());

    let err = dash
        .observations()
        .try_fetch_by_station_code("EGLL", &params, window)
        .await
        .unwrap_err();
    match err {
        ApiError::HttpStatus { status, body, .. } => {
            assert_eq!(status.as_u16(), 500);
            assert!(body.contains("boom"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn rejected_credentials_make_no_data_request() {
    let server = FakeServer::start(vec![
        Route::status("/auth", 401, r#"{"error":"unauthorized"}"#),
        Route::ok("/observations", STATION_BODY),
    ])
    .await;
    let (dash, _) = server.dashboard(at(12, 0));

    let err = dash
        .observations()
        .try_fetch_by_station_code(
            "EGLL",
            &["airTemp".to_string()],
            TimeWindow::trailing(at(12, 0), TimeDelta::hours(1)),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Auth(_)));
    assert!(server.requests_to("/observations").is_empty());
}

#[tokio::test]
async fn unsupported_value_does_not_drop_the_viewport() {
    let server = FakeServer::start(vec![
        Route::ok("/auth", token_body("tok")),
        Route::ok("/observations", MALFORMED_VALUE_BODY),
    ])
    .await;
    let (dash, _) = server.dashboard(at(11, 30));

    let query = MapQuery::builder()
        .bounds(BoundingBox::new(51.0, 53.0, 4.0, 6.0))
        .build();
    let ViewportUpdate::Current(markers) = dash.stations_in_view(query).await else {
        panic!("a lone request cannot be superseded");
    };

    assert_eq!(markers.len(), 2);
    let schiphol = &markers[1];
    assert_eq!(schiphol.station_code, "06240");
    assert_eq!(schiphol.marker.label().as_deref(), Some("8°C"));
}

#[tokio::test]
async fn unsupported_value_keeps_the_rest_of_a_station() {
    let body = r#"{"features": [{
      "geometry": {"coordinates": [4.79, 52.31]},
      "properties": {
        "2024-03-10T10:00:00Z": {"airTemp": 7.5, "cloudLayers": [1, 2]},
        "2024-03-10T11:00:00Z": {"airTemp": 8.0}
      },
      "tags": {"name": "Schiphol", "stationCode": "06240"}
    }]}"#;
    let server = FakeServer::start(vec![
        Route::ok("/auth", token_body("tok")),
        Route::ok("/observations", body),
    ])
    .await;
    let (dash, _) = server.dashboard(at(12, 0));

    let result = dash
        .observations()
        .try_fetch_by_station_code(
            "06240",
            &["airTemp".to_string()],
            TimeWindow::trailing(at(12, 0), TimeDelta::hours(12)),
        )
        .await
        .unwrap();

    assert_eq!(result.observations.len(), 2);
    assert_eq!(
        result.observations[1].values.get("airTemp"),
        Some(&ParamValue::Number(7.5))
    );
    assert!(result.observations[1].values.get("cloudLayers").is_none());
}

#[tokio::test]
async fn latest_viewport_request_wins() {
    let server = FakeServer::start(vec![
        Route::ok("/auth", token_body("tok")),
        Route::ok("/observations", VIEWPORT_BODY),
    ])
    .await;
    let (dash, _) = server.dashboard(at(11, 30));

    let first = MapQuery::builder()
        .bounds(BoundingBox::new(51.0, 53.0, 4.0, 6.0))
        .build();
    let second = MapQuery::builder()
        .bounds(BoundingBox::new(52.0, 52.5, 4.5, 5.5))
        .build();

    let (first, second) = tokio::join!(
        dash.stations_in_view(first),
        dash.stations_in_view(second),
    );

    assert!(matches!(first, ViewportUpdate::Superseded));
    let ViewportUpdate::Current(markers) = second else {
        panic!("the newest request must be current");
    };
    assert_eq!(markers.len(), 2);
    assert_eq!(server.requests_to("/observations").len(), 2);
}

#[test]
fn recorded_query_is_form_decoded() {
    let request = Recorded {
        method: "GET".to_string(),
        target: "/observations?parameters=airTemp%2CwindSpeed&name=De+Bilt&unit=%C2%B0C&flag"
            .to_string(),
        headers: String::new(),
        body: String::new(),
    };

    assert_eq!(request.path(), "/observations");
    assert_eq!(
        request.query_value("parameters").as_deref(),
        Some("airTemp,windSpeed")
    );
    assert_eq!(request.query_value("name").as_deref(), Some("De Bilt"));
    assert_eq!(request.query_value("unit").as_deref(), Some("°C"));
    assert_eq!(request.query_value("flag").as_deref(), Some(""));
}
