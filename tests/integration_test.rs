use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use forecast_desk::{routes, store, Config, FilterCriteria, WeatherClient};

// ---

/// A running service wired to a mock provider and a throwaway database.
struct TestApp {
    base: String,
    client: Client,
    provider: MockServer,
    db_url: String,
    _db_dir: TempDir,
}

async fn spawn_app() -> Result<TestApp> {
    // ---
    let provider = MockServer::start().await;
    let db_dir = tempfile::tempdir()?;
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        db_dir.path().join("weather_data.db").display()
    );

    let config = Config {
        db_url: db_url.clone(),
        api_url: provider.uri(),
        api_key: "test-key".into(),
        http_timeout_secs: 5,
        listen_port: 0,
    };
    store::init_store(&config.db_url).await?;

    let weather = WeatherClient::new(&config)?;
    let app = routes::router(config, weather);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    Ok(TestApp {
        base: format!("http://{addr}"),
        client: Client::new(),
        provider,
        db_url,
        _db_dir: db_dir,
    })
}

fn current_body() -> Value {
    json!({
        "name": "London",
        "sys": { "country": "GB" },
        "main": { "temp": 9.5, "humidity": 81 },
        "weather": [ { "description": "overcast clouds" } ],
        "wind": { "speed": 4.6 }
    })
}

fn forecast_body() -> Value {
    // ---
    let item = |dt_txt: &str, temp: f64, desc: &str| {
        json!({ "dt_txt": dt_txt, "main": { "temp": temp, "humidity": 70 }, "weather": [ { "description": desc } ] })
    };
    json!({
        "cod": "200",
        "list": [
            item("2024-01-01 12:00:00", 10.0, "clear"),
            item("2024-01-02 00:00:00", 5.0, "rain"),
            item("2024-01-02 12:00:00", 7.0, "rain"),
            item("2024-01-03 00:00:00", 12.0, "clear"),
        ]
    })
}

async fn mount_provider(app: &TestApp) {
    // ---
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&app.provider)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "London"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&app.provider)
        .await;
}

#[tokio::test]
async fn forecast_endpoint_summarizes_days() -> Result<()> {
    // ---
    let app = spawn_app().await?;
    mount_provider(&app).await;

    let url = format!("{}/weather/forecast?location=London", app.base);
    let body: Value = app.client.get(&url).send().await?.json().await?;

    assert_eq!(body["current"]["location"], "London");
    assert_eq!(body["current"]["country"], "GB");

    let daily = body["daily"].as_array().expect("daily array");
    assert_eq!(daily.len(), 2);
    assert_eq!(daily[0]["date"], "2024-01-02");
    assert_eq!(daily[0]["label"], "Tuesday 02 Jan");
    assert!((daily[0]["average_temperature"].as_f64().unwrap() - 6.0).abs() < 1e-9);
    assert_eq!(daily[0]["representative_description"], "rain");
    assert_eq!(daily[1]["date"], "2024-01-03");
    assert_eq!(daily[1]["representative_description"], "clear");

    Ok(())
}

#[tokio::test]
async fn forecast_text_rendering() -> Result<()> {
    // ---
    let app = spawn_app().await?;
    mount_provider(&app).await;

    let url = format!("{}/weather/forecast?location=London&format=text", app.base);
    let text = app.client.get(&url).send().await?.text().await?;

    assert!(text.contains("Location: London, GB"));
    assert!(text.contains("Condition: Overcast Clouds"));
    assert!(text.contains("Tuesday 02 Jan: 6.0°C, Rain"));
    assert!(text.contains("Wednesday 03 Jan: 12.0°C, Clear"));

    Ok(())
}

#[tokio::test]
async fn provider_message_is_surfaced() -> Result<()> {
    // ---
    let app = spawn_app().await?;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&app.provider)
        .await;

    let url = format!("{}/weather/current?location=Atlantis", app.base);
    let response = app.client.get(&url).send().await?;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body: Value = response.json().await?;
    assert!(body["error"].as_str().unwrap().contains("city not found"));

    Ok(())
}

#[tokio::test]
async fn provider_failure_without_message_uses_fallback() -> Result<()> {
    // ---
    let app = spawn_app().await?;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&app.provider)
        .await;

    let url = format!("{}/weather/current?location=London", app.base);
    let body: Value = app.client.get(&url).send().await?.json().await?;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Failed to retrieve current weather."));

    Ok(())
}

#[tokio::test]
async fn missing_location_is_rejected() -> Result<()> {
    // ---
    let app = spawn_app().await?;
    let url = format!("{}/weather/current?location=%20", app.base);
    let response = app.client.get(&url).send().await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn create_with_inverted_range_never_calls_provider() -> Result<()> {
    // ---
    let app = spawn_app().await?;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(0)
        .mount(&app.provider)
        .await;

    let response = app
        .client
        .post(format!("{}/records", app.base))
        .json(&json!({ "location": "London", "start_date": "2024-01-03", "end_date": "2024-01-02" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut conn = store::connect(&app.db_url).await?;
    let rows = tokio_test::assert_ok!(store::read_records(&mut conn, &FilterCriteria::default()).await);
    assert!(rows.is_empty());

    Ok(())
}

#[tokio::test]
async fn record_lifecycle() -> Result<()> {
    // ---
    let app = spawn_app().await?;
    mount_provider(&app).await;
    let records_url = format!("{}/records", app.base);

    // Create: only the two samples dated 2024-01-02 fall in range
    let response = app
        .client
        .post(&records_url)
        .json(&json!({ "location": "London", "start_date": "2024-01-02", "end_date": "2024-01-02" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await?;
    assert_eq!(created["count"], 2);

    // Read with a substring filter
    let rows: Vec<Value> = app
        .client
        .get(format!("{records_url}?location=Lon&start_date=2024-01-01"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["temperature"], 5.0);
    assert_eq!(rows[1]["temperature"], 7.0);

    // Update the description only
    let updated: Value = app
        .client
        .put(&records_url)
        .json(&json!({ "location": "Lond", "date": "2024-01-02", "description": "drizzle" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(updated["count"], 2);

    let rows: Vec<Value> = app.client.get(&records_url).send().await?.json().await?;
    assert_eq!(rows[0]["temperature"], 5.0);
    assert_eq!(rows[1]["temperature"], 7.0);
    assert!(rows.iter().all(|r| r["description"] == "drizzle"));

    // Update on a date with no rows
    let response = app
        .client
        .put(&records_url)
        .json(&json!({ "location": "London", "date": "2030-01-01", "temperature": 1.0 }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Delete on a date with no rows leaves everything in place
    let deleted: Value = app
        .client
        .delete(format!("{records_url}?location=London&date=2030-01-01"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(deleted["count"], 0);
    assert_eq!(deleted["message"], "No matching records.");
    let rows: Vec<Value> = app.client.get(&records_url).send().await?.json().await?;
    assert_eq!(rows.len(), 2);

    // Delete the stored day
    let deleted: Value = app
        .client
        .delete(format!("{records_url}?location=London&date=2024-01-02"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(deleted["count"], 2);

    let text = app
        .client
        .get(format!("{records_url}?format=text"))
        .send()
        .await?
        .text()
        .await?;
    assert_eq!(text, "No records found.\n");

    Ok(())
}

#[tokio::test]
async fn malformed_provider_timestamp_is_a_gateway_error() -> Result<()> {
    // ---
    let app = spawn_app().await?;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&app.provider)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [
                { "dt_txt": "2024-01-01 21:00:00", "main": { "temp": 3.0 }, "weather": [ { "description": "mist" } ] },
                { "dt_txt": "02.01.2024 00:00", "main": { "temp": 4.0 }, "weather": [ { "description": "mist" } ] }
            ]
        })))
        .mount(&app.provider)
        .await;

    let response = app
        .client
        .get(format!("{}/weather/forecast?location=London", app.base))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let response = app
        .client
        .post(format!("{}/records", app.base))
        .json(&json!({ "location": "London", "start_date": "2024-01-01", "end_date": "2024-01-05" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    Ok(())
}
