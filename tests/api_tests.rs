//! HTTP API end to end, with in-process collaborators behind the router

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::record;
use common::MockDirectory;
use common::MockGeocoder;
use common::MockModel;
use common::ModelBehavior;
use pincodepro::api::build_app;
use pincodepro::api::handlers::AppState;
use pincodepro::api::session::SessionManager;
use pincodepro::llm::GroundingChunk;
use pincodepro::models::QueryMode;
use pincodepro::support::SUPPORT_GREETING;
use pincodepro::AppConfig;
use pincodepro::PincodeServices;
use serde_json::json;
use serde_json::Value;

const INSIGHT: &str = r#"{"summary":"Busy commercial area.","keyPlaces":["Metro station"],"connectivity":"Metro and bus","popularFor":["Coaching"],"hospitals":["Area Hospital"],"schools":["Public School"]}"#;

struct TestServer {
    base: String,
    client: reqwest::Client,
    model: Arc<MockModel>,
}

impl TestServer {
    async fn start(locality: Option<&str>) -> Self {
        let model = Arc::new(MockModel::new(ModelBehavior::Grounded(
            INSIGHT.to_string(),
            vec![GroundingChunk {
                uri: Some("https://news.example/area".to_string()),
                title: Some("Area news".to_string()),
            }],
        )));
        let directory = Arc::new(
            MockDirectory::new()
                .with(QueryMode::Pincode, "500016", vec![record("500016", "Ameerpet")])
                .with(
                    QueryMode::Pincode,
                    "110001",
                    vec![record("110001", "Connaught Place"), record("110001", "Parliament House")],
                ),
        );
        let geocoder = Arc::new(MockGeocoder {
            locality: locality.map(str::to_string),
        });

        let config = AppConfig::default();
        let services = PincodeServices::with_collaborators(&config, model.clone(), directory, geocoder);
        let state = AppState::new(services, Arc::new(SessionManager::new(3600)));
        let app = build_app(state, true, 16);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{addr}/api"),
            client: reqwest::Client::new(),
            model,
        }
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let response = self.client.get(format!("{}{path}", self.base)).send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap_or(Value::Null))
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let response = self
            .client
            .post(format!("{}{path}", self.base))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap_or(Value::Null))
    }

    async fn create_session(&self) -> String {
        let (status, body) = self.post("/sessions", json!({})).await;
        assert_eq!(status, 200);
        body["data"]["session_id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_health_and_catalog() {
    let server = TestServer::start(None).await;

    let (status, body) = server.get("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "healthy");

    let (_, body) = server.get("/states").await;
    assert!(body["data"].as_array().unwrap().iter().any(|s| s == "Telangana"));

    let (status, body) = server.get("/states/telangana/districts").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["state"], "Telangana");
    assert!(body["data"]["districts"]
        .as_array()
        .unwrap()
        .iter()
        .any(|d| d == "Hyderabad"));

    let (status, _) = server.get("/states/Atlantis/districts").await;
    assert_eq!(status, 404);

    let (_, body) = server.get("/featured").await;
    assert_eq!(body["data"], json!(["560001", "400001", "110001", "600001"]));
}

#[tokio::test]
async fn test_stateless_search() {
    let server = TestServer::start(None).await;

    let (status, body) = server.get("/search?q=500016").await;
    assert_eq!(status, 200);
    let data = &body["data"];
    assert_eq!(data["query"]["mode"], "pincode");
    assert_eq!(data["results"]["records"][0]["officeName"], "Ameerpet");
    assert_eq!(data["auto_open"]["pincode"], "500016");
    assert!(data["links"]["directions"]
        .as_str()
        .unwrap()
        .starts_with("https://www.google.com/maps/search/"));
    assert_eq!(data["links"]["nearby_pincodes"], json!(["500015", "500017", "500018"]));

    let (_, body) = server.get("/search?q=999999").await;
    assert!(body["data"]["results"]["records"].as_array().unwrap().is_empty());
    assert!(body["data"]["auto_open"].is_null());
    assert!(body["data"]["links"].is_null());

    // Pincodes never reach the model
    assert_eq!(server.model.calls(), 0);
}

#[tokio::test]
async fn test_insights_endpoint() {
    let server = TestServer::start(None).await;

    let (status, body) = server.get("/insights?area=Ameerpet&pincode=500016&state=Telangana").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["report"]["insights"]["summary"], "Busy commercial area.");
    assert_eq!(body["data"]["report"]["sources"][0]["title"], "Area news");

    let (status, _) = server.get("/insights?area=&pincode=500016").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_share_location_links() {
    let server = TestServer::start(None).await;

    let (status, body) = server.get("/share-location?lat=17.4375&lon=78.4482").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["maps"], "https://www.google.com/maps?q=17.4375%2C78.4482");
    assert!(body["data"]["share"].as_str().unwrap().starts_with("https://wa.me/?text="));

    let (status, _) = server.get("/share-location?lat=120&lon=78.4482").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_session_search_auto_opens_and_fetches_insights() {
    let server = TestServer::start(None).await;
    let id = server.create_session().await;

    let (status, body) = server
        .post(&format!("/sessions/{id}/search"), json!({"query": "500016"}))
        .await;
    assert_eq!(status, 200);
    let state = &body["data"]["state"];
    assert_eq!(state["view"], "detail");
    assert_eq!(state["searching"], false);
    assert_eq!(state["detail"]["record"]["officeName"], "Ameerpet");
    assert!(body["data"]["links"]["share"].as_str().unwrap().starts_with("https://wa.me/"));

    // Insights for an auto-opened record arrive in the background
    let mut insight = Value::Null;
    for _ in 0..50 {
        let (_, body) = server.get(&format!("/sessions/{id}")).await;
        let detail = &body["data"]["state"]["detail"];
        if detail["loading"] == false {
            insight = detail["insight"].clone();
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(insight["insights"]["connectivity"], "Metro and bus");
}

#[tokio::test]
async fn test_session_select_and_close() {
    let server = TestServer::start(None).await;
    let id = server.create_session().await;

    let (_, body) = server
        .post(&format!("/sessions/{id}/search"), json!({"query": "110001"}))
        .await;
    let state = &body["data"]["state"];
    assert_eq!(state["view"], "results");
    assert_eq!(state["results"]["records"].as_array().unwrap().len(), 2);
    assert!(state["detail"].is_null());

    let (status, body) = server
        .post(&format!("/sessions/{id}/select"), json!({"index": 1}))
        .await;
    assert_eq!(status, 200);
    let detail = &body["data"]["state"]["detail"];
    assert_eq!(detail["record"]["officeName"], "Parliament House");
    assert_eq!(detail["loading"], false);
    assert_eq!(detail["insight"]["insights"]["schools"][0], "Public School");

    let (status, _) = server
        .post(&format!("/sessions/{id}/select"), json!({"index": 9}))
        .await;
    assert_eq!(status, 404);

    let response = server
        .client
        .delete(format!("{}/sessions/{id}/select", server.base))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["state"]["view"], "results");
    assert!(body["data"]["state"]["detail"].is_null());
    assert_eq!(body["data"]["state"]["results"]["records"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_session_errors() {
    let server = TestServer::start(None).await;

    let (status, _) = server.get("/sessions/does-not-exist").await;
    assert_eq!(status, 404);

    let id = server.create_session().await;
    let (status, _) = server
        .post(&format!("/sessions/{id}/search"), json!({"query": "   "}))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_near_without_locality_keeps_previous_results() {
    let server = TestServer::start(None).await;
    let id = server.create_session().await;

    let (_, before) = server.get(&format!("/sessions/{id}")).await;
    let (status, body) = server
        .post(&format!("/sessions/{id}/near"), json!({"lat": 17.43, "lon": 78.44}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["state"]["searching"], false);
    assert_eq!(
        body["data"]["state"]["results"],
        before["data"]["state"]["results"]
    );
}

#[tokio::test]
async fn test_support_keeps_one_conversation_per_session() {
    let server = TestServer::start(None).await;

    let (status, body) = server
        .post("/support", json!({"message": "What is a B.O?"}))
        .await;
    assert_eq!(status, 200);
    let id = body["data"]["session_id"].as_str().unwrap().to_string();
    // Greeting first, then the exchange
    let messages = body["data"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["role"], "bot");
    assert_eq!(messages[0]["text"], SUPPORT_GREETING);
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["text"], "What is a B.O?");
    assert_eq!(messages[2]["role"], "bot");

    let (_, body) = server
        .post("/support", json!({"session_id": id, "message": "And S.O?"}))
        .await;
    assert_eq!(body["data"]["session_id"], id.as_str());
    assert_eq!(body["data"]["messages"].as_array().unwrap().len(), 5);

    let (status, _) = server
        .post("/support", json!({"session_id": id, "message": "  "}))
        .await;
    assert_eq!(status, 400);
}
