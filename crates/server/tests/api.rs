use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::{
    build_app, create_memory_pool, create_router, AppState, AuthConfig, Config, Environment,
};

const ADMIN_USER: &str = "admin";
const ADMIN_PASSWORD: &str = "s3nha-forte";

async fn state() -> AppState {
    let pool = create_memory_pool().await.unwrap();
    let auth = AuthConfig {
        admin_user: ADMIN_USER.to_string(),
        admin_password_hash: bcrypt::hash(ADMIN_PASSWORD, 4).unwrap(),
        jwt_secret: "integration-secret".to_string(),
        token_ttl_secs: AuthConfig::DEFAULT_TOKEN_TTL_SECS,
    };
    let config = Config::new(Environment::Dev, "./data", auth);
    AppState::new(pool, &config)
}

async fn app() -> Router {
    build_app(state().await)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": ADMIN_USER, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn create(app: &Router, token: &str, song: Value) -> Value {
    let (status, body) = send(app, Method::POST, "/api/musicas", Some(token), Some(song)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

fn titles(list: &Value) -> Vec<String> {
    let mut titles: Vec<String> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["titulo"].as_str().unwrap().to_string())
        .collect();
    titles.sort();
    titles
}

#[tokio::test]
async fn test_create_then_get_returns_same_song() {
    let app = app().await;
    let token = login(&app).await;

    let created = create(
        &app,
        &token,
        json!({
            "titulo": "Vem, Espírito Santo",
            "artista": "Pe. Zezinho",
            "tempo": "Pentecostes",
            "momento": "Entrada",
            "tom": "D",
            "letraUrl": "https://example.com/letra"
        }),
    )
    .await;

    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["titulo"], "Vem, Espírito Santo");
    assert_eq!(created["letraUrl"], "https://example.com/letra");
    assert!(created["cifraUrl"].is_null());

    let (status, fetched) = send(
        &app,
        Method::GET,
        &format!("/api/musicas/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_requires_title_and_category() {
    let app = app().await;
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/musicas",
        Some(&token),
        Some(json!({ "titulo": "Sem tempo" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let app = app().await;
    let token = login(&app).await;

    let created = create(&app, &token, json!({ "titulo": "Hosana", "tempo": "Comum" })).await;
    let uri = format!("/api/musicas/{}", created["id"]);

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, body) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_merges_partial_fields() {
    let app = app().await;
    let token = login(&app).await;

    let created = create(
        &app,
        &token,
        json!({
            "titulo": "Santo",
            "artista": "Tradicional",
            "tempo": "Comum",
            "momento": "Santo",
            "tom": "G"
        }),
    )
    .await;
    let uri = format!("/api/musicas/{}", created["id"]);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "tom": "A", "artista": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["tom"], "A");
    assert!(updated["artista"].is_null());
    assert_eq!(updated["titulo"], created["titulo"]);
    assert_eq!(updated["tempo"], created["tempo"]);
    assert_eq!(updated["momento"], created["momento"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "titulo": null })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/musicas/999",
        Some(&token),
        Some(json!({ "tom": "C" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_filter_ignores_case() {
    let app = app().await;
    let token = login(&app).await;

    create(&app, &token, json!({ "titulo": "Ó Vem Senhor", "tempo": "Advento", "momento": "Entrada" })).await;
    create(&app, &token, json!({ "titulo": "Preparai", "tempo": "advento", "momento": "entrada" })).await;
    create(&app, &token, json!({ "titulo": "Aleluia", "tempo": "Páscoa", "momento": "Entrada" })).await;

    let (_, lower) = send(&app, Method::GET, "/api/musicas?tempo=advento&momento=entrada", None, None).await;
    let (_, upper) = send(&app, Method::GET, "/api/musicas?tempo=ADVENTO&momento=ENTRADA", None, None).await;
    let (_, mixed) = send(&app, Method::GET, "/api/musicas?tempo=Advento", None, None).await;

    assert_eq!(titles(&lower), vec!["Preparai", "Ó Vem Senhor"]);
    assert_eq!(titles(&lower), titles(&upper));
    assert_eq!(titles(&lower), titles(&mixed));

    // Non-ASCII letters fold too
    let (_, accented) = send(&app, Method::GET, "/api/musicas?tempo=P%C3%81SCOA", None, None).await;
    assert_eq!(titles(&accented), vec!["Aleluia"]);
}

#[tokio::test]
async fn test_list_paginates_when_requested() {
    let app = app().await;
    let token = login(&app).await;

    for title in ["A", "B", "C"] {
        create(&app, &token, json!({ "titulo": title, "tempo": "Natal" })).await;
    }

    let (status, page) = send(&app, Method::GET, "/api/musicas?tempo=natal&page=2&limit=2", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["totalItems"], 3);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["currentPage"], 2);
    assert_eq!(titles(&page["items"]), vec!["C"]);

    let (status, _) = send(&app, Method::GET, "/api/musicas?page=0", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_repertoire_has_null_for_empty_moments() {
    let app = app().await;
    let token = login(&app).await;

    let only = create(
        &app,
        &token,
        json!({ "titulo": "Cordeiro de Deus", "tempo": "Quaresma", "momento": "Cordeiro" }),
    )
    .await;

    for _ in 0..5 {
        let (status, body) = send(&app, Method::GET, "/api/repertorio-aleatorio?tempo=quaresma", None, None).await;
        assert_eq!(status, StatusCode::OK);

        let slots = body.as_object().unwrap();
        assert_eq!(slots.len(), 10);
        assert_eq!(body["Cordeiro"], only);
        assert!(body["Entrada"].is_null());
        assert!(body["Final"].is_null());
    }

    let (status, body) = send(&app, Method::GET, "/api/repertorio-aleatorio?tempo=Inexistente", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_object().unwrap().values().all(Value::is_null));

    let (status, _) = send(&app, Method::GET, "/api/repertorio-aleatorio", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_moments_follow_celebration_order() {
    let app = app().await;
    let token = login(&app).await;

    for moment in ["Final", "Comunhão", "Entrada", "comunhão"] {
        create(&app, &token, json!({ "titulo": moment, "tempo": "Natal", "momento": moment })).await;
    }

    let (status, body) = send(&app, Method::GET, "/api/momentos?tempo=NATAL", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let moments: Vec<String> = serde_json::from_value(body).unwrap();
    assert_eq!(moments.len(), 3);
    assert_eq!(moments[0], "Entrada");
    assert_eq!(moments[1].to_lowercase(), "comunhão");
    assert_eq!(moments[2], "Final");
}

#[tokio::test]
async fn test_highlights_replace_as_a_whole() {
    let app = app().await;
    let token = login(&app).await;

    let (status, body) = send(&app, Method::GET, "/api/destaques", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let slides = json!([
        { "imageUrl": "/img/1.jpg", "linkUrl": "/advento" },
        { "imageUrl": "/img/2.jpg" }
    ]);
    let (status, _) = send(&app, Method::POST, "/api/destaques", Some(&token), Some(slides)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/api/destaques", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["imageUrl"], "/img/1.jpg");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/destaques",
        Some(&token),
        Some(json!({ "slides": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    // Rejected payload leaves the stored slides untouched
    let (_, body) = send(&app, Method::GET, "/api/destaques", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": ADMIN_USER, "password": "errada" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "authentication_failed");
}

#[tokio::test]
async fn test_protected_routes_require_valid_token() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/musicas/all", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "authorization_required");

    let (status, body) = send(&app, Method::GET, "/api/musicas/all", Some("not.a.token"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "invalid_token");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/destaques",
        None,
        Some(json!([])),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login(&app).await;
    let (status, body) = send(&app, Method::GET, "/api/musicas/all", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_health() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_repertoire_schema_allows_null_slots() {
    let (_, api) = create_router(state().await);
    let doc = serde_json::to_value(&api).unwrap();

    let slot = &doc["paths"]["/api/repertorio-aleatorio"]["get"]["responses"]["200"]["content"]
        ["application/json"]["schema"]["additionalProperties"];
    assert!(slot.to_string().contains("null"), "{}", slot);
}
