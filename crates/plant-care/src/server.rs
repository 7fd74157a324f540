use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::page::{render, PageView};
use crate::pipeline::CarePipeline;

#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<CarePipeline>,
}

impl AppState {
    pub fn new(pipeline: CarePipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CareForm {
    #[serde(default)]
    plant_name: String,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/refresh", post(refresh))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Renders the form. The guide is loaded on every render, as the button needs it.
async fn index(State(state): State<AppState>) -> Html<String> {
    let document = state.pipeline.load_document().await;
    Html(render(&PageView {
        plant_name: "",
        document: &document,
        outcome: None,
    }))
}

async fn submit(State(state): State<AppState>, Form(form): Form<CareForm>) -> Html<String> {
    let document = state.pipeline.load_document().await;
    let outcome = state.pipeline.answer(&form.plant_name, document.text()).await;
    Html(render(&PageView {
        plant_name: &form.plant_name,
        document: &document,
        outcome: Some(&outcome),
    }))
}

async fn refresh(State(state): State<AppState>) -> Redirect {
    state.pipeline.documents().invalidate();
    Redirect::to("/")
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let cache = state.pipeline.documents().status();
    Json(json!({
        "status": "ok",
        "document": cache,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;

    use crate::advisor::CareAdvisor;
    use crate::config::{AdvisorConfig, DocumentConfig};
    use crate::document::DocumentStore;
    use crate::fetch::PdfFetcher;
    use crate::locate::NOT_FOUND_MESSAGE;
    use crate::pipeline::MISSING_INPUT_MESSAGE;
    use crate::test_support::{sample_pdf, spawn_host, FakeGenerator};

    async fn guide_host() -> String {
        let pdf = sample_pdf(&["The Rose needs full sun and weekly watering."]);
        let slow_pdf = pdf.clone();
        let router = Router::new()
            .route(
                "/guide.pdf",
                get(move || {
                    let pdf = pdf.clone();
                    async move { ([(header::CONTENT_TYPE, "application/pdf")], pdf).into_response() }
                }),
            )
            .route(
                "/slow.pdf",
                get(move || {
                    let pdf = slow_pdf.clone();
                    async move {
                        tokio::time::sleep(std::time::Duration::from_secs(3)).await;
                        ([(header::CONTENT_TYPE, "application/pdf")], pdf).into_response()
                    }
                }),
            )
            .route(
                "/missing.pdf",
                get(|| async { StatusCode::NOT_FOUND.into_response() }),
            );
        spawn_host(router).await
    }

    async fn spawn_app(guide_url: String, fake: Arc<FakeGenerator>) -> String {
        let config = DocumentConfig {
            url: guide_url,
            ..DocumentConfig::default()
        };
        let documents = DocumentStore::new(PdfFetcher::new(&config).unwrap(), config);
        let advisor = CareAdvisor::new(fake, AdvisorConfig::default());
        let state = AppState::new(CarePipeline::new(documents, advisor));
        spawn_host(create_router(state)).await
    }

    async fn ask(app: &str, plant_name: &str) -> String {
        reqwest::Client::new()
            .post(format!("{app}/"))
            .form(&[("plant_name", plant_name)])
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_success_displays_advice() {
        let host = guide_host().await;
        let fake = Arc::new(FakeGenerator::replying("Water weekly and keep in full sun."));
        let app = spawn_app(format!("{host}/guide.pdf"), fake.clone()).await;

        let html = ask(&app, "rose").await;
        assert!(html.contains("Water weekly and keep in full sun."), "{html}");
        assert!(html.contains("Guide loaded: 1 page(s)"));
        assert_eq!(fake.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_plant_shows_not_found_warning() {
        let host = guide_host().await;
        let fake = Arc::new(FakeGenerator::replying("unused"));
        let app = spawn_app(format!("{host}/guide.pdf"), fake.clone()).await;

        let html = ask(&app, "Daisy").await;
        assert!(html.contains(NOT_FOUND_MESSAGE));
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_guide_shows_error_then_input_warning() {
        let host = guide_host().await;
        let fake = Arc::new(FakeGenerator::replying("unused"));
        let app = spawn_app(format!("{host}/missing.pdf"), fake.clone()).await;

        let idle = reqwest::get(format!("{app}/")).await.unwrap().text().await.unwrap();
        assert!(idle.contains("banner error"));
        assert!(idle.contains("error fetching the PDF file"));

        let pressed = ask(&app, "Rose").await;
        assert!(pressed.contains("banner error"));
        assert!(pressed.contains(MISSING_INPUT_MESSAGE));
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn test_model_auth_failure_shows_error_banner() {
        let host = guide_host().await;
        let fake = Arc::new(FakeGenerator::unauthorized());
        let app = spawn_app(format!("{host}/guide.pdf"), fake).await;

        let html = ask(&app, "Rose").await;
        assert!(html.contains("An error occurred while calling the care model"));
        assert!(html.contains("authentication_error"));
        assert!(!html.contains("Plant Care Instructions:"));
    }

    #[tokio::test]
    async fn test_refresh_and_health() {
        let host = guide_host().await;
        let fake = Arc::new(FakeGenerator::replying("unused"));
        let app = spawn_app(format!("{host}/guide.pdf"), fake).await;

        reqwest::get(format!("{app}/")).await.unwrap();
        let health: Value = reqwest::get(format!("{app}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["document"]["cached"], true);

        let no_redirects = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();
        let resp = no_redirects
            .post(format!("{app}/refresh"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/");

        let health: Value = reqwest::get(format!("{app}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["document"]["cached"], false);
    }

    #[tokio::test]
    async fn test_health_answers_while_guide_is_loading() {
        let host = guide_host().await;
        let fake = Arc::new(FakeGenerator::replying("unused"));
        let app = spawn_app(format!("{host}/slow.pdf"), fake).await;

        let render_url = format!("{app}/");
        let render = tokio::spawn(async move { reqwest::get(render_url).await });
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        let started = std::time::Instant::now();
        let health: Value = reqwest::get(format!("{app}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed < std::time::Duration::from_secs(1), "health took {elapsed:?}");
        assert_eq!(health["document"]["cached"], false);

        render.await.unwrap().unwrap();
    }
}
