//! API router with Swagger UI

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{CandidateService, ElectionService, TallyService, UserService, VoteLedger};
use crate::domain::{RepositoryProvider, UserRole};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::storage::LocalPhotoStore;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::dto::{
    CandidateDto, CategoryDto, ElectionDto, TallyDto, TallyEntryDto, UserDto,
};
use crate::interfaces::http::middleware::{auth_middleware, require_role, AuthState};
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::{admin, auth, candidate, health, results, voter};
use crate::shared::retry::RetryConfig;
use crate::shared::time::LocalZone;

/// Headroom on top of the photo limit for the other multipart fields
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Everything the HTTP layer needs, built once at startup
#[derive(Clone)]
pub struct ApiContext {
    pub db: DatabaseConnection,
    pub jwt_config: JwtConfig,
    pub zone: LocalZone,
    pub users: Arc<UserService>,
    pub candidates: Arc<CandidateService>,
    pub elections: Arc<ElectionService>,
    pub ledger: Arc<VoteLedger>,
    pub results: Arc<TallyService>,
    pub metrics: PrometheusHandle,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl ApiContext {
    pub fn new(
        db: DatabaseConnection,
        jwt_config: JwtConfig,
        zone: LocalZone,
        photos: LocalPhotoStore,
        retry: RetryConfig,
        metrics: PrometheusHandle,
    ) -> Self {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let upload_dir = photos.dir().to_path_buf();
        let max_upload_bytes = photos.max_bytes();

        Self {
            users: Arc::new(UserService::new(repos.clone(), jwt_config.clone())),
            candidates: Arc::new(CandidateService::new(repos.clone(), Arc::new(photos))),
            elections: Arc::new(ElectionService::new(repos.clone(), zone)),
            ledger: Arc::new(VoteLedger::new(repos.clone(), retry)),
            results: Arc::new(TallyService::new(repos)),
            db,
            jwt_config,
            zone,
            metrics,
            upload_dir,
            max_upload_bytes,
        }
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::signup,
        auth::me,
        admin::overview,
        admin::list_candidates,
        admin::add_candidate,
        admin::list_voters,
        admin::add_voter,
        admin::create_account,
        admin::list_categories,
        admin::list_elections,
        admin::create_election,
        results::results,
        results::election_results,
        results::export_csv,
        voter::ballot,
        voter::cast_vote,
        candidate::dashboard,
    ),
    components(
        schemas(
            ApiResponse<String>,
            UserDto,
            CategoryDto,
            CandidateDto,
            ElectionDto,
            TallyEntryDto,
            TallyDto,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::SignupRequest,
            admin::CandidateForm,
            admin::AddVoterRequest,
            admin::AddedVoterResponse,
            admin::CreateAccountRequest,
            admin::CreateElectionRequest,
            admin::OverviewDto,
            voter::BallotDto,
            voter::CastVoteRequest,
            voter::VoteDto,
            candidate::DashboardDto,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database reachability"),
        (name = "Authentication", description = "Login (JWT), voter sign-up, current account"),
        (name = "Admin", description = "Candidates, voters, accounts, categories and election scheduling"),
        (name = "Results", description = "Per-election tallies and CSV export"),
        (name = "Voter", description = "Ballot and vote casting"),
        (name = "Candidate", description = "Candidate dashboard with live standings"),
    ),
    info(
        title = "Election Service API",
        version = "1.0.0",
        description = "Timed, category-scoped elections with one vote per voter per election",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the full application router.
pub fn create_api_router(ctx: ApiContext) -> Router {
    let auth_state = AuthState {
        jwt_config: ctx.jwt_config.clone(),
    };
    let authenticated = |router: Router, role: Option<UserRole>| {
        let router = match role {
            Some(role) => router.layer(middleware::from_fn_with_state(role, require_role)),
            None => router,
        };
        router.layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
    };

    let auth_handler_state = auth::AuthHandlerState {
        users: ctx.users.clone(),
    };

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .with_state(auth_handler_state.clone())
        .merge(authenticated(
            Router::new()
                .route("/me", get(auth::me))
                .with_state(auth_handler_state),
            None,
        ));

    let upload_limit = ctx.max_upload_bytes + MULTIPART_OVERHEAD;
    let admin_routes = Router::new()
        .route("/overview", get(admin::overview))
        .route(
            "/candidates",
            get(admin::list_candidates).post(admin::add_candidate),
        )
        .route("/voters", get(admin::list_voters).post(admin::add_voter))
        .route("/users", post(admin::create_account))
        .route("/categories", get(admin::list_categories))
        .route(
            "/elections",
            get(admin::list_elections).post(admin::create_election),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(upload_limit))
        .with_state(admin::AdminState {
            users: ctx.users.clone(),
            candidates: ctx.candidates.clone(),
            elections: ctx.elections.clone(),
        });

    let results_routes = Router::new()
        .route("/results", get(results::results))
        .route("/elections/{id}/results", get(results::election_results))
        .route("/elections/{id}/results.csv", get(results::export_csv))
        .with_state(results::ResultsState {
            results: ctx.results.clone(),
            zone: ctx.zone,
        });

    let admin_routes = authenticated(admin_routes.merge(results_routes), Some(UserRole::Admin));

    let voter_routes = authenticated(
        Router::new()
            .route("/ballot", get(voter::ballot))
            .route("/votes", post(voter::cast_vote))
            .with_state(voter::VoterState {
                ledger: ctx.ledger.clone(),
                zone: ctx.zone,
            }),
        Some(UserRole::Voter),
    );

    let candidate_routes = authenticated(
        Router::new()
            .route("/dashboard", get(candidate::dashboard))
            .with_state(candidate::CandidateState {
                results: ctx.results.clone(),
                zone: ctx.zone,
            }),
        Some(UserRole::Candidate),
    );

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db: ctx.db.clone(),
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState {
            handle: ctx.metrics.clone(),
        });

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/admin", admin_routes)
        .nest("/api/v1/voter", voter_routes)
        .nest("/api/v1/candidate", candidate_routes)
        .nest_service("/uploads", ServeDir::new(&ctx.upload_dir))
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, HeaderMap, Request, StatusCode};
    use chrono::{Duration, Utc};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::Service;
    use uuid::Uuid;

    use crate::infrastructure::crypto::jwt::DEFAULT_ISSUER;
    use crate::infrastructure::database::test_connection;

    const BOUNDARY: &str = "election-test-boundary";

    struct TestApp {
        router: Router,
    }

    struct Reply {
        status: StatusCode,
        headers: HeaderMap,
        body: Vec<u8>,
    }

    impl Reply {
        fn json(&self) -> Value {
            serde_json::from_slice(&self.body).unwrap()
        }
    }

    impl TestApp {
        async fn new() -> Self {
            let db = test_connection().await;
            let jwt_config = JwtConfig {
                secret: "router-test-secret".into(),
                expiration_hours: 1,
                issuer: DEFAULT_ISSUER.into(),
            };
            let photos = LocalPhotoStore::new(
                std::env::temp_dir().join(format!("uploads-{}", Uuid::new_v4())),
                1024 * 1024,
            );
            let metrics = PrometheusBuilder::new().build_recorder().handle();

            let ctx = ApiContext::new(
                db,
                jwt_config,
                LocalZone::utc(),
                photos,
                RetryConfig::default(),
                metrics,
            );
            ctx.users
                .ensure_admin("Root", "root@example.org", "root", "root-password")
                .await
                .unwrap();

            Self {
                router: create_api_router(ctx),
            }
        }

        async fn send(&self, req: Request<Body>) -> Reply {
            let mut svc = self.router.clone().into_service();
            let resp = svc.call(req).await.unwrap();
            let status = resp.status();
            let headers = resp.headers().clone();
            let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec();
            Reply {
                status,
                headers,
                body,
            }
        }

        async fn json(&self, method: &str, uri: &str, token: Option<&str>, body: Value) -> Reply {
            let mut builder = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json");
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            self.send(builder.body(Body::from(body.to_string())).unwrap())
                .await
        }

        async fn get(&self, uri: &str, token: Option<&str>) -> Reply {
            let mut builder = Request::builder().uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            self.send(builder.body(Body::empty()).unwrap()).await
        }

        async fn login(&self, username: &str, password: &str) -> String {
            let reply = self
                .json(
                    "POST",
                    "/api/v1/auth/login",
                    None,
                    json!({ "username": username, "password": password }),
                )
                .await;
            assert_eq!(reply.status, StatusCode::OK);
            reply.json()["data"]["token"].as_str().unwrap().to_string()
        }

        async fn signup(&self, username: &str) -> String {
            let reply = self
                .json(
                    "POST",
                    "/api/v1/auth/signup",
                    None,
                    json!({
                        "name": format!("Voter {}", username),
                        "email": format!("{}@example.org", username),
                        "username": username,
                        "password": "voter-password",
                        "id_number": format!("ID-{}", username),
                    }),
                )
                .await;
            assert_eq!(reply.status, StatusCode::CREATED);
            self.login(username, "voter-password").await
        }

        async fn add_candidate(&self, token: &str, name: &str, category: &str) -> Reply {
            let body = format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\n{name}\r\n\
                 --{b}\r\nContent-Disposition: form-data; name=\"category\"\r\n\r\n{category}\r\n\
                 --{b}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"{name}.png\"\r\n\
                 Content-Type: image/png\r\n\r\nPNGDATA\r\n\
                 --{b}--\r\n",
                b = BOUNDARY,
            );
            let req = Request::builder()
                .method("POST")
                .uri("/api/v1/admin/candidates")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(body))
                .unwrap();
            self.send(req).await
        }
    }

    fn local(offset: Duration) -> String {
        (Utc::now() + offset).format("%Y-%m-%dT%H:%M").to_string()
    }

    #[tokio::test]
    async fn missing_token_points_to_login() {
        let app = TestApp::new().await;

        let reply = app.get("/api/v1/admin/overview", None).await;

        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply.json()["login_url"], "/api/v1/auth/login");
        assert!(reply.headers.contains_key(header::WWW_AUTHENTICATE));
    }

    #[tokio::test]
    async fn voter_cannot_reach_admin_routes() {
        let app = TestApp::new().await;
        let voter = app.signup("valerie").await;

        let reply = app.get("/api/v1/admin/overview", Some(&voter)).await;
        assert_eq!(reply.status, StatusCode::FORBIDDEN);

        let reply = app.get("/api/v1/candidate/dashboard", Some(&voter)).await;
        assert_eq!(reply.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_cannot_vote() {
        let app = TestApp::new().await;
        let admin = app.login("root", "root-password").await;

        let reply = app
            .json("POST", "/api/v1/voter/votes", Some(&admin), json!({ "candidate_id": 1 }))
            .await;
        assert_eq!(reply.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let app = TestApp::new().await;
        let reply = app
            .json(
                "POST",
                "/api/v1/auth/login",
                None,
                json!({ "username": "root", "password": "nope" }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply.json()["success"], false);
    }

    #[tokio::test]
    async fn full_election_flow() {
        let app = TestApp::new().await;
        let admin = app.login("root", "root-password").await;

        let reply = app
            .json(
                "POST",
                "/api/v1/admin/elections",
                Some(&admin),
                json!({
                    "category": "President",
                    "start_time": local(-Duration::hours(1)),
                    "end_time": local(Duration::hours(1)),
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED);
        let election_id = reply.json()["data"]["id"].as_i64().unwrap();
        assert_eq!(reply.json()["data"]["is_open"], true);

        let reply = app.add_candidate(&admin, "Alice", "President").await;
        assert_eq!(reply.status, StatusCode::CREATED);
        let alice = reply.json()["data"]["id"].as_i64().unwrap();
        let photo_url = reply.json()["data"]["photo_url"].as_str().unwrap().to_string();
        assert!(photo_url.starts_with("/uploads/"));
        assert!(photo_url.ends_with("_Alice.png"));

        let reply = app.add_candidate(&admin, "Bob", "President").await;
        assert_eq!(reply.status, StatusCode::CREATED);

        let photo = app.get(&photo_url, None).await;
        assert_eq!(photo.status, StatusCode::OK);
        assert_eq!(photo.body, b"PNGDATA");

        let voter = app.signup("vera").await;

        let reply = app.get("/api/v1/voter/ballot", Some(&voter)).await;
        assert_eq!(reply.status, StatusCode::OK);
        let ballot = reply.json();
        assert_eq!(ballot["data"]["election"]["id"].as_i64(), Some(election_id));
        assert_eq!(ballot["data"]["candidates"].as_array().unwrap().len(), 2);
        assert_eq!(ballot["data"]["has_voted"], false);

        let reply = app
            .json("POST", "/api/v1/voter/votes", Some(&voter), json!({ "candidate_id": alice }))
            .await;
        assert_eq!(reply.status, StatusCode::CREATED);
        assert_eq!(reply.json()["data"]["election_id"].as_i64(), Some(election_id));

        let reply = app
            .json("POST", "/api/v1/voter/votes", Some(&voter), json!({ "candidate_id": alice }))
            .await;
        assert_eq!(reply.status, StatusCode::CONFLICT);

        let reply = app.get("/api/v1/voter/ballot", Some(&voter)).await;
        assert_eq!(reply.json()["data"]["has_voted"], true);

        let reply = app.get("/api/v1/admin/results", Some(&admin)).await;
        assert_eq!(reply.status, StatusCode::OK);
        let tally = reply.json();
        assert_eq!(tally["data"]["total_votes"], 1);
        assert_eq!(tally["data"]["entries"][0]["candidate_name"], "Alice");
        assert_eq!(tally["data"]["entries"][0]["votes"], 1);
        assert_eq!(tally["data"]["entries"][1]["votes"], 0);

        let csv = app
            .get(
                &format!("/api/v1/admin/elections/{}/results.csv", election_id),
                Some(&admin),
            )
            .await;
        assert_eq!(csv.status, StatusCode::OK);
        assert_eq!(
            csv.headers[header::CONTENT_DISPOSITION],
            format!("attachment; filename=\"results_election_{}.csv\"", election_id).as_str()
        );
        assert_eq!(
            String::from_utf8(csv.body).unwrap(),
            "Candidate,Votes\r\nAlice,1\r\nBob,0\r\n"
        );
    }

    #[tokio::test]
    async fn vote_without_open_election_is_conflict() {
        let app = TestApp::new().await;
        let voter = app.signup("early").await;

        let reply = app
            .json("POST", "/api/v1/voter/votes", Some(&voter), json!({ "candidate_id": 1 }))
            .await;
        assert_eq!(reply.status, StatusCode::CONFLICT);

        let reply = app.get("/api/v1/voter/ballot", Some(&voter)).await;
        assert_eq!(reply.json()["data"]["election"], Value::Null);
    }

    #[tokio::test]
    async fn results_without_current_election_are_null() {
        let app = TestApp::new().await;
        let admin = app.login("root", "root-password").await;

        let reply = app.get("/api/v1/admin/results", Some(&admin)).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json()["data"], Value::Null);

        let reply = app.get("/api/v1/admin/elections/99/results", Some(&admin)).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn candidate_account_sees_dashboard() {
        let app = TestApp::new().await;
        let admin = app.login("root", "root-password").await;

        let reply = app
            .json(
                "POST",
                "/api/v1/admin/users",
                Some(&admin),
                json!({
                    "name": "Alice",
                    "email": "alice@example.org",
                    "username": "alice",
                    "password": "alice-password",
                    "role": "candidate",
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED);
        assert_eq!(app.add_candidate(&admin, "Alice", "Mayor").await.status, StatusCode::CREATED);

        let token = app.login("alice", "alice-password").await;
        let reply = app.get("/api/v1/candidate/dashboard", Some(&token)).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json()["data"]["candidate"]["category"], "mayor");
        assert_eq!(reply.json()["data"]["tally"], Value::Null);
    }

    #[tokio::test]
    async fn admin_added_voter_gets_temporary_password() {
        let app = TestApp::new().await;
        let admin = app.login("root", "root-password").await;

        let reply = app
            .json(
                "POST",
                "/api/v1/admin/voters",
                Some(&admin),
                json!({
                    "name": "Walk In",
                    "email": "walkin@example.org",
                    "username": "walkin",
                    "id_number": "W-1",
                }),
            )
            .await;
        assert_eq!(reply.status, StatusCode::CREATED);
        let password = reply.json()["data"]["temporary_password"]
            .as_str()
            .unwrap()
            .to_string();

        let token = app.login("walkin", &password).await;
        let me = app.get("/api/v1/auth/me", Some(&token)).await;
        assert_eq!(me.json()["data"]["role"], "voter");
    }

    #[tokio::test]
    async fn health_and_request_id() {
        let app = TestApp::new().await;

        let reply = app.get("/health", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert!(reply.headers.contains_key("x-request-id"));
    }
}
