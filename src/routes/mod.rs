//! Route tables. Report paths are registered as static segments, so they
//! take priority over the `/:segment/:id` capture and are never swallowed
//! by the generic read handler.

use crate::handlers::{entity, reports};
use crate::state::AppState;
use axum::{routing::get, Json, Router};
use serde::Serialize;

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/peliculas/director", get(reports::with_director))
        .route("/peliculas/promedio", get(reports::average_rating))
        .route("/peliculas/actores", get(reports::with_actors))
        .route("/peliculas/mejor", get(reports::top_rated))
        .route(
            "/peliculas/cantidad-calificaciones",
            get(reports::rating_counts),
        )
        .route("/:segment", get(entity::list).post(entity::create))
        .route(
            "/:segment/:id",
            get(entity::read).put(entity::update).delete(entity::delete),
        )
        .with_state(state)
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /health, GET /version (no state).
pub fn common_routes() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::gateway::Gateway;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    enum FakeReply {
        Rows(Vec<Value>),
        Id(i64),
        Affected(u64),
        Fail,
    }

    /// Scripted gateway: pops one reply per statement and records the SQL.
    struct FakeGateway {
        replies: Mutex<VecDeque<FakeReply>>,
        log: Mutex<Vec<String>>,
    }

    impl FakeGateway {
        fn new(replies: Vec<FakeReply>) -> Arc<Self> {
            Arc::new(FakeGateway {
                replies: Mutex::new(replies.into()),
                log: Mutex::new(Vec::new()),
            })
        }

        fn pop(&self, sql: &str) -> FakeReply {
            self.log.lock().unwrap().push(sql.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted reply left")
        }

        fn logged_sql(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }

        fn fail() -> AppError {
            AppError::Db(sqlx::Error::Protocol("connection reset".into()))
        }
    }

    #[async_trait]
    impl Gateway for FakeGateway {
        async fn fetch_all(&self, sql: &str, _params: &[Value]) -> Result<Vec<Value>, AppError> {
            match self.pop(sql) {
                FakeReply::Rows(rows) => Ok(rows),
                FakeReply::Fail => Err(Self::fail()),
                _ => panic!("fetch_all got non-row reply"),
            }
        }

        async fn fetch_optional(
            &self,
            sql: &str,
            _params: &[Value],
        ) -> Result<Option<Value>, AppError> {
            match self.pop(sql) {
                FakeReply::Rows(rows) => Ok(rows.into_iter().next()),
                FakeReply::Fail => Err(Self::fail()),
                _ => panic!("fetch_optional got non-row reply"),
            }
        }

        async fn fetch_generated_id(&self, sql: &str, _params: &[Value]) -> Result<i64, AppError> {
            match self.pop(sql) {
                FakeReply::Id(id) => Ok(id),
                FakeReply::Fail => Err(Self::fail()),
                _ => panic!("fetch_generated_id got non-id reply"),
            }
        }

        async fn execute(&self, sql: &str, _params: &[Value]) -> Result<u64, AppError> {
            match self.pop(sql) {
                FakeReply::Affected(n) => Ok(n),
                FakeReply::Fail => Err(Self::fail()),
                _ => panic!("execute got non-affected reply"),
            }
        }
    }

    fn app(gateway: Arc<FakeGateway>) -> Router {
        Router::new()
            .merge(common_routes())
            .nest("/api", api_routes(AppState::new(gateway)))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn with_json_body(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn list_returns_raw_row_array() {
        let rows = vec![json!({"id": 1, "nombre": "Denis Villeneuve", "nacionalidad": "Canadian"})];
        let gw = FakeGateway::new(vec![FakeReply::Rows(rows.clone())]);
        let response = app(gw.clone()).oneshot(get("/api/directores")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, Value::Array(rows));
        assert!(gw.logged_sql()[0].contains(r#"FROM "director""#));
    }

    #[tokio::test]
    async fn read_hit_returns_single_object() {
        let row = json!({"id": 5, "nombre": "Ana de Armas"});
        let gw = FakeGateway::new(vec![FakeReply::Rows(vec![row.clone()])]);
        let response = app(gw).oneshot(get("/api/actores/5")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, row);
    }

    #[tokio::test]
    async fn read_miss_returns_empty_body_with_200() {
        let gw = FakeGateway::new(vec![FakeReply::Rows(vec![])]);
        let response = app(gw).oneshot(get("/api/actores/999")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn create_returns_generated_id() {
        let gw = FakeGateway::new(vec![FakeReply::Id(42)]);
        let request = with_json_body(
            "POST",
            "/api/directores",
            json!({"nombre": "Greta Gerwig", "nacionalidad": "American"}),
        );
        let response = app(gw.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"id": 42}));
        assert!(gw.logged_sql()[0].contains(r#"RETURNING "id""#));
    }

    #[tokio::test]
    async fn update_returns_fixed_message() {
        let gw = FakeGateway::new(vec![FakeReply::Affected(1)]);
        let request = with_json_body(
            "PUT",
            "/api/directores/3",
            json!({"nombre": "Bong Joon-ho", "nacionalidad": "South Korean"}),
        );
        let response = app(gw).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"message": "Director actualizado"})
        );
    }

    #[tokio::test]
    async fn update_does_not_report_missing_row() {
        // Zero rows matched still answers with the confirmation message.
        let gw = FakeGateway::new(vec![FakeReply::Affected(0)]);
        let request = with_json_body(
            "PUT",
            "/api/actores/999",
            json!({"nombre": "x", "fecha_nacimiento": "1990-01-01", "nacionalidad": "x"}),
        );
        let response = app(gw).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"message": "Actor actualizado"})
        );
    }

    #[tokio::test]
    async fn delete_returns_fixed_message() {
        let gw = FakeGateway::new(vec![FakeReply::Affected(1)]);
        let request = Request::builder()
            .method("DELETE")
            .uri("/api/peliculas/7")
            .body(Body::empty())
            .unwrap();
        let response = app(gw).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"message": "Película eliminada"})
        );
    }

    #[tokio::test]
    async fn data_access_failure_maps_to_500() {
        let gw = FakeGateway::new(vec![FakeReply::Fail]);
        let response = app(gw).oneshot(get("/api/peliculas")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "database_error");
    }

    #[tokio::test]
    async fn report_routes_are_not_shadowed_by_id_capture() {
        let gw = FakeGateway::new(vec![FakeReply::Rows(vec![])]);
        let response = app(gw.clone())
            .oneshot(get("/api/peliculas/promedio"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let sql = gw.logged_sql()[0].clone();
        assert!(sql.contains("AVG"), "expected report query, got: {}", sql);
    }

    #[tokio::test]
    async fn numeric_movie_path_still_reaches_read() {
        let gw = FakeGateway::new(vec![FakeReply::Rows(vec![])]);
        let response = app(gw.clone()).oneshot(get("/api/peliculas/7")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(gw.logged_sql()[0].contains(r#"WHERE "id" ="#));
    }

    #[tokio::test]
    async fn all_report_routes_respond() {
        for path in [
            "/api/peliculas/director",
            "/api/peliculas/promedio",
            "/api/peliculas/actores",
            "/api/peliculas/mejor",
            "/api/peliculas/cantidad-calificaciones",
        ] {
            let gw = FakeGateway::new(vec![FakeReply::Rows(vec![])]);
            let response = app(gw).oneshot(get(path)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "route {}", path);
        }
    }

    #[tokio::test]
    async fn unknown_segment_is_404() {
        let gw = FakeGateway::new(vec![]);
        let response = app(gw).oneshot(get("/api/generos")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_numeric_id_is_400() {
        let gw = FakeGateway::new(vec![]);
        let response = app(gw).oneshot(get("/api/actores/abc")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_object_body_is_400() {
        let gw = FakeGateway::new(vec![]);
        let request = with_json_body("POST", "/api/directores", json!(["not", "an", "object"]));
        let response = app(gw).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_endpoint_reports_ok() {
        let gw = FakeGateway::new(vec![]);
        let response = app(gw).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "ok"}));
    }
}
