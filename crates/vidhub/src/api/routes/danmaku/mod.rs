use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Extension, Path};
use axum::handler::Handler;
use axum::routing::{delete, get};
use axum::{Router, middleware};
use sea_orm::DatabaseConnection;

use crate::api::auth::auth;
use crate::api::error::InnerApiError;
use crate::api::request::{DanmakuRequest, DeleteDanmakuRequest, NewDanmakuRequest};
use crate::api::wrapper::{ApiError, ApiResponse, ValidatedJson, ValidatedQuery};
use crate::config::VersionedConfig;
use crate::danmaku::store::{self, NewDanmaku};
use crate::danmaku::{DEFAULT_COLOR, Danmaku, TYPE_SCROLL, fetch_merged, video_id};
use crate::upstream::HubClient;

pub(super) fn router() -> Router {
    Router::new()
        .route(
            "/danmaku",
            get(get_danmaku).post(create_danmaku.layer(middleware::from_fn(auth))),
        )
        .route(
            "/danmaku/{id}",
            delete(delete_danmaku.layer(middleware::from_fn(auth))),
        )
}

/// 合并本地与弹弹play 的弹幕，按时间升序返回
pub async fn get_danmaku(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(client): Extension<Arc<HubClient>>,
    ValidatedQuery(params): ValidatedQuery<DanmakuRequest>,
) -> Result<ApiResponse<Vec<Danmaku>>, ApiError> {
    let config = VersionedConfig::get().load_full();
    Ok(ApiResponse::ok(
        fetch_merged(
            &db,
            &client.client,
            &config.danmaku,
            &params.source,
            &params.title,
            params.episode,
        )
        .await,
    ))
}

/// 发送一条弹幕
pub async fn create_danmaku(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    ValidatedJson(payload): ValidatedJson<NewDanmakuRequest>,
) -> Result<ApiResponse<Danmaku>, ApiError> {
    let model = store::insert(
        &db,
        NewDanmaku {
            video_id: video_id(&payload.source, &payload.title, payload.episode),
            user_id: payload.user_id,
            time: payload.time,
            text: payload.text.trim().to_owned(),
            color: payload
                .color
                .map(|c| c.to_uppercase())
                .unwrap_or_else(|| DEFAULT_COLOR.to_owned()),
            r#type: payload.r#type.unwrap_or(TYPE_SCROLL),
        },
    )
    .await?;
    info!("用户 {} 在 {} 发送弹幕 {}", model.user_id, model.video_id, model.id);
    Ok(ApiResponse::ok(Danmaku::from(model)))
}

/// 删除一条弹幕，只有发送者本人可以删除
pub async fn delete_danmaku(
    Path(id): Path<i32>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    ValidatedQuery(params): ValidatedQuery<DeleteDanmakuRequest>,
) -> Result<ApiResponse<bool>, ApiError> {
    let Some(model) = store::find(&db, id).await? else {
        return Err(InnerApiError::NotFound(format!("弹幕 {id}")).into());
    };
    if model.user_id != params.user_id {
        return Err(InnerApiError::Forbidden(format!("无权删除弹幕 {id}")).into());
    }
    Ok(ApiResponse::ok(store::delete(&db, id).await?))
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use sea_orm::Database;
    use tower::ServiceExt;
    use vidhub_migration::{Migrator, MigratorTrait};

    use super::*;

    async fn app() -> (Router, Arc<DatabaseConnection>) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let db = Arc::new(db);
        (crate::api::router().layer(Extension(db.clone())), db)
    }

    fn post_request(token: Option<&str>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/danmaku")
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", token);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn delete_request(id: i32, user_id: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/danmaku/{id}?user_id={user_id}"))
            .header("Authorization", "test-token")
            .body(Body::empty())
            .unwrap()
    }

    fn payload(text: &str) -> serde_json::Value {
        serde_json::json!({
            "source": "dytt",
            "title": "三体",
            "episode": 1,
            "userId": "alice",
            "time": 12.5,
            "text": text,
        })
    }

    async fn json(res: Response) -> serde_json::Value {
        serde_json::from_slice(&to_bytes(res.into_body(), usize::MAX).await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_create_danmaku_through_router() {
        let (app, db) = app().await;

        let res = app.clone().oneshot(post_request(None, payload("好"))).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let res = app.clone().oneshot(post_request(Some("wrong"), payload("好"))).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app
            .clone()
            .oneshot(post_request(Some("test-token"), payload(&"弹".repeat(101))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(store::list(&db, "dytt_三体_1").await.unwrap().is_empty());

        let res = app
            .oneshot(post_request(Some("test-token"), payload(&"弹".repeat(100))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = json(res).await;
        assert_eq!(body["data"]["videoId"], "dytt_三体_1");
        assert_eq!(body["data"]["color"], DEFAULT_COLOR);
        assert_eq!(store::list(&db, "dytt_三体_1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_danmaku_through_router() {
        let (app, db) = app().await;
        let model = store::insert(
            &db,
            NewDanmaku {
                video_id: "dytt_三体_1".to_owned(),
                user_id: "alice".to_owned(),
                time: 1.0,
                text: "前排".to_owned(),
                color: DEFAULT_COLOR.to_owned(),
                r#type: TYPE_SCROLL,
            },
        )
        .await
        .unwrap();

        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/danmaku/{}?user_id=alice", model.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app.clone().oneshot(delete_request(model.id + 1, "alice")).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = app.clone().oneshot(delete_request(model.id, "bob")).await.unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert!(store::find(&db, model.id).await.unwrap().is_some());

        let res = app.oneshot(delete_request(model.id, "alice")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json(res).await["data"], true);
        assert!(store::find(&db, model.id).await.unwrap().is_none());
    }
}
