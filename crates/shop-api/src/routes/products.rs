//! 상품 endpoint.
//!
//! 조회는 공개이며, 생성/수정/삭제는 상품 리소스 게이트(레벨 1 이하) 뒤에 있습니다.
//! 경로의 상품 제목은 `-`를 공백으로 바꾼 슬러그입니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use shop_core::{Product, PRODUCT_TYPE_TRACKSUIT, PRODUCT_TYPE_WINDBREAKER};
use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::{gated, CurrentUser, ResourceClass};
use crate::error::{api_error, shop_error, ApiErrorResponse, ApiResult};
use crate::routes::{CreatedResponse, MessageResponse};
use crate::state::AppState;

fn product_not_found(what: impl std::fmt::Display) -> (StatusCode, Json<ApiErrorResponse>) {
    api_error(
        StatusCode::NOT_FOUND,
        "PRODUCT_NOT_FOUND",
        format!("product not found: {}", what),
    )
}

/// 전체 상품 목록.
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    responses((status = 200, description = "상품 목록", body = Vec<Product>))
)]
pub async fn list_products(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Product>>> {
    let products = state.store.list_products().await.map_err(shop_error)?;
    debug!(count = products.len(), "Products listed");
    Ok(Json(products))
}

/// 트랙수트 목록.
#[utoipa::path(
    get,
    path = "/api/products/tracksuits",
    tag = "products",
    responses((status = 200, description = "트랙수트 상품 목록", body = Vec<Product>))
)]
pub async fn list_tracksuits(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Product>>> {
    list_by_type(&state, PRODUCT_TYPE_TRACKSUIT).await
}

/// 윈드브레이커 목록.
#[utoipa::path(
    get,
    path = "/api/products/windbreakers",
    tag = "products",
    responses((status = 200, description = "윈드브레이커 상품 목록", body = Vec<Product>))
)]
pub async fn list_windbreakers(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Product>>> {
    list_by_type(&state, PRODUCT_TYPE_WINDBREAKER).await
}

async fn list_by_type(state: &AppState, product_type: &str) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .store
        .list_products_by_type(product_type)
        .await
        .map_err(shop_error)?;
    Ok(Json(products))
}

/// 제목 슬러그로 상품 조회.
#[utoipa::path(
    get,
    path = "/api/products/{title}",
    tag = "products",
    params(("title" = String, Path, description = "상품 제목 (공백은 `-`)")),
    responses(
        (status = 200, description = "상품", body = Product),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    )
)]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Product>> {
    let title = Product::title_from_slug(&slug);
    let product = state
        .store
        .find_product_by_title(&title)
        .await
        .map_err(shop_error)?
        .ok_or_else(|| product_not_found(&title))?;

    Ok(Json(product))
}

/// 상품 생성.
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "products",
    request_body = Product,
    responses(
        (status = 201, description = "생성된 상품 ID", body = CreatedResponse),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "권한 부족", body = ApiErrorResponse),
        (status = 409, description = "이미 존재하는 제목", body = ApiErrorResponse)
    )
)]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Json(product): Json<Product>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let product = state.store.create_product(product).await.map_err(shop_error)?;

    info!(
        actor_id = actor.id,
        product_id = product.id,
        title = %product.title,
        "Product created"
    );
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: product.id })))
}

/// 상품 수정.
///
/// 본문의 `id`로 대상을 찾습니다.
#[utoipa::path(
    put,
    path = "/api/products",
    tag = "products",
    request_body = Product,
    responses(
        (status = 200, description = "수정 완료", body = MessageResponse),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    )
)]
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Json(product): Json<Product>,
) -> ApiResult<Json<MessageResponse>> {
    if !state.store.update_product(&product).await.map_err(shop_error)? {
        return Err(product_not_found(product.id));
    }

    info!(actor_id = actor.id, product_id = product.id, "Product updated");
    Ok(Json(MessageResponse::new("product updated")))
}

/// 제목 슬러그로 상품 삭제.
#[utoipa::path(
    delete,
    path = "/api/products/{title}",
    tag = "products",
    params(("title" = String, Path, description = "상품 제목 (공백은 `-`)")),
    responses(
        (status = 200, description = "삭제 완료", body = MessageResponse),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    )
)]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Path(slug): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let title = Product::title_from_slug(&slug);
    let product = state
        .store
        .find_product_by_title(&title)
        .await
        .map_err(shop_error)?
        .ok_or_else(|| product_not_found(&title))?;

    if !state.store.delete_product(product.id).await.map_err(shop_error)? {
        return Err(product_not_found(&title));
    }

    info!(actor_id = actor.id, product_id = product.id, title = %title, "Product deleted");
    Ok(Json(MessageResponse::new("product deleted")))
}

/// 상품 라우터 생성.
pub fn products_router(state: &AppState) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(list_products).merge(gated(
                state,
                ResourceClass::Product,
                post(create_product).put(update_product),
            )),
        )
        .route("/tracksuits", get(list_tracksuits))
        .route("/windbreakers", get(list_windbreakers))
        .route(
            "/{title}",
            get(get_product).merge(gated(state, ResourceClass::Product, delete(delete_product))),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MemoryStore, Storage};
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{
            header::{CONTENT_TYPE, COOKIE},
            Request,
        },
    };
    use rust_decimal_macros::dec;
    use shop_core::NewUser;
    use tower::ServiceExt;

    fn sample(title: &str, product_type: &str) -> Product {
        Product {
            id: 0,
            product_type: product_type.to_string(),
            title: title.to_string(),
            description: "nylon".to_string(),
            price: dec!(49.50),
            gender: "unisex".to_string(),
            color: "navy".to_string(),
            small: 2,
            medium: 4,
            large: 1,
            image_url: "/img/p.png".to_string(),
            image_alt: "product".to_string(),
        }
    }

    async fn setup(level: i32) -> (Router, Arc<MemoryStore>, String) {
        let store = Arc::new(MemoryStore::new());
        let editor = store
            .create_user(NewUser {
                username: "editor".to_string(),
                password_hash: "unused".to_string(),
                level,
            })
            .await
            .unwrap();
        store
            .create_product(sample("classic tracksuit", PRODUCT_TYPE_TRACKSUIT))
            .await
            .unwrap();
        store
            .create_product(sample("rain shell", PRODUCT_TYPE_WINDBREAKER))
            .await
            .unwrap();

        let state = Arc::new(create_test_state(store.clone()));
        let cookie = format!("token={}", state.issuer.issue(editor.id).unwrap());
        let app = Router::new()
            .nest("/api/products", products_router(&state))
            .with_state(state);
        (app, store, cookie)
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_public_reads() {
        let (app, _, _) = setup(2).await;

        let all = app.clone().oneshot(get_req("/api/products")).await.unwrap();
        assert_eq!(all.status(), StatusCode::OK);
        assert_eq!(json_body(all).await.as_array().unwrap().len(), 2);

        let tracksuits = app
            .clone()
            .oneshot(get_req("/api/products/tracksuits"))
            .await
            .unwrap();
        let json = json_body(tracksuits).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["type"], "tracksuit");

        let by_slug = app
            .clone()
            .oneshot(get_req("/api/products/rain-shell"))
            .await
            .unwrap();
        assert_eq!(by_slug.status(), StatusCode::OK);
        let json = json_body(by_slug).await;
        assert_eq!(json["title"], "rain shell");
        assert_eq!(json["price"], 49.5);
        assert_eq!(json["imageUrl"], "/img/p.png");

        let missing = app.oneshot(get_req("/api/products/no-such-thing")).await.unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_requires_cookie() {
        let (app, _, _) = setup(1).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/products")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::to_string(&sample("new one", PRODUCT_TYPE_TRACKSUIT)).unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_level_one_manages_products() {
        let (app, store, cookie) = setup(1).await;

        let created = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/products")
                    .header(COOKIE, &cookie)
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::to_string(&sample("storm jacket", PRODUCT_TYPE_WINDBREAKER))
                            .unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let id = json_body(created).await["id"].as_i64().unwrap() as i32;

        let mut updated = store.find_product_by_id(id).await.unwrap().unwrap();
        updated.price = dec!(79.00);
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/products")
                    .header(COOKIE, &cookie)
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_string(&updated).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            store.find_product_by_id(id).await.unwrap().unwrap().price,
            dec!(79.00)
        );

        let deleted = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/products/storm-jacket")
                    .header(COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::OK);
        assert!(store.find_product_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_listing_path_title_rejected() {
        let (app, store, cookie) = setup(1).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/products")
                    .header(COOKIE, &cookie)
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::to_string(&sample("windbreakers", PRODUCT_TYPE_WINDBREAKER))
                            .unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        // 제목 경로가 유형 목록 경로에 가려지므로 생성 거부
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.find_product_by_title("windbreakers").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_level_two_cannot_delete() {
        let (app, store, cookie) = setup(2).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/products/rain-shell")
                    .header(COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(store.find_product_by_title("rain shell").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_unknown_product_is_not_found() {
        let (app, _, cookie) = setup(0).await;
        let mut ghost = sample("ghost", PRODUCT_TYPE_TRACKSUIT);
        ghost.id = 404;

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/products")
                    .header(COOKIE, &cookie)
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_string(&ghost).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
