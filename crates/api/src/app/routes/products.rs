use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Extension, Path},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use catalog_core::DomainError;
use catalog_products::{NewProduct, ProductId, ProductPatch, ValidationMode};

use crate::app::errors::{self, ApiError};
use crate::app::payload::Payload;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// Parse the `:id` segment. A segment that does not even decode (e.g. `%FF`)
/// is reported through the same envelope, echoing the raw segment.
fn product_id(path: Result<Path<String>, PathRejection>, uri: &Uri) -> Result<ProductId, DomainError> {
    match path {
        Ok(Path(id)) => ProductId::parse(&id),
        Err(rejection) => {
            tracing::debug!(%rejection, "product id segment is not decodable");
            ProductId::parse(uri.path().rsplit('/').next().unwrap_or_default())
        }
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Payload(payload): Payload,
) -> Result<Response, ApiError> {
    let new_product = NewProduct::from_payload(&payload)
        .map_err(|report| errors::rejected_payload(ValidationMode::Create, &report))?;

    let product = services.products().create(new_product).await?;
    tracing::info!(product_id = %product.id_typed(), "product created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Product created successfully",
            "product": product,
        })),
    )
        .into_response())
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Response, ApiError> {
    let products = services.products().find_all().await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Products found successfully",
            "totalItems": products.len(),
            "products": products,
        })),
    )
        .into_response())
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    uri: Uri,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let product_id = product_id(path, &uri)?;

    let product = services
        .products()
        .find_by_id(&product_id)
        .await?
        .ok_or(DomainError::NotFound)?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Product found successfully",
            "product": product,
        })),
    )
        .into_response())
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    uri: Uri,
    path: Result<Path<String>, PathRejection>,
    Payload(payload): Payload,
) -> Result<Response, ApiError> {
    // Identifier first: a bad id wins over a bad body.
    let product_id = product_id(path, &uri)?;
    let patch = ProductPatch::from_payload(&payload)
        .map_err(|report| errors::rejected_payload(ValidationMode::Update, &report))?;

    let product = services
        .products()
        .update_by_id(&product_id, patch)
        .await?
        .ok_or(DomainError::NotFound)?;
    tracing::info!(product_id = %product_id, "product updated");

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Product updated successfully",
            "product": product,
        })),
    )
        .into_response())
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    uri: Uri,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let product_id = product_id(path, &uri)?;

    services
        .products()
        .delete_by_id(&product_id)
        .await?
        .ok_or(DomainError::NotFound)?;
    tracing::info!(product_id = %product_id, "product deleted");

    Ok(errors::message(StatusCode::OK, "Product deleted successfully"))
}
