//! HTTP handlers for the products API

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{ErrorResponse, JsonBody, KeyPath, UuidPath, UuidPathPair, ValidationFailure};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::{Product, ProductOption, ProductOptions, Products};
use crate::repository::{ProductOptionRepository, ProductRepository};
use crate::service::ProductService;

/// OpenAPI documentation for the products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product_or_search,
        update_product,
        delete_product,
        list_options,
        create_option,
        get_option,
        update_option,
        delete_option,
    ),
    components(schemas(
        Product,
        ProductOption,
        Products,
        ProductOptions,
        ErrorResponse,
        ValidationFailure
    )),
    tags(
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Options", description = "Product option endpoints")
    )
)]
pub struct ApiDoc;

type SharedService<P, O> = State<Arc<ProductService<P, O>>>;

/// Build the products router. Mount it under `/products`.
pub fn router<P, O>(service: ProductService<P, O>) -> Router
where
    P: ProductRepository + 'static,
    O: ProductOptionRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product_or_search)
                .put(update_product)
                .delete(delete_product),
        )
        .route("/{id}/options", get(list_options).post(create_option))
        .route(
            "/{id}/options/{option_id}",
            get(get_option).put(update_option).delete(delete_option),
        )
        .with_state(shared_service)
}

/// List all products
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    responses(
        (status = 200, description = "All products", body = Products)
    )
)]
async fn list_products<P: ProductRepository, O: ProductOptionRepository>(
    State(service): SharedService<P, O>,
) -> ProductResult<Json<Products>> {
    let products = service.get_all_products().await?;
    Ok(Json(products.into()))
}

/// Create a product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = Product,
    responses(
        (status = 200, description = "Product created", body = Product),
        (status = 400, description = "Invalid payload", body = [ValidationFailure]),
        (status = 409, description = "A product with this id already exists")
    )
)]
async fn create_product<P: ProductRepository, O: ProductOptionRepository>(
    State(service): SharedService<P, O>,
    JsonBody(input): JsonBody<Product>,
) -> ProductResult<Json<Product>> {
    let product = service.create_product(input).await?;
    Ok(Json(product))
}

/// Get a product by id, or search products by name.
///
/// A key that parses as a UUID selects the product with that id. Any other
/// key lists the products whose name contains it, ignoring case.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = String, Path, description = "Product id, or a name fragment to search for")
    ),
    responses(
        (status = 200, description = "The product, or `{items}` when searching by name", body = Product),
        (status = 400, description = "Path segment could not be decoded", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
async fn get_product_or_search<P: ProductRepository, O: ProductOptionRepository>(
    State(service): SharedService<P, O>,
    KeyPath(key): KeyPath,
) -> ProductResult<Response> {
    match Uuid::parse_str(&key) {
        Ok(id) => {
            let product = service.get_product(id).await?;
            Ok(Json(product).into_response())
        }
        Err(_) => {
            let products = service.search_products(&key).await?;
            Ok(Json(Products::from(products)).into_response())
        }
    }
}

/// Update a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product id")
    ),
    request_body = Product,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Invalid payload", body = [ValidationFailure]),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
async fn update_product<P: ProductRepository, O: ProductOptionRepository>(
    State(service): SharedService<P, O>,
    UuidPath(id): UuidPath,
    JsonBody(input): JsonBody<Product>,
) -> ProductResult<Json<Product>> {
    let product = service.update_product(id, input).await?;
    Ok(Json(product))
}

/// Delete a product. Its options are kept.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
async fn delete_product<P: ProductRepository, O: ProductOptionRepository>(
    State(service): SharedService<P, O>,
    UuidPath(id): UuidPath,
) -> ProductResult<StatusCode> {
    service.delete_product(id).await?;
    Ok(StatusCode::OK)
}

/// List the options of a product
#[utoipa::path(
    get,
    path = "/{id}/options",
    tag = "Options",
    params(
        ("id" = Uuid, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Options of the product", body = ProductOptions)
    )
)]
async fn list_options<P: ProductRepository, O: ProductOptionRepository>(
    State(service): SharedService<P, O>,
    UuidPath(product_id): UuidPath,
) -> ProductResult<Json<ProductOptions>> {
    let options = service.get_options(product_id).await?;
    Ok(Json(options.into()))
}

/// Create an option for a product
#[utoipa::path(
    post,
    path = "/{id}/options",
    tag = "Options",
    params(
        ("id" = Uuid, Path, description = "Product id; overrides `productId` in the body")
    ),
    request_body = ProductOption,
    responses(
        (status = 200, description = "Option created", body = ProductOption),
        (status = 400, description = "Invalid payload", body = [ValidationFailure]),
        (status = 409, description = "An option with this id already exists")
    )
)]
async fn create_option<P: ProductRepository, O: ProductOptionRepository>(
    State(service): SharedService<P, O>,
    UuidPath(product_id): UuidPath,
    JsonBody(input): JsonBody<ProductOption>,
) -> ProductResult<Json<ProductOption>> {
    let option = service.create_option(product_id, input).await?;
    Ok(Json(option))
}

/// Get an option by id. The product segment is not checked against the
/// option's owner.
#[utoipa::path(
    get,
    path = "/{id}/options/{option_id}",
    tag = "Options",
    params(
        ("id" = Uuid, Path, description = "Product id"),
        ("option_id" = Uuid, Path, description = "Option id")
    ),
    responses(
        (status = 200, description = "Option found", body = ProductOption),
        (status = 404, description = "Option not found", body = ErrorResponse)
    )
)]
async fn get_option<P: ProductRepository, O: ProductOptionRepository>(
    State(service): SharedService<P, O>,
    UuidPathPair(_product_id, id): UuidPathPair,
) -> ProductResult<Json<ProductOption>> {
    let option = service.get_option(id).await?;
    Ok(Json(option))
}

/// Update an option of a product
#[utoipa::path(
    put,
    path = "/{id}/options/{option_id}",
    tag = "Options",
    params(
        ("id" = Uuid, Path, description = "Product id"),
        ("option_id" = Uuid, Path, description = "Option id")
    ),
    request_body = ProductOption,
    responses(
        (status = 200, description = "Option updated", body = ProductOption),
        (status = 400, description = "Invalid payload", body = [ValidationFailure]),
        (status = 404, description = "Option not found", body = ErrorResponse)
    )
)]
async fn update_option<P: ProductRepository, O: ProductOptionRepository>(
    State(service): SharedService<P, O>,
    UuidPathPair(_product_id, id): UuidPathPair,
    JsonBody(input): JsonBody<ProductOption>,
) -> ProductResult<Json<ProductOption>> {
    let option = service.update_option(id, input).await?;
    Ok(Json(option))
}

/// Delete an option of a product
#[utoipa::path(
    delete,
    path = "/{id}/options/{option_id}",
    tag = "Options",
    params(
        ("id" = Uuid, Path, description = "Product id"),
        ("option_id" = Uuid, Path, description = "Option id")
    ),
    responses(
        (status = 200, description = "Option deleted"),
        (status = 404, description = "Option not found", body = ErrorResponse)
    )
)]
async fn delete_option<P: ProductRepository, O: ProductOptionRepository>(
    State(service): SharedService<P, O>,
    UuidPathPair(_product_id, id): UuidPathPair,
) -> ProductResult<StatusCode> {
    service.delete_option(id).await?;
    Ok(StatusCode::OK)
}
