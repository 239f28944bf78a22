pub mod auth;
pub mod categories;
pub mod config;
pub mod db;
pub mod error;
pub mod orders;
pub mod products;
pub mod users;
pub mod validation;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{
    guarded, login_handler, AccessPolicy, AuthService, CredentialStore, Gate, PasswordService,
    PgCredentialStore, TokenService,
};
use categories::{CategoryRepository, CategoryService};
use config::AuthConfig;
use orders::{OrderItemService, OrderItemsRepository, OrderService, OrdersRepository};
use products::{ProductRepository, ProductService};
use users::{UserRepository, UserService};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::login_handler,
        users::handlers::create_user,
        users::handlers::list_users,
        users::handlers::get_user,
        users::handlers::update_user,
        users::handlers::delete_user,
        categories::handlers::create_category,
        categories::handlers::list_categories,
        categories::handlers::get_category,
        categories::handlers::update_category,
        categories::handlers::delete_category,
        products::handlers::create_product,
        products::handlers::list_products,
        products::handlers::get_product,
        products::handlers::update_product,
        products::handlers::delete_product,
        orders::handlers::create_order_handler,
        orders::handlers::list_orders_handler,
        orders::handlers::get_order_handler,
        orders::handlers::update_order_handler,
        orders::handlers::delete_order_handler,
        orders::handlers::create_order_item_handler,
        orders::handlers::list_order_items_handler,
        orders::handlers::get_order_item_handler,
        orders::handlers::update_order_item_handler,
        orders::handlers::delete_order_item_handler,
    ),
    components(
        schemas(
            error::ErrorResponse,
            auth::models::Role,
            auth::models::LoginRequest,
            auth::models::LoginResponse,
            users::models::UserResponse,
            users::models::UserRegistration,
            users::models::UserUpdate,
            categories::models::Category,
            categories::models::CategoryRequest,
            products::models::Product,
            products::models::ProductRequest,
            orders::models::OrderLine,
            orders::models::OrderRequest,
            orders::models::OrderResponse,
            orders::models::OrderItem,
            orders::models::OrderItemRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Token issuance"),
        (name = "users", description = "User registration and management"),
        (name = "categories", description = "Product categories"),
        (name = "products", description = "Product catalogue"),
        (name = "orders", description = "Orders and their lines"),
        (name = "order-items", description = "Individual order lines")
    ),
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "REST backend for users, catalogue and orders with bearer-token authorization"
    )
)]
pub struct ApiDoc;

/// Registers the `bearerAuth` scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub auth: AuthService,
    pub users: UserService,
    pub categories: CategoryService,
    pub products: ProductService,
    pub orders: OrderService,
    pub order_items: OrderItemService,
}

impl AppState {
    /// Production wiring: PostgreSQL-backed credentials, default Argon2 cost
    pub fn new(pool: PgPool, auth_config: &AuthConfig) -> Self {
        let credentials: Arc<dyn CredentialStore> = Arc::new(PgCredentialStore::new(pool.clone()));
        Self::from_parts(
            pool,
            Arc::new(TokenService::new(auth_config)),
            PasswordService::default(),
            credentials,
        )
    }

    pub fn from_parts(
        pool: PgPool,
        tokens: Arc<TokenService>,
        passwords: PasswordService,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            auth: AuthService::new(credentials, passwords.clone(), tokens.clone()),
            users: UserService::new(UserRepository::new(pool.clone()), passwords),
            categories: CategoryService::new(CategoryRepository::new(pool.clone())),
            products: ProductService::new(ProductRepository::new(pool.clone())),
            orders: OrderService::new(OrdersRepository::new(pool.clone())),
            order_items: OrderItemService::new(OrderItemsRepository::new(pool)),
            tokens,
        }
    }
}

/// Creates and configures the application router
///
/// Every route declares its access policy here; handlers never re-check it.
pub fn create_router(state: AppState) -> Router {
    let tokens = state.tokens.clone();
    let gate = |policy: AccessPolicy| Gate::new(tokens.clone(), policy);

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Authentication
        .route("/api/auth/login", post(login_handler))
        // Users
        .route(
            "/api/users",
            post(users::create_user)
                .merge(guarded(get(users::list_users), gate(AccessPolicy::ADMIN_ONLY))),
        )
        .route(
            "/api/users/:id",
            guarded(
                get(users::get_user)
                    .patch(users::update_user)
                    .delete(users::delete_user),
                gate(AccessPolicy::Authenticated),
            ),
        )
        // Categories
        .route(
            "/api/categories",
            get(categories::list_categories)
                .merge(guarded(post(categories::create_category), gate(AccessPolicy::STAFF))),
        )
        .route(
            "/api/categories/:id",
            guarded(
                get(categories::get_category)
                    .put(categories::update_category)
                    .delete(categories::delete_category),
                gate(AccessPolicy::STAFF),
            ),
        )
        // Products
        .route(
            "/api/products",
            get(products::list_products)
                .merge(guarded(post(products::create_product), gate(AccessPolicy::STAFF))),
        )
        .route(
            "/api/products/:id",
            guarded(
                get(products::get_product)
                    .put(products::update_product)
                    .delete(products::delete_product),
                gate(AccessPolicy::STAFF),
            ),
        )
        // Orders
        .route(
            "/api/orders",
            guarded(
                get(orders::list_orders_handler).post(orders::create_order_handler),
                gate(AccessPolicy::Authenticated),
            ),
        )
        .route(
            "/api/orders/:id",
            guarded(
                get(orders::get_order_handler)
                    .put(orders::update_order_handler)
                    .delete(orders::delete_order_handler),
                gate(AccessPolicy::Authenticated),
            ),
        )
        // Order items
        .route(
            "/api/order-items",
            guarded(
                get(orders::list_order_items_handler).post(orders::create_order_item_handler),
                gate(AccessPolicy::BACK_OFFICE),
            ),
        )
        .route(
            "/api/order-items/:id",
            guarded(
                get(orders::get_order_item_handler)
                    .put(orders::update_order_item_handler)
                    .delete(orders::delete_order_item_handler),
                gate(AccessPolicy::BACK_OFFICE),
            ),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod tests;
