use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub name: String, pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct NewUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `Admin`, `Employee` or `Customer`
    pub role: String,
}

#[derive(ToSchema)]
pub struct DeliveryRequest {
    /// Product ID
    pub product: Uuid,
    pub company_name: String,
    /// RFC 3339 timestamp
    pub date: String,
    pub price: f64,
    /// `Pending`, `Completed` or `Cancelled`
    pub status: Option<String>,
    pub quantity: i32,
}

#[derive(ToSchema)]
pub struct TransactionRequest {
    /// User ID
    pub user: Uuid,
    /// Product IDs
    pub product: Vec<Uuid>,
    pub status: Option<String>,
    pub date: String,
}

#[derive(ToSchema)]
pub struct ProductImageDoc { pub public_id: String, pub url: String, pub originalname: String }

#[derive(ToSchema)]
pub struct ProductRequest {
    pub user: Uuid,
    pub product_name: String,
    pub r#type: String,
    pub class: String,
    /// `Local` or `International`
    pub variant: Option<String>,
    pub image: Vec<ProductImageDoc>,
    /// Delivery ID the product is scheduled on
    pub schedule: Option<Uuid>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::list_users,
        crate::routes::auth::create_user,
        crate::routes::deliveries::list,
        crate::routes::deliveries::get,
        crate::routes::deliveries::create,
        crate::routes::deliveries::update,
        crate::routes::deliveries::delete,
        crate::routes::transactions::list,
        crate::routes::transactions::get,
        crate::routes::transactions::create,
        crate::routes::transactions::update,
        crate::routes::transactions::delete,
        crate::routes::products::list,
        crate::routes::products::get,
        crate::routes::products::create,
        crate::routes::products::update,
        crate::routes::products::delete,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            NewUserRequest,
            DeliveryRequest,
            TransactionRequest,
            ProductImageDoc,
            ProductRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "deliveries"),
        (name = "transactions"),
        (name = "products")
    )
)]
pub struct ApiDoc;
