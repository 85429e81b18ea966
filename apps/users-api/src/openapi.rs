//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users API",
        version = "0.1.0",
        description = "MongoDB-based REST API for managing users",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3001", description = "Local development server")
    ),
    nest(
        (path = "/api/users", api = domain_users::ApiDoc)
    ),
    tags(
        (name = "Users", description = "User management endpoints (MongoDB)")
    )
)]
pub struct ApiDoc;
