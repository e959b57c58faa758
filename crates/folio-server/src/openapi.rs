use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Folio API",
        version = "0.1.0",
        description = "Teaching demo: CRUD over an in-memory book list with JWT bearer authentication."
    ),
    paths(
        crate::routes::list_books,
        crate::routes::search_books,
        crate::routes::get_book,
        crate::routes::create_book,
        crate::routes::update_book,
        crate::routes::delete_book,
        crate::routes::login,
        crate::routes::refresh,
        crate::routes::openapi_document,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::BookResponse,
        crate::dto::BookCreate,
        crate::dto::BookUpdate,
        crate::dto::TokenRequest,
        crate::dto::TokenResponse,
        crate::dto::RefreshRequest,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "books", description = "Book collection CRUD"),
        (name = "auth", description = "Token issuance and refresh"),
        (name = "system", description = "Health and API description"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Adds the Bearer token security scheme to the OpenAPI spec.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token obtained from POST /token."))
                        .build(),
                ),
            );
        }
    }
}
