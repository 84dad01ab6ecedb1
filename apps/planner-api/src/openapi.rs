//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Event Planner API",
        version = "0.1.0",
        description = "Events, attendees with food costs, and per-event tasks over MongoDB",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/events", api = domain_events::ApiDoc),
        (path = "/api/attendees", api = domain_attendees::ApiDoc),
        (path = "/api/tasks", api = domain_tasks::ApiDoc)
    )
)]
pub struct ApiDoc;
