use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    CreatedId, MessageResponse, ValidatedJson,
    errors::responses::{
        BadRequestInvalidIdResponse, BadRequestValidationResponse, GatewayTimeoutResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use database::mongodb::format_id;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::EventResult;
use crate::models::{DeleteEventRequest, Event, EventInput, EventQuery, EventSort, UpdateEventRequest};
use crate::repository::EventRepository;
use crate::service::EventService;

/// OpenAPI documentation for Events API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_events,
        create_event,
        update_event,
        delete_event,
        get_event,
        update_event_by_id,
        delete_event_by_id,
    ),
    components(
        schemas(Event, EventInput, UpdateEventRequest, DeleteEventRequest, EventSort, CreatedId, MessageResponse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestInvalidIdResponse,
            GatewayTimeoutResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Events", description = "Event management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the events router with all HTTP endpoints
pub fn router<R: EventRepository + 'static>(service: EventService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/",
            get(list_events)
                .post(create_event)
                .put(update_event)
                .delete(delete_event),
        )
        .route(
            "/{id}",
            get(get_event)
                .put(update_event_by_id)
                .delete(delete_event_by_id),
        )
        .with_state(shared_service)
}

/// List events
///
/// `id` wins over `q`; both absent lists everything.
#[utoipa::path(
    get,
    path = "",
    tag = "Events",
    params(EventQuery),
    responses(
        (status = 200, description = "Matching events", body = Vec<Event>),
        (status = 400, response = BadRequestInvalidIdResponse),
        (status = 504, response = GatewayTimeoutResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Query(query): Query<EventQuery>,
) -> EventResult<Json<Vec<Event>>> {
    let events = service.list_events(query).await?;
    Ok(Json(events))
}

/// Create an event
#[utoipa::path(
    post,
    path = "",
    tag = "Events",
    request_body = EventInput,
    responses(
        (status = 201, description = "Event created", body = CreatedId),
        (status = 400, response = BadRequestValidationResponse),
        (status = 504, response = GatewayTimeoutResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    ValidatedJson(input): ValidatedJson<EventInput>,
) -> EventResult<impl IntoResponse> {
    let event = service.create_event(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedId {
            id: format_id(&event.id),
        }),
    ))
}

/// Replace an event, identifier in the body
#[utoipa::path(
    put,
    path = "",
    tag = "Events",
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 504, response = GatewayTimeoutResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    ValidatedJson(request): ValidatedJson<UpdateEventRequest>,
) -> EventResult<Json<Event>> {
    let event = service.update_event(&request.id, request.fields).await?;
    Ok(Json(event))
}

/// Delete an event, identifier in the body
#[utoipa::path(
    delete,
    path = "",
    tag = "Events",
    request_body = DeleteEventRequest,
    responses(
        (status = 200, description = "Event deleted successfully", body = MessageResponse),
        (status = 400, response = BadRequestInvalidIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    ValidatedJson(request): ValidatedJson<DeleteEventRequest>,
) -> EventResult<Json<MessageResponse>> {
    service.delete_event(&request.id).await?;
    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

/// Get an event by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event ID (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 400, response = BadRequestInvalidIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(id): Path<String>,
) -> EventResult<Json<Event>> {
    let event = service.get_event(&id).await?;
    Ok(Json(event))
}

/// Replace an event, identifier in the path
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event ID (24 hex characters)")
    ),
    request_body = EventInput,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_event_by_id<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<EventInput>,
) -> EventResult<Json<Event>> {
    let event = service.update_event(&id, input).await?;
    Ok(Json(event))
}

/// Delete an event, identifier in the path
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event ID (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Event deleted successfully", body = MessageResponse),
        (status = 400, response = BadRequestInvalidIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_event_by_id<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(id): Path<String>,
) -> EventResult<Json<MessageResponse>> {
    service.delete_event(&id).await?;
    Ok(Json(MessageResponse::new("Event deleted successfully")))
}
