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
        BadRequestInvalidIdResponse, BadRequestValidationResponse, DuplicateKeyResponse,
        GatewayTimeoutResponse, InternalServerErrorResponse, NotFoundResponse,
    },
};
use database::mongodb::format_id;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::AttendeeResult;
use crate::models::{
    Attendee, AttendeeIdQuery, AttendeePatch, AttendeePutOutcome, AttendeePutRequest, AttendeeRef,
    BulkUpdateResult, CreateAttendee, EventIdQuery, FoodCostSummary,
};
use crate::repository::AttendeeRepository;
use crate::service::AttendeeService;

/// OpenAPI documentation for Attendees API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_attendees,
        food_cost_summary,
        get_attendee,
        add_attendee,
        update_attendees,
        delete_attendee,
    ),
    components(
        schemas(
            Attendee,
            CreateAttendee,
            AttendeePatch,
            AttendeeRef,
            AttendeePutRequest,
            AttendeePutOutcome,
            BulkUpdateResult,
            FoodCostSummary,
            CreatedId,
            MessageResponse
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestInvalidIdResponse,
            DuplicateKeyResponse,
            GatewayTimeoutResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Attendees", description = "Event attendees and food costs")
    )
)]
pub struct ApiDoc;

/// Create the attendees router with all HTTP endpoints
pub fn router<R: AttendeeRepository + 'static>(service: AttendeeService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/",
            get(list_attendees)
                .post(add_attendee)
                .put(update_attendees)
                .delete(delete_attendee),
        )
        .route("/summary", get(food_cost_summary))
        .route("/{id}", get(get_attendee))
        .with_state(shared_service)
}

/// List the attendees of an event
#[utoipa::path(
    get,
    path = "",
    tag = "Attendees",
    params(EventIdQuery),
    responses(
        (status = 200, description = "Attendees of the event, oldest first", body = Vec<Attendee>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 504, response = GatewayTimeoutResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_attendees<R: AttendeeRepository>(
    State(service): State<Arc<AttendeeService<R>>>,
    Query(query): Query<EventIdQuery>,
) -> AttendeeResult<Json<Vec<Attendee>>> {
    let attendees = service.list_attendees(query.event_id.as_deref()).await?;
    Ok(Json(attendees))
}

/// Attendee count and total food cost of an event
#[utoipa::path(
    get,
    path = "/summary",
    tag = "Attendees",
    params(EventIdQuery),
    responses(
        (status = 200, description = "Food cost summary", body = FoodCostSummary),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn food_cost_summary<R: AttendeeRepository>(
    State(service): State<Arc<AttendeeService<R>>>,
    Query(query): Query<EventIdQuery>,
) -> AttendeeResult<Json<FoodCostSummary>> {
    let summary = service.food_cost_summary(query.event_id.as_deref()).await?;
    Ok(Json(summary))
}

/// Get an attendee by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Attendees",
    params(
        ("id" = String, Path, description = "Attendee ID (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Attendee found", body = Attendee),
        (status = 400, response = BadRequestInvalidIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_attendee<R: AttendeeRepository>(
    State(service): State<Arc<AttendeeService<R>>>,
    Path(id): Path<String>,
) -> AttendeeResult<Json<Attendee>> {
    let attendee = service.get_attendee(&id).await?;
    Ok(Json(attendee))
}

/// Register an attendee
#[utoipa::path(
    post,
    path = "",
    tag = "Attendees",
    request_body = CreateAttendee,
    responses(
        (status = 201, description = "Attendee added", body = CreatedId),
        (status = 400, response = BadRequestValidationResponse),
        (status = 504, response = GatewayTimeoutResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_attendee<R: AttendeeRepository>(
    State(service): State<Arc<AttendeeService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateAttendee>,
) -> AttendeeResult<impl IntoResponse> {
    let attendee = service.add_attendee(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedId {
            id: format_id(&attendee.id),
        }),
    ))
}

/// Update one attendee, or set the food cost of several
///
/// `{"attendee": {"_id", ...}}` returns the updated attendee;
/// `{"eventId", "foodCost", "attendees"}` returns `{"updatedCount"}`.
#[utoipa::path(
    put,
    path = "",
    tag = "Attendees",
    request_body = AttendeePutRequest,
    responses(
        (status = 200, description = "Attendee or bulk update result", body = AttendeePutOutcome),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 504, response = GatewayTimeoutResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_attendees<R: AttendeeRepository>(
    State(service): State<Arc<AttendeeService<R>>>,
    ValidatedJson(request): ValidatedJson<AttendeePutRequest>,
) -> AttendeeResult<Json<AttendeePutOutcome>> {
    let outcome = service.apply_put(request).await?;
    Ok(Json(outcome))
}

/// Delete an attendee
#[utoipa::path(
    delete,
    path = "",
    tag = "Attendees",
    params(AttendeeIdQuery),
    responses(
        (status = 200, description = "Attendee deleted successfully", body = MessageResponse),
        (status = 400, response = BadRequestInvalidIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_attendee<R: AttendeeRepository>(
    State(service): State<Arc<AttendeeService<R>>>,
    Query(query): Query<AttendeeIdQuery>,
) -> AttendeeResult<Json<MessageResponse>> {
    service
        .delete_attendee(query.id.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(MessageResponse::new("Attendee deleted successfully")))
}
