use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};
use tracing::warn;

use crate::database::{self, Health};
use crate::http::AppState;
use crate::models::{CreateProductRequest, NotifyRequest, Product};
use crate::queue::QueueClient;

type ApiError = (StatusCode, Json<Value>);

fn error_response(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

pub async fn hello_world() -> Json<Value> {
    Json(json!({ "message": "Hello World" }))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(database::health(&state.db).await)
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    if !request.is_valid() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Invalid product data",
        ));
    }

    let product = request.into_product();
    match state.service.create(&product).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(_) => Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create product",
        )),
    }
}

pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    match state.service.get_products().await {
        Ok(products) => Ok(Json(products)),
        Err(_) => Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to retrieve products",
        )),
    }
}

pub async fn notify(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NotifyRequest>,
) -> Result<Json<Value>, ApiError> {
    let Some(sns) = &state.sns else {
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "SNS client not initialized",
        ));
    };

    if request.topic_arn.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "topicArn is required",
        ));
    }

    let message = if request.message.is_empty() {
        "Default notification message".to_string()
    } else {
        request.message
    };

    sns.publish()
        .topic_arn(&request.topic_arn)
        .message(message)
        .send()
        .await
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;

    Ok(Json(json!({ "message": "Notification sent" })))
}

/// Ad-hoc short-poll drain of the events queue: returns whatever is
/// immediately available and deletes it.
pub async fn events(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let (Some(queue), Some(queue_url)) = (&state.queue, &state.events_queue_url) else {
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "SQS client not initialized",
        ));
    };

    let messages = queue
        .receive(queue_url, 10, 0, 30)
        .await
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?;

    let mut events = Vec::new();
    for message in &messages {
        events.push(json!({
            "messageId": message.id,
            "body": message.body,
        }));

        if let Err(e) = queue.delete(queue_url, &message.receipt_handle).await {
            warn!(message_id = %message.id, error = %e, "failed to delete message");
        }
    }

    Ok(Json(json!({ "events": events })))
}
