use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{RubricService, load_rubric_in_event};
use crate::models::ApiResponse;
use crate::models::common::response::error_response;
use crate::services::access::{current_actor, load_event_for};

pub async fn get_rubric(
    service: &RubricService,
    request: &HttpRequest,
    event_id: i64,
    rubric_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let actor = match current_actor(request) {
        Ok(actor) => actor,
        Err(e) => return Ok(error_response(&e)),
    };
    if let Err(e) = load_event_for(storage.as_ref(), &actor, event_id).await {
        return Ok(error_response(&e));
    }

    match load_rubric_in_event(storage.as_ref(), event_id, rubric_id).await {
        Ok(rubric) => Ok(HttpResponse::Ok().json(ApiResponse::success(rubric, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
