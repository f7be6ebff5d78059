use serde::Serialize;
use ts_rs::TS;

use crate::models::PaginationInfo;
use crate::models::evaluations::entities::Evaluation;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationListResponse {
    pub items: Vec<Evaluation>,
    pub pagination: PaginationInfo,
}
