use serde::Serialize;
use ts_rs::TS;

use crate::models::submissions::entities::Submission;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<Submission>,
}
