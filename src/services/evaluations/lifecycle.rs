//! 评审生命周期
//!
//! 草稿 → final 单向迁移。final 唯一性由存储层的唯一键与比较并交换更新保证，
//! 并发提升时失败的一方得到 Conflict。

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::scope::{ResolvedTarget, resolve_target, validate_selection};
use super::scoring::{ScoreRange, resolve_score};
use crate::ai::{AiAssistInput, ScoringOracle};
use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::errors::{HackHubError, Result};
use crate::models::actors::entities::Actor;
use crate::models::evaluations::entities::{
    CriterionScore, Evaluation, EvaluationSource, EvaluationTarget,
};
use crate::models::evaluations::requests::{
    AiAssistRequest, EvaluationChanges, NewEvaluation, UpdateEvaluationRequest,
};
use crate::models::events::entities::Event;
use crate::models::rubrics::entities::{PhaseRubric, RubricSnapshot};
use crate::services::notifications::{EvaluationFinalized, EvaluationNotifier};
use crate::services::rubrics::{get_project_rubric, get_rubric_for};
use crate::services::tracking::invalidate_tracking_cache;
use crate::storage::Storage;
use crate::utils::validate::validate_locale;

const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Clone, Copy)]
pub struct EvaluationPolicy {
    /// 没有评分规则时的总分区间
    pub default_range: ScoreRange,
    /// final 是否按评审人区分
    pub final_per_reviewer: bool,
    pub ai_timeout: Duration,
}

impl Default for EvaluationPolicy {
    fn default() -> Self {
        Self {
            default_range: ScoreRange {
                min: 0.0,
                max: 10.0,
            },
            final_per_reviewer: false,
            ai_timeout: Duration::from_secs(60),
        }
    }
}

impl EvaluationPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            default_range: ScoreRange {
                min: config.evaluation.default_score_min,
                max: config.evaluation.default_score_max,
            },
            final_per_reviewer: config.final_per_reviewer(),
            ai_timeout: Duration::from_secs(config.ai_assist.timeout_secs.max(1)),
        }
    }
}

/// createDraft 的输入
#[derive(Debug, Clone)]
pub struct DraftInput {
    pub comment: String,
    pub score: Option<f64>,
    pub criterion_scores: Vec<CriterionScore>,
    /// None 时使用默认候选集
    pub evaluated_submission_ids: Option<Vec<i64>>,
    pub source: EvaluationSource,
}

pub struct EvaluationLifecycle {
    storage: Arc<dyn Storage>,
    cache: Option<Arc<dyn ObjectCache>>,
    notifier: Option<EvaluationNotifier>,
    oracle: Option<Arc<dyn ScoringOracle>>,
    policy: EvaluationPolicy,
}

impl EvaluationLifecycle {
    pub fn new(storage: Arc<dyn Storage>, policy: EvaluationPolicy) -> Self {
        Self {
            storage,
            cache: None,
            notifier: None,
            oracle: None,
            policy,
        }
    }

    pub fn with_cache(mut self, cache: Option<Arc<dyn ObjectCache>>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_notifier(mut self, notifier: Option<EvaluationNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_oracle(mut self, oracle: Option<Arc<dyn ScoringOracle>>) -> Self {
        self.oracle = oracle;
        self
    }

    pub fn policy(&self) -> &EvaluationPolicy {
        &self.policy
    }

    fn ensure_reviewer(actor: &Actor) -> Result<()> {
        if actor.is_reviewer() {
            Ok(())
        } else {
            Err(HackHubError::authorization("只有评审、组织者或管理员可以评审"))
        }
    }

    /// 目标生效的评分规则
    pub async fn rubric_for(&self, event_id: i64, resolved: &ResolvedTarget) -> Result<Option<PhaseRubric>> {
        let storage = self.storage.as_ref();
        match (resolved.target, resolved.phase_id) {
            (EvaluationTarget::Project { .. }, _) => get_project_rubric(storage, event_id).await,
            (_, Some(phase_id)) => get_rubric_for(storage, event_id, phase_id, resolved.task_id).await,
            (_, None) => Ok(None),
        }
    }

    /// createDraft(target, {comment, score?, source})
    ///
    /// 新草稿不影响已有草稿，读取方以最新草稿为准。
    pub async fn create_draft(
        &self,
        actor: &Actor,
        event: &Event,
        target: EvaluationTarget,
        input: DraftInput,
    ) -> Result<Evaluation> {
        Self::ensure_reviewer(actor)?;
        let resolved = resolve_target(self.storage.as_ref(), event, target).await?;
        let snapshot = self.rubric_for(event.id, &resolved).await?.map(|r| r.snapshot());
        self.persist_draft(actor, event, &resolved, snapshot, input).await
    }

    async fn persist_draft(
        &self,
        actor: &Actor,
        event: &Event,
        resolved: &ResolvedTarget,
        snapshot: Option<RubricSnapshot>,
        input: DraftInput,
    ) -> Result<Evaluation> {
        let evaluated_submission_ids = match &input.evaluated_submission_ids {
            Some(ids) => validate_selection(ids, &resolved.eligible)?,
            None => resolved.default_selection.clone(),
        };
        let score = resolve_score(
            input.score,
            &input.criterion_scores,
            snapshot.as_ref(),
            self.policy.default_range,
        )?;

        let evaluation = self
            .storage
            .create_evaluation(NewEvaluation {
                event_id: event.id,
                target: resolved.target,
                evaluated_submission_ids,
                criterion_scores: input.criterion_scores,
                score,
                comment: input.comment,
                source: input.source,
                rubric_snapshot: snapshot,
                reviewer_id: actor.id,
            })
            .await?;

        info!(
            "Evaluation {} created as draft (scope: {}, target: {}, reviewer: {}, source: {})",
            evaluation.id,
            evaluation.target.scope(),
            evaluation.target.target_key(),
            actor.id,
            evaluation.source
        );
        self.invalidate_tracking(event.id).await;
        Ok(evaluation)
    }

    // 只能操作同一活动内、自己的评审；组织者可以操作任何评审
    async fn load_owned(&self, actor: &Actor, event: &Event, evaluation_id: i64) -> Result<Evaluation> {
        Self::ensure_reviewer(actor)?;
        let evaluation = self
            .storage
            .get_evaluation_by_id(evaluation_id)
            .await?
            .filter(|e| e.event_id == event.id)
            .ok_or_else(|| HackHubError::not_found(format!("评审 {evaluation_id} 不存在")))?;

        if evaluation.reviewer_id != actor.id && !actor.is_organizer() {
            return Err(HackHubError::authorization("只能修改自己的评审"));
        }
        Ok(evaluation)
    }

    /// 读取评审，校验活动归属
    pub async fn get(&self, event: &Event, evaluation_id: i64) -> Result<Evaluation> {
        self.storage
            .get_evaluation_by_id(evaluation_id)
            .await?
            .filter(|e| e.event_id == event.id)
            .ok_or_else(|| HackHubError::not_found(format!("评审 {evaluation_id} 不存在")))
    }

    /// update(evaluationId, patch)；`finalize` 为 true 时带着修改一起转为 final
    pub async fn update(
        &self,
        actor: &Actor,
        event: &Event,
        evaluation_id: i64,
        patch: UpdateEvaluationRequest,
    ) -> Result<Evaluation> {
        if patch.is_empty() && !patch.finalize {
            return Err(HackHubError::validation("没有需要更新的字段"));
        }

        let existing = self.load_owned(actor, event, evaluation_id).await?;
        if existing.is_final() {
            return Err(HackHubError::conflict(format!(
                "评审 {evaluation_id} 已是 final，不能再修改"
            )));
        }

        let finalize = patch.finalize;
        let changes = self.merge_changes(event, &existing, patch).await?;

        if finalize {
            return self.finalize(&existing, changes).await;
        }

        let evaluation = self.storage.update_evaluation_draft(existing.id, changes).await?;
        info!(
            "Evaluation {} draft updated (scope: {}, reviewer: {})",
            evaluation.id,
            evaluation.target.scope(),
            actor.id
        );
        self.invalidate_tracking(event.id).await;
        Ok(evaluation)
    }

    /// 合并补丁；快照保持创建时的版本
    async fn merge_changes(
        &self,
        event: &Event,
        existing: &Evaluation,
        patch: UpdateEvaluationRequest,
    ) -> Result<EvaluationChanges> {
        let snapshot = existing.rubric_snapshot.as_ref();

        let criteria_changed = patch.criterion_scores.is_some();
        let criterion_scores = patch
            .criterion_scores
            .unwrap_or_else(|| existing.criterion_scores.clone());

        // 细则得分变更且未给出总分时重新推导
        let derive = criteria_changed && !criterion_scores.is_empty() && snapshot.is_some();
        let explicit = patch.score.or(if derive { None } else { existing.score });
        let score = resolve_score(
            explicit,
            &criterion_scores,
            snapshot,
            self.policy.default_range,
        )?;

        let evaluated_submission_ids = match patch.evaluated_submission_ids {
            Some(ids) => {
                let resolved = resolve_target(self.storage.as_ref(), event, existing.target).await?;
                validate_selection(&ids, &resolved.eligible)?
            }
            None => existing.evaluated_submission_ids.clone(),
        };

        Ok(EvaluationChanges {
            comment: patch.comment.unwrap_or_else(|| existing.comment.clone()),
            score,
            criterion_scores,
            evaluated_submission_ids,
        })
    }

    /// promoteToFinal(evaluationId)，评语与分数原样保留
    pub async fn promote_to_final(
        &self,
        actor: &Actor,
        event: &Event,
        evaluation_id: i64,
    ) -> Result<Evaluation> {
        let existing = self.load_owned(actor, event, evaluation_id).await?;
        if existing.is_final() {
            return Err(HackHubError::conflict(format!(
                "评审 {evaluation_id} 已是 final"
            )));
        }

        let changes = EvaluationChanges {
            comment: existing.comment.clone(),
            score: existing.score,
            criterion_scores: existing.criterion_scores.clone(),
            evaluated_submission_ids: existing.evaluated_submission_ids.clone(),
        };
        self.finalize(&existing, changes).await
    }

    async fn finalize(&self, existing: &Evaluation, changes: EvaluationChanges) -> Result<Evaluation> {
        let reviewer = self
            .policy
            .final_per_reviewer
            .then_some(existing.reviewer_id);
        let final_key = existing.target.final_key(reviewer);

        let evaluation = match self
            .storage
            .finalize_evaluation(existing.id, changes, final_key.clone())
            .await
        {
            Ok(evaluation) => evaluation,
            Err(e @ HackHubError::Conflict(_)) => {
                warn!(
                    "Promotion of evaluation {} rejected for key '{}': {}",
                    existing.id, final_key, e
                );
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        info!(
            "Evaluation {} promoted to final (scope: {}, target: {}, reviewer: {})",
            evaluation.id,
            evaluation.target.scope(),
            evaluation.target.target_key(),
            evaluation.reviewer_id
        );
        self.notify_finalized(&evaluation).await;
        self.invalidate_tracking(evaluation.event_id).await;
        Ok(evaluation)
    }

    // 通知不等待投递，也不影响请求结果
    async fn notify_finalized(&self, evaluation: &Evaluation) {
        let Some(notifier) = &self.notifier else {
            return;
        };

        let team_id = match (evaluation.target.team_id(), evaluation.target.submission_id()) {
            (Some(team_id), _) => Some(team_id),
            (None, Some(submission_id)) => match self.storage.get_submission_by_id(submission_id).await {
                Ok(submission) => submission.map(|s| s.team_id),
                Err(e) => {
                    warn!("Failed to load submission {} for notification: {}", submission_id, e);
                    None
                }
            },
            (None, None) => None,
        };

        notifier.publish(EvaluationFinalized::from_evaluation(evaluation, team_id));
    }

    /// 调用预言机生成 AI 草稿
    ///
    /// 没有评分规则时直接失败，不调用预言机；调用超时按 AdapterUnavailable 处理。
    pub async fn generate_ai_draft(
        &self,
        actor: &Actor,
        event: &Event,
        req: AiAssistRequest,
    ) -> Result<Evaluation> {
        Self::ensure_reviewer(actor)?;
        let target = req.refs.into_target()?;
        let locale = req.locale.unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        validate_locale(&locale).map_err(HackHubError::validation)?;

        let resolved = resolve_target(self.storage.as_ref(), event, target).await?;
        let rubric = self.rubric_for(event.id, &resolved).await?.ok_or_else(|| {
            HackHubError::no_rubric_configured(format!(
                "{} 未配置评分规则，无法生成 AI 评审",
                target.target_key()
            ))
        })?;
        let oracle = self
            .oracle
            .clone()
            .ok_or_else(|| HackHubError::adapter_unavailable("AI 辅助评审未启用"))?;

        let candidates = match &req.evaluated_submission_ids {
            Some(ids) => validate_selection(ids, &resolved.eligible)?,
            None => resolved.default_selection.clone(),
        };
        let snapshot = rubric.snapshot();
        let input = AiAssistInput {
            target,
            rubric: snapshot.clone(),
            submissions: resolved.submissions_for(&candidates),
            locale,
        };

        let output = match tokio::time::timeout(self.policy.ai_timeout, oracle.generate(&input)).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!("Scoring oracle '{}' failed for {}: {}", oracle.name(), target.target_key(), e);
                return Err(match e {
                    HackHubError::AdapterUnavailable(_) => e,
                    other => HackHubError::adapter_unavailable(other.message().to_string()),
                });
            }
            Err(_) => {
                warn!(
                    "Scoring oracle '{}' timed out after {:?} for {}",
                    oracle.name(),
                    self.policy.ai_timeout,
                    target.target_key()
                );
                return Err(HackHubError::adapter_unavailable("AI 评审超时，请稍后重试"));
            }
        };

        let evaluated = intersect_proposal(output.evaluated_submission_ids, &candidates);
        self.persist_draft(
            actor,
            event,
            &resolved,
            Some(snapshot),
            DraftInput {
                comment: output.comment,
                score: output.score,
                criterion_scores: Vec::new(),
                evaluated_submission_ids: Some(evaluated),
                source: EvaluationSource::AiAssisted,
            },
        )
        .await
    }

    async fn invalidate_tracking(&self, event_id: i64) {
        invalidate_tracking_cache(self.cache.as_ref(), event_id).await;
    }
}

/// 预言机建议的提交只保留候选集内的部分；没有有效建议时使用全部候选
pub fn intersect_proposal(proposed: Option<Vec<i64>>, candidates: &[i64]) -> Vec<i64> {
    let mut kept: Vec<i64> = Vec::new();
    for id in proposed.unwrap_or_default() {
        if candidates.contains(&id) && !kept.contains(&id) {
            kept.push(id);
        }
    }
    if kept.is_empty() {
        candidates.to_vec()
    } else {
        kept
    }
}
