//! 分数与细则得分校验，以及按权重推导总分

use std::collections::HashSet;

use crate::errors::{HackHubError, Result};
use crate::models::evaluations::entities::CriterionScore;
use crate::models::rubrics::entities::RubricSnapshot;

/// 总分的允许区间
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    /// 有评分规则时取规则区间，否则取默认区间
    pub fn for_snapshot(snapshot: Option<&RubricSnapshot>, default: ScoreRange) -> Self {
        match snapshot {
            Some(s) => ScoreRange {
                min: s.scale_min,
                max: s.scale_max,
            },
            None => default,
        }
    }

    pub fn contains(&self, score: f64) -> bool {
        score.is_finite() && score >= self.min && score <= self.max
    }
}

pub fn validate_score(score: f64, range: ScoreRange) -> Result<()> {
    if !range.contains(score) {
        return Err(HackHubError::validation(format!(
            "分数 {score} 超出范围 [{}, {}]",
            range.min, range.max
        )));
    }
    Ok(())
}

/// 细则得分必须对应快照中的细则，且落在该细则的区间内
pub fn validate_criterion_scores(
    scores: &[CriterionScore],
    snapshot: Option<&RubricSnapshot>,
) -> Result<()> {
    if scores.is_empty() {
        return Ok(());
    }
    let Some(snapshot) = snapshot else {
        return Err(HackHubError::validation(
            "目标未配置评分规则，不能提交细则得分",
        ));
    };

    let mut seen = HashSet::new();
    for entry in scores {
        let criterion = snapshot.criterion(entry.criterion_id).ok_or_else(|| {
            HackHubError::validation(format!("细则 {} 不在评分规则中", entry.criterion_id))
        })?;
        if !seen.insert(entry.criterion_id) {
            return Err(HackHubError::validation(format!(
                "细则 {} 重复评分",
                entry.criterion_id
            )));
        }

        let (low, high) = criterion.bounds(snapshot.scale_min, snapshot.scale_max);
        if !(entry.score.is_finite() && entry.score >= low && entry.score <= high) {
            return Err(HackHubError::validation(format!(
                "细则「{}」得分 {} 超出范围 [{low}, {high}]",
                criterion.title, entry.score
            )));
        }
    }
    Ok(())
}

/// scale_min + (scale_max - scale_min) * Σ(w·(s-l)/(h-l)) / Σw，保留两位小数
///
/// [l, h] 为细则区间；区间宽度不大于 0 的细则比值按 0 计。调用前应先校验细则得分。
pub fn weighted_score(scores: &[CriterionScore], snapshot: &RubricSnapshot) -> Option<f64> {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;

    for entry in scores {
        let Some(criterion) = snapshot.criterion(entry.criterion_id) else {
            continue;
        };
        let (lower, upper) = criterion.bounds(snapshot.scale_min, snapshot.scale_max);
        let span = upper - lower;
        let ratio = if span > 0.0 { (entry.score - lower) / span } else { 0.0 };
        weighted += criterion.weight * ratio;
        total_weight += criterion.weight;
    }

    if total_weight <= 0.0 {
        return None;
    }

    let raw = snapshot.scale_min + (snapshot.scale_max - snapshot.scale_min) * weighted / total_weight;
    Some((raw * 100.0).round() / 100.0)
}

/// 确定最终写入的总分：显式分数优先，否则由细则得分推导
pub fn resolve_score(
    explicit: Option<f64>,
    criterion_scores: &[CriterionScore],
    snapshot: Option<&RubricSnapshot>,
    default_range: ScoreRange,
) -> Result<Option<f64>> {
    validate_criterion_scores(criterion_scores, snapshot)?;
    let range = ScoreRange::for_snapshot(snapshot, default_range);

    let score = match (explicit, snapshot) {
        (Some(score), _) => Some(score),
        (None, Some(snapshot)) => weighted_score(criterion_scores, snapshot),
        (None, None) => None,
    };

    if let Some(score) = score {
        validate_score(score, range)?;
    }
    Ok(score)
}
