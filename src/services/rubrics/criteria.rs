//! 评分规则与细则的写入校验

use std::collections::HashSet;

use crate::errors::{HackHubError, Result};
use crate::models::rubrics::entities::{DEFAULT_SCALE_MAX, DEFAULT_SCALE_MIN, RubricCriterion};
use crate::models::rubrics::requests::{CreateRubricRequest, CriterionInput, UpdateCriterionRequest};
use crate::utils::validate::{validate_finite, validate_title};

fn finite(field: &str, value: f64) -> Result<()> {
    validate_finite(value).map_err(|e| HackHubError::validation(format!("{field}: {e}")))
}

fn title(value: &str) -> Result<()> {
    validate_title(value).map_err(HackHubError::validation)
}

pub fn validate_weight(weight: f64) -> Result<()> {
    finite("weight", weight)?;
    if weight <= 0.0 {
        return Err(HackHubError::validation(format!(
            "细则权重必须为正数，实际为 {weight}"
        )));
    }
    Ok(())
}

/// 细则满分落在 [0, scale_max]
pub fn validate_max_score(max_score: f64, scale_max: f64) -> Result<()> {
    finite("max_score", max_score)?;
    if max_score < 0.0 {
        return Err(HackHubError::validation(format!(
            "细则满分不能为负数，实际为 {max_score}"
        )));
    }
    if max_score > scale_max {
        return Err(HackHubError::validation(format!(
            "细则满分 {max_score} 超出评分规则上限 {scale_max}"
        )));
    }
    Ok(())
}

/// 修改区间后，已有细则的满分仍须落在新区间内
pub fn validate_criteria_fit(criteria: &[RubricCriterion], scale_max: f64) -> Result<()> {
    for criterion in criteria {
        if let Some(max_score) = criterion.max_score
            && max_score > scale_max
        {
            return Err(HackHubError::validation(format!(
                "细则「{}」满分 {max_score} 超出新的上限 {scale_max}",
                criterion.title
            )));
        }
    }
    Ok(())
}

pub fn validate_scale(scale_min: f64, scale_max: f64) -> Result<()> {
    finite("scale_min", scale_min)?;
    finite("scale_max", scale_max)?;
    if scale_min >= scale_max {
        return Err(HackHubError::validation(format!(
            "分数区间无效: [{scale_min}, {scale_max}]"
        )));
    }
    Ok(())
}

pub fn validate_criterion_input(input: &CriterionInput, scale_max: f64) -> Result<()> {
    title(&input.title)?;
    if let Some(weight) = input.weight {
        validate_weight(weight)?;
    }
    if let Some(max_score) = input.max_score {
        validate_max_score(max_score, scale_max)?;
    }
    Ok(())
}

pub fn validate_criterion_update(req: &UpdateCriterionRequest, scale_max: f64) -> Result<()> {
    if let Some(new_title) = &req.title {
        title(new_title)?;
    }
    if let Some(weight) = req.weight {
        validate_weight(weight)?;
    }
    if let Some(max_score) = req.max_score {
        validate_max_score(max_score, scale_max)?;
    }
    Ok(())
}

/// 新建规则：名称、区间、每个细则，以及细则的实际顺序不重复
///
/// 未给出顺序的细则接在已出现的最大顺序之后，与写入时的分配方式一致。
pub fn validate_create_rubric(req: &CreateRubricRequest) -> Result<()> {
    title(&req.name)?;
    let scale_max = req.scale_max.unwrap_or(DEFAULT_SCALE_MAX);
    validate_scale(req.scale_min.unwrap_or(DEFAULT_SCALE_MIN), scale_max)?;

    let mut seen = HashSet::new();
    let mut next_order = 0;
    for input in &req.criteria {
        validate_criterion_input(input, scale_max)?;
        let order_index = input.order_index.unwrap_or(next_order);
        next_order = next_order.max(order_index + 1);
        if !seen.insert(order_index) {
            return Err(HackHubError::validation(format!(
                "细则顺序 {order_index} 重复"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, weight: Option<f64>, max_score: Option<f64>) -> CriterionInput {
        CriterionInput {
            title: title.to_string(),
            description: None,
            weight,
            max_score,
            order_index: None,
        }
    }

    #[test]
    fn test_weight_must_be_positive() {
        assert!(validate_weight(1.0).is_ok());
        assert!(validate_weight(0.25).is_ok());
        assert!(validate_weight(0.0).is_err());
        assert!(validate_weight(-1.0).is_err());
        assert!(validate_weight(f64::NAN).is_err());
    }

    #[test]
    fn test_max_score_may_be_zero_but_not_negative() {
        assert!(validate_max_score(0.0, 10.0).is_ok());
        assert!(validate_max_score(10.0, 10.0).is_ok());
        assert!(validate_max_score(-0.5, 10.0).is_err());
    }

    #[test]
    fn test_max_score_must_fit_scale() {
        assert!(matches!(
            validate_max_score(500.0, 10.0),
            Err(HackHubError::Validation(_))
        ));
        assert!(validate_criterion_input(&input("Impact", None, Some(11.0)), 10.0).is_err());
        let update = UpdateCriterionRequest {
            max_score: Some(120.0),
            ..Default::default()
        };
        assert!(validate_criterion_update(&update, 100.0).is_err());
    }

    #[test]
    fn test_create_rubric_rejects_max_score_above_scale() {
        let req = CreateRubricRequest {
            phase_id: 1,
            task_id: None,
            name: "Pitch".into(),
            scale_min: Some(0.0),
            scale_max: Some(10.0),
            guidance: None,
            criteria: vec![input("Clarity", Some(1.0), Some(500.0))],
        };
        assert!(matches!(
            validate_create_rubric(&req),
            Err(HackHubError::Validation(_))
        ));

        // 缺省区间为 [0, 100]
        let req = CreateRubricRequest {
            scale_max: None,
            criteria: vec![input("Clarity", Some(1.0), Some(100.0))],
            ..req
        };
        assert!(validate_create_rubric(&req).is_ok());
    }

    #[test]
    fn test_shrinking_scale_must_keep_criteria() {
        let criterion = RubricCriterion {
            id: 1,
            rubric_id: 1,
            title: "Impact".into(),
            description: None,
            weight: 1.0,
            max_score: Some(20.0),
            order_index: 0,
        };
        assert!(validate_criteria_fit(std::slice::from_ref(&criterion), 20.0).is_ok());
        assert!(matches!(
            validate_criteria_fit(&[criterion], 10.0),
            Err(HackHubError::Validation(_))
        ));
        assert!(validate_criteria_fit(&[], 1.0).is_ok());
    }

    #[test]
    fn test_missing_optional_fields_are_fine() {
        assert!(validate_criterion_input(&input("Impact", None, None), 100.0).is_ok());
        assert!(validate_criterion_input(&input("", None, None), 100.0).is_err());
    }

    #[test]
    fn test_implicit_order_collides_with_explicit_order() {
        let first = input("A", None, None);
        let mut second = input("B", None, None);
        second.order_index = Some(0);

        let req = CreateRubricRequest {
            phase_id: 1,
            task_id: None,
            name: "Final".into(),
            scale_min: None,
            scale_max: None,
            guidance: None,
            criteria: vec![first, second],
        };
        assert!(matches!(
            validate_create_rubric(&req),
            Err(HackHubError::Validation(_))
        ));
    }

    #[test]
    fn test_implicit_order_follows_highest_explicit() {
        let mut first = input("A", None, None);
        first.order_index = Some(3);
        let second = input("B", None, None);
        let mut third = input("C", None, None);
        third.order_index = Some(1);

        let req = CreateRubricRequest {
            phase_id: 1,
            task_id: None,
            name: "Final".into(),
            scale_min: None,
            scale_max: None,
            guidance: None,
            criteria: vec![first, second, third],
        };
        // 3, 4, 1
        assert!(validate_create_rubric(&req).is_ok());
    }

    #[test]
    fn test_create_rubric_rejects_duplicate_order() {
        let mut a = input("A", Some(1.0), None);
        a.order_index = Some(1);
        let mut b = input("B", Some(2.0), Some(10.0));
        b.order_index = Some(1);

        let req = CreateRubricRequest {
            phase_id: 1,
            task_id: None,
            name: "Final".into(),
            scale_min: None,
            scale_max: None,
            guidance: None,
            criteria: vec![a, b],
        };
        assert!(matches!(
            validate_create_rubric(&req),
            Err(HackHubError::Validation(_))
        ));
    }

    #[test]
    fn test_scale_bounds() {
        assert!(validate_scale(0.0, 100.0).is_ok());
        assert!(validate_scale(10.0, 10.0).is_err());
        assert!(validate_scale(5.0, 1.0).is_err());
    }
}
