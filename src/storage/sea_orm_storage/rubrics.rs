//! 评分规则与细则存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::phase_rubric_criteria::{
    ActiveModel as CriterionActiveModel, Column as CriterionColumn, Entity as Criteria,
};
use crate::entity::phase_rubrics::{
    ActiveModel as RubricActiveModel, Column as RubricColumn, Entity as Rubrics,
};
use crate::errors::{HackHubError, Result};
use crate::models::rubrics::{
    entities::{DEFAULT_SCALE_MAX, DEFAULT_SCALE_MIN, PhaseRubric, RubricCriterion},
    requests::{CreateRubricRequest, CriterionInput, UpdateCriterionRequest, UpdateRubricRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

const DEFAULT_WEIGHT: f64 = 1.0;

fn map_criteria_err(action: &str, e: DbErr) -> HackHubError {
    if is_unique_violation(&e) {
        HackHubError::conflict("同一评分规则下细则顺序不能重复")
    } else {
        HackHubError::database_operation(format!("{action}: {e}"))
    }
}

impl SeaOrmStorage {
    /// 创建评分规则及细则（单事务）
    pub async fn create_rubric_impl(
        &self,
        created_by: Option<i64>,
        req: CreateRubricRequest,
    ) -> Result<PhaseRubric> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| HackHubError::database_operation(format!("开启事务失败: {e}")))?;

        let rubric = RubricActiveModel {
            phase_id: Set(req.phase_id),
            task_id: Set(req.task_id),
            name: Set(req.name),
            scale_min: Set(req.scale_min.unwrap_or(DEFAULT_SCALE_MIN)),
            scale_max: Set(req.scale_max.unwrap_or(DEFAULT_SCALE_MAX)),
            guidance: Set(req.guidance),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| HackHubError::database_operation(format!("创建评分规则失败: {e}")))?;

        let mut next_order = 0;
        let mut criteria = Vec::with_capacity(req.criteria.len());
        for input in req.criteria {
            let order_index = input.order_index.unwrap_or(next_order);
            next_order = next_order.max(order_index + 1);
            let model = Self::insert_criterion(&txn, rubric.id, input, order_index).await?;
            criteria.push(model);
        }

        txn.commit()
            .await
            .map_err(|e| HackHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(rubric.into_rubric(criteria))
    }

    async fn insert_criterion<C: ConnectionTrait>(
        conn: &C,
        rubric_id: i64,
        input: CriterionInput,
        order_index: i32,
    ) -> Result<crate::entity::phase_rubric_criteria::Model> {
        CriterionActiveModel {
            rubric_id: Set(rubric_id),
            title: Set(input.title),
            description: Set(input.description),
            weight: Set(input.weight.unwrap_or(DEFAULT_WEIGHT)),
            max_score: Set(input.max_score),
            order_index: Set(order_index),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| map_criteria_err("创建细则失败", e))
    }

    pub async fn get_rubric_by_id_impl(&self, rubric_id: i64) -> Result<Option<PhaseRubric>> {
        let result = Rubrics::find_by_id(rubric_id)
            .one(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询评分规则失败: {e}")))?;

        let Some(rubric) = result else {
            return Ok(None);
        };

        let criteria = Criteria::find()
            .filter(CriterionColumn::RubricId.eq(rubric_id))
            .order_by_asc(CriterionColumn::OrderIndex)
            .all(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询细则失败: {e}")))?;

        Ok(Some(rubric.into_rubric(criteria)))
    }

    /// 阶段下的所有评分规则（含任务级），按创建顺序
    pub async fn list_phase_rubrics_impl(&self, phase_id: i64) -> Result<Vec<PhaseRubric>> {
        let rubrics = Rubrics::find()
            .filter(RubricColumn::PhaseId.eq(phase_id))
            .order_by_asc(RubricColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询评分规则失败: {e}")))?;

        if rubrics.is_empty() {
            return Ok(Vec::new());
        }

        let rubric_ids: Vec<i64> = rubrics.iter().map(|r| r.id).collect();
        let criteria = Criteria::find()
            .filter(CriterionColumn::RubricId.is_in(rubric_ids))
            .order_by_asc(CriterionColumn::OrderIndex)
            .all(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询细则失败: {e}")))?;

        let mut grouped: HashMap<i64, Vec<_>> = HashMap::new();
        for c in criteria {
            grouped.entry(c.rubric_id).or_default().push(c);
        }

        Ok(rubrics
            .into_iter()
            .map(|r| {
                let criteria = grouped.remove(&r.id).unwrap_or_default();
                r.into_rubric(criteria)
            })
            .collect())
    }

    pub async fn update_rubric_impl(
        &self,
        rubric_id: i64,
        req: UpdateRubricRequest,
    ) -> Result<Option<PhaseRubric>> {
        let existing = Rubrics::find_by_id(rubric_id)
            .one(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询评分规则失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut model: RubricActiveModel = existing.into();
        if let Some(name) = req.name {
            model.name = Set(name);
        }
        if let Some(scale_min) = req.scale_min {
            model.scale_min = Set(scale_min);
        }
        if let Some(scale_max) = req.scale_max {
            model.scale_max = Set(scale_max);
        }
        if let Some(guidance) = req.guidance {
            model.guidance = Set(Some(guidance));
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        model
            .update(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("更新评分规则失败: {e}")))?;

        self.get_rubric_by_id_impl(rubric_id).await
    }

    /// 添加细则，未指定顺序时追加到末尾
    pub async fn add_criterion_impl(
        &self,
        rubric_id: i64,
        input: CriterionInput,
    ) -> Result<RubricCriterion> {
        let order_index = match input.order_index {
            Some(idx) => idx,
            None => {
                let max: Option<i32> = Criteria::find()
                    .filter(CriterionColumn::RubricId.eq(rubric_id))
                    .select_only()
                    .column_as(CriterionColumn::OrderIndex.max(), "max_order")
                    .into_tuple::<Option<i32>>()
                    .one(&self.db)
                    .await
                    .map_err(|e| {
                        HackHubError::database_operation(format!("查询细则顺序失败: {e}"))
                    })?
                    .flatten();
                max.map(|m| m + 1).unwrap_or(0)
            }
        };

        let model = Self::insert_criterion(&self.db, rubric_id, input, order_index).await?;
        self.touch_rubric(rubric_id).await?;
        Ok(model.into_criterion())
    }

    pub async fn get_criterion_by_id_impl(
        &self,
        criterion_id: i64,
    ) -> Result<Option<RubricCriterion>> {
        let result = Criteria::find_by_id(criterion_id)
            .one(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询细则失败: {e}")))?;

        Ok(result.map(|m| m.into_criterion()))
    }

    pub async fn update_criterion_impl(
        &self,
        criterion_id: i64,
        req: UpdateCriterionRequest,
    ) -> Result<Option<RubricCriterion>> {
        let existing = Criteria::find_by_id(criterion_id)
            .one(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询细则失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(None);
        };
        let rubric_id = existing.rubric_id;

        let mut model: CriterionActiveModel = existing.into();
        if let Some(title) = req.title {
            model.title = Set(title);
        }
        if let Some(description) = req.description {
            model.description = Set(Some(description));
        }
        if let Some(weight) = req.weight {
            model.weight = Set(weight);
        }
        if let Some(max_score) = req.max_score {
            model.max_score = Set(Some(max_score));
        }
        if let Some(order_index) = req.order_index {
            model.order_index = Set(order_index);
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| map_criteria_err("更新细则失败", e))?;
        self.touch_rubric(rubric_id).await?;

        Ok(Some(result.into_criterion()))
    }

    /// 删除细则；历史评审中的快照不受影响
    pub async fn delete_criterion_impl(&self, criterion_id: i64) -> Result<bool> {
        let existing = Criteria::find_by_id(criterion_id)
            .one(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询细则失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(false);
        };

        let result = Criteria::delete_by_id(criterion_id)
            .exec(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("删除细则失败: {e}")))?;
        self.touch_rubric(existing.rubric_id).await?;

        Ok(result.rows_affected > 0)
    }

    async fn touch_rubric(&self, rubric_id: i64) -> Result<()> {
        Rubrics::update_many()
            .col_expr(
                RubricColumn::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(RubricColumn::Id.eq(rubric_id))
            .exec(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("更新评分规则时间失败: {e}")))?;
        Ok(())
    }
}
