//! 活动、团队与项目的只读查询

use super::SeaOrmStorage;
use crate::entity::events::Entity as Events;
use crate::entity::projects::Entity as Projects;
use crate::entity::teams::{Column as TeamColumn, Entity as Teams};
use crate::errors::{HackHubError, Result};
use crate::models::events::entities::{Event, Project, Team};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    pub async fn get_event_by_id_impl(&self, event_id: i64) -> Result<Option<Event>> {
        let result = Events::find_by_id(event_id)
            .one(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询活动失败: {e}")))?;

        Ok(result.map(|m| m.into_event()))
    }

    pub async fn get_team_by_id_impl(&self, team_id: i64) -> Result<Option<Team>> {
        let result = Teams::find_by_id(team_id)
            .one(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询团队失败: {e}")))?;

        Ok(result.map(|m| m.into_team()))
    }

    pub async fn list_event_teams_impl(&self, event_id: i64) -> Result<Vec<Team>> {
        let results = Teams::find()
            .filter(TeamColumn::EventId.eq(event_id))
            .order_by_asc(TeamColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询团队列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_team()).collect())
    }

    pub async fn get_project_by_id_impl(&self, project_id: i64) -> Result<Option<Project>> {
        let result = Projects::find_by_id(project_id)
            .one(&self.db)
            .await
            .map_err(|e| HackHubError::database_operation(format!("查询项目失败: {e}")))?;

        Ok(result.map(|m| m.into_project()))
    }
}
