use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 阶段评分规则表 ====================
        manager
            .create_table(
                Table::create()
                    .table(PhaseRubrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PhaseRubrics::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PhaseRubrics::PhaseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PhaseRubrics::TaskId).big_integer().null())
                    .col(ColumnDef::new(PhaseRubrics::Name).string().not_null())
                    .col(
                        ColumnDef::new(PhaseRubrics::ScaleMin)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(PhaseRubrics::ScaleMax)
                            .double()
                            .not_null()
                            .default(100.0),
                    )
                    .col(ColumnDef::new(PhaseRubrics::Guidance).text().null())
                    // 作者来自外部用户系统，删除作者时仅置空
                    .col(
                        ColumnDef::new(PhaseRubrics::CreatedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PhaseRubrics::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PhaseRubrics::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PhaseRubrics::Table, PhaseRubrics::PhaseId)
                            .to(Phases::Table, Phases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PhaseRubrics::Table, PhaseRubrics::TaskId)
                            .to(Tasks::Table, Tasks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 评分细则表 ====================
        manager
            .create_table(
                Table::create()
                    .table(PhaseRubricCriteria::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PhaseRubricCriteria::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PhaseRubricCriteria::RubricId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PhaseRubricCriteria::Title)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PhaseRubricCriteria::Description)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PhaseRubricCriteria::Weight)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(
                        ColumnDef::new(PhaseRubricCriteria::MaxScore)
                            .double()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PhaseRubricCriteria::OrderIndex)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PhaseRubricCriteria::Table, PhaseRubricCriteria::RubricId)
                            .to(PhaseRubrics::Table, PhaseRubrics::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 评审记录表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Evaluations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Evaluations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Evaluations::EventId).big_integer().not_null())
                    .col(ColumnDef::new(Evaluations::Scope).string().not_null())
                    .col(
                        ColumnDef::new(Evaluations::SubmissionId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Evaluations::PhaseId).big_integer().null())
                    .col(ColumnDef::new(Evaluations::ProjectId).big_integer().null())
                    .col(ColumnDef::new(Evaluations::TeamId).big_integer().null())
                    .col(
                        ColumnDef::new(Evaluations::EvaluatedSubmissionIds)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Evaluations::CriterionScores).text().null())
                    .col(ColumnDef::new(Evaluations::Score).double().null())
                    .col(ColumnDef::new(Evaluations::Comment).text().not_null())
                    .col(ColumnDef::new(Evaluations::Status).string().not_null())
                    .col(ColumnDef::new(Evaluations::Source).string().not_null())
                    .col(ColumnDef::new(Evaluations::RubricSnapshot).text().null())
                    .col(
                        ColumnDef::new(Evaluations::ReviewerId)
                            .big_integer()
                            .not_null(),
                    )
                    // 仅在 final 状态下写入，唯一约束保证同一目标至多一条 final
                    .col(
                        ColumnDef::new(Evaluations::FinalKey)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Evaluations::FinalizedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::SubmissionId)
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::PhaseId)
                            .to(Phases::Table, Phases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Evaluations::Table, Evaluations::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_phase_rubrics_phase_id")
                    .table(PhaseRubrics::Table)
                    .col(PhaseRubrics::PhaseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_rubric_criteria_order")
                    .table(PhaseRubricCriteria::Table)
                    .col(PhaseRubricCriteria::RubricId)
                    .col(PhaseRubricCriteria::OrderIndex)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluations_event_id")
                    .table(Evaluations::Table)
                    .col(Evaluations::EventId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluations_submission_id")
                    .table(Evaluations::Table)
                    .col(Evaluations::SubmissionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluations_phase_team")
                    .table(Evaluations::Table)
                    .col(Evaluations::PhaseId)
                    .col(Evaluations::TeamId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_evaluations_project_team")
                    .table(Evaluations::Table)
                    .col(Evaluations::ProjectId)
                    .col(Evaluations::TeamId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Evaluations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PhaseRubricCriteria::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PhaseRubrics::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Events {
    #[sea_orm(iden = "events")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Teams {
    #[sea_orm(iden = "teams")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Projects {
    #[sea_orm(iden = "projects")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Phases {
    #[sea_orm(iden = "phases")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Tasks {
    #[sea_orm(iden = "tasks")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum PhaseRubrics {
    #[sea_orm(iden = "phase_rubrics")]
    Table,
    Id,
    PhaseId,
    TaskId,
    Name,
    ScaleMin,
    ScaleMax,
    Guidance,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PhaseRubricCriteria {
    #[sea_orm(iden = "phase_rubric_criteria")]
    Table,
    Id,
    RubricId,
    Title,
    Description,
    Weight,
    MaxScore,
    OrderIndex,
}

#[derive(DeriveIden)]
enum Evaluations {
    #[sea_orm(iden = "evaluations")]
    Table,
    Id,
    EventId,
    Scope,
    SubmissionId,
    PhaseId,
    ProjectId,
    TeamId,
    EvaluatedSubmissionIds,
    CriterionScores,
    Score,
    Comment,
    Status,
    Source,
    RubricSnapshot,
    ReviewerId,
    FinalKey,
    CreatedAt,
    UpdatedAt,
    FinalizedAt,
}
