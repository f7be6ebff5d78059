//! 预导入模块，方便使用

pub use super::evaluations::{
    ActiveModel as EvaluationActiveModel, Entity as Evaluations, Model as EvaluationModel,
};
pub use super::events::{ActiveModel as EventActiveModel, Entity as Events, Model as EventModel};
pub use super::phase_rubric_criteria::{
    ActiveModel as CriterionActiveModel, Entity as PhaseRubricCriteria, Model as CriterionModel,
};
pub use super::phase_rubrics::{
    ActiveModel as RubricActiveModel, Entity as PhaseRubrics, Model as RubricModel,
};
pub use super::phases::{ActiveModel as PhaseActiveModel, Entity as Phases, Model as PhaseModel};
pub use super::projects::{
    ActiveModel as ProjectActiveModel, Entity as Projects, Model as ProjectModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::tasks::{ActiveModel as TaskActiveModel, Entity as Tasks, Model as TaskModel};
pub use super::teams::{ActiveModel as TeamActiveModel, Entity as Teams, Model as TeamModel};
