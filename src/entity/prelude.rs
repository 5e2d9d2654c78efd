//! 预导入模块，方便使用

pub use super::admin_scores::{
    ActiveModel as AdminScoreActiveModel, Entity as AdminScores, Model as AdminScoreModel,
};
pub use super::award_winners::{
    ActiveModel as AwardWinnerActiveModel, Entity as AwardWinners, Model as AwardWinnerModel,
};
pub use super::awards::{ActiveModel as AwardActiveModel, Entity as Awards, Model as AwardModel};
pub use super::candidates::{
    ActiveModel as CandidateActiveModel, Entity as Candidates, Model as CandidateModel,
};
pub use super::contests::{
    ActiveModel as ContestActiveModel, Entity as Contests, Model as ContestModel,
};
pub use super::criteria::{
    ActiveModel as CriterionActiveModel, Entity as Criteria, Model as CriterionModel,
};
pub use super::scores::{ActiveModel as ScoreActiveModel, Entity as Scores, Model as ScoreModel};
pub use super::segments::{
    ActiveModel as SegmentActiveModel, Entity as Segments, Model as SegmentModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
