use serde::Serialize;
use ts_rs::TS;

// 公开获奖名单的一行，按奖项类型与名称排序
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/award.ts")]
pub struct PublicWinner {
    pub award_id: i64,
    pub award_name: String,
    #[serde(rename = "type")]
    pub award_type: String,
    pub candidate_id: i64,
    pub candidate_name: String,
    pub candidate_number: i32,
    pub contest_name: String,
    pub image_url: Option<String>,
}
