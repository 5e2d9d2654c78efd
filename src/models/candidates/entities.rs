use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::ScoringStatus;

// 选手实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/candidate.ts")]
pub struct Candidate {
    pub id: i64,
    pub contest_id: i64,
    pub name: String,
    pub candidate_number: i32,
    pub image_url: Option<String>,
    /// 展示顺序，设置后优先于编号
    pub display_order: Option<i32>,
    pub status: ScoringStatus,
}

impl Candidate {
    /// 排序键：有 display_order 的排在前面，其次按编号
    pub fn display_key(&self) -> (bool, i32, i32, i64) {
        (
            self.display_order.is_none(),
            self.display_order.unwrap_or_default(),
            self.candidate_number,
            self.id,
        )
    }

    /// 按评委端与管理端统一的展示顺序排序
    pub fn sort_for_display(candidates: &mut [Candidate]) {
        candidates.sort_by_key(Candidate::display_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: i64, number: i32, order: Option<i32>) -> Candidate {
        Candidate {
            id,
            contest_id: 1,
            name: format!("Candidate {id}"),
            candidate_number: number,
            image_url: None,
            display_order: order,
            status: ScoringStatus::Open,
        }
    }

    #[test]
    fn test_display_order_takes_priority_and_nulls_sort_last() {
        let mut list = vec![
            candidate(1, 1, None),
            candidate(2, 2, Some(2)),
            candidate(3, 3, None),
            candidate(4, 4, Some(1)),
        ];
        Candidate::sort_for_display(&mut list);
        let ids: Vec<i64> = list.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![4, 2, 1, 3]);
    }

    #[test]
    fn test_equal_display_order_falls_back_to_number() {
        let mut list = vec![candidate(1, 9, Some(1)), candidate(2, 3, Some(1))];
        Candidate::sort_for_display(&mut list);
        assert_eq!(list[0].id, 2);
    }
}
