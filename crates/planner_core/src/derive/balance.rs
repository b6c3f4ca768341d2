//! Point balance for the reward shop.

use crate::model::day::DayInfo;
use crate::model::shop::PurchaseRecord;

/// Sum of every day score across all days.
pub fn total_earned(days: &[DayInfo]) -> i64 {
    days.iter().map(DayInfo::score_total).sum()
}

/// Sum of every purchase cost.
pub fn total_spent(purchase_history: &[PurchaseRecord]) -> i64 {
    purchase_history.iter().map(|record| record.cost).sum()
}

/// Earned minus spent. Not clamped; may be negative.
pub fn compute_balance(days: &[DayInfo], purchase_history: &[PurchaseRecord]) -> i64 {
    total_earned(days) - total_spent(purchase_history)
}

#[cfg(test)]
mod tests {
    use super::compute_balance;
    use crate::model::day::DayInfo;
    use crate::model::review::DayScore;
    use crate::model::shop::PurchaseRecord;

    fn scored_day(date: u32, values: &[i8]) -> DayInfo {
        let mut day = DayInfo::empty(date, "MON", "1/1");
        day.scores = values
            .iter()
            .enumerate()
            .map(|(index, value)| DayScore {
                definition_id: format!("s{index}"),
                value: *value,
            })
            .collect();
        day
    }

    fn purchase(cost: i64) -> PurchaseRecord {
        PurchaseRecord {
            id: format!("pr-{cost}"),
            reward_id: "r1".to_string(),
            reward_title: "Tea".to_string(),
            cost,
            timestamp: 0,
        }
    }

    #[test]
    fn balance_can_go_negative() {
        let days = vec![scored_day(1, &[2, -1]), scored_day(2, &[-2])];
        assert_eq!(compute_balance(&days, &[]), -1);
        assert_eq!(compute_balance(&days, &[purchase(4)]), -5);
    }
}
