//! Reward shop operations.
//!
//! # Invariants
//! - `purchase_history` is append-only.
//! - The balance check and the receipt append happen in one call; a refused
//!   redemption leaves state untouched.

use crate::derive::balance::compute_balance;
use crate::logging::events;
use crate::model::ids::{new_entity_id, PURCHASE_ID_PREFIX};
use crate::model::shop::{PurchaseRecord, Reward};
use crate::model::state::PlannerState;
use crate::ops::{PlannerError, PlannerResult};
use log::info;

/// Business outcome of a redemption attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedeemOutcome {
    /// Receipt id of the appended purchase.
    Redeemed(String),
    InsufficientBalance { balance: i64, cost: i64 },
}

impl RedeemOutcome {
    pub fn is_redeemed(&self) -> bool {
        matches!(self, Self::Redeemed(_))
    }
}

impl PlannerState {
    /// Current earned-minus-spent balance.
    pub fn balance(&self) -> i64 {
        compute_balance(&self.days, &self.purchase_history)
    }

    /// Spends `reward.cost` points when the balance covers it.
    pub fn redeem_reward(&mut self, reward: &Reward, now_ms: i64) -> RedeemOutcome {
        let balance = self.balance();
        if balance < reward.cost {
            info!(
                "event={} module=ops status=refused reward_id={} cost={} balance={}",
                events::REWARD_REDEEM,
                reward.id,
                reward.cost,
                balance
            );
            return RedeemOutcome::InsufficientBalance {
                balance,
                cost: reward.cost,
            };
        }

        let record = PurchaseRecord::receipt_for(new_entity_id(PURCHASE_ID_PREFIX), reward, now_ms);
        let record_id = record.id.clone();
        self.purchase_history.push(record);
        info!(
            "event={} module=ops status=ok reward_id={} cost={} balance={}",
            events::REWARD_REDEEM,
            reward.id,
            reward.cost,
            balance - reward.cost
        );
        RedeemOutcome::Redeemed(record_id)
    }

    /// Inserts a new catalog entry or replaces the one with the same id.
    pub fn upsert_reward(&mut self, reward: Reward) -> PlannerResult<()> {
        if reward.cost < 0 {
            return Err(PlannerError::InvalidCost(reward.cost));
        }
        if reward.title.trim().is_empty() {
            return Err(PlannerError::BlankTitle);
        }
        match self.rewards.iter_mut().find(|entry| entry.id == reward.id) {
            Some(slot) => *slot = reward,
            None => self.rewards.push(reward),
        }
        Ok(())
    }

    /// Removes a catalog entry. Existing receipts are left as they are.
    pub fn delete_reward(&mut self, reward_id: &str) -> PlannerResult<()> {
        let before = self.rewards.len();
        self.rewards.retain(|reward| reward.id != reward_id);
        if self.rewards.len() == before {
            return Err(PlannerError::RewardNotFound(reward_id.to_string()));
        }
        Ok(())
    }
}
