//! Weekly emission of a staking rewards contract

use alloy_primitives::U256;
use chrono::{DateTime, Utc};

use crate::amount::TokenAmount;
use crate::metrics::RewardSnapshot;
use crate::tokens::{MTA, SECONDS_PER_WEEK};

/// Raw reward tokens emitted over one week at `reward_rate` per second.
/// Zero once `period_finish` has passed.
pub fn weekly_emission(reward_rate: U256, period_finish: U256, now: DateTime<Utc>) -> U256 {
    let now = U256::from(now.timestamp().max(0) as u64);
    if period_finish < now {
        return U256::ZERO;
    }

    reward_rate.saturating_mul(U256::from(SECONDS_PER_WEEK))
}

/// Build the reward snapshot from the raw contract fields
pub fn reward_snapshot(reward_rate: U256, period_finish: U256, now: DateTime<Utc>) -> RewardSnapshot {
    let finish = u64::try_from(period_finish)
        .ok()
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0));

    RewardSnapshot {
        weekly_emission: TokenAmount::new(
            weekly_emission(reward_rate, period_finish, now),
            MTA.decimals,
        ),
        period_finish: finish,
    }
}
