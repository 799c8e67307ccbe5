//! Solidity interfaces for the pool, share token and staking contracts

use alloy_sol_types::sol;

sol! {
    /// Balancer V1 pool. The pool contract is also its own BPT token.
    #[allow(missing_docs)]
    interface IBalancerPool {
        /// Total BPT issued (18 decimals)
        function totalSupply() external view returns (uint256);

        /// Pool reserve of a bound token, in that token's decimals
        function getBalance(address token) external view returns (uint256);
    }

    #[allow(missing_docs)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
    }

    /// mStable / Synthetix-style staking rewards
    #[allow(missing_docs)]
    interface IStakingRewards {
        /// Staked BPT of an account
        function balanceOf(address account) external view returns (uint256);

        /// Reward tokens emitted per second (18 decimals)
        function rewardRate() external view returns (uint256);

        /// Unix timestamp the current reward period ends at
        function periodFinish() external view returns (uint256);
    }
}
