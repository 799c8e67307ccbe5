//! Raw on-chain token amounts and their fixed-point scaling

use alloy_primitives::U256;
use eyre::{eyre, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Largest scale `rust_decimal` can represent
const MAX_DECIMAL_SCALE: u8 = 28;

/// Raw integer amount as returned by a contract, plus the token's precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAmount {
    pub raw: U256,
    pub decimals: u8,
}

impl TokenAmount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    #[cfg(test)]
    pub fn zero(decimals: u8) -> Self {
        Self::new(U256::ZERO, decimals)
    }

    /// Exact scaled value: `raw / 10^decimals`
    pub fn to_decimal(&self) -> Result<Decimal> {
        if self.decimals > MAX_DECIMAL_SCALE {
            return Err(eyre!(
                "{} decimals exceed fixed-point scale limit of {}",
                self.decimals,
                MAX_DECIMAL_SCALE
            ));
        }

        let raw = u128::try_from(self.raw)
            .ok()
            .and_then(|r| i128::try_from(r).ok())
            .ok_or_else(|| eyre!("Raw amount {} does not fit in 128 bits", self.raw))?;

        Decimal::try_from_i128_with_scale(raw, self.decimals as u32)
            .map_err(|e| eyre!("Raw amount {} out of fixed-point range: {}", self.raw, e))
    }

    /// Scaled value as a float, converted only after exact scaling
    pub fn to_f64(&self) -> Result<f64> {
        let value = self.to_decimal()?;
        value
            .to_f64()
            .ok_or_else(|| eyre!("Cannot represent {} as f64", value))
    }
}

/// `units * 10^decimals` as a raw amount
#[cfg(test)]
pub fn units(units: u64, decimals: u8) -> U256 {
    U256::from(units) * U256::from(10u64).pow(U256::from(decimals))
}
