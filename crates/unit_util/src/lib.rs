use alloy_primitives::U256;
use anyhow::{anyhow, bail, Result};
use rust_decimal::Decimal;

/// Scales a decimal token amount into integer base units (`amount * 10^decimals`).
///
/// Contracts and routing providers only accept integer base units, so the
/// conversion must be exact: an amount with more fractional digits than the
/// token's precision is an error, not a rounding.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<U256> {
    if amount.is_sign_negative() {
        bail!("amount must not be negative, got {}", amount);
    }

    let normalized = amount.normalize();
    let scale = normalized.scale();
    // Mantissa is non-negative after the sign check above.
    let mantissa = U256::from(normalized.mantissa() as u128);

    if scale <= decimals as u32 {
        let factor = U256::from(10u8)
            .checked_pow(U256::from(decimals as u32 - scale))
            .ok_or_else(|| anyhow!("10^{} overflows 256 bits", decimals))?;
        mantissa
            .checked_mul(factor)
            .ok_or_else(|| anyhow!("amount {} overflows 256 bits at {} decimals", amount, decimals))
    } else {
        let divisor = U256::from(10u8)
            .checked_pow(U256::from(scale - decimals as u32))
            .ok_or_else(|| anyhow!("10^{} overflows 256 bits", scale - decimals as u32))?;
        if mantissa % divisor != U256::ZERO {
            bail!(
                "amount {} has more fractional digits than the token's {} decimals",
                amount,
                decimals
            );
        }
        Ok(mantissa / divisor)
    }
}
