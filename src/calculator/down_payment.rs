//! Minimum down payment and mortgage default insurance.

use crate::calculator::payment::round2;
use crate::calculator::types::{CalcError, DownPaymentQuote};

/// Portion of the price that needs only 5 % down.
pub const FIRST_TIER_LIMIT: f64 = 500_000.0;
/// Prices at or above this need 20 % down and cannot be insured.
pub const INSURABLE_PRICE_LIMIT: f64 = 1_500_000.0;

/// Premium tiers as (max loan-to-value, premium rate), both fractions.
const PREMIUM_TIERS: [(f64, f64); 4] = [(0.80, 0.0), (0.85, 0.028), (0.90, 0.031), (0.95, 0.04)];
const LTV_EPSILON: f64 = 1e-9;

pub fn minimum_down_payment(price: f64) -> Result<f64, CalcError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(CalcError::InvalidInput {
            field: "purchasePrice",
            reason: "must be a positive amount",
        });
    }
    let minimum = if price >= INSURABLE_PRICE_LIMIT {
        price * 0.20
    } else if price > FIRST_TIER_LIMIT {
        FIRST_TIER_LIMIT * 0.05 + (price - FIRST_TIER_LIMIT) * 0.10
    } else {
        price * 0.05
    };
    Ok(round2(minimum))
}

/// Highest purchase price a given down payment meets the minimum for.
pub fn max_price_for_down_payment(down: f64) -> f64 {
    let first_tier_down = FIRST_TIER_LIMIT * 0.05;
    let insurable_cap_down = first_tier_down + (INSURABLE_PRICE_LIMIT - FIRST_TIER_LIMIT) * 0.10;

    if down <= first_tier_down {
        down * 20.0
    } else if down < insurable_cap_down {
        FIRST_TIER_LIMIT + (down - first_tier_down) * 10.0
    } else if down < INSURABLE_PRICE_LIMIT * 0.20 {
        // Anything at the insurable limit would need 20 % down.
        INSURABLE_PRICE_LIMIT - 0.01
    } else {
        down * 5.0
    }
}

/// Loan, insurance premium and total mortgage for a purchase.
pub fn down_payment_quote(price: f64, down: f64) -> Result<DownPaymentQuote, CalcError> {
    let minimum = minimum_down_payment(price)?;
    if !down.is_finite() || down < 0.0 || down > price {
        return Err(CalcError::InvalidInput {
            field: "downPayment",
            reason: "must be between zero and the purchase price",
        });
    }
    if down + 0.005 < minimum {
        return Err(CalcError::InsufficientDownPayment { required: minimum });
    }

    let loan = price - down;
    let ltv = loan / price;
    let rate = PREMIUM_TIERS
        .iter()
        .find(|(max_ltv, _)| ltv <= max_ltv + LTV_EPSILON)
        .map(|(_, rate)| *rate)
        .ok_or(CalcError::InsufficientDownPayment { required: minimum })?;
    let premium = loan * rate;

    Ok(DownPaymentQuote {
        purchase_price: round2(price),
        minimum_down_payment: minimum,
        down_payment: round2(down),
        loan_amount: round2(loan),
        loan_to_value: round2(ltv * 100.0),
        insurance_rate: round2(rate * 100.0),
        insurance_premium: round2(premium),
        total_mortgage: round2(loan + premium),
    })
}
