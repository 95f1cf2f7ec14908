//! Maximum mortgage from income using debt-service ratios.
//!
//! Qualification uses the stress-test rate: the greater of the contract
//! rate plus two points and the 5.25 % floor. Half of condo fees count
//! toward housing costs.

use crate::calculator::down_payment::max_price_for_down_payment;
use crate::calculator::payment::{level_payment, periodic_rate, present_value, round2};
use crate::calculator::types::{AffordabilityInput, AffordabilityResult, CalcError, Compounding};

pub const GDS_LIMIT: f64 = 0.39;
pub const TDS_LIMIT: f64 = 0.44;
pub const STRESS_TEST_FLOOR: f64 = 5.25;
pub const STRESS_TEST_BUFFER: f64 = 2.0;

pub fn qualifying_rate(contract_rate: f64) -> f64 {
    (contract_rate + STRESS_TEST_BUFFER).max(STRESS_TEST_FLOOR)
}

pub fn affordability(input: &AffordabilityInput) -> Result<AffordabilityResult, CalcError> {
    check_input(input)?;

    let monthly_income = input.annual_income / 12.0;
    let housing_costs = input.monthly_property_tax + input.monthly_heating + input.monthly_condo_fees * 0.5;

    let gds_room = monthly_income * GDS_LIMIT - housing_costs;
    let tds_room = monthly_income * TDS_LIMIT - housing_costs - input.monthly_debts;
    let max_payment = gds_room.min(tds_room).max(0.0);

    let periods = input.amortization_years * 12;
    let q_rate = qualifying_rate(input.annual_rate);
    let max_mortgage = present_value(max_payment, periodic_rate(q_rate, Compounding::SemiAnnual, 12), periods);

    let max_price = (max_mortgage + input.down_payment).min(max_price_for_down_payment(input.down_payment));
    let mortgage = (max_price - input.down_payment).max(0.0);

    let contract_payment = level_payment(
        mortgage,
        periodic_rate(input.annual_rate, Compounding::SemiAnnual, 12),
        periods,
    );
    let qualifying_payment = level_payment(mortgage, periodic_rate(q_rate, Compounding::SemiAnnual, 12), periods);

    let (gds, tds) = if monthly_income > 0.0 {
        (
            (qualifying_payment + housing_costs) / monthly_income * 100.0,
            (qualifying_payment + housing_costs + input.monthly_debts) / monthly_income * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    Ok(AffordabilityResult {
        qualifying_rate: round2(q_rate),
        max_monthly_payment: round2(max_payment),
        max_mortgage: round2(mortgage),
        max_purchase_price: round2(max_price.max(0.0)),
        contract_monthly_payment: round2(contract_payment),
        gds_ratio: round2(gds),
        tds_ratio: round2(tds),
    })
}

fn check_input(input: &AffordabilityInput) -> Result<(), CalcError> {
    let amounts = [
        ("annualIncome", input.annual_income),
        ("monthlyDebts", input.monthly_debts),
        ("monthlyPropertyTax", input.monthly_property_tax),
        ("monthlyHeating", input.monthly_heating),
        ("monthlyCondoFees", input.monthly_condo_fees),
        ("downPayment", input.down_payment),
    ];
    for (field, value) in amounts {
        if !value.is_finite() || value < 0.0 {
            return Err(CalcError::InvalidInput {
                field,
                reason: "must be a non-negative amount",
            });
        }
    }
    if !input.annual_rate.is_finite() || !(0.0..=100.0).contains(&input.annual_rate) {
        return Err(CalcError::InvalidInput {
            field: "annualRate",
            reason: "must be between 0 and 100 percent",
        });
    }
    if input.amortization_years == 0 || input.amortization_years > 50 {
        return Err(CalcError::InvalidInput {
            field: "amortizationYears",
            reason: "must be between 1 and 50 years",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> AffordabilityInput {
        AffordabilityInput {
            annual_income: 100_000.0,
            monthly_debts: 500.0,
            monthly_property_tax: 300.0,
            monthly_heating: 100.0,
            monthly_condo_fees: 0.0,
            down_payment: 100_000.0,
            annual_rate: 4.5,
            amortization_years: 25,
        }
    }

    #[test]
    fn test_stress_test_rate() {
        assert_eq!(qualifying_rate(4.5), 6.5);
        assert_eq!(qualifying_rate(2.0), 5.25);
    }

    #[test]
    fn test_tds_binds_when_debts_are_high() {
        let result = affordability(&input()).unwrap();
        // GDS room 2850.00, TDS room 2766.67
        assert_eq!(result.max_monthly_payment, 2766.67);
        assert_eq!(result.qualifying_rate, 6.5);
        assert!((result.tds_ratio - 44.0).abs() < 0.01);
        assert!(result.gds_ratio < 39.0);
        assert!(result.contract_monthly_payment < result.max_monthly_payment);
        assert_eq!(result.max_purchase_price, round2(result.max_mortgage + 100_000.0));
    }

    #[test]
    fn test_gds_binds_without_debts() {
        let result = affordability(&AffordabilityInput {
            monthly_debts: 0.0,
            ..input()
        })
        .unwrap();
        assert_eq!(result.max_monthly_payment, 2850.0);
        assert!((result.gds_ratio - 39.0).abs() < 0.01);
    }

    #[test]
    fn test_small_down_payment_caps_price() {
        let result = affordability(&AffordabilityInput {
            annual_income: 400_000.0,
            down_payment: 25_000.0,
            ..input()
        })
        .unwrap();
        assert_eq!(result.max_purchase_price, 500_000.0);
        assert_eq!(result.max_mortgage, 475_000.0);
    }

    #[test]
    fn test_costs_above_income_yield_zero() {
        let result = affordability(&AffordabilityInput {
            annual_income: 10_000.0,
            monthly_debts: 2_000.0,
            down_payment: 0.0,
            ..input()
        })
        .unwrap();
        assert_eq!(result.max_monthly_payment, 0.0);
        assert_eq!(result.max_mortgage, 0.0);
    }

    #[test]
    fn test_rejects_negative_income() {
        let err = affordability(&AffordabilityInput {
            annual_income: -1.0,
            ..input()
        })
        .unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { field: "annualIncome", .. }));
    }
}
