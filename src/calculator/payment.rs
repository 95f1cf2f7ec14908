//! Periodic payments and amortization schedules.

use crate::calculator::types::{CalcError, Compounding, MortgageTerms, PaymentSummary, YearSummary};

/// Balances below half a cent count as paid off.
const PAID_OFF: f64 = 0.005;
const MAX_AMORTIZATION_YEARS: u32 = 50;

/// Interest rate per payment period for a nominal annual rate in percent.
pub fn periodic_rate(annual_percent: f64, compounding: Compounding, periods_per_year: u32) -> f64 {
    let m = f64::from(compounding.periods_per_year());
    let nominal = annual_percent / 100.0;
    (1.0 + nominal / m).powf(m / f64::from(periods_per_year)) - 1.0
}

/// Level payment that retires `principal` over `periods` at `rate` per period.
pub fn level_payment(principal: f64, rate: f64, periods: u32) -> f64 {
    let n = f64::from(periods);
    if rate == 0.0 {
        return principal / n;
    }
    principal * rate / (1.0 - (1.0 + rate).powf(-n))
}

/// Principal that `payment` per period retires over `periods` at `rate`.
pub fn present_value(payment: f64, rate: f64, periods: u32) -> f64 {
    let n = f64::from(periods);
    if rate == 0.0 {
        return payment * n;
    }
    payment * (1.0 - (1.0 + rate).powf(-n)) / rate
}

pub(crate) fn check_terms(terms: &MortgageTerms) -> Result<(), CalcError> {
    if !terms.principal.is_finite() || terms.principal <= 0.0 {
        return Err(CalcError::InvalidInput {
            field: "principal",
            reason: "must be a positive amount",
        });
    }
    if !terms.annual_rate.is_finite() || !(0.0..=100.0).contains(&terms.annual_rate) {
        return Err(CalcError::InvalidInput {
            field: "annualRate",
            reason: "must be between 0 and 100 percent",
        });
    }
    if terms.amortization_years == 0 || terms.amortization_years > MAX_AMORTIZATION_YEARS {
        return Err(CalcError::InvalidInput {
            field: "amortizationYears",
            reason: "must be between 1 and 50 years",
        });
    }
    Ok(())
}

/// The payment actually made each period under `terms`.
fn scheduled_payment(terms: &MortgageTerms) -> f64 {
    match terms.frequency.acceleration_divisor() {
        Some(divisor) => {
            let monthly_rate = periodic_rate(terms.annual_rate, terms.compounding, 12);
            level_payment(terms.principal, monthly_rate, terms.amortization_years * 12) / divisor
        }
        None => {
            let ppy = terms.frequency.periods_per_year();
            let rate = periodic_rate(terms.annual_rate, terms.compounding, ppy);
            level_payment(terms.principal, rate, terms.amortization_years * ppy)
        }
    }
}

struct Period {
    interest: f64,
    principal: f64,
    balance: f64,
}

/// Walk the loan period by period until the balance is gone.
fn simulate(terms: &MortgageTerms) -> (f64, Vec<Period>) {
    let ppy = terms.frequency.periods_per_year();
    let rate = periodic_rate(terms.annual_rate, terms.compounding, ppy);
    let payment = scheduled_payment(terms);
    let max_periods = terms.amortization_years * ppy;

    let mut balance = terms.principal;
    let mut periods = Vec::with_capacity(max_periods as usize);
    while balance > PAID_OFF && (periods.len() as u32) < max_periods {
        let interest = balance * rate;
        let principal = (payment - interest).min(balance);
        balance -= principal;
        periods.push(Period {
            interest,
            principal,
            balance: balance.max(0.0),
        });
    }
    (payment, periods)
}

pub fn payment(terms: &MortgageTerms) -> Result<PaymentSummary, CalcError> {
    check_terms(terms)?;

    let ppy = terms.frequency.periods_per_year();
    let (payment, periods) = simulate(terms);
    let total_interest: f64 = periods.iter().map(|p| p.interest).sum();
    let total_principal: f64 = periods.iter().map(|p| p.principal).sum();
    let count = periods.len() as u32;

    Ok(PaymentSummary {
        payment: round2(payment),
        periods_per_year: ppy,
        number_of_payments: count,
        total_paid: round2(total_principal + total_interest),
        total_interest: round2(total_interest),
        payoff_years: round2(f64::from(count) / f64::from(ppy)),
    })
}

/// Year-by-year breakdown until the loan is paid off.
pub fn amortization_schedule(terms: &MortgageTerms) -> Result<Vec<YearSummary>, CalcError> {
    check_terms(terms)?;

    let ppy = terms.frequency.periods_per_year() as usize;
    let (_, periods) = simulate(terms);

    Ok(periods
        .chunks(ppy)
        .enumerate()
        .map(|(i, year)| YearSummary {
            year: i as u32 + 1,
            principal_paid: round2(year.iter().map(|p| p.principal).sum()),
            interest_paid: round2(year.iter().map(|p| p.interest).sum()),
            ending_balance: round2(year.last().map_or(0.0, |p| p.balance)),
        })
        .collect())
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
