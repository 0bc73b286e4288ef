use crate::config::MONTHS_PER_YEAR;
use crate::error::ValidationError;
use crate::types::{DerivedMetric, RoiInput, RoiResult, UndefinedMetric};

use super::savings::{ChatbotSavings, CrmSavings};

/// Combine the channel figures into the final result.
/// Fails when in-range inputs are large enough that a figure overflows `f64`.
pub fn aggregate(
    input: &RoiInput,
    chatbot: ChatbotSavings,
    crm: CrmSavings,
    sales_uplift: Option<f64>,
) -> Result<RoiResult, ValidationError> {
    let total_monthly_savings =
        chatbot.monthly_savings + crm.monthly_savings + sales_uplift.unwrap_or(0.0);
    let total_annual_savings = total_monthly_savings * MONTHS_PER_YEAR;
    let total_first_year_cost = input.implementation_cost + input.annual_license_cost;

    let result = RoiResult {
        automated_queries: chatbot.automated_queries,
        chatbot_monthly_hours_saved: chatbot.hours_saved,
        chatbot_monthly_savings: chatbot.monthly_savings,
        chatbot_annual_savings: chatbot.monthly_savings * MONTHS_PER_YEAR,
        crm_monthly_hours_saved: crm.hours_saved,
        crm_monthly_savings: crm.monthly_savings,
        crm_annual_savings: crm.monthly_savings * MONTHS_PER_YEAR,
        sales_uplift_monthly_revenue: sales_uplift,
        total_monthly_savings,
        total_annual_savings,
        total_first_year_cost,
        roi_pct: roi_pct(total_annual_savings, total_first_year_cost),
        payback_months: payback_months(total_first_year_cost, total_monthly_savings),
    };
    ensure_finite(&result)?;
    Ok(result)
}

/// Every figure must be a real number; `inf`/`NaN` would serialize as `null`.
fn ensure_finite(result: &RoiResult) -> Result<(), ValidationError> {
    let figures = [
        ("automated_queries", Some(result.automated_queries)),
        ("chatbot_monthly_hours_saved", Some(result.chatbot_monthly_hours_saved)),
        ("chatbot_monthly_savings", Some(result.chatbot_monthly_savings)),
        ("chatbot_annual_savings", Some(result.chatbot_annual_savings)),
        ("crm_monthly_hours_saved", Some(result.crm_monthly_hours_saved)),
        ("crm_monthly_savings", Some(result.crm_monthly_savings)),
        ("crm_annual_savings", Some(result.crm_annual_savings)),
        ("sales_uplift_monthly_revenue", result.sales_uplift_monthly_revenue),
        ("total_monthly_savings", Some(result.total_monthly_savings)),
        ("total_annual_savings", Some(result.total_annual_savings)),
        ("total_first_year_cost", Some(result.total_first_year_cost)),
        ("roi_pct", result.roi_pct.value()),
        ("payback_months", result.payback_months.value()),
    ];
    match figures
        .into_iter()
        .find(|(_, v)| v.is_some_and(|v| !v.is_finite()))
    {
        Some((field, _)) => Err(ValidationError::new(
            field,
            "overflows; the submitted values are too large to compute",
        )),
        None => Ok(()),
    }
}

/// Net first-year gain as a percentage of first-year cost.
pub fn roi_pct(total_annual_savings: f64, total_first_year_cost: f64) -> DerivedMetric {
    if total_first_year_cost == 0.0 {
        return DerivedMetric::Undefined(UndefinedMetric::ZeroFirstYearCost);
    }
    DerivedMetric::Defined(
        (total_annual_savings - total_first_year_cost) / total_first_year_cost * 100.0,
    )
}

/// Months of savings needed to cover first-year cost.
/// Savings so small that the ratio overflows also count as no payback.
pub fn payback_months(total_first_year_cost: f64, total_monthly_savings: f64) -> DerivedMetric {
    if total_monthly_savings.is_nan() || total_monthly_savings <= 0.0 {
        return DerivedMetric::Undefined(UndefinedMetric::NoPayback);
    }
    let months = total_first_year_cost / total_monthly_savings;
    if !months.is_finite() {
        return DerivedMetric::Undefined(UndefinedMetric::NoPayback);
    }
    DerivedMetric::Defined(months)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roi_reference_scenario() {
        let monthly = 178_333.33;
        let roi = roi_pct(monthly * 12.0, 1_150_000.0).value().unwrap();
        assert!((roi - 86.087).abs() < 0.01, "roi={roi}");
    }

    #[test]
    fn roi_undefined_for_zero_cost() {
        assert_eq!(
            roi_pct(10_000.0, 0.0),
            DerivedMetric::Undefined(UndefinedMetric::ZeroFirstYearCost)
        );
    }

    #[test]
    fn roi_can_be_negative() {
        let roi = roi_pct(500.0, 1_000.0).value().unwrap();
        assert!((roi + 50.0).abs() < 1e-9);
    }

    #[test]
    fn payback_reference_scenario() {
        let months = payback_months(1_150_000.0, 178_333.33).value().unwrap();
        assert!((months - 6.4486).abs() < 0.001, "months={months}");
    }

    #[test]
    fn payback_undefined_without_positive_savings() {
        assert!(payback_months(1_000.0, 0.0).is_undefined());
        assert!(payback_months(1_000.0, -5.0).is_undefined());
        assert_eq!(
            payback_months(1_000.0, 0.0),
            DerivedMetric::Undefined(UndefinedMetric::NoPayback)
        );
    }

    #[test]
    fn payback_undefined_for_nan_or_vanishing_savings() {
        assert!(payback_months(1_000.0, f64::NAN).is_undefined());
        assert!(payback_months(1e300, 1e-300).is_undefined());
    }

    #[test]
    fn payback_is_immediate_without_cost() {
        assert_eq!(payback_months(0.0, 100.0), DerivedMetric::Defined(0.0));
    }
}
