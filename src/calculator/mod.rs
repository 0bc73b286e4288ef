//! ROI engine: raw form values in, financial result out.
//! Pure and stateless; safe to call from any thread.

pub mod aggregate;
pub mod normalizer;
pub mod savings;

pub use normalizer::normalize;

use crate::error::ValidationError;
use crate::types::{RawRoiInput, RoiInput, RoiResult};

/// Compute the result for an already-normalized input.
/// The three channels are independent; their order does not matter.
/// Errors only when a figure overflows `f64`.
pub fn calculate(input: &RoiInput) -> Result<RoiResult, ValidationError> {
    let chatbot = savings::chatbot_savings(input);
    let crm = savings::crm_savings(input);
    let uplift = savings::sales_uplift(input);
    aggregate::aggregate(input, chatbot, crm, uplift)
}

/// Normalize then calculate. No partial result on a validation failure.
pub fn calculate_raw(raw: &RawRoiInput) -> Result<RoiResult, ValidationError> {
    let input = normalize(raw)?;
    calculate(&input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DerivedMetric, SalesInputs, UndefinedMetric};

    fn reference_input() -> RoiInput {
        RoiInput {
            monthly_queries: 500,
            chatbot_automation_pct: 70.0,
            manual_response_minutes: 4.0,
            monthly_crm_hours: 40.0,
            crm_automation_pct: 40.0,
            employee_count: 3,
            hourly_employee_cost: 2500.0,
            annual_license_cost: 150_000.0,
            implementation_cost: 1_000_000.0,
            sales: None,
        }
    }

    fn with_sales(current: f64, expected: f64) -> RoiInput {
        RoiInput {
            sales: Some(SalesInputs {
                avg_ticket_value: 8_000.0,
                current_conversion_rate_pct: current,
                expected_conversion_rate_pct: expected,
            }),
            ..reference_input()
        }
    }

    #[test]
    fn reference_scenario_end_to_end() {
        let r = calculate(&reference_input()).unwrap();
        assert!((r.chatbot_monthly_savings - 58_333.33).abs() < 0.01);
        assert!((r.crm_monthly_savings - 120_000.0).abs() < 1e-6);
        assert!((r.total_monthly_savings - 178_333.33).abs() < 0.01);
        assert!((r.total_annual_savings - 2_140_000.0).abs() < 0.01);
        assert_eq!(r.total_first_year_cost, 1_150_000.0);
        let roi = r.roi_pct.value().unwrap();
        assert!((roi - 86.09).abs() < 0.01, "roi={roi}");
        let payback = r.payback_months.value().unwrap();
        assert!((payback - 6.45).abs() < 0.01, "payback={payback}");
        assert!(r.sales_uplift_monthly_revenue.is_none());
    }

    #[test]
    fn total_is_sum_of_channels() {
        for input in [reference_input(), with_sales(2.0, 6.0), with_sales(6.0, 2.0)] {
            let r = calculate(&input).unwrap();
            let expected = r.chatbot_monthly_savings
                + r.crm_monthly_savings
                + r.sales_uplift_monthly_revenue.unwrap_or(0.0);
            assert_eq!(r.total_monthly_savings, expected);
            assert_eq!(r.total_annual_savings, r.total_monthly_savings * 12.0);
        }
    }

    #[test]
    fn identical_input_gives_identical_output() {
        let input = with_sales(1.5, 3.5);
        assert_eq!(calculate(&input).unwrap(), calculate(&input).unwrap());
    }

    #[test]
    fn negative_uplift_reduces_roi() {
        let base = calculate(&reference_input()).unwrap().roi_pct.value().unwrap();
        let worse = calculate(&with_sales(6.0, 2.0)).unwrap().roi_pct.value().unwrap();
        assert!(worse < base);
    }

    #[test]
    fn zero_cost_leaves_rest_of_result_valid() {
        let input = RoiInput {
            implementation_cost: 0.0,
            annual_license_cost: 0.0,
            ..reference_input()
        };
        let r = calculate(&input).unwrap();
        assert_eq!(r.roi_pct, DerivedMetric::Undefined(UndefinedMetric::ZeroFirstYearCost));
        assert_eq!(r.payback_months, DerivedMetric::Defined(0.0));
        assert!(r.total_monthly_savings > 0.0);
    }

    #[test]
    fn no_savings_means_no_payback() {
        let input = RoiInput {
            chatbot_automation_pct: 0.0,
            crm_automation_pct: 0.0,
            ..reference_input()
        };
        let r = calculate(&input).unwrap();
        assert_eq!(r.total_monthly_savings, 0.0);
        assert_eq!(r.payback_months, DerivedMetric::Undefined(UndefinedMetric::NoPayback));
        let roi = r.roi_pct.value().unwrap();
        assert!((roi + 100.0).abs() < 1e-9);
    }

    #[test]
    fn partial_sales_fields_produce_no_uplift_in_output() {
        let raw: RawRoiInput = serde_json::from_value(serde_json::json!({
            "monthly_queries": 500,
            "chatbot_automation_pct": 70,
            "manual_response_minutes": 4,
            "monthly_crm_hours": 40,
            "crm_automation_pct": 40,
            "employee_count": 3,
            "hourly_employee_cost": 2500,
            "annual_license_cost": 150000,
            "implementation_cost": 1000000,
            "avg_ticket_value": 12000,
            "current_conversion_rate_pct": "",
            "expected_conversion_rate_pct": ""
        }))
        .unwrap();
        let r = calculate_raw(&raw).unwrap();
        assert!(r.sales_uplift_monthly_revenue.is_none());
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("sales_uplift_monthly_revenue").is_none());
    }

    #[test]
    fn overflowing_channel_is_rejected() {
        let input = RoiInput {
            monthly_queries: 1_000_000_000_000_000,
            chatbot_automation_pct: 100.0,
            manual_response_minutes: 1e300,
            hourly_employee_cost: 1e300,
            ..reference_input()
        };
        let err = calculate(&input).unwrap_err();
        assert_eq!(err.field, "chatbot_monthly_hours_saved");
    }

    #[test]
    fn opposing_overflows_never_produce_nan() {
        let input = RoiInput {
            monthly_queries: 1_000_000_000_000_000,
            chatbot_automation_pct: 100.0,
            manual_response_minutes: 1e300,
            hourly_employee_cost: 1e300,
            sales: Some(SalesInputs {
                avg_ticket_value: 1e300,
                current_conversion_rate_pct: 100.0,
                expected_conversion_rate_pct: 0.0,
            }),
            ..reference_input()
        };
        assert!(calculate(&input).is_err());
    }

    #[test]
    fn roi_overflow_is_rejected() {
        // Finite annual savings near f64::MAX, but multiplying by 100 overflows.
        let input = RoiInput {
            monthly_queries: 1,
            chatbot_automation_pct: 100.0,
            manual_response_minutes: 60.0,
            hourly_employee_cost: 1e307,
            crm_automation_pct: 0.0,
            implementation_cost: 1.0,
            annual_license_cost: 0.0,
            ..reference_input()
        };
        let err = calculate(&input).unwrap_err();
        assert_eq!(err.field, "roi_pct");
    }

    #[test]
    fn invalid_raw_input_yields_no_result() {
        let err = calculate_raw(&RawRoiInput::default()).unwrap_err();
        assert_eq!(err.field, "monthly_queries");
    }
}
