use crate::types::RoiInput;

const MINUTES_PER_HOUR: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChatbotSavings {
    pub automated_queries: f64,
    pub hours_saved: f64,
    pub monthly_savings: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrmSavings {
    pub hours_saved: f64,
    pub monthly_savings: f64,
}

/// Queries the chatbot absorbs, valued at the manual handling time they no longer need.
/// `employee_count` does not scale this channel; `hourly_employee_cost` is the
/// rate for whoever would have answered the query.
pub fn chatbot_savings(input: &RoiInput) -> ChatbotSavings {
    let automated_queries = input.monthly_queries as f64 * input.chatbot_automation_pct / 100.0;
    let hours_saved = automated_queries * input.manual_response_minutes / MINUTES_PER_HOUR;
    ChatbotSavings {
        automated_queries,
        hours_saved,
        monthly_savings: hours_saved * input.hourly_employee_cost,
    }
}

/// `monthly_crm_hours` is per employee, so the automated share scales with headcount.
pub fn crm_savings(input: &RoiInput) -> CrmSavings {
    let hours_saved =
        input.monthly_crm_hours * input.crm_automation_pct / 100.0 * input.employee_count as f64;
    CrmSavings {
        hours_saved,
        monthly_savings: hours_saved * input.hourly_employee_cost,
    }
}

/// Extra monthly revenue from the conversion-rate change. `None` without sales inputs.
/// A lower expected rate yields a negative figure, which is returned as-is.
pub fn sales_uplift(input: &RoiInput) -> Option<f64> {
    input.sales.map(|s| {
        let rate_delta = s.expected_conversion_rate_pct - s.current_conversion_rate_pct;
        input.monthly_queries as f64 * rate_delta / 100.0 * s.avg_ticket_value
    })
}
