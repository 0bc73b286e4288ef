use crate::error::ValidationError;
use crate::types::{RawRoiInput, RawValue, RoiInput, SalesInputs};

type Result<T> = std::result::Result<T, ValidationError>;

/// Convert a raw submission into a typed `RoiInput`.
///
/// Required fields must be present, numeric and in range. The three sales
/// fields are all-or-nothing: if any one is empty or missing, the whole group
/// is dropped. A sales value that *is* supplied must still be valid.
/// Fields are checked in declaration order and the first failure is returned.
pub fn normalize(raw: &RawRoiInput) -> Result<RoiInput> {
    let monthly_queries = count("monthly_queries", raw.monthly_queries.as_ref(), 0)?;
    let chatbot_automation_pct = percentage(
        "chatbot_automation_pct",
        required("chatbot_automation_pct", raw.chatbot_automation_pct.as_ref())?,
    )?;
    let manual_response_minutes = non_negative(
        "manual_response_minutes",
        required("manual_response_minutes", raw.manual_response_minutes.as_ref())?,
    )?;
    let monthly_crm_hours = non_negative(
        "monthly_crm_hours",
        required("monthly_crm_hours", raw.monthly_crm_hours.as_ref())?,
    )?;
    let crm_automation_pct = percentage(
        "crm_automation_pct",
        required("crm_automation_pct", raw.crm_automation_pct.as_ref())?,
    )?;
    let employee_count = count("employee_count", raw.employee_count.as_ref(), 1)?;
    let employee_count = u32::try_from(employee_count)
        .map_err(|_| ValidationError::new("employee_count", "is too large"))?;
    let hourly_employee_cost = non_negative(
        "hourly_employee_cost",
        required("hourly_employee_cost", raw.hourly_employee_cost.as_ref())?,
    )?;
    let annual_license_cost = non_negative(
        "annual_license_cost",
        required("annual_license_cost", raw.annual_license_cost.as_ref())?,
    )?;
    let implementation_cost = non_negative(
        "implementation_cost",
        required("implementation_cost", raw.implementation_cost.as_ref())?,
    )?;

    let avg_ticket_value = optional("avg_ticket_value", raw.avg_ticket_value.as_ref())?
        .map(|v| non_negative("avg_ticket_value", v))
        .transpose()?;
    let current_rate = optional(
        "current_conversion_rate_pct",
        raw.current_conversion_rate_pct.as_ref(),
    )?
    .map(|v| percentage("current_conversion_rate_pct", v))
    .transpose()?;
    let expected_rate = optional(
        "expected_conversion_rate_pct",
        raw.expected_conversion_rate_pct.as_ref(),
    )?
    .map(|v| percentage("expected_conversion_rate_pct", v))
    .transpose()?;

    let sales = match (avg_ticket_value, current_rate, expected_rate) {
        (Some(avg_ticket_value), Some(current), Some(expected)) => Some(SalesInputs {
            avg_ticket_value,
            current_conversion_rate_pct: current,
            expected_conversion_rate_pct: expected,
        }),
        _ => None,
    };

    Ok(RoiInput {
        monthly_queries,
        chatbot_automation_pct,
        manual_response_minutes,
        monthly_crm_hours,
        crm_automation_pct,
        employee_count,
        hourly_employee_cost,
        annual_license_cost,
        implementation_cost,
        sales,
    })
}

/// `None` for missing, `null` and blank strings.
fn present(value: Option<&RawValue>) -> Option<&RawValue> {
    match value {
        Some(RawValue::Text(s)) if s.trim().is_empty() => None,
        other => other,
    }
}

fn number(field: &str, value: &RawValue) -> Result<f64> {
    let n = match value {
        RawValue::Number(n) => *n,
        RawValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::new(field, format!("must be a number, got {s:?}")))?,
        RawValue::Other(v) => {
            return Err(ValidationError::new(field, format!("must be a number, got {v}")));
        }
    };
    if !n.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    Ok(n)
}

fn required(field: &str, value: Option<&RawValue>) -> Result<f64> {
    match present(value) {
        Some(v) => number(field, v),
        None => Err(ValidationError::new(field, "is required")),
    }
}

fn optional(field: &str, value: Option<&RawValue>) -> Result<Option<f64>> {
    present(value).map(|v| number(field, v)).transpose()
}

fn non_negative(field: &str, v: f64) -> Result<f64> {
    if v < 0.0 {
        return Err(ValidationError::new(field, format!("must not be negative, got {v}")));
    }
    Ok(v)
}

fn percentage(field: &str, v: f64) -> Result<f64> {
    if !(0.0..=100.0).contains(&v) {
        return Err(ValidationError::new(field, format!("must be between 0 and 100, got {v}")));
    }
    Ok(v)
}

/// Whole count `>= min`. Accepts `500`, `500.0` and `"500"`.
fn count(field: &str, value: Option<&RawValue>, min: u64) -> Result<u64> {
    let v = required(field, value)?;
    if v.fract() != 0.0 {
        return Err(ValidationError::new(field, format!("must be a whole number, got {v}")));
    }
    if v < min as f64 {
        return Err(ValidationError::new(field, format!("must be at least {min}, got {v}")));
    }
    // u64::MAX rounds up to 2^64 as f64, so equality is already out of range.
    if v >= u64::MAX as f64 {
        return Err(ValidationError::new(field, "is too large"));
    }
    Ok(v as u64)
}
