use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Raw wire input
// ---------------------------------------------------------------------------

/// One submitted form value before normalization.
/// The form sends numbers, numeric strings, or `""` for untouched optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    /// Anything else (bools, arrays, objects). Rejected by the normalizer with the field name.
    Other(serde_json::Value),
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

/// ROI parameters exactly as submitted. Accepts the input form's Spanish
/// field names as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRoiInput {
    #[serde(default, alias = "consultas_mes")]
    pub monthly_queries: Option<RawValue>,
    #[serde(default, alias = "porcentaje_automatizacion_consultas")]
    pub chatbot_automation_pct: Option<RawValue>,
    #[serde(default, alias = "tiempo_respuesta_manual")]
    pub manual_response_minutes: Option<RawValue>,
    #[serde(default, alias = "horas_mensuales_crm")]
    pub monthly_crm_hours: Option<RawValue>,
    #[serde(default, alias = "porcentaje_automatizacion_crm")]
    pub crm_automation_pct: Option<RawValue>,
    #[serde(default, alias = "numero_empleados")]
    pub employee_count: Option<RawValue>,
    #[serde(default, alias = "costo_horario_empleado")]
    pub hourly_employee_cost: Option<RawValue>,
    #[serde(default, alias = "costo_licencia_anual_bitrix")]
    pub annual_license_cost: Option<RawValue>,
    #[serde(default, alias = "costo_implementacion")]
    pub implementation_cost: Option<RawValue>,
    #[serde(default, alias = "valor_ticket_venta")]
    pub avg_ticket_value: Option<RawValue>,
    #[serde(default, alias = "tasa_conversion_actual")]
    pub current_conversion_rate_pct: Option<RawValue>,
    #[serde(default, alias = "tasa_conversion_esperada")]
    pub expected_conversion_rate_pct: Option<RawValue>,
}

// ---------------------------------------------------------------------------
// Normalized input
// ---------------------------------------------------------------------------

/// The sales-uplift group. Only constructible with all three values, so a
/// partially filled group cannot reach the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalesInputs {
    pub avg_ticket_value: f64,
    pub current_conversion_rate_pct: f64,
    pub expected_conversion_rate_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiInput {
    pub monthly_queries: u64,
    pub chatbot_automation_pct: f64,
    pub manual_response_minutes: f64,
    pub monthly_crm_hours: f64,
    pub crm_automation_pct: f64,
    pub employee_count: u32,
    pub hourly_employee_cost: f64,
    pub annual_license_cost: f64,
    pub implementation_cost: f64,
    #[serde(flatten)]
    pub sales: Option<SalesInputs>,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Why a derived ratio has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedMetric {
    /// First-year cost is zero, so ROI% would divide by zero.
    ZeroFirstYearCost,
    /// Monthly savings are zero or negative; the cost is never recovered.
    NoPayback,
}

impl std::fmt::Display for UndefinedMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UndefinedMetric::ZeroFirstYearCost => "zero_first_year_cost",
            UndefinedMetric::NoPayback => "no_payback",
        };
        write!(f, "{s}")
    }
}

/// A ratio that may be mathematically undefined for otherwise valid input.
/// Serializes as a plain number, or as the reason string when undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DerivedMetric {
    Defined(f64),
    Undefined(UndefinedMetric),
}

impl DerivedMetric {
    pub fn value(&self) -> Option<f64> {
        match self {
            DerivedMetric::Defined(v) => Some(*v),
            DerivedMetric::Undefined(_) => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, DerivedMetric::Undefined(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiResult {
    pub automated_queries: f64,
    pub chatbot_monthly_hours_saved: f64,
    pub chatbot_monthly_savings: f64,
    pub chatbot_annual_savings: f64,
    pub crm_monthly_hours_saved: f64,
    pub crm_monthly_savings: f64,
    pub crm_annual_savings: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_uplift_monthly_revenue: Option<f64>,
    pub total_monthly_savings: f64,
    pub total_annual_savings: f64,
    pub total_first_year_cost: f64,
    pub roi_pct: DerivedMetric,
    pub payback_months: DerivedMetric,
}

impl RoiResult {
    /// Human-readable lines, amounts rounded to cents. Used for lead logs and
    /// for collaborators that forward the result as text.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Chatbot hours saved per month: {:.2}", self.chatbot_monthly_hours_saved),
            format!(
                "Chatbot savings per month (ARS): {}",
                format_currency(self.chatbot_monthly_savings)
            ),
            format!("CRM hours saved per month: {:.2}", self.crm_monthly_hours_saved),
            format!("CRM savings per month (ARS): {}", format_currency(self.crm_monthly_savings)),
        ];
        if let Some(uplift) = self.sales_uplift_monthly_revenue {
            lines.push(format!(
                "Additional sales revenue per month (ARS): {}",
                format_currency(uplift)
            ));
        }
        lines.push(format!(
            "Total savings per year (ARS): {}",
            format_currency(self.total_annual_savings)
        ));
        lines.push(format!(
            "First-year cost (ARS): {}",
            format_currency(self.total_first_year_cost)
        ));
        lines.push(match self.roi_pct {
            DerivedMetric::Defined(v) => format!("ROI: {v:.2}%"),
            DerivedMetric::Undefined(reason) => format!("ROI: undefined ({reason})"),
        });
        lines.push(match self.payback_months {
            DerivedMetric::Defined(v) => format!("Payback: {v:.2} months"),
            DerivedMetric::Undefined(_) => "Payback: no payback achievable".to_string(),
        });
        lines
    }
}

/// `1234567.891` → `"1,234,567.89"`.
pub fn format_currency(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

// ---------------------------------------------------------------------------
// Submission envelope
// ---------------------------------------------------------------------------

/// Lead contact details. Opaque to the calculator; stored and logged as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Contact {
    #[serde(alias = "nombre_completo")]
    #[validate(length(min = 1, message = "is required"))]
    pub full_name: String,
    #[serde(alias = "empresa")]
    #[validate(length(min = 1, message = "is required"))]
    pub company: String,
    #[serde(default, alias = "telefono")]
    pub phone: Option<String>,
    #[validate(email(message = "is not a valid email address"))]
    pub email: String,
}

impl Contact {
    /// Trims every field, drops an empty phone, then validates.
    /// Reports the first failing field in declaration order.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let contact = Contact {
            full_name: self.full_name.trim().to_string(),
            company: self.company.trim().to_string(),
            phone: self
                .phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            email: self.email.trim().to_string(),
        };

        if let Err(errors) = contact.validate() {
            let field_errors = errors.field_errors();
            for field in ["full_name", "company", "email"] {
                let Some(errs) = field_errors
                    .iter()
                    .find(|(k, _)| k.to_string() == field)
                    .map(|(_, v)| *v)
                else {
                    continue;
                };
                let reason = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                return Err(ValidationError::new(field, reason));
            }
            return Err(ValidationError::new("contact", errors.to_string()));
        }

        Ok(contact)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    #[serde(alias = "calculo_roi")]
    pub roi: RawRoiInput,
    #[serde(alias = "contacto")]
    pub contact: Contact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
    pub result: RoiResult,
}

/// Initial form values, including the deployment's fixed implementation cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormDefaults {
    pub monthly_queries: u64,
    pub chatbot_automation_pct: f64,
    pub manual_response_minutes: f64,
    pub monthly_crm_hours: f64,
    pub crm_automation_pct: f64,
    pub employee_count: u32,
    pub hourly_employee_cost: f64,
    pub annual_license_cost: f64,
    pub implementation_cost: f64,
}

impl FormDefaults {
    pub fn with_implementation_cost(implementation_cost: f64) -> Self {
        use crate::config::form_defaults::*;
        Self {
            monthly_queries: MONTHLY_QUERIES,
            chatbot_automation_pct: CHATBOT_AUTOMATION_PCT,
            manual_response_minutes: MANUAL_RESPONSE_MINUTES,
            monthly_crm_hours: MONTHLY_CRM_HOURS,
            crm_automation_pct: CRM_AUTOMATION_PCT,
            employee_count: EMPLOYEE_COUNT,
            hourly_employee_cost: HOURLY_EMPLOYEE_COST,
            annual_license_cost: ANNUAL_LICENSE_COST,
            implementation_cost,
        }
    }
}
