use super::pricing::normalize_label;
use super::formulas::DAYS_PER_MONTH;

/// Month count used for "Indefinite" retention. A one-year stand-in for an
/// unbounded window, not a guarantee about real retention.
pub const INDEFINITE_RETENTION_MONTHS: f64 = 12.0;

/// The retention choices a workload is expected to use.
pub const RETENTION_LABELS: &[&str] = &[
    "30 days",
    "60 days",
    "90 days",
    "180 days",
    "1 physical month",
    "2 physical months",
    "Indefinite",
];

/// A parsed retention policy label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Retention {
    Days(u32),
    PhysicalMonths(u32),
    Indefinite,
}

impl Retention {
    /// Parse "N days", "1 physical month", "2 physical months" or
    /// "Indefinite". Only one and two physical months are recognized.
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = normalize_label(label);
        if normalized == "indefinite" {
            return Some(Self::Indefinite);
        }
        let (count, unit) = normalized.split_once(' ')?;
        let count: u32 = count.parse().ok()?;
        match unit {
            "day" | "days" => Some(Self::Days(count)),
            "physical month" | "physical months" if count == 1 || count == 2 => {
                Some(Self::PhysicalMonths(count))
            }
            _ => None,
        }
    }

    pub fn months(&self) -> f64 {
        match self {
            Self::Days(days) => *days as f64 / DAYS_PER_MONTH,
            Self::PhysicalMonths(months) => *months as f64,
            Self::Indefinite => INDEFINITE_RETENTION_MONTHS,
        }
    }
}

/// Convert a retention label into a storage-accumulation month multiplier.
/// Unrecognized labels count as one month.
pub fn retention_to_months(label: &str) -> f64 {
    match Retention::parse(label) {
        Some(retention) => retention.months(),
        None => {
            tracing::warn!(label, fallback = 1.0, "unknown retention policy, using default");
            1.0
        }
    }
}
