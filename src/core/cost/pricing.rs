use serde::{Deserialize, Serialize};

/// Billing unit a price row is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceCategory {
    /// USD per GB-month
    Storage,
    /// USD per instance-hour
    Compute,
    /// USD per DBU-hour
    Dbu,
}

impl PriceCategory {
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "storage" | "s3" => Some(Self::Storage),
            "compute" | "ec2" => Some(Self::Compute),
            "dbu" => Some(Self::Dbu),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Storage => "Storage",
            Self::Compute => "Compute",
            Self::Dbu => "DBU",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Storage => "GB-month",
            Self::Compute => "instance-hour",
            Self::Dbu => "DBU-hour",
        }
    }

    pub fn all() -> &'static [PriceCategory] {
        &[Self::Storage, Self::Compute, Self::Dbu]
    }
}

/// One row of the static price list.
#[derive(Debug, Clone, Serialize)]
pub struct UnitPrice {
    pub category: PriceCategory,
    pub tier: &'static str,
    pub price: f64,
}

/// All known unit prices (AWS list prices, USD).
static PRICING_TABLE: &[UnitPrice] = &[
    // S3 storage tiers
    UnitPrice { category: PriceCategory::Storage, tier: "Standard", price: 0.023 },
    UnitPrice { category: PriceCategory::Storage, tier: "Intelligent-Tiering", price: 0.022 },
    UnitPrice { category: PriceCategory::Storage, tier: "Standard-IA", price: 0.0125 },
    UnitPrice { category: PriceCategory::Storage, tier: "OneZone-IA", price: 0.01 },
    UnitPrice { category: PriceCategory::Storage, tier: "Glacier", price: 0.004 },
    UnitPrice { category: PriceCategory::Storage, tier: "GlacierDeep", price: 0.00099 },
    // EC2 instances
    UnitPrice { category: PriceCategory::Compute, tier: "i3.xlarge", price: 0.312 },
    UnitPrice { category: PriceCategory::Compute, tier: "i3.2xlarge", price: 0.624 },
    UnitPrice { category: PriceCategory::Compute, tier: "i3.4xlarge", price: 1.248 },
    UnitPrice { category: PriceCategory::Compute, tier: "i3.8xlarge", price: 2.496 },
    UnitPrice { category: PriceCategory::Compute, tier: "i3.16xlarge", price: 4.992 },
    UnitPrice { category: PriceCategory::Compute, tier: "r5.xlarge", price: 0.252 },
    UnitPrice { category: PriceCategory::Compute, tier: "r5.2xlarge", price: 0.504 },
    UnitPrice { category: PriceCategory::Compute, tier: "r5.4xlarge", price: 1.008 },
    UnitPrice { category: PriceCategory::Compute, tier: "r5.8xlarge", price: 2.016 },
    UnitPrice { category: PriceCategory::Compute, tier: "r5.12xlarge", price: 3.024 },
    // Databricks units
    UnitPrice { category: PriceCategory::Dbu, tier: "Enterprise", price: 0.75 },
    UnitPrice { category: PriceCategory::Dbu, tier: "DLT_Advanced", price: 0.36 },
    UnitPrice { category: PriceCategory::Dbu, tier: "DLT_Core", price: 0.20 },
    UnitPrice { category: PriceCategory::Dbu, tier: "DLT_Pro", price: 0.25 },
    UnitPrice { category: PriceCategory::Dbu, tier: "Jobs", price: 0.15 },
];

/// Normalize a tier label for comparison: trimmed, lowercase, runs of
/// whitespace collapsed. "  Standard-IA " -> "standard-ia"
pub(crate) fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Look up a price row by category and tier label. Returns None if unknown.
pub fn lookup(category: PriceCategory, tier: &str) -> Option<&'static UnitPrice> {
    let normalized = normalize_label(tier);
    PRICING_TABLE
        .iter()
        .find(|p| p.category == category && normalize_label(p.tier) == normalized)
}

/// All rows, optionally restricted to one category, in table order.
pub fn rows(category: Option<PriceCategory>) -> Vec<&'static UnitPrice> {
    PRICING_TABLE
        .iter()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .collect()
}

/// A categorical selector that resolves to exactly one price row.
///
/// `from_label` is strict; `resolve` is total and substitutes `fallback()`
/// for anything it does not recognize, logging the substitution.
pub trait Tier: Sized + Copy + 'static {
    const CATEGORY: PriceCategory;
    /// Human-readable name of the selector, used in warnings.
    const KIND: &'static str;

    fn from_label(label: &str) -> Option<Self>;
    fn label(&self) -> &'static str;
    fn fallback() -> Self;
    fn all() -> &'static [Self];

    /// Key of this tier's row in the price list.
    fn price_key(&self) -> &'static str {
        self.label()
    }

    fn resolve(label: &str) -> Self {
        match Self::from_label(label) {
            Some(tier) => tier,
            None => {
                let fallback = Self::fallback();
                tracing::warn!(
                    kind = Self::KIND,
                    label,
                    fallback = fallback.label(),
                    "unknown {}, using default",
                    Self::KIND
                );
                fallback
            }
        }
    }

    fn unit_price(&self) -> f64 {
        // Every variant has a row; enforced by tests.
        lookup(Self::CATEGORY, self.price_key())
            .map(|p| p.price)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageTier {
    Standard,
    IntelligentTiering,
    StandardIa,
    OneZoneIa,
    Glacier,
    GlacierDeep,
}

impl Tier for StorageTier {
    const CATEGORY: PriceCategory = PriceCategory::Storage;
    const KIND: &'static str = "storage tier";

    fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "standard" => Some(Self::Standard),
            "intelligent-tiering" | "intelligent tiering" => Some(Self::IntelligentTiering),
            "standard-ia" => Some(Self::StandardIa),
            "onezone-ia" | "one zone-ia" => Some(Self::OneZoneIa),
            "glacier" => Some(Self::Glacier),
            "glacierdeep" | "glacier deep archive" => Some(Self::GlacierDeep),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::IntelligentTiering => "Intelligent-Tiering",
            Self::StandardIa => "Standard-IA",
            Self::OneZoneIa => "OneZone-IA",
            Self::Glacier => "Glacier",
            Self::GlacierDeep => "GlacierDeep",
        }
    }

    fn fallback() -> Self {
        Self::Standard
    }

    fn all() -> &'static [Self] {
        &[
            Self::Standard,
            Self::IntelligentTiering,
            Self::StandardIa,
            Self::OneZoneIa,
            Self::Glacier,
            Self::GlacierDeep,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceType {
    I3Xlarge,
    I3_2xlarge,
    I3_4xlarge,
    I3_8xlarge,
    I3_16xlarge,
    R5Xlarge,
    R5_2xlarge,
    R5_4xlarge,
    R5_8xlarge,
    R5_12xlarge,
}

impl Tier for InstanceType {
    const CATEGORY: PriceCategory = PriceCategory::Compute;
    const KIND: &'static str = "instance type";

    fn from_label(label: &str) -> Option<Self> {
        let normalized = normalize_label(label);
        Self::all()
            .iter()
            .copied()
            .find(|t| t.label() == normalized)
    }

    fn label(&self) -> &'static str {
        match self {
            Self::I3Xlarge => "i3.xlarge",
            Self::I3_2xlarge => "i3.2xlarge",
            Self::I3_4xlarge => "i3.4xlarge",
            Self::I3_8xlarge => "i3.8xlarge",
            Self::I3_16xlarge => "i3.16xlarge",
            Self::R5Xlarge => "r5.xlarge",
            Self::R5_2xlarge => "r5.2xlarge",
            Self::R5_4xlarge => "r5.4xlarge",
            Self::R5_8xlarge => "r5.8xlarge",
            Self::R5_12xlarge => "r5.12xlarge",
        }
    }

    fn fallback() -> Self {
        Self::R5Xlarge
    }

    fn all() -> &'static [Self] {
        &[
            Self::I3Xlarge,
            Self::I3_2xlarge,
            Self::I3_4xlarge,
            Self::I3_8xlarge,
            Self::I3_16xlarge,
            Self::R5Xlarge,
            Self::R5_2xlarge,
            Self::R5_4xlarge,
            Self::R5_8xlarge,
            Self::R5_12xlarge,
        ]
    }
}

/// Databricks product a DBU is billed under. Accepts both the raw price keys
/// ("DLT_Core") and the service tier names shown to users
/// ("Delta Live Tables (Core)").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbuType {
    Enterprise,
    DltAdvanced,
    DltCore,
    DltPro,
    Jobs,
}

impl Tier for DbuType {
    const CATEGORY: PriceCategory = PriceCategory::Dbu;
    const KIND: &'static str = "service tier";

    fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "enterprise" => Some(Self::Enterprise),
            "jobs" | "databricks jobs" => Some(Self::Jobs),
            "dlt_core" | "delta live tables (core)" => Some(Self::DltCore),
            "dlt_pro" | "delta live tables (pro)" => Some(Self::DltPro),
            "dlt_advanced" | "delta live tables (advanced)" => Some(Self::DltAdvanced),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Enterprise => "Enterprise",
            Self::DltAdvanced => "Delta Live Tables (Advanced)",
            Self::DltCore => "Delta Live Tables (Core)",
            Self::DltPro => "Delta Live Tables (Pro)",
            Self::Jobs => "Databricks Jobs",
        }
    }

    fn price_key(&self) -> &'static str {
        match self {
            Self::Enterprise => "Enterprise",
            Self::DltAdvanced => "DLT_Advanced",
            Self::DltCore => "DLT_Core",
            Self::DltPro => "DLT_Pro",
            Self::Jobs => "Jobs",
        }
    }

    fn fallback() -> Self {
        Self::Jobs
    }

    fn all() -> &'static [Self] {
        &[
            Self::Jobs,
            Self::DltCore,
            Self::DltPro,
            Self::DltAdvanced,
            Self::Enterprise,
        ]
    }
}

/// Transformation complexity for simple-mode CONF storage sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn resolve(label: &str) -> Self {
        Self::from_label(label).unwrap_or_else(|| {
            tracing::warn!(
                label,
                fallback = Self::Medium.label(),
                "unknown complexity, using default"
            );
            Self::Medium
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn storage_factor(&self) -> f64 {
        match self {
            Self::Low => 0.7,
            Self::Medium => 1.0,
            Self::High => 1.5,
        }
    }
}

/// Resolve any category/label pair to a unit price, falling back to the
/// category's default tier (Standard, r5.xlarge, Jobs) on an unknown label.
pub fn resolve_price(category: PriceCategory, label: &str) -> f64 {
    match category {
        PriceCategory::Storage => StorageTier::resolve(label).unit_price(),
        PriceCategory::Compute => InstanceType::resolve(label).unit_price(),
        PriceCategory::Dbu => DbuType::resolve(label).unit_price(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_every_tier_priced<T: Tier>() {
        for tier in T::all() {
            assert!(
                lookup(T::CATEGORY, tier.price_key()).is_some(),
                "{} '{}' has no price row",
                T::KIND,
                tier.label()
            );
        }
    }

    #[test]
    fn every_tier_has_a_price_row() {
        assert_every_tier_priced::<StorageTier>();
        assert_every_tier_priced::<InstanceType>();
        assert_every_tier_priced::<DbuType>();
    }

    #[test]
    fn labels_round_trip_through_from_label() {
        for t in StorageTier::all() {
            assert_eq!(StorageTier::from_label(t.label()), Some(*t));
        }
        for t in InstanceType::all() {
            assert_eq!(InstanceType::from_label(t.label()), Some(*t));
        }
        for t in DbuType::all() {
            assert_eq!(DbuType::from_label(t.label()), Some(*t));
            assert_eq!(DbuType::from_label(t.price_key()), Some(*t));
        }
    }

    #[test]
    fn lookup_is_case_and_whitespace_insensitive() {
        let p = lookup(PriceCategory::Storage, "  standard-ia ").unwrap();
        assert!((p.price - 0.0125).abs() < 1e-12);
    }

    #[test]
    fn lookup_respects_category() {
        assert!(lookup(PriceCategory::Compute, "Standard").is_none());
        assert!(lookup(PriceCategory::Dbu, "r5.xlarge").is_none());
    }

    #[test]
    fn resolve_price_known_tiers() {
        assert!((resolve_price(PriceCategory::Storage, "Standard") - 0.023).abs() < 1e-12);
        assert!((resolve_price(PriceCategory::Compute, "r5.xlarge") - 0.252).abs() < 1e-12);
        assert!((resolve_price(PriceCategory::Dbu, "Enterprise") - 0.75).abs() < 1e-12);
        assert!(
            (resolve_price(PriceCategory::Dbu, "Delta Live Tables (Pro)") - 0.25).abs() < 1e-12
        );
    }

    #[test]
    fn resolve_price_falls_back_on_unknown() {
        assert!((resolve_price(PriceCategory::Storage, "Tape") - 0.023).abs() < 1e-12);
        assert!((resolve_price(PriceCategory::Compute, "m7g.medium") - 0.252).abs() < 1e-12);
        assert!((resolve_price(PriceCategory::Dbu, "Serverless") - 0.15).abs() < 1e-12);
    }

    #[test]
    fn complexity_factors() {
        assert!((Complexity::resolve("Low").storage_factor() - 0.7).abs() < 1e-12);
        assert!((Complexity::resolve("high").storage_factor() - 1.5).abs() < 1e-12);
        assert_eq!(Complexity::resolve("extreme"), Complexity::Medium);
    }

    #[test]
    fn category_from_id_accepts_aliases() {
        assert_eq!(PriceCategory::from_id("S3"), Some(PriceCategory::Storage));
        assert_eq!(PriceCategory::from_id("ec2"), Some(PriceCategory::Compute));
        assert_eq!(PriceCategory::from_id("dbu"), Some(PriceCategory::Dbu));
        assert_eq!(PriceCategory::from_id("gpu"), None);
    }

    #[test]
    fn rows_filter_by_category() {
        assert_eq!(rows(Some(PriceCategory::Storage)).len(), 6);
        assert_eq!(rows(Some(PriceCategory::Compute)).len(), 10);
        assert_eq!(rows(Some(PriceCategory::Dbu)).len(), 5);
        assert_eq!(rows(None).len(), 21);
    }
}
