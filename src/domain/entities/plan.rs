use serde::{Serialize, Serializer};

pub const FREE_TRIAL_PLAN: &str = "Free Trial";

/// Billing tier of a subscriber, classified once from the free-text plan name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanKind {
    Monthly,
    SixMonth,
    Yearly,
    FreeTrial,
    Unknown(String),
}

impl PlanKind {
    /// Classify a plan name.
    ///
    /// `"Free Trial"` must match exactly. The paid tiers match by substring in
    /// the order Monthly, 6-Month, Yearly, so a name carrying two keywords
    /// resolves to the first one in that order.
    pub fn from_plan_name(name: &str) -> Self {
        let name = name.trim();
        if name == FREE_TRIAL_PLAN {
            PlanKind::FreeTrial
        } else if name.contains("Monthly") {
            PlanKind::Monthly
        } else if name.contains("6-Month") {
            PlanKind::SixMonth
        } else if name.contains("Yearly") {
            PlanKind::Yearly
        } else {
            PlanKind::Unknown(name.to_string())
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanKind::Monthly => "monthly",
            PlanKind::SixMonth => "six_month",
            PlanKind::Yearly => "yearly",
            PlanKind::FreeTrial => "free_trial",
            PlanKind::Unknown(_) => "unknown",
        }
    }

    pub fn is_free_trial(&self) -> bool {
        matches!(self, PlanKind::FreeTrial)
    }
}

impl Serialize for PlanKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
