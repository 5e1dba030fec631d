use serde::{Deserialize, Serialize};

/// Coarse billing state of a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvoiceStatus {
    #[serde(rename = "Free")]
    Free,
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "paid")]
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Free => "Free",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }

    /// Parse a value read back from the database.
    ///
    /// Unrecognised values are logged and read as `pending`, which never
    /// carries a due date.
    pub fn from_db(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            tracing::warn!(raw = s, "Unknown invoice status in database, treating as pending");
            InvoiceStatus::Pending
        })
    }

    /// Statuses whose period can run out and be demoted to `pending`.
    pub fn can_lapse(&self) -> bool {
        matches!(self, InvoiceStatus::Paid | InvoiceStatus::Free)
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Pending
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Free" => Ok(InvoiceStatus::Free),
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(format!(
                "Invalid invoice status: {other} (expected one of Free, pending, paid)"
            )),
        }
    }
}
