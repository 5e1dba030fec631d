//! Subscription lifecycle rules.
//!
//! Everything here is pure: callers pass the clock reading in. All arithmetic
//! happens on calendar days, so the time of day of a status change never shifts
//! which day a lapse or reminder lands on.
//!
//! Month and year additions clamp to the last valid day of the target month
//! (Jan 31 + 1 month = Feb 29 in 2024, Feb 29 + 1 year = Feb 28).

use chrono::{Days, Months, NaiveDate, NaiveDateTime};
use strum::{Display, EnumString};

use crate::domain::entities::{invoice_status::InvoiceStatus, plan::PlanKind};

pub const FREE_TRIAL_DAYS: u64 = 7;
pub const REMINDER_LEAD_DAYS: i64 = 2;

/// How the daily sweep decides a renewal reminder is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReminderPolicy {
    /// Only on the day exactly `REMINDER_LEAD_DAYS` before the due date.
    #[default]
    Exact,
    /// Any day in `(0, REMINDER_LEAD_DAYS]` before the due date, so a missed
    /// daily run is caught up on the next one.
    Window,
}

impl ReminderPolicy {
    pub fn reminder_due(self, kind: &PlanKind, changed_at: NaiveDateTime, today: NaiveDate) -> bool {
        match self {
            ReminderPolicy::Exact => is_reminder_due(kind, changed_at, today),
            ReminderPolicy::Window => is_within_reminder_window(kind, changed_at, today),
        }
    }
}

pub fn day_of(ts: NaiveDateTime) -> NaiveDate {
    ts.date()
}

/// Length of one paid billing period, `None` for plans without one.
pub fn plan_duration(kind: &PlanKind) -> Option<Months> {
    match kind {
        PlanKind::Monthly => Some(Months::new(1)),
        PlanKind::SixMonth => Some(Months::new(6)),
        PlanKind::Yearly => Some(Months::new(12)),
        PlanKind::FreeTrial | PlanKind::Unknown(_) => None,
    }
}

/// Status a freshly signed-up subscriber starts in.
pub fn initial_status(kind: &PlanKind) -> InvoiceStatus {
    if kind.is_free_trial() {
        InvoiceStatus::Free
    } else {
        InvoiceStatus::Pending
    }
}

/// Day the current paid or trial period ends.
///
/// Defined only for `paid` with a recognized paid plan and for `Free` on the
/// Free Trial plan.
pub fn due_date(
    status: InvoiceStatus,
    kind: &PlanKind,
    changed_at: NaiveDateTime,
) -> Option<NaiveDate> {
    let start = day_of(changed_at);
    match status {
        InvoiceStatus::Paid => start.checked_add_months(plan_duration(kind)?),
        InvoiceStatus::Free if kind.is_free_trial() => {
            start.checked_add_days(Days::new(FREE_TRIAL_DAYS))
        }
        _ => None,
    }
}

/// True once `today` is strictly past the due date.
pub fn has_lapsed(
    status: InvoiceStatus,
    kind: &PlanKind,
    changed_at: NaiveDateTime,
    today: NaiveDate,
) -> bool {
    due_date(status, kind, changed_at).is_some_and(|due| due < today)
}

pub fn days_until_due(
    status: InvoiceStatus,
    kind: &PlanKind,
    changed_at: NaiveDateTime,
    today: NaiveDate,
) -> Option<i64> {
    due_date(status, kind, changed_at).map(|due| (due - today).num_days())
}

/// Reminder check for `paid` subscribers: due exactly two days from `today`.
pub fn is_reminder_due(kind: &PlanKind, changed_at: NaiveDateTime, today: NaiveDate) -> bool {
    days_until_due(InvoiceStatus::Paid, kind, changed_at, today) == Some(REMINDER_LEAD_DAYS)
}

pub fn is_within_reminder_window(
    kind: &PlanKind,
    changed_at: NaiveDateTime,
    today: NaiveDate,
) -> bool {
    matches!(
        days_until_due(InvoiceStatus::Paid, kind, changed_at, today),
        Some(days) if days > 0 && days <= REMINDER_LEAD_DAYS
    )
}

/// Validity window `(start, due)` opened by marking a subscriber `paid` at `now`.
pub fn renewal_window(kind: &PlanKind, now: NaiveDateTime) -> Option<(NaiveDate, NaiveDate)> {
    due_date(InvoiceStatus::Paid, kind, now).map(|due| (day_of(now), due))
}
