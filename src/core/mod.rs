//! Business rules: settlement math, month navigation, and the services that
//! own and persist the expense and member collections.

pub mod clock;
pub mod month;
pub mod services;
pub mod session;
pub mod settlement;

pub use clock::{Clock, FixedClock, SystemClock};
pub use month::{filter_by_month, months_present, sort_for_listing, MonthKey, MONTH_NAMES};
pub use session::{MonthView, Session};
pub use settlement::{compute_summaries, settle, MemberSummary, Settlement};
