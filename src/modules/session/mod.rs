pub mod record;
pub mod ledger;

pub use ledger::{ClosedSession, SessionLedger};
pub use record::{FeedbackSubmission, Session, SessionState};
