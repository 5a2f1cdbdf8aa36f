//! The bill splitter: an in-memory session for sharing a bill between a
//! group of people and working out who needs to pay whom.

mod endpoints;
mod page;
mod session;
mod settlement;

pub use endpoints::{
    add_participant_endpoint, calculate_split_endpoint, remove_participant_endpoint,
    reset_split_endpoint, set_paid_amount_endpoint, set_payer_endpoint, set_splitter_endpoint,
    set_total_bill_endpoint,
};
pub use page::get_split_page;
pub use session::{ParticipantId, SplitSession};
