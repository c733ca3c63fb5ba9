use std::sync::Arc;

use datebook_lib::{Calendar, Store};
use parking_lot::RwLock;

pub mod agenda;
pub mod meeting_form;
pub mod month_grid;

/// Handle to the calendar and its meetings, shared by every component.
pub type Shared = Arc<RwLock<Schedule>>;

pub struct Schedule {
    pub calendar: Calendar,
    pub store: Store,
}

impl Schedule {
    pub fn shared(calendar: Calendar) -> Shared {
        Arc::new(RwLock::new(Self {
            calendar,
            store: Store::new(),
        }))
    }
}
