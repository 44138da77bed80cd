pub mod doctor;
pub mod schedule;
pub mod slots;

pub use doctor::DoctorDirectory;
pub use schedule::{ScheduleBook, ScheduleProvider};
pub use slots::{enumerate_slots, SlotIter, SlotWindow, SLOT_GRANULARITY_MINUTES};
