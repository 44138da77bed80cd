use std::collections::HashSet;

use doctor_cell::SlotWindow;
use shared_models::time::MinuteOfDay;

use crate::models::Appointment;

/// Slots of `window` not held by an active appointment, in ascending order.
pub fn filter_available(window: &SlotWindow, appointments: &[Appointment]) -> Vec<MinuteOfDay> {
    let taken: HashSet<MinuteOfDay> = appointments
        .iter()
        .filter(|appointment| {
            appointment.is_active()
                && appointment.doctor_id == window.doctor_id
                && appointment.date == window.date
        })
        .map(|appointment| appointment.time)
        .collect();

    window.iter().filter(|slot| !taken.contains(slot)).collect()
}
