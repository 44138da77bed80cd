use std::iter::FusedIterator;

use chrono::{Datelike, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use shared_models::time::MinuteOfDay;

use crate::models::DoctorError;
use crate::services::schedule::ScheduleProvider;

pub const SLOT_GRANULARITY_MINUTES: u16 = 30;

/// The half-open window `[start, end)` a doctor works on one calendar date.
///
/// Iterating a window is lazy and can be repeated any number of times; each
/// call to [`SlotWindow::iter`] starts again from the first slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start: MinuteOfDay,
    pub end: MinuteOfDay,
}

impl SlotWindow {
    pub fn iter(&self) -> SlotIter {
        SlotIter {
            next: align_up(self.start.minutes(), SLOT_GRANULARITY_MINUTES),
            end: self.end.minutes(),
        }
    }

    /// True when `time` is one of the slots this window yields.
    pub fn contains(&self, time: MinuteOfDay) -> bool {
        time.is_aligned_to(SLOT_GRANULARITY_MINUTES) && self.start <= time && time < self.end
    }
}

impl IntoIterator for SlotWindow {
    type Item = MinuteOfDay;
    type IntoIter = SlotIter;

    fn into_iter(self) -> SlotIter {
        self.iter()
    }
}

impl IntoIterator for &SlotWindow {
    type Item = MinuteOfDay;
    type IntoIter = SlotIter;

    fn into_iter(self) -> SlotIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct SlotIter {
    next: u16,
    end: u16,
}

impl Iterator for SlotIter {
    type Item = MinuteOfDay;

    fn next(&mut self) -> Option<MinuteOfDay> {
        if self.next >= self.end {
            return None;
        }
        let slot = MinuteOfDay::new(self.next).ok()?;
        self.next += SLOT_GRANULARITY_MINUTES;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next >= self.end {
            0
        } else {
            ((self.end - self.next + SLOT_GRANULARITY_MINUTES - 1) / SLOT_GRANULARITY_MINUTES) as usize
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SlotIter {}

impl FusedIterator for SlotIter {}

fn align_up(minutes: u16, granularity: u16) -> u16 {
    minutes.div_ceil(granularity) * granularity
}

/// Resolve the slot window for `doctor_id` on `date` from the weekly schedule.
///
/// Fails with [`DoctorError::NoScheduleForDay`] when the doctor does not work
/// on that weekday; callers treat that as an empty slot set.
pub fn enumerate_slots<P>(
    provider: &P,
    doctor_id: Uuid,
    date: NaiveDate,
) -> Result<SlotWindow, DoctorError>
where
    P: ScheduleProvider + ?Sized,
{
    let weekday = date.weekday();

    let entry = provider
        .weekly_availability(doctor_id)?
        .into_iter()
        .filter(|entry| entry.weekday == weekday)
        .min_by_key(|entry| entry.start_time)
        .ok_or(DoctorError::NoScheduleForDay { doctor_id, weekday })?;

    debug!(
        "Doctor {} works {} to {} on {}",
        doctor_id, entry.start_time, entry.end_time, date
    );

    Ok(SlotWindow {
        doctor_id,
        date,
        start: entry.start_time,
        end: entry.end_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeeklyAvailability;
    use crate::services::schedule::MockScheduleProvider;
    use assert_matches::assert_matches;
    use chrono::Weekday;

    fn minute(value: u16) -> MinuteOfDay {
        MinuteOfDay::new(value).unwrap()
    }

    fn monday_schedule(doctor_id: Uuid, start: u16, end: u16) -> MockScheduleProvider {
        let mut provider = MockScheduleProvider::new();
        provider.expect_weekly_availability().returning(move |id| {
            Ok(vec![WeeklyAvailability {
                id: Uuid::new_v4(),
                doctor_id: id,
                weekday: Weekday::Mon,
                start_time: minute(start),
                end_time: minute(end),
            }]
            .into_iter()
            .filter(|entry| entry.doctor_id == doctor_id)
            .collect())
        });
        provider
    }

    // 2025-06-16 is a Monday
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()
    }

    #[test]
    fn test_full_day_window_has_sixteen_slots() {
        let doctor_id = Uuid::new_v4();
        let provider = monday_schedule(doctor_id, 540, 1020);

        let window = enumerate_slots(&provider, doctor_id, monday()).unwrap();
        let slots: Vec<u16> = window.iter().map(MinuteOfDay::minutes).collect();

        assert_eq!(slots.len(), 16);
        assert_eq!(slots.first(), Some(&540));
        assert_eq!(slots.last(), Some(&990));
        assert!(!slots.contains(&1020));
        assert_eq!(window.iter().len(), 16);
    }

    #[test]
    fn test_window_is_restartable() {
        let doctor_id = Uuid::new_v4();
        let provider = monday_schedule(doctor_id, 540, 660);
        let window = enumerate_slots(&provider, doctor_id, monday()).unwrap();

        let first: Vec<MinuteOfDay> = window.into_iter().collect();
        let second: Vec<MinuteOfDay> = (&window).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![minute(540), minute(570), minute(600), minute(630)]);
    }

    #[test]
    fn test_no_schedule_for_weekday() {
        let doctor_id = Uuid::new_v4();
        let provider = monday_schedule(doctor_id, 540, 1020);
        let tuesday = monday().succ_opt().unwrap();

        assert_matches!(
            enumerate_slots(&provider, doctor_id, tuesday),
            Err(DoctorError::NoScheduleForDay { weekday: Weekday::Tue, .. })
        );
    }

    #[test]
    fn test_unknown_doctor_has_no_schedule() {
        let provider = monday_schedule(Uuid::new_v4(), 540, 1020);
        assert_matches!(
            enumerate_slots(&provider, Uuid::new_v4(), monday()),
            Err(DoctorError::NoScheduleForDay { .. })
        );
    }

    #[test]
    fn test_off_grid_start_is_rounded_up() {
        let doctor_id = Uuid::new_v4();
        let provider = monday_schedule(doctor_id, 555, 660);
        let window = enumerate_slots(&provider, doctor_id, monday()).unwrap();

        let slots: Vec<u16> = window.iter().map(MinuteOfDay::minutes).collect();
        assert_eq!(slots, vec![570, 600, 630]);
        assert!(slots.iter().all(|slot| slot % SLOT_GRANULARITY_MINUTES == 0));
        assert!(!window.contains(minute(555)));
    }

    #[test]
    fn test_slots_stay_inside_window_for_all_grid_windows() {
        let doctor_id = Uuid::new_v4();
        for start in (0..1410).step_by(90) {
            for end in ((start + 30)..1440).step_by(150) {
                let window = SlotWindow {
                    doctor_id,
                    date: monday(),
                    start: minute(start),
                    end: minute(end),
                };
                let slots: Vec<MinuteOfDay> = window.iter().collect();
                assert_eq!(slots.len(), window.iter().len());
                for slot in slots {
                    assert_eq!(slot.minutes() % SLOT_GRANULARITY_MINUTES, 0);
                    assert!(minute(start) <= slot && slot < minute(end));
                    assert!(window.contains(slot));
                }
            }
        }
    }

    #[test]
    fn test_provider_errors_propagate() {
        let mut provider = MockScheduleProvider::new();
        provider
            .expect_weekly_availability()
            .returning(|_| Err(DoctorError::Store("offline".to_string())));

        assert_matches!(
            enumerate_slots(&provider, Uuid::new_v4(), monday()),
            Err(DoctorError::Store(_))
        );
    }
}
