use super::{Day, GroupCode, ScheduleEntry, TimeSlot};

use super::Day::*;
use super::GroupCode::*;
use super::TimeSlot::*;

const COURT_2: &str = "COURT 2";
const COURT_7: &str = "COURT 7";
const COURT_8: &str = "COURT 8";

// Season programme as printed on the club board.
const PROGRAMME: &[(Day, TimeSlot, &str, GroupCode)] = &[
    (Friday, At0900, COURT_8, Ecole),
    (Saturday, At0900, COURT_8, Ecole),
    (Friday, At1030, COURT_7, Pub),
    (Friday, At1030, COURT_2, Pub),
    (Saturday, At1030, COURT_7, Pub),
    (Saturday, At1030, COURT_2, Pub),
    (Friday, At1200, COURT_8, Ecole),
    (Friday, At1200, COURT_7, Cu10),
    (Friday, At1200, COURT_2, A1),
    (Saturday, At1200, COURT_8, Ecole),
    (Saturday, At1200, COURT_7, Cu10),
    (Saturday, At1200, COURT_2, A1),
    (Sunday, From1400To1530, COURT_8, Ecole),
    (Friday, From1400To1530, COURT_8, L1),
    (Friday, From1400To1530, COURT_7, Cu12),
    (Saturday, From1400To1530, COURT_8, Cu12),
    (Tuesday, From1400To1530, COURT_8, Ecole),
    (Tuesday, From1400To1530, COURT_2, Et),
    (Tuesday, From1400To1530, COURT_7, Pubet),
    (Sunday, At1530, COURT_7, Cu10),
    (Friday, At1530, COURT_7, A2),
    (Saturday, At1530, COURT_7, A2),
    (Sunday, At1700, COURT_8, I1),
    (Monday, At1700, COURT_8, I1),
    (Tuesday, At1700, COURT_8, Cu12),
    (Wednesday, At1700, COURT_8, I1),
    (Thursday, At1700, COURT_8, I1),
    (Friday, At1700, COURT_8, Cu14),
    (Friday, At1700, COURT_7, Cu14),
    (Saturday, At1700, COURT_8, Cu14),
    (Saturday, At1700, COURT_7, Cu14),
    (Sunday, From1700To1830, COURT_8, A5),
    (Sunday, From1700To1830, COURT_7, Y1),
    (Monday, From1700To1830, COURT_8, A4),
    (Monday, From1700To1830, COURT_7, A3),
    (Tuesday, From1700To1830, COURT_8, Cu14),
    (Tuesday, From1700To1830, COURT_7, Y1),
    (Wednesday, From1700To1830, COURT_8, A5),
    (Wednesday, From1700To1830, COURT_7, Y1),
    (Thursday, From1700To1830, COURT_8, A4),
    (Thursday, From1700To1830, COURT_7, A3),
    (Friday, From1700To1830, COURT_8, Cu16),
    (Friday, From1700To1830, COURT_7, L1),
    (Saturday, From1700To1830, COURT_8, Cu16),
    (Saturday, From1700To1830, COURT_7, L1),
    (Sunday, From1830To2000, COURT_8, Cu18),
    (Sunday, From1830To2000, COURT_7, Y1),
    (Monday, From1830To2000, COURT_8, Y1),
    (Tuesday, From1830To2000, COURT_8, L1),
    (Tuesday, From1830To2000, COURT_7, Cu16),
    (Wednesday, From1830To2000, COURT_8, Cu18),
    (Thursday, From1830To2000, COURT_7, Y1),
    (Friday, From1830To2000, COURT_8, Cu18),
    (Saturday, From1830To2000, COURT_8, Cu16),
];

pub fn default_programme() -> Vec<ScheduleEntry> {
    PROGRAMME
        .iter()
        .map(|&(day, time, court, group)| ScheduleEntry::new(day, time, court, group))
        .collect()
}
