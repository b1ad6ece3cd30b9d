//! The club's weekly class programme: entries, grid projections and the
//! checks the admin editor runs before saving.

mod legend;
mod seed;
mod store;

pub use legend::GroupStyle;
pub use seed::default_programme;
pub use store::{LocalScheduleStore, RemoteScheduleStore, ScheduleEditor, ScheduleRepository, SCHEDULE_KEY};

use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::storage::StorageError;
use crate::types::Grid;

labelled_enum! {
    pub enum Day {
        Sunday => "DIMANCHE",
        Monday => "LUNDI",
        Tuesday => "MARDI",
        Wednesday => "MERCREDI",
        Thursday => "JEUDI",
        Friday => "VENDREDI",
        Saturday => "SAMEDI",
    }
}

labelled_enum! {
    pub enum TimeSlot {
        At0900 => "9H",
        At1030 => "10H30",
        At1200 => "12H",
        From1400To1530 => "14H-15H30",
        At1530 => "15H30",
        At1700 => "17H",
        From1700To1830 => "17H-18H30",
        From1830To2000 => "18H30-20H",
    }
}

labelled_enum! {
    pub enum GroupCode {
        Ecole => "ECOLE",
        Pub => "PUB",
        Cu10 => "CU10",
        Cu12 => "CU12",
        Cu14 => "CU14",
        Cu16 => "CU16",
        Cu18 => "CU18",
        A1 => "A1",
        A2 => "A2",
        A3 => "A3",
        A4 => "A4",
        A5 => "A5",
        I1 => "I1",
        Y1 => "Y1",
        L1 => "L1",
        Pubet => "PUBET",
        Et => "ET",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Only administrators can edit the schedule")]
    Forbidden,
    #[error("Please complete all schedule items before saving.")]
    Incomplete,
    #[error("Please resolve all conflicts before saving.")]
    Conflicts(Vec<Conflict>),
    #[error("Failed to persist schedule: {0}")]
    Storage(#[from] StorageError),
    #[error("{0}")]
    Api(#[from] ApiError),
}

fn new_entry_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ScheduleEntry {
    #[serde(default = "new_entry_id")]
    pub id: String,
    pub day: Day,
    pub time: TimeSlot,
    pub court: String,
    pub group: GroupCode,
}

impl ScheduleEntry {
    pub fn new(day: Day, time: TimeSlot, court: impl Into<String>, group: GroupCode) -> ScheduleEntry {
        ScheduleEntry {
            id: new_entry_id(),
            day,
            time,
            court: court.into(),
            group,
        }
    }
}

/// Entries whose group matches; `None` keeps everything.
pub fn filter_by_group(entries: &[ScheduleEntry], group: Option<GroupCode>) -> Vec<&ScheduleEntry> {
    entries
        .iter()
        .filter(|entry| group.map_or(true, |g| entry.group == g))
        .collect()
}

pub fn grid<'a>(entries: impl IntoIterator<Item = &'a ScheduleEntry>) -> Grid<'a> {
    let mut grid = Grid::new();
    for entry in entries {
        grid.entry((entry.day, entry.time)).or_default().push(entry);
    }
    grid
}

/// Group codes in the order they first appear.
pub fn unique_groups(entries: &[ScheduleEntry]) -> Vec<GroupCode> {
    let mut groups = Vec::new();
    for entry in entries {
        if !groups.contains(&entry.group) {
            groups.push(entry.group);
        }
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKind {
    /// Other groups share the same court, day and slot.
    Court { with: Vec<GroupCode> },
    /// The same group is on another court at the same day and slot.
    DoubleBooking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub index: usize,
    pub group: GroupCode,
    pub kind: ConflictKind,
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ConflictKind::Court { with } => {
                let with: Vec<&str> = with.iter().map(GroupCode::label).collect();
                write!(f, "#{} {} shares its court with {}", self.index, self.group, with.join(", "))
            }
            ConflictKind::DoubleBooking => write!(f, "#{} {} (double booking)", self.index, self.group),
        }
    }
}

fn same_slot(a: &ScheduleEntry, b: &ScheduleEntry) -> bool {
    a.day == b.day && a.time == b.time
}

pub fn detect_conflicts(entries: &[ScheduleEntry]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        let others = entries
            .iter()
            .enumerate()
            .filter(|(j, other)| *j != i && same_slot(entry, other));

        let mut sharing_court = Vec::new();
        let mut double_booked = false;
        for (_, other) in others {
            if other.court == entry.court {
                sharing_court.push(other.group);
            } else if other.group == entry.group {
                double_booked = true;
            }
        }

        if !sharing_court.is_empty() {
            conflicts.push(Conflict {
                index: i,
                group: entry.group,
                kind: ConflictKind::Court { with: sharing_court },
            });
        }
        if double_booked {
            conflicts.push(Conflict {
                index: i,
                group: entry.group,
                kind: ConflictKind::DoubleBooking,
            });
        }
    }
    conflicts
}

/// The checks run before an admin pushes a schedule to the server.
pub fn validate_for_save(entries: &[ScheduleEntry]) -> Result<(), ScheduleError> {
    if entries.iter().any(|entry| entry.court.trim().is_empty()) {
        return Err(ScheduleError::Incomplete);
    }
    let conflicts = detect_conflicts(entries);
    if !conflicts.is_empty() {
        return Err(ScheduleError::Conflicts(conflicts));
    }
    Ok(())
}
