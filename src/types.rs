use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::watch::Receiver;

use crate::models::Session;
use crate::schedule::{Day, ScheduleEntry, TimeSlot};
use crate::storage::Storage;

pub type SharedStorage = Arc<dyn Storage>;

/// Observes every session write or clear in this process.
pub type SessionReceiver = Receiver<Option<Session>>;

/// <(day, time slot), entries in that cell>
pub type Grid<'a> = BTreeMap<(Day, TimeSlot), Vec<&'a ScheduleEntry>>;
