//! Club notice board, kept in storage under `announcements`. Anyone may read
//! it; coaches and admins post and delete.

use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::session::SessionContext;
use crate::storage::{Storage, StorageError};
use crate::types::SharedStorage;

pub const ANNOUNCEMENTS_KEY: &str = "announcements";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_name: String,
    pub author_role: String,
    #[serde(default)]
    pub important: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum AnnouncementError {
    #[error("You must be logged in to manage announcements")]
    SignedOut,
    #[error("Only coaches and administrators can manage announcements")]
    Forbidden,
    #[error("Title is required")]
    MissingTitle,
    #[error("Content is required")]
    MissingContent,
    #[error("Failed to save announcements: {0}")]
    Storage(#[from] StorageError),
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn welcome_notices(now: DateTime<Utc>) -> Vec<Announcement> {
    let notice = |title: &str, content: &str, author: &str, important, age_days| Announcement {
        id: new_id(),
        title: title.to_string(),
        content: content.to_string(),
        author_name: author.to_string(),
        author_role: "admin".to_string(),
        important,
        created_at: now - Duration::days(age_days),
    };
    vec![
        notice(
            "Welcome to Tennis Club Management",
            "Welcome to our new tennis club management system. This platform will help you manage your lessons, teams, and availability.",
            "Admin",
            true,
            0,
        ),
        notice(
            "Court Maintenance Schedule",
            "Courts 3 and 4 will be under maintenance next weekend. Please adjust your schedules accordingly.",
            "Facility Manager",
            false,
            1,
        ),
        notice(
            "Summer Tournament Registration Open",
            "Registration for the summer tournament is now open. Please register by June 15th to participate.",
            "Tournament Director",
            true,
            2,
        ),
    ]
}

pub struct AnnouncementBoard {
    storage: SharedStorage,
    session: SessionContext,
}

impl AnnouncementBoard {
    pub fn new(storage: SharedStorage, session: SessionContext) -> AnnouncementBoard {
        AnnouncementBoard { storage, session }
    }

    /// Newest first. A board that was never written is seeded with the
    /// welcome notices; an unreadable one shows as empty.
    pub fn list(&self) -> Vec<Announcement> {
        let Some(raw) = self.storage.get(ANNOUNCEMENTS_KEY) else {
            let seeded = welcome_notices(Utc::now());
            if let Err(e) = self.persist(&seeded) {
                warn!("announcements:: could not seed the board: {e}");
            }
            return seeded;
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("announcements:: stored board is unreadable, showing none: {e}");
            Vec::new()
        })
    }

    pub fn can_manage(&self) -> bool {
        self.session
            .get_session()
            .map_or(false, |s| s.user.role.can_manage_announcements())
    }

    pub fn create(&self, title: &str, content: &str, important: bool) -> Result<Announcement, AnnouncementError> {
        let session = self.session.get_session().ok_or(AnnouncementError::SignedOut)?;
        if !session.user.role.can_manage_announcements() {
            return Err(AnnouncementError::Forbidden);
        }
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() {
            return Err(AnnouncementError::MissingTitle);
        }
        if content.is_empty() {
            return Err(AnnouncementError::MissingContent);
        }

        let announcement = Announcement {
            id: new_id(),
            title: title.to_string(),
            content: content.to_string(),
            author_name: session.user.full_name(),
            author_role: session.user.role.label().to_string(),
            important,
            created_at: Utc::now(),
        };
        let mut board = self.list();
        board.insert(0, announcement.clone());
        self.persist(&board)?;
        info!("announcements:: {} posted {:?}", announcement.author_name, announcement.title);
        Ok(announcement)
    }

    /// `Ok(false)` when no announcement has that id; nothing is written then.
    pub fn delete(&self, id: &str) -> Result<bool, AnnouncementError> {
        if !self.can_manage() {
            return Err(match self.session.get_session() {
                Some(_) => AnnouncementError::Forbidden,
                None => AnnouncementError::SignedOut,
            });
        }
        let mut board = self.list();
        let before = board.len();
        board.retain(|a| a.id != id);
        if board.len() == before {
            return Ok(false);
        }
        self.persist(&board)?;
        Ok(true)
    }

    fn persist(&self, board: &[Announcement]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(board)?;
        self.storage.set(ANNOUNCEMENTS_KEY, &raw)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{Role, Session, UserProfile};
    use crate::storage::MemoryStorage;

    fn board_as(role: Option<Role>) -> (AnnouncementBoard, SharedStorage) {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        let session = SessionContext::new(storage.clone());
        if let Some(role) = role {
            session
                .set_session(&Session {
                    token: "tok".into(),
                    user: UserProfile {
                        first_name: "Karim".into(),
                        last_name: "Ziani".into(),
                        phone_number: None,
                        role,
                    },
                })
                .unwrap();
        }
        (AnnouncementBoard::new(storage.clone(), session), storage)
    }

    #[test]
    fn missing_board_is_seeded_once() {
        let (board, storage) = board_as(None);
        let first = board.list();
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].title, "Welcome to Tennis Club Management");
        assert!(first[0].created_at > first[2].created_at);
        assert!(storage.get(ANNOUNCEMENTS_KEY).is_some());

        // ids are stable across reads once stored
        assert_eq!(board.list(), first);
    }

    #[test]
    fn empty_board_is_not_reseeded() {
        let (board, storage) = board_as(None);
        storage.set(ANNOUNCEMENTS_KEY, "[]").unwrap();
        assert!(board.list().is_empty());

        storage.set(ANNOUNCEMENTS_KEY, "{broken").unwrap();
        assert!(board.list().is_empty());
    }

    #[test]
    fn newest_post_comes_first() {
        let (board, _) = board_as(Some(Role::Coach));
        let first = board.create("Rain delay", "Courts open at 10.", false).unwrap();
        let second = board.create("Club night", "Friday from 19H.", true).unwrap();

        let listed = board.list();
        assert_eq!(listed.len(), 5);
        assert_eq!(listed[0], second);
        assert_eq!(listed[1], first);
        assert_eq!(second.author_name, "Karim Ziani");
        assert_eq!(second.author_role, "coach");
    }

    #[test]
    fn only_coaches_and_admins_post() {
        let (player, _) = board_as(Some(Role::Player));
        assert!(!player.can_manage());
        assert!(matches!(player.create("t", "c", false), Err(AnnouncementError::Forbidden)));

        let (anonymous, _) = board_as(None);
        assert!(matches!(anonymous.create("t", "c", false), Err(AnnouncementError::SignedOut)));

        let (admin, _) = board_as(Some(Role::Admin));
        assert!(admin.can_manage());
        assert!(admin.create("t", "c", false).is_ok());
    }

    #[test]
    fn blank_fields_are_rejected() {
        let (board, _) = board_as(Some(Role::Admin));
        assert!(matches!(board.create("  ", "c", false), Err(AnnouncementError::MissingTitle)));
        assert!(matches!(board.create("t", "", false), Err(AnnouncementError::MissingContent)));
    }

    #[test]
    fn delete_reports_whether_anything_matched() {
        let (board, _) = board_as(Some(Role::Admin));
        let posted = board.create("Rain delay", "Courts open at 10.", false).unwrap();
        let before = board.list();

        assert!(!board.delete("no-such-id").unwrap());
        assert_eq!(board.list(), before);

        assert!(board.delete(&posted.id).unwrap());
        assert!(board.list().iter().all(|a| a.id != posted.id));
        assert_eq!(board.list().len(), before.len() - 1);
    }

    #[test]
    fn players_cannot_delete() {
        let (board, _) = board_as(Some(Role::Player));
        let id = board.list()[0].id.clone();
        assert!(matches!(board.delete(&id), Err(AnnouncementError::Forbidden)));
        assert_eq!(board.list().len(), 3);
    }

    #[test]
    fn reads_boards_written_by_the_web_client() {
        let (board, storage) = board_as(None);
        storage
            .set(
                ANNOUNCEMENTS_KEY,
                r#"[{"id":"lx1","title":"Hi","content":"x","authorName":"Admin","authorRole":"admin","important":true,"createdAt":"2025-03-01T09:30:00.000Z"}]"#,
            )
            .unwrap();
        let listed = board.list();
        assert_eq!(listed[0].id, "lx1");
        assert_eq!(listed[0].created_at.to_rfc3339(), "2025-03-01T09:30:00+00:00");
    }
}
