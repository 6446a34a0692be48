use serde::Serialize;

use super::models::{
    Announcement, AnnouncementCategory, Contact, Event, Program, SiteConfig,
};
use crate::core::api::client::ContentClient;

pub const HOME_ANNOUNCEMENT_LIMIT: usize = 5;
pub const HOME_EVENT_LIMIT: usize = 3;
pub const HOME_EXCERPT_LENGTH: usize = 120;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct HomeSnapshot {
    pub site: Option<SiteConfig>,
    pub announcements: Vec<Announcement>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AboutSnapshot {
    pub site: Option<SiteConfig>,
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ScheduleSnapshot {
    pub events: Vec<Event>,
    pub programs: Vec<Program>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub announcements: Vec<Announcement>,
    pub categories: Vec<AnnouncementCategory>,
}

impl BoardSnapshot {
    /// Announcements tagged with `category_id`, or all of them for `None`.
    pub fn filtered(&self, category_id: Option<&str>) -> Vec<&Announcement> {
        self.announcements
            .iter()
            .filter(|announcement| category_id.is_none_or(|id| announcement.in_category(id)))
            .collect()
    }
}

// The reads in each snapshot run concurrently and fail independently.
impl ContentClient {
    pub async fn load_home(&self) -> HomeSnapshot {
        let (site, mut announcements, mut events) = tokio::join!(
            self.get_site_config(),
            self.get_announcements(),
            self.get_events()
        );
        announcements.truncate(HOME_ANNOUNCEMENT_LIMIT);
        events.truncate(HOME_EVENT_LIMIT);
        HomeSnapshot {
            site,
            announcements,
            events,
        }
    }

    pub async fn load_about(&self) -> AboutSnapshot {
        let (site, contacts) = tokio::join!(self.get_site_config(), self.get_contacts());
        AboutSnapshot { site, contacts }
    }

    pub async fn load_schedule(&self) -> ScheduleSnapshot {
        let (events, programs) = tokio::join!(self.get_events(), self.get_programs());
        ScheduleSnapshot { events, programs }
    }

    pub async fn load_board(&self) -> BoardSnapshot {
        let (announcements, categories) =
            tokio::join!(self.get_announcements(), self.get_announcement_categories());
        BoardSnapshot {
            announcements,
            categories,
        }
    }
}
