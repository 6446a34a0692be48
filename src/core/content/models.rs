//! Rows as the content API delivers them. Missing or `null` columns fall
//! back to defaults and ids may arrive as numbers, so one sparse row does not
//! sink a whole list.

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::format::datetime::{format_date, format_time};
use crate::core::format::text::{html_to_text, strip_html, truncate};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    #[serde(deserialize_with = "number")]
    pub id: i64,
    pub brand_name: Option<String>,
    pub brand_subtitle: Option<String>,
    pub brand_est: Option<String>,
    pub brand_address: Option<String>,
    pub brand_email: Option<String>,
    pub brand_phone: Option<String>,
    pub logo_url: Option<String>,
    pub hero_headline: Option<String>,
    pub hero_body: Option<String>,
    pub hero_image_url: Option<String>,
    pub hero_image_fallback_url: Option<String>,
    pub live_video_url: Option<String>,
    pub fallback_video_url: Option<String>,
    pub broadcast_name: Option<String>,
    pub broadcast_date: Option<String>,
    pub broadcast_time: Option<String>,
    pub about_text: Option<String>,
    pub donations_title: Option<String>,
    pub donations_body: Option<String>,
    pub donations_details: Option<String>,
}

impl SiteConfig {
    /// The live stream when one is configured, otherwise the recorded fallback.
    pub fn broadcast_video_url(&self) -> Option<&str> {
        non_empty(self.live_video_url.as_deref())
            .or_else(|| non_empty(self.fallback_video_url.as_deref()))
    }

    pub fn hero_image(&self) -> Option<&str> {
        non_empty(self.hero_image_url.as_deref())
            .or_else(|| non_empty(self.hero_image_fallback_url.as_deref()))
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    #[default]
    Oneoff,
    Recurring,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Event {
    #[serde(deserialize_with = "text")]
    pub id: String,
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "or_default")]
    pub kind: EventKind,
    #[serde(deserialize_with = "text")]
    pub event_date: String,
    #[serde(deserialize_with = "text")]
    pub event_time: String,
    pub when_text: Option<String>,
    pub note: Option<String>,
    #[serde(deserialize_with = "text")]
    pub created_at: String,
}

impl Event {
    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            EventKind::Recurring => "RECURRING",
            EventKind::Oneoff | EventKind::Other => "ONE-TIME",
        }
    }

    /// Free-text "when" if the row has one, else the formatted date and time.
    pub fn schedule(&self) -> String {
        match non_empty(self.when_text.as_deref()) {
            Some(when) => when.to_string(),
            None => format!(
                "{} at {}",
                format_date(&self.event_date),
                format_time(&self.event_time)
            ),
        }
    }

    /// Home-feed variant of [`Event::schedule`] that shows the stored time as is.
    pub fn home_schedule(&self) -> String {
        match non_empty(self.when_text.as_deref()) {
            Some(when) => when.to_string(),
            None => format!("{} at {}", format_date(&self.event_date), self.event_time),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Program {
    #[serde(deserialize_with = "text")]
    pub id: String,
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "text")]
    pub grades: String,
    #[serde(deserialize_with = "text")]
    pub description: String,
    #[serde(deserialize_with = "text")]
    pub days: String,
    #[serde(deserialize_with = "text")]
    pub time: String,
    pub note: Option<String>,
    #[serde(deserialize_with = "text")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Contact {
    #[serde(deserialize_with = "text")]
    pub id: String,
    #[serde(deserialize_with = "text")]
    pub role: String,
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub email: String,
    #[serde(deserialize_with = "text")]
    pub phone: String,
    #[serde(deserialize_with = "text")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GalleryItem {
    #[serde(deserialize_with = "text")]
    pub id: String,
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "text")]
    pub image_url: String,
    #[serde(deserialize_with = "text")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FooterLink {
    #[serde(deserialize_with = "text")]
    pub id: String,
    #[serde(deserialize_with = "text")]
    pub label: String,
    #[serde(deserialize_with = "text")]
    pub url: String,
    #[serde(deserialize_with = "number")]
    pub sort_order: i64,
    #[serde(deserialize_with = "text")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnnouncementCategory {
    #[serde(deserialize_with = "text")]
    pub id: String,
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub slug: String,
    #[serde(deserialize_with = "text")]
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementStatus {
    Draft,
    #[default]
    Published,
    #[serde(other)]
    Other,
}

/// A boolean column that MySQL-style backends deliver as `0`/`1`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Flag {
    Bool(bool),
    Number(i64),
}

impl Flag {
    pub fn is_set(self) -> bool {
        match self {
            Flag::Bool(value) => value,
            Flag::Number(value) => value != 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Announcement {
    #[serde(deserialize_with = "text")]
    pub id: String,
    #[serde(deserialize_with = "text")]
    pub title: String,
    #[serde(deserialize_with = "text")]
    pub slug: String,
    #[serde(deserialize_with = "text")]
    pub content_html: String,
    pub excerpt: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub status: AnnouncementStatus,
    pub pinned: Option<Flag>,
    pub publish_at: Option<String>,
    pub created_by: Option<String>,
    #[serde(deserialize_with = "text")]
    pub created_at: String,
    #[serde(deserialize_with = "text")]
    pub updated_at: String,
    pub categories: Option<Vec<AnnouncementCategory>>,
    pub featured_image_url: Option<String>,
}

impl Announcement {
    pub fn is_pinned(&self) -> bool {
        self.pinned.is_some_and(Flag::is_set)
    }

    /// The publish timestamp when scheduled, otherwise the creation time.
    pub fn display_date(&self) -> &str {
        non_empty(self.publish_at.as_deref()).unwrap_or(&self.created_at)
    }

    /// Plain-text teaser built from the excerpt, or the body when there is none.
    pub fn preview(&self, max_length: usize) -> String {
        let source = non_empty(self.excerpt.as_deref()).unwrap_or(&self.content_html);
        truncate(&strip_html(source), max_length)
    }

    pub fn body_text(&self, width: usize) -> String {
        html_to_text(&self.content_html, width)
    }

    pub fn category_list(&self) -> &[AnnouncementCategory] {
        self.categories.as_deref().unwrap_or_default()
    }

    pub fn in_category(&self, category_id: &str) -> bool {
        self.category_list()
            .iter()
            .any(|category| category.id == category_id)
    }

    pub fn featured_image(&self) -> Option<&str> {
        non_empty(self.featured_image_url.as_deref())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

/// Text column that may arrive as `null`, a number or a boolean.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(match value {
        Some(Scalar::Text(text)) => text,
        Some(Scalar::Integer(number)) => number.to_string(),
        Some(Scalar::Float(number)) => number.to_string(),
        Some(Scalar::Bool(flag)) => flag.to_string(),
        None => String::new(),
    })
}

/// Integer column that may arrive as `null` or as a numeric string.
fn number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(match value {
        Some(Scalar::Integer(number)) => number,
        Some(Scalar::Float(number)) => number as i64,
        Some(Scalar::Text(text)) => text.trim().parse().unwrap_or_default(),
        Some(Scalar::Bool(flag)) => i64::from(flag),
        None => 0,
    })
}

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
