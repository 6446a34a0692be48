pub mod core;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::core::api::client::{ContentClient, FetchError, SITE_PATH};
use crate::core::api::config::{ClientConfig, ConfigError, BASE_URL_ENV, TIMEOUT_ENV};
use crate::core::api::url::video_embed_url;
use crate::core::content::models::{
    Announcement, AnnouncementCategory, Contact, Event, FooterLink, GalleryItem, Program,
    SiteConfig,
};
use crate::core::content::snapshot::{HomeSnapshot, HOME_EXCERPT_LENGTH};
use crate::core::format::datetime::{format_date, format_time};
use crate::core::format::text::DEFAULT_EXCERPT_LENGTH;

const LOG_LEVEL_ENV: &str = "MASJID_LOG_LEVEL";
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] FetchError),
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Debug, Parser)]
#[command(name = "masjid-app")]
#[command(version, about = "Read the public content of the masjid website")]
struct Cli {
    /// API base url, e.g. https://host/api (overrides MASJID_API_BASE)
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Request timeout in seconds (overrides MASJID_API_TIMEOUT_SECS)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Site branding, broadcast and donation details
    Site,
    Events,
    Programs,
    Contacts,
    Gallery,
    FooterLinks,
    /// Announcement cards, optionally limited to one category
    Announcements {
        #[arg(long, value_name = "CATEGORY_ID")]
        category: Option<String>,
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },
    /// A single announcement with its body rendered as text
    Announcement {
        slug: String,
        #[arg(long, default_value_t = 80)]
        width: usize,
    },
    Categories,
    /// Site config, latest announcements and upcoming events in one call
    Home,
    /// One request to the site endpoint, reporting whether the API answered
    Health,
}

#[derive(Debug, Clone, Serialize)]
struct BroadcastDto {
    name: Option<String>,
    date: Option<String>,
    time: Option<String>,
    video_url: String,
    embed_url: String,
}

#[derive(Debug, Clone, Serialize)]
struct SiteDto {
    brand_name: Option<String>,
    brand_subtitle: Option<String>,
    brand_est: Option<String>,
    brand_address: Option<String>,
    brand_email: Option<String>,
    brand_phone: Option<String>,
    logo_url: Option<String>,
    hero_headline: Option<String>,
    hero_body: Option<String>,
    hero_image_url: Option<String>,
    about_text: Option<String>,
    broadcast: Option<BroadcastDto>,
    donations_title: Option<String>,
    donations_body: Option<String>,
    donations_details: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct EventDto {
    id: String,
    title: String,
    badge: String,
    schedule: String,
    note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct ProgramDto {
    id: String,
    title: String,
    grades: String,
    description: String,
    days: String,
    time: String,
    note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct GalleryDto {
    id: String,
    title: String,
    image_url: String,
}

#[derive(Debug, Clone, Serialize)]
struct AnnouncementCardDto {
    id: String,
    slug: String,
    title: String,
    pinned: bool,
    date: String,
    preview: String,
    image_url: Option<String>,
    categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct AnnouncementDetailDto {
    id: String,
    slug: String,
    title: String,
    pinned: bool,
    date: String,
    image_url: Option<String>,
    categories: Vec<String>,
    body: String,
}

#[derive(Debug, Clone, Serialize)]
struct HealthDto {
    base_url: String,
    reachable: bool,
    has_data: bool,
    error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct HomeDto {
    site: Option<SiteDto>,
    announcements: Vec<AnnouncementCardDto>,
    events: Vec<EventDto>,
}

fn absolute(client: &ContentClient, url: Option<&str>) -> Option<String> {
    url.map(|value| client.to_absolute_url(value))
        .filter(|value| !value.is_empty())
}

fn site_to_dto(client: &ContentClient, site: SiteConfig) -> SiteDto {
    let broadcast = site.broadcast_video_url().map(|video| {
        let video_url = client.to_absolute_url(video);
        BroadcastDto {
            name: site.broadcast_name.clone(),
            date: site.broadcast_date.as_deref().map(format_date),
            time: site.broadcast_time.as_deref().map(format_time),
            embed_url: video_embed_url(&video_url),
            video_url,
        }
    });
    let hero_image_url = absolute(client, site.hero_image());
    let logo_url = absolute(client, site.logo_url.as_deref());

    SiteDto {
        brand_name: site.brand_name,
        brand_subtitle: site.brand_subtitle,
        brand_est: site.brand_est,
        brand_address: site.brand_address,
        brand_email: site.brand_email,
        brand_phone: site.brand_phone,
        logo_url,
        hero_headline: site.hero_headline,
        hero_body: site.hero_body,
        hero_image_url,
        about_text: site.about_text,
        broadcast,
        donations_title: site.donations_title,
        donations_body: site.donations_body,
        donations_details: site.donations_details,
    }
}

fn event_to_dto(event: Event) -> EventDto {
    let schedule = event.schedule();
    event_with_schedule(event, schedule)
}

fn home_event_to_dto(event: Event) -> EventDto {
    let schedule = event.home_schedule();
    event_with_schedule(event, schedule)
}

fn event_with_schedule(event: Event, schedule: String) -> EventDto {
    EventDto {
        badge: event.kind_label().to_string(),
        schedule,
        id: event.id,
        title: event.title,
        note: event.note.filter(|note| !note.trim().is_empty()),
    }
}

fn program_to_dto(program: Program) -> ProgramDto {
    ProgramDto {
        time: format_time(&program.time),
        id: program.id,
        title: program.title,
        grades: program.grades,
        description: program.description,
        days: program.days,
        note: program.note.filter(|note| !note.trim().is_empty()),
    }
}

fn gallery_to_dto(client: &ContentClient, item: GalleryItem) -> GalleryDto {
    GalleryDto {
        image_url: client.to_absolute_url(&item.image_url),
        id: item.id,
        title: item.title,
    }
}

fn category_names(announcement: &Announcement) -> Vec<String> {
    announcement
        .category_list()
        .iter()
        .map(|category| category.name.clone())
        .collect()
}

fn announcement_to_card(
    client: &ContentClient,
    announcement: &Announcement,
    excerpt_length: usize,
) -> AnnouncementCardDto {
    AnnouncementCardDto {
        id: announcement.id.clone(),
        slug: announcement.slug.clone(),
        title: announcement.title.clone(),
        pinned: announcement.is_pinned(),
        date: format_date(announcement.display_date()),
        preview: announcement.preview(excerpt_length),
        image_url: absolute(client, announcement.featured_image()),
        categories: category_names(announcement),
    }
}

fn announcement_to_detail(
    client: &ContentClient,
    announcement: &Announcement,
    width: usize,
) -> AnnouncementDetailDto {
    AnnouncementDetailDto {
        id: announcement.id.clone(),
        slug: announcement.slug.clone(),
        title: announcement.title.clone(),
        pinned: announcement.is_pinned(),
        date: format_date(announcement.display_date()),
        image_url: absolute(client, announcement.featured_image()),
        categories: category_names(announcement),
        body: announcement.body_text(width),
    }
}

fn home_to_dto(client: &ContentClient, home: HomeSnapshot) -> HomeDto {
    HomeDto {
        site: home.site.map(|site| site_to_dto(client, site)),
        announcements: home
            .announcements
            .iter()
            .map(|announcement| {
                announcement_to_card(client, announcement, HOME_EXCERPT_LENGTH)
            })
            .collect(),
        events: home.events.into_iter().map(home_event_to_dto).collect(),
    }
}

fn cli_override(cli: &Cli, key: &str) -> Option<String> {
    match key {
        BASE_URL_ENV => cli.base_url.clone(),
        TIMEOUT_ENV => cli.timeout.map(|secs| secs.to_string()),
        _ => None,
    }
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig, AppError> {
    Ok(ClientConfig::from_env_with(|key| cli_override(cli, key))?)
}

async fn execute(client: &ContentClient, command: Command) -> Result<String, AppError> {
    let output = match command {
        Command::Site => {
            let site = client
                .get_site_config()
                .await
                .map(|site| site_to_dto(client, site));
            serde_json::to_string_pretty(&site)?
        }
        Command::Events => {
            let events: Vec<EventDto> =
                client.get_events().await.into_iter().map(event_to_dto).collect();
            serde_json::to_string_pretty(&events)?
        }
        Command::Programs => {
            let programs: Vec<ProgramDto> = client
                .get_programs()
                .await
                .into_iter()
                .map(program_to_dto)
                .collect();
            serde_json::to_string_pretty(&programs)?
        }
        Command::Contacts => {
            let contacts: Vec<Contact> = client.get_contacts().await;
            serde_json::to_string_pretty(&contacts)?
        }
        Command::Gallery => {
            let items: Vec<GalleryDto> = client
                .get_gallery()
                .await
                .into_iter()
                .map(|item| gallery_to_dto(client, item))
                .collect();
            serde_json::to_string_pretty(&items)?
        }
        Command::FooterLinks => {
            let links: Vec<FooterLink> = client.get_footer_links().await;
            serde_json::to_string_pretty(&links)?
        }
        Command::Announcements { category, limit } => {
            let announcements = client.get_announcements().await;
            let cards: Vec<AnnouncementCardDto> = announcements
                .iter()
                .filter(|announcement| {
                    category
                        .as_deref()
                        .is_none_or(|id| announcement.in_category(id))
                })
                .take(limit.unwrap_or(usize::MAX))
                .map(|announcement| {
                    announcement_to_card(client, announcement, DEFAULT_EXCERPT_LENGTH)
                })
                .collect();
            serde_json::to_string_pretty(&cards)?
        }
        Command::Announcement { slug, width } => {
            let detail = client
                .get_announcement_by_slug(&slug)
                .await
                .map(|announcement| announcement_to_detail(client, &announcement, width));
            serde_json::to_string_pretty(&detail)?
        }
        Command::Categories => {
            let categories: Vec<AnnouncementCategory> =
                client.get_announcement_categories().await;
            serde_json::to_string_pretty(&categories)?
        }
        Command::Home => {
            let home = client.load_home().await;
            serde_json::to_string_pretty(&home_to_dto(client, home))?
        }
        Command::Health => {
            let result = client.fetch_envelope::<SiteConfig>(SITE_PATH).await;
            let health = HealthDto {
                base_url: client.config().base_url().to_string(),
                reachable: result.is_ok(),
                has_data: result.as_ref().is_ok_and(|envelope| envelope.data.is_some()),
                error: result.err().map(|error| error.to_string()),
            };
            serde_json::to_string_pretty(&health)?
        }
    };
    Ok(output)
}

fn init_tracing() {
    let level = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_tracing();
    tracing::debug!(base_url = config.base_url(), "using content api");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let output = runtime.block_on(async {
        let client = ContentClient::new(config)?;
        Ok::<String, AppError>(execute(&client, cli.command).await?)
    })?;
    println!("{output}");
    Ok(())
}
