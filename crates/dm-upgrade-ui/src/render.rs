use askama::Template;
use chrono::{DateTime, Utc};
use dm_upgrade::{Board, Card, EntityRole, Status, Target, Tone};
use dm_upgrade_config::{check_base_path, PageConfig};

use crate::UiError;

const STYLESHEET: &str = include_str!("../static/style.css");

/// How the page is going to be used.
#[derive(Debug, Clone)]
pub enum PageMode {
    /// Served by the dev server: every version is an editable form field.
    Live,
    /// Written to disk as a read-only page served from `base_path`.
    Static {
        base_path: String,
        generated_at: DateTime<Utc>,
    },
}

/// Template-ready view of one [`Card`].
struct CardView {
    name: String,
    version: i64,
    tone: &'static str,
    status: &'static str,
    message: String,
    action: String,
}

impl CardView {
    fn from_card(card: &Card) -> Self {
        Self {
            name: card.name.clone(),
            version: card.version,
            tone: tone_class(card.verdict.tone()),
            status: status_attr(card.verdict.status()),
            message: card.verdict.message().unwrap_or_default(),
            action: form_action(card.target),
        }
    }
}

#[derive(Template)]
#[template(path = "board.html")]
struct BoardPage<'a> {
    title: &'a str,
    base_href: String,
    stylesheet: &'static str,
    editable: bool,
    upstream: Vec<CardView>,
    services: Vec<CardView>,
    deployment_order: &'a str,
    footnote: &'a str,
    generated_at: String,
}

/// Render the whole board as one self-contained HTML page.
///
/// The evaluator runs fresh for every card on every call. A static page
/// whose `base_path` is not a plain URL path is refused.
pub fn render_page(board: &Board, page: &PageConfig, mode: &PageMode) -> Result<String, UiError> {
    let (upstream, services): (Vec<_>, Vec<_>) = board
        .assess()
        .into_iter()
        .partition(|card| card.role != EntityRole::Service);

    let (editable, base_href, generated_at) = match mode {
        PageMode::Live => (true, String::new(), String::new()),
        PageMode::Static {
            base_path,
            generated_at,
        } => {
            check_base_path(base_path).map_err(UiError::BasePath)?;
            (
                false,
                format!("{base_path}/"),
                generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            )
        }
    };

    BoardPage {
        title: &page.title,
        base_href,
        stylesheet: STYLESHEET,
        editable,
        upstream: upstream.iter().map(CardView::from_card).collect(),
        services: services.iter().map(CardView::from_card).collect(),
        deployment_order: &page.deployment_order,
        footnote: &page.footnote,
        generated_at,
    }
    .render()
    .map_err(UiError::from)
}

/// Form endpoint that replaces the field a card shows.
pub fn form_action(target: Target) -> String {
    match target {
        Target::Database => "/versions/database".into(),
        Target::Snapshot => "/versions/snapshot".into(),
        Target::Service(index) => format!("/versions/services/{index}"),
    }
}

fn tone_class(tone: Tone) -> &'static str {
    match tone {
        Tone::Nominal => "tone-nominal",
        Tone::WarningMild => "tone-warning-mild",
        Tone::WarningStrong => "tone-warning-strong",
    }
}

fn status_attr(status: Status) -> &'static str {
    match status {
        Status::Ok => "ok",
        Status::Outdated => "outdated",
        Status::Inconsistent => "inconsistent",
    }
}
