use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};
use iced::widget::{button, column, container, row, scrollable, stack, text};
use iced::{Element, Event, Length, Subscription, Task, Theme};

use facewatch_core::auth::credential_context::CredentialContext;
use facewatch_core::search::domain::error::UploadError;
use facewatch_core::search::domain::search_backend::SearchBackend;
use facewatch_core::search::domain::session::{
    Applied, FaceSearchTicket, SearchMode, SearchSession, SessionConfig, TextSearchTicket,
};
use facewatch_core::search::domain::upload::{select_upload, UploadedImage};
use facewatch_core::search::infrastructure::http_backend::HttpSearchBackend;
use facewatch_core::shared::asset_path::public_asset_url;
use facewatch_core::shared::constants::IMAGE_EXTENSIONS;

use crate::settings::{Appearance, Settings};
use crate::tabs;
use crate::theme;
use crate::widgets::match_inspector::InspectorItem;
use crate::workers::photo_loader::{self, PhotoMessage};
use crate::workers::search_worker::{self, SearchWorkerMessage};

const WORKER_POLL_INTERVAL: Duration = Duration::from_millis(80);

// ---------------------------------------------------------------------------
// Tab enum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    PhotoSearch,
    TextSearch,
    Settings,
    About,
}

impl Tab {
    const ALL: &[Tab] = &[Tab::PhotoSearch, Tab::TextSearch, Tab::Settings, Tab::About];

    fn label(self) -> &'static str {
        match self {
            Tab::PhotoSearch => "Photo Search",
            Tab::TextSearch => "Text Search",
            Tab::Settings => "Settings",
            Tab::About => "About",
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    // Upload
    BrowsePhoto,
    PhotoPicked(Option<PathBuf>),
    FileHovered,
    FilesHoveredLeft,
    FileDropped(PathBuf),
    DropZoneHover(bool),
    BrowseHover(bool),
    // Face search
    ThresholdChanged(u8),
    ThresholdReleased,
    FaceOverlayPicked(usize),
    OverlayHover(usize, bool),
    BackToFaceChoice,
    MatchHover(usize, bool),
    OpenMatch(usize),
    // Text search
    TextQueryChanged(String),
    TextSearchSubmitted,
    OpenTextResult(usize),
    // Inspector
    CloseInspector,
    // Workers
    PollWorkers,
    // Settings
    ApiUrlChanged(String),
    TopKChanged(u32),
    RerunOnThresholdToggled(bool),
    AppearanceChanged(Appearance),
    HighContrastChanged(bool),
    FontScaleChanged(f32),
    RestoreDefaults,
    SignOut,
    PollSystemTheme,
}

// ---------------------------------------------------------------------------
// Supporting state
// ---------------------------------------------------------------------------

/// The revocable preview: renderer handle plus the natural dimensions the
/// overlay projector anchors to. Replaced wholesale on a new upload, which
/// releases the previous handle.
pub struct PreviewImage {
    pub handle: iced::widget::image::Handle,
    pub natural_width: u32,
    pub natural_height: u32,
}

impl PreviewImage {
    fn from_upload(upload: &UploadedImage) -> Self {
        Self {
            handle: iced::widget::image::Handle::from_path(&upload.path),
            natural_width: upload.natural_width,
            natural_height: upload.natural_height,
        }
    }
}

/// Remote asset lifecycle. `Failed` assets are hidden by every widget.
pub enum PhotoState {
    Loading,
    Ready(iced::widget::image::Handle),
    Failed,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SearchKind {
    Face,
    Text,
}

struct PendingSearch {
    generation: u64,
    kind: SearchKind,
    rx: Receiver<SearchWorkerMessage>,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    active_tab: Tab,
    pub settings: Settings,
    pub credential: CredentialContext,
    pub session: SearchSession,
    pub preview: Option<PreviewImage>,
    pub photos: HashMap<String, PhotoState>,
    pub inspector: Option<InspectorItem>,
    pub text_query: String,
    /// Upload gate rejection (non-image, unreadable file); session errors
    /// are separate and come from the orchestrator.
    pub upload_notice: Option<String>,
    pub drop_zone_hovered: bool,
    pub browse_hovered: bool,
    pub hovered_overlay: Option<usize>,
    pub hovered_match: Option<usize>,
    pending_search: Option<PendingSearch>,
    photo_rxs: Vec<Receiver<PhotoMessage>>,
    /// A hover arms exactly one accepted file per drop batch.
    drop_armed: bool,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let session = SearchSession::new(SessionConfig {
            top_k: settings.top_k,
            rerun_on_threshold: settings.rerun_on_threshold,
        });
        (
            Self {
                active_tab: Tab::PhotoSearch,
                credential: CredentialContext::hydrate(),
                session,
                settings,
                preview: None,
                photos: HashMap::new(),
                inspector: None,
                text_query: String::new(),
                upload_notice: None,
                drop_zone_hovered: false,
                browse_hovered: false,
                hovered_overlay: None,
                hovered_match: None,
                pending_search: None,
                photo_rxs: Vec::new(),
                drop_armed: false,
            },
            Task::none(),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.active_tab = tab;
                match tab {
                    Tab::PhotoSearch => self.session.set_mode(SearchMode::Face),
                    Tab::TextSearch => self.session.set_mode(SearchMode::Text),
                    _ => {}
                }
            }
            Message::BrowsePhoto => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Select a photo to search")
                            .add_filter("Images", IMAGE_EXTENSIONS)
                            .pick_file()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::PhotoPicked,
                );
            }
            Message::PhotoPicked(Some(path)) => {
                self.start_upload(vec![path]);
            }
            Message::PhotoPicked(None) => {}
            Message::FileHovered => {
                if self.active_tab == Tab::PhotoSearch {
                    self.drop_armed = true;
                    self.drop_zone_hovered = true;
                }
            }
            Message::FilesHoveredLeft => {
                self.drop_armed = false;
                self.drop_zone_hovered = false;
            }
            Message::FileDropped(path) => {
                self.drop_zone_hovered = false;
                if self.active_tab == Tab::PhotoSearch && self.drop_armed {
                    // First accepted file of the batch wins; rejected
                    // candidates leave the arm set so the next dropped
                    // file still gets its chance.
                    if self.start_upload(vec![path]) {
                        self.drop_armed = false;
                    }
                }
            }
            Message::DropZoneHover(hovered) => {
                self.drop_zone_hovered = hovered;
            }
            Message::BrowseHover(hovered) => {
                self.browse_hovered = hovered;
            }
            Message::ThresholdChanged(value) => {
                self.session.set_threshold(value as i64);
            }
            Message::ThresholdReleased => {
                if let Some(ticket) = self.session.threshold_rerun_ticket() {
                    self.launch_face_search(ticket);
                }
            }
            Message::FaceOverlayPicked(index) => {
                self.hovered_overlay = None;
                if let Some(ticket) = self.session.begin_face_reselect(index) {
                    self.launch_face_search(ticket);
                }
            }
            Message::OverlayHover(index, hovered) => {
                if hovered {
                    self.hovered_overlay = Some(index);
                } else if self.hovered_overlay == Some(index) {
                    self.hovered_overlay = None;
                }
            }
            Message::BackToFaceChoice => {
                self.session.clear_face_selection();
            }
            Message::MatchHover(index, hovered) => {
                if hovered {
                    self.hovered_match = Some(index);
                } else if self.hovered_match == Some(index) {
                    self.hovered_match = None;
                }
            }
            Message::OpenMatch(index) => {
                let opened = self
                    .session
                    .grid_face()
                    .and_then(|(_, face)| face.matches.get(index).cloned());
                if let Some(m) = opened {
                    self.queue_photo_loads(InspectorItem::match_photo_paths(&m));
                    self.inspector = Some(InspectorItem::Match(m));
                }
            }
            Message::OpenTextResult(index) => {
                if let Some(result) = self.session.text_results().get(index).cloned() {
                    self.inspector = Some(InspectorItem::Text(result));
                }
            }
            Message::CloseInspector => {
                self.inspector = None;
            }
            Message::TextQueryChanged(query) => {
                self.text_query = query;
            }
            Message::TextSearchSubmitted => {
                if let Some(ticket) = self.session.begin_text_search(&self.text_query, 1) {
                    self.launch_text_search(ticket);
                }
            }
            Message::PollWorkers => {
                self.poll_search_worker();
                self.poll_photo_loaders();
            }
            Message::ApiUrlChanged(url) => {
                self.settings.api_url = url;
                self.settings.save();
            }
            Message::TopKChanged(top_k) => {
                self.settings.top_k = top_k;
                self.session.set_top_k(top_k);
                self.settings.save();
            }
            Message::RerunOnThresholdToggled(enabled) => {
                self.settings.rerun_on_threshold = enabled;
                self.session.set_rerun_on_threshold(enabled);
                self.settings.save();
            }
            Message::AppearanceChanged(appearance) => {
                self.settings.appearance = appearance;
                self.settings.save();
            }
            Message::HighContrastChanged(enabled) => {
                self.settings.high_contrast = enabled;
                self.settings.save();
            }
            Message::FontScaleChanged(scale) => {
                self.settings.font_scale = scale;
                self.settings.save();
            }
            Message::RestoreDefaults => {
                let defaults = Settings::default();
                self.settings.top_k = defaults.top_k;
                self.settings.rerun_on_threshold = defaults.rerun_on_threshold;
                self.session.set_top_k(defaults.top_k);
                self.session.set_rerun_on_threshold(defaults.rerun_on_threshold);
                self.settings.save();
            }
            Message::SignOut => {
                self.credential.clear();
            }
            Message::PollSystemTheme => {
                // Theme is resolved fresh in theme() on every render,
                // so just requesting a redraw is enough.
            }
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let fs = self.settings.font_scale;
        let theme = self.theme();

        let tab_bar = row(Tab::ALL
            .iter()
            .map(|&tab| {
                let label = text(tab.label()).size(scaled(13.0, fs));
                let btn = button(label)
                    .on_press(Message::TabSelected(tab))
                    .padding([6, 14]);
                if tab == self.active_tab {
                    btn.style(button::primary).into()
                } else {
                    btn.style(button::text).into()
                }
            })
            .collect::<Vec<_>>())
        .spacing(2);

        let content: Element<'_, Message> = match self.active_tab {
            Tab::PhotoSearch => tabs::photo_search_tab::view(self, &theme),
            Tab::TextSearch => tabs::text_search_tab::view(self, &theme),
            Tab::Settings => tabs::settings_tab::view(&self.settings, &self.credential),
            Tab::About => tabs::about_tab::view(fs, &theme),
        };

        let tab_content = container(scrollable(content).height(Length::Fill))
            .padding(16)
            .height(Length::Fill);

        let base: Element<'_, Message> = column![tab_bar, tab_content]
            .spacing(0)
            .height(Length::Fill)
            .into();

        match &self.inspector {
            Some(item) => stack![
                base,
                crate::widgets::match_inspector::view(item, self, &theme)
            ]
            .into(),
            None => base,
        }
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.settings.appearance, self.settings.high_contrast)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let mut subs = vec![iced::event::listen_with(handle_event)];
        if self.pending_search.is_some() || !self.photo_rxs.is_empty() {
            subs.push(iced::time::every(WORKER_POLL_INTERVAL).map(|_| Message::PollWorkers));
        }
        if self.settings.appearance == Appearance::System {
            subs.push(iced::time::every(Duration::from_secs(2)).map(|_| Message::PollSystemTheme));
        }
        Subscription::batch(subs)
    }

    /// Resolve a stored backend path against the asset cache.
    pub fn photo_state(&self, stored_path: &str) -> Option<&PhotoState> {
        self.photos
            .get(&public_asset_url(&self.settings.api_url, stored_path))
    }

    // ── Internals ────────────────────────────────────────────────────

    fn backend(&self) -> Box<dyn SearchBackend> {
        Box::new(HttpSearchBackend::new(
            self.settings.api_url.clone(),
            self.credential.clone(),
        ))
    }

    /// Admit a dropped or picked file and kick off the search. Returns
    /// whether the candidate was accepted (consumed from its drop batch).
    fn start_upload(&mut self, candidates: Vec<PathBuf>) -> bool {
        match select_upload(&candidates) {
            Ok(upload) => {
                self.upload_notice = None;
                self.inspector = None;
                self.photos.clear();
                self.photo_rxs.clear();
                self.preview = Some(PreviewImage::from_upload(&upload));
                let ticket = self.session.begin_upload_search(upload);
                self.launch_face_search(ticket);
                true
            }
            Err(e @ UploadError::NotAnImage(_)) => {
                self.upload_notice = Some(e.to_string());
                false
            }
            Err(e) => {
                // An accepted image that failed to read still consumes the
                // drop; remaining batch files are ignored per the contract.
                self.upload_notice = Some(e.to_string());
                true
            }
        }
    }

    fn launch_face_search(&mut self, ticket: FaceSearchTicket) {
        let Some(upload) = self.session.upload() else {
            return;
        };
        let generation = ticket.generation;
        let rx = search_worker::spawn_face(self.backend(), upload.path.clone(), ticket);
        self.pending_search = Some(PendingSearch {
            generation,
            kind: SearchKind::Face,
            rx,
        });
    }

    fn launch_text_search(&mut self, ticket: TextSearchTicket) {
        let generation = ticket.generation;
        let rx = search_worker::spawn_text(self.backend(), ticket);
        self.pending_search = Some(PendingSearch {
            generation,
            kind: SearchKind::Text,
            rx,
        });
    }

    fn poll_search_worker(&mut self) {
        let Some(pending) = &self.pending_search else {
            return;
        };
        match pending.rx.try_recv() {
            Ok(SearchWorkerMessage::Face(generation, result)) => {
                self.pending_search = None;
                if self.session.apply_face_response(generation, result) == Applied::Current {
                    let paths = self.grid_photo_paths();
                    self.queue_photo_loads(paths);
                }
            }
            Ok(SearchWorkerMessage::Text(generation, result)) => {
                self.pending_search = None;
                self.session.apply_text_response(generation, result);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                // The worker died without its terminal message. The session
                // must still leave Searching, so synthesize the failure.
                let generation = pending.generation;
                let kind = pending.kind;
                self.pending_search = None;
                let error = facewatch_core::search::domain::error::SearchError::Network {
                    message: "search worker terminated unexpectedly".to_string(),
                };
                match kind {
                    SearchKind::Face => {
                        self.session.apply_face_response(generation, Err(error));
                    }
                    SearchKind::Text => {
                        self.session.apply_text_response(generation, Err(error));
                    }
                }
            }
        }
    }

    fn poll_photo_loaders(&mut self) {
        let rxs = std::mem::take(&mut self.photo_rxs);
        let mut still_open = Vec::with_capacity(rxs.len());
        for rx in rxs {
            loop {
                match rx.try_recv() {
                    Ok(msg) => self.apply_photo(msg),
                    Err(TryRecvError::Empty) => {
                        still_open.push(rx);
                        break;
                    }
                    Err(TryRecvError::Disconnected) => break,
                }
            }
        }
        self.photo_rxs = still_open;
    }

    fn apply_photo(&mut self, msg: PhotoMessage) {
        let state = match msg.bytes {
            Some(bytes) => PhotoState::Ready(iced::widget::image::Handle::from_bytes(bytes)),
            None => PhotoState::Failed,
        };
        self.photos.insert(msg.url, state);
    }

    fn grid_photo_paths(&self) -> Vec<String> {
        self.session
            .grid_face()
            .map(|(_, face)| {
                face.matches
                    .iter()
                    .filter_map(|m| m.grid_path())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn queue_photo_loads(&mut self, stored_paths: Vec<String>) {
        let urls: Vec<String> = stored_paths
            .iter()
            .map(|p| public_asset_url(&self.settings.api_url, p))
            .filter(|url| !self.photos.contains_key(url))
            .collect();
        if urls.is_empty() {
            return;
        }
        for url in &urls {
            self.photos.insert(url.clone(), PhotoState::Loading);
        }
        let token = self.credential.token().map(String::from);
        self.photo_rxs.push(photo_loader::spawn(urls, token));
    }
}

fn handle_event(
    event: Event,
    _status: iced::event::Status,
    _window: iced::window::Id,
) -> Option<Message> {
    match event {
        Event::Window(iced::window::Event::FileHovered(_)) => Some(Message::FileHovered),
        Event::Window(iced::window::Event::FilesHoveredLeft) => Some(Message::FilesHoveredLeft),
        Event::Window(iced::window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
        _ => None,
    }
}

/// Scale a base font size by the user's font_scale setting.
pub fn scaled(base: f32, font_scale: f32) -> f32 {
    (base * font_scale).round()
}
