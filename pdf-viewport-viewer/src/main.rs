use anyhow::{Context, Result};
use clap::Parser;
use iced::{
    alignment::{Horizontal, Vertical},
    time,
    widget::{
        button, column, container, horizontal_space, image as img, pick_list, row, scrollable,
        stack, text, text_input,
    },
    window, Color, Element, Length, Subscription, Task, Theme,
};
use pdf_viewport_core::{
    DocumentSource, FullscreenViewport, Notification, PageRenderer, RenderError, RenderPhase,
    RenderRequest, StepDirection, ViewerConfig, ViewportController, ViewportEvent,
};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod pdf_viewer;
mod renderer;
mod toast;

use pdf_viewer::PageCache;
use renderer::PdfRenderer;
use toast::ToastQueue;

const PADDING: f32 = 10.0;

#[derive(Parser, Debug)]
#[command(name = "pdf-viewport", version, about = "Paginated PDF viewer")]
struct Cli {
    /// PDF document to open
    document: Option<PathBuf>,

    /// JSON viewer configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial zoom in percent, must be one of the configured levels
    #[arg(long)]
    zoom: Option<u16>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("pdf_viewport_viewer=debug,pdf_viewport_core=debug,info")
            }),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if let Some(zoom) = cli.zoom {
        config.default_zoom = zoom;
        config.validate().context("Invalid --zoom")?;
    }

    let renderer = PdfRenderer::new()?;
    let source = cli
        .document
        .map(|path| DocumentSource::new(path.display().to_string()));

    iced::application("PDF Viewport", PdfViewer::update, PdfViewer::view)
        .subscription(PdfViewer::subscription)
        .theme(|_| Theme::Dark)
        .run_with(move || PdfViewer::new(config, renderer, source))?;
    Ok(())
}

#[derive(Debug, Clone)]
enum Message {
    Viewport(ViewportEvent),
    Load,
    DocumentLoaded(Result<u32, RenderError>),
    PageRendered {
        request: RenderRequest,
        result: Result<img::Handle, RenderError>,
    },
    ToggleFullscreen,
    FullscreenPageRendered {
        page: u32,
        result: Result<img::Handle, RenderError>,
    },
    WindowResized(f32),
    DismissToast(u64),
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentStatus {
    None,
    Loading,
    Loaded,
    Failed,
}

struct PdfViewer {
    renderer: PdfRenderer,
    source: Option<DocumentSource>,
    status: DocumentStatus,
    viewport: ViewportController<Sender<Notification>>,
    fullscreen: FullscreenViewport<Sender<Notification>>,
    notifications: Receiver<Notification>,
    toasts: ToastQueue,
    cache: PageCache,
    in_flight: Option<RenderRequest>,
    fullscreen_pages: Vec<(u32, Option<img::Handle>)>,
    fullscreen_in_flight: Option<u32>,
}

impl PdfViewer {
    fn new(
        config: ViewerConfig,
        renderer: PdfRenderer,
        source: Option<DocumentSource>,
    ) -> (Self, Task<Message>) {
        let (tx, rx) = mpsc::channel();
        let viewer = Self {
            renderer,
            status: DocumentStatus::None,
            viewport: ViewportController::new(&config, tx.clone()),
            fullscreen: FullscreenViewport::new(&config, tx),
            notifications: rx,
            toasts: ToastQueue::new(Duration::from_millis(config.toast_duration_ms)),
            cache: PageCache::new(config.page_cache_limit),
            in_flight: None,
            fullscreen_pages: Vec::new(),
            fullscreen_in_flight: None,
            source,
        };

        let measure = window::get_latest()
            .and_then(window::get_size)
            .map(|size| Message::WindowResized(size.width));
        let load = if viewer.source.is_some() {
            Task::done(Message::Load)
        } else {
            Task::none()
        };
        (viewer, Task::batch([measure, load]))
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::Viewport(event) => {
                if let Err(e) = self.viewport.apply(event) {
                    tracing::debug!("Viewport rejected event: {}", e);
                }
                Task::none()
            }
            Message::Load => {
                let Some(source) = self.source.clone() else {
                    return Task::none();
                };
                self.status = DocumentStatus::Loading;
                let result = self
                    .renderer
                    .load_document(&source)
                    .map(|info| info.total_pages);
                Task::done(Message::DocumentLoaded(result))
            }
            Message::DocumentLoaded(result) => {
                match result {
                    Ok(total_pages) => {
                        self.status = DocumentStatus::Loaded;
                        self.cache.clear();
                        self.in_flight = None;
                        self.viewport.on_document_loaded(total_pages);
                        self.fullscreen.on_document_loaded(total_pages);
                    }
                    Err(e) => {
                        tracing::error!("Failed to open PDF: {}", e);
                        if self.status != DocumentStatus::Loaded {
                            self.status = DocumentStatus::Failed;
                        }
                        self.viewport.on_document_load_failed();
                        if self.fullscreen.is_open() {
                            self.fullscreen.on_document_load_failed();
                        }
                    }
                }
                Task::none()
            }
            Message::PageRendered { request, result } => {
                if self.in_flight == Some(request) {
                    self.in_flight = None;
                }
                match result {
                    Ok(handle) => {
                        let layers = self.viewport.visible_layers();
                        let keep: Vec<_> = [layers.shown, layers.pending, Some(request.token)]
                            .into_iter()
                            .flatten()
                            .collect();
                        self.cache.insert(&request, handle, &keep);
                        self.viewport.on_page_render_succeeded(request.token);
                    }
                    Err(e) => {
                        self.viewport.on_page_render_failed(request.token, &e);
                    }
                }
                Task::none()
            }
            Message::ToggleFullscreen => {
                self.fullscreen.toggle();
                if !self.fullscreen.is_open() {
                    self.fullscreen_pages.clear();
                    self.fullscreen_in_flight = None;
                }
                Task::none()
            }
            Message::FullscreenPageRendered { page, result } => {
                if self.fullscreen_in_flight == Some(page) {
                    self.fullscreen_in_flight = None;
                }
                if self.fullscreen.on_page_rendered(page) {
                    let handle = match result {
                        Ok(handle) => Some(handle),
                        Err(e) => {
                            tracing::warn!("Fullscreen page {} failed: {}", page, e);
                            None
                        }
                    };
                    self.fullscreen_pages.push((page, handle));
                }
                Task::none()
            }
            Message::WindowResized(width) => {
                let width = Some((width - 2.0 * PADDING).max(1.0) as u32);
                self.viewport.on_container_width_changed(width);
                self.fullscreen.on_container_width_changed(width);
                Task::none()
            }
            Message::DismissToast(id) => {
                self.toasts.dismiss(id);
                Task::none()
            }
            Message::Tick => {
                self.toasts.prune_expired();
                Task::none()
            }
        };

        while let Ok(notification) = self.notifications.try_recv() {
            self.toasts.push(notification);
        }

        Task::batch([task, self.request_page_render(), self.request_fullscreen_render()])
    }

    /// Draw the page the viewport wants, delivering the result as a message
    fn request_page_render(&mut self) -> Task<Message> {
        let Some(request) = self.viewport.current_request() else {
            return Task::none();
        };
        if self.in_flight == Some(request) {
            return Task::none();
        }
        if self.viewport.render_blocked() {
            return Task::none();
        }
        match self.viewport.phase() {
            RenderPhase::Settled(token)
                if token == request.token && self.cache.contains(&request) =>
            {
                return Task::none()
            }
            _ => {}
        }

        let result = if self.cache.contains(&request) {
            self.cache
                .get(&request.token)
                .ok_or(RenderError::PageOutOfBounds { page: request.token.page })
        } else {
            self.renderer.render(&request).map(to_handle)
        };
        self.in_flight = Some(request);
        Task::done(Message::PageRendered { request, result })
    }

    /// Fullscreen pages are drawn one at a time, in order
    fn request_fullscreen_render(&mut self) -> Task<Message> {
        if self.fullscreen_in_flight.is_some() {
            return Task::none();
        }
        let Some(page) = self.fullscreen.next_unrendered() else {
            return Task::none();
        };
        let Some(request) = self
            .fullscreen
            .render_requests()
            .into_iter()
            .find(|request| request.token.page == page)
        else {
            return Task::none();
        };

        let result = self.renderer.render(&request).map(to_handle);
        self.fullscreen_in_flight = Some(page);
        Task::done(Message::FullscreenPageRendered { page, result })
    }

    fn subscription(&self) -> Subscription<Message> {
        let resize = window::resize_events().map(|(_id, size)| Message::WindowResized(size.width));
        if self.toasts.is_empty() {
            resize
        } else {
            Subscription::batch([
                resize,
                time::every(Duration::from_millis(250)).map(|_| Message::Tick),
            ])
        }
    }

    fn view(&self) -> Element<Message> {
        let content = column![self.toolbar(), self.page_view()]
            .spacing(10)
            .padding(PADDING);

        let mut layers = stack![content];
        if self.fullscreen.is_open() {
            layers = layers.push(self.fullscreen_view());
        }
        if !self.toasts.is_empty() {
            layers = layers.push(self.toast_view());
        }
        layers.into()
    }

    fn toolbar(&self) -> Element<Message> {
        let has_error = self.viewport.page_input().has_error();
        let page_input = text_input("Page", self.viewport.page_input().text())
            .on_input(|text| Message::Viewport(ViewportEvent::EditPageInput(text)))
            .on_submit(Message::Viewport(ViewportEvent::SubmitPageInput))
            .width(Length::Fixed(48.0))
            .style(move |theme, status| {
                let mut style = text_input::default(theme, status);
                if has_error {
                    style.border.color = Color::from_rgb(0.9, 0.25, 0.25);
                    style.border.width = 1.0;
                }
                style
            });

        let step = |direction| {
            self.viewport
                .can_step(direction)
                .then_some(Message::Viewport(ViewportEvent::Step(direction)))
        };

        let status = if self.viewport.is_loading() {
            text("Rendering…").size(14)
        } else {
            text("").size(14)
        };

        row![
            button("◀").on_press_maybe(step(StepDirection::Previous)),
            page_input,
            text(format!("/ {}", self.viewport.page_count_label())),
            button("▶").on_press_maybe(step(StepDirection::Next)),
            horizontal_space(),
            status,
            pick_list(
                self.viewport.zoom_levels().to_vec(),
                Some(self.viewport.scale()),
                |scale| Message::Viewport(ViewportEvent::SetScale(scale)),
            ),
            button("⟳").on_press(Message::Viewport(ViewportEvent::Rotate)),
            button("⛶").on_press(Message::ToggleFullscreen),
        ]
        .spacing(10)
        .align_y(Vertical::Center)
        .into()
    }

    fn page_view(&self) -> Element<Message> {
        let shown = self
            .viewport
            .visible_layers()
            .shown
            .and_then(|token| self.cache.get(&token));

        let body: Element<Message> = match (shown, self.status) {
            (Some(handle), _) => container(img(handle).width(Length::Shrink))
                .center_x(Length::Fill)
                .into(),
            (None, DocumentStatus::None) => centered("No document loaded"),
            (None, DocumentStatus::Failed) => column![
                text("The document could not be opened"),
                button("Retry").on_press(Message::Load),
            ]
            .spacing(10)
            .align_x(Horizontal::Center)
            .width(Length::Fill)
            .into(),
            (None, _) => centered("Rendering page..."),
        };

        scrollable(body)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn fullscreen_view(&self) -> Element<Message> {
        let total = self.fullscreen.total_pages().unwrap_or(0);
        let mut pages = column![].spacing(16).align_x(Horizontal::Center);
        for page in 1..=total {
            let drawn = self
                .fullscreen_pages
                .iter()
                .find(|(rendered, _)| *rendered == page);
            pages = pages.push(match drawn {
                Some((_, Some(handle))) => Element::from(img(handle.clone()).width(Length::Shrink)),
                Some((_, None)) => text(format!("Page {page} could not be displayed")).into(),
                None => text(format!("Loading page {page}...")).into(),
            });
        }

        container(
            column![
                row![horizontal_space(), button("✕").on_press(Message::ToggleFullscreen)],
                scrollable(pages).width(Length::Fill).height(Length::Fill),
            ]
            .spacing(10),
        )
        .padding(PADDING)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(container::rounded_box)
        .into()
    }

    fn toast_view(&self) -> Element<Message> {
        let mut toasts = column![].spacing(8).width(Length::Fixed(320.0));
        for toast in self.toasts.toasts() {
            let title = text(toast.notification.title.clone()).size(16);
            let title = if toast.is_destructive() {
                title.color(Color::from_rgb(0.95, 0.35, 0.35))
            } else {
                title
            };
            toasts = toasts.push(
                container(
                    row![
                        column![title, text(toast.notification.description.clone()).size(14)]
                            .spacing(4),
                        horizontal_space(),
                        button("×").on_press(Message::DismissToast(toast.id)),
                    ]
                    .spacing(8),
                )
                .padding(12)
                .style(container::rounded_box),
            );
        }

        container(toasts)
            .padding(20)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Right)
            .align_y(Vertical::Bottom)
            .into()
    }
}

fn centered<'a>(label: &'a str) -> Element<'a, Message> {
    container(text(label))
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding(48)
        .into()
}

fn to_handle(image: image::RgbaImage) -> img::Handle {
    let (width, height) = (image.width(), image.height());
    img::Handle::from_rgba(width, height, image.into_raw())
}
