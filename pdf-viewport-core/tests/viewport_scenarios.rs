//! End-to-end viewer sessions against a scripted renderer

use std::collections::HashSet;

use pdf_viewport_core::{
    DocumentInfo, DocumentSource, Notification, NotificationKind, PageRenderer, RenderError,
    RenderRequest, Scale, StepDirection, ViewerConfig, ViewportController,
};
use pretty_assertions::assert_eq;

/// Renders instantly, but the session decides when results are delivered
struct ScriptedRenderer {
    total_pages: Option<u32>,
    failing_pages: HashSet<u32>,
    rendered: Vec<RenderRequest>,
}

impl ScriptedRenderer {
    fn with_pages(total_pages: u32) -> Self {
        Self {
            total_pages: Some(total_pages),
            failing_pages: HashSet::new(),
            rendered: Vec::new(),
        }
    }

    fn broken() -> Self {
        Self {
            total_pages: None,
            failing_pages: HashSet::new(),
            rendered: Vec::new(),
        }
    }
}

impl PageRenderer for ScriptedRenderer {
    type Output = (u32, u32);

    fn load_document(&mut self, source: &DocumentSource) -> Result<DocumentInfo, RenderError> {
        self.total_pages
            .map(|total_pages| DocumentInfo { total_pages })
            .ok_or_else(|| RenderError::Load(format!("{source} is not a PDF")))
    }

    fn render(&mut self, request: &RenderRequest) -> Result<(u32, u32), RenderError> {
        self.rendered.push(*request);
        if self.failing_pages.contains(&request.token.page) {
            return Err(RenderError::Page {
                page: request.token.page,
                reason: "bad content stream".into(),
            });
        }
        Ok((request.token.page, request.scaled_width()))
    }
}

type Viewer = ViewportController<Vec<Notification>>;

fn open(renderer: &mut ScriptedRenderer) -> Viewer {
    let mut viewer = ViewportController::new(&ViewerConfig::default(), Vec::new());
    match renderer.load_document(&DocumentSource::new("file:///tmp/report.pdf")) {
        Ok(info) => viewer.on_document_loaded(info.total_pages),
        Err(_) => viewer.on_document_load_failed(),
    }
    viewer
}

/// Render whatever the viewer currently wants and deliver the outcome
fn pump(viewer: &mut Viewer, renderer: &mut ScriptedRenderer) {
    let Some(request) = viewer.current_request() else {
        return;
    };
    if viewer.render_blocked() {
        return;
    }
    match renderer.render(&request) {
        Ok(_) => {
            viewer.on_page_render_succeeded(request.token);
        }
        Err(err) => {
            viewer.on_page_render_failed(request.token, &err);
        }
    }
}

fn scale(percent: u16) -> Scale {
    Scale::from_percent(percent).unwrap()
}

#[test]
fn five_page_walkthrough() {
    let mut renderer = ScriptedRenderer::with_pages(5);
    let mut viewer = open(&mut renderer);
    assert_eq!(viewer.total_pages(), Some(5));

    viewer.set_page(3);
    assert_eq!(viewer.current_page(), 3);

    viewer.step_page(StepDirection::Next);
    assert_eq!(viewer.current_page(), 4);

    viewer.step_page(StepDirection::Next);
    viewer.step_page(StepDirection::Next);
    assert_eq!(viewer.current_page(), 5);

    viewer.step_page(StepDirection::Next);
    assert_eq!(viewer.current_page(), 5);
    assert_eq!(viewer.page_input().text(), "5");

    pump(&mut viewer, &mut renderer);
    assert_eq!(renderer.rendered.last().map(|r| r.token.page), Some(5));
    assert!(!viewer.is_loading());
}

#[test]
fn load_failure_without_prior_load() {
    let mut renderer = ScriptedRenderer::broken();
    let viewer = open(&mut renderer);

    assert_eq!(viewer.sink().len(), 1);
    assert_eq!(viewer.sink()[0].kind, NotificationKind::Destructive);
    assert_eq!(viewer.total_pages(), None);
    assert_eq!(viewer.current_page(), 1);
    assert_eq!(viewer.current_request(), None);
}

#[test]
fn document_loaded_twice_is_idempotent() {
    let mut renderer = ScriptedRenderer::with_pages(10);
    let mut once = open(&mut renderer);
    let mut twice = open(&mut renderer);
    twice.on_document_loaded(10);

    assert_eq!(once.state(), twice.state());
    assert_eq!(once.phase(), twice.phase());

    pump(&mut once, &mut renderer);
    pump(&mut twice, &mut renderer);
    assert_eq!(once.state(), twice.state());
}

#[test]
fn out_of_order_settlement_keeps_latest_zoom() {
    let mut renderer = ScriptedRenderer::with_pages(10);
    let mut viewer = open(&mut renderer);
    viewer.on_container_width_changed(Some(600));

    viewer.set_scale(scale(100)).unwrap();
    let slow = viewer.current_request().unwrap();
    viewer.set_scale(scale(200)).unwrap();
    let fast = viewer.current_request().unwrap();

    renderer.render(&fast).unwrap();
    assert!(viewer.on_page_render_succeeded(fast.token));

    renderer.render(&slow).unwrap();
    assert!(!viewer.on_page_render_succeeded(slow.token));
    assert_eq!(viewer.rendered_scale(), Some(scale(200)));
}

#[test]
fn failing_page_does_not_block_navigation() {
    let mut renderer = ScriptedRenderer::with_pages(4);
    renderer.failing_pages.insert(2);
    let mut viewer = open(&mut renderer);

    pump(&mut viewer, &mut renderer);
    let page_one = viewer.visible_layers().shown;
    assert!(page_one.is_some());

    viewer.step_page(StepDirection::Next);
    pump(&mut viewer, &mut renderer);
    assert_eq!(viewer.sink(), &vec![Notification::render_failed(2)]);
    assert_eq!(viewer.visible_layers().shown, page_one);

    viewer.step_page(StepDirection::Next);
    pump(&mut viewer, &mut renderer);
    assert_eq!(viewer.current_page(), 3);
    assert_eq!(viewer.visible_layers().shown.map(|t| t.page), Some(3));
    assert_eq!(viewer.sink().len(), 1);
}

#[test]
fn resize_uses_new_width_without_new_cycle() {
    let mut renderer = ScriptedRenderer::with_pages(2);
    let mut viewer = open(&mut renderer);
    pump(&mut viewer, &mut renderer);
    let phase = viewer.phase();

    viewer.on_container_width_changed(Some(1024));
    assert_eq!(viewer.phase(), phase);

    pump(&mut viewer, &mut renderer);
    assert_eq!(renderer.rendered.last().map(|r| r.width), Some(1024));
    assert_eq!(viewer.phase(), phase);
}

#[test]
fn failed_redraw_after_resize_is_reported_once() {
    let mut renderer = ScriptedRenderer::with_pages(3);
    let mut viewer = open(&mut renderer);
    pump(&mut viewer, &mut renderer);
    let settled = viewer.visible_layers().shown;

    renderer.failing_pages.insert(1);
    viewer.on_container_width_changed(Some(4000));
    pump(&mut viewer, &mut renderer);
    let attempts = renderer.rendered.len();

    assert_eq!(viewer.sink(), &vec![Notification::render_failed(1)]);
    assert!(viewer.render_blocked());
    assert_eq!(viewer.visible_layers().shown, settled);

    // Nothing more is issued until a parameter changes
    pump(&mut viewer, &mut renderer);
    assert_eq!(renderer.rendered.len(), attempts);

    renderer.failing_pages.clear();
    viewer.step_page(StepDirection::Next);
    pump(&mut viewer, &mut renderer);
    assert_eq!(viewer.visible_layers().shown.map(|t| t.page), Some(2));
    assert_eq!(viewer.sink().len(), 1);
}
