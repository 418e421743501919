//! Live preview session: owns the working snapshot and pushes a fresh frame to every
//! subscriber each time the snapshot or viewport changes.
//!
//! Notification is synchronous. When `apply`, `replace` or `set_viewport` returns,
//! every subscriber has already seen the new frame, in subscription order.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::models::resume::{ResumeEdit, ResumeRecord};
use crate::models::validation::ValidationReport;
use crate::render::preview::{PreviewRenderer, Viewport};
use crate::render::projector::{project, Projection};
use crate::render::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PreviewFrame {
    Rendered {
        revision: u64,
        viewport: Viewport,
        projection: Projection,
        markup: String,
    },
    /// The snapshot is missing required fields; nothing is rendered until it is fixed.
    Incomplete {
        revision: u64,
        problems: ValidationReport,
    },
}

impl PreviewFrame {
    pub fn revision(&self) -> u64 {
        match self {
            PreviewFrame::Rendered { revision, .. } | PreviewFrame::Incomplete { revision, .. } => {
                *revision
            }
        }
    }

    pub fn markup(&self) -> Option<&str> {
        match self {
            PreviewFrame::Rendered { markup, .. } => Some(markup),
            PreviewFrame::Incomplete { .. } => None,
        }
    }
}

type Listener = Box<dyn FnMut(&PreviewFrame) + Send>;

pub struct PreviewSession {
    record: ResumeRecord,
    viewport: Viewport,
    renderer: Arc<PreviewRenderer>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
    revision: u64,
    frame: PreviewFrame,
}

impl PreviewSession {
    pub fn new(
        renderer: Arc<PreviewRenderer>,
        record: ResumeRecord,
        viewport: Viewport,
    ) -> Result<Self, RenderError> {
        let frame = build_frame(&renderer, &record, viewport, 0)?;
        Ok(PreviewSession {
            record,
            viewport,
            renderer,
            listeners: Vec::new(),
            next_id: 0,
            revision: 0,
            frame,
        })
    }

    pub fn record(&self) -> &ResumeRecord {
        &self.record
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The most recent frame, identical to what subscribers were last sent.
    pub fn current(&self) -> &PreviewFrame {
        &self.frame
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PreviewFrame) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the id was not (or is no longer) subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn apply(&mut self, edit: ResumeEdit) -> Result<&PreviewFrame, RenderError> {
        let next = self.record.apply(edit);
        self.replace(next)
    }

    pub fn replace(&mut self, record: ResumeRecord) -> Result<&PreviewFrame, RenderError> {
        self.publish(Some(record), self.viewport)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<&PreviewFrame, RenderError> {
        self.publish(None, viewport)
    }

    /// Renders first and commits after; on error the session is left untouched.
    fn publish(
        &mut self,
        record: Option<ResumeRecord>,
        viewport: Viewport,
    ) -> Result<&PreviewFrame, RenderError> {
        let revision = self.revision + 1;
        let frame = build_frame(
            &self.renderer,
            record.as_ref().unwrap_or(&self.record),
            viewport,
            revision,
        )?;
        if let Some(record) = record {
            self.record = record;
        }
        self.viewport = viewport;
        self.revision = revision;
        self.frame = frame;

        debug!(
            revision,
            subscribers = self.listeners.len(),
            complete = self.frame.markup().is_some(),
            "Preview refreshed"
        );
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.frame);
        }
        Ok(&self.frame)
    }
}

fn build_frame(
    renderer: &PreviewRenderer,
    record: &ResumeRecord,
    viewport: Viewport,
    revision: u64,
) -> Result<PreviewFrame, RenderError> {
    match project(record) {
        Ok(projection) => {
            let markup = renderer.render(&projection, viewport)?;
            Ok(PreviewFrame::Rendered {
                revision,
                viewport,
                projection,
                markup,
            })
        }
        Err(RenderError::MalformedInput(problems)) => {
            Ok(PreviewFrame::Incomplete { revision, problems })
        }
        Err(other) => Err(other),
    }
}
