//! Outbound notifications to the host.
//!
//! Delivery is fire-and-forget: a channel that fails to deliver logs the
//! failure and drops the event.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use serde::Serialize;
use serde_json::json;

use crate::viewport::CameraEcho;

/// An event sent from a widget to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// Indices picked by a completed lasso gesture.
    SelectedPoints(Vec<usize>),
    /// Camera changed.
    ViewState(CameraEcho),
    /// Grid overlay toggled.
    ShowGrid(bool),
}

impl OutboundEvent {
    /// Input-name suffix the host listens on.
    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::SelectedPoints(_) => "_selected_points",
            Self::ViewState(_) => "_view_state",
            Self::ShowGrid(_) => "_show_grid",
        }
    }

    /// Full input name, `<widget id><suffix>`.
    #[must_use]
    pub fn topic(&self, widget_id: &str) -> String {
        format!("{widget_id}{}", self.suffix())
    }

    /// Event value as JSON.
    #[must_use]
    pub fn value(&self) -> serde_json::Value {
        match self {
            Self::SelectedPoints(indices) => json!(indices),
            Self::ViewState(echo) => json!(echo),
            Self::ShowGrid(shown) => json!(shown),
        }
    }
}

/// A published message: topic plus JSON value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostMessage {
    /// `<widget id><suffix>`.
    pub name: String,
    /// Event payload.
    pub value: serde_json::Value,
}

impl HostMessage {
    /// Build the message for `event` from `widget_id`.
    #[must_use]
    pub fn new(widget_id: &str, event: &OutboundEvent) -> Self {
        Self { name: event.topic(widget_id), value: event.value() }
    }
}

/// Outbound half of the host messaging channel.
pub trait HostChannel {
    /// Deliver an event. Must not block or fail.
    fn send(&mut self, widget_id: &str, event: OutboundEvent);
}

impl<H: HostChannel + ?Sized> HostChannel for Box<H> {
    fn send(&mut self, widget_id: &str, event: OutboundEvent) {
        (**self).send(widget_id, event);
    }
}

/// Channel for widgets running outside a host; drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullChannel;

impl HostChannel for NullChannel {
    fn send(&mut self, widget_id: &str, event: OutboundEvent) {
        tracing::trace!(widget = widget_id, topic = event.suffix(), "no host attached, dropping event");
    }
}

/// Channel that keeps every message; clones share storage.
#[derive(Debug, Clone, Default)]
pub struct RecordingChannel {
    sent: Rc<RefCell<Vec<HostMessage>>>,
}

impl RecordingChannel {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages so far.
    #[must_use]
    pub fn messages(&self) -> Vec<HostMessage> {
        self.sent.borrow().clone()
    }

    /// Messages with the given topic.
    #[must_use]
    pub fn messages_named(&self, name: &str) -> Vec<serde_json::Value> {
        self.sent.borrow().iter().filter(|m| m.name == name).map(|m| m.value.clone()).collect()
    }

    /// Forget everything recorded.
    pub fn clear(&self) {
        self.sent.borrow_mut().clear();
    }
}

impl HostChannel for RecordingChannel {
    fn send(&mut self, widget_id: &str, event: OutboundEvent) {
        self.sent.borrow_mut().push(HostMessage::new(widget_id, &event));
    }
}

/// Channel writing one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesChannel<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesChannel<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> HostChannel for JsonLinesChannel<W> {
    fn send(&mut self, widget_id: &str, event: OutboundEvent) {
        let msg = HostMessage::new(widget_id, &event);
        let written = serde_json::to_writer(&mut self.out, &msg)
            .map_err(std::io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"))
            .and_then(|()| self.out.flush());
        if let Err(e) = written {
            tracing::warn!(topic = %msg.name, error = %e, "failed to deliver host event");
        }
    }
}
