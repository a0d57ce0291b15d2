//! The event loop: one task owns the pager and processes events in order.

use crate::pager::{LoopControl, Pager};
use anyhow::Result;
use core_events::Event;
use core_input::AsyncInputShutdown;
use core_render::writer::Writer;
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Quit,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Quit => "quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct PagerRuntime {
    pager: Pager,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    input_task: Option<JoinHandle<()>>,
    input_shutdown: Option<AsyncInputShutdown>,
}

impl PagerRuntime {
    pub fn new(
        pager: Pager,
        tx: mpsc::Sender<Event>,
        rx: mpsc::Receiver<Event>,
        input_task: JoinHandle<()>,
        input_shutdown: AsyncInputShutdown,
    ) -> Self {
        Self {
            pager,
            rx,
            tx: Some(tx),
            input_task: Some(input_task),
            input_shutdown: Some(input_shutdown),
        }
    }

    pub async fn run(&mut self) -> Result<ShutdownReason> {
        self.render()?;
        let span = tracing::debug_span!(target: "runtime", "event_loop");
        let reason = self.event_loop().instrument(span).await?;
        self.rx.close();
        self.finalize_shutdown(reason).await;
        Ok(reason)
    }

    async fn event_loop(&mut self) -> Result<ShutdownReason> {
        while let Some(event) = self.rx.recv().await {
            let control = match &event {
                Event::Input(input) => self.pager.handle_input(input),
                Event::Shutdown => return Ok(ShutdownReason::ShutdownEvent),
            };
            match control {
                LoopControl::Quit => return Ok(ShutdownReason::Quit),
                LoopControl::Continue { redraw: true } => self.render()?,
                LoopControl::Continue { redraw: false } => {}
            }
        }
        Ok(ShutdownReason::ChannelClosed)
    }

    fn render(&self) -> Result<()> {
        let (_, height) = self.pager.size();
        let frame = self.pager.frame();
        let mut writer = Writer::new();
        writer.paint(&frame, 0, height);
        trace!(target: "runtime", commands = writer.commands().len(), "frame_painted");
        writer.flush()
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        info!(target: "runtime.shutdown", %reason, stage = "begin", "shutdown_stage");
        drop(self.tx.take());

        if let Some(shutdown) = self.input_shutdown.take() {
            shutdown.signal();
        }
        if let Some(handle) = self.input_task.take() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(())) => trace!(target: "runtime.shutdown", "input_task_joined"),
                Ok(Err(err)) if err.is_cancelled() => {
                    trace!(target: "runtime.shutdown", "input_task_cancelled")
                }
                Ok(Err(err)) => error!(target: "runtime.shutdown", ?err, "input_task_join_failed"),
                Err(_) => warn!(target: "runtime.shutdown", "input_task_timeout"),
            }
        }
        info!(target: "runtime.shutdown", %reason, stage = "complete", "shutdown_stage");
    }
}
