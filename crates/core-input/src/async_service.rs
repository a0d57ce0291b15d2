use crate::translate::map_event;
use core_events::Event;
use crossterm::event::{Event as CEvent, EventStream};
use std::fmt;
use std::io;
use tokio::sync::mpsc::Sender;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};
use tracing::{Instrument, info, trace, warn};

/// Stops the input task. Dropping it without signalling also stops the task.
#[derive(Debug)]
pub struct AsyncInputShutdown {
    tx: oneshot::Sender<()>,
}

impl AsyncInputShutdown {
    pub fn signal(self) {
        let _ = self.tx.send(());
    }
}

/// Spawn a Tokio task forwarding `EventStream` input to `sender`.
pub(crate) fn spawn_event_stream_task(sender: Sender<Event>) -> (JoinHandle<()>, AsyncInputShutdown) {
    let (tx, rx) = oneshot::channel();
    let span = tracing::debug_span!(target: "input.thread", "input_task");
    let handle = tokio::spawn(
        async move {
            let reason = forward(EventStream::new(), sender, rx).await;
            info!(target: "input.thread", %reason, "async_input_task_stopped");
        }
        .instrument(span),
    );
    (handle, AsyncInputShutdown { tx })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StopReason {
    Shutdown,
    ChannelClosed,
    StreamEnded,
    StreamError(io::ErrorKind),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Shutdown => f.write_str("shutdown_signal"),
            StopReason::ChannelClosed => f.write_str("channel_closed"),
            StopReason::StreamEnded => f.write_str("stream_ended"),
            StopReason::StreamError(_) => f.write_str("stream_error"),
        }
    }
}

/// Pump `stream` into `sender` until shutdown, a closed channel, or the
/// terminal going away. Losing the terminal is reported to the main loop as
/// [`Event::Shutdown`] so the pager exits instead of waiting forever.
pub(crate) async fn forward<S>(
    mut stream: S,
    sender: Sender<Event>,
    mut shutdown: oneshot::Receiver<()>,
) -> StopReason
where
    S: Stream<Item = io::Result<CEvent>> + Unpin,
{
    info!(target: "input.thread", "async_input_task_started");
    let reason = loop {
        let next = tokio::select! {
            biased;
            _ = &mut shutdown => break StopReason::Shutdown,
            next = stream.next() => next,
        };
        let raw = match next {
            None => break StopReason::StreamEnded,
            Some(Err(err)) => {
                warn!(target: "input.thread", error = %err, "async_input_task_stream_error");
                break StopReason::StreamError(err.kind());
            }
            Some(Ok(raw)) => raw,
        };
        let Some(input) = map_event(&raw) else {
            continue;
        };
        trace!(target: "input.event", ?input, "input_forwarded");
        if sender.send(Event::Input(input)).await.is_err() {
            break StopReason::ChannelClosed;
        }
    };
    if matches!(reason, StopReason::StreamEnded | StopReason::StreamError(_)) {
        let _ = sender.send(Event::Shutdown).await;
    }
    reason
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{InputEvent, KeyCode, KeyEvent, KeyModifiers};
    use crossterm::event::{KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyModifiers as CMods};
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc;
    use tokio::time::{Duration, timeout};
    use tokio_stream::wrappers::UnboundedReceiverStream;
    use tracing::field::{Field, Visit};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use tracing_subscriber::registry::Registry;

    #[derive(Clone, Default)]
    struct Captured {
        messages: Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>,
    }

    struct Fields(Vec<(String, String)>);

    impl Visit for Fields {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.push((field.name().to_string(), format!("{value:?}")));
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for Captured {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = Fields(Vec::new());
            event.record(&mut fields);
            self.messages
                .lock()
                .unwrap()
                .push((event.metadata().target().to_string(), fields.0));
        }
    }

    async fn drain(events: Vec<io::Result<CEvent>>) -> (StopReason, Vec<Event>) {
        let (tx, mut rx) = mpsc::channel(64);
        let (_keep, shutdown) = oneshot::channel();
        let reason = forward(tokio_stream::iter(events), tx, shutdown).await;
        let mut out = Vec::new();
        while let Some(evt) = rx.recv().await {
            out.push(evt);
        }
        (reason, out)
    }

    #[tokio::test]
    async fn forwards_translated_input_in_order() {
        let (reason, out) = drain(vec![
            Ok(CEvent::Key(CKeyEvent::new(CKeyCode::Char('j'), CMods::NONE))),
            Ok(CEvent::FocusLost),
            Ok(CEvent::Resize(120, 48)),
            Ok(CEvent::Key(CKeyEvent::new(CKeyCode::BackTab, CMods::SHIFT))),
        ])
        .await;
        assert_eq!(reason, StopReason::StreamEnded);
        match out.as_slice() {
            [
                Event::Input(InputEvent::Key(j)),
                Event::Input(InputEvent::Resize(120, 48)),
                Event::Input(InputEvent::Key(back)),
                Event::Shutdown,
            ] => {
                assert_eq!(*j, KeyEvent::plain(KeyCode::Char('j')));
                assert_eq!(*back, KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT));
            }
            other => panic!("unexpected output sequence: {other:?}"),
        }
    }

    #[tokio::test]
    async fn stream_error_requests_shutdown() {
        let (reason, out) = drain(vec![Err(io::Error::other("tty gone"))]).await;
        assert_eq!(reason, StopReason::StreamError(io::ErrorKind::Other));
        assert!(matches!(out.as_slice(), [Event::Shutdown]));
    }

    #[tokio::test]
    async fn stops_when_channel_closes() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let (_keep, shutdown) = oneshot::channel();
        let stream = tokio_stream::iter(vec![Ok(CEvent::Resize(10, 10))]);
        let reason = timeout(Duration::from_millis(200), forward(stream, tx, shutdown))
            .await
            .expect("closed channel must not hang");
        assert_eq!(reason, StopReason::ChannelClosed);
    }

    #[tokio::test]
    async fn shutdown_signal_wins_over_pending_stream() {
        let (tx, mut rx) = mpsc::channel(1);
        let (event_tx, event_rx) = mpsc::unbounded_channel::<io::Result<CEvent>>();
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let _keep_alive = event_tx;
            forward(UnboundedReceiverStream::new(event_rx), tx, stop_rx).await
        });

        AsyncInputShutdown { tx: stop_tx }.signal();

        let reason = timeout(Duration::from_millis(100), task)
            .await
            .expect("shutdown should resolve promptly")
            .expect("task join failed");
        assert_eq!(reason, StopReason::Shutdown);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn logs_stream_error() {
        let capture = Captured::default();
        let messages = capture.messages.clone();
        let _guard = tracing::subscriber::set_default(Registry::default().with(capture));

        drain(vec![Err(io::Error::other("tty gone"))]).await;

        let logged = messages.lock().unwrap();
        assert!(logged.iter().any(|(target, fields)| target == "input.thread"
            && fields
                .iter()
                .any(|(k, v)| k == "message" && v == "async_input_task_stream_error")));
    }
}
