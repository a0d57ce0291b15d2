//! yview entrypoint.

mod args;
mod load;
mod pager;
mod runtime;

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use core_config::Config;
use core_events::{EVENT_CHANNEL_CAP, Event};
use core_render::{Theme, YamlPrinter};
use core_search::TextFinder;
use core_terminal::{CrosstermBackend, TerminalBackend, TerminalCapabilities};
use core_viewport::{Options, Viewport};
use pager::Pager;
use runtime::PagerRuntime;
use std::io::Write;
use std::path::Path;
use std::sync::Once;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// Width used when stdout is not a terminal.
const PIPE_WIDTH: u16 = 120;

fn configure_logging(path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file = path.file_name().context("--log needs a file name")?;
    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
    {
        Ok(()) => Ok(Some(guard)),
        // A global subscriber is already installed; drop the guard so the writer shuts down.
        Err(_) => Ok(None),
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

/// Merge configuration and CLI flags into viewport options.
fn options(config: &Config, args: &Args) -> Options {
    let pager = config.pager();
    Options {
        word_wrap: args.wrap || pager.word_wrap,
        mouse: !args.no_mouse && pager.mouse,
        mouse_delta: pager.mouse_delta,
        horizontal_step: pager.horizontal_step,
        hunk_context: args.hunk_context.unwrap_or(pager.hunk_context),
        fill_height: pager.fill_height,
        diff_mode: args.diff_mode.unwrap_or(pager.diff_mode),
        view_mode: args.view_mode.unwrap_or(pager.view_mode),
    }
}

fn build_pager(config: &Config, args: &Args, caps: TerminalCapabilities) -> Result<Pager> {
    let theme = if caps.color && caps.interactive {
        Theme::default()
    } else {
        Theme::plain()
    };
    let gutter = args.gutter.unwrap_or(config.pager().gutter);
    let (keymap, key_errors) = config.keymap();
    for e in &key_errors {
        warn!(target: "config", error = %e, "key_binding_ignored");
    }

    let mut viewport = Viewport::builder()
        .printer(Box::new(YamlPrinter::new(theme.clone()).with_gutter(gutter)))
        .finder(Box::new(TextFinder::new(config.normalizer().build())))
        .keymap(keymap.clone())
        .options(options(config, args))
        .build();

    let inputs = load::read_inputs(&args.files)?;
    for source in load::build_sources(inputs, args.split_documents) {
        viewport.add_revision(source);
    }
    Ok(Pager::new(viewport, keymap, theme))
}

/// Print the current view once, for pipes.
fn print_once(mut pager: Pager) -> Result<()> {
    let rows = pager.viewport().total_line_count().max(1) + pager::STATUS_ROWS as usize;
    pager.resize(PIPE_WIDTH, u16::try_from(rows).unwrap_or(u16::MAX));
    let frame = pager.viewport().view();
    let mut out = std::io::stdout().lock();
    for line in frame.split('\n') {
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(args.log.as_deref())?;
    install_panic_hook();
    info!(target: "runtime", "startup");

    let config = core_config::load_from(args.config.clone())?;
    let caps = TerminalCapabilities::detect();
    let mut pager = build_pager(&config, &args, caps)?;
    info!(
        target: "runtime.startup",
        revisions = pager.viewport().revision_count(),
        interactive = caps.interactive,
        config = config.source_path().map(|p| p.display().to_string()),
        "bootstrap_complete"
    );

    if !caps.interactive {
        return print_once(pager);
    }

    let mut backend = CrosstermBackend::new(!args.no_mouse && config.pager().mouse);
    let (width, height) = backend.size()?;
    backend.set_title("yview")?;
    let _terminal = backend.enter_guard()?;
    pager.resize(width, height);

    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx.clone());
    let mut runtime = PagerRuntime::new(pager, tx, rx, input_task, input_shutdown);
    let reason = runtime.run().await?;
    info!(target: "runtime", %reason, "exit");
    Ok(())
}
