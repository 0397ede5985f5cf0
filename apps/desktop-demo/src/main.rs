mod script;
mod terminal;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use pullrefresh_core::{Clock, MonotonicClock, Runtime, RuntimeScheduler};
use pullrefresh_foundation::{
    GestureOutcome, IndicatorRenderer, PullRefreshState, RefreshConfig, RefreshOperation,
    SimulatedRefresh, ThreadedRefresh, SIMULATED_REFRESH_DELAY,
};
use pullrefresh_ui_graphics::Dp;

use script::{demo_script, script_end_ms};
use terminal::TerminalRenderer;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const PAINT_EVERY_MS: u64 = 100;
const MAX_RUNTIME_MS: u64 = 12_000;
const SCREEN_WIDTH: Dp = Dp(400.0);

/// Scheduler that records frame requests for the main loop to pick up.
#[derive(Default)]
struct FrameRequests {
    requested: AtomicBool,
}

impl FrameRequests {
    fn take(&self) -> bool {
        self.requested.swap(false, Ordering::SeqCst)
    }
}

impl RuntimeScheduler for FrameRequests {
    fn schedule_frame(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }
}

fn init_logging() {
    #[cfg(feature = "logging")]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let threaded = std::env::args().any(|arg| arg == "--threaded");

    println!("=== Pull-to-refresh terminal demo ===");
    println!(
        "Scripted pulls against a {} refresh; pass --threaded to refresh on a worker thread.",
        if threaded { "threaded" } else { "simulated" }
    );
    println!();

    if threaded {
        run(ThreadedRefresh::new(|| {
            std::thread::sleep(SIMULATED_REFRESH_DELAY);
            Ok(())
        }))
    } else {
        run(SimulatedRefresh::default())
    }
}

fn run(operation: impl RefreshOperation + 'static) -> anyhow::Result<()> {
    let scheduler = Arc::new(FrameRequests::default());
    let runtime = Runtime::new(scheduler.clone());
    let state = PullRefreshState::new(
        RefreshConfig::default(),
        operation,
        runtime.handle(),
    )
    .context("invalid refresh configuration")?;

    let mut renderer = TerminalRenderer::new(std::io::stdout().lock());
    renderer
        .print_list_header()
        .context("writing list to stdout")?;

    let script = demo_script();
    let script_end = script_end_ms(&script);
    let mut next_step = 0;
    let mut last_paint_ms = None;

    let clock = MonotonicClock;
    let started = clock.now();
    loop {
        let now_nanos = clock.elapsed_nanos(started);
        let now_ms = now_nanos / 1_000_000;

        while let Some(step) = script.get(next_step).filter(|step| step.at_ms <= now_ms) {
            match state.on_gesture(step.sample) {
                GestureOutcome::Consumed(claimed) => log::debug!("drag claimed {claimed:.1}"),
                GestureOutcome::Released(decision) => log::info!("release: {decision:?}"),
            }
            next_step += 1;
        }

        let handle = runtime.handle();
        if scheduler.take() || runtime.needs_frame() {
            handle.drain_frame_callbacks(now_nanos);
        }
        handle.drain_ui();

        if last_paint_ms.map_or(true, |last| now_ms - last >= PAINT_EVERY_MS) {
            renderer.set_elapsed_ms(now_ms);
            renderer
                .paint(&state.frame(SCREEN_WIDTH), state.style())
                .context("painting indicator")?;
            last_paint_ms = Some(now_ms);
        }

        let script_done = next_step >= script.len() && now_ms > script_end;
        let at_rest = !state.is_refreshing() && !state.animator().is_moving();
        if script_done && at_rest {
            break;
        }
        if now_ms > MAX_RUNTIME_MS {
            log::warn!("demo did not settle within {MAX_RUNTIME_MS}ms");
            break;
        }
        std::thread::sleep(FRAME_INTERVAL);
    }

    log::info!(
        "done: {} refresh(es), last result {:?}",
        state.refresh_count(),
        state.last_refresh_result()
    );
    Ok(())
}
