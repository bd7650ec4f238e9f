//=========================================================================
// Aetheric Mobile Demo
//=========================================================================
//
// Minimal application on the Winit host: counts ticks and frames, logs
// pointer and resize events.
//
// Settings are read from `aetheric.toml` in the working directory when
// present. Use `RUST_LOG=debug` to follow the lifecycle.
//
//=========================================================================

use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use aetheric_mobile::prelude::*;
use env_logger::{Builder, Env};
use log::{error, info};

//=== Demo App ============================================================

#[derive(Default)]
struct Demo {
    ticks: AtomicU64,
    frames: AtomicU64,
}

impl App<WinitHost> for Demo {
    fn on_create(&self, settings: &mut Settings) -> anyhow::Result<()> {
        settings.name = format!("{} demo", settings.name);
        Ok(())
    }

    fn on_start(&self, runtime: &Runtime<WinitHost>) -> anyhow::Result<()> {
        runtime.subscribe(Channel::Mouse, |event| info!("pointer: {:?}", event));
        runtime.subscribe(Channel::Resize, |event| info!("surface: {:?}", event));
        Ok(())
    }

    fn on_tick(&self, _elapsed: Duration, _sync: &SyncHandle) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    fn on_render(&self, elapsed: Duration, _sync: &SyncHandle) {
        let frame = self.frames.fetch_add(1, Ordering::Relaxed) + 1;
        if frame % 600 == 0 {
            info!("frame {} ({:?} since previous)", frame, elapsed);
        }
    }

    fn on_stop(&self) {
        info!(
            "stopped after {} ticks, {} frames",
            self.ticks.load(Ordering::Relaxed),
            self.frames.load(Ordering::Relaxed)
        );
    }
}

//=== Entry Point =========================================================

fn main() {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = match Settings::load_or_default("aetheric.toml") {
        Ok(settings) => settings,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    // Forward all touch input unless the file narrows it.
    let mask = if settings.event_mask.is_empty() {
        EventMask::all()
    } else {
        settings.event_mask
    };

    let engine = EngineBuilder::new()
        .with_settings(settings)
        .with_event_mask(mask)
        .build();

    if let Err(e) = run_winit(engine, Demo::default()) {
        error!("{}", e);
        process::exit(1);
    }
}
