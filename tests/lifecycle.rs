//=========================================================================
// Lifecycle Scenarios
//=========================================================================
//
// Drives the runtime end to end through its public API with a recording
// host and application.
//
//=========================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use aetheric_mobile::prelude::*;
use crossbeam_channel::{unbounded, Receiver};
use parking_lot::Mutex;

const WAIT: Duration = Duration::from_secs(5);

//=========================================================================
// Test Doubles
//=========================================================================

#[derive(Default)]
struct RecordingHost {
    presents: AtomicUsize,
    paint_requests: AtomicUsize,
}

impl Host for RecordingHost {
    type Context = &'static str;

    fn present(&self) {
        self.presents.fetch_add(1, Ordering::SeqCst);
    }

    fn request_paint(&self) {
        self.paint_requests.fetch_add(1, Ordering::SeqCst);
    }
}

type Journal = Arc<Mutex<Vec<String>>>;

#[derive(Default)]
struct Recorder {
    journal: Journal,
    ticks: Arc<AtomicUsize>,
    renders: Arc<AtomicUsize>,
    fail_start: bool,
}

impl Recorder {
    fn record(&self, entry: &str) {
        self.journal.lock().push(entry.to_string());
    }
}

impl App<RecordingHost> for Recorder {
    fn on_create(&self, _settings: &mut Settings) -> anyhow::Result<()> {
        self.record("create");
        Ok(())
    }

    fn on_start(&self, runtime: &Runtime<RecordingHost>) -> anyhow::Result<()> {
        self.record("start");
        if self.fail_start {
            anyhow::bail!("renderer unavailable");
        }
        assert!(runtime.renderer().is_some());
        Ok(())
    }

    fn on_resume(&self) {
        self.record("resume");
    }

    fn on_tick(&self, _elapsed: Duration, _sync: &SyncHandle) {
        self.ticks.fetch_add(1, Ordering::SeqCst);
    }

    fn on_render(&self, _elapsed: Duration, _sync: &SyncHandle) {
        self.renders.fetch_add(1, Ordering::SeqCst);
    }

    fn on_pause(&self) {
        self.record("pause");
    }

    fn on_stop(&self) {
        self.record("stop");
    }

    fn on_dispose(&self) -> anyhow::Result<()> {
        self.record("dispose");
        Ok(())
    }
}

struct Gateway {
    journal: Journal,
}

impl Plugin<RecordingHost> for Gateway {
    fn name(&self) -> &str {
        "gateway"
    }

    fn init(&self, _runtime: &Runtime<RecordingHost>) -> anyhow::Result<()> {
        self.journal.lock().push("plugin init".into());
        Ok(())
    }

    fn dispose(&self) {
        self.journal.lock().push("plugin dispose".into());
    }
}

fn session(mask: EventMask, app: Recorder) -> Session<RecordingHost, Recorder> {
    EngineBuilder::new()
        .with_event_mask(mask)
        .build()
        .start(app, Arc::new(RecordingHost::default()))
        .unwrap()
}

fn mouse_events(session: &Session<RecordingHost, Recorder>) -> Receiver<MouseEvent> {
    let (tx, rx) = unbounded();
    session.runtime().subscribe(Channel::Mouse, move |event| {
        if let Event::Mouse(m) = event {
            let _ = tx.send(*m);
        }
    });
    rx
}

fn touch(sequence: u64, phase: TouchPhase) -> HostEvent<&'static str> {
    HostEvent::Touch {
        sequence,
        phase,
        x: 100.0,
        y: 200.0,
    }
}

//=========================================================================
// Focus Cycle
//=========================================================================

#[test]
fn focus_background_focus_restarts_cleanly() {
    let app = Recorder::default();
    let journal = Arc::clone(&app.journal);
    let mut session = session(EventMask::all(), app);

    session.dispatch(HostEvent::focused("gl-1")).unwrap();
    session.dispatch(touch(0, TouchPhase::Begin)).unwrap();
    session.dispatch(HostEvent::background()).unwrap();
    session.dispatch(HostEvent::focused("gl-2")).unwrap();

    assert_eq!(
        *journal.lock(),
        vec!["create", "start", "resume", "pause", "stop", "start", "resume"]
    );
    assert_eq!(session.focus_periods(), 2);
    assert_eq!(session.pending_motion_events(), Some(0));
    assert_eq!(session.runtime().renderer(), Some("gl-2"));
}

#[test]
fn is_stopped_tracks_focus() {
    let mut session = session(EventMask::empty(), Recorder::default());
    assert!(session.state().is_stopped());

    session.dispatch(HostEvent::focused("gl")).unwrap();
    assert!(!session.state().is_stopped());
    assert!(!session.state().is_paused());

    session.dispatch(HostEvent::background()).unwrap();
    assert!(session.state().is_stopped());
    assert!(session.state().is_paused());
}

#[test]
fn ticks_only_flow_inside_focus() {
    let app = Recorder::default();
    let ticks = Arc::clone(&app.ticks);
    let mut session = session(EventMask::empty(), app);

    session.dispatch(HostEvent::focused("gl")).unwrap();
    let deadline = std::time::Instant::now() + WAIT;
    while ticks.load(Ordering::SeqCst) == 0 && std::time::Instant::now() < deadline {
        thread::yield_now();
    }
    assert!(ticks.load(Ordering::SeqCst) > 0, "tick loop never ran");

    session.dispatch(HostEvent::background()).unwrap();
    let after_stop = ticks.load(Ordering::SeqCst);
    thread::sleep(Duration::from_millis(20));
    assert_eq!(ticks.load(Ordering::SeqCst), after_stop, "ticked after stop");
}

#[test]
fn plugins_wrap_each_focus_period() {
    let app = Recorder::default();
    let journal = Arc::clone(&app.journal);
    let mut session = EngineBuilder::new()
        .with_plugin(Gateway {
            journal: Arc::clone(&journal),
        })
        .build()
        .start(app, Arc::new(RecordingHost::default()))
        .unwrap();

    session.dispatch(HostEvent::focused("gl")).unwrap();
    session.dispatch(HostEvent::background()).unwrap();

    assert_eq!(
        *journal.lock(),
        vec!["create", "plugin init", "start", "resume", "pause", "stop", "plugin dispose"]
    );
}

//=========================================================================
// Paint
//=========================================================================

#[test]
fn paint_while_paused_is_never_rendered() {
    let app = Recorder::default();
    let renders = Arc::clone(&app.renders);
    let mut session = session(EventMask::empty(), app);

    session.dispatch(HostEvent::paint()).unwrap();
    session.dispatch(HostEvent::focused("gl")).unwrap();
    session.dispatch(HostEvent::paint()).unwrap();
    session.dispatch(HostEvent::background()).unwrap();
    session.dispatch(HostEvent::paint()).unwrap();

    let host = session.runtime().host();
    assert_eq!(renders.load(Ordering::SeqCst), 1);
    assert_eq!(host.presents.load(Ordering::SeqCst), 1);
    assert_eq!(host.paint_requests.load(Ordering::SeqCst), 1);
}

//=========================================================================
// Input Routing
//=========================================================================

#[test]
fn button_only_mask_drops_motion() {
    let mut session = session(EventMask::MOUSE_BUTTON, Recorder::default());
    let rx = mouse_events(&session);
    session.dispatch(HostEvent::focused("gl")).unwrap();

    session.dispatch(touch(1, TouchPhase::Move)).unwrap();
    session.dispatch(touch(1, TouchPhase::Begin)).unwrap();

    assert_eq!(
        rx.recv_timeout(WAIT).unwrap(),
        MouseEvent {
            x: 100,
            y: 200,
            kind: MouseEventKind::Down,
            button: ButtonId::Second,
        }
    );

    session.dispatch(HostEvent::background()).unwrap();
    assert!(rx.try_recv().is_err());
}

#[test]
fn touch_sequence_selects_button() {
    let mut session = session(EventMask::MOUSE_BUTTON, Recorder::default());
    let rx = mouse_events(&session);
    session.dispatch(HostEvent::focused("gl")).unwrap();

    for sequence in [0, 1, 2, 3, 99] {
        session.dispatch(touch(sequence, TouchPhase::End)).unwrap();
    }
    session.dispatch(HostEvent::background()).unwrap();

    let buttons: Vec<ButtonId> = rx.try_iter().map(|m| m.button).collect();
    assert_eq!(
        buttons,
        vec![
            ButtonId::First,
            ButtonId::Second,
            ButtonId::Third,
            ButtonId::None,
            ButtonId::None,
        ]
    );
}

#[test]
fn resize_is_published_immediately() {
    let mut session = session(EventMask::empty(), Recorder::default());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    session.runtime().subscribe(Channel::Resize, move |event| sink.lock().push(*event));

    session.dispatch(HostEvent::Resize { width: 800, height: 600 }).unwrap();

    assert_eq!(
        *seen.lock(),
        vec![Event::Resize(ResizeEvent {
            width: 800,
            height: 600,
        })]
    );
}

//=========================================================================
// Channel-Driven Runs
//=========================================================================

#[test]
fn run_disposes_exactly_once() {
    let app = Recorder::default();
    let journal = Arc::clone(&app.journal);
    let (tx, rx) = unbounded();

    let runner = thread::spawn(move || {
        EngineBuilder::new()
            .build()
            .run(app, Arc::new(RecordingHost::default()), rx)
    });

    tx.send(HostEvent::focused("gl")).unwrap();
    tx.send(HostEvent::paint()).unwrap();
    drop(tx);

    assert!(runner.join().unwrap().is_ok());
    let journal = journal.lock();
    assert_eq!(journal.iter().filter(|e| *e == "dispose").count(), 1);
    assert_eq!(journal.iter().filter(|e| *e == "stop").count(), 1);
    assert_eq!(journal.last().map(String::as_str), Some("dispose"));
}

#[test]
fn failing_start_ends_run_with_error() {
    let app = Recorder {
        fail_start: true,
        ..Recorder::default()
    };
    let journal = Arc::clone(&app.journal);
    let ticks = Arc::clone(&app.ticks);
    let (tx, rx) = unbounded();
    tx.send(HostEvent::focused("gl")).unwrap();
    tx.send(HostEvent::paint()).unwrap();

    let result = EngineBuilder::new()
        .build()
        .run(app, Arc::new(RecordingHost::default()), rx);

    assert!(matches!(result, Err(RuntimeError::Start(_))));
    assert_eq!(*journal.lock(), vec!["create", "start", "dispose"]);
    assert_eq!(ticks.load(Ordering::SeqCst), 0);
}

//=========================================================================
// Assets and Settings
//=========================================================================

#[test]
fn runtime_reads_assets_from_configured_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("level.bin"), [1u8, 2, 3]).unwrap();

    let session = EngineBuilder::new()
        .with_assets(FsAssets::new(dir.path()))
        .build()
        .start(Recorder::default(), Arc::new(RecordingHost::default()))
        .unwrap();

    assert_eq!(session.runtime().asset("level.bin").unwrap(), vec![1, 2, 3]);
    assert!(matches!(
        session.runtime().asset("missing.bin"),
        Err(AssetError::NotFound(_))
    ));
}

#[test]
fn toml_settings_reach_the_runtime() {
    let settings = Settings::from_toml_str(
        r#"
            name = "scenario"
            motion_queue_capacity = 4
        "#,
    )
    .unwrap();

    let session = EngineBuilder::new()
        .with_settings(settings)
        .build()
        .start(Recorder::default(), Arc::new(RecordingHost::default()))
        .unwrap();

    assert_eq!(session.runtime().settings().name, "scenario");
    assert_eq!(session.runtime().settings().motion_queue_capacity, 4);
}
