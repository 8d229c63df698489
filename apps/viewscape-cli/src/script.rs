use glam::Vec2;
use serde::Serialize;
use std::time::Instant;
use viewscape_camera::CameraSnapshot;
use viewscape_common::{SurfaceSize, ViewportConfig};
use viewscape_input::{Key, Modifiers};
use viewscape_render::DebugTextBackend;
use viewscape_viewport::{SurfaceEvent, Viewport, dispatch};

/// One scripted step: the key held during that tick, if any.
///
/// Script characters map through [`Key::from_char`]; `'.'` releases every
/// key. Unknown characters are rejected up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Hold(Key),
    Release,
}

pub fn parse_keys(script: &str) -> anyhow::Result<Vec<Step>> {
    script
        .chars()
        .map(|c| match c {
            '.' => Ok(Step::Release),
            c => Key::from_char(c)
                .map(Step::Hold)
                .ok_or_else(|| anyhow::anyhow!("unknown key `{c}` in script")),
        })
        .collect()
}

/// Parse `"dx,dy"` into a per-tick pointer delta.
pub fn parse_look(text: &str) -> anyhow::Result<Vec2> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| anyhow::anyhow!("expected DX,DY, got `{text}`"))?;
    Ok(Vec2::new(x.trim().parse()?, y.trim().parse()?))
}

pub struct Simulation {
    pub frames: u64,
    pub steps: Vec<Step>,
    pub look: Vec2,
    pub size: SurfaceSize,
    pub load_assets: bool,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub state: String,
    pub frames_rendered: u64,
    pub size: SurfaceSize,
    pub camera: Option<CameraSnapshot>,
    pub failure: Option<String>,
    pub log: Vec<String>,
}

/// Drive a headless viewport through `frames` ticks on a synthetic clock.
pub fn run(config: ViewportConfig, sim: &Simulation) -> Report {
    let backend = if sim.load_assets {
        DebugTextBackend::with_assets(config.assets.clone())
    } else {
        DebugTextBackend::new()
    };
    let interval = config.tick_interval();
    let mut viewport = Viewport::new(backend, config);

    let start = Instant::now();
    dispatch(&mut viewport, SurfaceEvent::Ready(sim.size), start);
    dispatch(&mut viewport, SurfaceEvent::Activated, start);

    let mut held: Option<Key> = None;
    let mut pointer = Vec2::ZERO;
    dispatch(
        &mut viewport,
        SurfaceEvent::PointerMove {
            x: pointer.x,
            y: pointer.y,
        },
        start,
    );

    for i in 0..sim.frames {
        let now = start + interval * (i as u32 + 1);

        if let Some(step) = sim.steps.get(i as usize) {
            if let Some(previous) = held.take() {
                dispatch(&mut viewport, SurfaceEvent::KeyUp(previous, Modifiers::NONE), now);
            }
            if let Step::Hold(key) = *step {
                let mods = if key == Key::Shift {
                    Modifiers::SHIFT
                } else {
                    Modifiers::NONE
                };
                dispatch(&mut viewport, SurfaceEvent::KeyDown(key, mods), now);
                held = Some(key);
            }
        }

        if sim.look != Vec2::ZERO {
            pointer += sim.look;
            dispatch(
                &mut viewport,
                SurfaceEvent::PointerMove {
                    x: pointer.x,
                    y: pointer.y,
                },
                now,
            );
        }

        if viewport.poll_tick(now) {
            dispatch(&mut viewport, SurfaceEvent::RedrawRequested, now);
        }
    }

    let camera = viewport.camera().map(|c| c.snapshot());
    let state = format!("{:?}", viewport.state());
    let frames_rendered = viewport.frames_rendered();
    let size = viewport.size();
    let failure = viewport.failure().map(ToString::to_string);
    viewport.dispose();
    let log = viewport.backend_mut().take_log();

    Report {
        state,
        frames_rendered,
        size,
        camera,
        failure,
        log,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(frames: u64, keys: &str) -> Simulation {
        Simulation {
            frames,
            steps: parse_keys(keys).unwrap(),
            look: Vec2::ZERO,
            size: SurfaceSize::clamped(800, 600),
            load_assets: false,
        }
    }

    #[test]
    fn parses_key_script() {
        let steps = parse_keys("wS.^").unwrap();
        assert_eq!(
            steps,
            [
                Step::Hold(Key::W),
                Step::Hold(Key::S),
                Step::Release,
                Step::Hold(Key::Shift)
            ]
        );
        assert!(parse_keys("wx").is_err());
    }

    #[test]
    fn parses_look_delta() {
        assert_eq!(parse_look("4, -2").unwrap(), Vec2::new(4.0, -2.0));
        assert!(parse_look("4").is_err());
        assert!(parse_look("a,b").is_err());
    }

    #[test]
    fn idle_run_draws_every_tick() {
        let report = run(ViewportConfig::default(), &sim(5, ""));
        assert_eq!(report.frames_rendered, 5);
        assert_eq!(report.state, "Rendering");
        let camera = report.camera.unwrap();
        assert!((camera.position.z - 3.0).abs() < 1e-5);
        assert!(report.log.first().unwrap().starts_with("init size=800x600"));
        assert_eq!(report.log.last().unwrap(), "release");
    }

    #[test]
    fn holding_forward_moves_toward_negative_z() {
        let report = run(ViewportConfig::default(), &sim(4, "wwww"));
        let camera = report.camera.unwrap();
        assert!(camera.position.z < 3.0, "{:?}", camera.position);
    }

    #[test]
    fn forward_then_back_returns_near_start() {
        let report = run(ViewportConfig::default(), &sim(6, "www..."));
        let moved = report.camera.unwrap().position.z;
        let report = run(ViewportConfig::default(), &sim(6, "wwwsss"));
        let back = report.camera.unwrap().position.z;
        assert!(moved < 3.0);
        assert!((back - 3.0).abs() < 1e-3, "{back}");
    }

    #[test]
    fn pointer_look_turns_the_camera() {
        let mut s = sim(3, "");
        s.look = Vec2::new(10.0, 0.0);
        let report = run(ViewportConfig::default(), &s);
        let camera = report.camera.unwrap();
        assert!((camera.yaw - (-90.0 + 3.0 * 10.0 * 0.2)).abs() < 1e-3, "{}", camera.yaw);
    }

    #[test]
    fn missing_assets_fail_setup() {
        let mut config = ViewportConfig::default();
        config.assets.root = "/nonexistent/viewscape".into();
        let mut s = sim(3, "w");
        s.load_assets = true;
        let report = run(config, &s);
        assert_eq!(report.state, "Failed");
        assert_eq!(report.frames_rendered, 0);
        assert!(report.camera.is_none());
        assert!(report.failure.unwrap().contains("shader"));
    }

    #[test]
    fn report_serializes() {
        let report = run(ViewportConfig::default(), &sim(1, ""));
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"frames_rendered\":1"));
    }
}
