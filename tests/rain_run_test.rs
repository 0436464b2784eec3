//! End-to-end runs of the rain engine against the scripted surface.
//!
//! Each test drives a full `run` through poll, evaluate, render and present,
//! then checks what the surface observed: frame count, shutdown count and
//! where cells were written.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use glyphfall::charset::{build_chars, widest_glyph, Charset};
use glyphfall::fake::ScriptedSurface;
use glyphfall::{run_rain_on, EngineError, RainConfig, RainEngine, RunBound, StopReason};

fn config() -> RainConfig {
    RainConfig {
        tick_interval: Duration::from_millis(1),
        ..RainConfig::default()
    }
    .with_seed(7)
}

#[test]
fn eighty_columns_wide_gives_forty_slots() {
    let mut surface = ScriptedSurface::new(80, 24);
    let mut engine = RainEngine::new(config().bounded(RunBound::Frames(1))).unwrap();
    let report = engine.run(&mut surface).unwrap();

    assert_eq!(report.columns, 40);
    let xs: Vec<u16> = engine.columns().iter().map(|c| c.x()).collect();
    assert_eq!(xs, (0..=78).step_by(2).collect::<Vec<u16>>());
}

#[test]
fn frame_budget_renders_exactly_that_many_frames() {
    let mut surface = ScriptedSurface::new(40, 12);
    let report = run_rain_on(&mut surface, config().bounded(RunBound::Frames(5))).unwrap();

    assert_eq!(report.frames, 5);
    assert_eq!(report.stop_reason, StopReason::FrameBudget);
    assert_eq!(surface.presents(), 5);
    assert_eq!(surface.clears(), 5);
    assert_eq!(surface.polls(), 6);
    assert_eq!(surface.shutdowns(), 1);
    assert!(!surface.is_initialized());
}

#[test]
fn key_on_poll_k_stops_before_rendering_tick_k() {
    for k in [0u64, 1, 3, 9] {
        let mut surface = ScriptedSurface::new(30, 10).with_key_at_poll(k);
        let report = run_rain_on(&mut surface, config()).unwrap();

        assert_eq!(report.stop_reason, StopReason::KeyPressed);
        assert_eq!(report.frames, k);
        assert_eq!(surface.presents(), k);
        assert_eq!(surface.polls(), k + 1);
        assert_eq!(surface.shutdowns(), 1);
    }
}

#[test]
fn key_wins_over_an_exhausted_frame_budget() {
    let mut surface = ScriptedSurface::new(30, 10).with_key_at_poll(2);
    let report = run_rain_on(&mut surface, config().bounded(RunBound::Frames(2))).unwrap();
    assert_eq!(report.stop_reason, StopReason::KeyPressed);
    assert_eq!(report.frames, 2);
}

#[test]
fn duration_budget_terminates() {
    let mut surface = ScriptedSurface::new(30, 10).paced();
    let cfg = RainConfig {
        tick_interval: Duration::from_millis(5),
        ..config().bounded(RunBound::Duration(Duration::from_millis(40)))
    };
    let report = run_rain_on(&mut surface, cfg).unwrap();

    assert_eq!(report.stop_reason, StopReason::TimeBudget);
    assert!(report.frames >= 1);
    assert!(report.elapsed >= Duration::from_millis(40));
    assert_eq!(surface.shutdowns(), 1);
}

#[test]
fn unavailable_surface_is_reported_unchanged() {
    let mut surface = ScriptedSurface::unavailable("stdout is not a tty");
    let err = run_rain_on(&mut surface, config().bounded(RunBound::Frames(5))).unwrap_err();

    assert!(matches!(err, EngineError::SurfaceUnavailable(ref m) if m == "stdout is not a tty"));
    assert_eq!(surface.presents(), 0);
    assert_eq!(surface.shutdowns(), 0);
}

#[test]
fn present_failure_propagates_after_shutdown() {
    let mut surface = ScriptedSurface::new(30, 10).failing_present_at(2);
    let err = run_rain_on(&mut surface, config().bounded(RunBound::Frames(10))).unwrap_err();

    assert!(matches!(err, EngineError::Io(_)));
    assert_eq!(surface.presents(), 3);
    assert_eq!(surface.shutdowns(), 1);
    assert!(!surface.is_initialized());
}

#[test]
fn invalid_config_never_touches_the_surface() {
    let mut surface = ScriptedSurface::new(30, 10);
    let cfg = RainConfig {
        column_spacing: 0,
        ..config().bounded(RunBound::Frames(1))
    };
    let err = run_rain_on(&mut surface, cfg).unwrap_err();

    assert!(matches!(err, EngineError::InvalidConfig(_)));
    assert_eq!(surface.polls(), 0);
    assert_eq!(surface.shutdowns(), 0);
}

#[test]
fn no_write_ever_lands_off_grid() {
    for (w, h) in [(1, 1), (2, 3), (7, 5), (81, 25)] {
        let mut surface = ScriptedSurface::new(w, h);
        run_rain_on(&mut surface, config().bounded(RunBound::Frames(300))).unwrap();

        assert_eq!(surface.rejected_writes(), 0, "{w}x{h}");
        assert!(surface.writes().iter().all(|r| r.row < h && r.col < w));
    }
}

#[test]
fn custom_charset_is_the_only_source_of_glyphs() {
    let mut surface = ScriptedSurface::new(20, 10);
    let cfg = RainConfig {
        charset: vec!['0', '1'],
        mutation_probability: 0.5,
        ..config().bounded(RunBound::Frames(200))
    };
    run_rain_on(&mut surface, cfg).unwrap();

    assert!(!surface.writes().is_empty());
    assert!(surface.writes().iter().all(|r| r.glyph == '0' || r.glyph == '1'));
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        let mut surface = ScriptedSurface::new(24, 12);
        run_rain_on(&mut surface, config().bounded(RunBound::Frames(50))).unwrap();
        surface.writes().to_vec()
    };
    assert_eq!(run(), run());
}

/// Number of presented glyphs sitting in the right half of a double-width
/// neighbour. A real terminal cannot show those.
fn glyphs_hidden_by_wide_neighbours(surface: &ScriptedSurface) -> usize {
    let frame = surface.presented();
    let mut hidden = 0;
    for y in 0..frame.height {
        for x in 1..frame.width {
            let (Some(left), Some(cell)) = (frame.get(x - 1, y), frame.get(x, y)) else {
                continue;
            };
            if !left.is_blank() && !cell.is_blank() && widest_glyph(&[left.ch]) > 1 {
                hidden += 1;
            }
        }
    }
    hidden
}

#[test]
fn spacing_narrower_than_a_wide_glyph_is_rejected() {
    let mut surface = ScriptedSurface::new(20, 10);
    let cfg = RainConfig {
        column_spacing: 1,
        ..config().bounded(RunBound::Frames(200))
    };
    let err = run_rain_on(&mut surface, cfg).unwrap_err();

    assert!(matches!(err, EngineError::InvalidConfig(_)));
    assert_eq!(surface.polls(), 0);
    assert_eq!(surface.shutdowns(), 0);
}

#[test]
fn wide_glyphs_never_cover_a_neighbouring_column() {
    for frames in [1, 37, 200] {
        let mut surface = ScriptedSurface::new(20, 10);
        run_rain_on(&mut surface, config().bounded(RunBound::Frames(frames))).unwrap();
        assert_eq!(glyphs_hidden_by_wide_neighbours(&surface), 0, "after {frames} frames");
    }

    let mut surface = ScriptedSurface::new(20, 10);
    let cfg = RainConfig {
        column_spacing: 1,
        charset: build_chars(Charset::ASCII),
        ..config().bounded(RunBound::Frames(200))
    };
    let report = run_rain_on(&mut surface, cfg).unwrap();
    assert_eq!(report.columns, 20);
    assert_eq!(glyphs_hidden_by_wide_neighbours(&surface), 0);
}

#[test]
fn interrupt_stops_through_the_guard() {
    let flag = Arc::new(AtomicBool::new(true));
    let mut surface = ScriptedSurface::new(30, 10);
    let report = RainEngine::new(config())
        .unwrap()
        .with_interrupt(flag)
        .run(&mut surface)
        .unwrap();

    assert_eq!(report.stop_reason, StopReason::Interrupted);
    assert_eq!(report.frames, 0);
    assert_eq!(surface.polls(), 1);
    assert_eq!(surface.shutdowns(), 1);
    assert!(!surface.is_initialized());
}
