// Copyright (c) 2026 rezky_nightky

use std::env;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use glyphfall::config::{print_list_charsets, Args, RainConfig, TEST_MODE_ENV};
use glyphfall::logging::init_file_logging;
use glyphfall::terminal::restore_terminal_best_effort;

/// Last termination signal received, 0 if none.
static SIGNAL: AtomicI32 = AtomicI32::new(0);

fn build_info() -> &'static str {
    env!("GLYPHFALL_BUILD")
}

fn git_sha() -> &'static str {
    env!("GLYPHFALL_GIT_SHA")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

/// Marks the run as interrupted; the engine stops at its next tick and the
/// surface guard restores the terminal. A repeated signal means the loop is
/// not responding, so restore directly and exit.
fn on_signal(sig: i32, stop: &AtomicBool) {
    SIGNAL.store(sig, Ordering::SeqCst);
    if stop.swap(true, Ordering::SeqCst) {
        restore_terminal_best_effort();
        std::process::exit(128 + sig);
    }
    tracing::warn!(signal = sig, "signal received, stopping");
}

fn install_safety_net(stop: Arc<AtomicBool>) {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                for sig in signals.forever() {
                    on_signal(sig, &stop);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(move || on_signal(2, &stop)) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn main() -> ExitCode {
    let cmd = Args::command().styles(clap_styles());
    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_charsets {
        print_list_charsets();
        return ExitCode::SUCCESS;
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        if git_sha().is_empty() {
            println!("Build: {}", build_info());
        } else {
            println!("Build: {} ({})", build_info(), git_sha());
        }
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        return ExitCode::SUCCESS;
    }

    let test_mode = env::var(TEST_MODE_ENV).ok();
    let config = match RainConfig::from_args(&args, test_mode.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = &args.log_file {
        if let Err(e) = init_file_logging(path) {
            eprintln!("failed to open log file {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    }

    let stop = Arc::new(AtomicBool::new(false));
    install_safety_net(Arc::clone(&stop));

    let result = glyphfall::run_rain_interruptible(config, stop);
    let signal = SIGNAL.load(Ordering::SeqCst);
    if signal != 0 {
        return ExitCode::from(u8::try_from(128 + signal).unwrap_or(u8::MAX));
    }

    match result {
        Ok(report) => {
            if args.stats {
                println!("RUN STATS:");
                println!("  frames: {}", report.frames);
                println!("  columns: {}", report.columns);
                println!("  elapsed_s: {:.3}", report.elapsed.as_secs_f64());
                println!("  stopped: {}", report.stop_reason);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "rain failed");
            eprintln!("glyphfall: {}", e);
            ExitCode::FAILURE
        }
    }
}
