use std::{path::Path, time::SystemTime};

use color_eyre::{
    config::{HookBuilder, Theme},
    eyre::{self, Context},
};
use fern::colors::{Color, ColoredLevelConfig};

pub fn init_eyre() -> eyre::Result<()> {
    let eyre_color = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        Theme::dark()
    } else {
        Theme::new()
    };

    let (stderr_panic_hook, eyre_hook) =
        HookBuilder::default().theme(eyre_color).into_hooks();
    eyre_hook
        .install()
        .wrap_err("failed to install eyre hook")?;

    let (log_panic_hook, _) = HookBuilder::default().theme(Theme::new()).into_hooks();

    std::panic::set_hook(Box::new(move |info| {
        eprintln!("{}", stderr_panic_hook.panic_report(info));
        log::error!(target: "panic", "{}", log_panic_hook.panic_report(info));
    }));

    Ok(())
}

/// Logs everything at `level` or above to stdout, colored if stdout is a terminal, and to
/// `logfile` without colors if given.
pub fn init_logger(level: log::LevelFilter, logfile: Option<&Path>) -> eyre::Result<()> {
    let colors = if std::io::IsTerminal::is_terminal(&std::io::stdout()) {
        Some(
            ColoredLevelConfig::new()
                .error(Color::Red)
                .warn(Color::Yellow)
                .info(Color::Green)
                .debug(Color::Blue)
                .trace(Color::Magenta),
        )
    } else {
        None
    };

    let mut dispatch = fern::Dispatch::new().level(level).chain(
        fern::Dispatch::new()
            .format(move |out, message, record| {
                let now = humantime::format_rfc3339_seconds(SystemTime::now());
                match colors {
                    Some(colors) => out.finish(format_args!(
                        "{now} {} [{}] {message}",
                        colors.color(record.level()),
                        record.target(),
                    )),
                    None => out.finish(format_args!(
                        "{now} {} [{}] {message}",
                        record.level(),
                        record.target(),
                    )),
                }
            })
            .chain(std::io::stdout()),
    );

    if let Some(logfile) = logfile {
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{} {} [{}] {message}",
                        humantime::format_rfc3339_millis(SystemTime::now()),
                        record.level(),
                        record.target(),
                    ))
                })
                .chain(fern::log_file(logfile).wrap_err_with(|| {
                    format!("failed to open the log file at: {logfile:?}")
                })?),
        );
    }

    dispatch.apply().wrap_err("failed to set the logger")?;

    Ok(())
}
