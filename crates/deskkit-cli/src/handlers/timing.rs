//! `timer`, `stopwatch` and `clock` commands

use super::{file_storage, local_offset};
use crate::commands::{ClockArgs, StopwatchArgs, TimerArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{clock_lines, lap_lines, TerminalSink};
use crate::runtime::{block_on_local, TokioScheduler};
use deskkit::{clock_face, Clock, ClockPage, Ports, Stopwatch, Storage, SystemClock, Timer};
use std::rc::Rc;
use std::time::Duration;

const POLL: Duration = Duration::from_millis(50);

struct LiveSession {
    scheduler: Rc<TokioScheduler>,
    sink: Rc<TerminalSink>,
    ports: Ports,
}

// Must be created inside the LocalSet
fn live_session(config: &CliConfig, storage: Rc<dyn Storage>) -> LiveSession {
    let scheduler = Rc::new(TokioScheduler::new());
    let sink = Rc::new(TerminalSink::new(
        config.color.should_color(),
        config.verbosity.is_quiet(),
    ));
    let ports = Ports::new(
        Rc::new(SystemClock::new()),
        scheduler.clone(),
        sink.clone(),
        storage,
    );
    LiveSession {
        scheduler,
        sink,
        ports,
    }
}

/// Count down until the timer expires and its display stops flashing
pub fn run_timer(config: &CliConfig, args: &TimerArgs) -> CliResult<()> {
    let desk = config.desk_config()?;
    let storage = file_storage(config)?;
    block_on_local(async {
        let session = live_session(config, storage);
        let timer = Timer::new(session.ports.clone(), desk.timer);
        if args.minutes.is_some() || args.seconds.is_some() {
            timer.configure(args.minutes.unwrap_or(0), args.seconds.unwrap_or(0));
        }
        if !timer.start() {
            session.sink.finish_line();
            return Err(CliError::invalid_argument("timer duration must be positive"));
        }

        while !(timer.expired() && session.scheduler.pending() == 0) {
            tokio::time::sleep(POLL).await;
        }
        session.sink.finish_line();
        if !config.verbosity.is_quiet() {
            println!("{}", timer.status());
        }
        Ok(())
    })?
}

/// Run the stopwatch, recording a lap every `--every` milliseconds
pub fn run_stopwatch(config: &CliConfig, args: &StopwatchArgs) -> CliResult<()> {
    let desk = config.desk_config()?;
    let storage = file_storage(config)?;
    let laps = block_on_local(async {
        let session = live_session(config, storage);
        let stopwatch = Stopwatch::new(session.ports.clone(), desk.stopwatch);
        if args.reset {
            stopwatch.reset();
        }

        stopwatch.start();
        for _ in 0..args.laps {
            tokio::time::sleep(Duration::from_millis(args.every)).await;
            if let Some(lap) = stopwatch.record_lap() {
                tracing::info!(index = lap.index, lap_ms = lap.lap_ms, "Lap");
            }
        }
        stopwatch.pause();
        session.sink.finish_line();
        stopwatch.laps()
    })?;

    if !config.verbosity.is_quiet() {
        println!("{}", lap_lines(&laps));
    }
    Ok(())
}

/// Print the clock face, or keep it refreshing for `--watch` seconds
pub fn run_clock(config: &CliConfig, args: &ClockArgs) -> CliResult<()> {
    let offset = local_offset();
    if args.watch == 0 {
        println!("{}", clock_lines(&clock_face(SystemClock::new().now_ms(), offset)));
        return Ok(());
    }

    let storage = file_storage(config)?;
    block_on_local(async {
        let session = live_session(config, storage);
        let page = ClockPage::new(session.ports.clone(), offset);
        page.start();
        tokio::time::sleep(Duration::from_secs(args.watch)).await;
        page.stop();
        session.sink.finish_line();
    })?;
    Ok(())
}
