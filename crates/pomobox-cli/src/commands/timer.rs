use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use pomobox_core::duration::{format_millis, parse_duration};
use pomobox_core::{Config, IntervalFinished, Phase, Session};
use tokio::time::MissedTickBehavior;
use tracing::info;

use super::open_session;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a work interval
    Start,
    /// Stop the running interval
    Stop,
    /// Print current timer state
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the work duration (e.g. "25m", "1m30s", "90s")
    SetWork {
        duration: String,
    },
    /// Set the break duration (e.g. "5m")
    SetBreak {
        duration: String,
    },
    /// Restore default durations and stop
    Reset,
    /// Drive the timer in the foreground until Ctrl+C (starts it if stopped)
    Run,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, config) = open_session()?;

    match action {
        TimerAction::Start => {
            session.start()?;
            println!("{}", session.headline());
        }
        TimerAction::Stop => {
            session.stop()?;
            println!("timer stopped");
        }
        TimerAction::Status { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(session.timer().state())?);
            } else {
                print_status(&session);
            }
        }
        TimerAction::SetWork { duration } => {
            let millis = parse_duration(&duration)?;
            session.set_work_duration(millis)?;
            println!("work duration set to {}", format_millis(millis));
        }
        TimerAction::SetBreak { duration } => {
            let millis = parse_duration(&duration)?;
            session.set_break_duration(millis)?;
            println!("break duration set to {}", format_millis(millis));
        }
        TimerAction::Reset => {
            session.reset_timer()?;
            println!("timer reset");
        }
        TimerAction::Run => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(drive(session, &config))?;
        }
    }
    Ok(())
}

fn print_status(session: &Session) {
    let timer = session.timer();
    let phase = match timer.phase() {
        Phase::Stopped => "stopped",
        Phase::RunningWork => "work",
        Phase::RunningBreak => "break",
    };
    println!("phase:     {phase}");
    println!("remaining: {}", format_millis(timer.remaining_ms()));
    println!("work:      {}", format_millis(timer.work_duration_ms()));
    println!("break:     {}", format_millis(timer.break_duration_ms()));
    if let Some(task) = session.tasks().active() {
        println!("active:    {}", task.name);
    }
}

fn alert(finished: &IntervalFinished) -> &'static str {
    match finished.finished {
        Phase::RunningWork => "Work Interval Finished",
        _ => "Break Finished",
    }
}

async fn drive(mut session: Session, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if !session.timer().phase().is_running() {
        session.start()?;
    }

    let mut interval = tokio::time::interval(Duration::from_millis(config.timer.tick_ms.max(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut stdout = std::io::stdout();
    let mut shown = String::new();

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("interrupted, timer keeps its persisted state");
                println!();
                break;
            }
            _ = interval.tick() => {
                // Other pomobox commands may have written since the last tick.
                session.refresh()?;
                if let Some(finished) = session.poll()? {
                    if config.notifications.enabled {
                        println!("\r\x07{}", alert(&finished));
                    }
                    shown.clear();
                }

                let headline = session.headline();
                if headline != shown {
                    print!("\r{headline}\x1b[K");
                    stdout.flush()?;
                    shown = headline;
                }
            }
        }
    }

    Ok(())
}
