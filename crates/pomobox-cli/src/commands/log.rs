use clap::Subcommand;

use super::open_session;

#[derive(Subcommand)]
pub enum LogAction {
    /// Show recent events, newest first
    Show {
        /// Maximum number of entries
        #[arg(long, short, default_value = "20")]
        limit: usize,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear the event history
    Reset,
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, _) = open_session()?;

    match action {
        LogAction::Show { limit, json } => {
            let entries: Vec<_> = session.log().entries().take(limit).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("no events");
            } else {
                for entry in entries {
                    println!("{entry}");
                }
            }
        }
        LogAction::Reset => {
            session.reset_log()?;
            println!("history cleared");
        }
    }
    Ok(())
}
