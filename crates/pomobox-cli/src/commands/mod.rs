pub mod config;
pub mod log;
pub mod task;
pub mod timer;

use std::rc::Rc;

use pomobox_core::{Config, Database, Session, SystemClock};

/// Hydrate a session from the on-disk database and config.
pub fn open_session() -> Result<(Session, Config), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let store = Rc::new(Database::open()?);
    let session = Session::open(store, Rc::new(SystemClock), &config)?;
    Ok((session, config))
}

/// Convert a 1-based command line position to a queue index.
pub fn index(position: usize) -> Result<usize, Box<dyn std::error::Error>> {
    position
        .checked_sub(1)
        .ok_or_else(|| "positions start at 1".into())
}

pub fn reset_all() -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, _) = open_session()?;
    session.reset_all()?;
    println!("all data reset");
    Ok(())
}
