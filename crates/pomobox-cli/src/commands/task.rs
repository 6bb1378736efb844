use clap::Subcommand;
use pomobox_core::{Task, TaskPatch};

use super::{index, open_session};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Append a task to the queue
    Add {
        /// Task name
        name: String,
        /// Longer description
        #[arg(long, short, default_value = "")]
        description: String,
    },
    /// Edit a queued task
    Update {
        /// Queue position (1-based)
        position: usize,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New description
        #[arg(long, short)]
        description: Option<String>,
    },
    /// Remove a queued task
    Remove {
        /// Queue position (1-based)
        position: usize,
    },
    /// Move a queued task to another position
    Move {
        /// Current position (1-based)
        from: usize,
        /// Target position (1-based)
        to: usize,
    },
    /// Activate the task at the head of the queue
    Next,
    /// Complete the active task and activate the next one
    Complete,
    /// Show the active, queued and completed tasks
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear all tasks
    Reset,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, _) = open_session()?;

    match action {
        TaskAction::Add { name, description } => {
            session.add_task(Task::new(name.clone(), description))?;
            println!("queued \"{name}\" at {}", session.tasks().queued().len());
        }
        TaskAction::Update {
            position,
            name,
            description,
        } => {
            let patch = TaskPatch { name, description };
            if patch.is_empty() {
                return Err("nothing to update: pass --name or --description".into());
            }
            if session.update_task(index(position)?, &patch)? {
                println!("updated task {position}");
            } else {
                println!("task {position} unchanged");
            }
        }
        TaskAction::Remove { position } => {
            let task = session.remove_task(index(position)?)?;
            println!("removed \"{}\"", task.name);
        }
        TaskAction::Move { from, to } => {
            session.move_task(index(from)?, index(to)?)?;
            println!("moved task {from} to {to}");
        }
        TaskAction::Next => {
            session.start_next_task()?;
            if let Some(task) = session.tasks().active() {
                println!("started \"{}\"", task.name);
            }
        }
        TaskAction::Complete => {
            let finished = session.tasks().active().map(|t| t.name.clone());
            session.complete_task()?;
            if let Some(name) = finished {
                println!("completed \"{name}\"");
            }
            if let Some(task) = session.tasks().active() {
                println!("started \"{}\"", task.name);
            }
        }
        TaskAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(session.tasks().state())?);
            } else {
                print_tasks(&session);
            }
        }
        TaskAction::Reset => {
            session.reset_tasks()?;
            println!("tasks cleared");
        }
    }
    Ok(())
}

fn print_tasks(session: &pomobox_core::Session) {
    let tasks = session.tasks();
    match tasks.active() {
        Some(task) => println!("active: {}", task.name),
        None => println!("active: -"),
    }

    if tasks.queued().is_empty() {
        println!("queue is empty");
    } else {
        println!("queued:");
        for (i, task) in tasks.queued().iter().enumerate() {
            if task.description.is_empty() {
                println!("  {}. {}", i + 1, task.name);
            } else {
                println!("  {}. {} ({})", i + 1, task.name, task.description);
            }
        }
    }

    let completed: Vec<_> = tasks.completed().collect();
    if !completed.is_empty() {
        println!("completed:");
        for task in completed {
            println!("  - {}", task.name);
        }
    }
}
