//! Command-line interface
//!
//! Without a subcommand the interactive screen starts. Subcommands work on
//! the same task store without a terminal UI.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::{Error, Result};
use crate::storage::{FileStore, TaskStorage};
use crate::task::TaskUpdate;
use crate::task_manager::TaskManager;

#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Personal portfolio with a task list")]
pub struct Cli {
    /// Directory holding the persisted tasks and theme
    #[arg(long, global = true, env = "FOLIO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to folio.toml
    #[arg(long, global = true, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task at the top of the list
    Add {
        title: String,
        description: Option<String>,
    },
    /// List all tasks, newest first
    List,
    /// Change the title or description of a task
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
    },
    /// Toggle a task between open and completed
    Done { id: String },
    /// Delete a task
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Delete every task
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Show total and completed counts
    Stats,
}

impl Command {
    pub fn run(self, store: FileStore) -> Result<()> {
        let mut tm = TaskManager::new(TaskStorage::new(store));
        match self {
            Command::Add { title, description } => {
                let before = tm.tasks().len();
                tm.add(&title, description.as_deref().unwrap_or_default())?;
                if tm.tasks().len() > before {
                    if let Some(task) = tm.tasks().first() {
                        println!("Added {}", task.id);
                    }
                }
            }
            Command::List => {
                for task in tm.tasks() {
                    let mark = if task.completed { "x" } else { " " };
                    println!("[{mark}] {} {}", task.id, task.title);
                    if !task.desc.is_empty() {
                        println!("    {}", task.desc);
                    }
                }
            }
            Command::Edit { id, title, desc } => {
                require(&tm, &id)?;
                tm.update(
                    &id,
                    TaskUpdate {
                        title: title.map(|t| t.trim().to_string()),
                        desc: desc.map(|d| d.trim().to_string()),
                        completed: None,
                    },
                )?;
            }
            Command::Done { id } => {
                require(&tm, &id)?;
                tm.toggle_complete(&id)?;
            }
            Command::Delete { id, yes } => {
                require(&tm, &id)?;
                if confirm("Delete this task?", yes)? {
                    tm.delete(&id)?;
                }
            }
            Command::Clear { yes } => {
                if confirm("Clear all tasks?", yes)? {
                    tm.clear_all()?;
                }
            }
            Command::Stats => {
                let counts = tm.counts();
                println!("Total: {}", counts.total);
                println!("Completed: {}", counts.completed);
            }
        }
        Ok(())
    }
}

fn require(tm: &TaskManager<FileStore>, id: &str) -> Result<()> {
    match tm.find(id) {
        Some(_) => Ok(()),
        None => Err(Error::TaskNotFound(id.to_string())),
    }
}

fn confirm(message: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{message} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
