use crate::config::{self, Workspace, WorkspaceOverrides};
use crate::skills::{self, TargetRole, command};
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = config::APP_NAME)]
#[command(about = "Manage a library of agent skills and their symlinks")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Configuration directory to use instead of the platform default
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Skill library directory
    #[arg(long, global = true, value_name = "DIR")]
    pub library_dir: Option<PathBuf>,

    /// Global target directory
    #[arg(long, global = true, value_name = "DIR")]
    pub global_dir: Option<PathBuf>,

    /// Print the resolved configuration directory and exit
    #[arg(long)]
    pub print_config_dir_path: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show every skill with its link status per target
    List {
        /// Only show skills whose name contains this text
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,

        /// Emit the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Flip one skill's link in a target directory
    Toggle {
        /// Skill name
        name: String,

        #[arg(long, value_enum, default_value_t = TargetArg::Global)]
        target: TargetArg,
    },

    /// Link or unlink all visible skills at once, majority rule
    All {
        #[arg(long, value_enum, default_value_t = TargetArg::Global)]
        target: TargetArg,

        /// Only act on skills whose name contains this text
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,
    },

    /// Remove a skill from the library and every target
    Rm {
        /// Skill name
        name: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Import skills from a GitHub repository
    Add {
        /// Repository as owner/repo or a github.com URL
        repo: String,

        /// Import every skill the repository offers
        #[arg(long)]
        all: bool,

        /// Import a specific skill; repeatable
        #[arg(long = "skill", value_name = "NAME")]
        skills: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    Global,
    Local,
}

impl From<TargetArg> for TargetRole {
    fn from(value: TargetArg) -> Self {
        match value {
            TargetArg::Global => TargetRole::Global,
            TargetArg::Local => TargetRole::Local,
        }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = config::resolve_config_dir(cli.config_dir.as_deref())?;
    if cli.print_config_dir_path {
        println!("{}", config_dir.display());
        return Ok(());
    }

    let cwd = env::current_dir()?;
    let overrides = WorkspaceOverrides {
        library_dir: cli.library_dir.clone(),
        global_dir: cli.global_dir.clone(),
    };
    let workspace = Workspace::resolve(&config_dir, &overrides, &cwd)?;
    workspace.ensure_global_dir_usable()?;

    match cli.command {
        Some(Commands::List { filter, json }) => {
            command::run_list(&workspace, filter.as_deref(), json)
        }
        Some(Commands::Toggle { name, target }) => {
            command::run_toggle(&workspace, &name, target.into())
        }
        Some(Commands::All { target, filter }) => {
            command::run_all(&workspace, target.into(), filter.as_deref())
        }
        Some(Commands::Rm { name, yes }) => command::run_rm(&workspace, &name, yes),
        Some(Commands::Add { repo, all, skills }) => {
            command::run_add(&workspace, &repo, all, &skills)
        }
        None => {
            if skills::is_interactive() {
                command::run_manage(&workspace)
            } else {
                command::run_list(&workspace, None, false)
            }
        }
    }
}
