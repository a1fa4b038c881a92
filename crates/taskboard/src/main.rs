//! CLI entry point for taskboard.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use taskboard_app::ClientConfig;
use taskboard_core::EntityId;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;

/// Projects, tasks and members on a taskboard server.
#[derive(Parser, Debug)]
#[command(
    name = "taskboard",
    version,
    about = "taskboard: manage projects, tasks and members through the board REST API"
)]
struct Cli {
    /// Config file (defaults to <config_dir>/taskboard/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// API base URL, overriding config and TASKBOARD_API_URL.
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session tokens.
    Login {
        /// Username or email.
        #[arg(long)]
        user: String,
        #[arg(long)]
        password: String,
    },

    /// Create an account and sign in with it.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },

    /// Forget the stored session.
    Logout,

    /// Show whether a session is stored.
    Status,

    /// Project commands.
    #[command(subcommand)]
    Projects(ProjectsCommand),

    /// Task commands.
    #[command(subcommand)]
    Tasks(TasksCommand),

    /// Kanban board commands.
    #[command(subcommand)]
    Board(BoardCommand),

    /// Label commands.
    #[command(subcommand)]
    Labels(LabelsCommand),

    /// Project member commands.
    #[command(subcommand)]
    Members(MembersCommand),
}

#[derive(Subcommand, Debug)]
enum ProjectsCommand {
    /// List projects, filtered and sorted.
    Ls {
        #[command(flatten)]
        filter: ProjectFilterArgs,
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },
    /// Show one project as JSON.
    Show { id: EntityId },
    /// Create a project.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "ACTIVE")]
        status: String,
    },
    /// Delete a project.
    Delete { id: EntityId },
}

#[derive(Args, Debug, Clone)]
struct ProjectFilterArgs {
    /// Substring of name, description or creator.
    #[arg(long)]
    search: Option<String>,
    /// ACTIVE, COMPLETED, ON_HOLD or CANCELLED.
    #[arg(long)]
    status: Option<String>,
    /// Exact creator username.
    #[arg(long)]
    created_by: Option<String>,
    /// name, createdAt, taskCount, memberCount or status.
    #[arg(long, default_value = "createdAt")]
    sort_by: String,
    /// asc or desc.
    #[arg(long, default_value = "desc")]
    order: String,
    /// today, week, month, quarter or year.
    #[arg(long)]
    date_range: Option<String>,
}

#[derive(Subcommand, Debug)]
enum TasksCommand {
    /// List tasks of a project, or the tasks assigned to you.
    Ls {
        #[arg(long, required_unless_present = "mine", conflicts_with = "mine")]
        project: Option<EntityId>,
        #[arg(long)]
        mine: bool,
        #[command(flatten)]
        filter: TaskFilterArgs,
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct TaskFilterArgs {
    /// Substring of title, description, assignee or creator.
    #[arg(long)]
    search: Option<String>,
    /// Username, or `unassigned`.
    #[arg(long)]
    assigned_to: Option<String>,
    /// LOW, MEDIUM, HIGH or URGENT.
    #[arg(long)]
    priority: Option<String>,
    /// Required label name (repeatable).
    #[arg(short = 'l', long = "label")]
    labels: Vec<String>,
    /// overdue, today, tomorrow, week, month or no-date.
    #[arg(long)]
    due: Option<String>,
    /// Exact creator username.
    #[arg(long)]
    created_by: Option<String>,
    /// Only tasks past their due date.
    #[arg(long)]
    overdue: bool,
}

#[derive(Subcommand, Debug)]
enum BoardCommand {
    /// Show tasks grouped by status column.
    Show {
        #[arg(long)]
        project: EntityId,
        #[command(flatten)]
        filter: TaskFilterArgs,
    },
    /// Move a task to another column.
    Move {
        #[arg(long)]
        project: EntityId,
        #[arg(long)]
        task: EntityId,
        /// TODO, IN_PROGRESS, REVIEW or DONE.
        #[arg(long)]
        status: String,
    },
}

#[derive(Subcommand, Debug)]
enum LabelsCommand {
    /// List labels, optionally of one project.
    Ls {
        #[arg(long)]
        project: Option<EntityId>,
    },
}

#[derive(Subcommand, Debug)]
enum MembersCommand {
    /// List members of a project.
    Ls {
        #[arg(long)]
        project: EntityId,
    },
    /// Add a member.
    Add {
        #[arg(long)]
        project: EntityId,
        #[arg(long)]
        user: String,
        #[arg(long, default_value = "TEAM_MEMBER")]
        role: String,
    },
    /// Change a member's role.
    Role {
        #[arg(long)]
        project: EntityId,
        #[arg(long)]
        user: String,
        #[arg(long)]
        role: String,
    },
    /// Remove a member.
    Rm {
        #[arg(long)]
        project: EntityId,
        #[arg(long)]
        user: String,
    },
}

/// Output format for list commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LsFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let Cli {
        config,
        api_url,
        cmd,
    } = Cli::parse();

    install_tracing();

    let config = ClientConfig::load(config.as_deref())?.with_api_url_override(api_url);
    config.validate()?;
    let app = commands::App::new(config)?;
    tokio::runtime::Runtime::new()?.block_on(app.execute(cmd))
}

fn install_tracing() {
    // RUST_LOG is honored; the default level is INFO.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_projects_ls_with_filters() {
        let cli = Cli::parse_from([
            "taskboard",
            "--api-url",
            "http://board.local/api",
            "projects",
            "ls",
            "--search",
            "test",
            "--status",
            "COMPLETED",
            "--sort-by",
            "taskCount",
            "--date-range",
            "week",
        ]);

        assert_eq!(cli.api_url.as_deref(), Some("http://board.local/api"));
        match cli.cmd {
            Command::Projects(ProjectsCommand::Ls { filter, format }) => {
                assert_eq!(filter.search.as_deref(), Some("test"));
                assert_eq!(filter.status.as_deref(), Some("COMPLETED"));
                assert_eq!(filter.sort_by, "taskCount");
                assert_eq!(filter.order, "desc");
                assert_eq!(filter.date_range.as_deref(), Some("week"));
                assert_eq!(format, LsFormat::Table);
            }
            other => panic!("expected projects ls, got {other:?}"),
        }
    }

    #[test]
    fn parse_tasks_ls_requires_scope() {
        assert!(Cli::try_parse_from(["taskboard", "tasks", "ls"]).is_err());
        assert!(Cli::try_parse_from(["taskboard", "tasks", "ls", "--project", "1", "--mine"]).is_err());

        let cli = Cli::parse_from([
            "taskboard",
            "tasks",
            "ls",
            "--mine",
            "--label",
            "frontend",
            "-l",
            "bug",
            "--due",
            "no-date",
            "--overdue",
        ]);
        match cli.cmd {
            Command::Tasks(TasksCommand::Ls {
                project,
                mine,
                filter,
                ..
            }) => {
                assert_eq!(project, None);
                assert!(mine);
                assert_eq!(filter.labels, vec!["frontend", "bug"]);
                assert_eq!(filter.due.as_deref(), Some("no-date"));
                assert!(filter.overdue);
            }
            other => panic!("expected tasks ls, got {other:?}"),
        }
    }

    #[test]
    fn parse_members_add_defaults_role() {
        let cli = Cli::parse_from(["taskboard", "members", "add", "--project", "3", "--user", "jane"]);
        match cli.cmd {
            Command::Members(MembersCommand::Add { project, user, role }) => {
                assert_eq!(project, 3);
                assert_eq!(user, "jane");
                assert_eq!(role, "TEAM_MEMBER");
            }
            other => panic!("expected members add, got {other:?}"),
        }
    }

    #[test]
    fn parse_board_move() {
        let cli = Cli::parse_from([
            "taskboard", "board", "move", "--project", "7", "--task", "12", "--status", "REVIEW",
        ]);
        match cli.cmd {
            Command::Board(BoardCommand::Move { project, task, status }) => {
                assert_eq!((project, task), (7, 12));
                assert_eq!(status, "REVIEW");
            }
            other => panic!("expected board move, got {other:?}"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
