use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use taskboard_app::{
    AuthStore, BoardService, ClientConfig, DerivedView, HOME_ROUTE, MemberService, ProjectFilterBuilder,
    RegistrationForm, RouteDecision, TaskFilterBuilder, Toaster, local_now,
};
use taskboard_client::{ApiClient, FileSessionStore, RecordingNavigator, Session};
use taskboard_core::{
    AuthRequest, EntityId, ProjectMemberRequest, ProjectRequest, ProjectRole, ProjectStatus, TaskFilter, TaskStatus,
};
use tracing::debug;

use crate::{
    BoardCommand, Command, LabelsCommand, LsFormat, MembersCommand, ProjectFilterArgs, ProjectsCommand,
    TaskFilterArgs, TasksCommand,
};

mod render;

/// Everything a command needs: configuration, the API client and the toast queue.
pub struct App {
    config: ClientConfig,
    client: ApiClient,
    navigator: Arc<RecordingNavigator>,
    toaster: Toaster,
}

impl App {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let session = Session::new(FileSessionStore::new(config.session_path()));
        Self::with_session(config, session)
    }

    fn with_session(config: ClientConfig, session: Session) -> Result<Self> {
        let navigator = Arc::new(RecordingNavigator::default());
        let client = ApiClient::new(&config.api_base_url, session, navigator.clone())
            .context("failed to build API client")?
            .with_login_route(config.login_route.clone());
        let toaster = Toaster::new(config.toast.remove_delay());
        Ok(Self {
            config,
            client,
            navigator,
            toaster,
        })
    }

    /// Run `command`, then report toasts and any forced logout on stderr.
    pub async fn execute(&self, command: Command) -> Result<()> {
        let result = self.run(command).await;

        for toast in self.toaster.toasts() {
            eprintln!("{}", render::toast_line(&toast));
        }
        if self.navigator.take().as_deref() == Some(self.config.login_route.as_str()) {
            eprintln!("session expired or invalid; run `taskboard login` to sign in again");
        }
        result
    }

    async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Login { user, password } => self.login(user, password).await,
            Command::Register {
                username,
                email,
                password,
                confirm_password,
            } => {
                let form = RegistrationForm {
                    username,
                    email,
                    password,
                    confirm_password,
                };
                let mut auth = AuthStore::initialized(self.client.clone());
                auth.register_form(&form).await.map_err(|err| {
                    debug!("registration failed: {err}");
                    anyhow!(err.registration_message())
                })?;
                println!("registered and logged in as {}", form.username.trim());
                Ok(())
            }
            Command::Logout => {
                AuthStore::initialized(self.client.clone()).logout()?;
                println!("logged out");
                Ok(())
            }
            Command::Status => {
                let auth = AuthStore::initialized(self.client.clone());
                println!("api: {}", self.client.base_url());
                println!("session: {}", self.config.session_path().display());
                if auth.is_authenticated() {
                    println!("logged in");
                } else {
                    println!("not logged in");
                }
                Ok(())
            }
            Command::Projects(cmd) => {
                self.require_session()?;
                self.projects(cmd).await
            }
            Command::Tasks(cmd) => {
                self.require_session()?;
                self.tasks(cmd).await
            }
            Command::Board(cmd) => {
                self.require_session()?;
                self.board(cmd).await
            }
            Command::Labels(LabelsCommand::Ls { project }) => {
                self.require_session()?;
                let labels = match project {
                    Some(id) => self.client.project_labels(id).await?,
                    None => self.client.labels().await?,
                };
                print!("{}", render::label_table(&labels));
                Ok(())
            }
            Command::Members(cmd) => {
                self.require_session()?;
                self.members(cmd).await
            }
        }
    }

    async fn login(&self, user: String, password: String) -> Result<()> {
        let mut auth = AuthStore::initialized(self.client.clone());
        let credentials = AuthRequest {
            username_or_email: user,
            password,
        };
        auth.login(&credentials).await.map_err(|err| {
            debug!("login failed: {err}");
            anyhow!(err.login_message())
        })?;
        println!("logged in as {}", credentials.username_or_email);
        Ok(())
    }

    fn require_session(&self) -> Result<()> {
        let auth = AuthStore::initialized(self.client.clone());
        match auth.guard(HOME_ROUTE) {
            RouteDecision::Redirect(_) | RouteDecision::Loading => {
                bail!("not logged in; run `taskboard login` first")
            }
            RouteDecision::Render => Ok(()),
        }
    }

    async fn projects(&self, command: ProjectsCommand) -> Result<()> {
        match command {
            ProjectsCommand::Ls { filter, format } => {
                let filter = build_project_filter(filter)?;
                let mut view = DerivedView::new(filter);
                view.set_source(self.client.projects().await?);
                let total = view.source().len();
                let active = view.filter().active_count();
                let projects = view.view(local_now()).to_vec();

                if projects.is_empty() {
                    if active == 0 {
                        println!("No projects found");
                    } else {
                        println!("No projects matched the provided filters");
                    }
                    return Ok(());
                }
                match format {
                    LsFormat::Table => {
                        print!("{}", render::project_table(&projects));
                        println!("{} of {total} projects ({active} filters active)", projects.len());
                    }
                    LsFormat::Json => println!("{}", serde_json::to_string_pretty(&projects)?),
                }
            }
            ProjectsCommand::Show { id } => {
                let project = self.client.project(id).await?;
                println!("{}", serde_json::to_string_pretty(&project)?);
            }
            ProjectsCommand::Create {
                name,
                description,
                status,
            } => {
                let request = ProjectRequest {
                    name,
                    description,
                    status: ProjectStatus::from_str(&status)?,
                };
                let project = self.client.create_project(&request).await?;
                println!("created project: {} ({})", project.id, project.name);
            }
            ProjectsCommand::Delete { id } => {
                self.client.delete_project(id).await?;
                println!("deleted project: {id}");
            }
        }
        Ok(())
    }

    async fn tasks(&self, command: TasksCommand) -> Result<()> {
        let TasksCommand::Ls {
            project,
            mine,
            filter,
            format,
        } = command;
        let filter = build_task_filter(filter)?;
        let tasks = match (project, mine) {
            (Some(id), _) => self.client.project_tasks(id).await?,
            (None, true) => self.client.my_tasks().await?,
            (None, false) => bail!("either --project or --mine is required"),
        };

        let mut view = DerivedView::new(filter);
        view.set_source(tasks);
        let total = view.source().len();
        let active = view.filter().active_count();
        let tasks = view.view(local_now()).to_vec();

        if tasks.is_empty() {
            if active == 0 {
                println!("No tasks found");
            } else {
                println!("No tasks matched the provided filters");
            }
            return Ok(());
        }
        match format {
            LsFormat::Table => {
                print!("{}", render::task_table(&tasks));
                println!("{} of {total} tasks ({active} filters active)", tasks.len());
            }
            LsFormat::Json => println!("{}", serde_json::to_string_pretty(&tasks)?),
        }
        Ok(())
    }

    async fn board(&self, command: BoardCommand) -> Result<()> {
        match command {
            BoardCommand::Show { project, filter } => {
                let filter = build_task_filter(filter)?;
                let mut board = BoardService::new(self.client.clone(), project);
                board.load().await?;
                print!("{}", render::board(&board.columns(&filter, local_now())));
            }
            BoardCommand::Move {
                project,
                task,
                status,
            } => {
                let target = TaskStatus::from_str(&status)?;
                let mut board = BoardService::new(self.client.clone(), project);
                board.load().await?;
                if !board.tasks().iter().any(|candidate| candidate.id == task) {
                    bail!("task {task} not found in project {project}");
                }
                if board.move_task(task, target).await? {
                    println!("moved task {task} to {}", target.label());
                } else {
                    println!("task {task} is already in {}", target.label());
                }
            }
        }
        Ok(())
    }

    async fn members(&self, command: MembersCommand) -> Result<()> {
        match command {
            MembersCommand::Ls { project } => {
                let mut service = self.member_service(project);
                service.load().await?;
                print!("{}", render::member_table(service.members()));
            }
            MembersCommand::Add { project, user, role } => {
                let mut service = self.member_service(project);
                let request = ProjectMemberRequest {
                    username: user,
                    role: ProjectRole::from_str(&role)?,
                };
                service.add(&request).await?;
            }
            MembersCommand::Role { project, user, role } => {
                let role = ProjectRole::from_str(&role)?;
                let mut service = self.member_service(project);
                service.load().await?;
                service.update_role(&user, role).await?;
            }
            MembersCommand::Rm { project, user } => {
                let mut service = self.member_service(project);
                service.load().await?;
                service.remove(&user).await?;
            }
        }
        Ok(())
    }

    fn member_service(&self, project: EntityId) -> MemberService {
        MemberService::new(self.client.clone(), self.toaster.clone(), project)
    }
}

fn build_project_filter(args: ProjectFilterArgs) -> Result<taskboard_core::ProjectFilter> {
    let ProjectFilterArgs {
        search,
        status,
        created_by,
        sort_by,
        order,
        date_range,
    } = args;
    Ok(ProjectFilterBuilder::new()
        .with_search(search)
        .with_created_by(created_by)
        .with_status(status.as_deref())?
        .with_sort(Some(&sort_by), Some(&order))?
        .with_date_range(date_range.as_deref())?
        .build()?)
}

fn build_task_filter(args: TaskFilterArgs) -> Result<TaskFilter> {
    let TaskFilterArgs {
        search,
        assigned_to,
        priority,
        labels,
        due,
        created_by,
        overdue,
    } = args;
    Ok(TaskFilterBuilder::new()
        .with_search(search)
        .with_assignee(assigned_to.as_deref())
        .with_labels(&labels)
        .with_created_by(created_by)
        .with_overdue(overdue)
        .with_priority(priority.as_deref())?
        .with_due(due.as_deref())?
        .build())
}
