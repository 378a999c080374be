use crate::domain::forms::{MeetingForm, NewGroup, PasswordForm, ProfileForm, RegisterForm};
use crate::domain::models::MeetingKind;
use crate::domain::{GatewayError, Navigator, Route};
use crate::frameworks::config::ClientConfig;
use crate::frameworks::render::{self, Output};
use crate::interface_adapters::clients::ReqwestTransport;
use crate::interface_adapters::navigator::CliNavigator;
use crate::interface_adapters::token_store::FileTokenStore;
use crate::use_cases::endpoints::{
    CourseList, GetStats, GroupDetails, GroupMeetings, ListUsers, MyCourses, MyGroups,
    PublicGroups,
};
use crate::use_cases::{
    SessionContext, SessionGateway, assistant, courses, dashboard, fetch, groups, profile,
};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(
    name = "study-client",
    version,
    about = "Command-line client for the study-group platform"
)]
pub struct Cli {
    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Override the configured API base URL.
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a new account.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        numberreg: String,
        #[arg(long)]
        semester: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show whether a session is stored.
    Status,
    /// Statistics, my courses and public groups in one view.
    Dashboard,
    Stats,
    Courses {
        #[command(subcommand)]
        action: CourseAction,
    },
    Groups {
        #[command(subcommand)]
        action: GroupAction,
    },
    Meetings {
        #[command(subcommand)]
        action: MeetingAction,
    },
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// List registered users.
    Users,
    /// Ask the assistant for study material on a topic.
    Ask {
        #[arg(required = true, num_args = 1..)]
        topic: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum CourseAction {
    /// Every course offered.
    List,
    /// Courses you are enrolled in.
    Mine,
    /// Enroll in one or more courses by id.
    Enroll {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<u64>,
    },
}

#[derive(Debug, Subcommand)]
pub enum GroupAction {
    /// Public groups.
    List,
    /// Groups you belong to.
    Mine,
    /// Group details with members and meetings.
    Show { id: u64 },
    Join { id: u64 },
    Create {
        #[arg(long)]
        course: u64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        private: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum MeetingAction {
    List {
        group: u64,
    },
    Create {
        group: u64,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        /// Online meeting; the address goes in --link.
        #[arg(long = "virtual")]
        is_virtual: bool,
        #[arg(long, default_value = "")]
        link: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        topic: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    Show,
    /// Update profile fields; omitted fields keep their current value.
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        numberreg: Option<String>,
        #[arg(long)]
        semester: Option<String>,
    },
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
}

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    // Quiet by default so command output stays readable.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run() -> ExitCode {
    init_runtime();
    let cli = Cli::parse();

    let config = match load_config(cli.api_url.as_deref()) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::from(2);
        }
    };

    let transport = match ReqwestTransport::new(config.request_timeout) {
        Ok(transport) => transport,
        Err(err) => {
            tracing::error!(error = %err, "failed to initialize http client.");
            eprintln!("error: failed to initialize http client: {err}");
            return ExitCode::from(2);
        }
    };
    tracing::debug!(
        api_url = %config.base_url(),
        session_file = %config.session_file.display(),
        "client configured."
    );

    let navigator = Arc::new(CliNavigator::new());
    let gateway = SessionGateway::new(
        config.base_url(),
        Arc::new(transport),
        SessionContext {
            store: Arc::new(FileTokenStore::new(&config.session_file)),
            navigator: navigator.clone(),
        },
    );

    let output = if cli.json { Output::Json } else { Output::Text };
    match execute(&gateway, &*navigator, cli.command, output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            if err.requires_login() || navigator.last_redirect() == Some(Route::Login) {
                eprintln!("hint: run `study-client login` to sign in");
            }
            ExitCode::FAILURE
        }
    }
}

fn load_config(api_url: Option<&str>) -> Result<ClientConfig, String> {
    let config = ClientConfig::load().map_err(|err| err.to_string())?;
    match api_url {
        Some(url) => config.with_api_url(url).map_err(|err| err.to_string()),
        None => Ok(config),
    }
}

pub async fn execute(
    gateway: &SessionGateway,
    navigator: &dyn Navigator,
    command: Command,
    output: Output,
) -> Result<(), GatewayError> {
    match command {
        Command::Login { email, password } => {
            gateway.login(&email, &password).await?;
            render::message(output, "logged in");
            // Landing screen after a successful login.
            navigator.redirect(Route::Dashboard);
            let view = dashboard::load_dashboard(gateway).await;
            render::dashboard(output, &view);
        }
        Command::Register {
            name,
            email,
            password,
            numberreg,
            semester,
        } => {
            let request = RegisterForm {
                name,
                email,
                password,
                numberreg,
                semester,
            }
            .validate()?;
            let message = gateway.register(request).await?;
            render::message(output, &message);
        }
        Command::Logout => {
            gateway.logout().await;
            render::message(output, "logged out");
        }
        Command::Status => {
            let state = gateway.state().await;
            render::message(output, &format!("{state:?}").to_lowercase());
        }
        Command::Dashboard => {
            let view = dashboard::load_dashboard(gateway).await;
            render::dashboard(output, &view);
        }
        Command::Stats => render::stats(output, &fetch(gateway, &GetStats).await?),
        Command::Courses { action } => run_courses(gateway, action, output).await?,
        Command::Groups { action } => run_groups(gateway, action, output).await?,
        Command::Meetings { action } => run_meetings(gateway, action, output).await?,
        Command::Profile { action } => run_profile(gateway, action, output).await?,
        Command::Users => render::users(output, &fetch(gateway, &ListUsers).await?),
        Command::Ask { topic } => {
            let resources = assistant::ask_assistant(gateway, &topic.join(" ")).await?;
            render::resources(output, &resources);
        }
    }
    Ok(())
}

async fn run_courses(
    gateway: &SessionGateway,
    action: CourseAction,
    output: Output,
) -> Result<(), GatewayError> {
    match action {
        CourseAction::List => render::courses(output, &fetch(gateway, &CourseList).await?),
        CourseAction::Mine => render::courses(output, &fetch(gateway, &MyCourses).await?),
        CourseAction::Enroll { ids } => {
            let selection: courses::CourseSelection = ids.into_iter().collect();
            let message = courses::enroll(gateway, &selection).await?;
            render::message(output, &message);
        }
    }
    Ok(())
}

async fn run_groups(
    gateway: &SessionGateway,
    action: GroupAction,
    output: Output,
) -> Result<(), GatewayError> {
    match action {
        GroupAction::List => render::groups(output, &fetch(gateway, &PublicGroups).await?),
        GroupAction::Mine => render::groups(output, &fetch(gateway, &MyGroups).await?),
        GroupAction::Show { id } => {
            let details = GroupDetails { group_id: id };
            let listing = GroupMeetings { group_id: id };
            let (group, meetings) =
                tokio::join!(fetch(gateway, &details), fetch(gateway, &listing));
            let group = group?;
            // A group without reachable meetings is still worth showing.
            let meetings = meetings.unwrap_or_else(|err| {
                tracing::warn!(error = %err, "failed to load meetings.");
                Vec::new()
            });
            render::group(output, &group, &meetings);
        }
        GroupAction::Join { id } => {
            let message = groups::join_group(gateway, id).await?;
            render::message(output, &message);
        }
        GroupAction::Create {
            course,
            name,
            private,
        } => {
            let group = NewGroup::new(Some(course), &name, !private)?;
            let message = groups::create_group(gateway, group).await?;
            render::message(output, &message);
        }
    }
    Ok(())
}

async fn run_meetings(
    gateway: &SessionGateway,
    action: MeetingAction,
    output: Output,
) -> Result<(), GatewayError> {
    match action {
        MeetingAction::List { group } => {
            let meetings = fetch(gateway, &GroupMeetings { group_id: group }).await?;
            render::meetings(output, &meetings);
        }
        MeetingAction::Create {
            group,
            start,
            end,
            is_virtual,
            link,
            location,
            topic,
        } => {
            let form = MeetingForm {
                start_time: start,
                end_time: end,
                kind: if is_virtual {
                    MeetingKind::Virtual
                } else {
                    MeetingKind::InPerson
                },
                link,
                location,
                topic_name: topic,
            };
            let meeting = groups::create_meeting(gateway, group, form).await?;
            render::meetings(output, std::slice::from_ref(&meeting));
        }
    }
    Ok(())
}

async fn run_profile(
    gateway: &SessionGateway,
    action: ProfileAction,
    output: Output,
) -> Result<(), GatewayError> {
    match action {
        ProfileAction::Show => render::profile(output, &profile::load_profile(gateway).await?),
        ProfileAction::Update {
            name,
            email,
            numberreg,
            semester,
        } => {
            let current = profile::load_profile(gateway).await?;
            let form = ProfileForm {
                name: name.unwrap_or_else(|| current.name.clone()),
                email: email.unwrap_or_else(|| current.email.clone()),
                numberreg: numberreg.unwrap_or_else(|| current.numberreg.to_string()),
                semester: semester.unwrap_or_else(|| current.semester.to_string()),
            };
            let updated = profile::update_profile(gateway, current, form).await?;
            render::profile(output, &updated);
        }
        ProfileAction::Password {
            current,
            new,
            confirm,
        } => {
            let form = PasswordForm {
                current_password: current,
                new_password: new,
                confirm_password: confirm,
            };
            let message = profile::change_password(gateway, form).await?;
            render::message(output, &message);
        }
    }
    Ok(())
}
