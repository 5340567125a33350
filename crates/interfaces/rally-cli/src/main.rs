use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use rally_cli::commands::{self, EventDraft, ScenarioDraft};
use rally_cli::{default_data_dir, CliPollVote, CliScenarioVote, Session};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Directory holding the local store
    #[arg(long, global = true, env = rally_config::DATA_DIR_ENV)]
    data_dir: Option<Utf8PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, poll and move events through their lifecycle
    Event {
        #[command(subcommand)]
        command: EventCommands,
    },
    /// Plan and vote on scenarios for a confirmed event
    Scenario {
        #[command(subcommand)]
        command: ScenarioCommands,
    },
}

#[derive(Subcommand)]
enum EventCommands {
    List,
    Create {
        #[arg(long, help = "Event id (a UUID is generated when omitted)")]
        id: Option<String>,
        #[arg(long)]
        title: String,
        #[arg(long)]
        organizer: String,
        #[arg(long = "slot", help = "Proposed slot as START/END, repeatable")]
        slots: Vec<String>,
        #[arg(long)]
        deadline: String,
        #[arg(long)]
        description: Option<String>,
    },
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    #[command(name = "start-poll")]
    StartPoll { id: String },
    Vote {
        id: String,
        #[arg(long)]
        participant: String,
        #[arg(long)]
        slot: String,
        #[arg(long, value_enum)]
        vote: CliPollVote,
    },
    Confirm {
        id: String,
        #[arg(long)]
        slot: String,
    },
    Organize { id: String },
    Finalize { id: String },
    Delete { id: String },
}

#[derive(Subcommand)]
enum ScenarioCommands {
    List { event_id: String },
    Create {
        event_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        period: String,
        #[arg(long)]
        location: String,
        #[arg(long, default_value_t = 1)]
        days: u32,
        #[arg(long, default_value_t = 1)]
        participants: u32,
        #[arg(long, default_value_t = 0.0)]
        budget: f64,
        #[arg(long)]
        description: Option<String>,
    },
    Vote {
        event_id: String,
        scenario_id: String,
        #[arg(long)]
        participant: String,
        #[arg(long, value_enum)]
        vote: CliScenarioVote,
    },
    Compare {
        event_id: String,
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long, help = "Nominate the preferred scenario instead of ranking")]
        best: Option<String>,
    },
    Select { event_id: String, scenario_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    let session = Session::open(&data_dir)?;

    match cli.command {
        Commands::Event { command } => match command {
            EventCommands::List => {
                commands::cmd_event_list(&session).await?;
            }
            EventCommands::Create {
                id,
                title,
                organizer,
                slots,
                deadline,
                description,
            } => {
                let draft = EventDraft {
                    id,
                    title,
                    organizer,
                    description,
                    slots,
                    deadline,
                };
                commands::cmd_event_create(&session, draft).await?;
            }
            EventCommands::Show { id, json } => {
                commands::cmd_event_show(&session, &id, json).await?;
            }
            EventCommands::StartPoll { id } => {
                commands::cmd_event_start_poll(&session, &id).await?;
            }
            EventCommands::Vote {
                id,
                participant,
                slot,
                vote,
            } => commands::cmd_event_vote(&session, &id, &participant, &slot, vote.into()).await?,
            EventCommands::Confirm { id, slot } => {
                commands::cmd_event_confirm(&session, &id, &slot).await?;
            }
            EventCommands::Organize { id } => {
                commands::cmd_event_organize(&session, &id).await?;
            }
            EventCommands::Finalize { id } => {
                commands::cmd_event_finalize(&session, &id).await?;
            }
            EventCommands::Delete { id } => commands::cmd_event_delete(&session, &id).await?,
        },
        Commands::Scenario { command } => match command {
            ScenarioCommands::List { event_id } => {
                commands::cmd_scenario_list(&session, &event_id).await?
            }
            ScenarioCommands::Create {
                event_id,
                name,
                period,
                location,
                days,
                participants,
                budget,
                description,
            } => {
                let draft = ScenarioDraft {
                    event_id,
                    name,
                    period,
                    location,
                    days,
                    participants,
                    budget,
                    description,
                };
                commands::cmd_scenario_create(&session, draft).await?;
            }
            ScenarioCommands::Vote {
                event_id,
                scenario_id,
                participant,
                vote,
            } => {
                commands::cmd_scenario_vote(
                    &session,
                    &event_id,
                    &scenario_id,
                    &participant,
                    vote.into(),
                )
                .await?
            }
            ScenarioCommands::Compare { event_id, ids, best } => {
                commands::cmd_scenario_compare(&session, &event_id, ids, best).await?;
            }
            ScenarioCommands::Select {
                event_id,
                scenario_id,
            } => commands::cmd_scenario_select(&session, &event_id, &scenario_id).await?,
        },
    }

    Ok(())
}
