//! `tb-board`: validate workflow files, render persona boards and move tickets

#![allow(missing_docs)]

mod files;
mod render;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use files::{JsonEtaService, JsonTicketStore};
use std::path::PathBuf;
use std::sync::Arc;
use tb_core::{AppState, Board, CandidateOptions, DisplayMode, WorkerCount};
use tb_workflow::{Persona, Stage, Workflow, WorkflowConfig, WorkflowError};
use tracing_subscriber::EnvFilter;

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("Workflow file (.yaml, .yml, .toml or .json); the bundled workflow when omitted")
}

fn persona_arg() -> Arg {
    Arg::new("persona")
        .long("persona")
        .default_value("Client")
        .value_parser(|s: &str| s.parse::<Persona>())
        .help("Viewer persona: Client, Consultant, Developer or QA")
}

fn tickets_arg() -> Arg {
    Arg::new("tickets")
        .long("tickets")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON array of tickets")
}

fn cli() -> Command {
    Command::new("tb-board")
        .version(tb_core::VERSION)
        .about("Persona-aware ticket board over a configurable stage workflow")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("validate")
                .about("Load and validate a workflow file")
                .arg(config_arg().required(true)),
        )
        .subcommand(
            Command::new("board")
                .about("Render the board for a persona")
                .arg(config_arg())
                .arg(tickets_arg())
                .arg(
                    Arg::new("etas")
                        .long("etas")
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON array of precomputed ETA results"),
                )
                .arg(persona_arg())
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .default_value("kanban")
                        .value_parser(|s: &str| s.parse::<DisplayMode>())
                        .help("Display mode: kanban, compact or table"),
                )
                .arg(
                    Arg::new("mine-only")
                        .long("mine-only")
                        .action(ArgAction::SetTrue)
                        .help("Only show lanes owned by the persona"),
                )
                .arg(
                    Arg::new("workers")
                        .long("workers")
                        .default_value("2")
                        .help("Worker count passed to the ETA service"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the view model as JSON"),
                ),
        )
        .subcommand(
            Command::new("options")
                .about("List advance and backtrack options for a stage")
                .arg(config_arg())
                .arg(
                    Arg::new("stage")
                        .long("stage")
                        .required(true)
                        .help("Current stage"),
                )
                .arg(persona_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("move")
                .about("Move a ticket to another stage and write the ticket file back")
                .arg(config_arg())
                .arg(tickets_arg())
                .arg(
                    Arg::new("ticket")
                        .long("ticket")
                        .required(true)
                        .help("Ticket id"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .required(true)
                        .help("Target stage"),
                )
                .arg(persona_arg()),
        )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_workflow(args: &ArgMatches) -> Result<Arc<Workflow>> {
    let workflow = match args.get_one::<PathBuf>("config") {
        Some(path) => WorkflowConfig::load(path)?.validate()?,
        None => Workflow::bundled().context("bundled workflow is invalid")?,
    };
    Ok(Arc::new(workflow))
}

fn persona(args: &ArgMatches) -> Persona {
    args.get_one::<Persona>("persona").copied().unwrap_or_default()
}

fn open_board(
    args: &ArgMatches,
    etas: Option<PathBuf>,
    state: AppState,
) -> Result<Board<JsonTicketStore, JsonEtaService>> {
    let workflow = load_workflow(args)?;
    let tickets = args
        .get_one::<PathBuf>("tickets")
        .context("--tickets is required")?;
    Ok(Board::new(workflow, JsonTicketStore::new(tickets), JsonEtaService::new(etas))
        .with_state(state))
}

/// Exit code of the `validate` subcommand
fn validate(args: &ArgMatches) -> Result<i32> {
    let path = args
        .get_one::<PathBuf>("config")
        .context("--config is required")?;
    let outcome = WorkflowConfig::load(path).and_then(WorkflowConfig::validate);
    match outcome {
        Ok(workflow) => {
            println!("{}: OK", path.display());
            println!("  stages:   {}", workflow.stage_count());
            println!("  edges:    {}", workflow.edge_count());
            println!("  personas: {}", workflow.personas().count());
            println!("  initial:  {}", workflow.initial_stage());
            let terminal: Vec<&str> = workflow.terminal_stages().iter().map(|s| s.as_str()).collect();
            println!("  terminal: {}", terminal.join(", "));
            Ok(0)
        }
        Err(WorkflowError::DataIntegrity(issues)) => {
            println!("{}: {} issue(s)", path.display(), issues.len());
            for issue in &issues {
                println!("  - {issue}");
            }
            Ok(1)
        }
        Err(err) => Err(err.into()),
    }
}

async fn board(args: &ArgMatches) -> Result<()> {
    let mode = args
        .get_one::<DisplayMode>("mode")
        .copied()
        .unwrap_or_default();
    let workers = args
        .get_one::<String>("workers")
        .map_or_else(WorkerCount::default, |raw| WorkerCount::parse_lenient(raw));
    let state = AppState::default()
        .with_persona(persona(args))
        .with_display_mode(mode)
        .with_show_all_columns(!args.get_flag("mine-only"))
        .with_worker_count(workers);

    let mut board = open_board(args, args.get_one::<PathBuf>("etas").cloned(), state)?;
    board.refresh().await?;

    let view = board.view();
    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::render_board(&view));
    }
    Ok(())
}

fn options(args: &ArgMatches) -> Result<()> {
    let workflow = load_workflow(args)?;
    let stage = args
        .get_one::<String>("stage")
        .map(|s| Stage::from(s.as_str()))
        .context("--stage is required")?;
    if !workflow.contains(stage.as_str()) {
        bail!("unknown stage '{stage}'");
    }

    let options = CandidateOptions::resolve(&workflow, &stage, persona(args));
    if args.get_flag("json") {
        let all: Vec<_> = options.iter().collect();
        println!("{}", serde_json::to_string_pretty(&all)?);
    } else {
        print!("{}", render::render_options(stage.as_str(), &options));
    }
    Ok(())
}

async fn move_ticket(args: &ArgMatches) -> Result<()> {
    let state = AppState::default().with_persona(persona(args));
    let mut board = open_board(args, None, state)?;
    board.refresh().await?;

    let ticket = args
        .get_one::<String>("ticket")
        .context("--ticket is required")?;
    let target = args.get_one::<String>("to").context("--to is required")?;

    board.select_ticket(ticket)?;
    board.commit(target).await?;
    println!("{ticket} -> {target}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("validate", args)) => {
            let code = validate(args)?;
            if code != 0 {
                std::process::exit(code);
            }
        }
        Some(("board", args)) => board(args).await?,
        Some(("options", args)) => options(args)?,
        Some(("move", args)) => move_ticket(args).await?,
        _ => bail!("no subcommand given"),
    }
    Ok(())
}
