//! Command dispatch

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{
    PlaybackOutcome, Speed, TutorContext, TutorService, Visualizer, WorkbenchService,
};
use crate::cli::args::{Cli, Commands, ConfigCommands, SessionCommands, TutorCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::complexity::{self, algorithm_info};
use crate::domain::{Algorithm, Operation, SavedState, StructureKind, Structures};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Run the parsed command line.
pub async fn execute(cli: Cli) -> CliResult<()> {
    let Some(command) = cli.command else {
        let mut cmd = Cli::command();
        cmd.print_help()
            .map_err(|e| InfraError::io("print help", e))?;
        return Ok(());
    };

    // commands that need no settings
    match &command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
        Commands::Config {
            command: ConfigCommands::Template,
        } => {
            output::info(&Settings::template());
            return Ok(());
        }
        _ => {}
    }

    let config_file = cli.config.clone().or_else(global_config_path);
    let mut settings = Settings::load_from(config_file.as_deref())?;
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    debug!("execute: data_dir={}", settings.data_dir.display());
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Show { kind } => cmd_show(&container, kind),
        Commands::Op {
            kind,
            operation,
            value,
        } => cmd_op(&container, kind, operation, value.as_deref()),
        Commands::Clear { kind } => cmd_clear(&container, kind),
        Commands::Ops { kind } => cmd_ops(kind),
        Commands::Complexity { kind, operation } => cmd_complexity(kind, operation),
        Commands::Algorithms => cmd_algorithms(),
        Commands::Sort {
            algorithm,
            speed,
            size,
            values,
        } => cmd_sort(&container, algorithm, speed, size, values).await,
        Commands::Session { command } => cmd_session(&container, command),
        Commands::Ask {
            structure,
            algorithm,
            question,
        } => cmd_ask(&container, structure, algorithm, &question.join(" ")).await,
        Commands::Tutor { command } => cmd_tutor(&container, command).await,
        Commands::Config { command } => cmd_config(&container, config_file, command),
        Commands::Completion { .. } => Ok(()),
    }
}

fn print_structure(structures: &Structures, kind: StructureKind) {
    output::header(&format!("{} ({})", kind.title(), kind));
    let structure = structures.get(kind);
    output::detail(&output::items_line(&structure.items()));
    if kind == StructureKind::BinaryTree && !structures.binary_tree.is_empty() {
        output::detail(&format!("depth: {}", structures.binary_tree.depth()));
        for line in structures.binary_tree.to_tree_string().to_string().lines() {
            output::detail(&line);
        }
    }
}

#[instrument(skip(container))]
fn cmd_show(container: &ServiceContainer, kind: Option<StructureKind>) -> CliResult<()> {
    let structures = container.persistence().load_current();
    match kind {
        Some(kind) => print_structure(&structures, kind),
        None => {
            for kind in StructureKind::ALL {
                print_structure(&structures, kind);
            }
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn cmd_op(
    container: &ServiceContainer,
    kind: StructureKind,
    operation: Operation,
    value: Option<&str>,
) -> CliResult<()> {
    let persistence = container.persistence();
    let mut workbench = WorkbenchService::with_structures(persistence.load_current());

    let line = workbench.perform(kind, operation, value);
    persistence.save_current(workbench.structures())?;

    output::action(kind.title(), &line);
    output::detail(&output::items_line(&workbench.items(kind)));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_clear(container: &ServiceContainer, kind: StructureKind) -> CliResult<()> {
    let persistence = container.persistence();
    let mut workbench = WorkbenchService::with_structures(persistence.load_current());
    let line = workbench.clear(kind);
    persistence.save_current(workbench.structures())?;
    output::action(kind.title(), &line);
    Ok(())
}

fn cmd_ops(kind: StructureKind) -> CliResult<()> {
    output::header(kind.title());
    for op in kind.capabilities() {
        match complexity::lookup(kind, *op) {
            Some(c) => output::detail(&format!("{:<8} time {:<30} space {}", op, c.time, c.space)),
            None => output::detail(op),
        }
    }
    Ok(())
}

fn cmd_complexity(kind: StructureKind, operation: Option<Operation>) -> CliResult<()> {
    match operation {
        Some(op) => {
            let entry = complexity::lookup(kind, op).ok_or_else(|| {
                CliError::Usage(format!("no complexity entry for {op} on {kind}"))
            })?;
            output::header(&format!("{} {}", kind.title(), op));
            output::detail(&format!("time:  {}", entry.time));
            output::detail(&format!("space: {}", entry.space));
            output::detail(&entry.description);
        }
        None => {
            output::header(kind.title());
            for (op, entry) in complexity::entries(kind) {
                let hidden = if kind.supports(op) { "" } else { " (hidden)" };
                output::info(&format!("{op}{hidden}"));
                output::detail(&format!("time:  {}", entry.time));
                output::detail(&format!("space: {}", entry.space));
                output::detail(&entry.description);
            }
        }
    }
    Ok(())
}

fn cmd_algorithms() -> CliResult<()> {
    for algorithm in Algorithm::ALL {
        let info = algorithm_info(algorithm);
        output::header(&format!("{} ({})", info.name, algorithm));
        output::detail(&format!("time:  {}", info.time));
        output::detail(&format!("space: {}", info.space));
        output::detail(&info.description);
    }
    Ok(())
}

#[instrument(skip(container))]
async fn cmd_sort(
    container: &ServiceContainer,
    algorithm: Algorithm,
    speed: Option<u32>,
    size: Option<usize>,
    values: Option<Vec<u32>>,
) -> CliResult<()> {
    let mut playback = container.playback();
    if let Some(speed) = speed {
        playback.set_speed(Speed::new(speed));
    }
    let mut visualizer = match values {
        Some(values) if values.is_empty() => {
            return Err(CliError::InvalidArgs("--values must not be empty".into()))
        }
        Some(values) => Visualizer::with_values(values),
        None => Visualizer::random(size.unwrap_or(container.settings.array_size))?,
    };

    let info = algorithm_info(algorithm);
    output::header(&format!(
        "{} on {} values at {}% speed",
        info.name,
        visualizer.array().len(),
        playback.speed().percent()
    ));

    let active = visualizer.start(algorithm)?;
    let cancel = active.cancel.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let outcome = playback
        .play(active.run, &active.cancel, |step| output::redraw_step(step))
        .await;
    ctrl_c.abort();
    println!();

    match &outcome {
        PlaybackOutcome::Completed { steps, .. } => {
            output::success(&format!("Sorted in {steps} steps"));
        }
        PlaybackOutcome::Cancelled { steps, .. } => {
            output::warning(&format!("Cancelled after {steps} steps"));
        }
    }
    visualizer.finish(&outcome);
    output::detail(&format!(
        "comparisons: {}  swaps: {}",
        visualizer.comparisons(),
        visualizer.swaps()
    ));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_session(container: &ServiceContainer, command: SessionCommands) -> CliResult<()> {
    let persistence = container.persistence();
    match command {
        SessionCommands::Save { name } => {
            let summary = persistence.save_session(&name, &persistence.load_current())?;
            output::success(&format!(
                "Saved session '{}' at {}",
                summary.name,
                summary.timestamp.to_rfc3339()
            ));
        }
        SessionCommands::Load { name } => {
            let structures = persistence.load_session(&name)?;
            persistence.save_current(&structures)?;
            output::success(&format!("Loaded session '{}'", name.trim()));
        }
        SessionCommands::Delete { name } => {
            if persistence.delete_session(&name)? {
                output::success(&format!("Deleted session '{}'", name.trim()));
            } else {
                output::warning(&format!("No session named '{}'", name.trim()));
            }
        }
        SessionCommands::List => {
            let sessions = persistence.list_sessions()?;
            if sessions.is_empty() {
                output::info("No saved sessions");
            }
            for s in sessions {
                output::info(&format!(
                    "{:<24} {}",
                    s.name,
                    s.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
                ));
            }
        }
    }
    Ok(())
}

#[instrument(skip(container))]
async fn cmd_ask(
    container: &ServiceContainer,
    structure: Option<StructureKind>,
    algorithm: Option<Algorithm>,
    question: &str,
) -> CliResult<()> {
    let mut tutor = container.tutor();
    let context = match (structure, algorithm) {
        (Some(kind), _) => {
            let structures = container.persistence().load_current();
            let state = serde_json::to_value(SavedState::capture(&structures))
                .ok()
                .and_then(|v| v.get(kind.key()).cloned());
            TutorContext::DataStructure {
                name: kind.title().to_string(),
                operation: None,
                state,
            }
        }
        (None, Some(algorithm)) => TutorContext::algorithm(algorithm_info(algorithm).name),
        (None, None) => TutorContext::General,
    };
    tutor.set_context(context);

    let reply = tutor.send(question).await?;
    output::info(&reply);
    print_quick_actions(&tutor);
    Ok(())
}

fn print_quick_actions(tutor: &TutorService) {
    let actions = tutor.context().quick_actions();
    if actions.is_empty() {
        return;
    }
    output::header("Try asking");
    for action in actions {
        output::detail(&action);
    }
}

#[instrument(skip(container))]
async fn cmd_tutor(container: &ServiceContainer, command: TutorCommands) -> CliResult<()> {
    let tutor = container.tutor();
    let reply = match command {
        TutorCommands::Explain {
            kind,
            operation,
            context,
        } => {
            tutor
                .explain_operation(kind.title(), operation.name(), context.as_deref())
                .await?
        }
        TutorCommands::Hint { kind, problem } => {
            tutor.hint(kind.title(), &problem.join(" ")).await?
        }
        TutorCommands::Why { algorithm } => {
            let info = algorithm_info(algorithm);
            tutor.explain_complexity(info.name, info.time).await?
        }
        TutorCommands::Review { topic, answer } => {
            tutor.review_answer(&topic, &answer.join(" ")).await?
        }
        TutorCommands::Practice { kind, difficulty } => {
            tutor.practice_problem(kind.title(), difficulty).await?
        }
    };
    output::info(&reply);
    Ok(())
}

fn cmd_config(
    container: &ServiceContainer,
    config_file: Option<PathBuf>,
    command: ConfigCommands,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => match config_file {
            Some(path) => {
                let state = if path.exists() { "" } else { " (not present)" };
                output::info(&format!("{}{}", path.display(), state));
            }
            None => output::warning("no config directory available"),
        },
    }
    Ok(())
}
