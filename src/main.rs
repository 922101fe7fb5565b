use anyhow::{Context, Result as AnyhowResult};
use clap::{CommandFactory, Parser, Subcommand};
use globo_note::app::{CommandId, GlobalFolders};
use globo_note::config::{self, Config};
use globo_note::config_io::{self, DirectoryContext};
use globo_note::host::desktop::DesktopWorkbench;
use globo_note::host::terminal::TerminalDialogs;
use globo_note::host::Host;
use globo_note::model::filesystem::StdFileSystem;
use globo_note::primitives::path_utils::absolutize;
use globo_note::services::state::JsonFileStateStore;
use globo_note::services::{log_dirs, tracing_setup};
use globo_note::view::file_tree::TreeNode;
use std::path::PathBuf;
use std::sync::Arc;

/// Keep a global list of folders and manage the files inside them
#[derive(Parser, Debug)]
#[command(name = "globo-note")]
#[command(about = "Global folders with a file tree and basic file operations", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Path to log file (default: per-process file in the log directory)
    #[arg(long, value_name = "PATH", global = true)]
    log_file: Option<PathBuf>,

    /// Path to the state file holding the folder list
    #[arg(long, value_name = "PATH", global = true)]
    state_file: Option<PathBuf>,

    /// Print the directories used by globo-note and exit
    #[arg(long)]
    show_paths: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the JSON Schema of the configuration and exit
    #[arg(long)]
    dump_config_schema: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered folders
    List,
    /// Print the folder tree
    Tree {
        /// Start below this path instead of at the registered folders
        path: Option<String>,
        /// Levels to expand below the start
        #[arg(long, default_value_t = 1)]
        depth: usize,
    },
    /// Register a folder (prompts when no path is given)
    Add { path: Option<String> },
    /// Unregister a folder
    Remove { path: String },
    /// Create a file in a directory
    NewFile { dir: String },
    /// Create a folder in a directory
    NewFolder { dir: String },
    /// Rename a file or directory
    Rename { path: String },
    /// Delete a file or directory
    Delete { path: String },
    /// Open a file with its default application
    Open { file: String },
    /// Show a path in the OS file browser
    Reveal { path: String },
    /// List command identifiers and titles
    Commands,
}

fn print_paths(dir_context: &DirectoryContext, args: &Args) {
    let state_path = args
        .state_file
        .clone()
        .unwrap_or_else(|| dir_context.state_path());
    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(log_dirs::main_log_path);

    println!("globo-note directories:");
    println!();
    println!("Config:     {}", dir_context.config_dir.display());
    println!("  config.json:  {}", dir_context.config_path().display());
    println!("Data:       {}", dir_context.data_dir.display());
    println!("  state.json:   {}", state_path.display());
    println!("Logs:       {}", log_dirs::log_dir().display());
    println!("  this run:     {}", log_path.display());
}

fn open_state_store(path: PathBuf) -> JsonFileStateStore {
    match JsonFileStateStore::open(path.clone()) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to load state, starting with an empty list: {}", e);
            eprintln!("Warning: {e}; starting with an empty folder list");
            JsonFileStateStore::empty(path)
        }
    }
}

fn init_logging(args: &Args, config: &Config) {
    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(log_dirs::main_log_path);
    log_dirs::cleanup_stale_logs();

    if let Err(e) = tracing_setup::init_global(&log_path, config.log_filter.as_deref()) {
        eprintln!("Warning: logging disabled ({}): {e}", log_path.display());
    }
}

fn print_tree(nodes: &[(usize, TreeNode)]) {
    for (depth, node) in nodes {
        let suffix = if node.kind.is_container() { "/" } else { "" };
        println!("{}{}{}", "  ".repeat(*depth), node.label, suffix);
    }
}

async fn node_for(app: &GlobalFolders, path: &str) -> AnyhowResult<TreeNode> {
    let path = absolutize(path);
    app.tree()
        .node_for_path(app.registry(), &path)
        .await
        .with_context(|| format!("Cannot use {}", path.display()))
}

/// Run a node command, refusing nodes it does not apply to
async fn run_on_path(
    app: &mut GlobalFolders,
    command: CommandId,
    path: &str,
) -> AnyhowResult<bool> {
    let node = node_for(app, path).await?;
    if !command.accepts(Some(&node)) {
        eprintln!(
            "{} does not apply to {} {}",
            command.title(),
            node.kind,
            node.path().display()
        );
        return Ok(false);
    }
    Ok(app.execute(command, Some(&node)).await)
}

async fn run(app: &mut GlobalFolders, command: Command) -> AnyhowResult<bool> {
    match command {
        Command::List => {
            for folder in app.registry().folders() {
                println!("{}\t{}", folder.label, folder.path.display());
            }
            Ok(true)
        }
        Command::Tree { path, depth } => {
            let start = match path {
                Some(path) => Some(node_for(app, &path).await?),
                None => None,
            };
            let nodes = app.tree().walk(app.registry(), start.as_ref(), depth).await;
            print_tree(&nodes);
            Ok(true)
        }
        Command::Add { path } => Ok(app.add_folder(path.as_deref().map(absolutize)).await),
        Command::Remove { path } => {
            let path = absolutize(&path);
            if !app.registry().has_folder(&path) {
                eprintln!("{} is not a registered folder", path.display());
                return Ok(false);
            }
            let node = app.tree().node_for_path(app.registry(), &path).await?;
            Ok(app.execute(CommandId::RemoveFolder, Some(&node)).await)
        }
        Command::NewFile { dir } => run_on_path(app, CommandId::NewFile, &dir).await,
        Command::NewFolder { dir } => run_on_path(app, CommandId::NewFolder, &dir).await,
        Command::Rename { path } => run_on_path(app, CommandId::Rename, &path).await,
        Command::Delete { path } => run_on_path(app, CommandId::Delete, &path).await,
        Command::Open { file } => run_on_path(app, CommandId::OpenFile, &file).await,
        Command::Reveal { path } => run_on_path(app, CommandId::OpenInOs, &path).await,
        Command::Commands => {
            for command in CommandId::ALL {
                println!("{}\t{}", command.id(), command.title());
            }
            Ok(true)
        }
    }
}

fn main() -> AnyhowResult<()> {
    let mut args = Args::parse();

    if args.dump_config_schema {
        let schema = schemars::schema_for!(config::Config);
        println!(
            "{}",
            serde_json::to_string_pretty(&schema).context("Failed to serialize schema")?
        );
        return Ok(());
    }

    let dir_context =
        DirectoryContext::from_system().context("Failed to determine system directories")?;

    if args.show_paths {
        print_paths(&dir_context, &args);
        return Ok(());
    }

    let config = config_io::load_config(&dir_context, args.config.as_deref())
        .context("Failed to load configuration")?;

    if args.dump_config {
        println!(
            "{}",
            serde_json::to_string_pretty(&config).context("Failed to serialize config")?
        );
        return Ok(());
    }

    let Some(command) = args.command.take() else {
        Args::command().print_help()?;
        return Ok(());
    };

    init_logging(&args, &config);

    let state_path = args
        .state_file
        .clone()
        .unwrap_or_else(|| dir_context.state_path());
    let host = Host::new(
        Arc::new(StdFileSystem),
        Arc::new(open_state_store(state_path)),
        Arc::new(TerminalDialogs::stdio()),
        Arc::new(DesktopWorkbench::new()),
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let succeeded = runtime.block_on(async {
        let mut app = GlobalFolders::new(host, config.path_policy(), config.file_ops_options());
        run(&mut app, command).await
    })?;

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
