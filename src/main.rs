//! CLI entry point for cellsmith

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process;

use cellsmith::{
    CallDescriptor, Document, OutputConfig, RewriteConfig, SourceConfig,
    batch::Operation,
    collect_inputs,
    file_utils::{self, SourceKind},
    print_json, print_reports, rename_module, rewrite_document, rewrite_files,
    snippets::load_menu,
};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "cellsmith")]
#[command(about = "Rewrite notebook cells: import aliases, method calls, menu snippets")]
#[command(version)]
struct Cli {
    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto", global = true)]
    color: ColorMode,

    /// Maximum size of files to read (default: 1MB)
    /// Use suffixes: K, M, G (e.g., 5M for 5MB)
    #[arg(long = "max-file-size", value_name = "SIZE", global = true)]
    max_file_size: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the name a module is imported under
    Alias(AliasArgs),
    /// Rewrite `.FROM(args)` method calls into `.TO(args, extra...)`
    Rewrite(RewriteArgs),
    /// Point the first `FROM(...)` call at an uploaded file
    InjectFilename(InjectArgs),
    /// Rename a module to its alias inside menu snippets
    Snippets(SnippetArgs),
}

#[derive(Args, Debug)]
struct AliasArgs {
    /// Module to look for
    #[arg(short, long)]
    module: String,

    /// Notebook or source file (default: stdin)
    path: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RewriteArgs {
    /// Method name to replace
    #[arg(long = "from", value_name = "METHOD")]
    from: String,

    /// Method name to write instead
    #[arg(long = "to", value_name = "METHOD")]
    to: String,

    /// Argument appended to each rewritten call (can be used multiple times)
    #[arg(short = 'a', long = "arg", value_name = "ARG")]
    args: Vec<String>,

    /// Keep each original line above its rewrite as a comment
    #[arg(short = 'c', long = "comment")]
    comment: bool,

    #[command(flatten)]
    target: TargetArgs,

    /// Output the per-file report as JSON
    #[arg(long = "json")]
    json: bool,

    /// List files without changes in the report
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Include hidden and .gitignore'd files when walking directories
    #[arg(long = "all")]
    all: bool,

    /// Descend only N levels into directories
    #[arg(short = 'L', long = "level")]
    level: Option<usize>,

    /// Number of parallel workers
    /// (0 = auto-detect, 1 = sequential, N = use N workers)
    #[arg(short = 'j', long = "jobs", default_value = "0")]
    jobs: usize,

    /// Notebooks, source files or directories (default: stdin)
    paths: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct TargetArgs {
    /// Only edit the cell at this index (0-based, counting all cells)
    #[arg(long = "cell", value_name = "N")]
    cell: Option<usize>,

    /// Write changes back to the files instead of printing
    #[arg(short = 'i', long = "in-place")]
    in_place: bool,
}

#[derive(Args, Debug)]
struct InjectArgs {
    /// Upload call to replace, e.g. ginsim.upload
    #[arg(long = "from", value_name = "CALL")]
    from: String,

    /// Call that opens the file, e.g. ginsim.open
    #[arg(long = "to", value_name = "CALL")]
    to: String,

    /// Name of the uploaded file
    #[arg(long = "filename", value_name = "FILE")]
    filename: String,

    #[command(flatten)]
    target: TargetArgs,

    /// Notebook or source file (default: stdin)
    path: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SnippetArgs {
    /// Canonical module name used in the snippets
    #[arg(short, long)]
    module: String,

    /// Alias to substitute
    #[arg(long = "alias", conflicts_with = "detect_from", required_unless_present = "detect_from")]
    alias: Option<String>,

    /// Detect the alias from the imports of this notebook or source file
    #[arg(long = "detect-from", value_name = "PATH")]
    detect_from: Option<PathBuf>,

    /// Menu declaration (JSON)
    menu: PathBuf,
}

/// Print an error and exit with status 1.
fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("cellsmith: {}", message);
    process::exit(1);
}

fn is_stdin(path: Option<&Path>) -> bool {
    path.is_none_or(|p| p == Path::new("-"))
}

/// Open a document, reading plain source from stdin when no path is given.
fn open_document(path: Option<&Path>) -> Document {
    match path.filter(|p| !is_stdin(Some(*p))) {
        Some(path) => Document::open(path).unwrap_or_else(|e| fail(e)),
        None => {
            let mut content = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut content) {
                fail(format!("cannot read stdin: {}", e));
            }
            Document::parse(&content, SourceKind::Script).unwrap_or_else(|e| fail(e))
        }
    }
}

fn run_alias(args: &AliasArgs) {
    let doc = open_document(args.path.as_deref());
    println!("{}", doc.detect_import(&args.module));
}

/// Rewrite one document and print it, or write it back with `--in-place`.
fn rewrite_single(path: Option<&Path>, operation: &Operation, target: &TargetArgs) {
    if target.in_place && is_stdin(path) {
        fail("--in-place needs a file path, not stdin");
    }

    let mut doc = open_document(path);
    let changes =
        rewrite_document(&mut doc, operation, target.cell).unwrap_or_else(|e| fail(e));

    match path {
        Some(path) if target.in_place => {
            if !changes.is_empty() {
                doc.save(path).unwrap_or_else(|e| fail(e));
            }
        }
        _ => {
            let rendered = doc.render().unwrap_or_else(|e| fail(e));
            print!("{}", rendered);
        }
    }
}

fn run_rewrite(args: &RewriteArgs, use_color: bool) {
    let descriptor = CallDescriptor::new(&args.from, &args.to)
        .with_args(args.args.iter().cloned())
        .commented(args.comment);
    let operation = Operation::Call(descriptor);

    if args.json && (args.paths.is_empty() || args.paths.iter().any(|p| is_stdin(Some(p)))) {
        fail("--json needs file paths, not stdin");
    }

    // A single file (or stdin) without --in-place/--json prints the rewritten text
    let single = match args.paths.as_slice() {
        [] => Some(None),
        [path] if !args.json && !args.target.in_place && !path.is_dir() => {
            Some(Some(path.as_path()))
        }
        _ => None,
    };
    if let Some(path) = single {
        rewrite_single(path, &operation, &args.target);
        return;
    }

    let source_config = SourceConfig {
        show_all: args.all,
        max_depth: args.level,
    };
    let files = collect_inputs(&args.paths, &source_config).unwrap_or_else(|e| fail(e));
    if files.is_empty() {
        eprintln!("cellsmith: warning: no notebooks or Python files found");
    }

    let config = RewriteConfig {
        operation,
        cell: args.target.cell,
        in_place: args.target.in_place,
        parallel_workers: args.jobs,
    };
    let reports = rewrite_files(&files, &config);

    let result = if args.json {
        print_json(&reports)
    } else {
        let output_config = OutputConfig {
            use_color,
            show_unchanged: args.verbose,
        };
        print_reports(&reports, &output_config)
    };
    if let Err(e) = result {
        fail(format!("error writing output: {}", e));
    }

    if reports.iter().any(|r| r.is_error()) {
        process::exit(1);
    }
}

fn run_inject(args: &InjectArgs) {
    let operation = Operation::InjectFilename {
        original: args.from.clone(),
        destination: args.to.clone(),
        filename: args.filename.clone(),
    };
    rewrite_single(args.path.as_deref(), &operation, &args.target);
}

fn run_snippets(args: &SnippetArgs) {
    let alias = match (&args.alias, &args.detect_from) {
        (Some(alias), _) => alias.clone(),
        (None, Some(path)) => open_document(Some(path)).detect_import(&args.module),
        (None, None) => args.module.clone(),
    };

    let mut menu = load_menu(&args.menu).unwrap_or_else(|e| fail(e));
    rename_module(menu.items_mut(), &args.module, &alias);

    if let Err(e) = print_json(&menu) {
        fail(format!("error writing output: {}", e));
    }
}

fn main() {
    let cli = Cli::parse();

    if let Some(ref size_str) = cli.max_file_size {
        match file_utils::parse_file_size(size_str) {
            Ok(size) => file_utils::set_max_file_size(size),
            Err(e) => fail(format!("invalid --max-file-size '{}': {}", size_str, e)),
        }
    }

    let use_color = should_use_color(cli.color);

    match &cli.command {
        Command::Alias(args) => run_alias(args),
        Command::Rewrite(args) => run_rewrite(args, use_color),
        Command::InjectFilename(args) => run_inject(args),
        Command::Snippets(args) => run_snippets(args),
    }
}
