use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use sve_core::schema::{self, PROPS, PropKind};
use sve_core::{Shortcut, Shortcuts, StoreOpts, TimeFormat, Validation};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "sve-cli",
    about = "List and edit shortcuts.vdf files",
    version
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List shortcuts as a table or as JSON
    List(ListArgs),
    /// Print the raw key/value tree of a file
    Dump(DumpArgs),
    /// Edit one property, or merge a JSON document, and write the file back
    Edit(EditArgs),
    /// Check a key/value pair against the property schema
    Validate(ValidateArgs),
    /// Find shortcuts.vdf files below a directory
    Find(FindArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum TimeArg {
    Raw,
    Utc,
    Local,
    Iso,
}

impl From<TimeArg> for TimeFormat {
    fn from(t: TimeArg) -> Self {
        match t {
            TimeArg::Raw => TimeFormat::Raw,
            TimeArg::Utc => TimeFormat::Utc,
            TimeArg::Local => TimeFormat::Local,
            TimeArg::Iso => TimeFormat::Iso,
        }
    }
}

#[derive(ClapArgs, Debug)]
struct ListArgs {
    /// shortcuts.vdf, or a directory containing it
    path: PathBuf,
    /// Print a JSON array instead of a table (ignores the table options)
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Table column separator
    #[arg(long, default_value = " ")]
    separator: String,
    /// Prefix each value with its key
    #[arg(long, default_value_t = false)]
    keys: bool,
    /// Comma separated columns to show
    #[arg(long, value_delimiter = ',', default_values_t = ["app_id".to_string(), "app_name".to_string()])]
    columns: Vec<String>,
    /// Show every column
    #[arg(long, default_value_t = false)]
    all: bool,
    /// How to render last_play_time
    #[arg(long, value_enum, default_value_t = TimeArg::Raw)]
    time: TimeArg,
}

#[derive(ClapArgs, Debug)]
struct DumpArgs {
    /// shortcuts.vdf, or a directory containing it
    path: PathBuf,
}

#[derive(ClapArgs, Debug)]
struct EditArgs {
    /// Input shortcuts.vdf (or directory). Without it, editing starts from an
    /// empty list and --out is required.
    path: Option<PathBuf>,
    /// JSON array of entries to merge (ignores --idx/--key/--val). Entries
    /// whose index is missing are appended after the highest index, so an
    /// export from another file can collapse onto fewer records.
    #[arg(long, value_name = "JSON")]
    json_path: Option<PathBuf>,
    /// Index of the entry to edit. A missing entry is appended at the end
    /// of the list instead.
    #[arg(long, requires_all = ["key", "val"])]
    idx: Option<u32>,
    /// Property to change on entry --idx
    #[arg(long, requires_all = ["idx", "val"])]
    key: Option<String>,
    /// New value for --key
    #[arg(long, requires_all = ["idx", "key"])]
    val: Option<String>,
    /// Output file; defaults to the input file
    #[arg(long)]
    out: Option<PathBuf>,
    /// Overwrite the destination if it exists
    #[arg(long, default_value_t = false)]
    force: bool,
    /// Skip the zip backup of an overwritten file
    #[arg(long, default_value_t = false)]
    no_backup: bool,
}

#[derive(ClapArgs, Debug)]
struct ValidateArgs {
    key: String,
    value: String,
}

#[derive(ClapArgs, Debug)]
struct FindArgs {
    /// Directory to search, e.g. the client's userdata folder
    root: PathBuf,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,sve_core=info,sve_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::List(a) => cmd_list(a),
        Cmd::Dump(a) => cmd_dump(a),
        Cmd::Edit(a) => cmd_edit(a),
        Cmd::Validate(a) => cmd_validate(a),
        Cmd::Find(a) => cmd_find(a),
    }
}

fn load(path: &Path) -> Shortcuts {
    let res = sve_core::resolve_shortcuts_path(path).and_then(|p| Shortcuts::parse(&p));
    res.unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(2);
    })
}

fn cmd_list(args: ListArgs) {
    let scs = load(&args.path);
    if args.json {
        println!("{}", sve_core::json::to_json_string(&scs, true));
        return;
    }
    for c in &args.columns {
        if schema::lookup(c).is_none() {
            eprintln!("unknown column: {}", c);
            std::process::exit(3);
        }
    }
    let mut columns = Vec::new();
    for p in PROPS.iter() {
        if args.all || args.columns.iter().any(|c| schema::canonical(c) == p.name) {
            columns.push(p);
        }
    }
    scs.foreach(|sc| {
        let cells: Vec<String> = columns
            .iter()
            .map(|p| {
                let val = cell(sc, p.name, p.kind, args.time.into());
                if args.keys {
                    format!("{} = {}", p.name, val)
                } else {
                    val
                }
            })
            .collect();
        println!("{}", cells.join(&args.separator));
        true
    });
}

fn cell(sc: &Shortcut, name: &str, kind: PropKind, time: TimeFormat) -> String {
    if name == "last_play_time" && time != TimeFormat::Raw {
        return format!("\"{}\"", sc.format_last_played(time));
    }
    let v = sc.prop_to_string(name).unwrap_or_default();
    match kind {
        PropKind::Text => format!("\"{}\"", v),
        PropKind::UInt32 | PropKind::TextArray => v,
    }
}

fn cmd_dump(args: DumpArgs) {
    let res = sve_core::resolve_shortcuts_path(&args.path).and_then(|p| {
        let data = std::fs::read(&p)?;
        Ok(sve_core::vdf::decode(&data)?)
    });
    match res {
        Ok(tree) => print!("{}", tree.pretty()),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    }
}

fn cmd_edit(args: EditArgs) {
    let input = args.path.as_deref().map(|p| {
        sve_core::resolve_shortcuts_path(p).unwrap_or_else(|e| {
            eprintln!("error: {}", e);
            std::process::exit(2);
        })
    });
    let Some(dest) = args.out.clone().or_else(|| input.clone()) else {
        eprintln!("error: missing input path or --out");
        std::process::exit(2);
    };
    let mut scs = match &input {
        Some(p) => load(p),
        None => Shortcuts::empty(),
    };

    if let Some(jpath) = &args.json_path {
        match scs.update_from_json_file(jpath) {
            Ok(n) => tracing::info!(count = n, "merged JSON entries"),
            Err(e) => {
                eprintln!("error: JSON input is invalid: {}", e);
                std::process::exit(3);
            }
        }
    } else if let (Some(idx), Some(key), Some(val)) = (args.idx, &args.key, &args.val) {
        match sve_core::apply_edit(&mut scs, idx, key, val) {
            Ok(true) => eprintln!("created new entry"),
            Ok(false) => {}
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(3);
            }
        }
    } else {
        eprintln!("error: missing --json-path or --idx + --key + --val");
        std::process::exit(3);
    }

    // Editing in place implies overwrite.
    let force = args.force || (args.out.is_none() && input.is_some());
    let opts = StoreOpts {
        force,
        backup: !args.no_backup,
    };
    match sve_core::store_with(&scs, &dest, &opts) {
        Ok(Some(backup)) => eprintln!("backup written to {}", backup.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("error writing: {}", e);
            std::process::exit(4);
        }
    }
    println!("{}", dest.display());
}

fn cmd_validate(args: ValidateArgs) {
    match sve_core::is_prop_valid(&args.key, &args.value) {
        Validation::Ok => println!("ok"),
        Validation::InvalidKey => {
            eprintln!("invalid key: {}", args.key);
            std::process::exit(3);
        }
        Validation::InvalidValue => {
            eprintln!("invalid value for {}: {:?}", args.key, args.value);
            std::process::exit(3);
        }
        Validation::InvalidArrayValue => {
            eprintln!(
                "invalid value for {}: expected a JSON array of strings like [\"a\",\"b\"]",
                args.key
            );
            std::process::exit(3);
        }
    }
}

fn cmd_find(args: FindArgs) {
    for p in sve_core::find_shortcuts_files(&args.root) {
        println!("{}", p.display());
    }
}
