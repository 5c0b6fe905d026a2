//! oxide-schema CLI
//!
//! Command-line front end for flavor parsing, DDL rendering and schema
//! diffing over JSON schema snapshots.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_schema_core::charset::CharsetCatalog;
use oxide_schema_core::diff::{NextAutoIncMode, PartitioningMode, StatementModifiers};
use oxide_schema_core::flavor::Flavor;
use oxide_schema_core::model::{ObjectPattern, ObjectType, Routine, Schema};
use oxide_schema_core::server_error::{classify_statement_error, ErrorCategory};

/// Flavor-aware DDL rendering and schema diffing for MySQL and MariaDB.
#[derive(Parser)]
#[command(name = "oxide-schema")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Target server flavor, e.g. `mysql:8.0.36` or `mariadb:10.11`.
    #[arg(short, long, env = "OXIDE_SCHEMA_FLAVOR", default_value = "mysql:8.0")]
    flavor: Flavor,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the support status and capabilities of the target flavor.
    Flavor,

    /// Identify a flavor from the server's version variables.
    Identify {
        /// Value of `@@version`.
        version: String,

        /// Value of `@@version_comment`.
        #[arg(default_value = "")]
        comment: String,
    },

    /// List the character sets of the target flavor.
    Charsets,

    /// Print the canonical DDL of a schema snapshot.
    Render {
        /// JSON schema snapshot.
        schema: PathBuf,
    },

    /// Print the DDL turning one schema snapshot into another.
    Diff {
        /// Current schema snapshot.
        from: PathBuf,

        /// Desired schema snapshot.
        to: PathBuf,

        #[command(flatten)]
        options: DiffOptions,
    },

    /// Classify a server error code.
    Classify {
        /// Numeric error code.
        code: u16,

        /// Statement that raised the error.
        #[arg(short, long)]
        statement: Option<String>,
    },
}

#[derive(clap::Args, Default)]
struct DiffOptions {
    /// Allow statements that can lose data.
    #[arg(long)]
    allow_unsafe: bool,

    /// Ignore column order changes.
    #[arg(long)]
    lax_column_order: bool,

    /// Skip tables using DDL that cannot be diffed instead of failing.
    #[arg(long)]
    skip_unsupported: bool,

    /// Remove integer display widths from both snapshots before diffing.
    #[arg(long)]
    strip_display_widths: bool,

    /// When to emit AUTO_INCREMENT changes.
    #[arg(long, value_enum, default_value_t = AutoIncArg::Ignore)]
    next_auto_inc: AutoIncArg,

    /// How to treat partitioning differences.
    #[arg(long, value_enum, default_value_t = PartitioningArg::Keep)]
    partitioning: PartitioningArg,

    /// Exclude objects matching `type:regex`, e.g. `table:^_tmp`.
    #[arg(short = 'x', long = "exclude")]
    exclude: Vec<String>,
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum AutoIncArg {
    #[default]
    Ignore,
    IfIncreased,
    IfAlready,
    Always,
}

impl From<AutoIncArg> for NextAutoIncMode {
    fn from(arg: AutoIncArg) -> Self {
        match arg {
            AutoIncArg::Ignore => Self::Ignore,
            AutoIncArg::IfIncreased => Self::IfIncreased,
            AutoIncArg::IfAlready => Self::IfAlready,
            AutoIncArg::Always => Self::Always,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum PartitioningArg {
    #[default]
    Keep,
    Remove,
}

impl From<PartitioningArg> for PartitioningMode {
    fn from(arg: PartitioningArg) -> Self {
        match arg {
            PartitioningArg::Keep => Self::Keep,
            PartitioningArg::Remove => Self::Remove,
        }
    }
}

impl DiffOptions {
    fn modifiers(&self, flavor: Flavor) -> StatementModifiers {
        StatementModifiers {
            allow_unsafe: self.allow_unsafe,
            lax_column_order: self.lax_column_order,
            next_auto_inc: self.next_auto_inc.into(),
            partitioning: self.partitioning.into(),
            skip_unsupported: self.skip_unsupported,
            ..StatementModifiers::for_flavor(flavor)
        }
    }

    fn patterns(&self) -> anyhow::Result<Vec<ObjectPattern>> {
        self.exclude.iter().map(|s| parse_exclude(s)).collect()
    }
}

fn parse_exclude(arg: &str) -> anyhow::Result<ObjectPattern> {
    let Some((kind, pattern)) = arg.split_once(':') else {
        bail!("exclude pattern {arg:?} must look like type:regex");
    };
    let Some(object_type) = ObjectType::from_name(kind) else {
        bail!("unknown object type {kind:?} in exclude pattern");
    };
    ObjectPattern::new(object_type, pattern)
        .with_context(|| format!("invalid regex in exclude pattern {arg:?}"))
}

/// Reads a snapshot and recomputes which tables cannot be diffed.
fn load_schema(path: &Path, flavor: Flavor) -> anyhow::Result<Schema> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut schema: Schema =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    for table in &mut schema.tables {
        table.refresh_unsupported_ddl(flavor);
    }
    Ok(schema)
}

fn render_statements(schema: &Schema, flavor: Flavor) -> Vec<String> {
    let mut out = vec![schema.create_statement()];
    out.extend(
        schema
            .tables
            .iter()
            .map(|t| t.generated_create_statement(flavor)),
    );
    out.extend(schema.routines.iter().map(Routine::definition));
    out
}

fn diff_statements(
    from: &Path,
    to: &Path,
    options: &DiffOptions,
    flavor: Flavor,
) -> anyhow::Result<Vec<String>> {
    let mut from = load_schema(from, flavor)?;
    let mut to = load_schema(to, flavor)?;

    let patterns = options.patterns()?;
    let excluded = from.strip_matches(&patterns) + to.strip_matches(&patterns);
    if excluded > 0 {
        info!("Excluded {excluded} object(s) by pattern.");
    }
    if options.strip_display_widths {
        from.strip_int_display_widths(flavor);
        to.strip_int_display_widths(flavor);
    }

    let diff = from.diff(&to);
    let mods = options.modifiers(flavor);
    if mods.skip_unsupported {
        for key in diff.unsupported_keys() {
            warn!("Skipping {key}: uses DDL that cannot be diffed.");
        }
    }
    Ok(diff.statements(&mods)?)
}

fn print_statements(statements: &[String]) {
    for stmt in statements {
        println!("{stmt};");
    }
}

fn describe_category(category: Option<ErrorCategory>) -> String {
    category.map_or_else(
        || "unclassified".to_string(),
        |c| {
            if c.is_transient() {
                format!("{c} (transient)")
            } else {
                c.to_string()
            }
        },
    )
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let flavor = cli.flavor;
    match cli.command {
        Commands::Flavor => {
            let level = flavor.supported();
            println!("{flavor}");
            println!("{:-<60}", "");
            println!("  {}", flavor.support_explanation());
            println!("  usable:               {}", level.is_usable());
            println!("  generated columns:    {}", flavor.generated_columns());
            println!("  check constraints:    {}", flavor.has_check_constraints());
            println!("  invisible indexes:    {}", flavor.has_invisible_indexes());
            println!("  int display widths:   {}", !flavor.omit_int_display_width());
            println!("  sorted foreign keys:  {}", flavor.sorted_foreign_keys());
            println!("  always show COLLATE:  {}", flavor.always_show_collate());
            println!(
                "  utf8mb4 collation:    {}",
                flavor.default_utf8mb4_collation()
            );
        }

        Commands::Identify { version, comment } => {
            let identified = Flavor::identify(&version, &comment);
            if !identified.known() {
                warn!("Could not determine the vendor of {version:?}.");
            }
            println!("{identified}");
        }

        Commands::Charsets => {
            let view = CharsetCatalog::global().view(flavor);
            println!("{:<12} {:<28} {}", "CHARSET", "DEFAULT COLLATION", "MAXLEN");
            println!("{:-<48}", "");
            for cs in view.iter() {
                println!(
                    "{:<12} {:<28} {}",
                    cs.name, cs.default_collation, cs.max_length
                );
            }
        }

        Commands::Render { schema } => {
            let schema = load_schema(&schema, flavor)?;
            for table in schema.tables.iter().filter(|t| t.unsupported_ddl) {
                warn!(
                    "Table {} does not round-trip through the generator.",
                    table.name
                );
            }
            print_statements(&render_statements(&schema, flavor));
        }

        Commands::Diff { from, to, options } => {
            let statements = diff_statements(&from, &to, &options, flavor)?;
            if statements.is_empty() {
                info!("No differences found.");
            }
            print_statements(&statements);
        }

        Commands::Classify { code, statement } => {
            let category = statement.as_deref().map_or_else(
                || ErrorCategory::from_code(code),
                |s| classify_statement_error(code, s),
            );
            println!("{code}: {}", describe_category(category));
        }
    }

    Ok(())
}
