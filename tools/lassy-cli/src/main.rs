use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use lassy_parser::{parse_alpino_file, TypeGrammar};
use lassy_transform::{union_lemmas, Decomposer, Pipeline, PosTagPolicy, TransformConfig};
use rkyv::ser::{serializers::AllocSerializer, Serializer};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Transforms Lassy/Alpino treebank files")]
struct Cli {
    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prune a tree and resolve its coindexation
    Dag {
        file: PathBuf,

        /// Pipeline configuration (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// List the lemmas of one or more files
    Lemmas {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Assign each leaf its part-of-speech type after the pipeline ran
    Types {
        file: PathBuf,

        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Parse a word type and print its canonical form
    Type { expr: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Rkyv,
}

#[derive(Serialize)]
struct TypeEntry {
    lemma: String,
    #[serde(rename = "type")]
    ty: String,
    arity: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Dag {
            file,
            config,
            format,
            output,
        } => dag(&file, config.as_deref(), format, output.as_deref()),
        Command::Lemmas { files } => lemmas(&files),
        Command::Types { file, config } => types(&file, config.as_deref()),
        Command::Type { expr } => parse_type(&expr),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<TransformConfig> {
    let Some(path) = path else {
        return Ok(TransformConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

fn dag(
    file: &Path,
    config: Option<&Path>,
    format: Format,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let pipeline = Pipeline::new(load_config(config)?);
    let tree = parse_alpino_file(file).with_context(|| format!("reading {}", file.display()))?;
    let dag = pipeline.run(&tree)?;
    info!(file = %file.display(), nodes = dag.len(), "resolved tree");

    match (format, output) {
        (Format::Json, None) => println!("{}", serde_json::to_string_pretty(&dag)?),
        (Format::Json, Some(out)) => fs::write(out, serde_json::to_vec_pretty(&dag)?)?,
        (Format::Rkyv, None) => bail!("binary output needs --output"),
        (Format::Rkyv, Some(out)) => {
            let mut serializer = AllocSerializer::<1024>::default();
            serializer
                .serialize_value(&dag)
                .map_err(|e| anyhow::anyhow!("rkyv serialization failed: {e:?}"))?;
            let bytes = serializer.into_serializer().into_inner();
            fs::write(out, &bytes)?;
            info!(path = %out.display(), bytes = bytes.len(), "wrote archive");
        }
    }
    Ok(())
}

fn lemmas(files: &[PathBuf]) -> anyhow::Result<()> {
    let mut trees = Vec::with_capacity(files.len());
    for file in files {
        match parse_alpino_file(file) {
            Ok(tree) => trees.push(tree),
            Err(e) => warn!(file = %file.display(), error = %e, "skipping file"),
        }
    }
    if trees.is_empty() {
        bail!("no file could be read");
    }

    let all: BTreeSet<String> = union_lemmas(&trees);
    info!(files = trees.len(), lemmas = all.len(), "collected lemmas");
    for lemma in all {
        println!("{lemma}");
    }
    Ok(())
}

fn types(file: &Path, config: Option<&Path>) -> anyhow::Result<()> {
    let pipeline = Pipeline::new(load_config(config)?);
    let tree = parse_alpino_file(file).with_context(|| format!("reading {}", file.display()))?;
    let dag = pipeline.run(&tree)?;

    let lexicon = Decomposer::new(PosTagPolicy).decompose(&dag)?;
    let entries: Vec<TypeEntry> = lexicon
        .into_iter()
        .map(|(lemma, ty)| TypeEntry {
            lemma,
            arity: ty.arity(),
            ty: ty.to_string(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn parse_type(expr: &str) -> anyhow::Result<()> {
    let ty = TypeGrammar::default().parse(expr)?;
    println!("{ty}");
    info!(arity = ty.arity(), atoms = ?ty.retrieve_atomic(), "parsed type");
    Ok(())
}
