//! Command line entry point.
//!
//! ```sh
//! ontology-agent create --ontology datasets/university.json
//! ontology-agent process --ontology output/my_dynamic_ontology.owl --concept Student
//! ontology-agent process --ontology output/my_dynamic_ontology.owl --query individuals --class Person
//! ontology-agent align --ontology1 a.owl --ontology2 b.owl
//! ontology-agent match --ontology1 a.owl --ontology2 b.owl --output output/match.txt
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use crate::{
    align::{build_aligner, write_report, AlignmentAdapter},
    config::{Config, LoggerSettings, Settings, DEFAULT_CONFIG_PATH},
    logger,
    matching::MatchingAdapter,
    ontology::{OntologyQuery, OntologyService},
    Error, Result,
};

/// File name of the ontology written by `create` when `--output` is absent.
pub const DEFAULT_ONTOLOGY_FILE: &str = "my_dynamic_ontology.owl";
pub const DEFAULT_ALIGNMENT_FILE: &str = "alignment_results.txt";
pub const DEFAULT_MATCH_FILE: &str = "match_results.txt";

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Build an OWL ontology from a JSON definition document
    Create,
    /// Query and reason over an OWL ontology
    Process,
    /// Align the classes of two ontologies
    Align,
    /// Match two ontologies through retrieval and a judge model
    Match,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum QueryKind {
    /// Direct subclasses of `--class`
    Subclasses,
    /// Individuals of `--class`, inferred members included
    Individuals,
}

#[derive(Parser, Debug)]
#[command(name = "ontology-agent", author, version, about, long_about = None)]
pub struct Cli {
    #[arg(value_enum)]
    pub action: Action,

    /// Path to the configuration file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Definition document for `create`, OWL file for `process`
    #[arg(long)]
    pub ontology: Option<PathBuf>,

    /// Source ontology for `align` and `match`
    #[arg(long)]
    pub ontology1: Option<PathBuf>,

    /// Target ontology for `align` and `match`
    #[arg(long)]
    pub ontology2: Option<PathBuf>,

    /// Output file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Class whose inferred superclasses `process` reports
    #[arg(long)]
    pub concept: Option<String>,

    /// Class the `--query` applies to
    #[arg(long)]
    pub class: Option<String>,

    #[arg(long, value_enum)]
    pub query: Option<QueryKind>,
}

impl Cli {
    /// Loads the configuration named by `--config`. Without the flag the
    /// default location is used when it exists, built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// Fails when an explicitly named file is missing or any file is malformed.
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::load(DEFAULT_CONFIG_PATH),
            None => Ok(Config::default()),
        }
    }
}

fn required<'a>(value: Option<&'a PathBuf>, flag: &str, action: Action) -> Result<&'a Path> {
    value
        .map(PathBuf::as_path)
        .ok_or_else(|| Error::Message(format!("`{action:?}` requires --{flag}").to_lowercase()))
}

/// Input paths that do not exist as given are looked up under
/// `general.root_dir`.
fn resolve_input(path: &Path, settings: &Settings) -> PathBuf {
    if path.exists() || path.is_absolute() {
        return path.to_path_buf();
    }
    let candidate = settings.general.root_dir.join(path);
    if candidate.exists() {
        candidate
    } else {
        path.to_path_buf()
    }
}

fn output_path(cli: &Cli, settings: &Settings, default_file: &str) -> PathBuf {
    cli.output
        .clone()
        .unwrap_or_else(|| settings.general.output_dir.join(default_file))
}

/// Executes the requested action.
///
/// # Errors
///
/// Returns the first error met by the action.
pub async fn run(cli: &Cli, settings: &Settings) -> Result<()> {
    let service = OntologyService::from_settings(&settings.creator, &settings.processor);
    match cli.action {
        Action::Create => {
            let definition = required(cli.ontology.as_ref(), "ontology", cli.action)?;
            let destination = output_path(cli, settings, DEFAULT_ONTOLOGY_FILE);
            let created = service
                .create_from_path(&resolve_input(definition, settings), &destination)
                .await?;
            for skipped in created.report.skipped() {
                tracing::warn!(
                    enrichment = %skipped.enrichment,
                    name = skipped.name.as_str(),
                    reason = skipped.reason.as_str(),
                    "enrichment skipped"
                );
            }
            Ok(())
        }
        Action::Process => {
            let source = required(cli.ontology.as_ref(), "ontology", cli.action)?;
            let query = service.open(&resolve_input(source, settings)).await?;
            let report = process_report(cli, &query).await?;
            match &cli.output {
                Some(path) => write_report(path, &report),
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(report.as_bytes())?;
                    stdout.flush()?;
                    Ok(())
                }
            }
        }
        Action::Align => {
            let (source, target) = load_pair(cli, &service, settings).await?;
            let adapter = AlignmentAdapter::new(build_aligner(settings)?, &settings.aligner);
            let alignment = adapter.align(&source, &target).await?;
            let destination = output_path(cli, settings, DEFAULT_ALIGNMENT_FILE);
            alignment.save(&destination)?;
            tracing::info!(
                path = %destination.display(),
                correspondences = alignment.correspondences.len(),
                "alignment saved"
            );
            Ok(())
        }
        Action::Match => {
            let (source, target) = load_pair(cli, &service, settings).await?;
            let adapter = MatchingAdapter::from_settings(settings)?;
            let report = adapter.run(&source, &target).await?;
            let destination = output_path(cli, settings, DEFAULT_MATCH_FILE);
            report.save(&destination)?;
            tracing::info!(path = %destination.display(), "match results saved");
            Ok(())
        }
    }
}

async fn load_pair(
    cli: &Cli,
    service: &OntologyService,
    settings: &Settings,
) -> Result<(crate::ontology::Ontology, crate::ontology::Ontology)> {
    let first = required(cli.ontology1.as_ref(), "ontology1", cli.action)?;
    let second = required(cli.ontology2.as_ref(), "ontology2", cli.action)?;
    let repository = service.repository();
    let source = repository.load(&resolve_input(first, settings)).await?;
    let target = repository.load(&resolve_input(second, settings)).await?;
    Ok((source, target))
}

/// Renders the `process` report: the requested query, the inferred ancestors
/// of `--concept`, or an overview of the ontology.
async fn process_report(cli: &Cli, query: &OntologyQuery) -> Result<String> {
    if let Some(kind) = cli.query {
        let Some(class) = cli.class.as_deref() else {
            return Err(Error::string("--query requires --class"));
        };
        return Ok(match kind {
            QueryKind::Subclasses => {
                format!("subclasses of {class}: {}\n", query.subclasses_of(class)?.join(", "))
            }
            QueryKind::Individuals => format!(
                "individuals of {class}: {}\n",
                query.individuals_of(class).await?.join(", ")
            ),
        });
    }

    if let Some(concept) = cli.concept.as_deref() {
        let ancestors = query.ancestors(concept).await?;
        return Ok(format!("ancestors of {concept}: {}\n", ancestors.join(", ")));
    }

    let mut report = String::new();
    report.push_str(&format!("classes: {}\n", query.classes().join(", ")));
    report.push_str(&format!("object_properties: {}\n", query.object_properties().join(", ")));
    report.push_str(&format!("data_properties: {}\n", query.data_properties().join(", ")));
    report.push_str(&format!(
        "annotation_properties: {}\n",
        query.annotation_properties().join(", ")
    ));
    report.push_str(&format!("consistent: {}\n", query.is_consistent().await?));
    report.push_str(&query.metrics().to_string());
    Ok(report)
}

/// Parses the command line, runs the action on a current-thread runtime and
/// maps the outcome to the process exit code.
#[must_use]
pub fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match cli.load_config().and_then(|config| Settings::from_config(&config)) {
        Ok(settings) => settings,
        Err(err) => {
            let _ = logger::init(&LoggerSettings::default());
            tracing::error!(error = %err, "cannot load configuration");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = logger::init(&settings.logger) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!(error = %err, "cannot start runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(&cli, &settings)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(action = ?cli.action, error = %err, "command failed");
            ExitCode::FAILURE
        }
    }
}
