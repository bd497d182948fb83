use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use atomically_core::config::{self, AtomicallyConfig, CONFIG_FILE_NAME};
use atomically_core::{Atomically, OutputFormat, OutputOptions};

#[derive(Parser)]
#[command(
    name = "atomically",
    about = "Expand x-atomically resource stacks into OpenAPI documents",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an OpenAPI document from an atomic file
    Generate {
        /// Path to the atomic file (YAML or JSON)
        filename: PathBuf,

        /// Output format (defaults to the config file, then yaml)
        #[arg(long)]
        format: Option<Format>,

        /// Emit mapping keys in sorted order
        #[arg(long)]
        sort_keys: bool,

        /// Drop the x-atomically block from the generated document
        #[arg(long)]
        strip_extension: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the schemas and operations each stack expands into
    Inspect {
        /// Path to the atomic file
        filename: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: Format,
    },

    /// Initialize a new atomically configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Yaml => OutputFormat::Yaml,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            filename,
            format,
            sort_keys,
            strip_extension,
            output,
        } => {
            let cfg = try_load_config()?.unwrap_or_default();
            let options = merge_options(cfg.output, format, sort_keys, strip_extension);
            cmd_generate(&filename, &options, output.as_deref())
        }

        Commands::Inspect { filename, format } => cmd_inspect(&filename, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "atomically", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<AtomicallyConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

/// Command-line flags win over the config file.
fn merge_options(
    mut options: OutputOptions,
    format: Option<Format>,
    sort_keys: bool,
    strip_extension: bool,
) -> OutputOptions {
    if let Some(format) = format {
        options.format = format.into();
    }
    options.sort_keys |= sort_keys;
    if strip_extension {
        options.keep_extension = false;
    }
    options
}

fn load(path: &Path) -> Result<Atomically> {
    Atomically::from_file(path).with_context(|| format!("failed to load {}", path.display()))
}

fn render(path: &Path, options: &OutputOptions) -> Result<String> {
    let atomic = load(path)?;
    let document = atomic
        .generate()
        .with_context(|| format!("failed to generate from {}", path.display()))?;
    Ok(document.render(options)?)
}

fn cmd_generate(path: &Path, options: &OutputOptions, output: Option<&Path>) -> Result<()> {
    let rendered = render(path, options)?;
    match output {
        Some(output) => {
            fs::write(output, &rendered)
                .with_context(|| format!("failed to write {}", output.display()))?;
            eprintln!("wrote {}", output.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn cmd_inspect(path: &Path, format: Format) -> Result<()> {
    print!("{}", inspect_summary(path, format)?);
    Ok(())
}

/// Render the per-stack operation plan without generating the document.
fn inspect_summary(path: &Path, format: Format) -> Result<String> {
    let atomic = load(path)?;
    let summary = serde_json::json!({ "stacks": atomic.plan() });

    let rendered = match format {
        Format::Yaml => serde_yaml_ng::to_string(&summary)?,
        Format::Json => serde_json::to_string_pretty(&summary)? + "\n",
    };
    Ok(rendered)
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATOMIC: &str = r##"
openapi: 3.0.3
info:
  title: Pets
  version: 1.0.0
components:
  schemas:
    Pet:
      type: object
x-atomically:
  stacks:
    Pet:
      schema:
        $ref: "#/components/schemas/Pet"
      supported: [read]
"##;

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "atomically",
            "generate",
            "pets.yaml",
            "--format",
            "json",
            "--strip-extension",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                filename,
                format,
                sort_keys,
                strip_extension,
                output,
            } => {
                assert_eq!(filename, PathBuf::from("pets.yaml"));
                assert!(matches!(format, Some(Format::Json)));
                assert!(!sort_keys);
                assert!(strip_extension);
                assert!(output.is_none());
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let options = merge_options(OutputOptions::default(), Some(Format::Json), true, true);
        assert_eq!(options.format, OutputFormat::Json);
        assert!(options.sort_keys);
        assert!(!options.keep_extension);

        let untouched = merge_options(OutputOptions::default(), None, false, false);
        assert_eq!(untouched, OutputOptions::default());
    }

    #[test]
    fn test_generate_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("pets.yaml");
        let output = dir.path().join("openapi.yaml");
        fs::write(&input, ATOMIC).unwrap();

        cmd_generate(&input, &OutputOptions::default(), Some(&output)).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("/pets/{pet_id}"));
        assert!(written.contains("operationId: read_pet"));
        assert!(written.contains("PetItem"));
    }

    #[test]
    fn test_render_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        let err = render(&missing, &OutputOptions::default()).unwrap_err();
        assert!(err.to_string().contains("failed to load"));
    }

    #[test]
    fn test_render_reports_resolve_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.yaml");
        fs::write(
            &input,
            ATOMIC.replace("#/components/schemas/Pet\"", "#/definitions/Pet\""),
        )
        .unwrap();
        let err = render(&input, &OutputOptions::default()).unwrap_err();
        assert!(err.to_string().contains("failed to generate"));
    }

    #[test]
    fn test_inspect_lists_planned_operations() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("pets.yaml");
        fs::write(&input, ATOMIC).unwrap();

        let summary = inspect_summary(&input, Format::Yaml).unwrap();
        assert!(summary.starts_with("stacks:"));
        assert!(summary.contains("read_pet"));
        assert!(summary.contains("/pets/{pet_id}"));
        assert!(summary.contains("PetItem"));
        assert!(!summary.contains("create_pet"));
    }

    #[test]
    fn test_inspect_json_is_parseable() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("pets.yaml");
        fs::write(&input, ATOMIC).unwrap();

        let summary = inspect_summary(&input, Format::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&summary).unwrap();
        let stacks = value["stacks"].as_array().unwrap();
        assert_eq!(stacks.len(), 1);
        assert_eq!(stacks[0]["name"], "Pet");
        let operations = stacks[0]["operations"].as_array().unwrap();
        assert_eq!(operations.len(), 1);
        assert_eq!(operations[0]["operationId"], "read_pet");
    }

    #[test]
    fn test_inspect_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = inspect_summary(&dir.path().join("missing.yaml"), Format::Json).unwrap_err();
        assert!(err.to_string().contains("failed to load"));
    }
}
