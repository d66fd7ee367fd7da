//! sealdrop: offline tools for relay containers
//!
//! Commands:
//!   encrypt <FILE> <KEY>   - wrap a raw file in an encrypted container
//!   decrypt <FILE> <KEY>   - recover the payload of a stored container
//!   inspect <FILE>         - show what a stored container looks like from outside
//!   keygen                 - print a fresh access key
//!   config show            - display the active configuration
//!
//! Containers are written to `-o <OUT>` or stdout; human-readable notes go
//! to stderr so output can be piped.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

use sealdrop_core::{FormatVersion, RelayConfig};
use sealdrop_crypto::AccessKey;
use sealdrop_format::{PlainFile, ReaderRegistry, StoredFile};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "sealdrop",
    version,
    about = "sealdrop container tools",
    long_about = "sealdrop: encrypt, decrypt and inspect relay containers without a running relay"
)]
struct Cli {
    /// Path to sealdrop.toml configuration file
    #[arg(long, short = 'c', env = "SEALDROP_CONFIG", default_value = "/etc/sealdrop/config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a raw file into a container
    Encrypt {
        /// File to read
        file: PathBuf,
        /// Access key (any string; `sealdrop keygen` makes a random one)
        key: String,
        /// Output path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
        /// Container version (default: storage.writer from config)
        #[arg(long)]
        format: Option<FormatVersion>,
    },

    /// Decrypt a stored container and write its payload
    ///
    /// Unencrypted containers are accepted too; their payload is written as-is.
    Decrypt {
        /// Container to read
        file: PathBuf,
        /// Access key given at upload time
        key: String,
        /// Output path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Show version, encryption state and (if visible) metadata of a container
    Inspect {
        /// Container to read
        file: PathBuf,
    },

    /// Print a fresh random access key
    Keygen,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = sealdrop_core::load_config(&cli.config)
        .with_context(|| format!("loading config: {}", cli.config.display()))?;

    match cli.command {
        Commands::Encrypt { file, key, output, format } => {
            let version = format.unwrap_or(config.storage.writer);
            cmd_encrypt(&file, &key, version, output.as_deref())
        }
        Commands::Decrypt { file, key, output } => {
            cmd_decrypt(&config, &file, &key, output.as_deref())
        }
        Commands::Inspect { file } => cmd_inspect(&config, &file),
        Commands::Keygen => {
            println!("{}", AccessKey::generate().expose());
            Ok(())
        }
        Commands::Config { action: ConfigAction::Show } => cmd_config_show(&config, &cli.config),
    }
}

/// Warnings and errors to stderr; `RUST_LOG` raises verbosity.
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, bytes)
            .with_context(|| format!("writing output: {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("writing to stdout")?;
            stdout.flush().context("flushing stdout")
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Raw file → encrypted container bytes.
fn seal_file(path: &Path, key: &str, version: FormatVersion) -> Result<Vec<u8>> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file = PlainFile::new(version, data, display_name(path));
    let sealed = file
        .encrypt(AccessKey::from_encoded(key).as_bytes())
        .context("encrypting container")?;
    Ok(sealed.to_bytes())
}

/// Parse a container file with the configured readers.
fn read_container(registry: &ReaderRegistry, path: &Path) -> Result<StoredFile> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = display_name(path);
    registry
        .read(&name, &bytes)
        .with_context(|| format!("parsing container: {}", path.display()))?
        .with_context(|| {
            format!(
                "{} is not a container any configured reader recognizes",
                path.display()
            )
        })
}

// ── `sealdrop encrypt` ────────────────────────────────────────────────────────

fn cmd_encrypt(
    file: &Path,
    key: &str,
    version: FormatVersion,
    output: Option<&Path>,
) -> Result<()> {
    let bytes = seal_file(file, key, version)?;
    write_output(output, &bytes)?;
    eprintln!("encrypted {} as {version} ({} bytes)", file.display(), bytes.len());
    Ok(())
}

// ── `sealdrop decrypt` ────────────────────────────────────────────────────────

fn cmd_decrypt(config: &RelayConfig, file: &Path, key: &str, output: Option<&Path>) -> Result<()> {
    let registry = ReaderRegistry::new(&config.storage.readers);
    let stored = read_container(&registry, file)?;
    let plain = stored
        .into_plain(AccessKey::from_encoded(key).as_bytes())
        .map_err(|e| {
            if e.is_decryption() {
                anyhow::anyhow!("wrong key or corrupted container")
            } else {
                anyhow::anyhow!("decrypting container: {e}")
            }
        })?;

    write_output(output, plain.payload())?;
    eprintln!(
        "filename: {}\nmime type: {}\nsize: {} bytes",
        plain.filename(),
        plain.mime_type(),
        plain.payload().len()
    );
    Ok(())
}

// ── `sealdrop inspect` ────────────────────────────────────────────────────────

fn describe(stored: &StoredFile) -> String {
    let mut lines = vec![
        format!("version:   {}", stored.version()),
        format!("encrypted: {}", stored.is_encrypted()),
    ];
    match stored {
        StoredFile::Plain(file) => {
            lines.push(format!("filename:  {}", file.filename()));
            lines.push(format!("mime type: {}", file.mime_type()));
            lines.push(format!("size:      {} bytes", file.payload().len()));
        }
        StoredFile::Sealed(file) => {
            lines.push(format!("bundle:    {} bytes", file.bundle().len()));
        }
    }
    lines.join("\n")
}

fn cmd_inspect(config: &RelayConfig, file: &Path) -> Result<()> {
    let registry = ReaderRegistry::new(&config.storage.readers);
    let stored = read_container(&registry, file)?;
    println!("{}", describe(&stored));
    Ok(())
}

// ── `sealdrop config show` ────────────────────────────────────────────────────

fn cmd_config_show(config: &RelayConfig, config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("# Configuration from: {}", config_path.display());
    } else {
        println!("# Configuration: defaults (no file at {})", config_path.display());
    }
    println!();
    let rendered = toml::to_string_pretty(config).context("serializing config to TOML")?;
    print!("{rendered}");
    Ok(())
}
