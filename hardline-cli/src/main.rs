//! Hardline CLI

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hardline_config::{load_config, Config};
use hardline_core::{
    AlgorithmConstraints, AlgorithmIdentifier, CryptoPrimitive, KeyDescriptor, MatchCase,
    PrimitiveSet,
};
use hardline_policy::{policy_from_disabled_algorithms, AlgorithmPolicy};
use hardline_tls::{Rfc7525HandshakeFactory, SessionSummary};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hardline")]
#[command(about = "RFC 7525 hardened TLS handshake configuration", long_about = None)]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a handshake for a host and print what it would offer
    Demo {
        /// Target host
        #[arg(long, default_value = "playframework.com")]
        host: String,

        /// Target port
        #[arg(long, default_value_t = 443)]
        port: u16,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Connect to a host and report what was negotiated
    Connect {
        /// Target host
        host: String,

        /// Target port
        #[arg(long, default_value_t = 443)]
        port: u16,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Evaluate the algorithm constraints for one algorithm and/or key
    Check {
        /// Algorithm identifier, e.g. SHA256withRSA
        #[arg(long)]
        algorithm: Option<String>,

        /// Key algorithm, e.g. RSA or EC
        #[arg(long, requires = "key_bits")]
        key_algorithm: Option<String>,

        /// Key size in bits (RSA modulus length)
        #[arg(long, requires = "key_algorithm")]
        key_bits: Option<u32>,

        /// Primitive the check is made for
        #[arg(long, default_value = "signature")]
        primitive: Vec<CryptoPrimitive>,

        /// Match disabled tokens regardless of case
        #[arg(long)]
        case_insensitive: bool,

        /// JDK-style disabled-algorithm list replacing the baseline
        #[arg(long)]
        disabled_algorithms: Option<String>,
    },

    /// Validate configuration file
    Validate {
        /// Path to configuration file
        #[arg(short, long, default_value = "hardline.yaml")]
        config: PathBuf,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { host, port, config } => {
            let config = load_optional_config(config.as_deref())?;
            init_tracing(
                cli.log_level.as_deref().unwrap_or(&config.logging.level),
                cli.json_logs || config.logging.format == "json",
            )?;

            let factory = Rfc7525HandshakeFactory::from_config(&config)?;
            let handshake = factory.create_handshake(&host, port)?;

            println!("enabledProtocols = {:?}", handshake.enabled_protocols());
            println!("enabledCipherSuites = {:?}", handshake.enabled_cipher_suites());
            println!(
                "endpointIdentification = {}",
                handshake.parameters().endpoint_identification
            );
            println!(
                "useCipherSuitesOrder = {}",
                handshake.parameters().use_cipher_suites_order
            );
            println!("algorithmConstraints = {}", config.policy.build_policy()?);
            Ok(())
        }

        Commands::Connect { host, port, config } => {
            let config = load_optional_config(config.as_deref())?;
            init_tracing(
                cli.log_level.as_deref().unwrap_or(&config.logging.level),
                cli.json_logs || config.logging.format == "json",
            )?;

            let factory = Rfc7525HandshakeFactory::from_config(&config)?;
            let handshake = factory.create_handshake(&host, port)?;
            let stream = handshake
                .connect_tcp()
                .await
                .with_context(|| format!("Handshake with {host}:{port} failed"))?;

            let session = SessionSummary::from_state(stream.get_ref().1);
            println!("protocol = {}", session.protocol.as_deref().unwrap_or("unknown"));
            println!(
                "cipherSuite = {}",
                session.cipher_suite.as_deref().unwrap_or("unknown")
            );
            Ok(())
        }

        Commands::Check {
            algorithm,
            key_algorithm,
            key_bits,
            primitive,
            case_insensitive,
            disabled_algorithms,
        } => {
            init_tracing(cli.log_level.as_deref().unwrap_or("info"), cli.json_logs)?;

            let case = if case_insensitive {
                MatchCase::Insensitive
            } else {
                MatchCase::Sensitive
            };
            let policy = match disabled_algorithms {
                Some(list) => policy_from_disabled_algorithms(&list, case)?,
                None => AlgorithmPolicy::rfc7525_with_digest_match(case),
            };

            let algorithm = algorithm.map(AlgorithmIdentifier::new);
            let key = key_algorithm.map(|name| KeyDescriptor::new(name, key_bits));
            let primitives: PrimitiveSet = primitive.into_iter().collect();

            let permitted = policy.permits(&primitives, algorithm.as_ref(), key.as_ref(), None)?;
            println!("{}", if permitted { "PERMITTED" } else { "REJECTED" });

            if !permitted {
                std::process::exit(2);
            }
            Ok(())
        }

        Commands::Validate { config } => {
            tracing_subscriber::fmt().with_target(false).init();

            tracing::info!("Validating configuration: {}", config.display());

            match load_config(&config) {
                Ok(cfg) => {
                    tracing::info!("✓ Configuration is valid");
                    tracing::info!("  Protocols: {}", cfg.tls.protocols.join(", "));
                    tracing::info!("  Cipher suites: {}", cfg.tls.cipher_suites.len());
                    tracing::info!("  Policy: {}", cfg.policy.build_policy()?);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!("✗ Configuration validation failed: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Version => {
            println!("Hardline");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
            Ok(())
        }
    }
}

fn load_optional_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn init_tracing(level: &str, json: bool) -> Result<()> {
    let filter = match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        other => bail!("Unknown log level: {other}"),
    };

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(filter.into())
        .add_directive("rustls=warn".parse()?);

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(false))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_level(true),
            )
            .init();
    }

    Ok(())
}
