//! mongosh-compat - run mongosh-style scripts
//!
//! Evaluates a script file or an `--eval` string in one script session and
//! prints each statement's value in shell style.
//!
//! # Usage
//!
//! ```bash
//! mongosh-compat --uri mongodb://localhost:27017 seed.js
//! mongosh-compat --no-connect --eval "ISODate('2020-01-02T03:04:05Z')"
//! ```

use tracing::{Level, info};

use mongosh_compat::cli::CliInterface;
use mongosh_compat::connection::ConnectionManager;
use mongosh_compat::error::Result;
use mongosh_compat::formatter::Formatter;
use mongosh_compat::helpers::ScriptSession;
use mongosh_compat::host::MongoHost;
use mongosh_compat::script::{ScriptEngine, Value};

/// Application entry point
#[tokio::main]
async fn main() {
    let cli = match CliInterface::new() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    initialize_logging(&cli);

    let formatter = Formatter::from_config(&cli.config().display);
    if let Err(e) = run(&cli, &formatter).await {
        eprintln!("{}", formatter.format_error(&e));
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Load the script
/// 2. Connect (unless `--no-connect`) and start a script session
/// 3. Run the script, stopping at the first failing statement
async fn run(cli: &CliInterface, formatter: &Formatter) -> Result<()> {
    let script = cli.load_script()?;
    let mut manager = setup_connection(cli).await?;

    let host = match &manager {
        Some(manager) => MongoHost::new(manager.get_client()?.clone()),
        None => MongoHost::disconnected(),
    };
    let session = ScriptSession::with_database(host, &cli.get_database());
    let mut engine = ScriptEngine::new(session);

    let result = run_script(cli, formatter, &mut engine, &script);

    if let Some(manager) = manager.as_mut() {
        manager.disconnect().await?;
    }
    result
}

/// Connect to MongoDB unless disabled
async fn setup_connection(cli: &CliInterface) -> Result<Option<ConnectionManager>> {
    if cli.args().no_connect {
        info!("Running without a MongoDB connection");
        return Ok(None);
    }

    info!("Connecting to: {}", cli.get_sanitized_connection_uri());
    let mut manager =
        ConnectionManager::new(cli.get_connection_uri(), cli.config().connection.clone());
    manager.connect().await?;
    Ok(Some(manager))
}

/// Evaluate the script and print statement values
fn run_script(
    cli: &CliInterface,
    formatter: &Formatter,
    engine: &mut ScriptEngine<MongoHost>,
    script: &str,
) -> Result<()> {
    let statements = engine.parse(script)?;

    for statement in &statements {
        let value = engine.execute(statement)?;
        if cli.args().quiet {
            continue;
        }

        match &value {
            Value::Undefined => {}
            Value::Database(name) if statement.selects_database() => {
                println!("switched to db {}", name);
            }
            _ => println!("{}", formatter.format_value(&value)?),
        }
    }

    Ok(())
}

/// Initialize logging system based on verbosity level
///
/// Logs go to stderr so statement values on stdout stay clean.
fn initialize_logging(cli: &CliInterface) {
    let level: Level = cli.config().logging.level.to_tracing_level();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
