use std::env;
use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::application::ask;
use crate::application::ui::help_text;
use crate::configuration::Config;
use crate::configuration::ConfigKey;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

pub fn log_dir() -> path::PathBuf {
    if let Ok(dir) = env::var("FEELER_LOG_DIR") {
        return path::PathBuf::from(dir);
    }

    return dirs::cache_dir().unwrap_or_default().join("feeler");
}

fn subcommand_ask() -> Command {
    return Command::new("ask")
        .about("Submit a single feeling without the interactive UI, printing progress as it streams in.")
        .arg(
            Arg::new("feeling")
                .help("How you are feeling. Multiple words are joined with spaces.")
                .num_args(1..)
                .required(true),
        );
}

fn subcommand_chat() -> Command {
    return Command::new("chat").about("Start the interactive feeling prompt. This is the default.");
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for Feeler")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running Feeler with environment variable RUST_LOG=feeler")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("HOTKEYS:") {
                return Paint::new(format!("PROMPT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("feeler")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_ask())
        .subcommand(subcommand_chat())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .arg(
            Arg::new(ConfigKey::BackendURL.to_string())
                .short('u')
                .long(ConfigKey::BackendURL.to_string())
                .env("FEELER_BACKEND_URL")
                .num_args(1)
                .help(format!("Base URL of the Feeling Interpreter API. [default: {}]", Config::default(ConfigKey::BackendURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConnectTimeout.to_string())
                .long(ConfigKey::ConnectTimeout.to_string())
                .env("FEELER_CONNECT_TIMEOUT")
                .num_args(1)
                .help(format!("Time to wait in milliseconds for the stream connection to open. 0 disables the timeout. [default: {}]", Config::default(ConfigKey::ConnectTimeout)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::HealthCheckTimeout.to_string())
                .long(ConfigKey::HealthCheckTimeout.to_string())
                .env("FEELER_HEALTH_CHECK_TIMEOUT")
                .num_args(1)
                .help(format!("Time to wait in milliseconds before timing out when health checking the backend at startup. [default: {}]", Config::default(ConfigKey::HealthCheckTimeout)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ReadTimeout.to_string())
                .long(ConfigKey::ReadTimeout.to_string())
                .env("FEELER_READ_TIMEOUT")
                .num_args(1)
                .help(format!("Time to wait in milliseconds for the next stream event before giving up on a submission. 0 disables the timeout. [default: {}]", Config::default(ConfigKey::ReadTimeout)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("FEELER_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true),
        );
}

pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("ask", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
            let feeling = subcmd_matches
                .get_many::<String>("feeling")
                .unwrap_or_default()
                .map(|word| return word.as_str())
                .collect::<Vec<&str>>()
                .join(" ");

            ask::run(&feeling).await?;
            return Ok(false);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(vec![&matches, subcmd_matches]).await?;
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    println!("{}", log_dir().join("debug.log").to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    println!("{}", ConfigKey::VARIANTS.join("\n"));
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("manpages", _)) => {
            clap_mangen::Man::new(build()).render(&mut io::stdout())?;
            return Ok(false);
        }
        _ => {
            Config::load(vec![&matches]).await?;
        }
    }

    return Ok(true);
}
