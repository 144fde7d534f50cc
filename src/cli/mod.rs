/*
* Bridge Command Line Interface
* -----------------------------
* openshift-mcp-bridge
* ├── serve [--host] [--port]        run the HTTP bridge
* ├── init [--force]                 write config/default.toml
* ├── vm create --name --namespace   one-off VirtualMachine creation
* └── job launch --template [--extra-vars JSON]
*
* The one-off commands run the same workflows the HTTP handlers use, so they
* double as a smoke test of cluster and controller access.
*/

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::core::{
    AapClient, JobLaunchRequest, JobLauncher, KubeResourceClient, VirtualMachineRequest,
    VmProvisioner,
};

#[derive(Parser)]
#[command(name = "openshift-mcp-bridge")]
#[command(version)]
#[command(about = "Bridge AI agents to OpenShift Virtualization and Ansible Automation Platform", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding default.toml / local.toml
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Generate default configuration
    Init {
        #[arg(short, long)]
        force: bool,
    },
    /// Manage virtual machines
    Vm {
        #[command(subcommand)]
        command: VmCommands,
    },
    /// Launch AAP job templates
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
}

#[derive(Subcommand)]
pub enum VmCommands {
    /// Create a VirtualMachine (not started)
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short = 's', long, default_value = "default")]
        namespace: String,
    },
}

#[derive(Subcommand)]
pub enum JobCommands {
    /// Launch a job template by name
    Launch {
        #[arg(short, long)]
        template: String,
        /// JSON object passed as extra_vars
        #[arg(short, long)]
        extra_vars: Option<String>,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_dir = cli.config.clone().unwrap_or_else(|| {
        PathBuf::from(std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string()))
    });

    match cli.command {
        Commands::Init { force } => handle_init_command(&config_dir, force)?,
        Commands::Serve { host, port } => {
            let mut settings = load_settings(&config_dir)?;
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            info!("Starting server on {}:{}", settings.server.host, settings.server.port);
            let state = crate::api::AppState::from_settings(&settings).await?;
            crate::api::serve(settings, state).await?;
        }
        Commands::Vm { command } => handle_vm_command(command, &load_settings(&config_dir)?).await?,
        Commands::Job { command } => handle_job_command(command, &load_settings(&config_dir)?).await?,
    }

    Ok(())
}

fn load_settings(config_dir: &Path) -> anyhow::Result<Settings> {
    Settings::load(&config_dir.to_string_lossy(), None).context("failed to load configuration")
}

async fn handle_vm_command(command: VmCommands, settings: &Settings) -> anyhow::Result<()> {
    let cluster = KubeResourceClient::discover(&settings.cluster).await?;
    let provisioner = VmProvisioner::new(Arc::new(cluster));

    match command {
        VmCommands::Create { name, namespace } => {
            let request = VirtualMachineRequest { vm_name: name, namespace };
            match provisioner.create(&request).await {
                Ok(created) => println!("{} {}", "✓".green(), created.message()),
                Err(e) => {
                    println!("{} {}", "✗".red(), e);
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}

async fn handle_job_command(command: JobCommands, settings: &Settings) -> anyhow::Result<()> {
    let client = AapClient::new(&settings.automation)?;
    let launcher = JobLauncher::new(settings.automation.clone(), Arc::new(client));

    match command {
        JobCommands::Launch { template, extra_vars } => {
            let extra_vars = parse_extra_vars(extra_vars.as_deref())?;
            let request = JobLaunchRequest { job_template_name: template, extra_vars };
            match launcher.launch(&request).await {
                Ok(launched) => {
                    println!("{} {}", "✓".green(), launched.message());
                    match launched.job_id {
                        Some(id) => println!("  job id: {}", id.to_string().bold()),
                        None => println!("  job id: {}", "unknown".yellow()),
                    }
                    println!("  url:    {}", launched.aap_url);
                }
                Err(e) => {
                    println!("{} {}", "✗".red(), e);
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}

fn parse_extra_vars(raw: Option<&str>) -> anyhow::Result<Map<String, Value>> {
    let Some(raw) = raw else {
        return Ok(Map::new());
    };
    match serde_json::from_str::<Value>(raw).context("--extra-vars is not valid JSON")? {
        Value::Object(vars) => Ok(vars),
        other => anyhow::bail!("--extra-vars must be a JSON object, got {}", other),
    }
}

fn handle_init_command(config_dir: &Path, force: bool) -> anyhow::Result<()> {
    let target = config_dir.join("default.toml");
    if target.exists() && !force {
        println!(
            "{} {} already exists. Use --force to overwrite.",
            "!".yellow(),
            target.display()
        );
        return Ok(());
    }

    std::fs::create_dir_all(config_dir)?;
    let default_config = crate::config::generate_default_config();
    let config_str = toml::to_string_pretty(&default_config)?;
    std::fs::write(&target, config_str)?;

    println!("{} Default configuration written to {}", "✓".green(), target.display());
    Ok(())
}
