//! Tessera CLI - inspect the operator registry and run a demo net.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tessera_cli::{demo, inspect};
use tessera_core::DeviceType;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Operator registry and dispatch for inference graphs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered operators and their (device, data type) keys
    Ops {
        /// Only show this operator type
        #[arg(long, value_name = "NAME")]
        op: Option<String>,
    },
    /// Run a two-node Add + RELU net and print the result
    Demo {
        /// Target device type (cpu, gpu, hexagon, hta, apu)
        #[arg(short, long, default_value = "cpu")]
        device: DeviceType,

        /// Fail instead of placing unsupported operators on CPU
        #[arg(long)]
        no_fallback: bool,

        /// Log operator placement and lifecycle
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Demo { verbose: true, .. });
    init_logging(verbose);

    match cli.command {
        Commands::Ops { op } => cmd_ops(op.as_deref())?,
        Commands::Demo {
            device,
            no_fallback,
            ..
        } => cmd_demo(device, !no_fallback)?,
    }

    Ok(())
}

/// `RUST_LOG` overrides the default level.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_ops(op: Option<&str>) -> Result<()> {
    let registry = tessera_operators::global_op_registry();
    print!("{}", inspect::describe_registry(registry, op)?);
    Ok(())
}

fn cmd_demo(device: DeviceType, cpu_fallback: bool) -> Result<()> {
    let registry = tessera_operators::global_op_registry();
    let output = demo::run_demo(registry, device, cpu_fallback)?;

    for (name, device_type) in &output.placements {
        println!("{name:<6} on {device_type}");
    }
    println!("a   = {:?}", demo::DEMO_A);
    println!("b   = {:?}", demo::DEMO_B);
    println!("sum = {:?}", output.sum);
    println!("out = {:?}", output.output);
    Ok(())
}
