use anyhow::Context;
use clap::{Parser, Subcommand};
use digitpad::{input, DigitPad, PadConfig, DEFAULT_ENDPOINT};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "digitpad", version, about = "Replay pointer scripts on a digit pad and ask an endpoint what was drawn")]
struct Cli {
    /// Prediction endpoint
    #[arg(long, global = true, env = "DIGITPAD_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
    /// Override the User-Agent header
    #[arg(long, global = true)]
    user_agent: Option<String>,
    /// Extra request header, NAME:VALUE (repeatable)
    #[arg(long = "header", global = true)]
    headers: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a script and write the canvas as PNG
    Render {
        #[arg(long)]
        script: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Replay a script, submit the canvas once and print the result
    Predict {
        #[arg(long)]
        script: PathBuf,
        /// Also write the submitted canvas here
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replay a script and print the data URL that would be submitted
    DataUrl {
        #[arg(long)]
        script: PathBuf,
    },
}

fn build_config(cli: &Cli) -> anyhow::Result<PadConfig> {
    let mut config = PadConfig {
        endpoint: cli.endpoint.clone(),
        ..Default::default()
    };
    if let Some(ua) = &cli.user_agent {
        config.user_agent = ua.clone();
    }
    for raw in &cli.headers {
        config.push_header(raw)?;
    }
    config.validate()?;
    Ok(config)
}

#[cfg(feature = "remote")]
fn build_pad(config: PadConfig) -> anyhow::Result<DigitPad> {
    Ok(DigitPad::from_config(config)?)
}

#[cfg(not(feature = "remote"))]
fn build_pad(_config: PadConfig) -> anyhow::Result<DigitPad> {
    Ok(DigitPad::with_predictor(digitpad::predict::Unavailable))
}

/// Fresh pad with the script applied and any scripted submissions settled
fn replay(pad: &mut DigitPad, script: &Path) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(script)
        .with_context(|| format!("read script {}", script.display()))?;
    let steps = input::parse_script(&json)?;
    let tickets = pad.replay(&steps);
    if !tickets.is_empty() {
        info!("waiting for {} scripted submission(s)", tickets.len());
        pad.wait_idle();
    }
    info!(
        "replayed {} step(s), {} stroke pixel(s), fingerprint {}",
        steps.len(),
        pad.canvas().stroke_pixel_count(),
        pad.canvas().fingerprint()
    );
    Ok(())
}

fn write_png(pad: &DigitPad, out: &Path) -> anyhow::Result<()> {
    let payload = pad.export_image()?;
    std::fs::write(out, &payload.png_data)
        .with_context(|| format!("write {}", out.display()))?;
    info!("wrote {} ({} bytes)", out.display(), payload.png_data.len());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let mut pad = build_pad(config)?;

    match &cli.command {
        Commands::Render { script, out } => {
            replay(&mut pad, script)?;
            write_png(&pad, out)?;
        }
        Commands::Predict { script, out } => {
            replay(&mut pad, script)?;
            if let Some(out) = out {
                write_png(&pad, out)?;
            }
            let outcome = pad.submit_blocking();
            if let Some(line) = outcome.display_line() {
                println!("{}", line);
            }
            if outcome.error().is_some() {
                std::process::exit(1);
            }
        }
        Commands::DataUrl { script } => {
            replay(&mut pad, script)?;
            println!("{}", pad.export_image()?.to_data_url());
        }
    }
    Ok(())
}
