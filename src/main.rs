use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
mod auth;
use dechest::{Chart, Dechest, Storage, inspect};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "dechest")]
#[command(
    version,
    about = "Pack and unpack authenticated, compressed chart+audio containers."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Packs a chart document and an audio file into a container
    #[command(arg_required_else_help = true)]
    Pack {
        /// Chart document (JSON)
        chart: PathBuf,

        /// Audio file to embed
        audio: PathBuf,

        /// Output container path
        #[arg(short, long)]
        output: PathBuf,

        /// Audio extension tag; defaults to the audio file's own extension
        #[arg(long)]
        ext: Option<String>,
    },

    /// Unpacks a container into its chart document and audio file
    #[command(arg_required_else_help = true)]
    Unpack {
        /// Container file
        input: PathBuf,

        /// Where to write the chart document; defaults to the container path
        /// with a .json extension
        #[arg(long)]
        chart: Option<PathBuf>,

        /// Where to write the audio; defaults to the container path with the
        /// embedded audio extension
        #[arg(long)]
        audio: Option<PathBuf>,
    },

    /// Shows cleartext header information about a container
    #[command(arg_required_else_help = true)]
    Info { input: PathBuf },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    match args.command {
        Commands::Pack {
            chart,
            audio,
            output,
            ext,
        } => {
            let secret = auth::read_secret()?;

            let chart_doc = Chart::from_bytes(
                &std::fs::read(&chart)
                    .with_context(|| format!("failed to read chart '{}'", chart.display()))?,
            )?;
            let audio_bytes = std::fs::read(&audio)
                .with_context(|| format!("failed to read audio '{}'", audio.display()))?;

            let ext = match ext {
                Some(e) => e,
                None => audio
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(str::to_owned)
                    .context("audio file has no extension; pass --ext")?,
            };

            let file = Dechest::new(secret.as_slice()).pack(&chart_doc, &audio_bytes, &ext)?;
            Storage::new(output.clone()).save(&file)?;
            println!("packed chart into '{}'", output.display());
        }

        Commands::Unpack {
            input,
            chart,
            audio,
        } => {
            let secret = auth::read_secret()?;

            let data = Storage::new(input.clone()).load().with_context(|| {
                format!("failed to read container '{}'", input.display())
            })?;
            let payload = Dechest::new(secret.as_slice()).unpack_raw(&data)?;

            // The document travels as opaque bytes; parse once to confirm it
            // is a chart before writing anything.
            Chart::from_bytes(&payload.document)?;

            let chart_path = chart.unwrap_or_else(|| input.with_extension("json"));
            let audio_path = audio.unwrap_or_else(|| input.with_extension(&payload.audio_ext));

            Storage::new(chart_path.clone()).save(&payload.document)?;
            Storage::new(audio_path.clone()).save(&payload.audio)?;

            println!(
                "unpacked chart to '{}', audio to '{}'",
                chart_path.display(),
                audio_path.display()
            );
        }

        Commands::Info { input } => {
            let data = std::fs::read(&input)
                .with_context(|| format!("failed to read container '{}'", input.display()))?;
            let info = inspect(&data)?;

            println!("container  {}", input.display());
            println!(
                "version    {}.{}",
                info.version_major, info.version_minor
            );
            println!("ciphertext {} bytes", info.cipher_len);
            println!("file       {} bytes", data.len());
        }
    }

    Ok(())
}
