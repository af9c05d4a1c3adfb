mod note;
mod parser;
mod player;
mod scale;
mod synth;

use clap::Parser;
use std::io;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use player::{Playback, Timing};
use scale::{Mode, Scale};
use synth::ToneOutput;

#[derive(Parser, Debug)]
#[command(
    name = "scaletone",
    about = "Play the notes of a major or minor scale as sine tones"
)]
#[command(version)]
#[command(after_help = "For sharps, use # (e.g. \"C#\" for C sharp)\n\
                        For flats, use b (e.g. \"Bb\" for B flat)")]
struct Cli {
    /// Root key: a letter A-G, optionally followed by # or b
    #[arg(value_parser = parser::parse_key)]
    key: String,

    /// Scale mode
    #[arg(value_enum)]
    mode: Mode,

    /// How long each note sounds, in milliseconds
    #[arg(long, default_value_t = player::DEFAULT_ON_MS,
          value_parser = clap::value_parser!(u64).range(1..))]
    on_ms: u64,

    /// Silence between notes, in milliseconds
    #[arg(long, default_value_t = player::DEFAULT_OFF_MS)]
    off_ms: u64,

    /// Output level as a fraction of full scale
    #[arg(long, default_value_t = synth::DEFAULT_VOLUME, value_parser = parser::parse_volume)]
    volume: f64,
}

impl Cli {
    fn timing(&self) -> Timing {
        Timing {
            on: Duration::from_millis(self.on_ms),
            off: Duration::from_millis(self.off_ms),
        }
    }
}

/// Help and version requests exit cleanly, every other argument error exits 1
fn exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() { 1 } else { 0 }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        process::exit(exit_code(&e));
    });

    let scale = Scale::build(&cli.key, cli.mode);

    let (interrupt_tx, interrupt_rx) = mpsc::channel();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = interrupt_tx.send(());
    }) {
        eprintln!("Failed to install interrupt handler: {}", e);
        process::exit(1);
    }

    let mut output = ToneOutput::open(cli.volume).unwrap_or_else(|e| {
        eprintln!("Audio error: {}", e);
        process::exit(1);
    });

    println!("Playing {} {} scale", scale.root(), scale.mode());
    println!();

    match player::play_scale(&scale, &mut output, cli.timing(), &interrupt_rx, &mut io::stdout()) {
        Ok(Playback::Completed) => output.close(),
        Ok(Playback::Interrupted) => {
            output.close();
            println!("\nReceived interrupt, stopping playback");
        }
        Err(e) => {
            eprintln!("Playback error: {}", e);
            process::exit(1);
        }
    }
}
