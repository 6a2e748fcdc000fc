//! Terminal LED chaser.
//!
//! Renders the LED bar on stdout and reads commands from stdin:
//! `up`, `down`, `interval <ms>`, `status`, `quit`.

use clap::Parser;
use led_chaser::{Chaser, ChaserConfig, OutputPort};
use std::io::{self, BufRead, Write};

#[derive(Parser, Debug)]
#[command(name = "console", about = "Drive a terminal LED chaser from stdin")]
struct Args {
    /// Number of LEDs
    #[arg(short, long, default_value_t = led_chaser::DEFAULT_WIDTH)]
    width: u8,

    /// Step interval in milliseconds
    #[arg(short, long, default_value_t = led_chaser::DEFAULT_INTERVAL_MS)]
    interval: u32,
}

/// Prints the pattern as a bar, output 0 on the right like a register dump.
struct TerminalBar {
    width: u8,
}

impl OutputPort for TerminalBar {
    fn write_pattern(&mut self, pattern: u32) {
        let bar: String = (0..self.width)
            .rev()
            .map(|bit| if pattern & (1 << bit) != 0 { '●' } else { '○' })
            .collect();
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "\r{bar}  ");
        let _ = stdout.flush();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "led_chaser=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = ChaserConfig::builder()
        .width(args.width)
        .interval_ms(args.interval)
        .build()?;

    let mut chaser: Chaser<TerminalBar> =
        Chaser::start(config, TerminalBar { width: args.width })?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("quit"), None) => break,
            (Some("status"), None) => eprint!("\n{}", chaser.telemetry()),
            (Some("interval"), Some(value)) => match chaser.store_interval(value) {
                Ok(ms) => eprintln!("\ninterval set to {ms} ms"),
                Err(err) => eprintln!("\n{err}"),
            },
            _ => {
                if let Err(err) = chaser.write(line.trim().as_bytes()) {
                    eprintln!("\n{err}");
                }
            }
        }
    }

    chaser.stop();
    println!();
    Ok(())
}
