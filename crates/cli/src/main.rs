//! GPS baseband cycle-accurate simulator CLI.
//!
//! This binary provides a single entry point for the simulation modes. It performs:
//! 1. **Run:** Generate (or read) an IF stream, clock it through the baseband, and write the
//!    correlation dumps read back over the bus.
//! 2. **IF generation:** Write the 2-bit IF stream of one satellite as `sign mag` lines.

use clap::{Args, Parser, Subcommand};
use std::cell::Cell;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gpsbb_core::common::constants::{CARRIER_NCO_WIDTH, CHIP_RATE_HZ, CODE_NCO_WIDTH};
use gpsbb_core::common::error::SimError;
use gpsbb_core::common::signal::IfSample;
use gpsbb_core::config::{ChannelInit, Config, TimeBaseConfig};
use gpsbb_core::core::units::nco::fcw_for;
use gpsbb_core::sim::dump::{DumpFormat, DumpWriter};
use gpsbb_core::sim::stimulus::{self, IfGenerator, StimulusConfig, TextSamples};
use gpsbb_core::sim::Simulator;

#[derive(Parser, Debug)]
#[command(
    name = "gpsbb",
    author,
    version,
    about = "GPS L1 C/A baseband tracking core simulator",
    long_about = "Clock a synthetic or recorded 2-bit IF stream through a cycle-accurate model of a \
                  GPS tracking core and dump the early/prompt/late correlations.\n\nExamples:\n  \
                  gpsbb run --prn 1 --ms 20 -o corr_dump.txt\n  \
                  gpsbb run --config bb.json --input if.txt --json\n  \
                  gpsbb ifgen --prn 7 --delay 100.5 --dopp 1500 -o if.txt\n\n\
                  Set RUST_LOG (e.g. RUST_LOG=gpsbb_core=debug) for core logging."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Satellite signal options shared by both subcommands.
#[derive(Args, Debug, Clone)]
struct SignalArgs {
    /// Satellite PRN (1..=37).
    #[arg(long, default_value_t = 1)]
    prn: u32,

    /// Code delay in chips.
    #[arg(long, default_value_t = 0.0)]
    delay: f64,

    /// Carrier Doppler in Hz.
    #[arg(long, default_value_t = 0.0)]
    dopp: f64,

    /// IF centre frequency in Hz.
    #[arg(long, default_value_t = 4.092e6)]
    fif: f64,

    /// Sample rate in Hz.
    #[arg(long, default_value_t = 16.368e6)]
    fs: f64,

    /// Duration in milliseconds.
    #[arg(long, default_value_t = 10.0)]
    ms: f64,

    /// C/N0 in dB-Hz.
    #[arg(long, default_value_t = 45.0)]
    cn0: f64,

    /// Noise seed.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Disable the data bit transitions.
    #[arg(long)]
    no_data_bits: bool,
}

impl SignalArgs {
    fn stimulus(&self) -> StimulusConfig {
        StimulusConfig {
            prn: self.prn,
            delay_chips: self.delay,
            doppler_hz: self.dopp,
            if_hz: self.fif,
            sample_rate_hz: self.fs,
            cn0_dbhz: self.cn0,
            seed: self.seed,
            data_bits: !self.no_data_bits,
        }
    }

    fn sample_count(&self) -> usize {
        (self.ms * 1e-3 * self.fs).round().max(0.0) as usize
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the baseband on a generated or recorded IF stream and write correlation dumps.
    Run {
        #[command(flatten)]
        signal: SignalArgs,

        /// JSON configuration; without it channel 0 is programmed for the generated signal.
        #[arg(short, long)]
        config: Option<String>,

        /// Read `sign mag` IF lines from this file instead of generating them.
        #[arg(short, long)]
        input: Option<String>,

        /// Only write records of this channel.
        #[arg(long)]
        channel: Option<usize>,

        /// Write JSON lines instead of columns.
        #[arg(long)]
        json: bool,

        /// Stop after this many records.
        #[arg(long)]
        dumps: Option<u64>,

        /// Output path (default stdout).
        #[arg(short, long)]
        output: Option<String>,

        /// Print statistics to stdout when done.
        #[arg(long)]
        stats: bool,
    },

    /// Write a generated IF stream as `sign mag` lines.
    Ifgen {
        #[command(flatten)]
        signal: SignalArgs,

        /// Output path (default stdout).
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            signal,
            config,
            input,
            channel,
            json,
            dumps,
            output,
            stats,
        } => cmd_run(&RunOptions {
            signal,
            config,
            input,
            channel,
            json,
            dumps,
            output,
            stats,
        }),
        Commands::Ifgen { signal, output } => cmd_ifgen(&signal, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("[!] {e}");
        process::exit(1);
    }
}

#[derive(Debug)]
struct RunOptions {
    signal: SignalArgs,
    config: Option<String>,
    input: Option<String>,
    channel: Option<usize>,
    json: bool,
    dumps: Option<u64>,
    output: Option<String>,
    stats: bool,
}

fn open_output(path: Option<&str>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(File::create(p)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

/// Builds the default run configuration: one channel matched to the generated signal.
fn matched_config(signal: &SignalArgs) -> Config {
    let mut config = Config::default();
    config.system.sample_rate_hz = signal.fs;
    config.system.channel_count = 1;
    config.timebase.tic_divide = TimeBaseConfig::divide_for(0.01, signal.fs);
    config.timebase.accum_divide = TimeBaseConfig::divide_for(0.0009, signal.fs);
    config.channels = vec![ChannelInit {
        prn: signal.prn,
        carrier_fcw: fcw_for(signal.fif + signal.dopp, signal.fs, CARRIER_NCO_WIDTH),
        code_fcw: fcw_for(2.0 * CHIP_RATE_HZ, signal.fs, CODE_NCO_WIDTH),
    }];
    config
}

/// Runs the simulator and streams correlation records to the output.
fn cmd_run(opts: &RunOptions) -> Result<(), SimError> {
    let config = match &opts.config {
        Some(path) => Config::from_file(path)?,
        None => matched_config(&opts.signal),
    };
    if let Some(ch) = opts.channel
        && ch >= config.system.channel_count
    {
        return Err(SimError::NoSuchChannel {
            channel: ch,
            count: config.system.channel_count,
        });
    }

    let format = if opts.json {
        DumpFormat::Json
    } else {
        DumpFormat::Text
    };
    let mut writer = DumpWriter::new(open_output(opts.output.as_deref())?, format);
    let mut sim = Simulator::new(&config)?;

    let limit_reached = Cell::new(false);
    let mut read_error: Option<io::Error> = None;
    let samples: Box<dyn Iterator<Item = IfSample> + '_> = match &opts.input {
        Some(path) => Box::new(
            TextSamples::new(BufReader::new(File::open(path)?))
                .map_while(|s| s.map_err(|e| read_error = Some(e)).ok()),
        ),
        None => Box::new(IfGenerator::new(&opts.signal.stimulus())?.take(opts.signal.sample_count())),
    };

    sim.run(samples.take_while(|_| !limit_reached.get()), |record| {
        if limit_reached.get() || opts.channel.is_some_and(|ch| ch != record.channel) {
            return Ok(());
        }
        writer.write(record)?;
        if opts.dumps.is_some_and(|limit| writer.written() >= limit) {
            limit_reached.set(true);
        }
        Ok(())
    })?;
    if let Some(e) = read_error {
        return Err(e.into());
    }

    let records = writer.written();
    let _ = writer.finish()?;
    info!(records, cycles = sim.baseband.stats.cycles, "run complete");

    if opts.stats {
        sim.baseband.stats.print();
    }
    Ok(())
}

/// Writes the generated IF stream.
fn cmd_ifgen(signal: &SignalArgs, output: Option<&str>) -> Result<(), SimError> {
    let generator = IfGenerator::new(&signal.stimulus())?;
    let mut out = open_output(output)?;
    stimulus::write_text(&mut out, generator.take(signal.sample_count()))?;
    out.flush()?;
    Ok(())
}
