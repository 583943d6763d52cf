use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use clap::Parser;

use satrig_lib::adapters::console::KEY_HELP;
use satrig_lib::adapters::{
    ConfigLoader, ConsoleDisplay, GpredictConfig, GpredictLoader, Ic821hRadio, LoaderConfig,
    MockRadio, Sgp4Ephemeris, SerialPortFactory, StdinCommands,
};
use satrig_lib::control::ControlLoop;
use satrig_lib::domain::{RigConfig, SatrigResult};
use satrig_lib::engine::Engine;
use satrig_lib::ports::SerialFactory;
use satrig_lib::rig::Rig;

#[derive(Parser)]
#[command(name = "satrig")]
#[command(about = "Doppler-tracking satellite rig control for the IC-821H")]
struct Cli {
    /// Station configuration file (JSON)
    #[arg(short, long, default_value = "satrig.json")]
    config: PathBuf,
    /// Read station and satellites from a Gpredict directory
    /// (e.g. ~/.config/Gpredict) instead of the configuration file
    #[arg(short, long, value_name = "DIR")]
    gpredict: Option<PathBuf>,
    /// Serial port of the radio, overrides the configuration file
    #[arg(short, long)]
    port: Option<String>,
    /// Serial baud rate, overrides the configuration file
    #[arg(short, long)]
    baud: Option<u32>,
    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.list_ports {
        return list_ports();
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn list_ports() -> ExitCode {
    match SerialPortFactory::list_ports() {
        Ok(ports) => {
            for port in ports {
                println!("{}\t{}", port.name, port.port_type);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> SatrigResult<()> {
    let mut config = match cli.gpredict {
        Some(gpredict_dir) => GpredictLoader::new(GpredictConfig { gpredict_dir }).load()?,
        None => ConfigLoader::new(LoaderConfig { path: cli.config }).load()?,
    };
    if let Some(port) = cli.port {
        config.rig.port = port;
    }
    if let Some(baud) = cli.baud {
        config.rig.baud_rate = baud;
    }
    let satellites = ConfigLoader::satellites(&config)?;

    let mut rig = open_rig(&config.rig);
    rig.init();

    let engine = Engine::new(satellites, &rig)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    spawn_interrupt_listener(Arc::clone(&shutdown));

    println!("{KEY_HELP}");
    let mut control = ControlLoop::new(
        engine,
        rig,
        Box::new(Sgp4Ephemeris::new()),
        Box::new(StdinCommands::spawn()),
        Box::new(ConsoleDisplay::stdout()),
        &config.timing,
        shutdown,
    );
    control.run();
    Ok(())
}

/// Real radio, mock radio (MOCK_RADIO=1), or no radio at all
fn open_rig(config: &RigConfig) -> Rig {
    if std::env::var("MOCK_RADIO").is_ok_and(|v| v == "1") {
        log::info!("MOCK_RADIO=1: using simulated radio");
        return Rig::new(Box::new(MockRadio::new()));
    }

    match SerialPortFactory::open(&config.port, config.baud_rate) {
        Ok(serial) => Rig::new(Box::new(Ic821hRadio::over_serial(serial, config.civ_address))),
        Err(e) => {
            log::warn!("{e}; continuing without rig control");
            Rig::disconnected()
        }
    }
}

/// Set `shutdown` on Ctrl-C. The listener runs on its own thread with a
/// single-threaded runtime; the control loop only ever sees the flag.
fn spawn_interrupt_listener(shutdown: Arc<AtomicBool>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                log::warn!("Interrupt handler unavailable: {e}");
                return;
            }
        };
        match runtime.block_on(tokio::signal::ctrl_c()) {
            Ok(()) => {
                log::info!("Interrupted, shutting down");
                shutdown.store(true, Ordering::SeqCst);
            }
            Err(e) => log::warn!("Failed to listen for Ctrl-C: {e}"),
        }
    });
}
