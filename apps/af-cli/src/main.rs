use af_bus::{InMemoryBus, SimVar, VariableBus};
use af_engine::EngineState;
use af_recorder::{FlightDataRecorder, RecorderSettings};
use af_sim::{AircraftModel, ModelOptions};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "af-cli")]
#[command(about = "Autoflight offline scenario driver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the canned cold-start scenario
    ColdStart {
        /// Time step in seconds
        #[arg(long, default_value_t = 1.0 / 30.0)]
        dt: f64,
        /// Scenario duration in seconds
        #[arg(long, default_value_t = 120.0)]
        duration: f64,
        /// Imbalance/oil seed for the session
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Record frames into this directory
        #[arg(long)]
        record: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::ColdStart {
            dt,
            duration,
            seed,
            record,
        } => cmd_cold_start(dt, duration, seed, record),
    }
}

fn cmd_cold_start(dt: f64, duration: f64, seed: u64, record: Option<PathBuf>) -> ExitCode {
    if dt <= 0.0 || duration <= 0.0 {
        println!("dt and duration must be positive");
        return ExitCode::FAILURE;
    }

    println!("Running cold start scenario (dt = {dt:.4} s, duration = {duration:.1} s)");

    let mut model = AircraftModel::new(ModelOptions {
        seed,
        ..ModelOptions::default()
    });
    let mut bus = InMemoryBus::new();
    bus.set(SimVar::SimOnGround, 1.0);
    bus.set(SimVar::AmbientTemperatureDegC, 15.0);
    bus.set(SimVar::AmbientPressureMbar, 1013.25);
    bus.set(SimVar::FuelWeightPerGallonLbs, 6.7);
    bus.set(SimVar::TankLeftQuantityGal, 400.0);
    bus.set(SimVar::TankRightQuantityGal, 400.0);
    bus.set(SimVar::TankLeftAuxQuantityGal, 228.0);
    bus.set(SimVar::TankRightAuxQuantityGal, 228.0);
    bus.set(SimVar::TankLeftCapacityGal, 800.0);
    bus.set(SimVar::TankRightCapacityGal, 800.0);

    // Engine 1 master ON, mode selector to IGN/START
    bus.set(SimVar::EngineIgniter(1), 2.0);
    bus.set(SimVar::EngineStarter(1), 1.0);

    let mut recorder = record.map(|dir| {
        println!("Recording to {}", dir.display());
        FlightDataRecorder::new(dir, RecorderSettings::default())
    });

    let mut t = 0.0;
    let mut host_n2 = 0.0;
    let steps = (duration / dt).ceil() as u64;
    for _ in 0..steps {
        t += dt;
        // Stand-in for the host's own starter spool
        host_n2 += (67.0 - host_n2) * 0.6 * dt + 0.1 * dt;
        bus.set(SimVar::EngineN2(1), host_n2);
        bus.set(SimVar::AnimationDeltaTime, t);

        model.update(&mut bus, dt, t);
        if let Some(recorder) = &mut recorder {
            recorder.record(&model.recorder_frame(&bus, t));
        }
    }
    if let Some(recorder) = &mut recorder {
        recorder.finish();
    }

    let state = match EngineState::from_code(bus.get(SimVar::EngineState(1))) {
        Ok(state) => state,
        Err(err) => {
            println!("model published an invalid engine state: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!("✓ Scenario completed");
    println!("  Engine 1 state: {:?}", state.phase);
    println!("  Engine 1 N2:    {:.2} %", bus.get(SimVar::EngineSimN2(1)));
    println!("  Engine 1 EGT:   {:.1} °C", bus.get(SimVar::EngineEgtDegC(1)));
    println!("  Engine 1 FF:    {:.0} kg/h", bus.get(SimVar::EngineFuelFlowKgh(1)));
    println!("  Fuel left/right: {:.1}/{:.1} gal",
        bus.get(SimVar::TankLeftQuantityGal),
        bus.get(SimVar::TankRightQuantityGal));
    ExitCode::SUCCESS
}
