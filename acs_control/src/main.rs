//! # ACS Control Binary
//!
//! Boots the attitude-control FSM core against simulated actuator drivers
//! and an in-process bus. Without `--exercise` it idles on a once-a-second
//! NoOp heartbeat until ctrl-c; with `--exercise` it plays a scripted
//! command sequence (mode changes, duty-cycle calls, a deliberately
//! malformed frame) and exits, logging every status frame.
//!
//! The real field-bus transport and actuator peripherals are external
//! collaborators; this binary wires their in-process stand-ins.

use std::path::PathBuf;
use std::process;
use std::sync::atomic::Ordering;
use std::thread as std_thread;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use acs_common::config::AcsConfig;
use acs_common::frame::{CMD_ARG, CMD_KIND, CMD_PARAM, FRAME_LEN, RawFrame, Status};
use acs_common::state::{AcsState, CommandKind, FunctionId};
use acs_control::bus::{channel_pair, BusMaster};
use acs_control::engine::Acs;
use acs_control::sim::SimulatedActuator;
use acs_control::thread::ControlThread;

/// ACS Control — guarded FSM core for the attitude-control subsystem
#[derive(Parser, Debug)]
#[command(name = "acs_control")]
#[command(version)]
#[command(about = "Attitude-control FSM core with simulated actuators and bus")]
struct Args {
    /// Path to the subsystem configuration TOML.
    #[arg(long, default_value = "config/acs.toml")]
    config: PathBuf,

    /// Play the scripted command sequence once and exit.
    #[arg(long)]
    exercise: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("ACS control v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("ACS control shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args.config)?;
    info!(
        "Config OK: node_id=0x{:02X}, wheel_duty_limit={}%, torquer_duty_limit={}%",
        config.node_id, config.wheel_duty_limit, config.torquer_duty_limit,
    );

    let wheel = SimulatedActuator::new("rw-sim", config.wheel_duty_limit);
    let torquer = SimulatedActuator::new("mtqr-sim", config.torquer_duty_limit);
    let acs = Acs::new(Box::new(wheel), Box::new(torquer))?;

    let (bus, master) = channel_pair(Duration::from_millis(config.recv_poll_ms));
    let mut thread = ControlThread::new(acs, bus);

    let running = thread.running_flag();
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let handle = std_thread::spawn(move || {
        thread.run();
        thread.into_acs()
    });

    if args.exercise {
        run_exercise(&master);
        running.store(false, Ordering::SeqCst);
    } else {
        heartbeat_until_shutdown(&master, &running);
    }

    drop(master);
    match handle.join() {
        Ok(acs) => info!(state = ?acs.current_state(), faults = ?acs.faults(), "final ACS state"),
        Err(_) => warn!("control thread panicked"),
    }
    Ok(())
}

/// Missing config file falls back to flight defaults; a present-but-broken
/// file is fatal.
fn load_config(path: &PathBuf) -> Result<AcsConfig, Box<dyn std::error::Error>> {
    if path.exists() {
        Ok(AcsConfig::load(path)?)
    } else {
        warn!(
            "No config at {}; using flight defaults",
            path.display()
        );
        Ok(AcsConfig::default())
    }
}

/// Scripted bus-master sequence exercising every dispatch path.
fn run_exercise(master: &BusMaster) {
    let script: &[(&str, RawFrame)] = &[
        ("noop heartbeat", command(CommandKind::NoOp as u8, 0, 0)),
        (
            "enter reaction-wheel mode",
            command(
                CommandKind::ChangeState as u8,
                AcsState::ReactionWheelActive as u8,
                0,
            ),
        ),
        (
            "wheel duty 60%",
            command(
                CommandKind::CallFunction as u8,
                FunctionId::WheelSetDutyCycle as u8,
                60,
            ),
        ),
        (
            "illegal: wheel -> torquer directly",
            command(
                CommandKind::ChangeState as u8,
                AcsState::MagnetorquerActive as u8,
                0,
            ),
        ),
        (
            "back to idle",
            command(CommandKind::ChangeState as u8, AcsState::Idle as u8, 0),
        ),
        (
            "enter magnetorquer mode",
            command(
                CommandKind::ChangeState as u8,
                AcsState::MagnetorquerActive as u8,
                0,
            ),
        ),
        (
            "torquer duty 35%",
            command(
                CommandKind::CallFunction as u8,
                FunctionId::TorquerSetDutyCycle as u8,
                35,
            ),
        ),
        (
            "illegal: wheel function under torquer mode",
            command(
                CommandKind::CallFunction as u8,
                FunctionId::WheelSetDutyCycle as u8,
                10,
            ),
        ),
        ("malformed kind byte", command(0xFF, 0, 0)),
        (
            "back to idle",
            command(CommandKind::ChangeState as u8, AcsState::Idle as u8, 0),
        ),
    ];

    for (label, frame) in script {
        match master.transact(*frame, Duration::from_secs(1)) {
            Ok(raw) => match Status::decode(&raw) {
                Ok(status) => info!(?status, "{label}"),
                Err(e) => warn!(error = %e, "{label}: undecodable status"),
            },
            Err(e) => {
                warn!(error = %e, "{label}: no status from control thread");
                return;
            }
        }
    }
}

/// Once-a-second liveness heartbeat until ctrl-c.
fn heartbeat_until_shutdown(
    master: &BusMaster,
    running: &std::sync::atomic::AtomicBool,
) {
    info!("Idling on NoOp heartbeat; ctrl-c to stop");
    while running.load(Ordering::SeqCst) {
        match master.transact(
            command(CommandKind::NoOp as u8, 0, 0),
            Duration::from_secs(1),
        ) {
            Ok(raw) => {
                if let Ok(status) = Status::decode(&raw) {
                    info!(
                        ping = status.ping_counter,
                        state = ?status.current_state,
                        "heartbeat"
                    );
                }
            }
            Err(e) => {
                warn!(error = %e, "heartbeat failed");
                break;
            }
        }
        std_thread::sleep(Duration::from_secs(1));
    }
}

fn command(kind: u8, argument: u8, parameter: u8) -> RawFrame {
    let mut raw = [0u8; FRAME_LEN];
    raw[CMD_KIND] = kind;
    raw[CMD_ARG] = argument;
    raw[CMD_PARAM] = parameter;
    raw
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
