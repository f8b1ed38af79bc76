//! End-to-end scenarios driven through the public dispatch surface, the way
//! the bus master sees the subsystem: raw command frames in, raw status
//! frames out.

use std::time::Duration;

use acs_common::fault::FaultFlags;
use acs_common::frame::{CMD_ARG, CMD_KIND, CMD_PARAM, FRAME_LEN, RawFrame, Status};
use acs_common::state::{AcsState, CommandKind, FunctionId, FunctionStatus, TransitionStatus};
use acs_control::bus::channel_pair;
use acs_control::dispatch::dispatch;
use acs_control::engine::Acs;
use acs_control::sim::{SimProbe, SimulatedActuator};
use acs_control::thread::ControlThread;

fn acs_with_probes() -> (Acs, SimProbe, SimProbe) {
    let wheel = SimulatedActuator::new("rw-sim", 100);
    let torquer = SimulatedActuator::new("mtqr-sim", 100);
    let (wp, tp) = (wheel.probe(), torquer.probe());
    let acs = Acs::new(Box::new(wheel), Box::new(torquer)).unwrap();
    (acs, wp, tp)
}

fn frame(kind: CommandKind, argument: u8, parameter: u8) -> RawFrame {
    let mut raw = [0u8; FRAME_LEN];
    raw[CMD_KIND] = kind as u8;
    raw[CMD_ARG] = argument;
    raw[CMD_PARAM] = parameter;
    raw
}

#[test]
fn licensed_transition_runs_entry_hook_and_reports_applied() {
    let (mut acs, wheel, torquer) = acs_with_probes();

    let raw = dispatch(
        &mut acs,
        &frame(
            CommandKind::ChangeState,
            AcsState::ReactionWheelActive as u8,
            0,
        ),
    );
    let status = Status::decode(&raw).unwrap();

    assert_eq!(status.current_state, AcsState::ReactionWheelActive);
    assert_eq!(status.previous_state, Some(AcsState::Idle));
    assert_eq!(status.transition_status, TransitionStatus::Applied);
    assert_eq!(status.ping_counter, 1);

    // Entering wheel mode powers the wheel controller; the torquer is
    // untouched.
    assert_eq!(wheel.start_calls(), 1);
    assert!(wheel.is_running());
    assert_eq!(torquer.total_calls(), 0);
}

#[test]
fn unlicensed_function_never_reaches_a_driver() {
    let (mut acs, wheel, torquer) = acs_with_probes();

    // Wheel duty cycle from Idle: no table row licenses it.
    let raw = dispatch(
        &mut acs,
        &frame(
            CommandKind::CallFunction,
            FunctionId::WheelSetDutyCycle as u8,
            40,
        ),
    );
    let status = Status::decode(&raw).unwrap();

    assert_eq!(status.function_status, FunctionStatus::NotLicensed);
    assert_eq!(
        status.last_function_called,
        FunctionId::WheelSetDutyCycle as u8
    );
    assert_eq!(status.current_state, AcsState::Idle);
    assert_eq!(wheel.total_calls() + torquer.total_calls(), 0);
    assert!(acs.faults().contains(FaultFlags::FUNCTION_NOT_LICENSED));
}

#[test]
fn direct_mode_to_mode_transition_rejected_without_side_effects() {
    let (mut acs, wheel, torquer) = acs_with_probes();

    dispatch(
        &mut acs,
        &frame(
            CommandKind::ChangeState,
            AcsState::ReactionWheelActive as u8,
            0,
        ),
    );
    let calls_before = wheel.total_calls();

    // Wheel mode to torquer mode has no edge; it must go through Idle.
    let raw = dispatch(
        &mut acs,
        &frame(
            CommandKind::ChangeState,
            AcsState::MagnetorquerActive as u8,
            0,
        ),
    );
    let status = Status::decode(&raw).unwrap();

    assert_eq!(status.transition_status, TransitionStatus::Rejected);
    assert_eq!(status.current_state, AcsState::ReactionWheelActive);
    assert_eq!(status.previous_state, Some(AcsState::Idle));
    assert!(wheel.is_running());
    assert_eq!(wheel.total_calls(), calls_before);
    assert_eq!(torquer.total_calls(), 0);
    assert!(acs.faults().contains(FaultFlags::INVALID_TRANSITION));
}

#[test]
fn malformed_frame_bumps_only_ping_and_verdict() {
    let (mut acs, ..) = acs_with_probes();

    // Establish a non-trivial status first.
    dispatch(
        &mut acs,
        &frame(
            CommandKind::ChangeState,
            AcsState::ReactionWheelActive as u8,
            0,
        ),
    );
    let before = Status::decode(acs.live_status()).unwrap();

    let mut bad = [0u8; FRAME_LEN];
    bad[CMD_KIND] = 0x7E;
    let after = Status::decode(&dispatch(&mut acs, &bad)).unwrap();

    assert_eq!(
        after,
        Status {
            transition_status: TransitionStatus::Malformed,
            ping_counter: before.ping_counter.wrapping_add(1),
            ..before
        }
    );
    assert!(acs.faults().contains(FaultFlags::MALFORMED_COMMAND));
}

#[test]
fn full_mission_sequence_through_both_actuator_modes() {
    let (mut acs, wheel, torquer) = acs_with_probes();

    let script = [
        frame(
            CommandKind::ChangeState,
            AcsState::ReactionWheelActive as u8,
            0,
        ),
        frame(
            CommandKind::CallFunction,
            FunctionId::WheelStart as u8,
            0,
        ),
        frame(
            CommandKind::CallFunction,
            FunctionId::WheelSetDutyCycle as u8,
            70,
        ),
        frame(CommandKind::ChangeState, AcsState::Idle as u8, 0),
        frame(
            CommandKind::ChangeState,
            AcsState::MagnetorquerActive as u8,
            0,
        ),
        frame(
            CommandKind::CallFunction,
            FunctionId::TorquerSetDutyCycle as u8,
            25,
        ),
        frame(CommandKind::ChangeState, AcsState::Idle as u8, 0),
    ];

    let mut last = [0u8; FRAME_LEN];
    for cmd in &script {
        last = dispatch(&mut acs, cmd);
    }
    let status = Status::decode(&last).unwrap();

    assert_eq!(status.current_state, AcsState::Idle);
    assert_eq!(status.previous_state, Some(AcsState::MagnetorquerActive));
    assert_eq!(status.ping_counter, script.len() as u8);

    // Leaving a mode powers its actuator down.
    assert!(!wheel.is_running());
    assert!(!torquer.is_running());
    assert_eq!(wheel.duty(), 0);
    assert_eq!(torquer.duty(), 0);
    assert!(acs.faults().is_empty());
}

#[test]
fn control_thread_round_trips_frames_over_the_bus() {
    let (acs, wheel, _torquer) = acs_with_probes();
    let (bus, master) = channel_pair(Duration::from_millis(5));
    let mut thread = ControlThread::new(acs, bus);

    let handle = std::thread::spawn(move || {
        thread.run();
        thread.into_acs()
    });

    let timeout = Duration::from_secs(1);
    let status = Status::decode(
        &master
            .transact(
                frame(
                    CommandKind::ChangeState,
                    AcsState::ReactionWheelActive as u8,
                    0,
                ),
                timeout,
            )
            .unwrap(),
    )
    .unwrap();
    assert_eq!(status.current_state, AcsState::ReactionWheelActive);

    let status = Status::decode(
        &master
            .transact(
                frame(
                    CommandKind::CallFunction,
                    FunctionId::WheelSetDutyCycle as u8,
                    45,
                ),
                timeout,
            )
            .unwrap(),
    )
    .unwrap();
    assert_eq!(status.function_status, FunctionStatus::Completed);
    assert_eq!(wheel.duty(), 45);

    drop(master);
    let acs = handle.join().unwrap();
    assert_eq!(acs.current_state(), AcsState::ReactionWheelActive);
}
