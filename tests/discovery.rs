mod common;

use common::{discovery_on, run_to_completion, uid, BusError, Responder, SimulatedBus};
use dmx_rdm_discovery::consts::UID_ALL;
use dmx_rdm_discovery::dmx_driver::DmxError;
use dmx_rdm_discovery::pids;
use dmx_rdm_discovery::rdm_discovery::DiscoveryState;
use dmx_rdm_discovery::tod::TableOfDevices;
use dmx_rdm_discovery::unique_identifier::PackageAddress;

#[test]
fn test_empty_bus() {
    let mut discovery = discovery_on(SimulatedBus::default());
    let mut tod = TableOfDevices::<200>::new();

    assert!(discovery.full(0, &mut tod));
    run_to_completion(&mut discovery, &mut tod);

    assert!(discovery.is_finished());
    assert!(tod.is_empty());

    let bus = discovery.get_driver();
    assert_eq!(bus.sent.len(), 6);
    assert!(bus.sent[..3]
        .iter()
        .all(|request| request.parameter_id == pids::DISC_UN_MUTE
            && request.destination_uid == PackageAddress::Broadcast));
    assert!(bus.sent[3..]
        .iter()
        .all(|request| request.parameter_id == pids::DISC_UNIQUE_BRANCH));
}

#[test]
fn test_single_responder() {
    let mut discovery = discovery_on(SimulatedBus::with_responders(&[0xAABB_CCDDEEFF]));
    let mut tod = TableOfDevices::<200>::new();

    assert!(discovery.full(0, &mut tod));
    let trace = run_to_completion(&mut discovery, &mut tod);

    assert_eq!(
        trace,
        [
            DiscoveryState::Unmute,
            DiscoveryState::Discovery,
            DiscoveryState::Dub,
            DiscoveryState::QuickFind,
            DiscoveryState::QuickFindDiscovery,
            DiscoveryState::Discovery,
            DiscoveryState::Finished,
            DiscoveryState::Idle,
        ]
    );
    assert!(discovery.is_finished());
    assert_eq!(tod.count(), 1);
    assert_eq!(tod.copy_uid_entry(0), Some(uid(0xAABB_CCDDEEFF)));
}

#[test]
fn test_two_responders_split_once() {
    let mut discovery = discovery_on(SimulatedBus::with_responders(&[
        0xC000_00000002,
        0x1234_00000001,
    ]));
    let mut tod = TableOfDevices::<200>::new();

    assert!(discovery.full(0, &mut tod));
    run_to_completion(&mut discovery, &mut tod);

    // the lower half is searched first
    assert_eq!(tod.as_slice(), &[uid(0x1234_00000001), uid(0xC000_00000002)]);
    // the initial range and both halves of the full range
    assert_eq!(discovery.stack().push_count(), 3);
    assert!(discovery.stack().is_empty());
}

#[test]
fn test_collision_down_to_single_ids() {
    // Their collision never decodes, bisection has to go down to single ids.
    let mut discovery = discovery_on(SimulatedBus::with_responders(&[
        0x1235_00000002,
        0x1235_00000003,
    ]));
    let mut tod = TableOfDevices::<200>::new();

    assert!(discovery.full(0, &mut tod));
    let trace = run_to_completion(&mut discovery, &mut tod);

    assert!(trace.contains(&DiscoveryState::DiscoverySingleDevice));
    assert!(!trace.contains(&DiscoveryState::QuickFind));
    assert_eq!(tod.as_slice(), &[uid(0x1235_00000002), uid(0x1235_00000003)]);
    assert!(discovery.stack().max_depth() <= 49);
}

#[test]
fn test_collision_decoding_to_phantom_uid() {
    // 0001 and 0002 anded on the bus look like a valid response of 0000.
    let mut discovery = discovery_on(SimulatedBus::with_responders(&[
        0x1234_00000001,
        0x1234_00000002,
    ]));
    let mut tod = TableOfDevices::<200>::new();

    assert!(discovery.full(0, &mut tod));
    run_to_completion(&mut discovery, &mut tod);

    assert_eq!(tod.as_slice(), &[uid(0x1234_00000001), uid(0x1234_00000002)]);
    assert!(discovery
        .get_driver()
        .sent_with_pid(pids::DISC_MUTE)
        .any(|request| request.destination_uid == PackageAddress::Device(uid(0x1234_00000000))));
}

#[test]
fn test_device_that_never_mutes() {
    let mut bus = SimulatedBus::with_responders(&[0x4242_00000042]);
    bus.responders[0].acknowledges_mute = false;

    let mut discovery = discovery_on(bus);
    let mut tod = TableOfDevices::<200>::new();

    assert!(discovery.full(0, &mut tod));
    run_to_completion(&mut discovery, &mut tod);

    assert!(discovery.is_finished());
    assert!(tod.is_empty());
}

#[test]
fn test_incremental_removes_silent_devices_first() {
    let mut discovery = discovery_on(SimulatedBus::with_responders(&[
        0x2222_00000002,
        0x3333_00000003,
    ]));
    let mut tod = TableOfDevices::<200>::new();
    tod.add_uid(uid(0x1111_00000001));
    tod.add_uid(uid(0x2222_00000002));

    assert!(discovery.incremental(0, &mut tod));
    let trace = run_to_completion(&mut discovery, &mut tod);

    assert_eq!(trace[..3], [
        DiscoveryState::Unmute,
        DiscoveryState::Mute,
        DiscoveryState::Discovery
    ]);
    assert_eq!(tod.as_slice(), &[uid(0x2222_00000002), uid(0x3333_00000003)]);

    let bus = discovery.get_driver();
    let first_dub = bus
        .sent
        .iter()
        .position(|request| request.parameter_id == pids::DISC_UNIQUE_BRANCH)
        .unwrap();
    let silent_mutes: Vec<usize> = bus
        .sent
        .iter()
        .enumerate()
        .filter(|(_, request)| {
            request.parameter_id == pids::DISC_MUTE
                && request.destination_uid == PackageAddress::Device(uid(0x1111_00000001))
        })
        .map(|(index, _)| index)
        .collect();

    assert_eq!(silent_mutes.len(), 10);
    assert!(silent_mutes.iter().all(|&index| index < first_dub));
}

#[test]
fn test_full_resets_the_table() {
    let mut discovery = discovery_on(SimulatedBus::with_responders(&[0x0001_00000001]));
    let mut tod = TableOfDevices::<200>::new();
    tod.add_uid(uid(0x0002_00000002));

    assert!(discovery.full(0, &mut tod));
    run_to_completion(&mut discovery, &mut tod);

    assert_eq!(tod.as_slice(), &[uid(0x0001_00000001)]);
}

#[test]
fn test_start_and_stop_misuse() {
    let mut discovery = discovery_on(SimulatedBus::with_responders(&[0xAABB_CCDDEEFF]));
    let mut tod = TableOfDevices::<200>::new();

    assert!(!discovery.stop());
    assert!(discovery.full(0, &mut tod));
    assert!(!discovery.full(0, &mut tod));
    assert!(!discovery.incremental(0, &mut tod));

    for _ in 0..10 {
        discovery.process(&mut tod).unwrap();
    }

    assert!(discovery.stop());
    assert!(!discovery.is_running());
    assert!(!discovery.is_finished());
    assert_eq!(discovery.state(), DiscoveryState::Idle);
    assert!(!discovery.stop());

    // a stopped engine can be started again
    assert!(discovery.full(0, &mut tod));
    run_to_completion(&mut discovery, &mut tod);
    assert_eq!(tod.count(), 1);
}

#[test]
fn test_full_table_drops_devices() {
    let mut discovery = discovery_on(SimulatedBus::with_responders(&[
        0x1000_00000001,
        0x2000_00000002,
        0x3000_00000003,
    ]));
    let mut tod = TableOfDevices::<2>::new();

    assert!(discovery.full(0, &mut tod));
    run_to_completion(&mut discovery, &mut tod);

    assert!(discovery.is_finished());
    assert!(tod.is_full());
    assert_eq!(tod.count(), 2);
    // the third device was muted anyway
    assert!(discovery
        .get_driver()
        .responders
        .iter()
        .all(|responder| responder.muted));
}

#[test]
fn test_working_queue() {
    let mut discovery = discovery_on(SimulatedBus::with_responders(&[
        0x1234_00000001,
        0xC000_00000002,
    ]));
    let mut tod = TableOfDevices::<200>::new();

    assert!(discovery.full(0, &mut tod));

    let mut queue = String::new();
    assert_eq!(discovery.copy_working_queue(&mut queue), Ok(1));
    assert_eq!(queue, "\"0000:00000000-ffff:fffffffe\"");

    for _ in 0..10_000 {
        if discovery.stack().len() == 2 {
            break;
        }
        discovery.process(&mut tod).unwrap();
    }

    let mut queue = String::new();
    assert_eq!(discovery.copy_working_queue(&mut queue), Ok(2));
    assert_eq!(
        queue,
        "\"8000:00000000-ffff:fffffffe\",\"0000:00000000-7fff:ffffffff\""
    );
}

#[test]
fn test_driver_errors_do_not_break_the_run() {
    let mut bus = SimulatedBus::with_responders(&[0xAABB_CCDDEEFF]);
    bus.fail_next_send = true;

    let mut discovery = discovery_on(bus);
    let mut tod = TableOfDevices::<200>::new();

    assert!(discovery.full(0, &mut tod));
    assert!(matches!(
        discovery.process(&mut tod),
        Err(DmxError::DriverError(BusError))
    ));
    assert!(discovery.is_running());

    run_to_completion(&mut discovery, &mut tod);
    assert_eq!(tod.as_slice(), &[uid(0xAABB_CCDDEEFF)]);
}

#[test]
fn test_receive_timeouts_count_as_silence() {
    let mut bus = SimulatedBus::with_responders(&[0xAABB_CCDDEEFF]);
    bus.silence_as_timeout = true;

    let mut discovery = discovery_on(bus);
    let mut tod = TableOfDevices::<200>::new();

    assert!(discovery.full(0, &mut tod));
    run_to_completion(&mut discovery, &mut tod);

    assert!(discovery.is_finished());
    assert_eq!(tod.count(), 1);
}

#[test]
fn test_watchdog_is_fed_while_running() {
    let mut discovery = discovery_on(SimulatedBus::default());
    let mut tod = TableOfDevices::<200>::new();

    discovery.process(&mut tod).unwrap();
    assert_eq!(discovery.get_hardware().watchdog_feeds, 0);

    assert!(discovery.full(0, &mut tod));
    run_to_completion(&mut discovery, &mut tod);

    let feeds = discovery.get_hardware().watchdog_feeds;
    assert!(feeds > 0);

    discovery.process(&mut tod).unwrap();
    assert_eq!(discovery.get_hardware().watchdog_feeds, feeds);
}

#[test]
fn test_responders_can_be_added_between_runs() {
    let mut discovery = discovery_on(SimulatedBus::with_responders(&[0x0001_00000001]));
    let mut tod = TableOfDevices::<200>::new();

    assert!(discovery.full(0, &mut tod));
    run_to_completion(&mut discovery, &mut tod);

    discovery
        .get_driver()
        .responders
        .push(Responder::new(uid(0x0001_00000002)));

    assert!(discovery.incremental(0, &mut tod));
    run_to_completion(&mut discovery, &mut tod);

    assert_eq!(tod.as_slice(), &[uid(0x0001_00000001), uid(0x0001_00000002)]);
}

#[test]
fn test_collision_decoding_to_a_muted_device() {
    // Once 0000 is muted, 0001 and 0002 anded on the bus decode as 0000 again.
    let mut discovery = discovery_on(SimulatedBus::with_responders(&[
        0x1234_00000000,
        0x1234_00000001,
        0x1234_00000002,
    ]));
    let mut tod = TableOfDevices::<200>::new();

    assert!(discovery.full(0, &mut tod));
    run_to_completion(&mut discovery, &mut tod);

    assert!(discovery.is_finished());
    assert_eq!(
        tod.as_slice(),
        &[uid(0x1234_00000000), uid(0x1234_00000001), uid(0x1234_00000002)]
    );
}

#[test]
fn test_uid_all_is_never_muted() {
    // Bisecting the top of the id space ends in the single range [UID_ALL, UID_ALL].
    let mut discovery = discovery_on(SimulatedBus::with_responders(&[
        0xFFFF_FFFFFFFC,
        0xFFFF_FFFFFFFD,
    ]));
    let mut tod = TableOfDevices::<200>::new();

    assert!(discovery.full(0, &mut tod));
    let trace = run_to_completion(&mut discovery, &mut tod);

    assert!(trace.contains(&DiscoveryState::DiscoverySingleDevice));
    assert_eq!(tod.as_slice(), &[uid(0xFFFF_FFFFFFFC), uid(0xFFFF_FFFFFFFD)]);
    assert!(!discovery
        .get_driver()
        .sent_with_pid(pids::DISC_MUTE)
        .any(|request| request.destination_uid == PackageAddress::Device(uid(UID_ALL))));
}

/// Runs a discovery where every discovery response shows up a second time,
/// returns the states the late copies were received in.
fn run_with_late_responses(
    uids: &[u64],
    tod: &mut TableOfDevices<200>,
) -> (Vec<DiscoveryState>, usize) {
    let mut bus = SimulatedBus::with_responders(uids);
    bus.late_dub_responses = true;

    let mut discovery = discovery_on(bus);
    assert!(discovery.full(0, tod));

    let mut drained_in = vec![];
    for _ in 0..1_000_000 {
        if !discovery.is_running() {
            break;
        }

        let state = discovery.state();
        let late_deliveries = discovery.get_driver().late_deliveries;
        discovery.process(tod).unwrap();

        if discovery.get_driver().late_deliveries != late_deliveries {
            drained_in.push(state);
        }
    }

    assert!(discovery.is_finished());
    (drained_in, discovery.stack().push_count())
}

#[test]
fn test_late_responses_are_drained() {
    let mut tod = TableOfDevices::<200>::new();
    let (drained_in, push_count) = run_with_late_responses(&[0xAABB_CCDDEEFF], &mut tod);

    assert_eq!(drained_in, [DiscoveryState::LateResponse]);
    assert_eq!(tod.as_slice(), &[uid(0xAABB_CCDDEEFF)]);
    assert_eq!(push_count, 1);

    // a late collision must not be split a second time
    let mut tod = TableOfDevices::<200>::new();
    let (drained_in, push_count) =
        run_with_late_responses(&[0x1234_00000001, 0xC000_00000002], &mut tod);

    assert_eq!(drained_in, [DiscoveryState::LateResponse; 3]);
    assert_eq!(tod.as_slice(), &[uid(0x1234_00000001), uid(0xC000_00000002)]);
    assert_eq!(push_count, 3);
}
