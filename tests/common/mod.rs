#![allow(dead_code)]

use std::cell::Cell;

use dmx_rdm_discovery::consts::PREAMBLE_BYTE;
use dmx_rdm_discovery::discovery_response::encode_discovery_response;
use dmx_rdm_discovery::dmx_driver::{
    ControllerDriverErrorDef, DiscoveryDriver, DiscoveryRequest, DmxError, Hardware,
};
use dmx_rdm_discovery::pids;
use dmx_rdm_discovery::rdm_discovery::{DiscoveryConfig, DiscoveryState, RdmDiscovery};
use dmx_rdm_discovery::tod::TableOfDevices;
use dmx_rdm_discovery::types::ResponseBuffer;
use dmx_rdm_discovery::unique_identifier::{PackageAddress, UniqueIdentifier};

pub const CONTROLLER_UID: [u8; 6] = [0x7F, 0xF0, 0x00, 0x00, 0x00, 0x01];

pub fn uid(value: u64) -> UniqueIdentifier {
    UniqueIdentifier::try_from(value).unwrap()
}

#[derive(Debug, Clone)]
pub struct Responder {
    pub uid: UniqueIdentifier,
    pub muted: bool,
    /// Answers DISC_MUTE.
    pub acknowledges_mute: bool,
}

impl Responder {
    pub fn new(uid: UniqueIdentifier) -> Self {
        Self {
            uid,
            muted: false,
            acknowledges_mute: true,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct BusError;

/// An RDM bus with simulated responders. Responses are queued on send and
/// handed out by the next receive.
#[derive(Default)]
pub struct SimulatedBus {
    pub responders: Vec<Responder>,
    pub sent: Vec<DiscoveryRequest>,
    pub pending: Option<ResponseBuffer>,
    /// Report silence as [DmxError::TimeoutError] instead of `Ok(None)`.
    pub silence_as_timeout: bool,
    /// Fail the next send with a driver error.
    pub fail_next_send: bool,
    /// Deliver every DISC_UNIQUE_BRANCH response a second time, one receive
    /// after the first copy was taken.
    pub late_dub_responses: bool,
    pub late_response: Option<ResponseBuffer>,
    /// Late copies handed out so far.
    pub late_deliveries: usize,
}

impl SimulatedBus {
    pub fn with_responders(uids: &[u64]) -> Self {
        Self {
            responders: uids.iter().map(|&value| Responder::new(uid(value))).collect(),
            ..Default::default()
        }
    }

    pub fn sent_with_pid(&self, parameter_id: u16) -> impl Iterator<Item = &DiscoveryRequest> {
        self.sent
            .iter()
            .filter(move |request| request.parameter_id == parameter_id)
    }

    fn disc_unique_branch(&self, parameter_data: &[u8]) -> Option<ResponseBuffer> {
        let mut lower = [0u8; 8];
        let mut upper = [0u8; 8];
        lower[2..].copy_from_slice(&parameter_data[..6]);
        upper[2..].copy_from_slice(&parameter_data[6..12]);
        let range = u64::from_be_bytes(lower)..=u64::from_be_bytes(upper);

        let mut frames = self
            .responders
            .iter()
            .filter(|responder| !responder.muted && range.contains(&u64::from(responder.uid)))
            .map(|responder| encode_discovery_response(responder.uid));

        let mut collision = frames.next()?;
        // The bus drivers pull the line low, overlapping frames are anded.
        for frame in frames {
            for (collided, byte) in collision.iter_mut().zip(frame.iter()) {
                *collided &= byte;
            }
        }

        Some(ResponseBuffer::from_slice(&collision).unwrap())
    }

    fn disc_mute(&mut self, destination: UniqueIdentifier) -> Option<ResponseBuffer> {
        let responder = self
            .responders
            .iter_mut()
            .find(|responder| responder.uid == destination && responder.acknowledges_mute)?;
        responder.muted = true;

        Some(build_mute_ack(responder.uid.to_bytes()))
    }
}

/// A DISC_MUTE acknowledgement with a control field of 0.
pub fn build_mute_ack(source: [u8; 6]) -> ResponseBuffer {
    let mut frame = ResponseBuffer::new();
    frame.extend_from_slice(&[0xCC, 0x01, 26]).unwrap();
    frame.extend_from_slice(&CONTROLLER_UID).unwrap();
    frame.extend_from_slice(&source).unwrap();
    frame.extend_from_slice(&[0, 0x00, 0, 0, 0, 0x11]).unwrap();
    frame.extend_from_slice(&pids::DISC_MUTE.to_be_bytes()).unwrap();
    frame.extend_from_slice(&[2, 0x00, 0x00]).unwrap();

    let checksum = frame
        .iter()
        .fold(0u16, |sum, &byte| sum.wrapping_add(byte as u16));
    frame.extend_from_slice(&checksum.to_be_bytes()).unwrap();

    frame
}

impl ControllerDriverErrorDef for SimulatedBus {
    type DriverError = BusError;
}

impl DiscoveryDriver for SimulatedBus {
    fn send(
        &mut self,
        _port_index: usize,
        request: &DiscoveryRequest,
    ) -> Result<(), DmxError<BusError>> {
        if self.fail_next_send {
            self.fail_next_send = false;
            return Err(DmxError::DriverError(BusError));
        }

        self.sent.push(request.clone());

        self.pending = match (request.parameter_id, request.destination_uid) {
            (pids::DISC_UNIQUE_BRANCH, _) => self.disc_unique_branch(&request.parameter_data),
            (pids::DISC_MUTE, PackageAddress::Device(destination)) => self.disc_mute(destination),
            (pids::DISC_UN_MUTE, PackageAddress::Broadcast) => {
                for responder in self.responders.iter_mut() {
                    responder.muted = false;
                }
                None
            },
            _ => None,
        };

        Ok(())
    }

    fn receive(
        &mut self,
        _port_index: usize,
        _timeout_us: u32,
    ) -> Result<Option<ResponseBuffer>, DmxError<BusError>> {
        if let Some(response) = self.pending.take() {
            if self.late_dub_responses && response[0] == PREAMBLE_BYTE {
                self.late_response = Some(response.clone());
            }
            return Ok(Some(response));
        }

        if let Some(response) = self.late_response.take() {
            self.late_deliveries += 1;
            return Ok(Some(response));
        }

        if self.silence_as_timeout {
            return Err(DmxError::TimeoutError);
        }

        Ok(None)
    }
}

/// A clock that advances by a fixed step whenever it is read.
#[derive(Default)]
pub struct SteppedClock {
    now: Cell<u64>,
    pub watchdog_feeds: usize,
}

impl Hardware for SteppedClock {
    fn micros(&self) -> u64 {
        self.now.set(self.now.get() + 50);
        self.now.get()
    }

    fn watchdog_feed(&mut self) {
        self.watchdog_feeds += 1;
    }
}

pub type SimulatedDiscovery = RdmDiscovery<SimulatedBus, SteppedClock>;

pub fn discovery_on(bus: SimulatedBus) -> SimulatedDiscovery {
    RdmDiscovery::new(bus, SteppedClock::default(), DiscoveryConfig::default())
}

/// Processes until the run is over and returns the visited states, without
/// the late response guards.
pub fn run_to_completion<const N: usize>(
    discovery: &mut SimulatedDiscovery,
    tod: &mut TableOfDevices<N>,
) -> Vec<DiscoveryState> {
    let mut trace = vec![discovery.state()];

    for _ in 0..1_000_000 {
        if !discovery.is_running() {
            return trace;
        }

        discovery.process(tod).unwrap();

        let state = discovery.state();
        if state != DiscoveryState::LateResponse && trace.last() != Some(&state) {
            trace.push(state);
        }
    }

    panic!("discovery did not finish, trace: {:?}", trace);
}
