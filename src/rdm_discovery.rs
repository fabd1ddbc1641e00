use crate::consts::{
    DISCOVERY_RETRIES, LATE_RESPONSE_TIMEOUT_MICROS, MUTE_RETRIES, QUICK_FIND_DISCOVERY_RETRIES,
    QUICK_FIND_RETRIES, RECEIVE_TIMEOUT_MICROS, UNMUTE_RETRIES,
};
use crate::discovery_response::decode_discovery_response;
use crate::discovery_stack::{DiscoveryRange, DiscoveryStack};
use crate::dmx_driver::{DiscoveryDriver, DiscoveryRequest, DmxError, Hardware};
use crate::pids;
use crate::rdm_data::deserialize_discovery_mute_ack;
use crate::tod::TableOfDevices;
use crate::types::{DataPack, ResponseBuffer};
use crate::unique_identifier::{PackageAddress, UniqueIdentifier};

/// States of the discovery state machine.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DiscoveryState {
    Idle,
    /// Broadcasting DISC_UN_MUTE.
    Unmute,
    /// Incremental discovery: muting the devices that are already known.
    Mute,
    /// Taking the next range from the stack and probing it.
    Discovery,
    /// Muting the only candidate of a single id range.
    DiscoverySingleDevice,
    /// Evaluating the response to DISC_UNIQUE_BRANCH.
    Dub,
    /// Muting the device that answered DISC_UNIQUE_BRANCH.
    QuickFind,
    /// Probing the same range again for further devices.
    QuickFindDiscovery,
    /// Discarding responses to the previous command before moving on.
    LateResponse,
    Finished,
}

impl core::fmt::Display for DiscoveryState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            DiscoveryState::Idle => "IDLE",
            DiscoveryState::Unmute => "UNMUTE",
            DiscoveryState::Mute => "MUTE",
            DiscoveryState::Discovery => "DISCOVERY",
            DiscoveryState::DiscoverySingleDevice => "DISCOVERY_SINGLE_DEVICE",
            DiscoveryState::Dub => "DUB",
            DiscoveryState::QuickFind => "QUICKFIND",
            DiscoveryState::QuickFindDiscovery => "QUICKFIND_DISCOVERY",
            DiscoveryState::LateResponse => "LATE_RESPONSE",
            DiscoveryState::Finished => "FINISHED",
        })
    }
}

/// Timing and retry budget of a discovery run.
///
/// The defaults fit common RS485 transceivers. Retries count transmissions,
/// a value of 0 behaves like 1.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// How long to wait for a response to a single transmission.
    pub receive_timeout_us: u64,
    /// How long stray responses are discarded before the next command.
    pub late_response_timeout_us: u64,
    /// The wait bound passed to [DiscoveryDriver::receive]. Keep it 0 for a
    /// purely polled driver.
    pub receive_poll_us: u32,
    pub unmute_retries: u8,
    pub mute_retries: u8,
    pub discovery_retries: u8,
    pub quick_find_retries: u8,
    pub quick_find_discovery_retries: u8,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            receive_timeout_us: RECEIVE_TIMEOUT_MICROS,
            late_response_timeout_us: LATE_RESPONSE_TIMEOUT_MICROS,
            receive_poll_us: 0,
            unmute_retries: UNMUTE_RETRIES,
            mute_retries: MUTE_RETRIES,
            discovery_retries: DISCOVERY_RETRIES,
            quick_find_retries: QUICK_FIND_RETRIES,
            quick_find_discovery_retries: QUICK_FIND_DISCOVERY_RETRIES,
        }
    }
}

/// Bookkeeping of one phase: transmissions left, whether a command is in
/// flight and when it was sent.
#[derive(Debug, Default, Clone)]
struct PhaseState {
    counter: u8,
    command_running: bool,
    micros: u64,
}

impl PhaseState {
    fn reset(&mut self, retries: u8) {
        self.counter = retries.max(1);
        self.command_running = false;
    }

    fn is_exhausted(&self) -> bool {
        self.counter == 0
    }

    fn sent(&mut self, now: u64) {
        self.command_running = true;
        self.micros = now;
    }

    fn is_timed_out(&self, now: u64, timeout_us: u64) -> bool {
        now.wrapping_sub(self.micros) > timeout_us
    }

    /// The transmission went unanswered.
    fn retry(&mut self) {
        self.counter = self.counter.saturating_sub(1);
        self.command_running = false;
    }
}

/// Non-blocking RDM discovery for one controller.
///
/// Start a run with [RdmDiscovery::full] or [RdmDiscovery::incremental] and
/// call [RdmDiscovery::process] from the main loop with the same table of
/// devices until [RdmDiscovery::is_running] turns false. Every call sends at
/// most one command or evaluates one response and returns immediately.
///
/// ```rust
/// use dmx_rdm_discovery::dmx_driver::{
///     ControllerDriverErrorDef, DiscoveryDriver, DiscoveryRequest, DmxError, Hardware,
/// };
/// use dmx_rdm_discovery::rdm_discovery::{DiscoveryConfig, RdmDiscovery};
/// use dmx_rdm_discovery::tod::TableOfDevices;
/// use dmx_rdm_discovery::types::ResponseBuffer;
///
/// // A bus without any responders.
/// struct EmptyBus;
///
/// impl ControllerDriverErrorDef for EmptyBus {
///     type DriverError = ();
/// }
///
/// impl DiscoveryDriver for EmptyBus {
///     fn send(&mut self, _: usize, _: &DiscoveryRequest) -> Result<(), DmxError<()>> {
///         Ok(())
///     }
///
///     fn receive(&mut self, _: usize, _: u32) -> Result<Option<ResponseBuffer>, DmxError<()>> {
///         Ok(None)
///     }
/// }
///
/// struct Clock(core::cell::Cell<u64>);
///
/// impl Hardware for Clock {
///     fn micros(&self) -> u64 {
///         self.0.set(self.0.get() + 100);
///         self.0.get()
///     }
///
///     fn watchdog_feed(&mut self) {}
/// }
///
/// let mut discovery = RdmDiscovery::new(EmptyBus, Clock(Default::default()), DiscoveryConfig::default());
/// let mut tod = TableOfDevices::<200>::new();
///
/// assert!(discovery.full(0, &mut tod));
/// while discovery.is_running() {
///     discovery.process(&mut tod).unwrap();
/// }
///
/// assert!(discovery.is_finished());
/// assert_eq!(tod.count(), 0);
/// ```
pub struct RdmDiscovery<D: DiscoveryDriver, H: Hardware> {
    driver: D,
    hardware: H,
    config: DiscoveryConfig,
    port_index: usize,
    state: DiscoveryState,
    saved_state: DiscoveryState,
    late_response_micros: u64,
    incremental: bool,
    finished: bool,
    stack: DiscoveryStack,
    current_range: DiscoveryRange,
    /// The response the Dub state evaluates.
    response: Option<ResponseBuffer>,
    unmute: PhaseState,
    mute: PhaseState,
    /// Known devices that still have to be muted, counted from the end of the table.
    mute_entries: usize,
    mute_uid: Option<UniqueIdentifier>,
    discovery: PhaseState,
    single_device: PhaseState,
    quick_find: PhaseState,
    quick_find_uid: Option<UniqueIdentifier>,
    /// Decoded from a discovery response but never acknowledged DISC_MUTE.
    /// Either a device that can't be muted or two devices whose collision
    /// happened to produce a valid checksum.
    unmutable_uid: Option<UniqueIdentifier>,
    quick_find_discovery: PhaseState,
}

impl<D: DiscoveryDriver, H: Hardware> RdmDiscovery<D, H> {
    pub fn new(driver: D, hardware: H, config: DiscoveryConfig) -> Self {
        Self {
            driver,
            hardware,
            config,
            port_index: 0,
            state: DiscoveryState::Idle,
            saved_state: DiscoveryState::Idle,
            late_response_micros: 0,
            incremental: false,
            finished: false,
            stack: DiscoveryStack::new(),
            current_range: DiscoveryRange::full(),
            response: None,
            unmute: PhaseState::default(),
            mute: PhaseState::default(),
            mute_entries: 0,
            mute_uid: None,
            discovery: PhaseState::default(),
            single_device: PhaseState::default(),
            quick_find: PhaseState::default(),
            quick_find_uid: None,
            unmutable_uid: None,
            quick_find_discovery: PhaseState::default(),
        }
    }

    /// Get a reference to the underlying driver.
    pub fn get_driver(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Get a reference to the underlying hardware.
    pub fn get_hardware(&mut self) -> &mut H {
        &mut self.hardware
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn state(&self) -> DiscoveryState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state != DiscoveryState::Idle
    }

    /// True once a run completed, until the next run is started or stopped.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The ranges that still have to be examined.
    pub fn stack(&self) -> &DiscoveryStack {
        &self.stack
    }

    /// Discovers all devices on `port_index` from scratch. `tod` is emptied.
    ///
    /// Returns false if a discovery is already running.
    pub fn full<const N: usize>(
        &mut self,
        port_index: usize,
        tod: &mut TableOfDevices<N>,
    ) -> bool {
        if !self.start(port_index, false) {
            return false;
        }

        tod.reset();
        true
    }

    /// Checks the devices in `tod` and searches for new ones.
    ///
    /// Every known device is muted individually first. Devices that don't
    /// answer are removed from `tod`.
    /// Returns false if a discovery is already running.
    pub fn incremental<const N: usize>(
        &mut self,
        port_index: usize,
        tod: &mut TableOfDevices<N>,
    ) -> bool {
        if !self.start(port_index, true) {
            return false;
        }

        self.mute_entries = tod.count() as usize;
        true
    }

    /// Aborts the running discovery. Devices muted so far stay muted until
    /// the next run unmutes them.
    ///
    /// Returns false if no discovery is running.
    pub fn stop(&mut self) -> bool {
        if self.state == DiscoveryState::Idle {
            log::debug!("discovery is not running");
            return false;
        }

        self.finished = false;
        self.new_state(DiscoveryState::Idle, false);
        true
    }

    /// Writes the pending ranges as comma separated, quoted
    /// `"mmmm:dddddddd-mmmm:dddddddd"` items.
    /// Returns the amount of ranges written.
    pub fn copy_working_queue<W: core::fmt::Write>(
        &self,
        out: &mut W,
    ) -> Result<usize, core::fmt::Error> {
        for (index, range) in self.stack.iter().enumerate() {
            if index > 0 {
                out.write_char(',')?;
            }
            write!(out, "\"{}\"", range)?;
        }

        Ok(self.stack.len())
    }

    /// Advances the discovery by one step. `tod` has to be the table the run
    /// was started with.
    ///
    /// Driver errors are passed through. The run stays intact, so calling
    /// this again continues it.
    pub fn process<const N: usize>(
        &mut self,
        tod: &mut TableOfDevices<N>,
    ) -> Result<(), DmxError<D::DriverError>> {
        if self.state == DiscoveryState::Idle {
            return Ok(());
        }

        self.hardware.watchdog_feed();

        match self.state {
            DiscoveryState::Idle => Ok(()),
            DiscoveryState::LateResponse => self.process_late_response(),
            DiscoveryState::Unmute => self.process_unmute(),
            DiscoveryState::Mute => self.process_mute(tod),
            DiscoveryState::Discovery => self.process_discovery(),
            DiscoveryState::DiscoverySingleDevice => self.process_single_device(tod),
            DiscoveryState::Dub => {
                self.process_dub(tod);
                Ok(())
            },
            DiscoveryState::QuickFind => self.process_quick_find(tod),
            DiscoveryState::QuickFindDiscovery => self.process_quick_find_discovery(tod),
            DiscoveryState::Finished => {
                self.finished = true;
                log::debug!(
                    "discovery finished with {} devices, stack depth {} after {} pushes",
                    tod.count(),
                    self.stack.max_depth(),
                    self.stack.push_count()
                );
                tod.dump();
                self.new_state(DiscoveryState::Idle, false);
                Ok(())
            },
        }
    }

    fn start(&mut self, port_index: usize, incremental: bool) -> bool {
        if self.state != DiscoveryState::Idle {
            log::debug!("discovery is already running");
            return false;
        }

        log::debug!(
            "starting {} discovery on port {}",
            if incremental { "incremental" } else { "full" },
            port_index
        );

        self.port_index = port_index;
        self.incremental = incremental;
        self.finished = false;
        self.response = None;
        self.mute_entries = 0;
        self.mute_uid = None;
        self.quick_find_uid = None;
        self.unmutable_uid = None;

        self.unmute.reset(self.config.unmute_retries);
        self.mute.reset(self.config.mute_retries);
        self.discovery.reset(self.config.discovery_retries);
        self.single_device.reset(self.config.mute_retries);
        self.quick_find.reset(self.config.quick_find_retries);
        self.quick_find_discovery
            .reset(self.config.quick_find_discovery_retries);

        self.stack.clear();
        self.stack.push(DiscoveryRange::full());

        self.new_state(DiscoveryState::Unmute, false);
        true
    }

    /// Switches to `state`. With `late_response` set, [DiscoveryState::LateResponse]
    /// is entered first and `state` follows once the bus had time to calm down.
    fn new_state(&mut self, state: DiscoveryState, late_response: bool) {
        if late_response && self.state != DiscoveryState::LateResponse {
            log::debug!(
                "{} -> {} [{}]",
                self.state,
                DiscoveryState::LateResponse,
                state
            );
            self.late_response_micros = self.hardware.micros();
            self.saved_state = state;
            self.state = DiscoveryState::LateResponse;
        } else {
            log::debug!("{} -> {}", self.state, state);
            self.state = state;
        }
    }

    fn send(&mut self, request: &DiscoveryRequest) -> Result<(), DmxError<D::DriverError>> {
        self.driver.send(self.port_index, request)
    }

    fn receive(&mut self) -> Result<Option<ResponseBuffer>, DmxError<D::DriverError>> {
        match self
            .driver
            .receive(self.port_index, self.config.receive_poll_us)
        {
            Err(DmxError::TimeoutError) => Ok(None),
            result => result,
        }
    }

    fn process_late_response(&mut self) -> Result<(), DmxError<D::DriverError>> {
        let drained = self.receive();

        let now = self.hardware.micros();
        if now.wrapping_sub(self.late_response_micros) > self.config.late_response_timeout_us {
            log::debug!("{} -> {}", self.state, self.saved_state);
            self.state = self.saved_state;
        }

        if drained?.is_some() {
            log::trace!("discarded late response");
        }

        Ok(())
    }

    fn process_unmute(&mut self) -> Result<(), DmxError<D::DriverError>> {
        if self.unmute.is_exhausted() {
            self.unmute.reset(self.config.unmute_retries);

            if self.incremental {
                self.new_state(DiscoveryState::Mute, false);
            } else {
                self.new_state(DiscoveryState::Discovery, false);
            }

            return Ok(());
        }

        if !self.unmute.command_running {
            self.unmute.sent(self.hardware.micros());
            return self.send(&DiscoveryRequest::empty(
                PackageAddress::Broadcast,
                pids::DISC_UN_MUTE,
            ));
        }

        // Broadcasts are not answered, anything received is dropped.
        let drained = self.receive();

        if self
            .unmute
            .is_timed_out(self.hardware.micros(), self.config.receive_timeout_us)
        {
            self.unmute.retry();
        }

        drained.map(|_| ())
    }

    fn process_mute<const N: usize>(
        &mut self,
        tod: &mut TableOfDevices<N>,
    ) -> Result<(), DmxError<D::DriverError>> {
        if self.mute_entries == 0 {
            self.mute.command_running = false;
            self.new_state(DiscoveryState::Discovery, false);
            return Ok(());
        }

        if self.mute.is_exhausted() {
            self.mute.reset(self.config.mute_retries);

            if let Some(uid) = self.mute_uid.take() {
                log::debug!("device {} is gone", uid);
                tod.delete_uid(uid);
            }

            self.mute_entries -= 1;
            return Ok(());
        }

        if !self.mute.command_running {
            let uid = match tod.copy_uid_entry(self.mute_entries - 1) {
                Some(uid) => uid,
                None => {
                    // The table shrank while the run was going on.
                    self.mute_entries = tod.count() as usize;
                    return Ok(());
                },
            };

            self.mute_uid = Some(uid);
            self.mute.sent(self.hardware.micros());
            return self.send(&DiscoveryRequest::empty(
                PackageAddress::Device(uid),
                pids::DISC_MUTE,
            ));
        }

        let response = self.receive()?;

        if let (Some(response), Some(uid)) = (response, self.mute_uid) {
            if is_mute_ack(&response, uid) {
                self.mute_uid = None;
                self.mute_entries -= 1;
                self.mute.reset(self.config.mute_retries);
                return Ok(());
            }
        }

        if self
            .mute
            .is_timed_out(self.hardware.micros(), self.config.receive_timeout_us)
        {
            self.mute.retry();
        }

        Ok(())
    }

    fn process_discovery(&mut self) -> Result<(), DmxError<D::DriverError>> {
        if self.discovery.command_running {
            let response = self.receive()?;

            if response.is_some() {
                self.discovery.command_running = false;
                self.response = response;
                self.new_state(DiscoveryState::Dub, false);
                return Ok(());
            }

            let now = self.hardware.micros();
            if self
                .discovery
                .is_timed_out(now, self.config.receive_timeout_us)
            {
                self.discovery.retry();

                if self.discovery.is_exhausted() {
                    self.response = None;
                    self.new_state(DiscoveryState::Dub, false);
                    return Ok(());
                }

                self.discovery.sent(now);
                return self.send(&disc_unique_branch_request(self.current_range));
            }

            return Ok(());
        }

        let range = match self.stack.pop() {
            Some(range) => range,
            None => {
                self.new_state(DiscoveryState::Finished, true);
                return Ok(());
            },
        };

        self.current_range = range;

        if range.is_single() {
            self.single_device.reset(self.config.mute_retries);
            self.new_state(DiscoveryState::DiscoverySingleDevice, true);
            return Ok(());
        }

        log::trace!("DISC_UNIQUE_BRANCH {}", range);

        self.discovery.reset(self.config.discovery_retries);
        self.discovery.sent(self.hardware.micros());
        self.send(&disc_unique_branch_request(range))
    }

    fn process_single_device<const N: usize>(
        &mut self,
        tod: &mut TableOfDevices<N>,
    ) -> Result<(), DmxError<D::DriverError>> {
        let uid = match self.current_range.single_uid() {
            Some(uid) => uid,
            None => {
                log::trace!("{} is not a device uid", self.current_range);
                self.new_state(DiscoveryState::Discovery, false);
                return Ok(());
            },
        };

        if self.single_device.is_exhausted() {
            self.single_device.reset(self.config.mute_retries);
            self.new_state(DiscoveryState::Discovery, true);
            return Ok(());
        }

        if !self.single_device.command_running {
            self.single_device.sent(self.hardware.micros());
            return self.send(&DiscoveryRequest::empty(
                PackageAddress::Device(uid),
                pids::DISC_MUTE,
            ));
        }

        if let Some(response) = self.receive()? {
            if is_mute_ack(&response, uid) {
                add_uid(tod, uid);
                self.single_device.reset(self.config.mute_retries);
                self.new_state(DiscoveryState::Discovery, false);
                return Ok(());
            }
        }

        if self
            .single_device
            .is_timed_out(self.hardware.micros(), self.config.receive_timeout_us)
        {
            self.single_device.retry();
        }

        Ok(())
    }

    fn process_dub<const N: usize>(&mut self, tod: &TableOfDevices<N>) {
        let response = match self.response.take() {
            Some(response) => response,
            None => {
                log::trace!("no responses in {}", self.current_range);
                self.new_state(DiscoveryState::Discovery, false);
                return;
            },
        };

        match decode_discovery_response(&response) {
            Ok(uid) if self.is_settled(uid, tod) => {
                log::trace!("{} is settled, collision in {}", uid, self.current_range);
                self.split_current_range();
            },
            Ok(uid) => {
                self.quick_find_uid = Some(uid);
                self.quick_find.reset(self.config.quick_find_retries);
                self.new_state(DiscoveryState::QuickFind, true);
            },
            Err(error) => {
                log::trace!("collision in {}: {}", self.current_range, error);
                self.split_current_range();
            },
        }
    }

    /// A muted device doesn't answer discovery, so decoding one means
    /// several devices collided into a frame that happens to be valid.
    fn is_settled<const N: usize>(
        &self,
        uid: UniqueIdentifier,
        tod: &TableOfDevices<N>,
    ) -> bool {
        self.unmutable_uid == Some(uid) || self.quick_find_uid == Some(uid) || tod.exists(uid)
    }

    fn split_current_range(&mut self) {
        if !self.current_range.is_single() {
            self.stack.push_split(self.current_range);
        }

        self.new_state(DiscoveryState::Discovery, true);
    }

    fn process_quick_find<const N: usize>(
        &mut self,
        tod: &mut TableOfDevices<N>,
    ) -> Result<(), DmxError<D::DriverError>> {
        let uid = match self.quick_find_uid {
            Some(uid) => uid,
            None => {
                self.enter_quick_find_discovery();
                return Ok(());
            },
        };

        if self.quick_find.is_exhausted() {
            log::debug!("{} answered discovery but not DISC_MUTE", uid);
            self.unmutable_uid = Some(uid);
            self.enter_quick_find_discovery();
            return Ok(());
        }

        if !self.quick_find.command_running {
            log::trace!("QuickFind {}", uid);
            self.quick_find.sent(self.hardware.micros());
            return self.send(&DiscoveryRequest::empty(
                PackageAddress::Device(uid),
                pids::DISC_MUTE,
            ));
        }

        if let Some(response) = self.receive()? {
            if is_mute_ack(&response, uid) {
                add_uid(tod, uid);
                self.enter_quick_find_discovery();
                return Ok(());
            }
        }

        if self
            .quick_find
            .is_timed_out(self.hardware.micros(), self.config.receive_timeout_us)
        {
            self.quick_find.retry();
        }

        Ok(())
    }

    fn enter_quick_find_discovery(&mut self) {
        self.quick_find.command_running = false;
        self.quick_find_discovery
            .reset(self.config.quick_find_discovery_retries);
        self.new_state(DiscoveryState::QuickFindDiscovery, false);
    }

    fn process_quick_find_discovery<const N: usize>(
        &mut self,
        tod: &TableOfDevices<N>,
    ) -> Result<(), DmxError<D::DriverError>> {
        // Nobody else answers in this range, it is done.
        if self.quick_find_discovery.is_exhausted() {
            self.new_state(DiscoveryState::Discovery, true);
            return Ok(());
        }

        if !self.quick_find_discovery.command_running {
            self.quick_find_discovery.sent(self.hardware.micros());
            return self.send(&disc_unique_branch_request(self.current_range));
        }

        if let Some(response) = self.receive()? {
            self.quick_find_discovery.command_running = false;

            match decode_discovery_response(&response) {
                Ok(uid) if self.is_settled(uid, tod) => {
                    log::trace!("{} is settled, collision in {}", uid, self.current_range);
                    self.split_current_range();
                },
                Ok(uid) => {
                    self.quick_find_uid = Some(uid);
                    self.quick_find.reset(self.config.quick_find_retries);
                    self.new_state(DiscoveryState::QuickFind, true);
                },
                Err(_) => {
                    // Several devices left, let Dub split the range.
                    self.response = Some(response);
                    self.new_state(DiscoveryState::Dub, false);
                },
            }

            return Ok(());
        }

        if self
            .quick_find_discovery
            .is_timed_out(self.hardware.micros(), self.config.receive_timeout_us)
        {
            self.quick_find_discovery.retry();
        }

        Ok(())
    }
}

fn disc_unique_branch_request(range: DiscoveryRange) -> DiscoveryRequest {
    let mut request = DiscoveryRequest::empty(PackageAddress::Broadcast, pids::DISC_UNIQUE_BRANCH);
    // 12 bytes always fit into a DataPack
    request.parameter_data = DataPack::from_slice(&range.to_bytes()).unwrap();
    request
}

fn is_mute_ack(response: &[u8], uid: UniqueIdentifier) -> bool {
    match deserialize_discovery_mute_ack(response) {
        Ok(ack) if ack.source_uid == uid => {
            log::trace!("{} muted: {:?}", uid, ack.response);
            true
        },
        Ok(ack) => {
            log::warn!("mute acknowledged by {} instead of {}", ack.source_uid, uid);
            false
        },
        Err(error) => {
            log::trace!("ignoring response while muting {}: {}", uid, error);
            false
        },
    }
}

fn add_uid<const N: usize>(tod: &mut TableOfDevices<N>, uid: UniqueIdentifier) {
    if tod.add_uid(uid) {
        log::debug!("AddUid {}", uid);
    }
}
