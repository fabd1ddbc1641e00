//! Non-blocking DMX-RDM (ANSI E1.20) discovery for controllers that have to keep their main loop
//! running, like DMX512 gateways and nodes. This library features no-std as well as no-alloc
//! support (no heap allocation) to target embedded as well as os platforms.
//!
//! Please refer to the [official specifications](https://tsp.esta.org/) published by the ESTA.
//!
//! Discovery finds the unique ids of all responders on a port by binary searching the 48 bit id
//! space with DISC_UNIQUE_BRANCH and muting every device found with DISC_MUTE. The
//! [rdm_discovery::RdmDiscovery] engine runs that search as a state machine. Every call to
//! [rdm_discovery::RdmDiscovery::process] does at most one step, so DMX output and network
//! traffic keep being served while discovery is going on. The results are collected in a
//! [tod::TableOfDevices].
//!
//! The bus is accessed through the [dmx_driver::DiscoveryDriver] trait, time and the watchdog
//! through [dmx_driver::Hardware].
//!
//! # Usage
//!
//! ```rust,ignore
//! use dmx_rdm_discovery::rdm_discovery::{DiscoveryConfig, RdmDiscovery};
//! use dmx_rdm_discovery::tod::TableOfDevices;
//!
//! let mut discovery = RdmDiscovery::new(driver, hardware, DiscoveryConfig::default());
//! let mut tod = TableOfDevices::<200>::new();
//!
//! discovery.full(0, &mut tod);
//!
//! loop {
//!     if let Err(error) = discovery.process(&mut tod) {
//!         println!("'{error}' during discovery");
//!     }
//!
//!     if discovery.is_finished() {
//!         for uid in &tod {
//!             println!("found {uid}");
//!         }
//!         break;
//!     }
//!
//!     // serve dmx output here
//! }
//! ```
//!
//! A later [rdm_discovery::RdmDiscovery::incremental] run keeps the table, removes the devices
//! that stopped answering and adds new ones.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod command_class;
pub mod consts;
/// Decoding and encoding of the responses to DISC_UNIQUE_BRANCH.
pub mod discovery_response;
/// The ranges of the id space that still have to be searched.
pub mod discovery_stack;
/// Traits a driver and the platform have to implement for discovery.
pub mod dmx_driver;
mod layouts;
pub mod pids;
pub mod rdm_data;
/// The discovery state machine.
pub mod rdm_discovery;
pub mod rdm_types;
/// Table of devices.
pub mod tod;
pub mod types;
pub mod unique_identifier;
mod utils;
