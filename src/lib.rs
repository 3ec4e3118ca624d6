//! Novation Launchpad grid controller integration.
//!
//! Maps physical button/LED addresses on a Launchpad-class grid controller to
//! logical (column, row) coordinates and back, and turns raw hardware input
//! into a normalized stream of button-press events.
//!
//! # Architecture
//!
//! - [`address`]: pure, table-driven translation between hardware key codes
//!   and grid coordinates
//! - [`device`]: one controller's ports, LED writes, and event delivery
//! - [`controller`]: discovery and connect/disconnect lifecycle
//! - [`transport`]: the abstract MIDI-like transport, with a `midir`-backed
//!   implementation in [`transport::midi`]
//!
//! # Addressable space
//!
//! Coordinates cover a 9x9 space: the 8x8 pad grid (y 1-8), the top control
//! row (y 0), the right control column (x 8), and one unused corner at (8,0).
//!
//! # Example
//!
//! ```no_run
//! use launchgrid::{connect, Controller, Coordinate, MidirTransport};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = Controller::new(MidirTransport::new());
//! for mut device in controller.discover()? {
//!     if connect(&mut device) {
//!         device.subscribe(|event| println!("press at ({}, {})", event.x(), event.y()));
//!         device.set_light(Coordinate::new(0, 1), 60)?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod controller;
pub mod device;
pub mod event;
pub mod transport;

pub use address::{Coordinate, KeyCode, UnmappedKeyError};
pub use controller::{connect, disconnect, Controller};
pub use device::Device;
pub use event::{InputEvent, RawEvent, SubscriberRegistry, SubscriptionId};
pub use transport::midi::MidirTransport;
pub use transport::{DeviceError, InputPort, OutputPort, RawEventHandler, Transport};
