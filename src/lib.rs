// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

//! Reads CSV exports produced by AiM Race Studio and rebuilds the session
//! they describe: laps split at the beacon markers, a distance channel
//! aligned onto the fastest lap and a GPS speed channel, if the export
//! doesn't bring those along.
//!
//! ```ignore
//! let session: aimcsv::Session = std::fs::read_to_string(path)?.parse()?;
//! for lap in session.laps() {
//!   println!("lap {}: {:.3}s", lap.number(), lap.duration());
//! }
//! ```

mod error;
mod header;
mod lap;
mod options;
mod session;

pub mod align;
pub mod channel;
pub mod csv;
pub mod geo;
pub mod segment;
pub mod speed;

pub use align::{ReferenceTrack, TrackPoint};
pub use channel::{Channel, ChannelData, Channels};
pub use error::{Error, Result};
pub use geo::Coordinate;
pub use header::Headers;
pub use lap::{Lap, Sample};
pub use options::SessionOptions;
pub use session::Session;
