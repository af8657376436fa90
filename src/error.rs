// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use std::{error, fmt, result};


/// aimcsv's result type `Result`, used by everything that can abort the
/// construction of a `Session`.
pub type Result<T> = result::Result<T, Error>;


/// Everything that can go wrong while turning an export into a `Session`.
///
/// `Format`, `MissingLapMarkers`, `MissingChannel` and `NoBestLap` abort
/// session construction. `NoMatch` only ever concerns a single lap: the
/// alignment step logs it and drops that lap, the session survives.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
  /// The first row is not `Format,<name>` or names a format we can't read.
  /// Holds the format name if there was one.
  Format(Option<String>),
  /// The header block ended without a `Beacon Markers` row.
  MissingLapMarkers,
  /// A required channel is not part of the channel row.
  MissingChannel(String),
  /// Fewer than three laps, so no lap in between out- and in-lap exists
  /// which could serve as reference. Holds the number of laps available.
  NoBestLap(usize),
  /// Sample `sample` of lap `lap` has no reference point inside the
  /// alignment window.
  NoMatch { lap: usize, sample: usize },
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Self::Format(Some(name)) => write!(f, "unsupported format '{}'", name),
      Self::Format(None) => write!(f, "invalid data format"),
      Self::MissingLapMarkers => write!(f, "missing lap timestamps"),
      Self::MissingChannel(name) => {
        write!(f, "missing required channel: {}", name)
      }
      Self::NoBestLap(count) => {
        write!(f, "no best lap found ({} laps available, need 3)", count)
      }
      Self::NoMatch { lap, sample } => {
        write!(f, "no reference point in range for lap {} sample {}",
               lap, sample)
      }
    }
  }
}

impl error::Error for Error {}


/// The `ensure!` macro provides an easy way to make sure a condition is true,
/// and if not, return the given `Error`. Use it as follows:
///
/// ```ignore
/// fn my_function(&self) -> Result<()> {
///   ensure!(self.has_markers(), Error::MissingLapMarkers);
/// }
/// ```
#[macro_export]
macro_rules! ensure {
  ($cond:expr, $err:expr) => {
    if !($cond) {
      return Err($err);
    }
  };
}


#[cfg(test)]
mod test {
  use super::{Error, Result};
  use pretty_assertions::assert_eq;

  #[test]
  fn error_display_test() {
    assert_eq!("unsupported format 'warblgarbl'",
               Error::Format(Some("warblgarbl".to_string())).to_string());
    assert_eq!("invalid data format", Error::Format(None).to_string());
    assert_eq!("missing lap timestamps",
               Error::MissingLapMarkers.to_string());
    assert_eq!("missing required channel: Time",
               Error::MissingChannel("Time".to_string()).to_string());
    assert_eq!("no best lap found (2 laps available, need 3)",
               Error::NoBestLap(2).to_string());
    assert_eq!("no reference point in range for lap 4 sample 17",
               Error::NoMatch { lap: 4, sample: 17 }.to_string());
  }

  #[test]
  fn ensure_test() {
    fn wrapper(cond: bool) -> Result<()> {
      ensure!(cond, Error::MissingLapMarkers);
      Ok(())
    }

    assert_eq!(wrapper(true), Ok(()));
    assert_eq!(wrapper(false), Err(Error::MissingLapMarkers));
  }
}
