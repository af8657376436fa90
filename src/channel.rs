// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use crate::{ensure,
            error::{Error, Result}};
use getset::{CopyGetters, Getters, MutGetters};
use serde::Serialize;
use std::{iter, vec};


/// Channels every export must contain.
pub const TIME: &str = "Time";
pub const LATITUDE: &str = "GPS Latitude";
pub const LONGITUDE: &str = "GPS Longitude";
/// Channels we derive ourselves if the export doesn't contain them.
pub const DISTANCE: &str = "Distance";
pub const SPEED: &str = "GPS Speed";

pub const REQUIRED: [&str; 3] = [TIME, LATITUDE, LONGITUDE];

const FREQUENCIES: [usize; 10] = [1, 2, 5, 10, 20, 50, 100, 200, 500, 1000];


/// The ordered, de-duplicated set of channels of a session.
///
/// Every channel read from the export remembers the column it came from. If
/// the export names a channel twice, the first column wins. Synthesized
/// channels have no column.
#[derive(Clone, Debug, Default, PartialEq, Getters, Serialize)]
#[getset(get = "pub")]
pub struct Channels {
  names:   Vec<String>,
  units:   Vec<String>,
  #[serde(skip)]
  columns: Vec<Option<usize>>,
}

impl Channels {
  /// Builds the channel set from the channel name row and the units row of
  /// the export. Missing units are left empty.
  pub fn from_rows(names: &[String], units: &[String]) -> Self {
    let mut channels = Self::default();
    for (column, name) in names.iter().enumerate() {
      if name.is_empty() || channels.contains(name) {
        continue;
      }
      channels.names.push(name.clone());
      channels.units
              .push(units.get(column).cloned().unwrap_or_default());
      channels.columns.push(Some(column));
    }
    channels
  }

  /// Appends a channel which is not part of the export. Returns its index.
  pub fn synthesize(&mut self, name: &str, unit: &str) -> usize {
    if let Some(idx) = self.position(name) {
      return idx;
    }
    self.names.push(name.to_string());
    self.units.push(unit.to_string());
    self.columns.push(None);
    self.names.len() - 1
  }

  /// Makes sure `Time`, `GPS Latitude` and `GPS Longitude` exist.
  pub fn verify(&self) -> Result<()> {
    for required in REQUIRED.iter() {
      ensure!(self.contains(required),
              Error::MissingChannel(required.to_string()));
    }
    Ok(())
  }

  pub fn position(&self, name: &str) -> Option<usize> {
    self.names.iter().position(|channel| channel == name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.position(name).is_some()
  }

  /// Source column of the channel at `idx`, `None` for synthesized channels.
  pub fn column(&self, idx: usize) -> Option<usize> {
    self.columns.get(idx).copied().flatten()
  }

  pub fn unit(&self, idx: usize) -> Option<&str> {
    self.units.get(idx).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}


/// Indices of the channels the pipeline works with, resolved once so the hot
/// loops don't look names up.
#[derive(Clone, Copy, Debug, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Layout {
  time:      usize,
  latitude:  usize,
  longitude: usize,
  distance:  usize,
  speed:     usize,
}

impl Layout {
  /// Resolves the layout. All five channels must be part of `channels`.
  pub fn resolve(channels: &Channels) -> Result<Self> {
    let find = |name: &str| {
      channels.position(name)
              .ok_or_else(|| Error::MissingChannel(name.to_string()))
    };
    Ok(Self { time:      find(TIME)?,
              latitude:  find(LATITUDE)?,
              longitude: find(LONGITUDE)?,
              distance:  find(DISTANCE)?,
              speed:     find(SPEED)? })
  }
}


/// Data of a single channel within a single lap, together with its metadata.
#[derive(Clone, Debug, Default, PartialEq, Getters, Serialize)]
#[getset(get = "pub")]
pub struct Channel {
  name: String,
  unit: String,
  data: ChannelData,
}

impl Channel {
  pub fn new(name: String, unit: String, data: ChannelData) -> Self {
    Self { name, unit, data }
  }

  /// Estimates the logging frequency in Hz from the first three timestamps,
  /// snapped to the nearest rate an AiM logger supports.
  pub fn frequency(&self) -> f64 {
    if self.len() < 3 {
      return 0.0;
    }

    let (first, third) = (self.data.timestamps[0], self.data.timestamps[2]);
    let step = (third - first) / 2.0;
    if !step.is_finite() || step <= 0.0 {
      return 0.0;
    }

    let raw_frequency = (1.0 / step).round() as i64;
    FREQUENCIES.iter()
               .min_by_key(|&&frequency| (raw_frequency - frequency as i64).abs())
               .copied()
               .unwrap_or(0) as f64
  }

  pub fn len(&self) -> usize {
    self.data().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}


/// Lap relative timestamps and the corresponding samples of a channel.
#[derive(Clone, Debug, Default, PartialEq, Getters, MutGetters, Serialize)]
#[getset(get = "pub", get_mut = "pub")]
pub struct ChannelData {
  timestamps: Vec<f64>,
  samples:    Vec<f64>,
}

impl ChannelData {
  pub fn from_ts(timestamps: Vec<f64>, samples: Vec<f64>) -> Self {
    Self { timestamps,
           samples }
  }

  pub fn len(&self) -> usize {
    assert!(self.timestamps.len() == self.samples.len(),
            "number of timestamps not equivalent to number of samples");
    self.timestamps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0usize
  }
}

impl IntoIterator for ChannelData {
  type IntoIter = iter::Zip<vec::IntoIter<f64>, vec::IntoIter<f64>>;
  type Item = (f64, f64);

  fn into_iter(self) -> Self::IntoIter {
    self.timestamps.into_iter().zip(self.samples.into_iter())
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::{assert_eq, assert_ne};


  macro_rules! stringvec {
    ($($x:literal),* $(,)?) => (vec![$($x.to_string()),*]);
  }

  #[test]
  fn channels_test() {
    let names = stringvec!["Time", "GPS Latitude", "GPS Longitude", "Time",
                           "RPM", ""];
    let units = stringvec!["s", "deg", "deg", "ms"];
    let mut channels = Channels::from_rows(&names, &units);

    assert_eq!(&stringvec!["Time", "GPS Latitude", "GPS Longitude", "RPM"],
               channels.names());
    assert_eq!(&stringvec!["s", "deg", "deg", ""], channels.units());
    assert_eq!(Some(0), channels.column(0));
    assert_eq!(Some(4), channels.column(3));
    assert_eq!(Ok(()), channels.verify());

    assert_eq!(4, channels.synthesize(DISTANCE, "m"));
    assert_eq!(4, channels.synthesize(DISTANCE, "m"));
    assert_eq!(5, channels.synthesize(SPEED, "km/h"));
    assert_eq!(None, channels.column(4));
    assert_eq!(Some("km/h"), channels.unit(5));
    assert_eq!(6, channels.len());

    let layout = Layout::resolve(&channels).unwrap();
    assert_eq!(0, layout.time());
    assert_eq!(1, layout.latitude());
    assert_eq!(2, layout.longitude());
    assert_eq!(4, layout.distance());
    assert_eq!(5, layout.speed());
  }

  #[test]
  fn channels_verify_test() {
    let channels =
      Channels::from_rows(&stringvec!["Time", "GPS Longitude"], &[]);
    assert_eq!(Err(Error::MissingChannel(LATITUDE.to_string())),
               channels.verify());

    let channels = Channels::from_rows(&[], &[]);
    assert!(channels.is_empty());
    assert_eq!(Err(Error::MissingChannel(TIME.to_string())),
               channels.verify());
    assert_eq!(Err(Error::MissingChannel(TIME.to_string())),
               Layout::resolve(&channels));
  }

  #[test]
  fn channel_test() {
    let timestamps: Vec<f64> = (0..42).map(|i| i as f64 * 0.05).collect();
    let data = ChannelData::from_ts(timestamps, vec![0.0; 42]);
    let channel = Channel::new("warbl".to_string(),
                               "garbl".to_string(),
                               data.clone());
    assert_eq!("warbl", channel.name());
    assert_eq!("garbl", channel.unit());
    assert_eq!(20.0, channel.frequency());
    assert_eq!(false, channel.is_empty());
    assert_eq!(42, channel.len());

    let other = Channel::new("foo".to_string(), "bar".to_string(), data);
    assert_ne!(channel, other);

    let short = ChannelData::from_ts(vec![0.0, 0.1], vec![1.0, 2.0]);
    let short = Channel::new("foo".to_string(), "bar".to_string(), short);
    assert_eq!(0.0, short.frequency());
    assert_eq!(vec![(0.0, 1.0), (0.1, 2.0)],
               short.data().clone().into_iter().collect::<Vec<_>>());
  }

  #[test]
  #[should_panic]
  fn channel_data_len_panic_test() {
    let mut data = ChannelData::from_ts(vec![0.0; 42], vec![0.0; 42]);

    // one more timestamp than samples, asking for len must panic
    data.timestamps_mut().push(123.456);
    let _panic = data.len();
  }
}
