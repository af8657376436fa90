// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Jonas Reitemeyer <alumni@bmc-labs.com>
//   Florian Eich <florian@bmc-labs.com>

use crate::{channel::{Channel, ChannelData, Channels, Layout, DISTANCE, TIME},
            geo::Coordinate};
use getset::{CopyGetters, Getters};
use serde::Serialize;


/// All channel values logged at one instant, in the order of the session's
/// `Channels`. Time is relative to the start of the lap.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Sample(Vec<f64>);

impl Sample {
  pub fn new(values: Vec<f64>) -> Self {
    Self(values)
  }

  /// Value of the channel at position `idx`, NaN if the sample doesn't have
  /// one.
  pub fn get(&self, idx: usize) -> f64 {
    self.0.get(idx).copied().unwrap_or(f64::NAN)
  }

  /// Value of channel `name`.
  pub fn value(&self, channels: &Channels, name: &str) -> Option<f64> {
    channels.position(name).map(|idx| self.get(idx))
  }

  pub(crate) fn set(&mut self, idx: usize, value: f64) {
    if idx >= self.0.len() {
      self.0.resize(idx + 1, f64::NAN);
    }
    self.0[idx] = value;
  }

  pub(crate) fn coordinate(&self, layout: &Layout) -> Coordinate {
    Coordinate::new(self.get(layout.latitude()), self.get(layout.longitude()))
  }

  /// Pairs every value with its channel name.
  pub fn named<'a>(&'a self,
                   channels: &'a Channels)
                   -> impl Iterator<Item = (&'a str, f64)> + 'a {
    channels.names().iter().map(String::as_str).zip(self.values())
  }

  pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
    self.0.iter().copied()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}


/// One lap of a session with all its samples.
#[derive(Clone, Debug, PartialEq, CopyGetters, Getters, Serialize)]
pub struct Lap {
  #[getset(get_copy = "pub")]
  number:       usize,
  /// Start of the lap within the session, in seconds.
  #[getset(get_copy = "pub")]
  start:        f64,
  #[getset(get_copy = "pub")]
  duration:     f64,
  #[getset(get_copy = "pub")]
  is_reference: bool,
  #[getset(get = "pub")]
  samples:      Vec<Sample>,
}

impl Lap {
  pub fn new(number: usize,
             start: f64,
             duration: f64,
             samples: Vec<Sample>)
             -> Self {
    Self { number,
           start,
           duration,
           is_reference: false,
           samples }
  }

  pub(crate) fn samples_mut(&mut self) -> &mut [Sample] {
    &mut self.samples
  }

  pub(crate) fn set_number(&mut self, number: usize) {
    self.number = number;
  }

  pub(crate) fn set_as_reference(&mut self) {
    self.is_reference = true;
  }

  /// Collects the values of channel `name` into a `Channel`, using the lap
  /// relative time as timestamps.
  pub fn channel(&self, channels: &Channels, name: &str) -> Option<Channel> {
    let idx = channels.position(name)?;
    let time = channels.position(TIME)?;

    let timestamps = self.samples.iter().map(|s| s.get(time)).collect();
    let samples = self.samples.iter().map(|s| s.get(idx)).collect();
    Some(Channel::new(name.to_string(),
                      channels.unit(idx).unwrap_or_default().to_string(),
                      ChannelData::from_ts(timestamps, samples)))
  }

  /// Distance covered along the reference track at the last sample, if the
  /// session has a distance channel.
  pub fn length(&self, channels: &Channels) -> Option<f64> {
    let distance = channels.position(DISTANCE)?;
    self.samples.last().map(|sample| sample.get(distance))
  }

  pub fn len(&self) -> usize {
    self.samples.len()
  }

  pub fn is_empty(&self) -> bool {
    self.samples.is_empty()
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::channel::SPEED;
  use pretty_assertions::assert_eq;


  macro_rules! stringvec {
    ($($x:literal),* $(,)?) => (vec![$($x.to_string()),*]);
  }

  fn channels() -> Channels {
    Channels::from_rows(&stringvec!["Time", "GPS Latitude", "GPS Longitude",
                                    "Distance"],
                        &stringvec!["s", "deg", "deg", "m"])
  }

  fn lap() -> Lap {
    Lap::new(2,
             145.156,
             133.135,
             vec![Sample::new(vec![0.0, 52.0, 11.0, 0.0]),
                  Sample::new(vec![0.1, 52.0001, 11.0, 11.1]),
                  Sample::new(vec![0.2, 52.0002, 11.0, 22.2])])
  }

  #[test]
  fn lap_test() {
    let lap = lap();
    assert_eq!(2, lap.number());
    assert_eq!(145.156, lap.start());
    assert_eq!(133.135, lap.duration());
    assert_eq!(false, lap.is_reference());
    assert_eq!(3, lap.len());
    assert_eq!(Some(22.2), lap.length(&channels()));

    let distance = lap.channel(&channels(), DISTANCE).unwrap();
    assert_eq!("Distance", distance.name());
    assert_eq!("m", distance.unit());
    assert_eq!(&vec![0.0, 0.1, 0.2], distance.data().timestamps());
    assert_eq!(&vec![0.0, 11.1, 22.2], distance.data().samples());
    assert_eq!(10.0, distance.frequency());

    assert_eq!(None, lap.channel(&channels(), SPEED));
  }

  #[test]
  fn sample_test() {
    let channels = channels();
    let mut sample = Sample::new(vec![0.5, 52.0, 11.0]);
    assert_eq!(Some(0.5), sample.value(&channels, "Time"));
    assert_eq!(None, sample.value(&channels, "RPM"));
    assert!(sample.get(3).is_nan());

    sample.set(3, 42.0);
    assert_eq!(4, sample.len());
    assert_eq!(vec![("Time", 0.5),
                    ("GPS Latitude", 52.0),
                    ("GPS Longitude", 11.0),
                    ("Distance", 42.0)],
               sample.named(&channels).collect::<Vec<_>>());

    sample.set(6, 1.0);
    assert_eq!(7, sample.len());
    assert!(sample.get(5).is_nan());
  }
}
