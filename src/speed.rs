// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use crate::{channel::Layout, geo::haversine, lap::Lap};
use log::debug;


/// m/s to km/h.
const KMH: f64 = 3.6;


/// Synthesizes the speed channel for all `laps`. See `derive_lap`.
pub fn derive(laps: &mut [Lap], layout: &Layout) {
  for lap in laps.iter_mut() {
    derive_lap(lap, layout);
  }
}

/// Writes the GPS speed in km/h into every sample of `lap`, computed from the
/// distance to and the time since the previous sample.
///
/// The first sample has no predecessor and gets the speed of the second one.
/// If a speed can't be computed because no time passed between two samples,
/// or a position is missing, the previous speed is carried forward (zero if
/// there is none yet). A lap with a single sample stands still.
pub fn derive_lap(lap: &mut Lap, layout: &Layout) {
  let number = lap.number();
  let samples = lap.samples_mut();
  let (time, speed) = (layout.time(), layout.speed());

  let mut previous = 0.0;
  for idx in 1..samples.len() {
    let elapsed = samples[idx].get(time) - samples[idx - 1].get(time);
    let distance = haversine(samples[idx - 1].coordinate(layout),
                             samples[idx].coordinate(layout));

    let value = distance / elapsed * KMH;
    let value = if elapsed > 0.0 && value.is_finite() {
      value
    } else {
      debug!("lap {} sample {}: can't derive speed over {}m in {}s, \
              carrying {} forward",
             number, idx, distance, elapsed, previous);
      previous
    };
    samples[idx].set(speed, value);
    previous = value;
  }

  let first = if samples.len() > 1 {
    samples[1].get(speed)
  } else {
    0.0
  };
  if let Some(sample) = samples.first_mut() {
    sample.set(speed, first);
  }
}
