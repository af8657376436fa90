// Copyright 2021 bmc::labs Gmbh. All rights reserved.
//
// Authors:
//   Florian Eich <florian@bmc-labs.com>
//   Jonas Reitemeyer <alumni@bmc-labs.com>

use getset::CopyGetters;
use serde::{Deserialize, Serialize};


/// Mean earth radius in metres.
pub const EARTH_RADIUS: f64 = 6_371_000.0;


/// A position in degrees as logged by the GPS module.
#[derive(Clone, Copy, Debug, Default, PartialEq, CopyGetters, Deserialize,
         Serialize)]
#[getset(get_copy = "pub")]
pub struct Coordinate {
  latitude:  f64,
  longitude: f64,
}

impl Coordinate {
  pub fn new(latitude: f64, longitude: f64) -> Self {
    Self { latitude,
           longitude }
  }

  /// Great circle distance to `other` in metres.
  pub fn distance_to(&self, other: &Coordinate) -> f64 {
    haversine(*self, *other)
  }

  pub fn is_valid(&self) -> bool {
    self.latitude.is_finite() && self.longitude.is_finite()
  }
}


/// Distance between `a` and `b` in metres on a spherical earth.
///
/// The intermediate term is clamped to `[0, 1]`; floating point noise would
/// otherwise make `sqrt(1 - a)` NaN for (almost) antipodal points. Equal
/// points yield exactly `0.0`, a coordinate without GPS fix (NaN) yields NaN.
pub fn haversine(a: Coordinate, b: Coordinate) -> f64 {
  let (phi_a, phi_b) = (a.latitude.to_radians(), b.latitude.to_radians());
  let delta_phi = (b.latitude - a.latitude).to_radians();
  let delta_lambda = (b.longitude - a.longitude).to_radians();

  let h = (delta_phi / 2.0).sin().powi(2)
          + phi_a.cos() * phi_b.cos() * (delta_lambda / 2.0).sin().powi(2);
  let h = h.clamp(0.0, 1.0);

  EARTH_RADIUS * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}
