use crate::{FlightPath, KinematicData};

/// Samples a flight path at `count` evenly spaced times in `[from, to]`.
pub fn poll_path(path: &FlightPath, from: f64, to: f64, count: usize) -> Vec<(f64, KinematicData)> {
    (0..count)
        .map(|i| {
            let t = from + (to - from) * i as f64 / (count - 1) as f64;
            let state = path.predict(t).expect("poll times are finite");
            (t, state)
        })
        .collect()
}
