//! Scoring: path-length normalisation and batch scoring over a fit forest.

mod normalize;
mod scorer;

pub use normalize::{EULER_GAMMA, anomaly_score, average_path_length, harmonic};
pub use scorer::Scorer;
