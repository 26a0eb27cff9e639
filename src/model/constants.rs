// Model constants
pub const BASELINE_RATING: f64 = 20.0;
/// Rating gap that shifts the odds by a factor of ten.
pub const ELO_SCALE: f64 = 400.0;
/// Returned whenever either side of a prediction is unrated.
pub const UNKNOWN_PREDICTION: f64 = 0.5;

// Training defaults
pub const DEFAULT_NEIGHBOR_REGULARIZATION: f64 = 0.05;
pub const DEFAULT_MAX_ITER: usize = 1000;
pub const DEFAULT_LEARNING_RATE: f64 = 10.0;
pub const DEFAULT_CONSTANT_FRACTION: f64 = 0.1;
pub const DEFAULT_MIN_WEIGHT: f64 = 0.0;
pub const DEFAULT_PATIENCE: usize = 250;
pub const DEFAULT_SEED: u64 = 1334;

// Learning rate schedule
pub const SCHEDULE_EXPONENT: f64 = 0.602;
pub const SCHEDULE_OFFSET_FRACTION: f64 = 0.1;
