//! RNG plumbing, the three sampler kernels, the Algorithm S / Algorithm EE
//! estimator and the fixed-θ simulator (spec §4.4–4.6).

pub mod estimator;
pub mod rng;
pub mod sampler;
pub mod simulator;

pub use estimator::{run_algorithm_ee, run_algorithm_s, EstimationOutcome, EstimatorConfig, ThetaUpdateRule, TraceRecord};
pub use rng::{seeded, ChainRng};
pub use sampler::{Basic, Ifd, Sampler, SamplerConfig, SweepOutcome, Tnt};
pub use simulator::{simulate, SimulationConfig};
