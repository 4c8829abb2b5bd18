use gt_core::GtError;
use gt_mobility::MobilityError;
use gt_orbit::OrbitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] GtError),

    #[error("orbit setup failed: {0}")]
    Orbit(#[from] OrbitError),

    #[error("vehicle launch failed: {0}")]
    Mobility(#[from] MobilityError),
}

pub type SimResult<T> = Result<T, SimError>;
