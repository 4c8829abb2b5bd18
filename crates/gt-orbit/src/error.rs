use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrbitError {
    #[error("{name}: orbit radius {radius} is below the safe minimum {min}")]
    BelowSafeRadius { name: String, radius: f32, min: f32 },

    #[error("{name}: orbit speed {speed} is not finite")]
    InvalidSpeed { name: String, speed: f32 },

    #[error("no satellite id left for satellite number {count}")]
    TooManySatellites { count: usize },
}

pub type OrbitResult<T> = Result<T, OrbitError>;
