pub mod deployment;

pub use deployment::{
    Container, DeploymentObserver, DeploymentSnapshot, Observation,
    image_key, last_update_key,
};
