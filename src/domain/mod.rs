// Domain layer: payload types and ports (interfaces) to the outside world.

pub mod model;
pub mod ports;
