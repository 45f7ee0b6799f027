// Domain layer: the user model and the ports the adapter implements.

pub mod model;
pub mod ports;
