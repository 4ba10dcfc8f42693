// Domain layer: request-scoped models and the ports the orchestrator talks to.

pub mod model;
pub mod ports;
