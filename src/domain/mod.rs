// Domain layer: value objects and ports. Parsing and orchestration live in core.

pub mod model;
pub mod ports;
