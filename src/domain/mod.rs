// Domain layer: models, API payloads and ports. No HTTP or filesystem code here.

pub mod model;
pub mod payload;
pub mod ports;
