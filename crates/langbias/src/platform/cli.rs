//! Native platform: deterministic stand-ins for host capabilities.

pub mod viewport;
