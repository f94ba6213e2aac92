//! UI components.

pub mod particle_fx;
