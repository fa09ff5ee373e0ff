pub mod cancel;
pub mod config;
pub mod consts;
pub mod error;
pub mod geometry;
pub mod io;
pub mod record;
pub mod schedule;
pub mod synth;
