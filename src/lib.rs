//! Locate an IP address and plot it on a Braille terminal world map.

pub mod app;
pub mod braille;
pub mod cli;
pub mod data;
pub mod location;
pub mod logging;
pub mod lookup;
pub mod map;
pub mod ui;
