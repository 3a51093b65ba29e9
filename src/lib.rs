//! camlab library crate.
//!
//! Integer-arithmetic image processing that mirrors a microcontroller
//! camera pipeline, plus the framing and file adapters around it:
//!
//! - [`image`] - explicit row-major image buffers
//! - [`process`] - grayscale reduction, histogram thresholding, resampling
//! - [`frame`] - serial link framing (`0xAA 0x55` + length + payload)
//! - [`raster`] - JPEG/PNG decoding and encoding
//! - [`config`] / [`cli`] - configuration file and command-line front end

pub mod cli;
pub mod config;
pub mod frame;
pub mod image;
pub mod process;
pub mod raster;
