//! AVX2 kernels for 256-bit lane-wise operations.
//!
//! This module lowers lane-wise binary operators on 16-bit lanes to Intel's
//! Advanced Vector Extensions 2 (AVX2), processing 16 lanes per instruction.
//! AVX2 is available on most Intel processors since Haswell (2013) and AMD
//! processors since Excavator (2015).
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: Intel Haswell (2013+) or AMD Excavator (2015+)
//! - **Target Architecture**: x86 or x86_64
//! - **Build Detection**: The build script emits the `avx2` cfg when the host supports it
//! - **Runtime Detection**: Kernels are only entered after `is_x86_feature_detected!("avx2")`
//!
//! # Available Types
//!
//! - [`i16x16::I16x16`]: 256-bit register holding 16 packed `i16` lanes
//!
//! # Conditional Compilation
//!
//! This module is only compiled when the `avx2` cfg is set. Without it the
//! crate uses the SSE kernels where available and the portable per-lane loop
//! otherwise.

pub mod i16x16;
