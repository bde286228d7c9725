//! SSE4.1 kernels for 128-bit lane-wise operations.
//!
//! The 128-bit x86 counterpart of the AVX2 kernels: 8 i16 lanes per
//! instruction. Used on hosts without AVX2 and for the 8-lane tail of
//! operands the 256-bit kernel leaves behind.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: Intel Penryn (2007+) or AMD Bulldozer (2011+)
//! - **Target Architecture**: x86 or x86_64
//! - **Build Detection**: Compiled under the `sse` or `avx2` cfg
//! - **Runtime Detection**: Kernels are only entered after `is_x86_feature_detected!("sse4.1")`

pub mod i16x8;
