//! ARM NEON kernels for 128-bit lane-wise operations.
//!
//! This module lowers lane-wise binary operators on 16-bit lanes to ARM's
//! Advanced SIMD (NEON) instruction set, 8 lanes per instruction. NEON is
//! part of the AArch64 baseline, so no runtime detection is needed.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: Any AArch64 processor
//! - **Target Architecture**: AArch64
//! - **Build Detection**: The build script emits the `neon` cfg when the host supports it
//!
//! # Platform Support
//!
//! - **Apple Silicon**: M1, M2, M3 processors (macOS, iOS)
//! - **AWS Graviton**: Graviton2, Graviton3 processors
//! - **Embedded**: ARM Cortex-A series processors

pub mod i16x8;
