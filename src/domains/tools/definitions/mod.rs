//! Action definitions, one module tree per AWS service.
//!
//! Each service module exposes `registry()`, built from an explicit list of
//! its definition files.

pub mod ebs;
pub mod ec2;
pub mod vpc;
