//! Decoding colored point clouds from PLY files.
//!
//! The main entry points are [`ply::open`] and [`ply::read`], which return a
//! [`PointCloud`]. Use [`ply::Reader`] if you want to look at the header
//! before decoding the body, and [`ply::Config`] to write point clouds.

pub mod parse;
pub mod ply;
mod cloud;

pub use self::cloud::{Point, PointCloud};
