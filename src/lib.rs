//! # PCL soft font tool
//!
//! Command line front end for the [`pcl`] and [`ttf2pcl`] crates.

pub mod cli;
