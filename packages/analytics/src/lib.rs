#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Kilometer-segment aggregation of highway accident records.
//!
//! Every function here is a pure transform over an immutable record slice:
//! filter by the highway's valid kilometer range, partition into
//! fixed-width kilometer bins, aggregate, and rank. A presentation host
//! calls [`view::compute_view`] on each selection change and renders the
//! returned [`ViewModel`](accident_map_analytics_models::ViewModel).

pub mod binning;
pub mod classify;
pub mod filter;
pub mod ranking;
pub mod view;

#[cfg(test)]
mod fixtures;
