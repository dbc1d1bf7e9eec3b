//! React Native bundle lookup and analysis.
//!
//! The bundle is the JavaScript blob packaged inside the APK. It is searched once per recovery
//! in the extraction directory and then used by the beautify, analysis and visualizer steps.

pub mod analysis;
pub mod locator;

pub use self::{
    analysis::{analyze, BundleAnalysis},
    locator::{find_bundle, BundleCache},
};
