// Page state: upload selection, request lifecycle, evaluator card expansion.
// The analysis call itself goes through analysis::Analyzer; nothing here
// touches the network.

pub mod controller;
pub mod handlers;
pub mod upload;

pub use controller::{PageController, SharedPage};
