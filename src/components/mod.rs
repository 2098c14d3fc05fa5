//! Reusable view components.

pub mod network_graph;
