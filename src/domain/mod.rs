pub mod model;
pub mod guard;
pub mod solver;
pub mod endpoint;
pub mod report;
pub mod diagnostics;
pub mod ports;
pub mod call_graph;
