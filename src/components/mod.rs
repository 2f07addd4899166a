pub mod network_diagram;
