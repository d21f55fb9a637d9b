pub mod config_cmd;
pub mod estimate_cmd;
pub mod output;
pub mod prices_cmd;
pub mod renderer;
pub mod selector;
pub mod workload_cmd;
