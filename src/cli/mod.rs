//! Batch compilation driver and its collaborators.

pub mod args;
pub mod cache;
pub mod config;
pub mod driver;
pub mod engine;
pub mod host;
pub mod output;
pub mod paths;
pub mod reporter;
pub mod resolver;
pub mod source_map;
pub mod task;

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod args_tests;
#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod cache_tests;
#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
#[cfg(test)]
#[path = "tests/driver_tests.rs"]
mod driver_tests;
#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod engine_tests;
#[cfg(test)]
#[path = "tests/output_tests.rs"]
mod output_tests;
#[cfg(test)]
#[path = "tests/paths_tests.rs"]
mod paths_tests;
#[cfg(test)]
#[path = "tests/reporter_tests.rs"]
mod reporter_tests;
#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod resolver_tests;
#[cfg(test)]
#[path = "tests/source_map_tests.rs"]
mod source_map_tests;
#[cfg(test)]
#[path = "tests/task_tests.rs"]
mod task_tests;
#[cfg(test)]
#[path = "tests/test_host.rs"]
mod test_host;
