pub mod threaded_live_runner;
