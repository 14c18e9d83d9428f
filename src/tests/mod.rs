mod config_tests;
mod route_compilation_tests;
