mod schema_tests;
mod throughput_tests;
