//! Integration test modules.

mod round_trip_test;
