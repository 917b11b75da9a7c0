//! Unit test modules.

mod csv_parser_test;
mod outlier_test;
mod record_detection_test;
