//! Cross-module test suites exercising the library through its public API.

mod chart_tests;
