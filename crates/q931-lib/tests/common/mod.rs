#![allow(dead_code)]

pub mod component_test;
pub mod sink;

pub use component_test::{ComponentTest, LinkedPair, cause_ies, cause_of, default_test_config, setup_ies};
pub use sink::{Sink, SinkLog};
