pub mod config;
pub mod discovery;
pub mod error;
pub mod frontend;
pub mod harness;
pub mod profiling;
pub mod registry;
pub mod resources;
pub mod simulator;
pub mod suite;
pub mod tester;
pub mod types;

pub use config::HarnessConfig;
pub use error::{Result, XTestError};
pub use harness::Harness;
pub use registry::TestRegistry;
pub use resources::{ResourceBroker, ResourceHandle, XSIM};
pub use simulator::SimulatorRunner;
pub use suite::TestSuite;
pub use tester::{Comparison, ComparisonTester};
pub use types::*;
