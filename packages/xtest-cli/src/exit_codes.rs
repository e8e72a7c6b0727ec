pub const SUCCESS: i32 = 0;
/// Bad arguments, config, missing fixtures
pub const INPUT_ERROR: i32 = 1;
pub const SIMULATOR_NOT_FOUND: i32 = 2;
pub const EXECUTION_ERROR: i32 = 3;
/// At least one test failed or errored
pub const TEST_FAILURE: i32 = 4;
