#![allow(dead_code)]

pub use zapret_adapter_test_utils::builders;
pub use zapret_adapter_test_utils::clock;
pub use zapret_adapter_test_utils::fake_process;
pub use zapret_adapter_test_utils::{init_tracing, with_timeout};
