pub mod chromium_environment;
pub mod environment;
pub mod js_executor;

pub use chromium_environment::ChromiumEnvironment;
pub use environment::{Locator, UiEnvironment};
pub use js_executor::JsExecutor;
