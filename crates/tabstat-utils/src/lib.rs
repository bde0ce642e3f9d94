pub mod background_runner;
pub mod semaphore;

pub use background_runner::BackgroundRunner;
pub use semaphore::Semaphore;
