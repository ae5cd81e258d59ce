pub mod dispatch;
pub mod reading;
pub mod recording;

pub use dispatch::DispatchHandler;
pub use reading::ReadingHandler;
pub use recording::RecordingHandler;
