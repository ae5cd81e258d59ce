pub mod channel;
pub mod events;
pub mod results;
pub mod sample;

pub use channel::Channel;
pub use events::IngestEvent;
pub use results::TickReport;
pub use sample::Sample;
