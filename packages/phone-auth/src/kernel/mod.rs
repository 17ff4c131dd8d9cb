pub mod countdown;
pub mod deps;
pub mod event_channel;
pub mod fake_auth_backend;
pub mod state;
pub mod test_dependencies;
pub mod traits;

pub use countdown::Countdown;
pub use deps::AuthDeps;
pub use event_channel::EventChannel;
pub use fake_auth_backend::FakeAuthBackend;
pub use state::StateHolder;
pub use test_dependencies::{BackendCall, MockAuthBackend, MockReply};
pub use traits::BaseAuthBackend;
