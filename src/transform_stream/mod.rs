mod dispatcher;
mod output;

pub use self::dispatcher::{Dispatcher, TokenHandler};
pub use self::output::OutputBuffer;
