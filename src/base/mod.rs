mod references;

pub use self::references::*;
