macro_rules! trace {
    ( @budget $pass:expr, $used:expr, $left:expr ) => {
        #[cfg(feature = "debug_trace")]
        log::trace!(target: "html_tamer", "@{} budget: used={} left={}", $pass, $used, $left);
    };

    ( @suppress $pass:expr, $descr:expr, $depth:expr ) => {
        #[cfg(feature = "debug_trace")]
        log::trace!(target: "html_tamer", "@{} {} (depth: {})", $pass, $descr, $depth);
    };

    ( @token $pass:expr, $token:expr ) => {
        #[cfg(feature = "debug_trace")]
        log::trace!(target: "html_tamer", "@{} token: {:?}", $pass, $token);
    };

    ( @action $pass:expr, $($args:tt)+ ) => {
        #[cfg(feature = "debug_trace")]
        log::trace!(target: "html_tamer", "@{} {}", $pass, format_args!($($args)+));
    };
}
