macro_rules! trace {
    ( @token $token:expr, $raw:expr ) => {
        #[cfg(feature = "debug_trace")]
        println!("@token: {:?} {:?}", $token, $raw);
    };

    ( @raw_text $name:expr, $body:expr ) => {
        #[cfg(feature = "debug_trace")]
        println!("@raw_text <{}>: {:?}", $name, $body);
    };

    ( @pushback $lexeme:expr ) => {
        #[cfg(feature = "debug_trace")]
        println!("@pushback: {:?}", $lexeme);
    };

    ( @selector $token:expr ) => {
        #[cfg(feature = "debug_trace")]
        println!("@selector: {:?}", $token);
    };
}
