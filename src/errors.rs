//! Error types shared by every module of the crate.
//!
//! `error_chain!` creates the `Error`, `ErrorKind`, `ResultExt` and `Result` types.
//! `Result` is a typedef of std `Result` with the error type our own `Error`.

use error_chain::error_chain;

error_chain! {
    errors {
        NotFound(value: String) {
            description("value is not a member of the collection")
            display("value is not a member of the collection: {}", value)
        }
        EmptyCollection {
            description("cannot sample from an empty collection")
            display("cannot sample from an empty collection")
        }
        InvalidArgument(reason: String) {
            description("invalid argument")
            display("invalid argument: {}", reason)
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn error_display_names_the_offending_value() {
        let e: Error = ErrorKind::NotFound("42".to_string()).into();
        assert_eq!(e.to_string(), "value is not a member of the collection: 42");

        let e: Error = ErrorKind::InvalidArgument("width must be positive".to_string()).into();
        assert_eq!(e.to_string(), "invalid argument: width must be positive");
    }
}
