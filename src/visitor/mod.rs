macro_rules! impl_forwarding_visitor {
    ($self:ident => $target:expr) => {
        fn start(&mut $self) -> $crate::HandlerResult {
            $target.start()
        }

        fn end(&mut $self) -> $crate::HandlerResult {
            $target.end()
        }

        fn tag(&mut $self, tag: &mut $crate::Tag<'_>) -> $crate::HandlerResult {
            $target.tag(tag)
        }

        fn script(&mut $self, tag: &mut $crate::Tag<'_>, body: &str) -> $crate::HandlerResult {
            $target.script(tag, body)
        }

        fn xmp(&mut $self, tag: &mut $crate::Tag<'_>, body: &str) -> $crate::HandlerResult {
            $target.xmp(tag, body)
        }

        fn comment(&mut $self, comment: &str) -> $crate::HandlerResult {
            $target.comment(comment)
        }

        fn text(&mut $self, text: &str) -> $crate::HandlerResult {
            $target.text(text)
        }

        fn cdata(&mut $self, cdata: &str) -> $crate::HandlerResult {
            $target.cdata(cdata)
        }

        fn xml(&mut $self, tag: &mut $crate::Tag<'_>) -> $crate::HandlerResult {
            $target.xml(tag)
        }

        fn directive(&mut $self, directive: &str) -> $crate::HandlerResult {
            $target.directive(directive)
        }

        fn cond_comment_start(
            &mut $self,
            expression: &str,
            downlevel_hidden: bool,
            additional: bool,
        ) -> $crate::HandlerResult {
            $target.cond_comment_start(expression, downlevel_hidden, additional)
        }

        fn cond_comment_end(
            &mut $self,
            expression: &str,
            downlevel_hidden: bool,
            additional: bool,
        ) -> $crate::HandlerResult {
            $target.cond_comment_end(expression, downlevel_hidden, additional)
        }

        fn error(&mut $self, message: &str) -> $crate::HandlerResult {
            $target.error(message)
        }
    };
}

mod adapter;
mod chain;
mod writer;

use crate::parser::Tag;
use std::error::Error;

pub use self::adapter::TagAdapter;
pub use self::chain::TagVisitorChain;
pub use self::writer::{OutputSink, TagWriter};

/// Result of a visitor callback. Returning an error terminates the current
/// parse with [`ParsingError::HandlerError`](crate::ParsingError::HandlerError).
pub type HandlerResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Receiver of the events produced by the [`Parser`](crate::Parser).
///
/// Every callback has a no-op default, so implementors only override the
/// events they care about.
#[allow(unused_variables)]
pub trait TagVisitor {
    fn start(&mut self) -> HandlerResult {
        Ok(())
    }

    fn end(&mut self) -> HandlerResult {
        Ok(())
    }

    fn tag(&mut self, tag: &mut Tag<'_>) -> HandlerResult {
        Ok(())
    }

    /// A `<script>` start tag with the verbatim body up to its end tag.
    fn script(&mut self, tag: &mut Tag<'_>, body: &str) -> HandlerResult {
        Ok(())
    }

    /// An `<xmp>` start tag with the verbatim body up to its end tag.
    fn xmp(&mut self, tag: &mut Tag<'_>, body: &str) -> HandlerResult {
        Ok(())
    }

    fn comment(&mut self, comment: &str) -> HandlerResult {
        Ok(())
    }

    fn text(&mut self, text: &str) -> HandlerResult {
        Ok(())
    }

    fn cdata(&mut self, cdata: &str) -> HandlerResult {
        Ok(())
    }

    /// An XML declaration or processing instruction, `<?name ...?>`.
    fn xml(&mut self, tag: &mut Tag<'_>) -> HandlerResult {
        Ok(())
    }

    fn directive(&mut self, directive: &str) -> HandlerResult {
        Ok(())
    }

    /// Start of a conditional comment. `expression` is the text between the
    /// brackets, e.g. `if IE`. `additional` is set for the `<!--[if !IE]><!-->`
    /// form.
    fn cond_comment_start(
        &mut self,
        expression: &str,
        downlevel_hidden: bool,
        additional: bool,
    ) -> HandlerResult {
        Ok(())
    }

    /// End of a conditional comment. `additional` is set for the
    /// `<!--<![endif]-->` form.
    fn cond_comment_end(
        &mut self,
        expression: &str,
        downlevel_hidden: bool,
        additional: bool,
    ) -> HandlerResult {
        Ok(())
    }

    /// Recoverable markup error. Parsing continues after the callback.
    fn error(&mut self, message: &str) -> HandlerResult {
        Ok(())
    }
}

impl<V: TagVisitor + ?Sized> TagVisitor for &mut V {
    impl_forwarding_visitor!(self => (**self));
}

impl<V: TagVisitor + ?Sized> TagVisitor for Box<V> {
    impl_forwarding_visitor!(self => (**self));
}
