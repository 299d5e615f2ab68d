use super::TagVisitor;
use crate::{HandlerResult, Tag};

/// Broadcasts every event to several visitors, sequentially in registration
/// order. The first error stops the broadcast and is returned.
#[derive(Default)]
pub struct TagVisitorChain<'v> {
    visitors: Vec<Box<dyn TagVisitor + 'v>>,
}

impl<'v> TagVisitorChain<'v> {
    #[inline]
    pub fn new() -> Self {
        TagVisitorChain::default()
    }

    #[inline]
    pub fn push(&mut self, visitor: impl TagVisitor + 'v) -> &mut Self {
        self.visitors.push(Box::new(visitor));

        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }

    #[inline]
    fn broadcast(
        &mut self,
        mut event: impl FnMut(&mut dyn TagVisitor) -> HandlerResult,
    ) -> HandlerResult {
        self.visitors.iter_mut().try_for_each(|v| event(&mut **v))
    }
}

impl<'v> FromIterator<Box<dyn TagVisitor + 'v>> for TagVisitorChain<'v> {
    fn from_iter<I: IntoIterator<Item = Box<dyn TagVisitor + 'v>>>(iter: I) -> Self {
        TagVisitorChain {
            visitors: iter.into_iter().collect(),
        }
    }
}

impl TagVisitor for TagVisitorChain<'_> {
    fn start(&mut self) -> HandlerResult {
        self.broadcast(|v| v.start())
    }

    fn end(&mut self) -> HandlerResult {
        self.broadcast(|v| v.end())
    }

    fn tag(&mut self, tag: &mut Tag<'_>) -> HandlerResult {
        self.broadcast(|v| v.tag(tag))
    }

    fn script(&mut self, tag: &mut Tag<'_>, body: &str) -> HandlerResult {
        self.broadcast(|v| v.script(tag, body))
    }

    fn xmp(&mut self, tag: &mut Tag<'_>, body: &str) -> HandlerResult {
        self.broadcast(|v| v.xmp(tag, body))
    }

    fn comment(&mut self, comment: &str) -> HandlerResult {
        self.broadcast(|v| v.comment(comment))
    }

    fn text(&mut self, text: &str) -> HandlerResult {
        self.broadcast(|v| v.text(text))
    }

    fn cdata(&mut self, cdata: &str) -> HandlerResult {
        self.broadcast(|v| v.cdata(cdata))
    }

    fn xml(&mut self, tag: &mut Tag<'_>) -> HandlerResult {
        self.broadcast(|v| v.xml(tag))
    }

    fn directive(&mut self, directive: &str) -> HandlerResult {
        self.broadcast(|v| v.directive(directive))
    }

    fn cond_comment_start(
        &mut self,
        expression: &str,
        downlevel_hidden: bool,
        additional: bool,
    ) -> HandlerResult {
        self.broadcast(|v| v.cond_comment_start(expression, downlevel_hidden, additional))
    }

    fn cond_comment_end(
        &mut self,
        expression: &str,
        downlevel_hidden: bool,
        additional: bool,
    ) -> HandlerResult {
        self.broadcast(|v| v.cond_comment_end(expression, downlevel_hidden, additional))
    }

    fn error(&mut self, message: &str) -> HandlerResult {
        self.broadcast(|v| v.error(message))
    }
}
