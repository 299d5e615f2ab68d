use super::TagVisitor;
use crate::{HandlerResult, Tag};

pub trait OutputSink {
    fn handle_chunk(&mut self, chunk: &str);
}

impl<F: FnMut(&str)> OutputSink for F {
    #[inline]
    fn handle_chunk(&mut self, chunk: &str) {
        self(chunk);
    }
}

/// Renders visited events back into markup.
///
/// Unmodified tags are written verbatim, so for well-formed input without
/// raw text edge cases the output is identical to the parsed input.
pub struct TagWriter<O: OutputSink> {
    output_sink: O,
}

impl<O: OutputSink> TagWriter<O> {
    #[inline]
    pub fn new(output_sink: O) -> Self {
        TagWriter { output_sink }
    }

    #[inline]
    pub fn into_output_sink(self) -> O {
        self.output_sink
    }

    #[inline]
    fn write(&mut self, chunk: &str) {
        self.output_sink.handle_chunk(chunk);
    }

    #[inline]
    fn write_tag(&mut self, tag: &Tag<'_>) {
        tag.serialize(&mut |chunk| self.output_sink.handle_chunk(chunk));
    }

    fn write_raw_text_element(&mut self, tag: &Tag<'_>, body: &str) {
        self.write_tag(tag);
        self.write(body);
        self.write("</");
        self.write(tag.name());
        self.write(">");
    }
}

impl<O: OutputSink> TagVisitor for TagWriter<O> {
    fn tag(&mut self, tag: &mut Tag<'_>) -> HandlerResult {
        self.write_tag(tag);

        Ok(())
    }

    fn script(&mut self, tag: &mut Tag<'_>, body: &str) -> HandlerResult {
        self.write_raw_text_element(tag, body);

        Ok(())
    }

    fn xmp(&mut self, tag: &mut Tag<'_>, body: &str) -> HandlerResult {
        self.write_raw_text_element(tag, body);

        Ok(())
    }

    fn comment(&mut self, comment: &str) -> HandlerResult {
        self.write("<!--");
        self.write(comment);
        self.write("-->");

        Ok(())
    }

    fn text(&mut self, text: &str) -> HandlerResult {
        self.write(text);

        Ok(())
    }

    fn cdata(&mut self, cdata: &str) -> HandlerResult {
        self.write("<![CDATA[");
        self.write(cdata);
        self.write("]]>");

        Ok(())
    }

    fn xml(&mut self, tag: &mut Tag<'_>) -> HandlerResult {
        self.write_tag(tag);

        Ok(())
    }

    fn directive(&mut self, directive: &str) -> HandlerResult {
        self.write("<!");
        self.write(directive);
        self.write(">");

        Ok(())
    }

    fn cond_comment_start(
        &mut self,
        expression: &str,
        downlevel_hidden: bool,
        additional: bool,
    ) -> HandlerResult {
        self.write(if downlevel_hidden { "<!--[" } else { "<![" });
        self.write(expression);
        self.write("]>");

        if additional {
            self.write("<!-->");
        }

        Ok(())
    }

    fn cond_comment_end(
        &mut self,
        expression: &str,
        downlevel_hidden: bool,
        additional: bool,
    ) -> HandlerResult {
        if additional {
            self.write("<!--");
        }

        self.write("<![");
        self.write(expression);
        self.write(if downlevel_hidden { "]-->" } else { "]>" });

        Ok(())
    }
}
