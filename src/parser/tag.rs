use crate::base::Position;
use std::borrow::Cow;
use std::fmt::{self, Display};

/// Shape of a tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TagType {
    Start,
    End,
    SelfClosing,
}

impl TagType {
    #[inline]
    pub fn start_mark(self) -> &'static str {
        match self {
            TagType::Start | TagType::SelfClosing => "<",
            TagType::End => "</",
        }
    }

    #[inline]
    pub fn end_mark(self) -> &'static str {
        match self {
            TagType::Start | TagType::End => ">",
            TagType::SelfClosing => "/>",
        }
    }

    /// Whether the tag opens a nesting level.
    #[inline]
    pub fn opens(self) -> bool {
        matches!(self, TagType::Start | TagType::SelfClosing)
    }

    /// Whether the tag closes a nesting level.
    #[inline]
    pub fn closes(self) -> bool {
        matches!(self, TagType::End | TagType::SelfClosing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'i> {
    name: Cow<'i, str>,
    value: Option<Cow<'i, str>>,
}

impl<'i> Attribute<'i> {
    #[inline]
    pub(crate) fn new(name: Cow<'i, str>, value: Option<Cow<'i, str>>) -> Self {
        Attribute { name, value }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of the attribute, `None` for boolean attributes.
    #[inline]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Value with the `&quot;` escapes produced for single-quoted values
    /// turned back into `"`.
    pub fn unescaped_value(&self) -> Option<Cow<'_, str>> {
        self.value.as_deref().map(|value| {
            if value.contains("&quot;") {
                Cow::Owned(value.replace("&quot;", "\""))
            } else {
                Cow::Borrowed(value)
            }
        })
    }

    // NOTE: not a `ToOwned` implementation, since the result has a
    // different lifetime than `self`.
    pub fn to_owned(&self) -> Attribute<'static> {
        Attribute {
            name: Cow::Owned(self.name.to_string()),
            value: self.value.as_ref().map(|v| Cow::Owned(v.to_string())),
        }
    }

    fn serialize(&self, output_handler: &mut dyn FnMut(&str)) {
        output_handler(&self.name);

        if let Some(value) = &self.value {
            output_handler("=\"");
            output_handler(value);
            output_handler("\"");
        }
    }
}

#[inline]
fn names_eq(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.eq_ignore_ascii_case(b)
    }
}

/// The tag currently being visited.
///
/// A tag borrows from the parsed input and is only valid for the duration of
/// the visitor callback that received it. Use [`Tag::to_owned`] to keep a copy.
///
/// Any modification drops the original source text of the tag, after which
/// the tag is serialized from its current name and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'i> {
    name: Cow<'i, str>,
    tag_type: TagType,
    xml_declaration: bool,
    attributes: Vec<Attribute<'i>>,
    raw: Option<Cow<'i, str>>,
    position: Position,
    depth: usize,
}

impl<'i> Tag<'i> {
    pub(crate) fn new(
        name: &'i str,
        tag_type: TagType,
        xml_declaration: bool,
        attributes: Vec<Attribute<'i>>,
        raw: &'i str,
        position: Position,
        depth: usize,
    ) -> Self {
        Tag {
            name: Cow::Borrowed(name),
            tag_type,
            xml_declaration,
            attributes,
            raw: Some(Cow::Borrowed(raw)),
            position,
            depth,
        }
    }

    #[inline]
    pub(crate) fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    #[inline]
    pub(crate) fn into_attributes(self) -> Vec<Attribute<'i>> {
        self.attributes
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn set_name(&mut self, name: impl Into<Cow<'i, str>>) {
        self.name = name.into();
        self.raw = None;
    }

    #[inline]
    pub fn tag_type(&self) -> TagType {
        self.tag_type
    }

    #[inline]
    pub fn set_tag_type(&mut self, tag_type: TagType) {
        self.tag_type = tag_type;
        self.raw = None;
    }

    /// Whether the tag is an XML declaration or processing instruction
    /// (`<?name ...?>`).
    #[inline]
    pub fn is_xml_declaration(&self) -> bool {
        self.xml_declaration
    }

    /// Nesting depth of the tag, top-level tags have depth 1.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Source text of the tag, `None` once the tag has been modified.
    #[inline]
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    #[inline]
    pub fn is_modified(&self) -> bool {
        self.raw.is_none()
    }

    /// Forces the tag to be rebuilt from its parts on serialization.
    #[inline]
    pub fn set_modified(&mut self) {
        self.raw = None;
    }

    #[inline]
    pub fn attributes(&self) -> &[Attribute<'i>] {
        &self.attributes
    }

    #[inline]
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn attribute_name(&self, index: usize) -> &str {
        self.attributes[index].name()
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn attribute_value_at(&self, index: usize) -> Option<&str> {
        self.attributes[index].value()
    }

    pub fn attribute_index(&self, name: &str, case_sensitive: bool) -> Option<usize> {
        self.attributes
            .iter()
            .position(|a| names_eq(&a.name, name, case_sensitive))
    }

    #[inline]
    pub fn has_attribute(&self, name: &str, case_sensitive: bool) -> bool {
        self.attribute_index(name, case_sensitive).is_some()
    }

    /// Value of the first attribute with the given name. Returns `None` both
    /// for missing and for boolean attributes, use [`Tag::has_attribute`] to
    /// tell them apart.
    pub fn attribute_value(&self, name: &str, case_sensitive: bool) -> Option<&str> {
        self.attribute_index(name, case_sensitive)
            .and_then(|i| self.attributes[i].value())
    }

    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.attribute_value("id", false)
    }

    pub fn add_attribute(&mut self, name: &str, value: Option<&str>) {
        self.attributes.push(Attribute::new(
            Cow::Owned(name.to_string()),
            value.map(|v| Cow::Owned(v.to_string())),
        ));

        self.raw = None;
    }

    /// Sets the value of the first attribute with the given name, or appends
    /// a new attribute if there is none.
    pub fn set_attribute(&mut self, name: &str, case_sensitive: bool, value: Option<&str>) {
        match self.attribute_index(name, case_sensitive) {
            Some(index) => self.set_attribute_value_at(index, value),
            None => self.add_attribute(name, value),
        }
    }

    /// Sets the value of an existing attribute, returns `false` if there is
    /// no attribute with the given name.
    pub fn set_attribute_value(
        &mut self,
        name: &str,
        case_sensitive: bool,
        value: Option<&str>,
    ) -> bool {
        match self.attribute_index(name, case_sensitive) {
            Some(index) => {
                self.set_attribute_value_at(index, value);
                true
            }
            None => false,
        }
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set_attribute_value_at(&mut self, index: usize, value: Option<&str>) {
        self.attributes[index].value = value.map(|v| Cow::Owned(v.to_string()));
        self.raw = None;
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set_attribute_name_at(&mut self, index: usize, name: &str) {
        self.attributes[index].name = Cow::Owned(name.to_string());
        self.raw = None;
    }

    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_attribute_at(&mut self, index: usize) {
        self.attributes.remove(index);
        self.raw = None;
    }

    /// Removes the first attribute with the given name.
    pub fn remove_attribute(&mut self, name: &str, case_sensitive: bool) -> bool {
        match self.attribute_index(name, case_sensitive) {
            Some(index) => {
                self.remove_attribute_at(index);
                true
            }
            None => false,
        }
    }

    #[inline]
    fn marks(&self) -> (&'static str, &'static str) {
        if self.xml_declaration {
            ("<?", "?>")
        } else {
            (self.tag_type.start_mark(), self.tag_type.end_mark())
        }
    }

    /// Writes the tag: the source text if the tag is unmodified, otherwise
    /// the tag rebuilt from its parts.
    pub fn serialize(&self, output_handler: &mut dyn FnMut(&str)) {
        match self.raw() {
            Some(raw) => output_handler(raw),
            None => self.serialize_from_parts(output_handler),
        }
    }

    /// Writes the tag rebuilt from its current name and attributes.
    pub fn serialize_from_parts(&self, output_handler: &mut dyn FnMut(&str)) {
        let (start_mark, end_mark) = self.marks();

        output_handler(start_mark);
        output_handler(&self.name);

        for attribute in &self.attributes {
            output_handler(" ");
            attribute.serialize(output_handler);
        }

        output_handler(end_mark);
    }

    // NOTE: not a `ToOwned` implementation, since the result has a
    // different lifetime than `self`.
    pub fn to_owned(&self) -> Tag<'static> {
        Tag {
            name: Cow::Owned(self.name.to_string()),
            tag_type: self.tag_type,
            xml_declaration: self.xml_declaration,
            attributes: self.attributes.iter().map(Attribute::to_owned).collect(),
            raw: self.raw.as_ref().map(|raw| Cow::Owned(raw.to_string())),
            position: self.position,
            depth: self.depth,
        }
    }
}

impl Display for Tag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut result = Ok(());

        self.serialize(&mut |chunk| {
            if result.is_ok() {
                result = f.write_str(chunk);
            }
        });

        result
    }
}
