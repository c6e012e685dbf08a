//! Owned raw element trees.

/// One parsed element with its attributes and child subtree.
///
/// Attributes keep document order. A `RawNode` lives only for the duration
/// of shaping or audit observation and is dropped afterwards, so peak
/// memory is bounded by one element's subtree rather than the whole input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNode {
    /// Tag name (e.g. "node", "way", "relation", "tag", "nd", "member").
    pub kind: String,

    /// Attribute name/value pairs in document order.
    pub attributes: Vec<(String, String)>,

    /// Child elements in document order.
    pub children: Vec<RawNode>,
}

impl RawNode {
    /// Create a node with no attributes or children.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute value by name.
    ///
    /// # Arguments
    /// * `name` - Attribute name
    ///
    /// # Returns
    /// The value, or `None` if the attribute is absent
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Walk the full subtree rooted at this node, in document (preorder)
    /// order, starting with the node itself.
    ///
    /// This is the single traversal primitive for "this node and all its
    /// descendants"; callers wanting immediate children only iterate
    /// [`RawNode::children`] directly, so the two scopes never blur.
    ///
    /// # Examples
    /// ```
    /// use osm_wrangler::RawNode;
    ///
    /// let mut way = RawNode::new("way");
    /// way.children.push(RawNode::new("nd"));
    /// way.children.push(RawNode::new("tag"));
    ///
    /// let kinds: Vec<_> = way.descendants().map(|n| n.kind.as_str()).collect();
    /// assert_eq!(kinds, ["way", "nd", "tag"]);
    /// ```
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Preorder iterator over a node and its full subtree.
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a RawNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a RawNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children reversed so the leftmost child is visited next.
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
